//! Sink trait for decoded records

use super::{error::Result, log_record::LogRecord};

pub trait LogSink: Send + Sync {
    fn emit(&self, record: &LogRecord) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
