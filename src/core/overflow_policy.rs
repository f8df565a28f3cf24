//! Overflow policies for the async queue
//!
//! When the queue in front of a slow sink is full, these policies decide what
//! happens to the call that arrived from the JVM.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// # Example
///
/// ```
/// use tracing_slf4j::OverflowPolicy;
/// use std::time::Duration;
///
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::AlertAndDrop);
///
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OverflowPolicy {
    /// Drop the new record and only track it in metrics
    DropNewest,

    /// Block the calling JVM thread until space is available
    ///
    /// Slow subscribers then slow down Java code that logs.
    Block,

    /// Block up to the given duration, then drop
    BlockWithTimeout(Duration),

    /// Drop, report on stderr and invoke the overflow callback
    #[default]
    AlertAndDrop,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
        }
    }
}

/// Called when records are dropped because the queue is full.
/// The parameter is the total count of overflow drops so far.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;
