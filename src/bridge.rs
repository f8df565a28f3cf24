//! The native half of `TracingSlf4jImpl.tracingSlf4jImpl(int, String)`
//!
//! [`register_log_fn`] binds [`tracing_slf4j_impl`] to the Java class once the
//! JVM is up. From then on every SLF4J call on the Java side ends up in the
//! global [`Dispatcher`].

use crate::core::config::{BridgeConfig, CLASS_NAME, METHOD_NAME, METHOD_SIGNATURE};
use crate::core::dispatcher::{self, panic_message, Dispatcher};
use crate::core::error::{BridgeError, Result};
use jni::objects::{JClass, JString};
use jni::sys::jint;
use jni::{JNIEnv, NativeMethod};
use std::ffi::c_void;
use std::path::Path;
use std::sync::Arc;

/// The Java half of the bridge: a shaded jar with the SLF4J provider.
#[cfg(feature = "embed-jar")]
pub const DEPENDENCIES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/dependencies.jar"));

/// File name used by [`write_dependencies`].
pub const JAR_FILE_NAME: &str = "tracing-slf4j-all.jar";

/// Implementation of the native method. Never unwinds into the JVM and never
/// throws: unreadable messages and panics are counted and reported on stderr.
pub extern "system" fn tracing_slf4j_impl<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    level: jint,
    message: JString<'local>,
) {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let dispatcher = dispatcher::global();
        match read_message(&mut env, &message) {
            Ok(text) => {
                dispatcher.dispatch(level, &text);
            }
            Err(e) => {
                if env.exception_check().unwrap_or(false) {
                    let _ = env.exception_clear();
                }
                dispatcher.reject(&e);
            }
        }
    }));

    if let Err(panic_info) = result {
        dispatcher::global().record_panic();
        eprintln!(
            "[TRACING-SLF4J CRITICAL] Native log call panicked: {}",
            panic_message(panic_info.as_ref())
        );
    }
}

fn read_message(env: &mut JNIEnv<'_>, message: &JString<'_>) -> Result<String> {
    if message.is_null() {
        return Err(BridgeError::NullMessage);
    }
    // Modified UTF-8 is decoded lossily, so this only fails on JNI errors
    let text: String = env.get_string(message)?.into();
    Ok(text)
}

fn native_method(method_name: &str) -> NativeMethod {
    NativeMethod {
        name: method_name.into(),
        sig: METHOD_SIGNATURE.into(),
        fn_ptr: tracing_slf4j_impl as *mut c_void,
    }
}

/// Register the native logging function with the JVM so it can be called by
/// the logging framework.
///
/// ```ignore
/// tracing_slf4j::register_log_fn(&mut env)?;
/// ```
///
/// # Errors
///
/// If the class `nl/mrfriendly/tracing/TracingSlf4jImpl` cannot be found or
/// registering the native method fails.
pub fn register_log_fn(env: &mut JNIEnv<'_>) -> Result<()> {
    env.register_native_methods(CLASS_NAME, &[native_method(METHOD_NAME)])?;
    Ok(())
}

/// Like [`register_log_fn`], for a relocated or renamed Java class.
pub fn register_with(env: &mut JNIEnv<'_>, config: &BridgeConfig) -> Result<()> {
    config.validate()?;
    env.register_native_methods(
        config.class_name.as_str(),
        &[native_method(&config.method_name)],
    )?;
    Ok(())
}

/// Remove every native binding from the configured class. Java calls made
/// afterwards throw `UnsatisfiedLinkError`.
pub fn unregister_log_fn(env: &mut JNIEnv<'_>, config: &BridgeConfig) -> Result<()> {
    env.unregister_native_methods(config.class_name.as_str())?;
    Ok(())
}

/// Install a dispatcher built from `config` and register the native method.
///
/// # Errors
///
/// [`BridgeError::AlreadyInstalled`] if a dispatcher is already in place
/// (including the default one created by an earlier Java log call), or any
/// configuration or JNI error.
pub fn init(env: &mut JNIEnv<'_>, config: &BridgeConfig) -> Result<Arc<Dispatcher>> {
    let dispatcher = dispatcher::install(Dispatcher::from_config(config)?)?;
    register_with(env, config)?;
    Ok(dispatcher)
}

/// Build the `-Djava.class.path=` JVM option for the given entries.
///
/// ```
/// let option = tracing_slf4j::classpath_option(["/opt/app/tracing-slf4j-all.jar"]).unwrap();
/// assert_eq!(option, "-Djava.class.path=/opt/app/tracing-slf4j-all.jar");
/// ```
pub fn classpath_option<I, P>(entries: I) -> Result<String>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let entries: Vec<_> = entries
        .into_iter()
        .map(|p| p.as_ref().as_os_str().to_owned())
        .collect();
    if entries.is_empty() {
        return Err(BridgeError::config("java.class.path", "no classpath entries"));
    }

    let joined = std::env::join_paths(entries)
        .map_err(|e| BridgeError::config("java.class.path", e.to_string()))?;
    let joined = joined.into_string().map_err(|raw| {
        BridgeError::config("java.class.path", format!("not valid UTF-8: {:?}", raw))
    })?;

    Ok(format!("-Djava.class.path={}", joined))
}

/// Save [`DEPENDENCIES`] as `dir/tracing-slf4j-all.jar` and return its path.
#[cfg(feature = "embed-jar")]
pub fn write_dependencies(dir: impl AsRef<Path>) -> Result<std::path::PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(JAR_FILE_NAME);
    std::fs::write(&path, DEPENDENCIES)?;
    Ok(path)
}
