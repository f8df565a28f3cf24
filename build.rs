//! Builds the Java half of the bridge when the `embed-jar` feature is on.

#[cfg(not(feature = "embed-jar"))]
fn main() {}

#[cfg(feature = "embed-jar")]
fn main() -> color_eyre::Result<()> {
    java::build_java()
}

#[cfg(feature = "embed-jar")]
mod java {
    use color_eyre::eyre::{eyre, Result, WrapErr};
    use std::env::var;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::process::{Command, Stdio};

    pub fn build_java() -> Result<()> {
        println!("cargo:rerun-if-changed=java/src");
        println!("cargo:rerun-if-changed=java/build.gradle.kts");

        let java_dir = PathBuf::from(var("CARGO_MANIFEST_DIR")?)
            .join("java")
            .canonicalize()
            .wrap_err("java/ directory is missing")?;

        run_gradle(&java_dir, "shadowJar")?;

        let libs = java_dir.join("build").join("libs");
        let jar = fs::read_dir(&libs)
            .wrap_err_with(|| format!("reading {}", libs.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .find(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy())
                    .is_some_and(|name| name.starts_with("tracing-slf4j") && name.ends_with("all.jar"))
            })
            .ok_or_else(|| eyre!("Could not find shaded jar in {}", libs.display()))?;

        let out_dir = PathBuf::from(var("OUT_DIR")?);
        fs::copy(&jar, out_dir.join("dependencies.jar"))?;

        run_gradle(&java_dir, "clean")
    }

    /// Prefers the project's wrapper and falls back to `gradle` on the PATH.
    fn run_gradle(java_dir: &Path, task: &str) -> Result<()> {
        let program = if java_dir.join("gradlew").exists() {
            "./gradlew"
        } else {
            "gradle"
        };

        let output = Command::new(program)
            .arg(task)
            .current_dir(java_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .wrap_err_with(|| format!("running {} {}", program, task))?;

        if output.status.success() {
            Ok(())
        } else {
            eprintln!("{}", String::from_utf8_lossy(&output.stdout));
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            Err(eyre!("Building Java dependency failed ({} {})", program, task))
        }
    }
}
