//! Build script for act-lens that generates version information.
//!
//! The version is `git describe --always --tags --dirty` when building from a
//! git checkout, and the package version otherwise (e.g. a packaged crate).

use std::env;
use std::process::Command;

fn main() {
    let version = git_describe()
        .or_else(|_| env::var("CARGO_PKG_VERSION").map_err(|e| e.to_string()))
        .unwrap_or_else(|_| String::from("unknown"));
    println!("cargo:rustc-env=ACT_LENS_VERSION={version}");
}

fn git_describe() -> Result<String, String> {
    let argv = ["describe", "--always", "--tags", "--dirty=-dirty"];
    let invocation = format!("git {}", argv.join(" "));

    let output = Command::new("git")
        .args(argv)
        .output()
        .map_err(|e| format!("failed to execute `{invocation}`: {e}"))?;
    if !output.status.success() {
        return Err(format!("`{invocation}` exited with non-zero status"));
    }

    let version = String::from_utf8(output.stdout)
        .map_err(|e| format!("could not parse output of `{invocation}` as UTF-8: {e}"))?;
    Ok(version.trim_end().to_string())
}
