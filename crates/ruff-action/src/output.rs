use std::io::Write;
use std::path::Path;

use crate::version::VersionSpec;

pub const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

const VERSION_OUTPUT: &str = "ruff-version";

/// Append the `ruff-version` step output to the `GITHUB_OUTPUT` file.
///
/// Does nothing outside GitHub Actions. A write failure is logged, never
/// fatal.
pub fn write_version(output_file: Option<&Path>, spec: &VersionSpec) {
    let Some(path) = output_file else {
        return;
    };
    let result = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| writeln!(file, "{VERSION_OUTPUT}={spec}"));
    match result {
        Ok(()) => tracing::debug!(path = %path.display(), version = %spec, "wrote step output"),
        Err(e) => tracing::warn!(path = %path.display(), "failed to write step output: {e}"),
    }
}
