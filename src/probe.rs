use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::ProbeError;
use crate::tools::Toolchain;

/// Asks ffprobe for the container duration only, printed as a bare number.
pub fn probe_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-v",
        "error",
        "-show_entries",
        "format=duration",
        "-of",
        "default=noprint_wrappers=1:nokey=1",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(path.as_os_str().to_owned());
    args
}

/// Parses ffprobe's output into seconds.
pub fn parse_duration(stdout: &str) -> Result<f64, ProbeError> {
    let text = stdout.trim();
    match text.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
        _ => Err(ProbeError::Parse {
            output: text.to_string(),
        }),
    }
}

/// Runs ffprobe on `path` and returns its duration in seconds. Blocks until
/// the process exits.
pub fn probe_duration(tools: &Toolchain, path: &Path) -> Result<f64, ProbeError> {
    log::debug!("probing duration of {}", path.display());

    let output = Command::new(&tools.ffprobe)
        .args(probe_args(path))
        .stdin(Stdio::null())
        .output()
        .map_err(|source| ProbeError::Launch {
            program: tools.ffprobe.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        log::warn!("ffprobe exited with {}: {}", output.status, stderr);
        return Err(ProbeError::Failed {
            status: output.status,
            stderr,
        });
    }

    let seconds = parse_duration(&String::from_utf8_lossy(&output.stdout))?;
    log::info!("{} is {:.3}s long", path.display(), seconds);
    Ok(seconds)
}
