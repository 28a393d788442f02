use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Problems with what the user selected or typed. Nothing external has run
/// when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Unsupported file format: {0}. Please use .mov, .mp4, .webm, etc.")]
    UnsupportedFormat(String),
    #[error("Check inputs. File must be selected and seconds must be valid.")]
    NoFileSelected,
    #[error("Check inputs. File must be selected and seconds must be valid.")]
    InvalidRange,
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run {}: {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("ffprobe failed ({status}): {stderr}")]
    Failed { status: ExitStatus, stderr: String },
    #[error("cannot parse duration: {output:?}")]
    Parse { output: String },
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to run {}: {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("FFmpeg error:\n{stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Probe(#[from] ProbeError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}
