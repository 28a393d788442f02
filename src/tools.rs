use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Directories where package managers drop `ffmpeg` on macOS. GUI launches
/// don't inherit the login shell's `PATH`, so they are appended at startup.
pub const EXTRA_SEARCH_DIRS: [&str; 2] = ["/opt/homebrew/bin", "/usr/local/bin"];

/// The two external programs everything else shells out to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolchain {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

impl Toolchain {
    pub fn with_ffmpeg(mut self, program: impl Into<PathBuf>) -> Self {
        self.ffmpeg = program.into();
        self
    }

    pub fn with_ffprobe(mut self, program: impl Into<PathBuf>) -> Self {
        self.ffprobe = program.into();
        self
    }
}

/// Returns `current` with every entry of `extra` that is not already on it
/// appended at the end.
pub fn augmented_path(current: Option<OsString>, extra: &[&str]) -> OsString {
    let mut dirs: Vec<PathBuf> = current
        .as_deref()
        .map(|p| env::split_paths(p).collect())
        .unwrap_or_default();

    for dir in extra {
        let dir = Path::new(dir);
        if !dirs.iter().any(|d| d == dir) {
            dirs.push(dir.to_path_buf());
        }
    }

    // Entries come from an existing PATH or from EXTRA_SEARCH_DIRS, none of
    // which contain the separator, so joining cannot fail in practice.
    env::join_paths(&dirs).unwrap_or_else(|_| current.unwrap_or_default())
}

/// Extends this process's `PATH` with [`EXTRA_SEARCH_DIRS`].
pub fn augment_search_path() {
    let path = augmented_path(env::var_os("PATH"), &EXTRA_SEARCH_DIRS);
    log::debug!("search path: {}", path.to_string_lossy());
    env::set_var("PATH", path);
}
