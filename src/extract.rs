use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::error::{ExtractionError, InputError};
use crate::tools::Toolchain;

/// 10 fps, 960px wide with lanczos, then a two-pass palette: a 128-color
/// table built from frame differences, applied with sierra2_4a dithering.
pub const FILTER_GRAPH: &str = "[0:v]fps=10,scale=960:-1:flags=lanczos,split[x][z];\
[z]palettegen=stats_mode=diff:max_colors=128[p];\
[x][p]paletteuse=dither=sierra2_4a";

/// A `[start, end)` slice of the source in whole seconds. `end > start`
/// always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClipRange {
    start: u32,
    end: u32,
}

impl ClipRange {
    pub fn new(start: u32, end: u32) -> Result<Self, InputError> {
        if end <= start {
            return Err(InputError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Builds a range from the two text fields of the form.
    pub fn parse(start: &str, end: &str) -> Result<Self, InputError> {
        let start = start.trim().parse::<u32>().map_err(|_| InputError::InvalidRange)?;
        let end = end.trim().parse::<u32>().map_err(|_| InputError::InvalidRange)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn duration(&self) -> u32 {
        self.end - self.start
    }
}

/// `HH:MM:SS.000`, each field two digits wide.
pub fn format_timestamp(seconds: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}.000",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

/// `clip.mp4` becomes `clip.gif`; a path without an extension gets one.
pub fn output_path_for(input: &Path) -> PathBuf {
    input.with_extension("gif")
}

/// Everything ffmpeg needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    pub source: PathBuf,
    pub range: ClipRange,
}

impl ExtractRequest {
    pub fn new(source: impl Into<PathBuf>, range: ClipRange) -> Self {
        Self {
            source: source.into(),
            range,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        output_path_for(&self.source)
    }

    pub fn args(&self) -> Vec<OsString> {
        vec![
            "-ss".into(),
            format_timestamp(self.range.start()).into(),
            "-t".into(),
            self.range.duration().to_string().into(),
            "-i".into(),
            self.source.as_os_str().to_owned(),
            "-filter_complex".into(),
            FILTER_GRAPH.into(),
            "-y".into(),
            self.output_path().into_os_string(),
        ]
    }
}

/// The GIF produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputArtifact {
    pub path: PathBuf,
    /// Width and height read from the GIF header, when readable.
    pub dimensions: Option<(u32, u32)>,
}

impl OutputArtifact {
    pub fn inspect(path: PathBuf) -> Self {
        let dimensions = match image::image_dimensions(&path) {
            Ok(dims) => Some(dims),
            Err(e) => {
                log::debug!("could not read GIF header of {}: {}", path.display(), e);
                None
            }
        };
        Self { path, dimensions }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Runs ffmpeg for `request`, overwriting any previous GIF. A failed run may
/// leave a partial file behind.
pub fn extract_clip(
    tools: &Toolchain,
    request: &ExtractRequest,
) -> Result<OutputArtifact, ExtractionError> {
    let args = request.args();
    log::info!(
        "running {} {}",
        tools.ffmpeg.display(),
        args.iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let output = Command::new(&tools.ffmpeg)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| ExtractionError::Launch {
            program: tools.ffmpeg.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        log::warn!("ffmpeg exited with {}", output.status);
        return Err(ExtractionError::Failed {
            status: output.status,
            stderr,
        });
    }

    let artifact = OutputArtifact::inspect(request.output_path());
    log::info!("wrote {}", artifact.path.display());
    Ok(artifact)
}
