//! The window's state, kept apart from any widget toolkit so both front ends
//! (and tests) drive the same transitions.

use std::path::{Path, PathBuf};

use crate::error::{Error, ExtractionError, InputError, ProbeError};
use crate::extract::{self, ClipRange, ExtractRequest, OutputArtifact};
use crate::preview::PreviewOpener;
use crate::tools::Toolchain;

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["mp4", "mov", "mkv", "avi", "webm"];

pub const NO_FILE_LABEL: &str = "No file selected";

/// Case-insensitive check against [`SUPPORTED_EXTENSIONS`].
pub fn is_video_file(path: &Path) -> bool {
    if let Some(extension) = path.extension() {
        if let Some(ext_str) = extension.to_str() {
            let ext = ext_str.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        } else {
            false
        }
    } else {
        false
    }
}

/// The external work a session needs done.
pub trait MediaBackend {
    fn probe_duration(&self, path: &Path) -> Result<f64, ProbeError>;
    fn extract_clip(&self, request: &ExtractRequest) -> Result<OutputArtifact, ExtractionError>;
}

impl MediaBackend for Toolchain {
    fn probe_duration(&self, path: &Path) -> Result<f64, ProbeError> {
        crate::probe::probe_duration(self, path)
    }

    fn extract_clip(&self, request: &ExtractRequest) -> Result<OutputArtifact, ExtractionError> {
        extract::extract_clip(self, request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NoFileSelected,
    FileSelected,
    Generated,
}

#[derive(Debug, Clone)]
pub struct Session {
    selected: Option<PathBuf>,
    output: Option<OutputArtifact>,
    pub start_text: String,
    pub end_text: String,
    file_label: String,
    output_label: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            selected: None,
            output: None,
            start_text: String::new(),
            end_text: String::new(),
            file_label: NO_FILE_LABEL.to_string(),
            output_label: String::new(),
        }
    }
}

impl Session {
    pub fn stage(&self) -> Stage {
        match (&self.selected, &self.output) {
            (None, _) => Stage::NoFileSelected,
            (Some(_), None) => Stage::FileSelected,
            (Some(_), Some(_)) => Stage::Generated,
        }
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    pub fn output(&self) -> Option<&OutputArtifact> {
        self.output.as_ref()
    }

    pub fn file_label(&self) -> &str {
        &self.file_label
    }

    pub fn output_label(&self) -> &str {
        &self.output_label
    }

    pub fn can_view(&self) -> bool {
        self.output.is_some()
    }

    /// First half of a selection: validates the extension and switches to
    /// the new file. The caller probes the returned path and hands the
    /// result to [`Session::apply_duration`].
    pub fn begin_selection(&mut self, path: impl Into<PathBuf>) -> Result<PathBuf, InputError> {
        let path = path.into();
        self.output = None;
        self.output_label.clear();

        if !is_video_file(&path) {
            let ext = path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
                .unwrap_or_default();
            log::info!("rejected {}: unsupported extension", path.display());
            self.selected = None;
            self.file_label = NO_FILE_LABEL.to_string();
            return Err(InputError::UnsupportedFormat(ext));
        }

        self.file_label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.selected = Some(path.clone());
        Ok(path)
    }

    /// Fills the range fields with `[1, floor(duration)]`. A failed probe
    /// keeps the selection and leaves the fields alone.
    pub fn apply_duration(&mut self, probed: Result<f64, ProbeError>) -> Result<(), ProbeError> {
        let seconds = probed?;
        self.start_text = "1".to_string();
        self.end_text = (seconds.floor() as u64).to_string();
        Ok(())
    }

    pub fn select_file<B: MediaBackend + ?Sized>(
        &mut self,
        path: impl Into<PathBuf>,
        backend: &B,
    ) -> Result<(), Error> {
        let path = self.begin_selection(path)?;
        let probed = backend.probe_duration(&path);
        self.apply_duration(probed)?;
        Ok(())
    }

    /// Validates the form. Nothing runs when this fails.
    pub fn prepare_generation(&self) -> Result<ExtractRequest, InputError> {
        let source = self.selected.as_ref().ok_or(InputError::NoFileSelected)?;
        let range = ClipRange::parse(&self.start_text, &self.end_text)?;
        Ok(ExtractRequest::new(source.clone(), range))
    }

    /// Records a finished extraction. On failure nothing changes and the
    /// error is handed back for display.
    pub fn finish_generation(
        &mut self,
        result: Result<OutputArtifact, ExtractionError>,
    ) -> Result<&OutputArtifact, ExtractionError> {
        let artifact = result?;
        self.output_label = format!("GIF saved as: {}", artifact.file_name());
        Ok(&*self.output.insert(artifact))
    }

    pub fn generate<B: MediaBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> Result<&OutputArtifact, Error> {
        let request = self.prepare_generation()?;
        let result = backend.extract_clip(&request);
        Ok(self.finish_generation(result)?)
    }

    /// Opens the last GIF in the browser. Does nothing before one exists.
    pub fn view(&self, opener: &PreviewOpener) {
        if let Some(output) = &self.output {
            opener.open(&output.path);
        }
    }
}
