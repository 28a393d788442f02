// Shared by the command line and GUI front ends
pub mod error;
pub mod extract;
pub mod preview;
pub mod probe;
pub mod session;
pub mod tools;

pub use error::{Error, ExtractionError, InputError, ProbeError};
pub use extract::{extract_clip, ClipRange, ExtractRequest, OutputArtifact};
pub use preview::{Launcher, PreviewOpener};
pub use probe::probe_duration;
pub use session::{is_video_file, MediaBackend, Session, Stage};
pub use tools::{augment_search_path, Toolchain};
