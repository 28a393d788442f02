use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use video2gif::{ExtractRequest, ExtractionError, MediaBackend, OutputArtifact, ProbeError, Toolchain};

pub enum Job {
    Probe(PathBuf),
    Extract(ExtractRequest),
}

pub enum JobResult {
    Probed(Result<f64, ProbeError>),
    Extracted(Result<OutputArtifact, ExtractionError>),
}

/// One external process at a time, run off the UI thread.
pub struct Worker {
    tools: Toolchain,
    pending: Option<Receiver<JobResult>>,
}

impl Worker {
    pub fn new(tools: Toolchain) -> Self {
        Self {
            tools,
            pending: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn start(&mut self, job: Job, ctx: &egui::Context) {
        let (tx, rx) = mpsc::channel();
        let tools = self.tools.clone();
        let ctx = ctx.clone();

        thread::spawn(move || {
            let result = match job {
                Job::Probe(path) => JobResult::Probed(tools.probe_duration(&path)),
                Job::Extract(request) => JobResult::Extracted(tools.extract_clip(&request)),
            };
            // The receiver is gone only if the window closed mid-job.
            let _ = tx.send(result);
            ctx.request_repaint();
        });

        self.pending = Some(rx);
    }

    /// Returns the finished job's result, if any.
    pub fn poll(&mut self) -> Option<JobResult> {
        let rx = self.pending.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::error!("worker thread exited without a result");
                self.pending = None;
                None
            }
        }
    }
}
