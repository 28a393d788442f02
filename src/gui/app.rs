use rfd::FileDialog;
use std::path::PathBuf;

use video2gif::session::SUPPORTED_EXTENSIONS;
use video2gif::{Launcher, PreviewOpener, Session, Stage, Toolchain};

use crate::worker::{Job, JobResult, Worker};

pub struct Video2GifApp {
    session: Session,
    worker: Worker,
    opener: PreviewOpener,
    error: Option<String>,
}

impl Video2GifApp {
    pub fn new(tools: Toolchain) -> Self {
        Self {
            session: Session::default(),
            worker: Worker::new(tools),
            opener: PreviewOpener::new(Launcher::detect()),
            error: None,
        }
    }

    fn choose_file(&mut self, ctx: &egui::Context) {
        let mut dialog = FileDialog::new().add_filter("Video", &SUPPORTED_EXTENSIONS);
        if let Some(dir) = dirs::video_dir() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            self.select(path, ctx);
        }
    }

    fn select(&mut self, path: PathBuf, ctx: &egui::Context) {
        match self.session.begin_selection(path) {
            Ok(path) => self.worker.start(Job::Probe(path), ctx),
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn generate(&mut self, ctx: &egui::Context) {
        match self.session.prepare_generation() {
            Ok(request) => self.worker.start(Job::Extract(request), ctx),
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn handle_result(&mut self, result: JobResult) {
        let outcome = match result {
            JobResult::Probed(probed) => self.session.apply_duration(probed).map_err(|e| e.to_string()),
            JobResult::Extracted(extracted) => self
                .session
                .finish_generation(extracted)
                .map(|_| ())
                .map_err(|e| e.to_string()),
        };
        if let Err(message) = outcome {
            self.error = Some(message);
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("range_form").num_columns(2).show(ui, |ui| {
            ui.label("Start Second");
            ui.text_edit_singleline(&mut self.session.start_text);
            ui.end_row();

            ui.label("End Second");
            ui.text_edit_singleline(&mut self.session.end_text);
            ui.end_row();
        });
    }

    fn show_error(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.error else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(message.as_str());
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.error = None;
        }
    }
}

impl eframe::App for Video2GifApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(result) = self.worker.poll() {
            self.handle_result(result);
        }

        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
        if let Some(path) = dropped {
            if !self.worker.is_busy() && self.error.is_none() {
                self.select(path, ctx);
            }
        }

        let enabled = !self.worker.is_busy() && self.error.is_none();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| {
                ui.vertical(|ui| {
                    if ui.button("Choose Video File").clicked() {
                        self.choose_file(ctx);
                    }
                    ui.label(self.session.file_label());

                    self.show_form(ui);

                    if ui.button("Generate GIF").clicked() {
                        self.generate(ctx);
                    }
                    if self.session.stage() == Stage::Generated && ui.button("View GIF").clicked() {
                        self.session.view(&self.opener);
                    }
                    ui.label(self.session.output_label());
                });
            });

            if self.worker.is_busy() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Working...");
                });
            }
        });

        self.show_error(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::tests::{wait_for, PROCESS_LOCK};
    use video2gif::ProbeError;

    #[cfg(unix)]
    fn fake_ffmpeg(dir: &std::path::Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("ffmpeg");
        std::fs::write(&path, "#!/bin/sh\nfor last; do :; done\nprintf 'GIF89a' > \"$last\"\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn generate_runs_in_the_background_and_lands_in_the_session() {
        let _guard = PROCESS_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let mut app = Video2GifApp::new(Toolchain::default().with_ffmpeg(fake_ffmpeg(dir.path())));
        let ctx = egui::Context::default();

        app.session.begin_selection(dir.path().join("sample.mov")).unwrap();
        app.session.start_text = "5".into();
        app.session.end_text = "10".into();

        app.generate(&ctx);
        assert!(app.worker.is_busy());
        let result = wait_for(&mut app.worker);
        app.handle_result(result);

        assert_eq!(app.error, None);
        assert_eq!(app.session.stage(), Stage::Generated);
        assert_eq!(app.session.output_label(), "GIF saved as: sample.gif");
        assert!(dir.path().join("sample.gif").exists());
    }

    #[test]
    fn invalid_range_shows_an_error_without_starting_a_job() {
        let mut app = Video2GifApp::new(Toolchain::default());
        let ctx = egui::Context::default();
        app.session.begin_selection("clip.mp4").unwrap();
        app.session.start_text = "10".into();
        app.session.end_text = "3".into();

        app.generate(&ctx);

        assert!(!app.worker.is_busy());
        assert_eq!(
            app.error.as_deref(),
            Some("Check inputs. File must be selected and seconds must be valid.")
        );
        assert_eq!(app.session.stage(), Stage::FileSelected);
    }

    #[test]
    fn unsupported_file_shows_an_error_without_starting_a_job() {
        let mut app = Video2GifApp::new(Toolchain::default());
        let ctx = egui::Context::default();

        app.select(PathBuf::from("notes.txt"), &ctx);

        assert!(!app.worker.is_busy());
        assert!(app.error.as_deref().unwrap().starts_with("Unsupported file format: .txt"));
        assert_eq!(app.session.stage(), Stage::NoFileSelected);
    }

    #[test]
    fn failed_probe_result_becomes_the_error_message() {
        let mut app = Video2GifApp::new(Toolchain::default());
        app.session.begin_selection("clip.mp4").unwrap();

        app.handle_result(JobResult::Probed(Err(ProbeError::Parse {
            output: "N/A".into(),
        })));

        assert_eq!(app.error.as_deref(), Some("cannot parse duration: \"N/A\""));
        assert_eq!(app.session.stage(), Stage::FileSelected);
    }

    #[test]
    fn probed_duration_fills_the_form() {
        let mut app = Video2GifApp::new(Toolchain::default());
        app.session.begin_selection("clip.mp4").unwrap();

        app.handle_result(JobResult::Probed(Ok(42.7)));

        assert_eq!(app.error, None);
        assert_eq!(app.session.start_text, "1");
        assert_eq!(app.session.end_text, "42");
    }
}
