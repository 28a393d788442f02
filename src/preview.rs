use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const PREVIEW_GIF_NAME: &str = "video2gif-preview.gif";
pub const PREVIEW_HTML_NAME: &str = "video2gif-preview.html";

/// How the host OS opens a document with its default handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launcher {
    MacOs,
    Windows,
    Default,
}

impl Launcher {
    pub fn detect() -> Self {
        Self::for_os(env::consts::OS)
    }

    pub fn for_os(os: &str) -> Self {
        match os {
            "macos" => Launcher::MacOs,
            "windows" => Launcher::Windows,
            _ => Launcher::Default,
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            Launcher::MacOs => "open",
            Launcher::Windows => "rundll32",
            Launcher::Default => "xdg-open",
        }
    }

    pub fn command(&self, target: &Path) -> Command {
        let mut cmd = Command::new(self.program());
        if let Launcher::Windows = self {
            cmd.arg("url.dll,FileProtocolHandler");
        }
        cmd.arg(target);
        cmd
    }
}

/// A page showing `gif` scaled to the viewport width.
pub fn wrapper_html(gif: &Path) -> String {
    format!(
        r#"<html><body style="margin:0"><img src="file://{}" style="width:100%;max-width:100vw"/></body></html>"#,
        gif.display()
    )
}

/// Shows a generated GIF in the default browser through a fixed-name copy
/// and HTML wrapper. Two previews running at once overwrite each other's
/// files.
#[derive(Debug, Clone)]
pub struct PreviewOpener {
    launcher: Launcher,
    dir: PathBuf,
}

impl PreviewOpener {
    pub fn new(launcher: Launcher) -> Self {
        Self::with_dir(launcher, env::temp_dir())
    }

    pub fn with_dir(launcher: Launcher, dir: impl Into<PathBuf>) -> Self {
        Self {
            launcher,
            dir: dir.into(),
        }
    }

    pub fn launcher(&self) -> Launcher {
        self.launcher
    }

    pub fn gif_path(&self) -> PathBuf {
        self.dir.join(PREVIEW_GIF_NAME)
    }

    pub fn html_path(&self) -> PathBuf {
        self.dir.join(PREVIEW_HTML_NAME)
    }

    /// Copies `gif` next to a wrapper page and returns the page's path.
    pub fn stage(&self, gif: &Path) -> io::Result<PathBuf> {
        let bytes = fs::read(gif)?;
        let target_gif = self.gif_path();
        fs::write(&target_gif, bytes)?;

        let html = self.html_path();
        fs::write(&html, wrapper_html(&target_gif))?;
        Ok(html)
    }

    /// Best effort: failures are logged and otherwise ignored, and the
    /// launcher is not waited on.
    pub fn open(&self, gif: &Path) {
        let html = match self.stage(gif) {
            Ok(html) => html,
            Err(e) => {
                log::warn!("could not stage preview of {}: {}", gif.display(), e);
                return;
            }
        };

        let spawned = self
            .launcher
            .command(&html)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => log::debug!("{} started (pid {})", self.launcher.program(), child.id()),
            Err(e) => log::warn!("could not run {}: {}", self.launcher.program(), e),
        }
    }
}
