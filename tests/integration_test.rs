// Drives the real process plumbing against stand-in ffprobe/ffmpeg scripts.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use video2gif::extract::FILTER_GRAPH;
use video2gif::{
    probe_duration, Error, ExtractionError, Launcher, PreviewOpener, ProbeError, Session, Stage,
    Toolchain,
};

// Scripts are written and then executed; serializing keeps a concurrent fork
// from holding a write handle open (ETXTBSY).
static PROCESS_LOCK: Mutex<()> = Mutex::new(());

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn fake_ffprobe(dir: &Path, stdout: &str) -> PathBuf {
    write_script(dir, "ffprobe", &format!("echo '{}'", stdout))
}

/// Records its arguments one per line and copies `fixture` to the last one.
fn fake_ffmpeg(dir: &Path, fixture: &Path) -> PathBuf {
    let log = dir.join("ffmpeg-args.txt");
    write_script(
        dir,
        "ffmpeg",
        &format!(
            "printf '%s\\n' \"$@\" > '{}'\nfor last; do :; done\ncp '{}' \"$last\"",
            log.display(),
            fixture.display()
        ),
    )
}

fn failing_ffmpeg(dir: &Path, stderr: &str) -> PathBuf {
    write_script(dir, "ffmpeg", &format!("echo '{}' >&2\nexit 1", stderr))
}

fn recorded_args(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("ffmpeg-args.txt"))
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

fn fixture_gif(dir: &Path) -> PathBuf {
    let path = dir.join("fixture.gif");
    image::RgbaImage::new(4, 3).save(&path).unwrap();
    path
}

#[test]
fn probe_reads_the_bare_duration() {
    let _guard = PROCESS_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let tools = Toolchain::default().with_ffprobe(fake_ffprobe(dir.path(), "42.000000"));

    let seconds = probe_duration(&tools, Path::new("sample.mov")).unwrap();
    assert_eq!(seconds, 42.0);
}

#[test]
fn probe_failure_carries_the_diagnostic() {
    let _guard = PROCESS_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let ffprobe = write_script(dir.path(), "ffprobe", "echo 'sample.mov: No such file or directory' >&2\nexit 1");
    let tools = Toolchain::default().with_ffprobe(ffprobe);

    match probe_duration(&tools, Path::new("sample.mov")) {
        Err(ProbeError::Failed { stderr, .. }) => {
            assert_eq!(stderr, "sample.mov: No such file or directory")
        }
        other => panic!("expected ffprobe failure, got {:?}", other),
    }
}

#[test]
fn probe_rejects_unparsable_output() {
    let _guard = PROCESS_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let tools = Toolchain::default().with_ffprobe(fake_ffprobe(dir.path(), "N/A"));

    assert!(matches!(
        probe_duration(&tools, Path::new("sample.mov")),
        Err(ProbeError::Parse { .. })
    ));
}

#[test]
fn select_generate_and_preview() {
    let _guard = PROCESS_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let fixture = fixture_gif(dir.path());
    let tools = Toolchain::default()
        .with_ffprobe(fake_ffprobe(dir.path(), "42.0"))
        .with_ffmpeg(fake_ffmpeg(dir.path(), &fixture));

    let video = dir.path().join("sample.mov");
    fs::write(&video, b"not really a movie").unwrap();

    let mut session = Session::default();
    session.select_file(&video, &tools).unwrap();
    assert_eq!(session.start_text, "1");
    assert_eq!(session.end_text, "42");

    session.start_text = "5".into();
    session.end_text = "10".into();
    let output = session.generate(&tools).unwrap().clone();

    let expected_gif = dir.path().join("sample.gif");
    assert_eq!(
        recorded_args(dir.path()),
        [
            "-ss".to_string(),
            "00:00:05.000".to_string(),
            "-t".to_string(),
            "5".to_string(),
            "-i".to_string(),
            video.display().to_string(),
            "-filter_complex".to_string(),
            FILTER_GRAPH.to_string(),
            "-y".to_string(),
            expected_gif.display().to_string(),
        ]
    );
    assert_eq!(output.path, expected_gif);
    assert_eq!(output.dimensions, Some((4, 3)));
    assert_eq!(session.stage(), Stage::Generated);
    assert_eq!(session.output_label(), "GIF saved as: sample.gif");

    let preview_dir = tempfile::tempdir().unwrap();
    let opener = PreviewOpener::with_dir(Launcher::Default, preview_dir.path());
    let page = opener.stage(&output.path).unwrap();
    assert_eq!(fs::read(opener.gif_path()).unwrap(), fs::read(&fixture).unwrap());
    assert!(fs::read_to_string(page)
        .unwrap()
        .contains(&format!("file://{}", opener.gif_path().display())));
}

#[test]
fn extractor_failure_is_reported_verbatim() {
    let _guard = PROCESS_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let tools = Toolchain::default()
        .with_ffprobe(fake_ffprobe(dir.path(), "12.5"))
        .with_ffmpeg(failing_ffmpeg(dir.path(), "Invalid data"));

    let mut session = Session::default();
    session.select_file(dir.path().join("broken.mp4"), &tools).unwrap();

    let err = session.generate(&tools).unwrap_err();
    assert!(matches!(err, Error::Extraction(ExtractionError::Failed { .. })));
    assert_eq!(err.to_string(), "FFmpeg error:\nInvalid data\n");
    assert_eq!(session.stage(), Stage::FileSelected);
    assert_eq!(session.output_label(), "");
}

#[test]
fn invalid_range_never_runs_ffmpeg() {
    let _guard = PROCESS_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let fixture = fixture_gif(dir.path());
    let tools = Toolchain::default()
        .with_ffprobe(fake_ffprobe(dir.path(), "30"))
        .with_ffmpeg(fake_ffmpeg(dir.path(), &fixture));

    let mut session = Session::default();
    session.select_file(dir.path().join("clip.webm"), &tools).unwrap();
    session.start_text = "20".into();
    session.end_text = "20".into();

    assert!(session.generate(&tools).is_err());
    assert!(!dir.path().join("ffmpeg-args.txt").exists());
    assert!(!dir.path().join("clip.gif").exists());
}
