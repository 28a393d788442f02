use clap::{Arg, ArgAction, Command};
use colored::*;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use video2gif::{
    augment_search_path, ExtractRequest, Launcher, MediaBackend, OutputArtifact, PreviewOpener,
    Session, Toolchain,
};

#[derive(Serialize)]
struct Report<'a> {
    input: &'a str,
    start: &'a str,
    end: &'a str,
    toolchain: &'a Toolchain,
    output: &'a OutputArtifact,
    elapsed_ms: u128,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let matches = Command::new("video2gif")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turn a slice of a video into a GIF with ffmpeg")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Video to convert (.mp4, .mov, .mkv, .avi or .webm)")
                .required(true),
        )
        .arg(
            Arg::new("start")
                .short('s')
                .long("start")
                .value_name("SECONDS")
                .help("First second of the clip. Default: 1"),
        )
        .arg(
            Arg::new("end")
                .short('e')
                .long("end")
                .value_name("SECONDS")
                .help("Second the clip stops at, must be after --start. Default: the video's length"),
        )
        .arg(
            Arg::new("view")
                .long("view")
                .help("Open the finished GIF in the default browser")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print a JSON report instead of the summary")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ffmpeg")
                .long("ffmpeg")
                .value_name("PROGRAM")
                .help("ffmpeg executable to run")
                .default_value("ffmpeg"),
        )
        .arg(
            Arg::new("ffprobe")
                .long("ffprobe")
                .value_name("PROGRAM")
                .help("ffprobe executable to run")
                .default_value("ffprobe"),
        )
        .get_matches();

    augment_search_path();

    let input = matches.get_one::<String>("input").unwrap();
    let json = matches.get_flag("json");
    let tools = Toolchain::default()
        .with_ffmpeg(matches.get_one::<String>("ffmpeg").unwrap())
        .with_ffprobe(matches.get_one::<String>("ffprobe").unwrap());

    let start_time = Instant::now();
    let mut session = Session::default();

    let request = plan(
        &mut session,
        &tools,
        PathBuf::from(input),
        matches.get_one::<String>("start").map(String::as_str),
        matches.get_one::<String>("end").map(String::as_str),
    )?;

    if !json {
        println!("{}", "Converting video with settings:".bold().cyan());
        println!("  {}: {}", "Input".green(), session.file_label());
        println!(
            "  {}: {}s to {}s ({}s)",
            "Range".green(),
            request.range.start(),
            request.range.end(),
            request.range.duration()
        );
        println!("  {}: {}", "Output".yellow(), request.output_path().display());
        println!("\n{}", "Creating GIF with ffmpeg...".bold().cyan());
    }

    let output = session.generate(&tools)?.clone();
    let elapsed = start_time.elapsed();

    if json {
        let report = Report {
            input,
            start: &session.start_text,
            end: &session.end_text,
            toolchain: &tools,
            output: &output,
            elapsed_ms: elapsed.as_millis(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", session.output_label().bold().green());
        println!("  {}: {}", "Path".blue(), output.path.display());
        if let Some((width, height)) = output.dimensions {
            println!("  {}: {}x{}", "Resolution".blue(), width, height);
        }
        println!("  {}: {:.2?}", "Processing time".blue(), elapsed);
    }

    if matches.get_flag("view") {
        session.view(&PreviewOpener::new(Launcher::detect()));
    }

    Ok(())
}

/// Selects `input`, applies any range overrides and validates the result.
/// The probe may fail as long as both ends of the range were given.
fn plan<B: MediaBackend>(
    session: &mut Session,
    backend: &B,
    input: PathBuf,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<ExtractRequest, video2gif::Error> {
    let path = session.begin_selection(input)?;
    let probed = backend.probe_duration(&path);
    if let Err(e) = session.apply_duration(probed) {
        if start.is_none() || end.is_none() {
            return Err(e.into());
        }
        log::warn!("continuing with the given range: {}", e);
    }

    if let Some(start) = start {
        session.start_text = start.to_string();
    }
    if let Some(end) = end {
        session.end_text = end.to_string();
    }

    Ok(session.prepare_generation()?)
}
