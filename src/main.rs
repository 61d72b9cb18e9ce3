use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pali_chant::{
    generate_output_path, prepare, read_document, render, write_output, write_stats, ChantConfig, CommentMarks,
    OutputFormat, PreprocessOptions, RenderOptions, RunStats, StyleOptions, Transcriber,
};

#[derive(Parser, Debug)]
#[command(name = "pali-chant")]
#[command(about = "Syllable, tone and breath-hint annotation of Romanized Pali chanting texts")]
#[command(version)]
struct Args {
    /// Path of the UTF-8 input text
    #[arg(default_value = "input.txt")]
    input: PathBuf,

    /// Output path [default: <input stem>_chant.htm, or .txt with -t]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Plain text output; high tones are written in capital letters
    #[arg(short = 't', long = "text")]
    text: bool,

    /// Capitalize optional high tones like true high tones (requires -t)
    #[arg(long)]
    optional_high: bool,

    /// Breath-hint sensitivity: higher values treat more segments as lists; 0 disables hints
    #[arg(long, default_value_t = 4.5)]
    hint: f64,

    /// Line breaks written for each input newline
    #[arg(short = 'l', long = "newlines", default_value_t = 1)]
    newlines: usize,

    /// Font size in pixels
    #[arg(short = 'f', long = "font-size", default_value_t = 34)]
    font_size: u32,

    /// Dark mode: white text on a black background
    #[arg(short = 'd', long)]
    dark: bool,

    /// Stylesheet for chanting in the Samyok style
    #[arg(long)]
    samyok: bool,

    /// Noto fonts with a heavier weight for long syllables
    #[arg(long)]
    noto: bool,

    /// CSS file replacing the generated stylesheet and every style option
    #[arg(long)]
    css: Option<PathBuf>,

    /// Delete every match of this regular expression before processing
    #[arg(long = "re")]
    delete: Option<String>,

    /// Enable comments, delimited by the given marks, e.g. "[:]"
    #[arg(short = 'c', long = "comments")]
    comment_marks: Option<String>,

    /// Stats output file path
    #[arg(long)]
    stats_out: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(log_json: bool, verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if log_json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json, args.verbose);

    let run_start = Instant::now();
    let mut stats = RunStats::started_now();
    info!(?args, "Parsed CLI arguments");

    let format = if args.text { OutputFormat::Text } else { OutputFormat::Html };
    let transcriber = Transcriber::new(ChantConfig {
        hint_sensitivity: args.hint,
        plain_text: args.text,
        emphasize_optional_high: args.optional_high,
    })?;

    let comment_marks = args.comment_marks.as_deref().map(CommentMarks::parse).transpose()?;
    let user_css = match &args.css {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read CSS file {}", path.display()))?,
        ),
        None => None,
    };
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| generate_output_path(&args.input, format));

    info!("In: {}", args.input.display());
    info!("Out: {}", output_path.display());

    let (source, read_stats) = read_document(&args.input).await?;
    let prepared = prepare(
        &source,
        &PreprocessOptions {
            comment_marks,
            delete_pattern: args.delete.clone(),
        },
    )?;

    let processing_start = Instant::now();
    let transcript = transcriber.transcribe(&prepared.text);
    let options = RenderOptions {
        format,
        newline_count: args.newlines,
        style: StyleOptions {
            font_size: args.font_size,
            dark: args.dark,
            samyok: args.samyok,
            noto: args.noto,
            user_css,
        },
    };
    let rendered = render(&transcript, &prepared.comments, &options);
    let processing_time_ms = processing_start.elapsed().as_millis() as u64;

    write_output(&output_path, &rendered).await?;

    println!(
        "pali-chant v{} - wrote {} ({} syllables, {} segments, {} hints)",
        env!("CARGO_PKG_VERSION"),
        output_path.display(),
        transcript.syllable_count(),
        transcript.segments.len(),
        transcript.hint_summary.hints
    );

    if let Some(stats_path) = &args.stats_out {
        stats.input_path = args.input.display().to_string();
        stats.output_path = output_path.display().to_string();
        stats.bytes_read = read_stats.bytes_read;
        stats.record_transcript(&transcript);
        stats.ellipses = prepared.ellipses as u64;
        stats.comments = prepared.comments.len() as u64;
        stats.processing_time_ms = processing_time_ms;
        stats.total_time_ms = run_start.elapsed().as_millis() as u64;

        write_stats(stats_path, &stats).await?;
        info!("Stats written to {}", stats_path.display());
    }

    info!("Done in {}ms", run_start.elapsed().as_millis());
    Ok(())
}
