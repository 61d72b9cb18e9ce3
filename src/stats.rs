// Run statistics report written as JSON with --stats-out

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::chant::Transcript;

/// Counters for one transcribed document
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    /// Seconds since the Unix epoch when the run started
    pub run_start: u64,
    pub input_path: String,
    pub output_path: String,
    pub bytes_read: u64,
    pub units: u64,
    /// Share of units matched verbatim from the grapheme tables
    pub literal_match_ratio: f64,
    /// Relevant syllables only
    pub syllables: u64,
    pub segments: u64,
    pub hinted_segments: u64,
    pub hints: u64,
    pub true_high: u64,
    pub optional_high: u64,
    pub ellipses: u64,
    pub comments: u64,
    pub processing_time_ms: u64,
    pub total_time_ms: u64,
}

impl RunStats {
    pub fn started_now() -> Self {
        let run_start = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            run_start,
            ..Self::default()
        }
    }

    /// Copy the transcript counters into the report
    pub fn record_transcript(&mut self, transcript: &Transcript) {
        self.units = transcript.token_stats.total() as u64;
        self.literal_match_ratio = transcript.token_stats.literal_ratio();
        self.syllables = transcript.syllable_count() as u64;
        self.segments = transcript.segments.len() as u64;
        self.hinted_segments = transcript.hint_summary.hinted_segments as u64;
        self.hints = transcript.hint_summary.hints as u64;
        self.true_high = transcript.true_high_count() as u64;
        self.optional_high = transcript.optional_high_count() as u64;
    }
}

/// Write the stats report as pretty-printed JSON
pub async fn write_stats(stats_path: &Path, stats: &RunStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats).context("Failed to serialize run stats")?;
    let file = tokio::fs::File::create(stats_path)
        .await
        .with_context(|| format!("Failed to create stats file {}", stats_path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
