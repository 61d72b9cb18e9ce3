use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, BufReader};
use tracing::{debug, info};

/// Configuration for document reading
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { buffer_size: 8192 }
    }
}

/// Statistics for one document read
#[derive(Debug, Clone, Default)]
pub struct ReadStats {
    pub file_path: String,
    pub lines_read: u64,
    pub bytes_read: u64,
    pub duration_ms: u64,
}

/// Async reader that loads a whole UTF-8 document, newlines untouched
pub struct DocumentReader {
    config: ReaderConfig,
}

impl DocumentReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub async fn read_document<P: AsRef<Path>>(&self, file_path: P) -> Result<(String, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of file: {}", path.display());

        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open input file {} (run with --help for usage)", path.display()))?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .await
            .with_context(|| format!("UTF-8 decoding error in {}", path.display()))?;

        let stats = ReadStats {
            file_path: path.display().to_string(),
            lines_read: text.lines().count() as u64,
            bytes_read: text.len() as u64,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Read {}: {} lines, {} bytes in {}ms",
            stats.file_path, stats.lines_read, stats.bytes_read, stats.duration_ms
        );
        Ok((text, stats))
    }
}

/// Read a single document with default configuration
pub async fn read_document<P: AsRef<Path>>(file_path: P) -> Result<(String, ReadStats)> {
    DocumentReader::new(ReaderConfig::default()).read_document(file_path).await
}
