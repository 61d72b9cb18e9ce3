// Output path derivation and writing for rendered chant files

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;

use crate::render::OutputFormat;

/// `<stem>_chant.htm` or `<stem>_chant.txt` next to the input file
pub fn generate_output_path(input_path: &Path, format: OutputFormat) -> PathBuf {
    let mut output_path = input_path.to_path_buf();
    let file_stem = output_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output_path.set_file_name(format!("{file_stem}_chant.{}", format.extension()));
    output_path
}

/// Write the rendered document, creating or truncating the file
pub async fn write_output(output_path: &Path, content: &str) -> Result<()> {
    let file = tokio::fs::File::create(output_path)
        .await
        .with_context(|| format!("Failed to create output file {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes()).await?;
    writer.flush().await?;

    info!("Wrote {} bytes to {}", content.len(), output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_output_path() {
        let html = generate_output_path(Path::new("/chants/morning.txt"), OutputFormat::Html);
        assert_eq!(html, PathBuf::from("/chants/morning_chant.htm"));

        let text = generate_output_path(Path::new("evening"), OutputFormat::Text);
        assert_eq!(text, PathBuf::from("evening_chant.txt"));
    }

    #[tokio::test]
    async fn test_write_output() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.txt");

        write_output(&path, "HO⸱mi").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "HO⸱mi");

        write_output(&path, "sam").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "sam");
    }

    #[tokio::test]
    async fn test_write_output_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("out.htm");
        assert!(write_output(&path, "x").await.is_err());
    }
}
