//! Local file input, optionally LZ4-frame compressed.

use super::{split_lines, LineSource, SourceError};
use async_trait::async_trait;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileLineSource {
    path: PathBuf,
}

impl FileLineSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file name ends in `.lz4`.
    pub fn is_lz4(&self) -> bool {
        self.path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("lz4"))
            .unwrap_or(false)
    }

    pub fn decompress_lz4_frame(lz4_bytes: &[u8]) -> Result<Vec<u8>, SourceError> {
        let mut decoder = lz4_flex::frame::FrameDecoder::new(lz4_bytes);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|e| SourceError::Decode(format!("lz4: {}", e)))?;
        Ok(out)
    }
}

#[async_trait]
impl LineSource for FileLineSource {
    async fn read_lines(&self) -> Result<Vec<String>, SourceError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|e| SourceError::Io(format!("{}: {}", self.path.display(), e)))?;

        let bytes = if self.is_lz4() {
            Self::decompress_lz4_frame(&raw)?
        } else {
            raw
        };

        let text = String::from_utf8(bytes)
            .map_err(|e| SourceError::Decode(format!("{}: {}", self.path.display(), e)))?;
        Ok(split_lines(&text))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
