//! Zip container for finished slices

use std::io::{Cursor, Write};

use log::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::SliceResult;

use super::format::SliceFormat;

/// In-memory zip archive written strictly in append order
pub struct SliceArchive {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    compression: CompressionMethod,
    entries: usize,
}

impl SliceArchive {
    /// Create an empty archive for slices of `format`
    pub fn new(format: SliceFormat) -> Self {
        SliceArchive {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            compression: format.archive_compression(),
            entries: 0,
        }
    }

    /// Append one file
    pub fn append(&mut self, name: &str, data: &[u8]) -> SliceResult<()> {
        let options = SimpleFileOptions::default()
            .compression_method(self.compression)
            .unix_permissions(0o644);
        self.writer.start_file(name, options)?;
        self.writer.write_all(data)?;
        self.entries += 1;
        debug!("Appended {} to archive ({} entries)", name, self.entries);
        Ok(())
    }

    /// Number of files appended so far
    pub fn len(&self) -> usize {
        self.entries
    }

    /// True when nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Write the central directory and return the archive bytes
    pub fn finish(self) -> SliceResult<Vec<u8>> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}
