//! Follows an append-only file from its end.
//!
//! Only content written after [`TailReader::open`] is ever returned, and a
//! line is only returned once its terminating newline has been written.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Seek, SeekFrom},
    path::Path,
};

use tracing::debug;

use crate::error::FeedError;

/// Anything the run loop can pull complete lines from.
pub trait LineSource {
    /// Next complete line, or `Ok(None)` if nothing new has been written.
    fn next_line(&mut self) -> Result<Option<String>, FeedError>;
}

/// Cursor into a growing file.
pub struct TailReader {
    reader: BufReader<File>,
    /// Bytes of an unterminated trailing line seen so far.
    pending: Vec<u8>,
    /// Byte offset just past the last byte read.
    offset: u64,
}

impl TailReader {
    /// Opens `path` positioned at its current end.
    ///
    /// Fails with `FeedError::FileMissing` when the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FeedError::FileMissing(path.to_path_buf()),
            _ => FeedError::Io(e),
        })?;
        let offset = file.seek(SeekFrom::End(0))?;
        debug!(path = %path.display(), offset, "tail opened at end of file");

        Ok(Self {
            reader: BufReader::new(file),
            pending: Vec::new(),
            offset,
        })
    }

    /// Byte offset of the read cursor.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl LineSource for TailReader {
    fn next_line(&mut self) -> Result<Option<String>, FeedError> {
        let read = self.reader.read_until(b'\n', &mut self.pending)?;
        self.offset += read as u64;

        if self.pending.last() != Some(&b'\n') {
            // Nothing new, or a line still being written.
            return Ok(None);
        }

        let mut bytes = std::mem::take(&mut self.pending);
        bytes.pop();
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
        Ok(Some(line))
    }
}
