// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{
    fs::File,
    io::{self, Read},
    path::PathBuf,
};

/// The response body before any content coding is applied. File-backed
/// bodies are read lazily, in chunks, so they can be hashed or compressed
/// without holding them in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Content {
    #[default]
    Empty,
    Bytes(Vec<u8>),

    /// The body is the concatenation of these files, in order.
    Files(Vec<PathBuf>),
}

impl Content {
    /// Appends bytes. Appending to a file-backed body is refused and returns
    /// `false`, as mixing the two kinds has no defined order.
    pub fn append_bytes(&mut self, data: &[u8]) -> bool {
        match self {
            Content::Empty => {
                *self = Content::Bytes(data.to_vec());
                true
            }
            Content::Bytes(bytes) => {
                bytes.extend_from_slice(data);
                true
            }
            Content::Files(_) => false,
        }
    }

    /// Appends a file. Refused (`false`) when the body is currently a byte
    /// buffer.
    pub fn append_file(&mut self, path: PathBuf) -> bool {
        match self {
            Content::Empty => {
                *self = Content::Files(vec![path]);
                true
            }
            Content::Files(files) => {
                files.push(path);
                true
            }
            Content::Bytes(_) => false,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Empty => true,
            Content::Bytes(bytes) => bytes.is_empty(),
            Content::Files(files) => files.is_empty(),
        }
    }

    #[must_use]
    pub fn is_file_backed(&self) -> bool {
        matches!(self, Content::Files(_))
    }

    /// The length of the body in bytes. For file-backed bodies this comes
    /// from the file metadata, the files aren't read.
    pub fn size(&self) -> io::Result<u64> {
        match self {
            Content::Empty => Ok(0),
            Content::Bytes(bytes) => Ok(bytes.len() as u64),
            Content::Files(files) => {
                let mut total = 0;
                for path in files {
                    total += std::fs::metadata(path)?.len();
                }
                Ok(total)
            }
        }
    }

    /// Feeds the body to `consumer` in chunks of at most `chunk_size` bytes.
    pub fn for_each_chunk<F>(&self, chunk_size: usize, mut consumer: F) -> io::Result<()>
            where F: FnMut(&[u8]) -> io::Result<()> {
        let chunk_size = chunk_size.max(1);
        match self {
            Content::Empty => Ok(()),
            Content::Bytes(bytes) => {
                for chunk in bytes.chunks(chunk_size) {
                    consumer(chunk)?;
                }
                Ok(())
            }
            Content::Files(files) => {
                let mut buffer = vec![0; chunk_size];
                for path in files {
                    let mut file = File::open(path)?;
                    loop {
                        let read = file.read(&mut buffer)?;
                        if read == 0 {
                            break;
                        }
                        consumer(&buffer[..read])?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Reads the whole body into memory, unless it is at least `ceiling`
    /// bytes large, in which case `None` is returned and nothing is read.
    pub fn read_to_vec(&self, ceiling: Option<u64>) -> io::Result<Option<Vec<u8>>> {
        let size = self.size()?;
        if ceiling.is_some_and(|ceiling| size >= ceiling) {
            tracing::debug!(size, ?ceiling, "body not buffered, it exceeds the ceiling");
            return Ok(None);
        }

        if let Content::Bytes(bytes) = self {
            return Ok(Some(bytes.clone()));
        }

        let mut result = Vec::with_capacity(size as usize);
        self.for_each_chunk(64 * 1024, |chunk| {
            result.extend_from_slice(chunk);
            Ok(())
        })?;
        Ok(Some(result))
    }
}
