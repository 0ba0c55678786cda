//! Encoded input sources: files and shared readers.

use std::{
    fmt,
    io::{self, Read},
    sync::Arc,
};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use parking_lot::Mutex;
use serde_yaml::Value;
use tracing::debug;

use super::SourceError;
use crate::{StratumResult, StratumResultExt, codec::Codecs, merge::DecodeError};

/// A reader shared between the provider and the sources it produced.
///
/// Equality is identity: two handles are equal when they wrap the same
/// reader.
#[derive(Clone)]
pub struct SharedReader(Arc<Mutex<Box<dyn Read + Send>>>);

impl SharedReader {
    /// Share `reader`.
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        Self(Arc::new(Mutex::new(Box::new(reader))))
    }

    /// Read everything remaining in the stream.
    ///
    /// # Errors
    ///
    /// Propagates the underlying I/O error.
    pub fn read_all(&self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.0.lock().read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}

impl PartialEq for SharedReader {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SharedReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedReader")
            .field(&Arc::as_ptr(&self.0))
            .finish()
    }
}

/// Where encoded input comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    /// A file on disk.
    File(Utf8PathBuf),
    /// A stream such as standard input.
    Reader(SharedReader),
}

/// Return the parent directory of `path`, falling back to `"."` when the path
/// has no parent or the parent is empty.
fn parent_or_dot(path: &Utf8Path) -> &Utf8Path {
    path.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."))
}

/// Read `path` through a capability handle on its parent directory.
fn read_file(path: &Utf8Path) -> io::Result<Vec<u8>> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("cannot determine file name for configuration path"))?;
    let dir = Dir::open_ambient_dir(parent_or_dot(path), ambient_authority())?;
    dir.read(file_name)
}

impl Input {
    /// Read the whole input.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] naming the file or stream on I/O failure.
    pub fn read(&self) -> Result<Vec<u8>, SourceError> {
        match self {
            Self::File(path) => read_file(path).map_err(|source| SourceError::ReadFile {
                path: path.clone(),
                source,
            }),
            Self::Reader(reader) => reader.read_all().map_err(SourceError::ReadStream),
        }
    }
}

/// Encoded input together with its format tag.
#[derive(Clone, Debug, PartialEq)]
pub struct InputSource {
    /// Where the bytes come from.
    pub input: Input,
    /// Codec format tag, e.g. `yaml`.
    pub format: String,
}

impl InputSource {
    /// Pair `input` with `format`.
    #[must_use]
    pub fn new(input: Input, format: impl Into<String>) -> Self {
        Self {
            input,
            format: format.into(),
        }
    }

    /// A file source.
    #[must_use]
    pub fn file(path: impl Into<Utf8PathBuf>, format: impl Into<String>) -> Self {
        Self::new(Input::File(path.into()), format)
    }

    /// Read and decode the input.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StratumError::Decode`] when no codec handles the format
    /// or the codec rejects the bytes, and [`crate::StratumError::Source`] when
    /// the input cannot be read.
    pub fn values(&self, codecs: &Codecs) -> StratumResult<Value> {
        let codec = codecs
            .get(&self.format)
            .ok_or_else(|| DecodeError::UnknownFormat {
                format: self.format.clone(),
            })
            .decoded_from(self)?;
        let bytes = self.input.read()?;
        debug!(source = %self, bytes = bytes.len(), "read configuration input");
        codec.decode(&mut bytes.as_slice()).decoded_from(self)
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.input {
            Input::File(path) => write!(f, "file '{path}' ({})", self.format),
            Input::Reader(_) => write!(f, "stdin ({})", self.format),
        }
    }
}
