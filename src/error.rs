//! Error types shared by every codec and pipeline stage.
//!
//! Validation failures ([`Error::Argument`], [`Error::FileNotFound`],
//! [`Error::Format`]) are returned synchronously before any thread starts.
//! Runtime failures ([`Error::Io`], [`Error::Codec`]) are raised inside a
//! stage, reported once through the run's error channel, and surfaced to the
//! caller after every stage has been joined.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Where an error originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Precondition checks, before any thread starts.
    Validate,
    /// Splits the source file into chunks.
    Reader,
    /// Compresses or decompresses individual chunks.
    Transform,
    /// Serializes chunks to the target file.
    Writer,
    /// Single-threaded whole-stream codec.
    Direct,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::Reader => "reader",
            Stage::Transform => "transform",
            Stage::Writer => "writer",
            Stage::Direct => "direct",
        };
        f.write_str(name)
    }
}

/// The error type for every public operation in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument is blank or otherwise unusable.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// The source file does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Decompression was requested on a file lacking the expected extension.
    #[error("unsupported format: {} (expected a {expected} file)", path.display())]
    Format { path: PathBuf, expected: &'static str },

    /// A read or write failed while a stage was running.
    #[error("I/O error in {stage} stage: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: io::Error,
    },

    /// Compressed data or a frame header could not be decoded.
    #[error("codec error in {stage} stage: {message}")]
    Codec { stage: Stage, message: String },

    /// A stage thread terminated abnormally.
    #[error("{stage} stage failed: {message}")]
    Stage { stage: Stage, message: String },
}

impl Error {
    /// Stage the error was raised in.
    pub fn stage(&self) -> Stage {
        match self {
            Error::Argument(_) | Error::FileNotFound(_) | Error::Format { .. } => Stage::Validate,
            Error::Io { stage, .. } | Error::Codec { stage, .. } | Error::Stage { stage, .. } => {
                *stage
            }
        }
    }

    /// Short name of the error kind, used in CLI diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::Argument(_) => "ArgumentError",
            Error::FileNotFound(_) => "FileNotFoundError",
            Error::Format { .. } => "FormatError",
            Error::Io { .. } => "IOError",
            Error::Codec { .. } => "CodecError",
            Error::Stage { .. } => "StageError",
        }
    }

    pub(crate) fn io(stage: Stage, source: io::Error) -> Self {
        Error::Io { stage, source }
    }

    pub(crate) fn codec(stage: Stage, message: impl Into<String>) -> Self {
        Error::Codec {
            stage,
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
