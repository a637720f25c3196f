use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DarkroomError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to decode image: {0}")]
    Decode(PathBuf),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid parameters for '{op}': {reason}")]
    InvalidParams { op: String, reason: String },

    #[error("Unsupported arithmetic operation: {0}")]
    UnsupportedArithmetic(String),

    #[error("Missing operand: {0}")]
    MissingOperand(String),

    #[error("Step {index} ({op}) failed: {source}")]
    StepFailed {
        index: usize,
        op: String,
        #[source]
        source: Box<DarkroomError>,
    },

    #[error("Empty image sequence")]
    EmptySequence,

    #[error("Channel count mismatch: expected {expected}, got {got}")]
    ChannelMismatch { expected: usize, got: usize },

    #[error("Invalid channel count: {0} (expected 1 or 3)")]
    InvalidChannels(usize),
}

pub type Result<T> = std::result::Result<T, DarkroomError>;
