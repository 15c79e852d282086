//! ChessVoice Error Types
//!
//! Centralized error handling. Failing to understand the player is never an
//! error (see `ResolutionResult::Unresolved`); these cover configuration,
//! rules-engine setup and I/O.

use thiserror::Error;

/// Central error type for ChessVoice
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Rules engine error: {0}")]
    Rules(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for ChessVoice operations
pub type VoiceResult<T> = Result<T, VoiceError>;
