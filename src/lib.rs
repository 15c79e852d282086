//! ChessVoice Library
//!
//! Resolves spoken chess moves and assistant commands from speech
//! transcripts.

pub mod assistant;
pub mod audit;
pub mod commands;
pub mod config;
pub mod confirmation;
pub mod core;
pub mod error;
pub mod game;
pub mod processor;
pub mod rules;
pub mod session;
pub mod utils;

pub use error::{VoiceError, VoiceResult};
pub use processor::{Reprompt, ResolutionResult, ResolutionTrace, VoiceResolver};
pub use rules::{Position, RulesEngine};
pub use session::SessionState;
