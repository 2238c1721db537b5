// src/error.rs
use thiserror::Error;

/// Failures reported by a native font engine implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Native font creation failed for {name}: {reason}")]
    FontCreationFailed { name: String, reason: String },

    #[error("Native strike creation failed: {reason}")]
    StrikeCreationFailed { reason: String },

    #[error("Native engine unavailable: {message}")]
    Unavailable { message: String },
}

/// Errors raised by descriptor operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    #[error("Cannot derive an italic variant of already italic font: {name}")]
    AlreadyItalic { name: String },

    #[error("Native font unavailable: {name}")]
    NativeFontUnavailable { name: String },

    #[error("Invalid configuration: {field} = {value}")]
    ConfigurationError { field: String, value: String },
}

/// Errors raised while drawing text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Character range out of bounds: offset={offset}, length={length} in buffer of {len}")]
    InvalidRange { offset: usize, length: usize, len: usize },

    #[error("Fill failed on {surface}: {message}")]
    FillFailed { surface: String, message: String },

    #[error("Shaping failed: {message}")]
    ShapingFailed { message: String },
}

pub type FontResult<T> = Result<T, FontError>;
pub type RenderResult<T> = Result<T, RenderError>;
