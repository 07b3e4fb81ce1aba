//! Error types for pattern and text validation.
//!
//! Lifecycle misuse of an [`Automaton`](crate::Automaton) (adding after
//! `build()`, stepping before it) is a bug in the caller and panics; it is
//! never reported through [`Error`].

use thiserror::Error;

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Rejected input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A pattern or text byte falls outside the configured alphabet.
    #[error("byte 0x{byte:02x} at position {position} is not in the {alphabet} alphabet")]
    InvalidSymbol {
        byte: u8,
        position: usize,
        alphabet: &'static str,
    },
}
