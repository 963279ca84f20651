// Core question-answering functionality:
// - Bridge from a user query to a display-ready answer
// - HTTP client for the text-generation API
// - Request/response data structures
// - Configuration loading
// - Shared error types

// Export bridge module - query -> answer boundary used by the UI shells
pub mod bridge;
pub use bridge::*;

// Export client module - API client for the upstream
pub mod client;
pub use client::*;

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use self::config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;
