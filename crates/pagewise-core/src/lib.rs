pub mod config;
pub mod document;
pub mod error;
pub mod progress;
pub mod session;
pub mod transform;

// Re-export common error type
pub use error::PagewiseError;
