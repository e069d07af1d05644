pub mod context;
pub mod library;
pub mod progress;
pub mod read;
