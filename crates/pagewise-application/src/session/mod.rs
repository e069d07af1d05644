//! Reading session controller.
//!
//! # Module Structure
//!
//! - `reading_session`: `ReadingSession`, the async controller
//! - `state`: mutable per-document state and its invariants

mod reading_session;
mod state;

pub use reading_session::{ModeChange, Navigation, NoticeReceiver, ReadingSession};
