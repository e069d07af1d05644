//! Reading-session domain module.
//!
//! This module contains the types a reading session exposes to its callers.
//! The session controller itself lives in `pagewise-application`.
//!
//! # Module Structure
//!
//! - `model`: `PresentationMode`, `SessionView`, `ViewContent`
//! - `notice`: `SessionNotice`, `SessionWarning`

mod model;
mod notice;

pub use model::{PresentationMode, SessionView, ViewContent};
pub use notice::{SessionNotice, SessionWarning};
