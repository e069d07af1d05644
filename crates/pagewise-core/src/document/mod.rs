//! Document domain module.
//!
//! # Module Structure
//!
//! - `model`: `DocumentId` and the loaded `DocumentHandle`
//! - `source`: `DocumentSource` trait (bytes + page text)
//! - `library`: `DocumentLibrary` trait (list/delete)

mod library;
mod model;
mod source;

pub use library::DocumentLibrary;
pub use model::{DocumentHandle, DocumentId};
pub use source::DocumentSource;
