//! Text transform pipeline.
//!
//! Converts raw page text into a display-ready representation. Transforms are
//! pure: no I/O and no state beyond their configuration.

mod bionic;

pub use bionic::{BionicTransform, EmphasisStyle, fixation_len};

/// A pure text-to-text transform applied once per page.
///
/// Implementations must be deterministic. They are not required to be
/// idempotent under double application; callers cache the output instead of
/// re-applying.
pub trait TextTransform: Send + Sync {
    fn transform(&self, raw: &str) -> String;
}
