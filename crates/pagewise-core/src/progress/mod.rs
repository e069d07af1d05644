//! Reading progress domain module.

mod store;

pub use store::{FIRST_PAGE, ProgressStore, normalize_position};
