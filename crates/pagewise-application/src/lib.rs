pub mod session;

pub use session::{ModeChange, Navigation, NoticeReceiver, ReadingSession};
