//! Notices delivered from background session work.

use crate::document::DocumentId;
use serde::{Deserialize, Serialize};

/// Non-blocking problem the user should hear about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionWarning {
    /// Saving the reading position failed; the displayed page is unaffected.
    ProgressNotSaved {
        document_id: DocumentId,
        page: u32,
        reason: String,
    },
    /// Page text could not be extracted; presentation stays as it was.
    ExtractionFailed {
        document_id: DocumentId,
        page: u32,
        reason: String,
    },
}

impl SessionWarning {
    /// Short user-facing message.
    pub fn message(&self) -> String {
        match self {
            Self::ProgressNotSaved { page, reason, .. } => {
                format!("Could not save reading position (page {page}): {reason}")
            }
            Self::ExtractionFailed { page, reason, .. } => {
                format!("Could not extract text for page {page}: {reason}")
            }
        }
    }
}

/// Event emitted by a reading session outside the caller's await.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SessionNotice {
    /// The progress store acknowledged a position.
    PositionPersisted { document_id: DocumentId, page: u32 },
    /// Something failed without affecting the displayed page.
    Warning(SessionWarning),
}

impl SessionNotice {
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }
}
