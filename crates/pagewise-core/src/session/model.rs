//! Reading-session view types exposed to the presentation surface.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the current page is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationMode {
    /// The document renderer draws the page itself.
    #[default]
    Native,
    /// The page text is shown after the bionic transform.
    Transformed,
}

impl PresentationMode {
    /// Returns the other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Native => Self::Transformed,
            Self::Transformed => Self::Native,
        }
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Transformed => f.write_str("transformed"),
        }
    }
}

/// What the presentation surface should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ViewContent {
    /// Render this page natively.
    Render { page: u32 },
    /// Show this cached transformed text.
    Transformed(String),
}

/// Snapshot of a reading session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub page: u32,
    /// `None` until the document finished loading.
    pub page_count: Option<u32>,
    pub mode: PresentationMode,
    pub content: ViewContent,
}

impl SessionView {
    /// "Page X of Y", with `?` while the page count is unknown.
    pub fn page_label(&self) -> String {
        match self.page_count {
            Some(count) => format!("Page {} of {}", self.page, count),
            None => format!("Page {} of ?", self.page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggled() {
        assert_eq!(PresentationMode::Native.toggled(), PresentationMode::Transformed);
        assert_eq!(PresentationMode::Transformed.toggled(), PresentationMode::Native);
    }

    #[test]
    fn test_page_label() {
        let mut view = SessionView {
            page: 3,
            page_count: None,
            mode: PresentationMode::Native,
            content: ViewContent::Render { page: 3 },
        };
        assert_eq!(view.page_label(), "Page 3 of ?");

        view.page_count = Some(12);
        assert_eq!(view.page_label(), "Page 3 of 12");
    }
}
