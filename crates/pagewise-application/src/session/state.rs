use pagewise_core::document::{DocumentHandle, DocumentId};
use pagewise_core::session::{PresentationMode, SessionView, ViewContent};
use std::collections::HashMap;

/// Direction of a single-page move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Previous,
    Next,
}

/// The loaded part of a session. Present only between a successful open and
/// the next teardown.
pub(crate) struct OpenDocument {
    pub id: DocumentId,
    pub handle: DocumentHandle,
}

/// Mutable state owned by one `ReadingSession`.
///
/// Invariants once `page_count` is known: `1 <= current_page <= page_count`.
/// `mode == Transformed` implies `transformed_text` has `current_page`.
pub(crate) struct SessionState {
    /// Bumped on every teardown; tags all asynchronous work.
    pub epoch: u64,
    pub document: Option<OpenDocument>,
    pub page_count: Option<u32>,
    pub current_page: u32,
    /// Last position known to be in the progress store, as stored. Not
    /// clamped: a stored 42 in a 10 page document stays 42 until a move
    /// overwrites it.
    pub persisted_position: Option<u32>,
    pub mode: PresentationMode,
    /// Bumped on every mode request and every page move. An extraction only
    /// switches the mode if nothing newer happened while it ran.
    pub mode_request: u64,
    pub transformed_text: HashMap<u32, String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            epoch: 0,
            document: None,
            page_count: None,
            current_page: 1,
            persisted_position: None,
            mode: PresentationMode::Native,
            mode_request: 0,
            transformed_text: HashMap::new(),
        }
    }

    /// Drops everything about the current document and starts a new epoch.
    pub fn teardown(&mut self) -> u64 {
        let epoch = self.epoch + 1;
        *self = Self::new();
        self.epoch = epoch;
        epoch
    }

    /// Installs a freshly loaded document. Only `current_page` is clamped;
    /// `persisted_position` keeps the stored value.
    pub fn install(&mut self, id: DocumentId, handle: DocumentHandle, persisted: u32) {
        let page_count = handle.page_count().filter(|count| *count > 0);
        self.current_page = match page_count {
            Some(count) => persisted.clamp(1, count),
            None => persisted.max(1),
        };
        self.page_count = page_count;
        self.persisted_position = Some(persisted);
        self.document = Some(OpenDocument { id, handle });
    }

    /// Sets the page count if it is still unknown. Returns whether it applied.
    pub fn apply_page_count(&mut self, page_count: u32) -> bool {
        if self.page_count.is_some() || page_count == 0 {
            return false;
        }
        self.page_count = Some(page_count);
        self.current_page = self.current_page.clamp(1, page_count);
        true
    }

    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    pub fn can_step(&self, direction: Direction) -> bool {
        match (self.page_count, direction) {
            (Some(_), Direction::Previous) => self.current_page > 1,
            (Some(count), Direction::Next) => self.current_page < count,
            (None, _) => false,
        }
    }

    /// Moves one page, clamped. Returns the new page, or `None` for a no-op.
    ///
    /// Leaving Transformed mode happens here when the target page has no
    /// cached text yet.
    pub fn step(&mut self, direction: Direction) -> Option<u32> {
        if !self.is_open() || !self.can_step(direction) {
            return None;
        }

        self.current_page = match direction {
            Direction::Previous => self.current_page - 1,
            Direction::Next => self.current_page + 1,
        };
        self.mode_request += 1;

        if self.mode == PresentationMode::Transformed
            && !self.transformed_text.contains_key(&self.current_page)
        {
            self.mode = PresentationMode::Native;
        }

        Some(self.current_page)
    }

    pub fn view(&self) -> Option<SessionView> {
        self.document.as_ref()?;

        let content = match (self.mode, self.transformed_text.get(&self.current_page)) {
            (PresentationMode::Transformed, Some(text)) => ViewContent::Transformed(text.clone()),
            _ => ViewContent::Render {
                page: self.current_page,
            },
        };

        Some(SessionView {
            page: self.current_page,
            page_count: self.page_count,
            mode: self.mode,
            content,
        })
    }
}
