//! ReadingSession - pagination, progress sync, and presentation mode for one
//! open document at a time.

use super::state::{Direction, SessionState};
use pagewise_core::document::{DocumentHandle, DocumentId, DocumentSource};
use pagewise_core::error::{PagewiseError, Result};
use pagewise_core::progress::ProgressStore;
use pagewise_core::session::{PresentationMode, SessionNotice, SessionView, SessionWarning};
use pagewise_core::transform::TextTransform;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};

/// Receiving end of the notices a session emits from background work.
pub type NoticeReceiver = mpsc::UnboundedReceiver<SessionNotice>;

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The current page changed and a save was scheduled.
    Moved { page: u32 },
    /// Nothing changed: no document, unknown page count, or at a boundary.
    Unchanged { page: Option<u32> },
}

impl Navigation {
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Result of a presentation mode request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeChange {
    /// The requested mode is now active.
    Applied(SessionView),
    /// The text arrived after the user moved or asked for another mode. It
    /// was cached under its page and the mode was left alone.
    Stale { page: u32 },
}

/// Identifies an in-flight extraction so its result can be matched against
/// the state it completes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ExtractionTag {
    epoch: u64,
    page: u32,
    request: u64,
}

/// Drives one reading session.
///
/// State lives behind `Arc<RwLock<..>>` and the lock is never held across a
/// call into the document source or progress store, so navigation stays
/// responsive while loads, saves, and extractions are in flight.
pub struct ReadingSession {
    state: Arc<RwLock<SessionState>>,
    document_source: Arc<dyn DocumentSource>,
    progress_store: Arc<dyn ProgressStore>,
    transform: Arc<dyn TextTransform>,
    notices: mpsc::UnboundedSender<SessionNotice>,
}

impl ReadingSession {
    /// Creates an idle session.
    ///
    /// # Arguments
    ///
    /// * `document_source` - Provides document bytes and page text
    /// * `progress_store` - Remote reading-position store
    /// * `transform` - Applied to page text in Transformed mode
    ///
    /// # Returns
    ///
    /// The session and the receiver for its background notices.
    pub fn new(
        document_source: Arc<dyn DocumentSource>,
        progress_store: Arc<dyn ProgressStore>,
        transform: Arc<dyn TextTransform>,
    ) -> (Self, NoticeReceiver) {
        let (notices, receiver) = mpsc::unbounded_channel();
        let session = Self {
            state: Arc::new(RwLock::new(SessionState::new())),
            document_source,
            progress_store,
            transform,
            notices,
        };
        (session, receiver)
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Opens a document, replacing whatever was open before.
    ///
    /// The previous session is torn down first. Bytes and saved progress are
    /// fetched concurrently; the first failure aborts the open with
    /// `PagewiseError::Load` and leaves the session unopened.
    ///
    /// # Returns
    ///
    /// The initial view, or `PagewiseError::Superseded` if another `open` or
    /// `close` happened while this one was loading.
    pub async fn open(&self, document_id: impl Into<DocumentId>) -> Result<SessionView> {
        let document_id = document_id.into();
        let epoch = self.state.write().await.teardown();
        tracing::info!(
            target: "reading_session",
            document = %document_id,
            epoch,
            "[ReadingSession] Opening document"
        );

        let fetched = tokio::try_join!(
            self.document_source.fetch_bytes(&document_id),
            self.progress_store.get(&document_id),
        );

        let (handle, persisted) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                let err = e.into_load(document_id.as_str());
                tracing::warn!(target: "reading_session", "[ReadingSession] {}", err);
                return Err(err);
            }
        };

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            tracing::debug!(
                target: "reading_session",
                document = %document_id,
                "[ReadingSession] Discarding superseded open"
            );
            return Err(PagewiseError::Superseded {
                document_id: document_id.to_string(),
            });
        }

        state.install(document_id.clone(), handle, persisted);
        tracing::info!(
            target: "reading_session",
            document = %document_id,
            page = state.current_page,
            page_count = ?state.page_count,
            "[ReadingSession] Document opened"
        );

        state.view().ok_or(PagewiseError::NoSession)
    }

    /// Reports the page count once the renderer knows it.
    ///
    /// Only the first report applies; later ones are ignored. The current
    /// page is clamped into range.
    pub async fn document_loaded(&self, page_count: u32) -> Result<SessionView> {
        if page_count == 0 {
            return Err(PagewiseError::InvalidPageCount(page_count));
        }

        let mut state = self.state.write().await;
        if !state.is_open() {
            return Err(PagewiseError::NoSession);
        }

        if state.apply_page_count(page_count) {
            tracing::debug!(
                target: "reading_session",
                page_count,
                page = state.current_page,
                "[ReadingSession] Page count known"
            );
        } else if state.page_count != Some(page_count) {
            tracing::debug!(
                target: "reading_session",
                "[ReadingSession] Ignoring page count {} (already {:?})",
                page_count,
                state.page_count
            );
        }

        state.view().ok_or(PagewiseError::NoSession)
    }

    /// Tears the session down. Pending saves still complete but no longer
    /// touch state.
    pub async fn close(&self) {
        let epoch = self.state.write().await.teardown();
        tracing::debug!(target: "reading_session", epoch, "[ReadingSession] Closed");
    }

    // ============================================================================
    // Navigation
    // ============================================================================

    pub async fn go_to_next_page(&self) -> Navigation {
        self.navigate(Direction::Next).await
    }

    pub async fn go_to_previous_page(&self) -> Navigation {
        self.navigate(Direction::Previous).await
    }

    pub async fn can_go_next(&self) -> bool {
        self.state.read().await.can_step(Direction::Next)
    }

    pub async fn can_go_previous(&self) -> bool {
        self.state.read().await.can_step(Direction::Previous)
    }

    async fn navigate(&self, direction: Direction) -> Navigation {
        let (epoch, document_id, page) = {
            let mut state = self.state.write().await;
            let Some(page) = state.step(direction) else {
                let page = state.is_open().then_some(state.current_page);
                return Navigation::Unchanged { page };
            };
            let Some(document) = state.document.as_ref() else {
                return Navigation::Unchanged { page: None };
            };
            (state.epoch, document.id.clone(), page)
        };

        tracing::debug!(
            target: "reading_session",
            document = %document_id,
            page,
            "[ReadingSession] Page changed"
        );
        self.persist_position(epoch, document_id, page);

        Navigation::Moved { page }
    }

    /// Saves `page` in the background. Completion order across saves is not
    /// guaranteed; the last write to reach the store wins.
    fn persist_position(&self, epoch: u64, document_id: DocumentId, page: u32) {
        let store = self.progress_store.clone();
        let state = self.state.clone();
        let notices = self.notices.clone();

        tokio::spawn(async move {
            match store.set(&document_id, page).await {
                Ok(()) => {
                    {
                        let mut state = state.write().await;
                        if state.epoch == epoch {
                            state.persisted_position = Some(page);
                        }
                    }
                    tracing::trace!(
                        target: "reading_session",
                        document = %document_id,
                        page,
                        "[ReadingSession] Position saved"
                    );
                    let _ = notices.send(SessionNotice::PositionPersisted { document_id, page });
                }
                Err(e) => {
                    tracing::warn!(
                        target: "reading_session",
                        document = %document_id,
                        page,
                        "[ReadingSession] Failed to save position: {}",
                        e
                    );
                    let warning = SessionWarning::ProgressNotSaved {
                        document_id,
                        page,
                        reason: e.to_string(),
                    };
                    let _ = notices.send(SessionNotice::Warning(warning));
                }
            }
        });
    }

    // ============================================================================
    // Presentation mode
    // ============================================================================

    /// Switches presentation mode.
    ///
    /// Native applies immediately. Transformed uses cached text for the
    /// current page or extracts and transforms it first. Extraction failures
    /// leave the mode unchanged and return `PagewiseError::Retrieval`.
    pub async fn set_presentation_mode(&self, mode: PresentationMode) -> Result<ModeChange> {
        let (tag, handle) = {
            let mut state = self.state.write().await;
            let Some(document) = state.document.as_ref() else {
                return Err(PagewiseError::NoSession);
            };
            let handle = document.handle.clone();
            state.mode_request += 1;

            if mode == PresentationMode::Native
                || state.transformed_text.contains_key(&state.current_page)
            {
                state.mode = mode;
                return state
                    .view()
                    .map(ModeChange::Applied)
                    .ok_or(PagewiseError::NoSession);
            }

            let tag = ExtractionTag {
                epoch: state.epoch,
                page: state.current_page,
                request: state.mode_request,
            };
            (tag, handle)
        };

        tracing::debug!(
            target: "reading_session",
            document = %handle.id(),
            page = tag.page,
            "[ReadingSession] Extracting page text"
        );
        let extracted = self.extract_transformed(&handle, tag.page).await;

        let mut state = self.state.write().await;
        if state.epoch != tag.epoch {
            tracing::debug!(
                target: "reading_session",
                document = %handle.id(),
                "[ReadingSession] Discarding extraction from a previous session"
            );
            return Err(PagewiseError::Superseded {
                document_id: handle.id().to_string(),
            });
        }

        let text = match extracted {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    target: "reading_session",
                    document = %handle.id(),
                    page = tag.page,
                    "[ReadingSession] Text extraction failed: {}",
                    e
                );
                let _ = self
                    .notices
                    .send(SessionNotice::Warning(SessionWarning::ExtractionFailed {
                        document_id: handle.id().clone(),
                        page: tag.page,
                        reason: e.to_string(),
                    }));
                return Err(e);
            }
        };

        state.transformed_text.entry(tag.page).or_insert(text);

        if state.mode_request != tag.request || state.current_page != tag.page {
            tracing::debug!(
                target: "reading_session",
                requested = tag.page,
                current = state.current_page,
                "[ReadingSession] Cached text, newer page or mode request wins"
            );
            return Ok(ModeChange::Stale { page: tag.page });
        }

        state.mode = PresentationMode::Transformed;
        state
            .view()
            .map(ModeChange::Applied)
            .ok_or(PagewiseError::NoSession)
    }

    /// Flips between Native and Transformed.
    pub async fn toggle_presentation_mode(&self) -> Result<ModeChange> {
        let mode = self.state.read().await.mode;
        self.set_presentation_mode(mode.toggled()).await
    }

    async fn extract_transformed(&self, handle: &DocumentHandle, page: u32) -> Result<String> {
        let raw = self.document_source.fetch_page_text(handle, page).await?;
        let text = self.transform.transform(&raw);
        Ok(text)
    }

    // ============================================================================
    // Queries
    // ============================================================================

    /// Snapshot for the presentation surface, or `None` when nothing is open.
    pub async fn current_view(&self) -> Option<SessionView> {
        self.state.read().await.view()
    }

    pub async fn document_id(&self) -> Option<DocumentId> {
        self.state
            .read()
            .await
            .document
            .as_ref()
            .map(|document| document.id.clone())
    }

    /// The opened document's handle, for a renderer.
    pub async fn document(&self) -> Option<DocumentHandle> {
        self.state
            .read()
            .await
            .document
            .as_ref()
            .map(|document| document.handle.clone())
    }

    /// Last position known to be stored remotely for the open document, as
    /// stored. It can exceed the page count while `current_page` is clamped.
    pub async fn persisted_position(&self) -> Option<u32> {
        self.state.read().await.persisted_position
    }

    /// Pages with cached transformed text, ascending.
    pub async fn transformed_pages(&self) -> Vec<u32> {
        let state = self.state.read().await;
        let mut pages: Vec<u32> = state.transformed_text.keys().copied().collect();
        pages.sort_unstable();
        pages
    }
}
