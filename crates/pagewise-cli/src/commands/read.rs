//! Interactive reader loop.

use super::context::Services;
use anyhow::{Context, Result};
use pagewise_application::{ModeChange, Navigation, NoticeReceiver, ReadingSession};
use pagewise_core::session::{
    PresentationMode, SessionNotice, SessionView, SessionWarning, ViewContent,
};
use pagewise_core::transform::{BionicTransform, EmphasisStyle};
use pagewise_infrastructure::pdf_text;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "n: next  p: previous  b: toggle bionic  v: view  q: quit";

/// Tracks position saves that have not reported back yet.
struct Notices {
    receiver: NoticeReceiver,
    pending_saves: usize,
}

impl Notices {
    fn new(receiver: NoticeReceiver) -> Self {
        Self {
            receiver,
            pending_saves: 0,
        }
    }

    fn handle(&mut self, notice: SessionNotice) {
        match notice {
            SessionNotice::PositionPersisted { document_id, page } => {
                self.pending_saves = self.pending_saves.saturating_sub(1);
                tracing::debug!("[Reader] Saved '{}' at page {}", document_id, page);
            }
            SessionNotice::Warning(warning) => {
                if matches!(warning, SessionWarning::ProgressNotSaved { .. }) {
                    self.pending_saves = self.pending_saves.saturating_sub(1);
                }
                eprintln!("warning: {}", warning.message());
            }
        }
    }

    fn drain(&mut self) {
        while let Ok(notice) = self.receiver.try_recv() {
            self.handle(notice);
        }
    }

    /// Waits for outstanding saves, giving up after `timeout`.
    async fn settle(&mut self, timeout: Duration) {
        let wait = async {
            while self.pending_saves > 0 {
                match self.receiver.recv().await {
                    Some(notice) => self.handle(notice),
                    None => break,
                }
            }
        };
        if tokio::time::timeout(timeout, wait).await.is_err() {
            eprintln!("warning: gave up waiting for the reading position to be saved");
        }
    }
}

pub async fn run(services: &Services, id: &str, bionic: bool, markers: EmphasisStyle) -> Result<()> {
    let (session, receiver) = ReadingSession::new(
        services.source.clone(),
        services.progress.clone(),
        Arc::new(BionicTransform::new(markers)),
    );
    let mut notices = Notices::new(receiver);

    let mut view = session.open(id).await?;
    if view.page_count.is_none() {
        view = report_page_count(&session).await?.unwrap_or(view);
    }
    if bionic {
        if let Some(applied) = set_mode(&session, PresentationMode::Transformed).await? {
            view = applied;
        }
    }

    print_view(&view);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        notices.drain();
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match line.trim() {
            "n" => navigated(&session, session.go_to_next_page().await, &mut notices).await,
            "p" => navigated(&session, session.go_to_previous_page().await, &mut notices).await,
            "b" => match session.toggle_presentation_mode().await {
                Ok(ModeChange::Applied(view)) => print_view(&view),
                Ok(ModeChange::Stale { .. }) => {}
                // The session already sent a warning notice for this
                Err(e) if e.is_retrieval() => {}
                Err(e) => eprintln!("error: {}", e),
            },
            "v" => {
                if let Some(view) = session.current_view().await {
                    print_view(&view);
                }
            }
            "q" | "quit" => break,
            "" => {}
            _ => println!("{HELP}"),
        }
    }

    notices.settle(services.timeout()).await;
    session.close().await;
    Ok(())
}

/// Stands in for the renderer: counts pages when the source could not.
async fn report_page_count(session: &ReadingSession) -> Result<Option<SessionView>> {
    let Some(handle) = session.document().await else {
        return Ok(None);
    };

    let counted = tokio::task::spawn_blocking(move || pdf_text::page_count(handle.bytes()))
        .await
        .context("Page counting task failed")?;

    match counted {
        Ok(count) => Ok(Some(session.document_loaded(count).await?)),
        Err(e) => {
            eprintln!("warning: page count unavailable, navigation disabled: {}", e);
            Ok(None)
        }
    }
}

async fn set_mode(session: &ReadingSession, mode: PresentationMode) -> Result<Option<SessionView>> {
    match session.set_presentation_mode(mode).await {
        Ok(ModeChange::Applied(view)) => Ok(Some(view)),
        Ok(ModeChange::Stale { .. }) => Ok(None),
        Err(e) if e.is_retrieval() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn navigated(session: &ReadingSession, navigation: Navigation, notices: &mut Notices) {
    match navigation {
        Navigation::Moved { .. } => {
            notices.pending_saves += 1;
            if let Some(view) = session.current_view().await {
                print_view(&view);
            }
        }
        Navigation::Unchanged { page: Some(_) } => println!("(no more pages that way)"),
        Navigation::Unchanged { page: None } => println!("(no document open)"),
    }
}

fn print_view(view: &SessionView) {
    println!("-- {} [{}] --", view.page_label(), view.mode);
    match &view.content {
        ViewContent::Render { page } => println!("(page {} is shown by the document renderer)", page),
        ViewContent::Transformed(text) => println!("{}", text),
    }
}
