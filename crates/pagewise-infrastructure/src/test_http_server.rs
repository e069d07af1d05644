//! In-process file API server used by the HTTP client tests.

use crate::api_client::ApiClient;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct MockState {
    documents: Mutex<HashMap<String, Vec<u8>>>,
    progress: Mutex<HashMap<String, i64>>,
    progress_down: AtomicBool,
}

#[derive(Deserialize)]
struct PositionQuery {
    position: i64,
}

pub struct MockServer {
    state: Arc<MockState>,
    base_url: String,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/api/files", get(list_files))
            .route("/api/files/download/:id", get(download))
            .route("/api/files/progress/:id", get(get_progress).post(set_progress))
            .route("/api/files/delete/:id", delete(delete_file))
            .route("/api/files/delete-all", delete(delete_all))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: format!("http://{}", addr),
        }
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.base_url, Duration::from_secs(5)).unwrap()
    }

    pub fn add_document(&self, id: &str, bytes: Vec<u8>) {
        self.state.documents.lock().unwrap().insert(id.to_string(), bytes);
    }

    pub fn set_progress(&self, id: &str, position: i64) {
        self.state.progress.lock().unwrap().insert(id.to_string(), position);
    }

    pub fn progress(&self, id: &str) -> Option<i64> {
        self.state.progress.lock().unwrap().get(id).copied()
    }

    /// Makes every progress endpoint answer 503.
    pub fn set_progress_down(&self, down: bool) {
        self.state.progress_down.store(down, Ordering::SeqCst);
    }
}

async fn list_files(State(state): State<Arc<MockState>>) -> Json<Vec<String>> {
    Json(state.documents.lock().unwrap().keys().cloned().collect())
}

async fn download(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    match state.documents.lock().unwrap().get(&id) {
        Some(bytes) => Bytes::from(bytes.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_progress(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    if state.progress_down.load(Ordering::SeqCst) {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    let position = state.progress.lock().unwrap().get(&id).copied().unwrap_or(1);
    Json(position).into_response()
}

async fn set_progress(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    Query(query): Query<PositionQuery>,
) -> Response {
    if state.progress_down.load(Ordering::SeqCst) {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    state.progress.lock().unwrap().insert(id, query.position);
    "Progress updated successfully.".into_response()
}

async fn delete_file(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> String {
    state.documents.lock().unwrap().remove(&id);
    state.progress.lock().unwrap().remove(&id);
    format!("File and its progress have been deleted successfully: {}", id)
}

async fn delete_all(State(state): State<Arc<MockState>>) -> String {
    state.documents.lock().unwrap().clear();
    state.progress.lock().unwrap().clear();
    "All files and progress records have been deleted successfully.".to_string()
}

/// Builds a PDF with one line of Courier text per page.
pub fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
