use super::context::Services;
use anyhow::Result;
use pagewise_core::document::DocumentId;
use pagewise_core::progress::ProgressStore;

pub async fn show(services: &Services, id: &str) -> Result<()> {
    let id = DocumentId::new(id);
    let position = services.progress.get(&id).await?;
    println!("{}: page {}", id, position);
    Ok(())
}
