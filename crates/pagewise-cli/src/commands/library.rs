use super::context::Services;
use anyhow::Result;
use pagewise_core::document::{DocumentId, DocumentLibrary};

pub async fn list(services: &Services) -> Result<()> {
    let documents = services.library.list().await?;
    if documents.is_empty() {
        println!("No documents stored.");
        return Ok(());
    }

    for id in documents {
        println!("{}", id);
    }
    Ok(())
}

pub async fn delete(services: &Services, id: &str) -> Result<()> {
    let id = DocumentId::new(id);
    let message = services.library.delete(&id).await?;
    if let Some(cache) = &services.cache {
        cache.evict(&id).await?;
    }
    println!("{}", message);
    Ok(())
}

pub async fn delete_all(services: &Services) -> Result<()> {
    let message = services.library.delete_all().await?;
    if let Some(cache) = &services.cache {
        cache.clear().await?;
    }
    println!("{}", message);
    Ok(())
}
