//! Evidence listing, download, and delete command handlers

use crate::application::ports::{EvidenceStore, StoreError};
use crate::domain::evidence::EvidenceContent;

use super::presenter::Presenter;

/// Handle `vigil list`
pub async fn handle_list<S: EvidenceStore>(
    store: &S,
    presenter: &Presenter,
) -> Result<(), StoreError> {
    let evidence = store.list().await?;
    if evidence.is_empty() {
        presenter.info("No evidence stored");
        return Ok(());
    }
    for record in &evidence {
        presenter.evidence_row(record);
    }
    Ok(())
}

/// Handle `vigil download <id>`
pub async fn handle_download<S: EvidenceStore>(
    store: &S,
    presenter: &Presenter,
    id: &str,
    output: Option<&str>,
) -> Result<(), StoreError> {
    match store.download(id).await? {
        EvidenceContent::Bytes { data, file_name } => {
            let path = output.unwrap_or(&file_name);
            tokio::fs::write(path, &data)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
            presenter.success(&format!("Wrote {} bytes to {}", data.len(), path));
        }
        EvidenceContent::Url(url) => {
            // The backend mints a time-limited URL; hand it to the user
            presenter.output(&url);
        }
    }
    Ok(())
}

/// Handle `vigil delete <id>`
pub async fn handle_delete<S: EvidenceStore>(
    store: &S,
    presenter: &Presenter,
    id: &str,
) -> Result<(), StoreError> {
    store.delete(id).await?;
    presenter.success(&format!("Deleted evidence {id}"));
    Ok(())
}
