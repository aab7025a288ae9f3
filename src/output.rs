use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

use crate::models::OutputDocument;

/// Serializes the document (2-space indent) next to `path`, then renames it into
/// place so readers never see a half-written file. Returns the byte size.
pub async fn write_document(path: &Path, doc: &OutputDocument) -> Result<u64> {
    let body = serde_json::to_vec_pretty(doc).context("serializing output document failed")?;

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "data.json".into());
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, &body)
        .await
        .with_context(|| format!("writing {} failed", tmp_path.display()))?;
    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e).with_context(|| format!("moving output into {} failed", path.display()));
    }

    Ok(body.len() as u64)
}
