//! HTML and JSON file dumps for the CLI probe

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::models::StatsSummary;

/// Write the rendered page to `path`
pub async fn save_html(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();
    write_atomic(path, content.as_bytes()).await?;
    info!("HTML report saved to {}", path.display());
    Ok(())
}

/// Write the pretty-printed summary to `path`
pub async fn save_json(path: impl AsRef<Path>, summary: &StatsSummary) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(summary)?;
    write_atomic(path, content.as_bytes()).await?;
    info!("Library statistics saved to {}", path.display());
    Ok(())
}

async fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let tmp_path = tmp_path_for(path);
    let mut file = File::create(&tmp_path)
        .await
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    file.write_all(content).await?;
    file.sync_all().await?;
    drop(file);

    // Readers never see a half-written file
    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e).with_context(|| format!("writing {}", path.display()));
    }
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
