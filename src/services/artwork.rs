//! Artwork mirroring
//!
//! Kodi hands out artwork as opaque `image://...` references that a browser
//! cannot load. They are staged through `Files.PrepareDownload`, downloaded
//! with the connection's credentials and kept on disk under a name derived
//! from the SHA-1 of the original reference. A file's presence is the only
//! cache check; entries are never expired.

use futures::StreamExt;
use reqwest::Response;
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use crate::metrics;
use crate::services::kodi::{KodiClient, KodiError};

/// Route prefix under which cached artwork is served
pub const ARTWORK_ROUTE: &str = "/artwork";

/// Prefix of Kodi's internal image references
const KODI_IMAGE_PREFIX: &str = "image://";

/// Distinguishes temp files of concurrent downloads
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// SHA-1 hex digest of an artwork reference
pub fn hash_reference(reference: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(reference.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// On-disk artwork store keyed by reference hash
#[derive(Debug, Clone)]
pub struct ArtworkCache {
    dir: PathBuf,
}

impl ArtworkCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache file name for a reference
    pub fn file_name(reference: &str) -> String {
        format!("{}.jpg", hash_reference(reference))
    }

    pub fn path_for(&self, reference: &str) -> PathBuf {
        self.dir.join(Self::file_name(reference))
    }

    /// Path the page uses to load a cached file
    pub fn public_path(file_name: &str) -> String {
        format!("{}/{}", ARTWORK_ROUTE, file_name)
    }

    /// Public path of the cached file, if it exists
    pub async fn lookup(&self, reference: &str) -> Option<String> {
        let path = self.path_for(reference);
        match fs::try_exists(&path).await {
            Ok(true) => Some(Self::public_path(&Self::file_name(reference))),
            _ => None,
        }
    }

    /// Stream a download body into the cache.
    ///
    /// The body goes to a temp file which is renamed into place once complete,
    /// so readers never see a partial image. An empty body stores nothing and
    /// yields `Ok(None)`.
    pub async fn store(
        &self,
        reference: &str,
        response: Response,
    ) -> Result<Option<String>, KodiError> {
        fs::create_dir_all(&self.dir).await?;

        let file_name = Self::file_name(reference);
        let final_path = self.dir.join(&file_name);
        let tmp_path = self.dir.join(format!(
            "{}.{}.{}.tmp",
            file_name,
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let written = match write_body(&tmp_path, response).await {
            Ok(written) => written,
            Err(e) => {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(e);
            }
        };

        if written == 0 {
            let _ = fs::remove_file(&tmp_path).await;
            return Ok(None);
        }

        if let Err(e) = fs::rename(&tmp_path, &final_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        Ok(Some(Self::public_path(&file_name)))
    }
}

async fn write_body(path: &Path, response: Response) -> Result<u64, KodiError> {
    let file = File::create(path).await?;
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    writer.flush().await?;
    writer.get_ref().sync_all().await?;

    Ok(written)
}

/// Resolves item artwork references into something a browser can load
pub struct ArtworkResolver<'a> {
    client: &'a KodiClient,
    cache: &'a ArtworkCache,
}

impl<'a> ArtworkResolver<'a> {
    pub fn new(client: &'a KodiClient, cache: &'a ArtworkCache) -> Self {
        Self { client, cache }
    }

    /// Resolve a reference; `None` means "no image" and is never an error.
    ///
    /// - empty reference: `None`
    /// - absolute URL: passed through
    /// - `image://...`: served from the cache, or staged and downloaded
    pub async fn resolve(&self, reference: &str) -> Option<String> {
        if reference.is_empty() {
            return None;
        }

        if reference.starts_with("http://") || reference.starts_with("https://") {
            metrics::record_artwork("passthrough");
            return Some(reference.to_string());
        }

        if !reference.starts_with(KODI_IMAGE_PREFIX) {
            debug!("Unsupported artwork reference: {}", preview(reference));
            metrics::record_artwork("missing");
            return None;
        }

        if let Some(cached) = self.cache.lookup(reference).await {
            debug!("Using cached artwork: {}", cached);
            metrics::record_artwork("cached");
            return Some(cached);
        }

        match self.download(reference).await {
            Ok(Some(path)) => {
                info!("Downloaded artwork: {}", path);
                metrics::record_artwork("downloaded");
                Some(path)
            }
            Ok(None) => {
                metrics::record_artwork("missing");
                None
            }
            Err(e) => {
                warn!("Failed to download artwork {}: {}", preview(reference), e);
                metrics::record_artwork("missing");
                None
            }
        }
    }

    async fn download(&self, reference: &str) -> Result<Option<String>, KodiError> {
        let staged = self.client.prepare_download(reference).await?;
        let Some(staged_path) = staged.path() else {
            warn!("No download path staged for: {}", preview(reference));
            return Ok(None);
        };

        for url in self.client.connection().download_candidates(staged_path) {
            debug!("Trying artwork download from: {}", preview(&url));

            let response = match self.client.fetch(&url).await {
                Ok(response) => response,
                Err(e) => {
                    debug!("Artwork download attempt failed: {}", e);
                    continue;
                }
            };

            match self.cache.store(reference, response).await {
                Ok(Some(path)) => return Ok(Some(path)),
                Ok(None) => debug!("Empty artwork body from: {}", preview(&url)),
                Err(KodiError::Io(e)) => return Err(KodiError::Io(e)),
                Err(e) => debug!("Artwork transfer interrupted: {}", e),
            }
        }

        warn!("All artwork download attempts failed for: {}", preview(reference));
        Ok(None)
    }
}

/// First 80 characters, for logs
fn preview(value: &str) -> String {
    value.chars().take(80).collect()
}
