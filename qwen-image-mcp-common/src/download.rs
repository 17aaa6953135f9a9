//! Image materializer: fetches generated images to local disk.
//!
//! Downloads are strictly sequential within a batch and each one is isolated:
//! a malformed URL or a failed fetch leaves that entry without a local path
//! and the rest of the batch continues.

use crate::models::{DownloadedImage, GeneratedImage};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Maximum length of the prompt slug in generated filenames.
pub const MAX_SLUG_LEN: usize = 50;

/// Downloads generated images into a target directory.
pub struct ImageDownloader {
    http: reqwest::Client,
    output_dir: PathBuf,
}

impl ImageDownloader {
    pub fn new(http: reqwest::Client, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            http,
            output_dir: output_dir.into(),
        }
    }

    /// Fetch every image of one batch, one after another.
    ///
    /// All output entries are present and ordered like the input; entries
    /// whose download was skipped or failed have no local path. The target
    /// directory is created if absent. `fallback_ext` is used when the
    /// platform does not report a content type.
    pub async fn download_batch(
        &self,
        prompt: &str,
        images: &[GeneratedImage],
        fallback_ext: &str,
    ) -> std::io::Result<Vec<DownloadedImage>> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let slug = slugify(prompt);
        // One timestamp per batch: images differ only by index.
        let stamp = batch_timestamp();

        let mut downloaded = Vec::with_capacity(images.len());
        for (index, image) in images.iter().enumerate() {
            let url = image.url.trim();
            if url.is_empty() || reqwest::Url::parse(url).is_err() {
                warn!(index, url = %image.url, "Skipping image with missing or malformed URL");
                downloaded.push(DownloadedImage {
                    url: image.url.clone(),
                    local_path: None,
                });
                continue;
            }

            let ext = extension_for(image.content_type.as_deref(), fallback_ext);
            let file_name = format!("qwen_image_{slug}_{index}_{stamp}.{ext}");
            let path = self.output_dir.join(&file_name);

            match self.fetch_to_file(url, &path).await {
                Ok(()) => {
                    debug!(index, path = %path.display(), "Image downloaded");
                    downloaded.push(DownloadedImage {
                        url: image.url.clone(),
                        local_path: Some(path),
                    });
                }
                Err(e) => {
                    warn!(index, url, error = %e, "Image download failed");
                    downloaded.push(DownloadedImage {
                        url: image.url.clone(),
                        local_path: None,
                    });
                }
            }
        }

        Ok(downloaded)
    }

    async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<(), String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status().as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("failed reading body: {e}"))?;
        tokio::fs::write(path, &bytes)
            .await
            .map_err(|e| format!("failed writing {}: {e}", path.display()))
    }
}

/// Lowercase the prompt, map every non-alphanumeric run to `_`, and truncate.
pub fn slugify(prompt: &str) -> String {
    let mut slug = String::with_capacity(MAX_SLUG_LEN);
    for ch in prompt.chars() {
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}

/// Milliseconds since the Unix epoch, captured once per batch.
pub fn batch_timestamp() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Derive a file extension from a MIME type, falling back to the requested
/// output format.
pub fn extension_for(content_type: Option<&str>, fallback: &str) -> String {
    match content_type.map(|ct| ct.split(';').next().unwrap_or(ct).trim()) {
        Some("image/png") => "png".to_string(),
        Some("image/jpeg") | Some("image/jpg") => "jpg".to_string(),
        Some("image/webp") => "webp".to_string(),
        _ => {
            if fallback.eq_ignore_ascii_case("jpeg") {
                "jpg".to_string()
            } else {
                fallback.to_ascii_lowercase()
            }
        }
    }
}
