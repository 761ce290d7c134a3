//! Turning image files into embeddable data URIs, and the buffer that holds
//! them until a note is saved.
use std::path::{Path, PathBuf};

use base64::Engine;
use log::{debug, warn};
use tokio::task::JoinSet;

use crate::{Image, JournalError, Result};

fn mime_for_image_ext(ext: &str) -> Option<&'static str> {
    match ext {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        "avif" => Some("image/avif"),
        "ico" => Some("image/x-icon"),
        _ => None,
    }
}

fn decode_error(path: &Path, message: impl Into<String>) -> JournalError {
    JournalError::Decode {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Reads an image file and encodes it as a base64 data URI.
pub async fn decode_image_file(path: &Path) -> Result<Image> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    let mime = mime_for_image_ext(&ext).ok_or_else(|| decode_error(path, "not an image file"))?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| decode_error(path, e.to_string()))?;
    if bytes.is_empty() {
        return Err(decode_error(path, "file is empty"));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);

    debug!("Decoded {} ({} bytes, {})", name, bytes.len(), mime);
    Ok(Image::new(
        format!("data:{};base64,{}", mime, encoded),
        name,
        bytes.len() as u64,
    ))
}

/// Images chosen for the note being composed but not yet saved.
#[derive(Debug, Default, Clone)]
pub struct PendingImages {
    images: Vec<Image>,
}

impl PendingImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `paths` concurrently and appends the results in selection
    /// order, whatever order the decodes finish in.
    ///
    /// Files that fail to decode are skipped and reported in the returned
    /// list; the others are still attached.
    pub async fn attach_files(&mut self, paths: &[PathBuf]) -> Vec<JournalError> {
        let mut tasks = JoinSet::new();
        for (index, path) in paths.iter().cloned().enumerate() {
            tasks.spawn(async move { (index, decode_image_file(&path).await) });
        }

        let mut slots: Vec<Option<Result<Image>>> = paths.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => warn!("Image decode task failed: {}", e),
            }
        }

        let mut failures = Vec::new();
        for (path, slot) in paths.iter().zip(slots) {
            match slot {
                Some(Ok(image)) => self.images.push(image),
                Some(Err(e)) => {
                    warn!("{}", e);
                    failures.push(e);
                }
                None => failures.push(decode_error(path, "decode was interrupted")),
            }
        }
        failures
    }

    pub fn push(&mut self, image: Image) {
        self.images.push(image);
    }

    /// Removes the image with `id`, returning whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.images.len();
        self.images.retain(|img| img.id != id);
        self.images.len() != before
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Empties the buffer, handing its images over.
    pub fn take(&mut self) -> Vec<Image> {
        std::mem::take(&mut self.images)
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
