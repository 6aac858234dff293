//! Photo ordering and pending uploads
//!
//! Two ordered collections: existing references (persisted, reorderable,
//! independently removable) and new uploads (ephemeral, previewed through
//! transient handles, always appended after the existing ones). Only the
//! order of entries carries meaning; the references themselves are opaque.

use shared::{CatalogError, CatalogResult};
use uuid::Uuid;

/// Maximum accepted upload size (5 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Move one element from `from` to `to`, returning the new order.
///
/// Applied continuously while a drag is in progress so the view tracks the
/// drag target live; the final order is what gets serialized on submit.
/// Out-of-range indices return the list unchanged.
pub fn reorder<T: Clone>(list: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = list.to_vec();
    if from >= out.len() || to >= out.len() || from == to {
        return out;
    }
    let item = out.remove(from);
    out.insert(to, item);
    out
}

/// Transient preview resource for a not-yet-uploaded file.
///
/// Released exactly once: when the upload is removed or when the editing
/// surface closes. A second release is a guarded no-op.
#[derive(Debug)]
pub struct PreviewHandle {
    uri: String,
    released: bool,
}

impl PreviewHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            released: false,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Release the transient resource. True on the releasing call, false
    /// when it was already released.
    pub fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        true
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

/// A file queued for upload, not yet persisted anywhere.
#[derive(Debug)]
pub struct PendingUpload {
    pub key: Uuid,
    pub file_name: String,
    pub size: u64,
    pub content_type: String,
    pub preview: PreviewHandle,
}

/// One keyed entry for the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEntry {
    /// Positional form key (`photo_0`, `photo_1`, ...), matching the order
    /// the uploads will be appended server-side.
    pub form_key: String,
    pub file_name: String,
    pub content_type: String,
}

/// Payload handed over on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoSubmission {
    /// Authoritative existing-photo order, sent verbatim. An empty list
    /// means "clear" and is always present, never omitted.
    pub photos: Vec<String>,
    /// New uploads as separate keyed entries; their final references are
    /// assigned by the storage collaborator, not this core.
    pub uploads: Vec<UploadEntry>,
}

/// Validate an upload before it is queued; failures never reach the network.
pub fn validate_upload(
    file_name: &str,
    size: u64,
    content_type: Option<&str>,
) -> CatalogResult<String> {
    let resolved = match content_type {
        Some(ct) if !ct.is_empty() => ct.to_string(),
        _ => mime_guess::from_path(file_name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string(),
    };

    if size > MAX_UPLOAD_BYTES {
        return Err(CatalogError::validation(
            "photos",
            "Each image must be smaller than 5MB",
        ));
    }
    if !resolved.starts_with("image/") {
        return Err(CatalogError::validation(
            "photos",
            "Please upload valid image files",
        ));
    }
    Ok(resolved)
}

/// Ordered photo state for one editing surface.
#[derive(Debug, Default)]
pub struct PhotoOrderManager {
    existing: Vec<String>,
    pending: Vec<PendingUpload>,
    closed: bool,
}

impl PhotoOrderManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a product's persisted photo list.
    pub fn from_existing(photos: Vec<String>) -> Self {
        Self {
            existing: photos,
            pending: Vec::new(),
            closed: false,
        }
    }

    pub fn existing(&self) -> &[String] {
        &self.existing
    }

    pub fn pending(&self) -> &[PendingUpload] {
        &self.pending
    }

    /// Display order: existing references first, then pending previews.
    /// Pending uploads are never interleaved with existing entries.
    pub fn display_order(&self) -> Vec<&str> {
        self.existing
            .iter()
            .map(String::as_str)
            .chain(self.pending.iter().map(|u| u.preview.uri()))
            .collect()
    }

    /// Drag-reorder within the existing collection.
    pub fn move_existing(&mut self, from: usize, to: usize) {
        self.existing = reorder(&self.existing, from, to);
    }

    /// Remove one existing reference; the collection just gets shorter.
    pub fn remove_existing(&mut self, index: usize) {
        if index < self.existing.len() {
            self.existing.remove(index);
        }
    }

    /// Validate and queue a new upload. Returns its key.
    pub fn add_upload(
        &mut self,
        file_name: impl Into<String>,
        size: u64,
        content_type: Option<&str>,
        preview_uri: impl Into<String>,
    ) -> CatalogResult<Uuid> {
        let file_name = file_name.into();
        let content_type = validate_upload(&file_name, size, content_type)?;
        let key = Uuid::new_v4();
        self.pending.push(PendingUpload {
            key,
            file_name,
            size,
            content_type,
            preview: PreviewHandle::new(preview_uri),
        });
        Ok(key)
    }

    /// Remove a pending upload, releasing its preview resource.
    pub fn remove_upload(&mut self, key: Uuid) -> bool {
        match self.pending.iter().position(|u| u.key == key) {
            Some(index) => {
                let mut upload = self.pending.remove(index);
                upload.preview.release();
                true
            }
            None => false,
        }
    }

    /// The editing surface closed: release every remaining preview.
    /// Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        for upload in &mut self.pending {
            if !upload.preview.release() {
                tracing::warn!(key = %upload.key, "preview already released");
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Build the submit payload: the verbatim existing order plus keyed
    /// entries for each new upload.
    pub fn submission(&self) -> PhotoSubmission {
        PhotoSubmission {
            photos: self.existing.clone(),
            uploads: self
                .pending
                .iter()
                .enumerate()
                .map(|(index, upload)| UploadEntry {
                    form_key: format!("photo_{index}"),
                    file_name: upload.file_name.clone(),
                    content_type: upload.content_type.clone(),
                })
                .collect(),
        }
    }
}
