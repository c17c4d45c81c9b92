//! Image storage collaborator.
//!
//! The core only keeps the reference an [`ImageStore`] hands back; payloads
//! arrive as base64 `data:` URIs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use thiserror::Error;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image payload is empty")]
    Empty,
    #[error("image must be a base64 data URI")]
    NotDataUri,
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("image payload is not valid base64")]
    Encoding(#[from] base64::DecodeError),
    #[error("image exceeds {} bytes", MAX_IMAGE_BYTES)]
    TooLarge,
    #[error("failed to store image: {0}")]
    Io(#[from] io::Error),
}

/// A decoded image ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Decode `data:image/<ext>;base64,<payload>`.
    pub fn from_data_uri(uri: &str) -> Result<Self, ImageError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(ImageError::Empty);
        }

        let rest = uri.strip_prefix("data:image/").ok_or(ImageError::NotDataUri)?;
        let (extension, payload) = rest.split_once(";base64,").ok_or(ImageError::NotDataUri)?;

        let extension = extension.to_ascii_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ImageError::UnsupportedType(extension));
        }

        let bytes = STANDARD.decode(payload)?;
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge);
        }

        Ok(Self { extension, bytes })
    }
}

/// Accepts binary payloads and returns stable references to them.
pub trait ImageStore: Send + Sync {
    fn store(&self, image: &ImageUpload) -> Result<String, ImageError>;
    fn remove(&self, reference: &str) -> Result<(), ImageError>;
}

/// Stores images as files below `root/folder`, referenced by `url_prefix`.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
    url_prefix: String,
    folder: String,
}

impl FsImageStore {
    /// Store for recipe images.
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
            folder: "recipes".to_string(),
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir(&self) -> PathBuf {
        self.root.join(&self.folder)
    }

    fn path_for(&self, reference: &str) -> Option<PathBuf> {
        let prefix = format!("{}/{}/", self.url_prefix, self.folder);
        let file_name = reference.strip_prefix(&prefix)?;
        if file_name.is_empty() || file_name.contains('/') || file_name.contains("..") {
            return None;
        }
        Some(self.dir().join(file_name))
    }
}

impl ImageStore for FsImageStore {
    fn store(&self, image: &ImageUpload) -> Result<String, ImageError> {
        let dir = self.dir();
        fs::create_dir_all(&dir)?;

        let stem: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        let file_name = format!("{stem}.{}", image.extension);
        fs::write(dir.join(&file_name), &image.bytes)?;

        Ok(format!("{}/{}/{file_name}", self.url_prefix, self.folder))
    }

    fn remove(&self, reference: &str) -> Result<(), ImageError> {
        let Some(path) = self.path_for(reference) else {
            return Ok(());
        };
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// User avatars, kept in their own folder next to recipe images.
#[derive(Debug, Clone)]
pub struct AvatarStore(FsImageStore);

impl AvatarStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self(FsImageStore::new(root, url_prefix).with_folder("avatars"))
    }
}

impl ImageStore for AvatarStore {
    fn store(&self, image: &ImageUpload) -> Result<String, ImageError> {
        self.0.store(image)
    }

    fn remove(&self, reference: &str) -> Result<(), ImageError> {
        self.0.remove(reference)
    }
}
