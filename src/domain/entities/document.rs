use std::path::Path;

use sha2::{Digest, Sha256};

use crate::app_error::{AppError, AppResult};

/// Advisory upload ceiling. Larger files are still sent.
pub const SOFT_SIZE_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Document formats accepted for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Jpeg,
    Png,
    Webp,
    Pdf,
}

impl DocumentKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Jpeg => "image/jpeg",
            DocumentKind::Png => "image/png",
            DocumentKind::Webp => "image/webp",
            DocumentKind::Pdf => "application/pdf",
        }
    }

    /// Detect the kind from the file extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(DocumentKind::Jpeg),
            "png" => Some(DocumentKind::Png),
            "webp" => Some(DocumentKind::Webp),
            "pdf" => Some(DocumentKind::Pdf),
            _ => None,
        }
    }
}

/// A user-selected document, handed to the verification client and not retained.
#[derive(Clone)]
pub struct DocumentFile {
    pub file_name: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    /// `InvalidInput` when the file is empty or of an unsupported type.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> AppResult<Self> {
        let file_name = file_name.into();
        let kind = DocumentKind::from_file_name(&file_name).ok_or_else(|| {
            AppError::InvalidInput("Invalid file type. Allowed formats: JPG, PNG, WEBP, PDF".to_string())
        })?;
        if bytes.is_empty() {
            return Err(AppError::InvalidInput("File cannot be empty".to_string()));
        }
        Ok(Self {
            file_name,
            kind,
            bytes,
        })
    }

    /// Read a document from disk, using the path's file name.
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AppError::InvalidInput(format!("{} has no usable file name", path.display()))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::InvalidInput(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::new(file_name, bytes)
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn exceeds_soft_limit(&self) -> bool {
        self.size() > SOFT_SIZE_LIMIT_BYTES
    }

    /// Hex SHA-256 of the content, for correlating log lines without logging the document.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

impl std::fmt::Debug for DocumentFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentFile")
            .field("file_name", &self.file_name)
            .field("kind", &self.kind)
            .field("size", &self.bytes.len())
            .finish()
    }
}
