//! Input encoding for user-supplied files
//!
//! Binary documents (images, PDFs, office files) become base64 attachments
//! that travel inline with the generation request. Plain text and Markdown
//! are never attached; their content is merged into the text buffer instead.

use crate::error::{ReqscribeError, Result};
use crate::log_debug;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use strum_macros::Display;

/// Media type used for `.hwp` files, which browsers and OSes rarely label
pub const HWP_MEDIA_TYPE: &str = "application/x-hwp";

/// Categories of files accepted by the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FileKind {
    Image,
    Pdf,
    Word,
    PowerPoint,
    /// Legacy Hangul word processor documents, recognized by extension only
    Hwp,
    PlainText,
    Markdown,
}

impl FileKind {
    /// Apply the allow-list to a file's declared media type, falling back to
    /// its extension
    pub fn classify(name: &str, declared_media_type: &str) -> Result<Self> {
        let media_type = normalize_media_type(declared_media_type);
        if let Some(kind) = Self::from_media_type(&media_type) {
            return Ok(kind);
        }

        extension_of(name)
            .as_deref()
            .and_then(Self::from_extension)
            .ok_or_else(|| {
                ReqscribeError::UnsupportedFile(if media_type.is_empty() {
                    name.to_string()
                } else {
                    format!("{name} ({media_type})")
                })
            })
    }

    fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type {
            "image/jpeg" | "image/png" | "image/webp" | "image/gif" => Some(Self::Image),
            "application/pdf" => Some(Self::Pdf),
            "application/msword"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Word)
            }
            "application/vnd.ms-powerpoint"
            | "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
                Some(Self::PowerPoint)
            }
            "text/plain" => Some(Self::PlainText),
            "text/markdown" | "text/x-markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "jpg" | "jpeg" | "png" | "webp" | "gif" => Some(Self::Image),
            "pdf" => Some(Self::Pdf),
            "doc" | "docx" => Some(Self::Word),
            "ppt" | "pptx" => Some(Self::PowerPoint),
            "hwp" => Some(Self::Hwp),
            "txt" => Some(Self::PlainText),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    /// Text files are merged into the prompt text rather than attached
    pub const fn is_text(self) -> bool {
        matches!(self, Self::PlainText | Self::Markdown)
    }
}

/// Media type implied by a file name's extension
pub fn media_type_for_extension(name: &str) -> Option<&'static str> {
    let media_type = match extension_of(name)?.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "hwp" => HWP_MEDIA_TYPE,
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        _ => return None,
    };
    Some(media_type)
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn normalize_media_type(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// A file as handed over by the user: raw bytes plus what we know about them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub name: String,
    /// Declared media type; may be empty when the source did not provide one
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }
}

/// A binary file ready for transport: media type plus base64 payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFile {
    pub name: String,
    pub media_type: String,
    pub payload: String,
}

/// The result of encoding one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedInput {
    Attachment(EncodedFile),
    Text { name: String, content: String },
}

impl EncodedInput {
    pub fn name(&self) -> &str {
        match self {
            Self::Attachment(file) => &file.name,
            Self::Text { name, .. } => name,
        }
    }
}

/// Encode a single file according to its category
pub fn encode(input: &FileInput) -> Result<EncodedInput> {
    let kind = FileKind::classify(&input.name, &input.media_type)?;

    if kind.is_text() {
        let content = String::from_utf8_lossy(&input.bytes).into_owned();
        log_debug!("Merging text file {} ({} bytes)", input.name, input.bytes.len());
        return Ok(EncodedInput::Text {
            name: input.name.clone(),
            content,
        });
    }

    let declared = normalize_media_type(&input.media_type);
    let media_type = if declared.is_empty() || FileKind::from_media_type(&declared).is_none() {
        media_type_for_extension(&input.name)
            .unwrap_or("application/octet-stream")
            .to_string()
    } else {
        declared
    };

    log_debug!(
        "Encoding attachment {} as {} ({} bytes)",
        input.name,
        media_type,
        input.bytes.len()
    );

    Ok(EncodedInput::Attachment(EncodedFile {
        name: input.name.clone(),
        media_type,
        payload: STANDARD.encode(&input.bytes),
    }))
}

/// Separator-prefixed block appended to the text buffer for an imported text file
pub fn text_segment(name: &str, content: &str) -> String {
    format!("\n\n--- File: {name} ---\n{content}")
}

/// Read a file from disk, inferring its media type from the extension
pub async fn read_file(path: &Path) -> Result<FileInput> {
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ReqscribeError::FileRead {
            name: name.clone(),
            source,
        })?;

    let media_type = media_type_for_extension(&name).unwrap_or_default();
    Ok(FileInput::new(name, media_type, bytes))
}

/// Read and encode several files concurrently
///
/// Results come back in the order the paths were given, whatever order the
/// reads finish in. A failure only affects its own entry.
pub async fn load_files(paths: &[PathBuf]) -> Vec<Result<EncodedInput>> {
    let reads = paths.iter().map(|path| async move {
        let input = read_file(path).await?;
        encode(&input)
    });
    join_all(reads).await
}

/// Attachments accumulated for the next request, unique by file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentSet {
    files: Vec<EncodedFile>,
}

impl AttachmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attachment; a file whose name is already present is dropped
    ///
    /// Returns `true` when the file was added.
    pub fn add(&mut self, file: EncodedFile) -> bool {
        if self.contains(&file.name) {
            log_debug!("Skipping duplicate attachment {}", file.name);
            return false;
        }
        self.files.push(file);
        true
    }

    /// Remove the attachment with the given name, returning it if present
    pub fn remove(&mut self, name: &str) -> Option<EncodedFile> {
        let index = self.files.iter().position(|f| f.name == name)?;
        Some(self.files.remove(index))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name == name)
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn as_slice(&self) -> &[EncodedFile] {
        &self.files
    }
}
