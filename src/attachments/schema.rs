use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use super::describe;

/// Name used for the aggregate entry that lists excluded attachments.
pub const UNSUPPORTED_FILES_NAME: &str = "Unsupported Files";

/// Attachment as sent by the chat client (not the decoded bytes themselves).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    /// Data URI carrying the file bytes.
    pub url: String,
}

/// An uploaded file after its transport encoding has been removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAttachment {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl UploadedAttachment {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// Classification tag of a processed file. Only used for formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    Text,
    Pdf,
    TextError,
    PdfError,
    ExcelUnsupported,
    WordUnsupported,
    Unsupported,
    Error,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::TextError => "text-error",
            Self::PdfError => "pdf-error",
            Self::ExcelUnsupported => "excel-unsupported",
            Self::WordUnsupported => "word-unsupported",
            Self::Unsupported => "unsupported",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a file could not be turned into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractFailure {
    /// Declared as text but the bytes are not valid UTF-8.
    UnreadableText,
    /// Declared as PDF but there is nothing to hand over.
    UnreadablePdf,
    /// The payload could not be decoded at all.
    Malformed(String),
}

/// Formats the normalizer refuses to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unsupported {
    Excel,
    Word,
    /// Anything else, carrying the resolved MIME type (empty when unknown).
    Other(String),
    /// Aggregate notice listing every excluded attachment by name.
    Excluded(Vec<String>),
}

/// Typed result of processing one attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Text(String),
    /// PDF bytes are left to the model; only a placeholder is inlined.
    Pdf,
    Failed(ExtractFailure),
    Unsupported(Unsupported),
}

/// A normalized attachment. Display text is rendered on demand from the
/// typed outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub name: String,
    pub outcome: FileOutcome,
}

impl ProcessedFile {
    pub fn new(name: impl Into<String>, outcome: FileOutcome) -> Self {
        Self {
            name: name.into(),
            outcome,
        }
    }

    /// Plain text file with already-extracted content.
    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, FileOutcome::Text(content.into()))
    }

    /// Aggregate entry for attachments the pre-filter excluded.
    pub fn excluded(names: Vec<String>) -> Self {
        Self::new(
            UNSUPPORTED_FILES_NAME,
            FileOutcome::Unsupported(Unsupported::Excluded(names)),
        )
    }

    pub fn kind(&self) -> FileKind {
        match &self.outcome {
            FileOutcome::Text(_) => FileKind::Text,
            FileOutcome::Pdf => FileKind::Pdf,
            FileOutcome::Failed(ExtractFailure::UnreadableText) => FileKind::TextError,
            FileOutcome::Failed(ExtractFailure::UnreadablePdf) => FileKind::PdfError,
            FileOutcome::Failed(ExtractFailure::Malformed(_)) => FileKind::Error,
            FileOutcome::Unsupported(Unsupported::Excel) => FileKind::ExcelUnsupported,
            FileOutcome::Unsupported(Unsupported::Word) => FileKind::WordUnsupported,
            FileOutcome::Unsupported(Unsupported::Other(_) | Unsupported::Excluded(_)) => {
                FileKind::Unsupported
            }
        }
    }

    /// Text inlined into the chat message for this file.
    pub fn content(&self) -> Cow<'_, str> {
        describe::render(&self.name, &self.outcome)
    }
}

/// Serialized view of a processed file, as the chat client and the CLI see it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProcessedFileView {
    pub name: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
}

impl From<&ProcessedFile> for ProcessedFileView {
    fn from(file: &ProcessedFile) -> Self {
        Self {
            name: file.name.clone(),
            content: file.content().into_owned(),
            kind: file.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_serializes_kind_as_type() {
        let file = ProcessedFile::new("data.xlsx", FileOutcome::Unsupported(Unsupported::Excel));
        let view = ProcessedFileView::from(&file);
        let json = serde_json::to_value(view).unwrap();
        assert_eq!(json["name"], "data.xlsx");
        assert_eq!(json["type"], "excel-unsupported");
        let content = json["content"].as_str().unwrap();
        assert!(content.starts_with("[Excel files"));
    }

    #[test]
    fn kind_tags_match_display() {
        for kind in [FileKind::PdfError, FileKind::WordUnsupported] {
            let tag = serde_json::to_value(kind).unwrap();
            assert_eq!(tag, kind.to_string());
        }
    }
}
