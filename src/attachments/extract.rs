use super::schema::{ExtractFailure, FileOutcome, Unsupported, UploadedAttachment};

const EXCEL_MIME_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
];
const WORD_MIME_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
];

/// What an attachment is, judged from its MIME type and file name.
/// Checked in declaration order; the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Text,
    Pdf,
    Excel,
    Word,
    Other,
}

impl FileClass {
    pub fn of(mime_type: &str, filename: &str) -> Self {
        let name = filename.to_lowercase();
        let has_ext = |exts: &[&str]| exts.iter().any(|ext| name.ends_with(ext));

        if mime_type.starts_with("text/") || has_ext(&[".txt", ".md", ".csv"]) {
            Self::Text
        } else if mime_type == "application/pdf" || has_ext(&[".pdf"]) {
            Self::Pdf
        } else if EXCEL_MIME_TYPES.contains(&mime_type) || has_ext(&[".xlsx", ".xls"]) {
            Self::Excel
        } else if WORD_MIME_TYPES.contains(&mime_type) || has_ext(&[".docx", ".doc"]) {
            Self::Word
        } else {
            Self::Other
        }
    }

    /// Whether the content of this class can be handed to the model.
    pub fn is_supported(self) -> bool {
        matches!(self, Self::Text | Self::Pdf)
    }
}

/// Extract the inline content of an attachment.
/// Never fails: unreadable or unsupported files come back as the
/// corresponding outcome.
pub fn extract(attachment: UploadedAttachment) -> FileOutcome {
    let UploadedAttachment {
        name,
        mime_type,
        data,
    } = attachment;

    match FileClass::of(&mime_type, &name) {
        FileClass::Text => match String::from_utf8(data) {
            Ok(text) => FileOutcome::Text(text),
            Err(error) => {
                tracing::debug!(file = %name, %error, "text attachment is not valid UTF-8");
                FileOutcome::Failed(ExtractFailure::UnreadableText)
            }
        },
        FileClass::Pdf if data.is_empty() => FileOutcome::Failed(ExtractFailure::UnreadablePdf),
        FileClass::Pdf => FileOutcome::Pdf,
        FileClass::Excel => FileOutcome::Unsupported(Unsupported::Excel),
        FileClass::Word => FileOutcome::Unsupported(Unsupported::Word),
        FileClass::Other => FileOutcome::Unsupported(Unsupported::Other(mime_type)),
    }
}

/// Guess MIME type from filename extension.
pub fn guess_mime_type(filename: &str) -> &'static str {
    let Some((_, ext)) = filename.rsplit_once('.') else {
        return "";
    };
    match ext.to_lowercase().as_str() {
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "html" | "htm" => "text/html",
        "pdf" => "application/pdf",
        "xlsx" => EXCEL_MIME_TYPES[0],
        "xls" => EXCEL_MIME_TYPES[1],
        "docx" => WORD_MIME_TYPES[0],
        "doc" => WORD_MIME_TYPES[1],
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, mime: &str, data: &[u8]) -> FileOutcome {
        extract(UploadedAttachment::new(name, mime, data))
    }

    #[test]
    fn text_by_mime_or_extension() {
        assert_eq!(FileClass::of("text/html", "page"), FileClass::Text);
        assert_eq!(FileClass::of("", "NOTES.MD"), FileClass::Text);
        assert_eq!(
            FileClass::of("application/octet-stream", "data.csv"),
            FileClass::Text
        );
        assert_eq!(
            outcome("a.txt", "", b"hello"),
            FileOutcome::Text("hello".into())
        );
    }

    #[test]
    fn text_wins_over_pdf_extension() {
        assert_eq!(FileClass::of("text/plain", "weird.pdf"), FileClass::Text);
    }

    #[test]
    fn invalid_utf8_is_a_text_error() {
        assert_eq!(
            outcome("bad.txt", "text/plain", &[0xff, 0xfe, 0x00]),
            FileOutcome::Failed(ExtractFailure::UnreadableText)
        );
    }

    #[test]
    fn pdf_is_passed_through_opaquely() {
        assert_eq!(FileClass::of("application/pdf", "scan"), FileClass::Pdf);
        assert_eq!(outcome("report.pdf", "", b"%PDF-1.7\n"), FileOutcome::Pdf);
        assert_eq!(
            outcome("empty.pdf", "application/pdf", b""),
            FileOutcome::Failed(ExtractFailure::UnreadablePdf)
        );
    }

    #[test]
    fn office_formats_are_refused() {
        let excel = FileOutcome::Unsupported(Unsupported::Excel);
        assert_eq!(outcome("data.xlsx", "", b"PK"), excel);
        assert_eq!(
            outcome("sheet", "application/vnd.ms-excel", b"x"),
            excel
        );
        let word = FileOutcome::Unsupported(Unsupported::Word);
        assert_eq!(outcome("memo.DOC", "", b"x"), word);
    }

    #[test]
    fn everything_else_keeps_its_mime_type() {
        assert_eq!(
            outcome("cat.png", "image/png", b"\x89PNG"),
            FileOutcome::Unsupported(Unsupported::Other("image/png".into()))
        );
        assert!(!FileClass::of("image/png", "cat.png").is_supported());
        assert!(FileClass::of("", "a.pdf").is_supported());
    }

    #[test]
    fn guesses_common_extensions() {
        assert_eq!(guess_mime_type("Report.PDF"), "application/pdf");
        assert_eq!(guess_mime_type("notes.md"), "text/markdown");
        assert_eq!(guess_mime_type("no_extension"), "");
        assert_eq!(guess_mime_type("archive.7z"), "");
    }
}
