use std::borrow::Cow;

use super::schema::{ExtractFailure, FileOutcome, Unsupported};

const UNREADABLE_TEXT: &str = "[Error: Could not read text file.]";
const UNREADABLE_PDF: &str = "[Error: Could not process PDF file.]";
const EXCEL_UNSUPPORTED: &str = concat!(
    "[Excel files are not yet supported. ",
    "Please convert to CSV format or copy the data manually.]"
);
const WORD_UNSUPPORTED: &str =
    "[Word documents are not yet supported. Please convert to PDF or text format.]";
const PDF_NOTE: &str =
    "This is a PDF document. The AI model can analyze the content of this PDF file.";
const FORMATS_HINT: &str = concat!(
    "This file cannot be processed. ",
    "Currently supported formats: Text (.txt, .md), CSV (.csv), PDF (.pdf). ",
    "For other formats, please convert to text or copy the content manually."
);
const EXCLUDED_PREFIX: &str = "The following files could not be processed";
const EXCLUDED_HINT: &str = concat!(
    "Only text (.txt, .md), CSV (.csv) and PDF (.pdf) files are supported. ",
    "Please convert these files to one of those formats ",
    "or paste their content into the message."
);

/// Render the display text for a processed file.
/// Extracted text is borrowed as-is; every other outcome gets a fixed
/// bracketed notice the model can relay to the user.
pub fn render<'a>(name: &str, outcome: &'a FileOutcome) -> Cow<'a, str> {
    match outcome {
        FileOutcome::Text(text) => Cow::Borrowed(text),
        FileOutcome::Pdf => Cow::Owned(format!("[PDF file: {name}] {PDF_NOTE}")),
        FileOutcome::Failed(ExtractFailure::UnreadableText) => Cow::Borrowed(UNREADABLE_TEXT),
        FileOutcome::Failed(ExtractFailure::UnreadablePdf) => Cow::Borrowed(UNREADABLE_PDF),
        FileOutcome::Failed(ExtractFailure::Malformed(message)) => {
            Cow::Owned(format!("[Error processing file: {message}]"))
        }
        FileOutcome::Unsupported(Unsupported::Excel) => Cow::Borrowed(EXCEL_UNSUPPORTED),
        FileOutcome::Unsupported(Unsupported::Word) => Cow::Borrowed(WORD_UNSUPPORTED),
        FileOutcome::Unsupported(Unsupported::Other(mime_type)) => {
            let mime_type = if mime_type.is_empty() {
                "unknown"
            } else {
                mime_type.as_str()
            };
            Cow::Owned(format!("[Unsupported file type: {mime_type}] {FORMATS_HINT}"))
        }
        FileOutcome::Unsupported(Unsupported::Excluded(names)) => {
            let listed = names.join(", ");
            Cow::Owned(format!("[{EXCLUDED_PREFIX}: {listed}] {EXCLUDED_HINT}"))
        }
    }
}
