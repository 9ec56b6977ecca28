use super::decode::{DataUri, DecodeError};
use super::extract::{extract, guess_mime_type, FileClass};
use super::schema::{
    AttachmentPayload, ExtractFailure, FileOutcome, ProcessedFile, UploadedAttachment,
};

/// Normalize decoded attachments, preserving input order.
///
/// Every input yields exactly one [`ProcessedFile`]. When any attachment is
/// of a class the model cannot read, one aggregate "Unsupported Files" entry
/// naming all of them is appended last.
pub fn process_files(attachments: Vec<UploadedAttachment>) -> Vec<ProcessedFile> {
    let mut batch = Batch::with_capacity(attachments.len());
    for attachment in attachments {
        batch.push(attachment);
    }
    batch.finish()
}

/// Decode data-URI payloads and normalize them.
///
/// A URL that is not a data URI at all fails the whole batch before any file
/// is processed. A payload that does not decode only marks its own file as
/// failed.
pub fn process_payloads(payloads: &[AttachmentPayload]) -> Result<Vec<ProcessedFile>, DecodeError> {
    let uris = payloads
        .iter()
        .enumerate()
        .map(|(index, payload)| DataUri::parse(&payload.url, index))
        .collect::<Result<Vec<_>, _>>()?;

    let mut batch = Batch::with_capacity(payloads.len());
    for (index, (payload, uri)) in payloads.iter().zip(uris).enumerate() {
        let name = payload
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("attachment-{}", index + 1));
        let mime_type = resolve_mime_type(payload.content_type.as_deref(), uri.media_type, &name);

        match uri.decode() {
            Ok(data) => batch.push(UploadedAttachment {
                name,
                mime_type,
                data,
            }),
            Err(error) => {
                tracing::warn!(file = %name, %error, "attachment payload is not valid base64");
                batch.push_failed(name, &mime_type, error.to_string());
            }
        }
    }
    Ok(batch.finish())
}

/// Declared content type, then the data URI media type, then a guess from the
/// file extension.
fn resolve_mime_type(declared: Option<&str>, media_type: &str, name: &str) -> String {
    declared
        .map(str::trim)
        .filter(|mime| !mime.is_empty())
        .or(Some(media_type).filter(|mime| !mime.is_empty()))
        .unwrap_or_else(|| guess_mime_type(name))
        .to_lowercase()
}

struct Batch {
    files: Vec<ProcessedFile>,
    excluded: Vec<String>,
}

impl Batch {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            files: Vec::with_capacity(capacity + 1),
            excluded: Vec::new(),
        }
    }

    fn note_class(&mut self, name: &str, mime_type: &str) {
        if !FileClass::of(mime_type, name).is_supported() {
            self.excluded.push(name.to_string());
        }
    }

    fn push(&mut self, attachment: UploadedAttachment) {
        self.note_class(&attachment.name, &attachment.mime_type);
        let name = attachment.name.clone();
        let file = ProcessedFile::new(name, extract(attachment));
        tracing::debug!(file = %file.name, kind = %file.kind(), "attachment processed");
        self.files.push(file);
    }

    fn push_failed(&mut self, name: String, mime_type: &str, message: String) {
        self.note_class(&name, mime_type);
        self.files.push(ProcessedFile::new(
            name,
            FileOutcome::Failed(ExtractFailure::Malformed(message)),
        ));
    }

    fn finish(mut self) -> Vec<ProcessedFile> {
        if !self.excluded.is_empty() {
            tracing::info!(
                count = self.excluded.len(),
                "excluding unsupported attachments"
            );
            self.files.push(ProcessedFile::excluded(self.excluded));
        }
        self.files
    }
}
