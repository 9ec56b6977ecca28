//! Attachment normalization
//!
//! Decodes data-URI uploads, classifies them, extracts inline text where
//! possible and renders a placeholder for everything else.

pub mod decode;
pub mod describe;
pub mod extract;
pub mod normalize;
pub mod schema;

pub use decode::DecodeError;
pub use extract::FileClass;
pub use normalize::{process_files, process_payloads};
pub use schema::{
    AttachmentPayload, FileKind, FileOutcome, ProcessedFile, ProcessedFileView,
    UploadedAttachment, UNSUPPORTED_FILES_NAME,
};
