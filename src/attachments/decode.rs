use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

/// Standard alphabet with optional padding. Clients disagree on whether
/// they pad data URIs.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Structural problems with an attachment URL. These abort the whole batch.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("attachment {index} is not a data URI")]
    NotDataUri { index: usize },
    #[error("data URI of attachment {index} has no payload")]
    MissingPayload { index: usize },
}

/// A borrowed view of a `data:` URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
    /// Media type from the URI header, empty when omitted.
    pub media_type: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUri<'a> {
    /// Split a data URI at its first comma. The scheme is matched
    /// case-insensitively. `index` is only used for error reporting.
    pub fn parse(url: &'a str, index: usize) -> Result<Self, DecodeError> {
        let rest = url
            .get(..5)
            .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
            .map(|_| &url[5..])
            .ok_or(DecodeError::NotDataUri { index })?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(DecodeError::MissingPayload { index })?;
        let media_type = header.split(';').next().unwrap_or_default().trim();
        Ok(Self {
            media_type,
            payload,
        })
    }

    /// Base64-decode the payload into raw bytes. Embedded whitespace
    /// (line-wrapped payloads) is ignored.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let compact: String = self
            .payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        PAYLOAD_ENGINE.decode(compact)
    }
}
