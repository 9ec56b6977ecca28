use std::borrow::Cow;

use super::message::{ChatMessage, Role};
use crate::attachments::ProcessedFile;

/// Default per-file character cap.
pub const DEFAULT_MAX_FILE_CHARS: usize = 8_000;
/// Default cap on the enhanced message (original content plus attachments).
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 32_000;

const BLOCK_HEADER: &str = "\n\n**Attached Files Content:**\n\n";
const TOO_LARGE_NOTICE: &str = concat!(
    "\n\n[Files were too large to include in full. ",
    "Please ask specific questions about the files instead.]"
);

/// Size caps applied when folding attachments into a message. Lengths are
/// counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeLimits {
    pub max_file_chars: usize,
    pub max_message_chars: usize,
}

impl Default for ComposeLimits {
    fn default() -> Self {
        Self {
            max_file_chars: DEFAULT_MAX_FILE_CHARS,
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }
}

/// Append the attachment block to the trailing user message.
///
/// Returns a copy of `messages` with the same length. Only the last message
/// may change, and only when it is a user message and `files` is non-empty.
/// If the enhanced content would exceed `max_message_chars`, the whole block
/// is replaced by a short notice.
pub fn compose(
    messages: &[ChatMessage],
    files: &[ProcessedFile],
    limits: &ComposeLimits,
) -> Vec<ChatMessage> {
    let mut composed = messages.to_vec();
    if files.is_empty() {
        return composed;
    }

    let Some(last) = composed.last_mut() else {
        return composed;
    };
    if last.role != Role::User {
        tracing::debug!(
            role = %last.role,
            files = files.len(),
            "last message is not from the user, dropping attachments"
        );
        return composed;
    }

    let block = attachment_block(files, limits.max_file_chars);
    let total = last.content.chars().count() + block.chars().count();
    if total > limits.max_message_chars {
        tracing::warn!(
            total,
            limit = limits.max_message_chars,
            "attachments too large, replacing with notice"
        );
        last.content.push_str(TOO_LARGE_NOTICE);
    } else {
        last.content.push_str(&block);
    }
    composed
}

/// Build the formatted block for a list of processed files, truncating each
/// file's content to `max_file_chars`.
pub fn attachment_block(files: &[ProcessedFile], max_file_chars: usize) -> String {
    let sections: Vec<String> = files
        .iter()
        .map(|file| {
            let content = file.content();
            format!(
                "--- {} ({}) ---\n{}\n",
                file.name,
                file.kind(),
                truncate_chars(&content, max_file_chars)
            )
        })
        .collect();
    format!("{}{}", BLOCK_HEADER, sections.join("\n"))
}

fn truncate_chars(content: &str, max_chars: usize) -> Cow<'_, str> {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!(
            "{}\n\n[Content truncated - file was too large. Showing first {} characters.]",
            &content[..cut],
            max_chars
        )),
        None => Cow::Borrowed(content),
    }
}
