//! Chat messages and the composer that folds attachments into them.

pub mod compose;
pub mod message;

pub use compose::{compose, ComposeLimits};
pub use message::{ChatMessage, Role};
