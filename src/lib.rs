//! chatrelay: folds uploaded attachments into a chat conversation and relays
//! it to a language-model provider.

pub mod attachments;
pub mod chat;
pub mod config;
pub mod gateway;
pub mod providers;
