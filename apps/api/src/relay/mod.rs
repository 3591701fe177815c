//! Relay endpoints: chat, side-by-side comparison, and prompt composition.

pub mod compose;
pub mod handlers;
