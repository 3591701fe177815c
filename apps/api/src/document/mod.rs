//! Shareable-document support: the ephemeral store plus its two endpoints.

pub mod handlers;
pub mod store;
