//! Vision analysis: multi-provider client with retry, fallback, and
//! filename-safe sanitization.
//!
//! Providers are tried in priority order (Hugging Face captioning first,
//! OpenAI vision chat as fallback); if every provider fails or none is
//! configured, a deterministic fallback derived from the file name keeps the
//! pipeline moving.

pub(crate) mod caption;
pub(crate) mod client;
pub(crate) mod fallback;
pub(crate) mod huggingface;
pub(crate) mod openai;
pub(crate) mod provider;
pub(crate) mod retry;
pub(crate) mod sanitize;

pub use client::VisionClient;
pub use provider::{ImageInput, VisionProvider};
pub use sanitize::sanitize;
