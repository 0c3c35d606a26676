//! Relay for Gemini content generation
//!
//! Accepts text or text+image prompts over HTTP, forwards them to the Gemini
//! `generateContent` API with a server-side key, and returns the result in a
//! normalized JSON envelope.

pub mod ai;
pub mod app;
pub mod error;
pub mod handler;
pub mod models;

pub use error::{Error, Result};
