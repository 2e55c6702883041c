//! Model gateway implementations for Switchboard.
//!
//! All providers implement the `switchboard_core::Provider` trait.

pub mod openai_compat;
pub mod sse;

pub use openai_compat::OpenAiCompatProvider;
