//! # Switchboard Core
//!
//! Domain types, traits, and error definitions for the Switchboard LLM
//! orchestrator. Every other crate in the workspace depends inward on this one.
//!
//! ## Contents
//!
//! - [`message`] — chat messages and the conversation history
//! - [`provider`] — the model gateway trait and the wire-level reply types
//! - [`tool`] / [`agent`] — the passive agent and tool descriptors plus the
//!   registry the orchestrator resolves names against
//! - [`directive`] — the textual protocol the model uses to drive the loop
//! - [`text`] — the pre-processing applied to model output before parsing
//! - [`event`] — broadcast domain events for observers

pub mod agent;
pub mod directive;
pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod text;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use agent::{Agent, Registry};
pub use directive::Directive;
pub use error::{DirectiveError, Error, ProviderError, Result, ToolError};
pub use event::{DomainEvent, EventBus};
pub use message::{Message, Role};
pub use provider::{ModelReply, Provider, ProviderRequest, StreamEvent};
pub use tool::{FnTool, Tool, ToolDescriptor};
