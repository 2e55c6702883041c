//! The orchestration loop — the heart of Switchboard.
//!
//! The model drives every chain through a small JSON protocol:
//!
//! 1. **Receive** a task prompt (plus optional earlier history)
//! 2. **Ask** the model, sending the global context as the system prompt
//! 3. **Describe**: send back an agent's tool descriptors, loop to step 2
//! 4. **Invoke**: run the named tool, send back its output, loop to step 2
//! 5. **Answer**: return the model's `input` to the caller
//!
//! Anything the loop cannot follow ends the chain with a [`Diagnostic`]
//! instead of an error. The chain is capped at `max_steps` model calls.

pub mod context;
pub mod orchestrator;
pub mod outcome;

#[cfg(test)]
mod test_helpers;

pub use context::GlobalContext;
pub use orchestrator::{Orchestrator, OrchestratorBuilder, DEFAULT_MAX_STEPS};
pub use outcome::{Diagnostic, TaskOutcome};
