//! The orchestration loop.
//!
//! One chain is a strictly sequential series of steps:
//!
//! 1. Ask the model (global context + prompt + history, single-shot).
//! 2. Clean the reply and interpret it as a [`Directive`].
//! 3. Describe an agent or invoke a tool, feed the result back as the next
//!    prompt and go to 1; or stop with an answer or a diagnostic.
//!
//! Chains share nothing mutable, so any number of them may run against one
//! [`Orchestrator`] at once.

use crate::context::GlobalContext;
use crate::outcome::{Diagnostic, TaskOutcome};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use switchboard_config::AppConfig;
use switchboard_core::agent::{Agent, Registry};
use switchboard_core::directive::Directive;
use switchboard_core::error::{DirectiveError, Error, ProviderError, Result};
use switchboard_core::event::{DomainEvent, EventBus};
use switchboard_core::message::Message;
use switchboard_core::provider::{ModelReply, Provider, ProviderRequest, ReplyStream, StreamEvent};
use switchboard_core::text::clean_reply;
use tracing::{debug, info, warn};

/// Default cap on model calls per chain.
pub const DEFAULT_MAX_STEPS: u32 = 25;

/// Routes a task between the model and the registered agents.
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    registry: Arc<Registry>,
    context: GlobalContext,
    model: String,
    temperature: Option<f32>,
    max_steps: u32,
    event_bus: Option<Arc<EventBus>>,
}

impl Orchestrator {
    pub fn builder(provider: Arc<dyn Provider>, agents: Vec<Agent>) -> OrchestratorBuilder {
        OrchestratorBuilder {
            provider,
            agents,
            model: "gpt-4o-mini".into(),
            temperature: None,
            system_prompt_suffix: None,
            max_steps: DEFAULT_MAX_STEPS,
            event_bus: None,
        }
    }

    /// Build with model, temperature, suffix and step cap taken from `config`.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        agents: Vec<Agent>,
        config: &AppConfig,
    ) -> Result<Self> {
        Self::builder(provider, agents)
            .model(&config.model)
            .temperature(config.temperature)
            .system_prompt_suffix(config.system_prompt_suffix.clone())
            .max_steps(config.max_steps)
            .build()
    }

    pub fn context(&self) -> &GlobalContext {
        &self.context
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Run a chain for `prompt`, with `history` placed before it.
    pub async fn execute_task(&self, prompt: &str, history: &[Message]) -> Result<TaskOutcome> {
        self.execute_task_with_log(prompt, history, |_| {}).await
    }

    /// Like [`execute_task`](Self::execute_task), but hands every cleaned
    /// model reply to `log` as it happens, followed by the diagnostic text
    /// when an agent or tool lookup misses.
    pub async fn execute_task_with_log<F>(
        &self,
        prompt: &str,
        history: &[Message],
        mut log: F,
    ) -> Result<TaskOutcome>
    where
        F: FnMut(&str) + Send,
    {
        let chain_id = uuid::Uuid::new_v4().to_string();
        let mut history = {
            let mut seeded = Vec::with_capacity(history.len() + 1);
            seeded.extend_from_slice(history);
            seeded.push(Message::user(prompt));
            seeded
        };
        let mut prompt = prompt.to_string();

        info!(
            chain_id = %chain_id,
            agents = self.registry.len(),
            max_steps = self.max_steps,
            "Starting chain"
        );

        for step in 1..=self.max_steps {
            let reply = self.next_reply(&prompt, &history).await?;
            log(&reply);
            self.publish(DomainEvent::ModelReplied {
                chain_id: chain_id.clone(),
                step,
                reply: reply.clone(),
                timestamp: Utc::now(),
            });

            let directive = match Directive::parse(&reply) {
                Ok(directive) => directive,
                Err(DirectiveError::NotAnObject) => {
                    let outcome = Diagnostic::WrongFormat { reply }.into();
                    return Ok(self.finish(&chain_id, step, outcome, &mut log));
                }
                Err(DirectiveError::Malformed(reason)) => {
                    let outcome = Diagnostic::MalformedDirective { reply, reason }.into();
                    return Ok(self.finish(&chain_id, step, outcome, &mut log));
                }
            };

            debug!(chain_id = %chain_id, step, directive = directive.kind(), "Interpreted reply");

            match directive {
                Directive::Describe { agent } => {
                    let Some(found) = agent.as_deref().and_then(|n| self.registry.resolve_agent(n))
                    else {
                        let outcome = Diagnostic::UnknownAgent { agent: agent.clone() }.into();
                        return Ok(self.finish(&chain_id, step, outcome, &mut log));
                    };

                    let tools = found.describe_tools()?;
                    history.push(Message::user(&prompt));
                    history.push(Message::assistant(&reply));
                    prompt = tools;
                }

                Directive::Invoke { agent, tool, input } => {
                    let Some(found) = self.registry.resolve_agent(&agent) else {
                        let outcome = Diagnostic::UnknownAgent { agent: Some(agent) }.into();
                        return Ok(self.finish(&chain_id, step, outcome, &mut log));
                    };
                    let Some(handle) = tool.as_deref().and_then(|t| self.registry.resolve_tool(found, t))
                    else {
                        let outcome = Diagnostic::UnknownTool {
                            agent: agent.clone(),
                            tool: tool.clone(),
                        }
                        .into();
                        return Ok(self.finish(&chain_id, step, outcome, &mut log));
                    };

                    let started = Instant::now();
                    let result = handle.call(input.as_deref()).await;
                    let duration_ms = started.elapsed().as_millis() as u64;

                    self.publish(DomainEvent::ToolInvoked {
                        chain_id: chain_id.clone(),
                        agent: found.name().to_string(),
                        tool: handle.tag().to_string(),
                        success: result.is_ok(),
                        duration_ms,
                        timestamp: Utc::now(),
                    });

                    match result {
                        Ok(output) => {
                            debug!(
                                chain_id = %chain_id,
                                agent = found.name(),
                                tool = handle.tag(),
                                duration_ms,
                                "Tool returned"
                            );
                            history.push(Message::user(&prompt));
                            history.push(Message::assistant(&reply));
                            history.push(Message::user(format!("tool response: {output}")));
                            prompt = output;
                        }
                        Err(e) => {
                            warn!(agent = found.name(), tool = handle.tag(), error = %e, "Tool execution failed");
                            let outcome = Diagnostic::ToolFailed {
                                agent: found.name().to_string(),
                                tool: handle.tag().to_string(),
                                reason: e.to_string(),
                            }
                            .into();
                            return Ok(self.finish(&chain_id, step, outcome, &mut log));
                        }
                    }
                }

                Directive::Answer { input } => {
                    let outcome = TaskOutcome::Answer(input.unwrap_or_default());
                    return Ok(self.finish(&chain_id, step, outcome, &mut log));
                }
            }
        }

        warn!(chain_id = %chain_id, max_steps = self.max_steps, "Chain hit the step limit");
        let outcome = Diagnostic::StepLimit {
            max_steps: self.max_steps,
        }
        .into();
        Ok(self.finish(&chain_id, self.max_steps, outcome, &mut log))
    }

    /// One raw model call with a caller-chosen system prompt, outside any chain.
    pub async fn ask_llm(
        &self,
        system_prompt: &str,
        prompt: &str,
        history: &[Message],
    ) -> Result<ModelReply> {
        let request = self.request(system_prompt, prompt, history);
        Ok(self.provider.complete(request).await?)
    }

    /// Streaming variant of [`ask_llm`](Self::ask_llm).
    pub async fn ask_llm_stream(
        &self,
        system_prompt: &str,
        prompt: &str,
        history: &[Message],
    ) -> Result<ReplyStream> {
        let request = self.request(system_prompt, prompt, history).streaming();
        Ok(self.provider.stream(request).await?)
    }

    /// Stream a raw model call into `on_event`.
    ///
    /// Deltas arrive in order; [`StreamEvent::End`] is delivered exactly once,
    /// last, even if the provider closed the stream without one. A transport
    /// error mid-stream stops delivery and is returned.
    pub async fn ask_llm_with<F>(
        &self,
        system_prompt: &str,
        prompt: &str,
        history: &[Message],
        mut on_event: F,
    ) -> Result<()>
    where
        F: FnMut(StreamEvent) + Send,
    {
        let mut stream = self.ask_llm_stream(system_prompt, prompt, history).await?;

        while let Some(event) = stream.recv().await {
            match event? {
                StreamEvent::End => break,
                delta => on_event(delta),
            }
        }

        on_event(StreamEvent::End);
        Ok(())
    }

    fn request(&self, system_prompt: &str, prompt: &str, history: &[Message]) -> ProviderRequest {
        ProviderRequest::compose(&self.model, system_prompt, prompt, history)
            .with_temperature(self.temperature)
    }

    /// Ask the model for the next step and clean its reply.
    async fn next_reply(&self, prompt: &str, history: &[Message]) -> Result<String> {
        let request = self.request(self.context.as_str(), prompt, history);
        match self.provider.complete(request).await {
            Ok(reply) => Ok(clean_reply(reply.content().unwrap_or_default())),
            Err(ProviderError::NoChoices) => {
                warn!(provider = self.provider.name(), "Model returned no choices");
                Ok(String::new())
            }
            Err(e) => Err(Error::Provider(e)),
        }
    }

    fn finish<F>(&self, chain_id: &str, steps: u32, outcome: TaskOutcome, log: &mut F) -> TaskOutcome
    where
        F: FnMut(&str),
    {
        if let Some(diagnostic) = outcome.diagnostic() {
            info!(chain_id, steps, kind = diagnostic.kind(), "Chain ended with diagnostic");
            // Lookup misses are the only diagnostics the log has not already seen.
            if matches!(
                diagnostic,
                Diagnostic::UnknownAgent { .. } | Diagnostic::UnknownTool { .. }
            ) {
                log(&diagnostic.to_string());
            }
        } else {
            info!(chain_id, steps, "Chain finished with answer");
        }

        self.publish(DomainEvent::ChainFinished {
            chain_id: chain_id.to_string(),
            steps,
            outcome: outcome.kind().to_string(),
            timestamp: Utc::now(),
        });
        outcome
    }

    fn publish(&self, event: DomainEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("provider", &self.provider.name())
            .field("agents", &self.registry.len())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_steps", &self.max_steps)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Orchestrator`].
pub struct OrchestratorBuilder {
    provider: Arc<dyn Provider>,
    agents: Vec<Agent>,
    model: String,
    temperature: Option<f32>,
    system_prompt_suffix: Option<String>,
    max_steps: u32,
    event_bus: Option<Arc<EventBus>>,
}

impl OrchestratorBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Extra instructions appended to the global context.
    pub fn system_prompt_suffix(mut self, suffix: Option<String>) -> Self {
        self.system_prompt_suffix = suffix;
        self
    }

    pub fn max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Validate the registry and render the global context.
    pub fn build(self) -> Result<Orchestrator> {
        if self.max_steps == 0 {
            return Err(Error::Config {
                message: "max_steps must be at least 1".into(),
            });
        }

        let registry = Registry::new(self.agents)?;
        let context = GlobalContext::build(&registry, self.system_prompt_suffix.as_deref())?;

        debug!(
            agents = registry.len(),
            context_len = context.as_str().len(),
            "Built global context"
        );

        Ok(Orchestrator {
            provider: self.provider,
            registry: Arc::new(registry),
            context,
            model: self.model,
            temperature: self.temperature,
            max_steps: self.max_steps,
            event_bus: self.event_bus,
        })
    }
}
