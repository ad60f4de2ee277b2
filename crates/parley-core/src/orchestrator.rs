//! Request orchestrator.
//!
//! Composes the state and resilience components around each chat command:
//!
//! ```text
//! rate check -> cache check -> (hit) reply
//!                           -> (miss) catalog + room key + session + memory
//!                              -> metrics(retry(pipeline.invoke))
//!                              -> (ok) persist, update session, cache, reply
//!                              -> (err) error reply
//! ```
//!
//! Every failure ends in a reply; nothing here can take down the caller's
//! processing loop.

use std::sync::Arc;

use serde_json::json;

use parley_types::catalog::AgentCatalog;
use parley_types::config::ParleyConfig;
use parley_types::error::CommandError;
use parley_types::pipeline::PipelineOutput;
use parley_types::reply::{Reply, ReplySource};

use crate::cache::ResponseCache;
use crate::cipher::ContentCipher;
use crate::command::ChatCommand;
use crate::memory::ConversationMemory;
use crate::metrics::MetricsRecorder;
use crate::pipeline::{AgentPipeline, Summarizer};
use crate::rate_limit::RateLimiter;
use crate::repository::{RecordStore, RoomRegistry};
use crate::retry::RetryPolicy;
use crate::session::SessionStore;

/// Name under which pipeline calls are timed.
const PIPELINE_OPERATION: &str = "process_agent_message";

/// The shared in-memory components, constructed once per process.
pub struct StateLayer {
    pub cache: Arc<ResponseCache>,
    pub sessions: Arc<SessionStore>,
    pub limiter: Arc<RateLimiter>,
    pub metrics: Arc<MetricsRecorder>,
    pub retry: RetryPolicy,
}

impl StateLayer {
    pub fn from_config(config: &ParleyConfig) -> Self {
        Self {
            cache: Arc::new(ResponseCache::from_config(&config.cache)),
            sessions: Arc::new(SessionStore::from_config(&config.session)),
            limiter: Arc::new(RateLimiter::from_config(&config.rate_limit)),
            metrics: Arc::new(MetricsRecorder::new()),
            retry: RetryPolicy::from_config(&config.retry),
        }
    }
}

pub struct Orchestrator<P, R, S, C, Z> {
    catalog: AgentCatalog,
    state: StateLayer,
    pipeline: P,
    registry: R,
    memory: ConversationMemory<S, C, Z>,
}

impl<P, R, S, C, Z> Orchestrator<P, R, S, C, Z>
where
    P: AgentPipeline,
    R: RoomRegistry,
    S: RecordStore,
    C: ContentCipher,
    Z: Summarizer,
{
    pub fn new(
        catalog: AgentCatalog,
        state: StateLayer,
        pipeline: P,
        registry: R,
        memory: ConversationMemory<S, C, Z>,
    ) -> Self {
        Self {
            catalog,
            state,
            pipeline,
            registry,
            memory,
        }
    }

    pub fn catalog(&self) -> &AgentCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &StateLayer {
        &self.state
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn memory(&self) -> &ConversationMemory<S, C, Z> {
        &self.memory
    }

    /// Handle a raw chat message.
    ///
    /// Returns `None` when the message is not a command or names an agent
    /// that does not exist; the bot stays silent in both cases.
    pub async fn handle_message(&self, user_id: &str, room_id: &str, body: &str) -> Option<Reply> {
        let command = ChatCommand::parse(body)?;
        if self.catalog.agent(&command.agent).is_none() {
            tracing::debug!(agent = %command.agent, "ignoring message for unknown agent");
            return None;
        }
        Some(
            self.handle_command_detailed(
                user_id,
                room_id,
                &command.agent,
                &command.task,
                &command.content,
            )
            .await,
        )
    }

    /// Handle a parsed command and return the text to send back.
    pub async fn handle_command(
        &self,
        user_id: &str,
        room_id: &str,
        agent: &str,
        task: &str,
        content: &str,
    ) -> String {
        self.handle_command_detailed(user_id, room_id, agent, task, content)
            .await
            .text
    }

    /// Handle a parsed command, reporting which stage produced the reply.
    #[tracing::instrument(skip(self, content), fields(content_len = content.len()))]
    pub async fn handle_command_detailed(
        &self,
        user_id: &str,
        room_id: &str,
        agent: &str,
        task: &str,
        content: &str,
    ) -> Reply {
        if !self.state.limiter.allow(user_id) {
            return reply_error(CommandError::RateLimitExceeded, ReplySource::RateLimited);
        }

        if let Some(cached) = self.state.cache.get(agent, task, content) {
            return Reply::new(cached, ReplySource::Cache);
        }
        tracing::debug!("cache miss");

        match self.run_pipeline(user_id, room_id, agent, task, content).await {
            Ok(text) => Reply::new(text, ReplySource::Pipeline),
            Err(e @ CommandError::Pipeline(_)) | Err(e @ CommandError::Registry(_)) => {
                tracing::error!(error = %e, "command failed");
                reply_error(e, ReplySource::Failed)
            }
            Err(e) => reply_error(e, ReplySource::Rejected),
        }
    }

    async fn run_pipeline(
        &self,
        user_id: &str,
        room_id: &str,
        agent_name: &str,
        task_name: &str,
        content: &str,
    ) -> Result<String, CommandError> {
        let agent = self
            .catalog
            .agent(agent_name)
            .ok_or_else(|| CommandError::UnknownAgent(agent_name.to_string()))?;
        let task = self
            .catalog
            .task(task_name)
            .ok_or_else(|| CommandError::UnknownTask(task_name.to_string()))?;
        let key = self
            .registry
            .lookup_room_key(room_id)
            .await?
            .ok_or(CommandError::RoomNotRegistered)?;

        let session = self.state.sessions.get_or_create(user_id, room_id);
        let window = self.memory.load(room_id, &key).await;
        tracing::debug!(
            session_id = %session.id,
            records = window.records_loaded,
            skipped = window.records_skipped,
            compaction = ?window.compaction,
            "context loaded"
        );

        let context = window.text.as_str();
        let pipeline = &self.pipeline;
        let text = self
            .state
            .metrics
            .instrument(
                PIPELINE_OPERATION,
                self.state.retry.run(move || async move {
                    pipeline
                        .invoke(agent, task, context, content)
                        .await
                        .and_then(PipelineOutput::into_result)
                }),
            )
            .await?;

        self.memory.append(room_id, &key, content, &text).await;
        self.record_turn(user_id, room_id, agent_name, task_name);
        self.state.cache.set(agent_name, task_name, content, &text);
        Ok(text)
    }

    fn record_turn(&self, user_id: &str, room_id: &str, agent: &str, task: &str) {
        self.state
            .sessions
            .update_context_with(user_id, room_id, |context| {
                let turns = context.get("turns").and_then(|v| v.as_u64()).unwrap_or(0);
                context.insert("turns".to_string(), json!(turns + 1));
                context.insert("last_agent".to_string(), json!(agent));
                context.insert("last_task".to_string(), json!(task));
            });
    }
}

fn reply_error(error: CommandError, source: ReplySource) -> Reply {
    Reply::new(error.to_string(), source)
}
