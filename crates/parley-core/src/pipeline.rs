//! Agent pipeline and summarizer traits.
//!
//! The core treats agent execution as an opaque async operation. The
//! OpenAI-compatible implementations live in parley-infra.

use parley_types::catalog::{AgentSpec, TaskSpec};
use parley_types::error::PipelineError;
use parley_types::pipeline::PipelineOutput;

/// Runs one task for one agent.
pub trait AgentPipeline: Send + Sync {
    /// Invoke the agent on `task` with the conversation window as `context`
    /// and the user's text as `input`.
    ///
    /// A transport failure is an `Err`; a pipeline that ran but reported a
    /// failure returns `Ok` with [`PipelineOutput::error`] set.
    fn invoke(
        &self,
        agent: &AgentSpec,
        task: &TaskSpec,
        context: &str,
        input: &str,
    ) -> impl std::future::Future<Output = Result<PipelineOutput, PipelineError>> + Send;
}

/// Condenses a long conversation history.
pub trait Summarizer: Send + Sync {
    fn summarize(
        &self,
        history: &str,
    ) -> impl std::future::Future<Output = Result<String, PipelineError>> + Send;
}
