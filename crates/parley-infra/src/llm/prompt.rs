//! Prompt construction for agent and summary requests.

use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent,
};

use parley_types::catalog::{AgentSpec, TaskSpec};

/// Persona text for the system message.
pub fn system_prompt(agent: &AgentSpec) -> String {
    let mut prompt = format!("You are {}.\nYour goal: {}", agent.role, agent.goal);
    if !agent.backstory.trim().is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(agent.backstory.trim());
    }
    prompt
}

/// Task text for the user message, preceded by the conversation so far.
pub fn task_prompt(task: &TaskSpec, context: &str, input: &str) -> String {
    let mut prompt = String::new();
    if !context.is_empty() {
        prompt.push_str("Conversation so far:\n");
        prompt.push_str(context);
        prompt.push_str("\n\n");
    }
    prompt.push_str("Task: ");
    prompt.push_str(&task.render(input));
    if !task.expected_output.is_empty() {
        prompt.push_str("\n\nExpected output: ");
        prompt.push_str(&task.expected_output);
    }
    prompt
}

pub fn summary_prompt(history: &str) -> String {
    format!(
        "Summarize the following conversation history concisely, focusing on key points \
         and preserving important information:\n\n{history}"
    )
}

pub fn agent_messages(
    agent: &AgentSpec,
    task: &TaskSpec,
    context: &str,
    input: &str,
) -> Vec<ChatCompletionRequestMessage> {
    vec![
        system_message(system_prompt(agent)),
        user_message(task_prompt(task, context, input)),
    ]
}

pub fn summary_messages(history: &str) -> Vec<ChatCompletionRequestMessage> {
    vec![user_message(summary_prompt(history))]
}

fn system_message(text: String) -> ChatCompletionRequestMessage {
    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
        content: ChatCompletionRequestSystemMessageContent::Text(text),
        name: None,
    })
}

fn user_message(text: String) -> ChatCompletionRequestMessage {
    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
        content: ChatCompletionRequestUserMessageContent::Text(text),
        name: None,
    })
}
