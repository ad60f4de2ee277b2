//! Agent and task definitions.
//!
//! Both catalogs are YAML mappings keyed by name:
//!
//! ```yaml
//! # agents.yaml
//! researcher:
//!   role: Research analyst
//!   goal: Find accurate answers
//!   backstory: Years of library science.
//!
//! # tasks.yaml
//! summarize:
//!   description: "Summarize the following: {content}"
//!   expected_output: A short paragraph.
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Placeholder in a task description replaced by the user's input.
pub const CONTENT_PLACEHOLDER: &str = "{content}";

/// Persona of an agent the bot can impersonate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    #[serde(default)]
    pub name: String,
    pub role: String,
    pub goal: String,
    #[serde(default)]
    pub backstory: String,
    /// Overrides the configured default model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A unit of work an agent can be asked to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    #[serde(default)]
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub expected_output: String,
}

impl TaskSpec {
    /// Substitute the user's input into the task description.
    pub fn render(&self, content: &str) -> String {
        self.description.replace(CONTENT_PLACEHOLDER, content)
    }
}

/// Named agents and tasks available to chat commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentCatalog {
    agents: BTreeMap<String, AgentSpec>,
    tasks: BTreeMap<String, TaskSpec>,
}

impl AgentCatalog {
    /// Build a catalog, stamping each spec with its map key as name.
    pub fn new(
        agents: BTreeMap<String, AgentSpec>,
        tasks: BTreeMap<String, TaskSpec>,
    ) -> Self {
        let agents = agents
            .into_iter()
            .map(|(name, mut spec)| {
                spec.name = name.clone();
                (name, spec)
            })
            .collect();
        let tasks = tasks
            .into_iter()
            .map(|(name, mut spec)| {
                spec.name = name.clone();
                (name, spec)
            })
            .collect();
        Self { agents, tasks }
    }

    /// Parse both catalogs from YAML text. `source` labels errors.
    pub fn from_yaml(
        agents_yaml: &str,
        tasks_yaml: &str,
        source: &str,
    ) -> Result<Self, CatalogError> {
        Ok(Self::new(
            parse_agents(agents_yaml, source)?,
            parse_tasks(tasks_yaml, source)?,
        ))
    }

    pub fn agent(&self, name: &str) -> Option<&AgentSpec> {
        self.agents.get(name)
    }

    pub fn task(&self, name: &str) -> Option<&TaskSpec> {
        self.tasks.get(name)
    }

    pub fn agent_names(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }
}

/// Parse a name -> agent mapping. Empty text yields an empty map.
pub fn parse_agents(yaml: &str, source: &str) -> Result<BTreeMap<String, AgentSpec>, CatalogError> {
    parse_mapping(yaml, source)
}

/// Parse a name -> task mapping. Empty text yields an empty map.
pub fn parse_tasks(yaml: &str, source: &str) -> Result<BTreeMap<String, TaskSpec>, CatalogError> {
    parse_mapping(yaml, source)
}

fn parse_mapping<T: serde::de::DeserializeOwned>(
    yaml: &str,
    source: &str,
) -> Result<BTreeMap<String, T>, CatalogError> {
    if yaml.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_yaml_ng::from_str(yaml).map_err(|e| CatalogError::Parse {
        path: source.to_string(),
        message: e.to_string(),
    })
}
