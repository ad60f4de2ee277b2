//! Configuration types for Parley.
//!
//! `ParleyConfig` represents the top-level `parley.toml`. Every section and
//! field has a default, so an empty file (or no file) yields a working bot.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Parley bot.
///
/// Loaded from `~/.parley/parley.toml` (or `$PARLEY_DATA_DIR/parley.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParleyConfig {
    pub cache: CacheConfig,
    pub session: SessionConfig,
    pub rate_limit: RateLimitConfig,
    pub retry: RetryConfig,
    pub memory: MemoryConfig,
    pub sweep: SweepConfig,
    pub llm: LlmConfig,
    pub catalog: CatalogConfig,
}

/// Response cache sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_size: usize,
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 100,
            ttl_seconds: 3600,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// Inactivity timeout for per-(user, room) sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub timeout_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 3600,
        }
    }
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Fixed-window rate limiting per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub window_seconds: u64,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_seconds: 60,
            max_requests: 5,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }
}

/// Retry policy for pipeline invocations (fixed delay, not exponential).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_seconds: 2,
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_seconds)
    }
}

/// Conversation memory loading and compaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Estimated token count above which history is summarized.
    pub token_threshold: u32,
    /// Maximum number of records read per load (most recent first).
    pub max_records: u32,
    /// Characters of raw history kept when summarization fails.
    pub truncate_chars: usize,
    /// Records appended verbatim after a summary.
    pub recent_records: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            token_threshold: 8000,
            max_records: 100,
            truncate_chars: 4000,
            recent_records: 4,
        }
    }
}

/// Background sweep of expired cache entries, sessions and rate windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub interval_seconds: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300,
        }
    }
}

impl SweepConfig {
    /// Sweep period, never shorter than one second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds.max(1))
    }
}

/// OpenAI-compatible chat-completions endpoint used for agents and summaries.
///
/// The API key is never stored in the file; it is read from the environment
/// variable named by `api_key_env` at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
    pub temperature: f32,
    pub summary_temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            model: "mixtral".to_string(),
            api_key_env: "PARLEY_LLM_API_KEY".to_string(),
            temperature: 0.7,
            summary_temperature: 0.3,
            max_tokens: 4096,
        }
    }
}

/// Locations of the agent and task YAML catalogs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub agents_path: PathBuf,
    pub tasks_path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            agents_path: PathBuf::from("config/agents.yaml"),
            tasks_path: PathBuf::from("config/tasks.yaml"),
        }
    }
}
