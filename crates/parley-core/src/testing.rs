//! In-memory fakes of the core ports, shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use parley_types::catalog::{AgentSpec, TaskSpec};
use parley_types::error::{CipherError, PipelineError, RepositoryError};
use parley_types::pipeline::PipelineOutput;
use parley_types::room::{ROOM_KEY_LEN, RoomKey};

use crate::cipher::ContentCipher;
use crate::pipeline::{AgentPipeline, Summarizer};
use crate::repository::{RecordStore, RoomRegistry};

pub fn room_key(byte: u8) -> RoomKey {
    RoomKey::new([byte; ROOM_KEY_LEN])
}

/// Record store over a map, with switchable failures.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<String, Vec<Vec<u8>>>>,
    failing_appends: AtomicU32,
    failing_reads: AtomicBool,
    pub reconnects: AtomicU32,
}

impl MemoryRecordStore {
    pub fn records(&self, room_id: &str) -> Vec<Vec<u8>> {
        self.records
            .lock()
            .unwrap()
            .get(room_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn fail_next_appends(&self, n: u32) {
        self.failing_appends.store(n, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.failing_reads.store(fail, Ordering::SeqCst);
    }
}

impl RecordStore for MemoryRecordStore {
    async fn append_record(&self, room_id: &str, content: &[u8]) -> Result<(), RepositoryError> {
        let failing = self
            .failing_appends
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(RepositoryError::Connection);
        }
        self.records
            .lock()
            .unwrap()
            .entry(room_id.to_string())
            .or_default()
            .push(content.to_vec());
        Ok(())
    }

    async fn list_records(
        &self,
        room_id: &str,
        limit: usize,
    ) -> Result<Vec<Vec<u8>>, RepositoryError> {
        if self.failing_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("disk on fire".into()));
        }
        let all = self.records(room_id);
        let skip = all.len().saturating_sub(limit);
        Ok(all.into_iter().skip(skip).collect())
    }

    async fn delete_records(&self, room_id: &str) -> Result<u64, RepositoryError> {
        let removed = self.records.lock().unwrap().remove(room_id);
        Ok(removed.map(|r| r.len() as u64).unwrap_or(0))
    }

    async fn reconnect(&self) -> Result<(), RepositoryError> {
        self.reconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Keyed XOR "cipher": the first byte tags the key so a wrong key is detected.
#[derive(Default)]
pub struct XorCipher {
    fail_encrypt: bool,
}

impl XorCipher {
    pub fn failing_encrypt() -> Self {
        Self { fail_encrypt: true }
    }
}

impl ContentCipher for XorCipher {
    fn encrypt(&self, key: &RoomKey, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        if self.fail_encrypt {
            return Err(CipherError::EncryptionFailed);
        }
        let k = key.as_bytes()[0];
        let mut out = vec![k];
        out.extend(plaintext.iter().map(|b| b ^ k));
        Ok(out)
    }

    fn decrypt(&self, key: &RoomKey, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let k = key.as_bytes()[0];
        match ciphertext.split_first() {
            Some((tag, body)) if *tag == k => Ok(body.iter().map(|b| b ^ k).collect()),
            Some(_) => Err(CipherError::DecryptionFailed),
            None => Err(CipherError::CiphertextTooShort),
        }
    }
}

pub struct FakeSummarizer {
    reply: Option<String>,
    pub calls: AtomicU32,
}

impl FakeSummarizer {
    pub fn replying(summary: &str) -> Self {
        Self {
            reply: Some(summary.to_string()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicU32::new(0),
        }
    }
}

impl Summarizer for FakeSummarizer {
    async fn summarize(&self, _history: &str) -> Result<String, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| PipelineError::Request("summarizer offline".into()))
    }
}

/// Pipeline that pops scripted results, then echoes `"{agent}: {input}"`.
#[derive(Default)]
pub struct ScriptedPipeline {
    script: Mutex<VecDeque<Result<PipelineOutput, PipelineError>>>,
    pub calls: AtomicU32,
    pub last_context: Mutex<Option<String>>,
}

impl ScriptedPipeline {
    pub fn push(&self, result: Result<PipelineOutput, PipelineError>) {
        self.script.lock().unwrap().push_back(result);
    }
}

impl AgentPipeline for ScriptedPipeline {
    async fn invoke(
        &self,
        agent: &AgentSpec,
        _task: &TaskSpec,
        context: &str,
        input: &str,
    ) -> Result<PipelineOutput, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_context.lock().unwrap() = Some(context.to_string());
        let scripted = self.script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(PipelineOutput::text(format!("{}: {input}", agent.name))))
    }
}

#[derive(Default)]
pub struct MapRegistry {
    keys: Mutex<HashMap<String, RoomKey>>,
}

impl MapRegistry {
    pub fn with_room(room_id: &str, key: RoomKey) -> Self {
        let registry = Self::default();
        registry.keys.lock().unwrap().insert(room_id.to_string(), key);
        registry
    }
}

impl RoomRegistry for MapRegistry {
    async fn lookup_room_key(&self, room_id: &str) -> Result<Option<RoomKey>, RepositoryError> {
        Ok(self.keys.lock().unwrap().get(room_id).cloned())
    }
}
