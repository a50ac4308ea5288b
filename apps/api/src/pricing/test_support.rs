//! Deterministic fakes for the pricing pipeline's collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::llm_client::{LlmError, TextCompleter};
use crate::pricing::rate_lookup::ProfileStore;
use crate::pricing::ServiceDescriptor;

/// Answers classification and estimation prompts with canned text.
/// `None` simulates an unavailable service.
#[derive(Default)]
pub struct ScriptedCompleter {
    pub model_answer: Option<&'static str>,
    pub complexity_answer: Option<&'static str>,
    calls: AtomicUsize,
}

impl ScriptedCompleter {
    pub fn new(model_answer: Option<&'static str>, complexity_answer: Option<&'static str>) -> Self {
        Self {
            model_answer,
            complexity_answer,
            calls: AtomicUsize::new(0),
        }
    }

    /// A completer whose every call fails.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextCompleter for ScriptedCompleter {
    async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = if prompt.contains("\"modeloCobro\"") {
            self.model_answer
        } else {
            self.complexity_answer
        };
        answer.map(str::to_string).ok_or(LlmError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }
}

/// In-memory profile store. `failing` makes every read error out.
#[derive(Default)]
pub struct MemoryProfileStore {
    pub rates: HashMap<String, f64>,
    pub failing: bool,
    reads: AtomicUsize,
}

impl MemoryProfileStore {
    pub fn with_rate(user_id: &str, rate: f64) -> Self {
        let mut store = Self::default();
        store.rates.insert(user_id.to_string(), rate);
        store
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn hourly_rate(&self, user_id: &str) -> anyhow::Result<Option<f64>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            anyhow::bail!("profile store unreachable");
        }
        Ok(self.rates.get(user_id).copied())
    }
}

pub fn service(name: &str, description: &str, details: &str) -> ServiceDescriptor {
    ServiceDescriptor {
        name: name.to_string(),
        description: description.to_string(),
        details: details.to_string(),
        estimated_time: None,
        inclusions: vec![],
    }
}
