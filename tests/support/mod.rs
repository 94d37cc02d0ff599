// Scripted provider used by the orchestrator tests

#![allow(dead_code)]

use async_trait::async_trait;
use modelscan_core::model::{Completion, ModelProvider, ProviderError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted answer to `run`.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    OnDemandUnsupported,
    Fail(String),
}

#[derive(Default)]
pub struct Calls {
    pub runs: Mutex<Vec<(String, String)>>,
    pub listings: AtomicUsize,
}

impl Calls {
    pub fn runs(&self) -> Vec<(String, String)> {
        self.runs.lock().expect("lock").clone()
    }

    pub fn listings(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }
}

pub struct ScriptedProvider {
    id: String,
    ready: bool,
    models: Vec<String>,
    replies: Mutex<VecDeque<Reply>>,
    elapsed: Duration,
    calls: Arc<Calls>,
}

impl ScriptedProvider {
    pub fn new(id: &str, models: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            ready: true,
            models: models.iter().map(|model| model.to_string()).collect(),
            replies: Mutex::new(VecDeque::new()),
            elapsed: Duration::from_millis(1500),
            calls: Arc::new(Calls::default()),
        }
    }

    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn with_replies(self, replies: Vec<Reply>) -> Self {
        *self.replies.lock().expect("lock") = replies.into();
        self
    }

    pub fn calls(&self) -> Arc<Calls> {
        Arc::clone(&self.calls)
    }

    pub fn boxed(self) -> Box<dyn ModelProvider> {
        Box::new(self)
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn list_models(&self) -> Vec<String> {
        self.calls.listings.fetch_add(1, Ordering::SeqCst);
        if !self.ready {
            return Vec::new();
        }
        self.models.clone()
    }

    async fn run(&self, prompt: &str, model_id: &str) -> Result<Completion, ProviderError> {
        if !self.ready {
            return Err(ProviderError::not_initialized(&self.id));
        }
        self.calls
            .runs
            .lock()
            .expect("lock")
            .push((model_id.to_string(), prompt.to_string()));

        let reply = self
            .replies
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Reply::Text(format!("{model_id} says hi")));
        match reply {
            Reply::Text(text) => Ok(Completion::new(text, self.elapsed)),
            Reply::OnDemandUnsupported => Err(ProviderError::on_demand_unsupported(model_id)),
            Reply::Fail(message) => Err(ProviderError::api(&self.id, 500, message)),
        }
    }
}

pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
