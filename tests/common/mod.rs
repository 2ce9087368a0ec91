//! Test doubles shared by the integration tests.
#![allow(dead_code)]

use shadow_reader::backend::{Backend, Categories};
use shadow_reader::feed::{Entry, FeedReader, FetchError};
use shadow_reader::history::{History, HistoryError, HistoryState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn entries(titles: &[&str]) -> Vec<Entry> {
    titles
        .iter()
        .map(|t| Entry {
            title: t.to_string(),
            description: format!("about {}", t),
            link: Some(format!("https://example.com/{}", t)),
            ..Default::default()
        })
        .collect()
}

/// Backend with a fixed table; never used for parsing.
pub struct StaticBackend {
    categories: Categories,
}

impl StaticBackend {
    pub fn new() -> Self {
        Self {
            categories: Categories::new([
                ("us", "top news"),
                ("world", "world"),
                ("tech", "tech"),
            ]),
        }
    }
}

impl Backend for StaticBackend {
    fn name(&self) -> &'static str {
        "Static"
    }

    fn categories(&self) -> &Categories {
        &self.categories
    }

    fn default_category(&self) -> &str {
        "us"
    }

    fn feed_url(&self, category: &str) -> String {
        format!("https://example.com/{}", category)
    }

    fn parse_entries(&self, _bytes: &[u8]) -> Result<Vec<Entry>, FetchError> {
        Ok(Vec::new())
    }
}

enum Response {
    Entries(Vec<Entry>),
    Status(u16),
    Hang,
}

/// Feed reader answering from a table. Categories can be gated so their
/// fetch waits until `release` is called.
#[derive(Default)]
pub struct ScriptedReader {
    responses: Mutex<HashMap<String, Response>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, category: &str, titles: &[&str]) {
        self.responses
            .lock()
            .unwrap()
            .insert(category.to_string(), Response::Entries(entries(titles)));
    }

    pub fn fail(&self, category: &str, status: u16) {
        self.responses
            .lock()
            .unwrap()
            .insert(category.to_string(), Response::Status(status));
    }

    pub fn hang(&self, category: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(category.to_string(), Response::Hang);
    }

    pub fn gate(&self, category: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(category.to_string(), Arc::new(Notify::new()));
    }

    pub fn release(&self, category: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(category) {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl FeedReader for ScriptedReader {
    async fn fetch(&self, category: &str) -> Result<Vec<Entry>, FetchError> {
        self.calls.lock().unwrap().push(category.to_string());

        let gate = self.gates.lock().unwrap().get(category).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let answer = match self.responses.lock().unwrap().get(category) {
            Some(Response::Entries(list)) => Ok(Some(list.clone())),
            Some(Response::Status(code)) => Err(FetchError::HttpStatus(*code)),
            Some(Response::Hang) => Ok(None),
            None => Ok(Some(Vec::new())),
        };

        match answer? {
            Some(list) => Ok(list),
            None => std::future::pending().await,
        }
    }
}

/// History that records every pushed URL.
#[derive(Default)]
pub struct RecordingHistory {
    pub state: HistoryState,
    pub navigations: Vec<String>,
    pub replacements: Vec<String>,
}

impl RecordingHistory {
    pub fn starting_at(category: &str) -> Self {
        Self {
            state: HistoryState::for_category(category),
            ..Default::default()
        }
    }
}

impl History for RecordingHistory {
    fn state(&self) -> HistoryState {
        self.state.clone()
    }

    fn navigate(&mut self, url: &str) -> Result<(), HistoryError> {
        self.state = HistoryState::from_url(url)?;
        self.navigations.push(url.to_string());
        Ok(())
    }

    fn replace(&mut self, url: &str) -> Result<(), HistoryError> {
        self.state = HistoryState::from_url(url)?;
        self.replacements.push(url.to_string());
        Ok(())
    }

    fn back(&mut self) -> Option<HistoryState> {
        None
    }

    fn forward(&mut self) -> Option<HistoryState> {
        None
    }
}
