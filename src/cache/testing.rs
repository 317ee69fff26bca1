//! Recording [`CacheStore`] double for unit tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::store::{CacheStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fault {
    Reads,
    Writes,
    Deletes,
}

#[derive(Default)]
struct Calls {
    gets: usize,
    sets: Vec<(String, String)>,
    set_exs: Vec<(String, Duration, String)>,
    deletes: Vec<String>,
}

/// Returns a fixed text (or nothing) for every `GET` and records every command.
#[derive(Default)]
pub(crate) struct RecordingStore {
    text: Option<String>,
    faults: Vec<Fault>,
    calls: Mutex<Calls>,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_owned()),
            ..Self::default()
        }
    }

    pub(crate) fn failing(fault: Fault) -> Self {
        Self::new().fail(fault)
    }

    pub(crate) fn fail(mut self, fault: Fault) -> Self {
        self.faults.push(fault);
        self
    }

    pub(crate) fn gets(&self) -> usize {
        self.calls.lock().unwrap().gets
    }

    pub(crate) fn set_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().sets.clone()
    }

    pub(crate) fn set_ex_calls(&self) -> Vec<(String, Duration, String)> {
        self.calls.lock().unwrap().set_exs.clone()
    }

    pub(crate) fn deletes(&self) -> Vec<String> {
        self.calls.lock().unwrap().deletes.clone()
    }

    /// Total `SET` plus `SETEX` commands.
    pub(crate) fn writes(&self) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.sets.len() + calls.set_exs.len()
    }

    fn check(&self, fault: Fault) -> Result<(), StoreError> {
        if self.faults.contains(&fault) {
            Err(StoreError::Unavailable("connection refused".to_owned()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheStore for RecordingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        self.calls.lock().unwrap().gets += 1;
        self.check(Fault::Reads)?;
        Ok(self.text.clone())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.calls
            .lock()
            .unwrap()
            .sets
            .push((key.to_owned(), value.to_owned()));
        self.check(Fault::Writes)
    }

    async fn set_ex(&self, key: &str, ttl: Duration, value: &str) -> Result<(), StoreError> {
        self.calls
            .lock()
            .unwrap()
            .set_exs
            .push((key.to_owned(), ttl, value.to_owned()));
        self.check(Fault::Writes)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.calls.lock().unwrap().deletes.push(key.to_owned());
        self.check(Fault::Deletes)
    }
}
