//! Testing utilities for the coverun workspace
//!
//! Shared fixtures: export-map builders, cover shorthands, an in-memory
//! event log for ordering assertions and a cloneable capture sink for
//! reporter output.

#![allow(missing_docs)]

use coverun_registry::{CheckResult, Cover, Export, ExportMap};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Build an [`ExportMap`] from `(name, export)` pairs.
pub fn exports(entries: Vec<(&str, Export)>) -> ExportMap {
    entries
        .into_iter()
        .map(|(name, export)| (name.to_string(), export))
        .collect()
}

/// Build a container export from `(name, export)` pairs.
pub fn container(entries: Vec<(&str, Export)>) -> Export {
    Export::Container(exports(entries))
}

/// A cover returning no verdict (implicit pass).
pub fn implicit_cover() -> Export {
    Export::Function(Cover::new(|| Ok(CheckResult::Implicit)))
}

/// A cover returning a direct boolean verdict.
pub fn verdict_cover(verdict: bool) -> Export {
    Export::Function(Cover::new(move || Ok(CheckResult::Verdict(verdict))))
}

/// A cover built from an arbitrary synchronous body.
pub fn cover_from(
    body: impl Fn() -> anyhow::Result<CheckResult> + Send + Sync + 'static,
) -> Export {
    Export::Function(Cover::new(body))
}

/// Write a `coverun.json` with the given text into `dir`, creating the
/// directory first.
pub fn write_project(dir: &Path, config_text: &str) {
    std::fs::create_dir_all(dir).expect("create project dir");
    std::fs::write(dir.join("coverun.json"), config_text).expect("write project config");
}

/// Cloneable, thread-safe event log for ordering assertions.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().expect("event log poisoned").push(event.into());
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.events.lock().expect("event log poisoned").clone()
    }
}

/// Cloneable writer capturing everything written to it.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().expect("capture sink poisoned")).into_owned()
    }
}

impl Write for CaptureSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .expect("capture sink poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
