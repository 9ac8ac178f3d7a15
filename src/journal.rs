//! In-memory diagnostic log shown by the debug overlay.

use std::collections::VecDeque;
use std::fmt;

use chrono::Local;

pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn tag(self) -> char {
        match self {
            Severity::Debug => 'D',
            Severity::Info => 'I',
            Severity::Warning => 'W',
            Severity::Error => 'E',
        }
    }
}

/// Bounded list of timestamped entries; the oldest entry is dropped once
/// `capacity` is reached.
#[derive(Clone, Debug)]
pub struct Journal {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Journal {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn log(&mut self, severity: Severity, message: impl fmt::Display) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        let timestamp = Local::now().format("%H:%M:%S%.3f");
        self.entries
            .push_back(format!("{} [{}] {}", severity.tag(), timestamp, message));
    }

    pub fn debug(&mut self, message: impl fmt::Display) {
        self.log(Severity::Debug, message);
    }

    pub fn info(&mut self, message: impl fmt::Display) {
        self.log(Severity::Info, message);
    }

    pub fn warning(&mut self, message: impl fmt::Display) {
        self.log(Severity::Warning, message);
    }

    pub fn error(&mut self, message: impl fmt::Display) {
        self.log(Severity::Error, message);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last `count` entries, oldest first, each cut to `width` characters.
    pub fn tail(&self, count: usize, width: usize) -> Vec<String> {
        let start = self.entries.len().saturating_sub(count);
        self.entries
            .iter()
            .skip(start)
            .map(|entry| entry.chars().take(width).collect())
            .collect()
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}
