use serde::Serialize;
use std::fmt;

/// Where a run is in its fetch, encode, write cycle.
///
/// `Start -> Fetching -> (Done | Encoding -> Writing -> Fetching)`; any
/// fetch, encode or write error moves straight to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Start,
    Fetching,
    Encoding,
    Writing,
    Done,
    Failed,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Start => "START",
            RunState::Fetching => "FETCHING",
            RunState::Encoding => "ENCODING",
            RunState::Writing => "WRITING",
            RunState::Done => "DONE",
            RunState::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;
        match (self, next) {
            (Start, Fetching) => true,
            (Fetching, Encoding | Done) => true,
            (Encoding, Writing) => true,
            (Writing, Fetching) => true,
            (Fetching | Encoding | Writing, Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
