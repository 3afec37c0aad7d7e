use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::audio::turn::TurnPhase;
use crate::command::command_model::CommandOutcome;

/// One line in the session trace: a snapshot of where a turn stood when
/// something happened to it.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub turn: u64,

    pub phase: String,

    pub transcript: Option<String>,
    pub verdict: Option<String>,

    pub action: Option<String>,
    pub outcome: Option<String>,

    pub spoken: Option<String>,
    pub queue_len: Option<usize>,
}

impl TraceEvent {
    pub fn now(turn: u64, phase: TurnPhase) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_millis(),
            turn,
            phase: format!("{:?}", phase),
            transcript: None,
            verdict: None,
            action: None,
            outcome: None,
            spoken: None,
            queue_len: None,
        }
    }

    pub fn with_transcript(mut self, transcript: &str) -> Self {
        self.transcript = Some(transcript.to_string());
        self
    }

    pub fn with_verdict(mut self, verdict: impl ToString) -> Self {
        self.verdict = Some(verdict.to_string());
        self
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    pub fn with_outcome(mut self, outcome: &CommandOutcome) -> Self {
        self.outcome = Some(format!("{:?}", outcome));
        self
    }

    pub fn with_spoken(mut self, text: &str) -> Self {
        self.spoken = Some(text.to_string());
        self
    }

    pub fn with_queue_len(mut self, len: usize) -> Self {
        self.queue_len = Some(len);
        self
    }
}
