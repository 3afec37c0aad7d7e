use std::time::{Duration, Instant};

use crate::audio::queue::{Admission, CommandQueue};
use crate::session::session_state::SessionState;

/// Synthesis rate used to estimate playback duration.
const SPEECH_CHARS_PER_SEC: u64 = 15;

/// Margin on top of the rate estimate covering synthesis startup latency.
const SPEECH_BUFFER: Duration = Duration::from_millis(500);

/// Gap between speech completion and dispatching the next queued entry.
const DRAIN_GAP: Duration = Duration::from_millis(300);

/// Rate-only playback estimate for a reply, without the startup margin.
/// Callers scheduling work after playback add their own margin to this.
pub fn playback_estimate(text: &str) -> Duration {
    Duration::from_millis((text.chars().count() as u64 * 1000) / SPEECH_CHARS_PER_SEC)
}

/// Where the controller is in the turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Listening,
    Processing,
    Speaking,
}

/// Routing verdict for a freshly recognized transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnDecision {
    /// Channel free: process it now.
    Dispatch(String),
    /// Speech or another command in flight: parked in the queue.
    Queued,
    /// Failed an admission gate.
    Dropped(Admission),
    /// Session is not listening; recognition output is discarded.
    Ignored,
}

/// Turn state machine: `idle → listening → {processing, speaking} →
/// listening`, any state dropping to `idle` on explicit stop.
///
/// Guarantees at most one command in flight, and that a transcript arriving
/// while a reply plays is queued rather than executed over it. Speech
/// completion is approximated by a duration timer; the gateway's
/// playback-finished event short-circuits the timer when it arrives first.
/// All clocks are injected through `now` arguments so the machine is
/// deterministic under test.
pub struct TurnController {
    state: SessionState,
    queue: CommandQueue,
    processing: bool,
    speech_deadline: Option<Instant>,
    drain_at: Option<Instant>,
}

impl TurnController {
    pub fn new(language: &str) -> Self {
        TurnController {
            state: SessionState::new(language),
            queue: CommandQueue::new(),
            processing: false,
            speech_deadline: None,
            drain_at: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> TurnPhase {
        if !self.state.listening {
            TurnPhase::Idle
        } else if self.processing {
            TurnPhase::Processing
        } else if self.state.speaking {
            TurnPhase::Speaking
        } else {
            TurnPhase::Listening
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn language(&self) -> &str {
        &self.state.language
    }

    pub fn set_language(&mut self, language: &str) {
        self.state.language = language.to_string();
    }

    pub fn begin_listening(&mut self) {
        self.state.listening = true;
    }

    /// Drop to idle: queue cleared, timers cancelled, flags lowered.
    /// Halting in-flight synthesis is the gateway's job; the caller sends
    /// that separately.
    pub fn stop(&mut self) {
        self.state.listening = false;
        self.state.speaking = false;
        self.state.awaiting_queue_drain = false;
        self.processing = false;
        self.queue.clear();
        self.speech_deadline = None;
        self.drain_at = None;
    }

    /// Estimated playback duration for a reply, startup margin included.
    pub fn speech_estimate(text: &str) -> Duration {
        playback_estimate(text) + SPEECH_BUFFER
    }

    /// Admission plus routing for a final transcript.
    ///
    /// The caller must process a `Dispatch` transcript and then call
    /// `on_turn_complete`; `Queued` entries come back later through `poll`.
    pub fn on_final_transcript(&mut self, raw: &str, now: Instant) -> TurnDecision {
        if !self.state.listening {
            return TurnDecision::Ignored;
        }
        match self.queue.admit(raw, now) {
            Admission::Accepted(transcript) => {
                if self.state.speaking || self.processing || self.drain_at.is_some() {
                    self.queue.push(transcript, now);
                    self.state.awaiting_queue_drain = true;
                    TurnDecision::Queued
                } else {
                    self.processing = true;
                    TurnDecision::Dispatch(transcript)
                }
            }
            verdict => TurnDecision::Dropped(verdict),
        }
    }

    /// A reply was handed to the synthesis channel.
    pub fn on_speech_submitted(&mut self, text: &str, now: Instant) {
        self.state.speaking = true;
        self.speech_deadline = Some(now + Self::speech_estimate(text));
        if !self.queue.is_empty() {
            self.state.awaiting_queue_drain = true;
        }
    }

    /// Synthesis failed. Speaking flag and timer drop; queued entries still
    /// drain so a bad reply cannot strand the queue.
    pub fn on_speech_error(&mut self, now: Instant) {
        self.state.speaking = false;
        self.speech_deadline = None;
        self.schedule_drain(now);
    }

    /// Genuine end-of-playback signal, ahead of or behind the estimate.
    /// Also used when playback is halted on request.
    pub fn on_playback_finished(&mut self, now: Instant) {
        if self.state.speaking {
            self.finish_speech(now);
        }
    }

    /// The dispatched command ran to completion. If it produced no speech
    /// there is no timer to wait out, so any queued entries drain directly.
    pub fn on_turn_complete(&mut self, now: Instant) {
        self.processing = false;
        if !self.state.speaking {
            self.schedule_drain(now);
        }
    }

    /// Fire due timers. Returns a queued transcript once the drain gap has
    /// elapsed; at most one per call, and the caller owes an
    /// `on_turn_complete` for it just like a dispatched one.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if let Some(deadline) = self.speech_deadline {
            if now >= deadline {
                self.finish_speech(now);
            }
        }
        if let Some(at) = self.drain_at {
            if now >= at {
                self.drain_at = None;
                if let Some(entry) = self.queue.pop() {
                    self.state.awaiting_queue_drain = !self.queue.is_empty();
                    self.processing = true;
                    return Some(entry.transcript);
                }
                self.state.awaiting_queue_drain = false;
            }
        }
        None
    }

    /// Earliest instant at which `poll` has work, for loop pacing.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.speech_deadline, self.drain_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }

    fn finish_speech(&mut self, now: Instant) {
        self.state.speaking = false;
        self.speech_deadline = None;
        self.schedule_drain(now);
    }

    fn schedule_drain(&mut self, now: Instant) {
        if self.queue.is_empty() {
            self.state.awaiting_queue_drain = false;
        } else if self.drain_at.is_none() {
            self.drain_at = Some(now + DRAIN_GAP);
        }
    }
}
