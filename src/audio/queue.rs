use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Transcripts shorter than this many characters are recognition noise.
const MIN_TRANSCRIPT_CHARS: usize = 2;

/// Below this word count a transcript must be a known short command.
const MIN_CONTENT_WORDS: usize = 3;

/// Window in which an identical transcript is treated as an echo of the
/// previous one.
const DUPLICATE_WINDOW: Duration = Duration::from_secs(2);

/// Single-word utterances that carry a complete command on their own.
/// Anything else under the word minimum is dropped.
const SHORT_COMMANDS: [&str; 12] = [
    "help", "exit", "quit", "stop", "home", "back", "forward", "refresh", "print", "tab",
    "enter", "click",
];

/// Recognition output arrives in mixed case with stray whitespace; every
/// gate and the interpreter work on this normalized form.
pub fn normalize_transcript(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Verdict for one final transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Passed every gate; carries the normalized transcript.
    Accepted(String),
    /// Under the character minimum.
    TooShort,
    /// Under the word minimum and not a known short command.
    LowContent,
    /// Identical to the previous admitted transcript inside the window.
    Duplicate,
}

/// One admitted transcript waiting for the audio channel to free up.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub transcript: String,
    pub enqueued_at: Instant,
}

/// FIFO of admitted transcripts plus the duplicate-suppression memory.
///
/// The queue never dispatches anything itself; the turn controller decides
/// whether an admitted transcript runs immediately or waits here.
pub struct CommandQueue {
    pending: VecDeque<QueueEntry>,
    last_admitted: Option<(String, Instant)>,
}

impl CommandQueue {
    pub fn new() -> Self {
        CommandQueue {
            pending: VecDeque::new(),
            last_admitted: None,
        }
    }

    /// Run the admission gates over a raw final transcript.
    ///
    /// Gate order is fixed: length, duplicate, content. The suppression
    /// memory updates on every acceptance, so a repeat of a transcript that
    /// is still waiting in the queue is dropped rather than queued twice.
    pub fn admit(&mut self, raw: &str, now: Instant) -> Admission {
        let transcript = normalize_transcript(raw);
        if transcript.chars().count() < MIN_TRANSCRIPT_CHARS {
            return Admission::TooShort;
        }
        if let Some((last, at)) = &self.last_admitted {
            if *last == transcript && now.duration_since(*at) < DUPLICATE_WINDOW {
                return Admission::Duplicate;
            }
        }
        let words = transcript.split_whitespace().count();
        if words < MIN_CONTENT_WORDS && !SHORT_COMMANDS.contains(&transcript.as_str()) {
            return Admission::LowContent;
        }
        self.last_admitted = Some((transcript.clone(), now));
        Admission::Accepted(transcript)
    }

    pub fn push(&mut self, transcript: String, now: Instant) {
        self.pending.push_back(QueueEntry {
            transcript,
            enqueued_at: now,
        });
    }

    pub fn pop(&mut self) -> Option<QueueEntry> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
