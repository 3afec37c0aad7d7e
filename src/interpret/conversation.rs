use serde::Serialize;

/// Rolling history never grows past this many turns.
const HISTORY_CAP: usize = 20;

/// At most this many recent turns go to the interpreter per request.
const SEND_LIMIT: usize = 10;

/// One side of an exchange, in the interpreter's wire shape.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub role: &'static str,
    pub content: String,
}

/// Conversation memory for the interpreter: recent turns plus the context
/// tag carried over from the previous reply, so follow-ups like "the second
/// one" can be resolved server-side.
pub struct Conversation {
    turns: Vec<Turn>,
    last_context: Option<String>,
}

impl Conversation {
    pub fn new() -> Self {
        Conversation {
            turns: Vec::new(),
            last_context: None,
        }
    }

    pub fn record_user(&mut self, transcript: &str) {
        self.push(Turn {
            role: "user",
            content: transcript.to_string(),
        });
    }

    pub fn record_reply(&mut self, response: &str) {
        self.push(Turn {
            role: "assistant",
            content: response.to_string(),
        });
    }

    pub fn set_context(&mut self, context: &str) {
        self.last_context = Some(context.to_string());
    }

    pub fn last_context(&self) -> Option<&str> {
        self.last_context.as_deref()
    }

    /// The slice of history sent with the next request.
    pub fn recent(&self) -> &[Turn] {
        let start = self.turns.len().saturating_sub(SEND_LIMIT);
        &self.turns[start..]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
        if self.turns.len() > HISTORY_CAP {
            let excess = self.turns.len() - HISTORY_CAP;
            self.turns.drain(..excess);
        }
    }
}
