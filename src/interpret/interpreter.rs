use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::interpret::conversation::Turn;
use crate::page::page_model::PageModel;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// One interpreter call per utterance.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretRequest<'a> {
    pub command: &'a str,
    pub language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_model: Option<&'a PageModel>,
    pub current_url: &'a str,
    pub recent_turns: &'a [Turn],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_context: Option<&'a str>,
}

/// Interpreter reply. Every field is optional on the wire; a reply with no
/// action and no response text makes a silent turn.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterpretReply {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Turns a transcript into an action + parameters + reply text.
///
/// `None` covers both transport failure and an unusable reply; the session
/// speaks an apology and stays listening either way.
pub trait Interpreter {
    fn interpret(&self, request: &InterpretRequest<'_>) -> Option<InterpretReply>;
}

/// Remote interpreter reached over HTTP, one POST per utterance.
pub struct HttpInterpreter {
    endpoint: String,
}

impl HttpInterpreter {
    pub fn new(api_base: &str) -> Self {
        HttpInterpreter {
            endpoint: format!("{}/interpret", api_base.trim_end_matches('/')),
        }
    }
}

impl Interpreter for HttpInterpreter {
    fn interpret(&self, request: &InterpretRequest<'_>) -> Option<InterpretReply> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .ok()?;

        let response = client.post(&self.endpoint).json(request).send().ok()?;

        if !response.status().is_success() {
            return None;
        }

        response.json().ok()
    }
}

// ============================================================================
// Mock Interpreter (for tests and offline runs)
// ============================================================================

/// Canned transcript→reply table. Lookups match on the exact command text.
pub struct MockInterpreter {
    replies: Vec<(String, InterpretReply)>,
}

impl MockInterpreter {
    pub fn new() -> Self {
        MockInterpreter {
            replies: Vec::new(),
        }
    }

    pub fn with_reply(mut self, transcript: &str, reply: InterpretReply) -> Self {
        self.replies.push((transcript.to_string(), reply));
        self
    }
}

impl Interpreter for MockInterpreter {
    fn interpret(&self, request: &InterpretRequest<'_>) -> Option<InterpretReply> {
        self.replies
            .iter()
            .find(|(transcript, _)| transcript == request.command)
            .map(|(_, reply)| reply.clone())
    }
}
