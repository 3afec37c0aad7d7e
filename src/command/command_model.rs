use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Interpreter-produced commands and their outcomes
// ============================================================================

/// One command as the interpreter hands it over: an action name plus a
/// loose parameter bag.
///
/// Parameters are untyped on purpose. The interpreter is a remote model
/// whose output shape drifts, so every access validates the key and type at
/// point of use and falls back instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub action: String,
    #[serde(default)]
    pub parameters: serde_json::Map<String, Value>,
}

impl Intent {
    pub fn new(action: &str) -> Self {
        Intent {
            action: action.to_string(),
            parameters: serde_json::Map::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.parameters
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// A string-typed parameter, or None when absent or not a string.
    pub fn param(&self, key: &str) -> Option<&str> {
        match self.parameters.get(key) {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// First present parameter out of several interchangeable names the
    /// interpreter uses ("target" vs "element" vs "button").
    pub fn first_param(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.param(k))
    }

    /// Key/value pairs for a fill request: the nested "fields" object when
    /// present, the top-level parameters otherwise. Scalar values are
    /// coerced to strings; anything else is skipped.
    pub fn fill_values(&self) -> Vec<(String, String)> {
        let source = match self.parameters.get("fields") {
            Some(Value::Object(fields)) => fields,
            _ => &self.parameters,
        };
        source
            .iter()
            .filter_map(|(key, value)| coerce_scalar(value).map(|v| (key.clone(), v)))
            .collect()
    }
}

fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Normalize a raw interpreter action name: trimmed, lowercased, whitespace
/// runs collapsed to underscores.
pub fn normalize_action(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Static alias table absorbing interpreter synonyms before dispatch.
/// Unknown names pass through unchanged.
pub fn canonical_action(action: &str) -> &str {
    match action {
        "scroll_bottom" | "scroll_to_bottom" | "go_to_bottom" => "bottom",
        "scroll_top" | "scroll_to_top" | "go_to_top" => "top",
        "scroll_middle" | "scroll_to_middle" | "go_to_middle" => "middle",
        "go_down" | "page_down" => "scroll_down",
        "go_up" | "page_up" => "scroll_up",
        "go_back" | "previous_page" => "back",
        "go_forward" => "forward",
        "reload" | "reload_page" | "refresh_page" => "refresh",
        "read" | "read_content" | "read_aloud" => "read_page",
        "show_heading" | "show_headings" | "list_heading" => "list_headings",
        "show_links" | "list_link" => "list_links",
        "show_landmark" | "show_landmarks" | "list_landmark" => "list_landmarks",
        "fill" | "fill_field" | "fill_out_form" => "fill_form",
        "press" | "select" => "click",
        "go_to" | "open" | "open_page" | "visit" => "navigate",
        "exit" | "quit" | "stop_listening" | "stop_voice_assistance" => "stop",
        "be_quiet" | "silence" => "stop_reading",
        "tab" | "next" => "press_tab",
        "enter" => "press_enter",
        "open_widget" | "show_widget" | "show_commands" | "open_panel" => "panel_open",
        "close_widget" | "hide_widget" | "hide_commands" | "close_panel" => "panel_close",
        "change_language" | "switch_language" => "set_language",
        other => other,
    }
}

/// Bare destination words some interpreters emit instead of a `navigate`
/// action. Each is shorthand for navigating to the section of that name.
pub const DESTINATION_ACTIONS: [&str; 8] = [
    "home",
    "products",
    "pricing",
    "about",
    "contact",
    "solutions",
    "careers",
    "partners",
];

/// Whether a canonical action can unload the current page. A spoken reply
/// is given time to finish before one of these runs.
pub fn is_navigation_action(action: &str) -> bool {
    matches!(action, "navigate" | "back" | "forward" | "refresh")
        || DESTINATION_ACTIONS.contains(&action)
}

/// Result of executing one intent.
///
/// Execution never raises: misses and unknown actions are values, and the
/// session stays listening whatever comes back.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Action performed; optional feedback to speak
    Done { feedback: Option<String> },
    /// Fill finished; how many of the requested fields were written
    Filled { count: usize, requested: usize },
    /// Resolution miss: the spoken target matched nothing live
    NotFound { target: String },
    /// Action name outside the catalogue
    Unsupported { action: String },
    /// Driver/transport failure mid-action; the session keeps listening
    Failed { reason: String },
    /// Stop listening and persist that state
    EndSession,
    /// Best-effort halt of in-flight synthesis
    HaltSpeech,
    /// Recognition must restart with this language
    SwitchLanguage(String),
    /// Persist the panel flag
    SetPanel(bool),
}

impl CommandOutcome {
    pub fn done() -> Self {
        CommandOutcome::Done { feedback: None }
    }

    pub fn done_with(feedback: String) -> Self {
        CommandOutcome::Done {
            feedback: Some(feedback),
        }
    }

    /// Success/failure view: misses, unknown actions, and transport
    /// failures count as failure. A zero-count fill is still a success;
    /// the count itself is the report.
    pub fn succeeded(&self) -> bool {
        !matches!(
            self,
            CommandOutcome::NotFound { .. }
                | CommandOutcome::Unsupported { .. }
                | CommandOutcome::Failed { .. }
        )
    }
}
