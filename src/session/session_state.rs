/// Runtime flags for one voice session.
///
/// Single-writer: the turn controller owns the value and mutates it;
/// everyone else reads a borrow. `awaiting_queue_drain` is the externally
/// visible "please wait" signal while commands sit behind active speech.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub listening: bool,
    pub speaking: bool,
    pub awaiting_queue_drain: bool,
    pub language: String,
}

impl SessionState {
    pub fn new(language: &str) -> Self {
        SessionState {
            listening: false,
            speaking: false,
            awaiting_queue_drain: false,
            language: language.to_string(),
        }
    }
}
