use std::fmt;

#[derive(Debug)]
pub enum NavError {
    /// Sidecar subprocess failed to spawn (browser bridge or speech gateway)
    BridgeSpawn { script: String, source: std::io::Error },

    /// Pipe I/O with a sidecar failed (write, flush, or read)
    SessionIo(String),

    /// Sidecar replied ok=false or with a malformed payload
    SessionProtocol { command: String, error: String },

    /// JSON parsing failed (sidecar output, HTTP body, or serde)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (request to a sidecar)
    JsonSerialize { context: String, source: serde_json::Error },

    /// Speech credential fetch failed (network or bad payload)
    CredentialFetch(String),

    /// Recognition or synthesis session failed to start
    SpeechInit(String),
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::BridgeSpawn { script, source } => {
                write!(f, "Failed to spawn {} (is Node.js installed?): {}", script, source)
            }
            NavError::SessionIo(msg) => {
                write!(f, "Sidecar I/O error: {}", msg)
            }
            NavError::SessionProtocol { command, error } => {
                write!(f, "Sidecar command '{}' failed: {}", command, error)
            }
            NavError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            NavError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            NavError::CredentialFetch(msg) => {
                write!(f, "Speech credential fetch failed: {}", msg)
            }
            NavError::SpeechInit(msg) => {
                write!(f, "Speech session failed to start: {}", msg)
            }
        }
    }
}

impl std::error::Error for NavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavError::BridgeSpawn { source, .. } => Some(source),
            NavError::JsonParse { source, .. } => Some(source),
            NavError::JsonSerialize { source, .. } => Some(source),
            _ => None,
        }
    }
}
