use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::session::error::NavError;

/// Request sent to the speech gateway over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GatewayRequest {
    Configure {
        cmd: &'static str,
        token: String,
        region: String,
        language: String,
    },
    StartRecognition {
        cmd: &'static str,
    },
    StopRecognition {
        cmd: &'static str,
    },
    Speak {
        cmd: &'static str,
        text: String,
    },
    Halt {
        cmd: &'static str,
    },
    Quit {
        cmd: &'static str,
    },
}

impl GatewayRequest {
    pub fn configure(token: &str, region: &str, language: &str) -> Self {
        GatewayRequest::Configure {
            cmd: "configure",
            token: token.to_string(),
            region: region.to_string(),
            language: language.to_string(),
        }
    }

    pub fn start_recognition() -> Self {
        GatewayRequest::StartRecognition { cmd: "start" }
    }

    pub fn stop_recognition() -> Self {
        GatewayRequest::StopRecognition { cmd: "stop" }
    }

    pub fn speak(text: &str) -> Self {
        GatewayRequest::Speak {
            cmd: "speak",
            text: text.to_string(),
        }
    }

    pub fn halt() -> Self {
        GatewayRequest::Halt { cmd: "halt" }
    }

    pub fn quit() -> Self {
        GatewayRequest::Quit { cmd: "quit" }
    }
}

/// Event received from the speech gateway over stdout (one JSON line).
///
/// `event` selects the kind: "ready", "partial", "final", "accepted",
/// "playback_done", "speak_error", "error". Transcript events carry `text`;
/// failures carry `error`.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayEvent {
    pub event: String,
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A persistent speech session backed by a gateway subprocess.
///
/// The gateway wraps the recognition/synthesis service: commands go down
/// stdin as NDJSON, and recognition transcripts plus synthesis callbacks
/// come back on stdout whenever the service emits them. Because events are
/// unsolicited a background thread pumps stdout into a channel; the control
/// loop polls that channel with a short timeout.
pub struct SpeechGateway {
    child: Child,
    stdin: std::process::ChildStdin,
    events: Receiver<GatewayEvent>,
}

impl SpeechGateway {
    /// Spawn the gateway script and wait for its ready signal.
    pub fn launch(script: &str) -> Result<Self, NavError> {
        let mut child = Command::new("node")
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| NavError::BridgeSpawn {
                script: script.to_string(),
                source: e,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| NavError::SessionIo("Failed to capture stdin of speech gateway".into()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| NavError::SessionIo("Failed to capture stdout of speech gateway".into()))?;

        let mut reader = BufReader::new(stdout);

        // Ready handshake happens synchronously, before the pump starts
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| NavError::SessionIo(format!("Failed to read gateway ready signal: {}", e)))?;

        let ready: GatewayEvent =
            serde_json::from_str(line.trim()).map_err(|e| NavError::JsonParse {
                context: "speech gateway ready signal".into(),
                source: e,
            })?;

        if ready.event != "ready" || ready.ok == Some(false) {
            return Err(NavError::SpeechInit(
                ready
                    .error
                    .unwrap_or_else(|| "Did not receive ready signal from speech gateway".into()),
            ));
        }

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut line = String::new();
            loop {
                line.clear();
                match reader.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match serde_json::from_str::<GatewayEvent>(trimmed) {
                    Ok(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        eprintln!("Warning: unparseable gateway event skipped: {}", e);
                    }
                }
            }
        });

        Ok(SpeechGateway {
            child,
            stdin,
            events: rx,
        })
    }

    fn send(&mut self, request: &GatewayRequest) -> Result<(), NavError> {
        let json = serde_json::to_string(request).map_err(|e| NavError::JsonSerialize {
            context: "GatewayRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json)
            .map_err(|e| NavError::SessionIo(format!("Failed to write to speech gateway: {}", e)))?;

        self.stdin
            .flush()
            .map_err(|e| NavError::SessionIo(format!("Failed to flush speech gateway stdin: {}", e)))
    }

    /// Hand the gateway its service credentials and recognition language.
    pub fn configure(&mut self, token: &str, region: &str, language: &str) -> Result<(), NavError> {
        self.send(&GatewayRequest::configure(token, region, language))
    }

    pub fn start_recognition(&mut self) -> Result<(), NavError> {
        self.send(&GatewayRequest::start_recognition())
    }

    pub fn stop_recognition(&mut self) -> Result<(), NavError> {
        self.send(&GatewayRequest::stop_recognition())
    }

    /// Submit a reply for synthesis. The gateway answers with "accepted"
    /// when the service takes the text, and "playback_done" if it can tell
    /// when audio actually finished.
    pub fn speak(&mut self, text: &str) -> Result<(), NavError> {
        self.send(&GatewayRequest::speak(text))
    }

    /// Best-effort halt of in-flight synthesis. The gateway may need to
    /// recreate its synthesis handle afterwards; that is its problem.
    pub fn halt_speech(&mut self) -> Result<(), NavError> {
        self.send(&GatewayRequest::halt())
    }

    /// Wait up to `timeout` for the next gateway event. `Ok(None)` on a
    /// quiet channel; an error means the gateway process is gone.
    pub fn poll_event(&self, timeout: Duration) -> Result<Option<GatewayEvent>, NavError> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(NavError::SessionIo(
                "Speech gateway closed its event stream".into(),
            )),
        }
    }

    /// Shut the gateway down.
    pub fn quit(&mut self) -> Result<(), NavError> {
        // Best-effort quit, the process may already be gone
        let _ = self.send(&GatewayRequest::quit());
        let _ = self.child.wait();
        Ok(())
    }
}

impl Drop for SpeechGateway {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
