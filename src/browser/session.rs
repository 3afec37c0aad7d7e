use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::browser::driver::{PageDriver, ScrollAnchor};
use crate::page::dom::DomSnapshot;
use crate::session::error::NavError;

/// Request sent to the browser bridge over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate {
        cmd: &'static str,
        url: String,
    },
    Snapshot {
        cmd: &'static str,
    },
    CurrentUrl {
        cmd: &'static str,
    },
    NodeAction {
        cmd: &'static str,
        #[serde(rename = "ref")]
        node_ref: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    ScrollBy {
        cmd: &'static str,
        delta: i32,
    },
    ScrollTo {
        cmd: &'static str,
        anchor: &'static str,
    },
    Zoom {
        cmd: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        level: Option<f64>,
    },
    OpenTab {
        cmd: &'static str,
        url: String,
    },
    History {
        cmd: &'static str,
        op: &'static str,
    },
    PressKey {
        cmd: &'static str,
        key: String,
    },
    Print {
        cmd: &'static str,
    },
    MainText {
        cmd: &'static str,
    },
    Wait {
        cmd: &'static str,
        duration_ms: u64,
    },
    Quit {
        cmd: &'static str,
    },
}

impl BrowserRequest {
    pub fn navigate(url: &str) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
        }
    }

    pub fn snapshot() -> Self {
        BrowserRequest::Snapshot { cmd: "snapshot" }
    }

    pub fn current_url() -> Self {
        BrowserRequest::CurrentUrl { cmd: "current_url" }
    }

    pub fn fill(node_ref: u32, value: &str) -> Self {
        BrowserRequest::NodeAction {
            cmd: "fill",
            node_ref,
            value: Some(value.to_string()),
        }
    }

    pub fn click(node_ref: u32) -> Self {
        BrowserRequest::NodeAction {
            cmd: "click",
            node_ref,
            value: None,
        }
    }

    pub fn scroll_into_view(node_ref: u32) -> Self {
        BrowserRequest::NodeAction {
            cmd: "scroll_into_view",
            node_ref,
            value: None,
        }
    }

    pub fn scroll_by(delta: i32) -> Self {
        BrowserRequest::ScrollBy {
            cmd: "scroll_by",
            delta,
        }
    }

    pub fn scroll_to(anchor: ScrollAnchor) -> Self {
        let anchor = match anchor {
            ScrollAnchor::Top => "top",
            ScrollAnchor::Middle => "middle",
            ScrollAnchor::Bottom => "bottom",
        };
        BrowserRequest::ScrollTo {
            cmd: "scroll_to",
            anchor,
        }
    }

    pub fn zoom_level() -> Self {
        BrowserRequest::Zoom {
            cmd: "zoom",
            level: None,
        }
    }

    pub fn set_zoom(level: f64) -> Self {
        BrowserRequest::Zoom {
            cmd: "set_zoom",
            level: Some(level),
        }
    }

    pub fn open_tab(url: &str) -> Self {
        BrowserRequest::OpenTab {
            cmd: "open_tab",
            url: url.to_string(),
        }
    }

    pub fn back() -> Self {
        BrowserRequest::History {
            cmd: "history",
            op: "back",
        }
    }

    pub fn forward() -> Self {
        BrowserRequest::History {
            cmd: "history",
            op: "forward",
        }
    }

    pub fn reload() -> Self {
        BrowserRequest::History {
            cmd: "history",
            op: "reload",
        }
    }

    pub fn press_key(key: &str) -> Self {
        BrowserRequest::PressKey {
            cmd: "press_key",
            key: key.to_string(),
        }
    }

    pub fn print() -> Self {
        BrowserRequest::Print { cmd: "print" }
    }

    pub fn main_text() -> Self {
        BrowserRequest::MainText { cmd: "main_text" }
    }

    pub fn wait(duration_ms: u64) -> Self {
        BrowserRequest::Wait {
            cmd: "wait",
            duration_ms,
        }
    }

    pub fn quit() -> Self {
        BrowserRequest::Quit { cmd: "quit" }
    }
}

/// Response received from the browser bridge over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub level: Option<f64>,
}

/// A persistent browser session backed by a bridge subprocess.
///
/// Launches a long-lived Node.js process that keeps a browser open.
/// Commands are sent as NDJSON over stdin, responses read from stdout;
/// every command gets exactly one response line.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    cached_url: Option<String>,
}

impl BrowserSession {
    /// Launch the bridge and wait for its ready signal.
    pub fn launch(script: &str, headless: bool) -> Result<Self, NavError> {
        let mut command = Command::new("node");
        command.arg(script);
        if headless {
            command.arg("--headless");
        }

        let mut child = command
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
            .ok_or_else(|| NavError::SessionIo("Failed to capture stdin of browser bridge".into()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| NavError::SessionIo("Failed to capture stdout of browser bridge".into()))?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| NavError::SessionIo(format!("Failed to read ready signal: {}", e)))?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| NavError::JsonParse {
                context: "browser bridge ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(NavError::SessionProtocol {
                command: "launch".into(),
                error: "Did not receive ready signal from browser bridge".into(),
            });
        }

        Ok(BrowserSession {
            child,
            stdin,
            reader,
            cached_url: None,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, NavError> {
        let json = serde_json::to_string(request).map_err(|e| NavError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json)
            .map_err(|e| NavError::SessionIo(format!("Failed to write to browser bridge: {}", e)))?;

        self.stdin
            .flush()
            .map_err(|e| NavError::SessionIo(format!("Failed to flush browser bridge stdin: {}", e)))?;

        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| NavError::SessionIo(format!("Failed to read from browser bridge: {}", e)))?;

        if line.trim().is_empty() {
            return Err(NavError::SessionIo(
                "Empty response from browser bridge (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| NavError::JsonParse {
            context: "browser bridge response".into(),
            source: e,
        })
    }

    /// Send a request and verify it succeeded.
    fn send_ok(
        &mut self,
        request: &BrowserRequest,
        command_name: &str,
    ) -> Result<BrowserResponse, NavError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(NavError::SessionProtocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Last URL seen by this session (cached, no bridge call).
    pub fn last_url(&self) -> Option<&str> {
        self.cached_url.as_deref()
    }

    /// Shut the bridge down.
    pub fn quit(&mut self) -> Result<(), NavError> {
        // Best-effort quit, the process may already be gone
        let _ = self.send(&BrowserRequest::quit());
        let _ = self.child.wait();
        Ok(())
    }
}

impl PageDriver for BrowserSession {
    fn snapshot(&mut self) -> Result<DomSnapshot, NavError> {
        let response = self.send_ok(&BrowserRequest::snapshot(), "snapshot")?;
        let data = response.data.ok_or_else(|| NavError::SessionProtocol {
            command: "snapshot".into(),
            error: "No data in snapshot response".into(),
        })?;
        let snapshot: DomSnapshot =
            serde_json::from_value(data).map_err(|e| NavError::JsonParse {
                context: "browser bridge snapshot".into(),
                source: e,
            })?;
        self.cached_url = Some(snapshot.url.clone());
        Ok(snapshot)
    }

    fn current_url(&mut self) -> Result<String, NavError> {
        let response = self.send_ok(&BrowserRequest::current_url(), "current_url")?;
        let url = response.url.ok_or_else(|| NavError::SessionProtocol {
            command: "current_url".into(),
            error: "No URL in current_url response".into(),
        })?;
        self.cached_url = Some(url.clone());
        Ok(url)
    }

    fn fill(&mut self, node_ref: u32, value: &str) -> Result<(), NavError> {
        self.send_ok(&BrowserRequest::fill(node_ref, value), "fill")?;
        Ok(())
    }

    fn click(&mut self, node_ref: u32) -> Result<(), NavError> {
        self.send_ok(&BrowserRequest::click(node_ref), "click")?;
        Ok(())
    }

    fn scroll_into_view(&mut self, node_ref: u32) -> Result<(), NavError> {
        self.send_ok(&BrowserRequest::scroll_into_view(node_ref), "scroll_into_view")?;
        Ok(())
    }

    fn scroll_by(&mut self, delta_y: i32) -> Result<(), NavError> {
        self.send_ok(&BrowserRequest::scroll_by(delta_y), "scroll_by")?;
        Ok(())
    }

    fn scroll_to(&mut self, anchor: ScrollAnchor) -> Result<(), NavError> {
        self.send_ok(&BrowserRequest::scroll_to(anchor), "scroll_to")?;
        Ok(())
    }

    fn zoom_level(&mut self) -> Result<f64, NavError> {
        let response = self.send_ok(&BrowserRequest::zoom_level(), "zoom")?;
        Ok(response.level.unwrap_or(1.0))
    }

    fn set_zoom(&mut self, level: f64) -> Result<(), NavError> {
        self.send_ok(&BrowserRequest::set_zoom(level), "set_zoom")?;
        Ok(())
    }

    fn navigate(&mut self, url: &str) -> Result<(), NavError> {
        self.send_ok(&BrowserRequest::navigate(url), "navigate")?;
        self.cached_url = Some(url.to_string());
        Ok(())
    }

    fn open_new_tab(&mut self, url: &str) -> Result<(), NavError> {
        self.send_ok(&BrowserRequest::open_tab(url), "open_tab")?;
        Ok(())
    }

    fn back(&mut self) -> Result<(), NavError> {
        self.send_ok(&BrowserRequest::back(), "history back")?;
        Ok(())
    }

    fn forward(&mut self) -> Result<(), NavError> {
        self.send_ok(&BrowserRequest::forward(), "history forward")?;
        Ok(())
    }

    fn reload(&mut self) -> Result<(), NavError> {
        self.send_ok(&BrowserRequest::reload(), "history reload")?;
        Ok(())
    }

    fn print_page(&mut self) -> Result<(), NavError> {
        self.send_ok(&BrowserRequest::print(), "print")?;
        Ok(())
    }

    fn press_key(&mut self, key: &str) -> Result<(), NavError> {
        self.send_ok(&BrowserRequest::press_key(key), "press_key")?;
        Ok(())
    }

    fn main_content_text(&mut self) -> Result<String, NavError> {
        let response = self.send_ok(&BrowserRequest::main_text(), "main_text")?;
        Ok(response.text.unwrap_or_default())
    }

    fn wait(&mut self, ms: u64) -> Result<(), NavError> {
        self.send_ok(&BrowserRequest::wait(ms), "wait")?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
