use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "voice-navigation",
    version,
    about = "Voice-controlled navigation for arbitrary web pages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: voice-nav.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a live voice session against a page
    Run {
        /// URL to open first
        #[arg(long)]
        url: String,

        /// Base URL of the interpreter/credential API
        #[arg(long)]
        api_base: Option<String>,

        /// Recognition and synthesis language tag (e.g. en-US, hi-IN)
        #[arg(long)]
        language: Option<String>,

        /// Sitemap route index YAML file
        #[arg(long)]
        routes: Option<String>,

        /// Append JSONL trace events to this file
        #[arg(long)]
        trace: Option<String>,

        /// Run the browser headless
        #[arg(long, default_value_t = false)]
        headless: bool,
    },

    /// Build the page model for a URL and print it as JSON
    Analyze {
        /// URL to model
        #[arg(long)]
        url: String,

        /// Pretty-print the JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,

        /// Run the browser headless
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        headless: bool,
    },

    /// Execute a single action against a page and print the outcome
    Exec {
        /// URL to open first
        #[arg(long)]
        url: String,

        /// Action name (e.g. fill_form, click, navigate)
        #[arg(long)]
        action: String,

        /// Action parameters as a JSON object
        #[arg(long)]
        params: Option<String>,

        /// Sitemap route index YAML file
        #[arg(long)]
        routes: Option<String>,

        /// Feedback language tag
        #[arg(long)]
        language: Option<String>,

        /// Run the browser headless
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        headless: bool,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `voice-nav.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            bridge: BridgeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_language")]
    pub language: String,

    pub routes: Option<String>,

    pub trace: Option<String>,

    /// Where durable session flags live between runs.
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:3000/api".to_string(),
            language: "en-US".to_string(),
            routes: None,
            trace: None,
            settings_path: "voice-session.yaml".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_browser_script")]
    pub browser_script: String,

    #[serde(default = "default_speech_script")]
    pub speech_script: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            browser_script: "bridge/browser_bridge.js".to_string(),
            speech_script: "bridge/speech_gateway.js".to_string(),
        }
    }
}

// Serde default helpers
fn default_api_base() -> String {
    "http://localhost:3000/api".to_string()
}
fn default_language() -> String {
    "en-US".to_string()
}
fn default_settings_path() -> String {
    "voice-session.yaml".to_string()
}
fn default_browser_script() -> String {
    "bridge/browser_bridge.js".to_string()
}
fn default_speech_script() -> String {
    "bridge/speech_gateway.js".to_string()
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("voice-nav.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}
