use serde_json::{Map, Value};

use crate::audio::feedback;
use crate::cli::config::AppConfig;
use crate::command::command_model::Intent;
use crate::resolver::routes::RouteIndex;
use crate::{analyze_page, exec_intent, run_session, SessionOptions};

// ============================================================================
// run subcommand
// ============================================================================

/// Start a live voice session. CLI flags win over the config file.
pub fn cmd_run(
    url: &str,
    api_base: Option<&str>,
    language: Option<&str>,
    routes: Option<&str>,
    trace: Option<&str>,
    headless: bool,
    verbose: u8,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = SessionOptions {
        url: url.to_string(),
        api_base: api_base.unwrap_or(&config.session.api_base).to_string(),
        // No flag means the persisted choice from the last run wins
        language: language.map(str::to_string),
        routes_path: routes
            .map(str::to_string)
            .or_else(|| config.session.routes.clone()),
        trace_path: trace
            .map(str::to_string)
            .or_else(|| config.session.trace.clone()),
        settings_path: config.session.settings_path.clone(),
        browser_script: config.bridge.browser_script.clone(),
        speech_script: config.bridge.speech_script.clone(),
        headless,
        verbose,
    };
    run_session(&options)
}

// ============================================================================
// analyze subcommand
// ============================================================================

/// Build the page model for a URL and print it as JSON.
pub fn cmd_analyze(
    url: &str,
    pretty: bool,
    headless: bool,
    verbose: u8,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if verbose > 0 {
        eprintln!("Modeling {}...", url);
    }

    let model = analyze_page(&config.bridge.browser_script, headless, url)?;

    let json = if pretty {
        serde_json::to_string_pretty(&model)?
    } else {
        serde_json::to_string(&model)?
    };
    println!("{}", json);
    Ok(())
}

// ============================================================================
// exec subcommand
// ============================================================================

/// Execute one action against a page and return whether it succeeded.
pub fn cmd_exec(
    url: &str,
    action: &str,
    params: Option<&str>,
    routes: Option<&str>,
    language: Option<&str>,
    headless: bool,
    verbose: u8,
    config: &AppConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let parameters: Map<String, Value> = match params {
        Some(raw) => serde_json::from_str(raw)?,
        None => Map::new(),
    };
    let intent = Intent {
        action: action.to_string(),
        parameters,
    };

    let routes = match routes.or(config.session.routes.as_deref()) {
        Some(path) => RouteIndex::load(std::path::Path::new(path)),
        None => RouteIndex::empty(),
    };
    let language = language.unwrap_or(&config.session.language);

    if verbose > 0 {
        eprintln!("Executing {} against {}...", intent.action, url);
    }

    let outcome = exec_intent(
        &config.bridge.browser_script,
        headless,
        url,
        &intent,
        &routes,
        language,
    )?;

    let ok = outcome.succeeded();
    println!("{:?}", outcome);
    if let Some(line) = feedback::outcome_feedback(&outcome, language) {
        println!("{}", line);
    }
    Ok(ok)
}
