use clap::Parser;
use voice_navigation::cli::config::{load_config, AppConfig, Cli, Commands};

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_run_minimal() {
    let cli = Cli::parse_from(["voice-navigation", "run", "--url", "https://example.com"]);
    match cli.command {
        Commands::Run {
            url,
            api_base,
            language,
            routes,
            trace,
            headless,
        } => {
            assert_eq!(url, "https://example.com");
            assert!(api_base.is_none());
            assert!(language.is_none());
            assert!(routes.is_none());
            assert!(trace.is_none());
            assert!(!headless);
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn cli_parse_run_all_args() {
    let cli = Cli::parse_from([
        "voice-navigation",
        "run",
        "--url",
        "https://test.com",
        "--api-base",
        "http://api.test:4000/api",
        "--language",
        "hi-IN",
        "--routes",
        "sitemap.yaml",
        "--trace",
        "session.jsonl",
        "--headless",
    ]);
    match cli.command {
        Commands::Run {
            url,
            api_base,
            language,
            routes,
            trace,
            headless,
        } => {
            assert_eq!(url, "https://test.com");
            assert_eq!(api_base, Some("http://api.test:4000/api".to_string()));
            assert_eq!(language, Some("hi-IN".to_string()));
            assert_eq!(routes, Some("sitemap.yaml".to_string()));
            assert_eq!(trace, Some("session.jsonl".to_string()));
            assert!(headless);
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn cli_parse_analyze_minimal() {
    let cli = Cli::parse_from(["voice-navigation", "analyze", "--url", "https://example.com"]);
    match cli.command {
        Commands::Analyze {
            url,
            pretty,
            headless,
        } => {
            assert_eq!(url, "https://example.com");
            assert!(!pretty);
            assert!(headless);
        }
        _ => panic!("Expected Analyze command"),
    }
}

#[test]
fn cli_parse_analyze_pretty_headful() {
    let cli = Cli::parse_from([
        "voice-navigation",
        "analyze",
        "--url",
        "https://test.com",
        "--pretty",
        "--headless",
        "false",
    ]);
    match cli.command {
        Commands::Analyze {
            url,
            pretty,
            headless,
        } => {
            assert_eq!(url, "https://test.com");
            assert!(pretty);
            assert!(!headless);
        }
        _ => panic!("Expected Analyze command"),
    }
}

#[test]
fn cli_parse_exec_minimal() {
    let cli = Cli::parse_from([
        "voice-navigation",
        "exec",
        "--url",
        "https://example.com",
        "--action",
        "scroll_down",
    ]);
    match cli.command {
        Commands::Exec {
            url,
            action,
            params,
            routes,
            language,
            headless,
        } => {
            assert_eq!(url, "https://example.com");
            assert_eq!(action, "scroll_down");
            assert!(params.is_none());
            assert!(routes.is_none());
            assert!(language.is_none());
            assert!(headless);
        }
        _ => panic!("Expected Exec command"),
    }
}

#[test]
fn cli_parse_exec_all_args() {
    let cli = Cli::parse_from([
        "voice-navigation",
        "exec",
        "--url",
        "https://test.com",
        "--action",
        "fill_form",
        "--params",
        r#"{"fields":{"email":"ada@example.com"}}"#,
        "--routes",
        "sitemap.yaml",
        "--language",
        "hi-IN",
        "--headless",
        "false",
    ]);
    match cli.command {
        Commands::Exec {
            url,
            action,
            params,
            routes,
            language,
            headless,
        } => {
            assert_eq!(url, "https://test.com");
            assert_eq!(action, "fill_form");
            assert_eq!(
                params,
                Some(r#"{"fields":{"email":"ada@example.com"}}"#.to_string())
            );
            assert_eq!(routes, Some("sitemap.yaml".to_string()));
            assert_eq!(language, Some("hi-IN".to_string()));
            assert!(!headless);
        }
        _ => panic!("Expected Exec command"),
    }
}

#[test]
fn cli_parse_global_verbose() {
    let cli = Cli::parse_from(["voice-navigation", "-v", "analyze", "--url", "https://a.com"]);
    assert_eq!(cli.verbose, 1);

    let cli2 = Cli::parse_from(["voice-navigation", "-vvv", "analyze", "--url", "https://a.com"]);
    assert_eq!(cli2.verbose, 3);
}

#[test]
fn cli_parse_global_config() {
    let cli = Cli::parse_from([
        "voice-navigation",
        "--config",
        "custom.yaml",
        "run",
        "--url",
        "https://example.com",
    ]);
    assert_eq!(cli.config, Some("custom.yaml".to_string()));
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_load_missing_file() {
    let config = load_config(Some("nonexistent_file_that_does_not_exist.yaml"));
    // Should return defaults without error
    assert_eq!(config.session.api_base, "http://localhost:3000/api");
    assert_eq!(config.session.language, "en-US");
    assert_eq!(config.bridge.browser_script, "bridge/browser_bridge.js");
}

#[test]
fn config_default_values() {
    let config = AppConfig::default();
    assert_eq!(config.session.api_base, "http://localhost:3000/api");
    assert_eq!(config.session.language, "en-US");
    assert!(config.session.routes.is_none());
    assert!(config.session.trace.is_none());
    assert_eq!(config.session.settings_path, "voice-session.yaml");
    assert_eq!(config.bridge.browser_script, "bridge/browser_bridge.js");
    assert_eq!(config.bridge.speech_script, "bridge/speech_gateway.js");
}

#[test]
fn config_yaml_roundtrip() {
    let config = AppConfig::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed.session.api_base, config.session.api_base);
    assert_eq!(parsed.session.language, config.session.language);
    assert_eq!(parsed.bridge.browser_script, config.bridge.browser_script);
}

#[test]
fn config_partial_yaml() {
    let yaml = r#"
session:
  language: "hi-IN"
  routes: "sitemap.yaml"
"#;
    let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.session.language, "hi-IN");
    assert_eq!(config.session.routes, Some("sitemap.yaml".to_string()));
    // Other session fields get defaults
    assert_eq!(config.session.api_base, "http://localhost:3000/api");
    assert_eq!(config.session.settings_path, "voice-session.yaml");
    assert!(config.session.trace.is_none());
    // Bridge gets full defaults
    assert_eq!(config.bridge.browser_script, "bridge/browser_bridge.js");
    assert_eq!(config.bridge.speech_script, "bridge/speech_gateway.js");
}

#[test]
fn config_load_from_file() {
    use std::io::Write;

    let dir = std::env::temp_dir().join("voice_navigation_cli_test");
    std::fs::create_dir_all(&dir).unwrap();
    let config_path = dir.join("voice-nav.yaml");

    let yaml = r#"
session:
  api_base: "http://remote.test/api"
  trace: "run.jsonl"
bridge:
  browser_script: "custom/bridge.js"
"#;

    let mut f = std::fs::File::create(&config_path).unwrap();
    f.write_all(yaml.as_bytes()).unwrap();

    let config = load_config(config_path.to_str());
    assert_eq!(config.session.api_base, "http://remote.test/api");
    assert_eq!(config.session.trace, Some("run.jsonl".to_string()));
    assert_eq!(config.bridge.browser_script, "custom/bridge.js");
    // Untouched fields keep their defaults
    assert_eq!(config.session.language, "en-US");
    assert_eq!(config.bridge.speech_script, "bridge/speech_gateway.js");

    // Cleanup
    std::fs::remove_file(&config_path).ok();
    std::fs::remove_dir(&dir).ok();
}

#[test]
fn config_malformed_yaml_falls_back_to_defaults() {
    use std::io::Write;

    let dir = std::env::temp_dir().join("voice_navigation_cli_malformed");
    std::fs::create_dir_all(&dir).unwrap();
    let config_path = dir.join("voice-nav.yaml");

    let mut f = std::fs::File::create(&config_path).unwrap();
    f.write_all(b"{{{ this is not yaml").unwrap();

    let config = load_config(config_path.to_str());
    assert_eq!(config.session.api_base, "http://localhost:3000/api");
    assert_eq!(config.session.language, "en-US");

    // Cleanup
    std::fs::remove_file(&config_path).ok();
    std::fs::remove_dir(&dir).ok();
}
