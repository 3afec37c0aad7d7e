use serde_json::json;
use voice_navigation::audio::feedback;
use voice_navigation::browser::driver::{PageDriver, ScrollAnchor, ScrollOp, StaticPage};
use voice_navigation::command::command_model::{
    canonical_action, is_navigation_action, normalize_action, CommandOutcome, Intent,
};
use voice_navigation::command::executor::CommandExecutor;
use voice_navigation::page::builder::build_page_model;
use voice_navigation::page::dom::DomNode;
use voice_navigation::page::page_model::PageModel;
use voice_navigation::resolver::routes::{Route, RouteIndex};

mod common;
use crate::common::utils::{corporate_model, corporate_page, CorporatePage};

// ============================================================================
// Helpers
// ============================================================================

fn run(fixture: &mut CorporatePage, model: &PageModel, intent: &Intent) -> CommandOutcome {
    let routes = RouteIndex::empty();
    CommandExecutor::new(&mut fixture.page, model, &routes, "en-US").execute(intent)
}

fn run_with_routes(
    fixture: &mut CorporatePage,
    model: &PageModel,
    routes: &RouteIndex,
    intent: &Intent,
) -> CommandOutcome {
    CommandExecutor::new(&mut fixture.page, model, routes, "en-US").execute(intent)
}

fn empty_page() -> (StaticPage, PageModel) {
    let mut page = StaticPage::new("https://empty.example/", "Empty");
    let snapshot = page.snapshot().unwrap();
    let model = build_page_model(&snapshot);
    (page, model)
}

// ============================================================================
// 1. Intent parameter access
// ============================================================================

#[test]
fn intent_params_are_validated_at_access() {
    let mut intent = Intent::new("click").with_param("target", "submit");
    intent.parameters.insert("count".to_string(), json!(3));

    assert_eq!(intent.param("target"), Some("submit"));
    assert_eq!(intent.param("count"), None, "non-string reads as absent");
    assert_eq!(intent.param("missing"), None);
    assert_eq!(intent.first_param(&["element", "target"]), Some("submit"));
    assert_eq!(intent.first_param(&["element", "button"]), None);
}

#[test]
fn fill_values_prefer_the_nested_fields_object() {
    let mut intent = Intent::new("fill_form").with_param("stray", "ignored");
    intent.parameters.insert(
        "fields".to_string(),
        json!({"email": "ada@example.com", "quantity": 2, "urgent": true, "junk": [1, 2]}),
    );

    let values = intent.fill_values();
    assert_eq!(
        values,
        vec![
            ("email".to_string(), "ada@example.com".to_string()),
            ("quantity".to_string(), "2".to_string()),
            ("urgent".to_string(), "true".to_string()),
        ],
        "scalars coerce, arrays drop, top level ignored"
    );
}

#[test]
fn fill_values_fall_back_to_top_level_params() {
    let intent = Intent::new("fill_form")
        .with_param("email", "ada@example.com")
        .with_param("name", "Ada");

    let values = intent.fill_values();
    assert_eq!(values.len(), 2);
    assert!(values.contains(&("email".to_string(), "ada@example.com".to_string())));
}

// ============================================================================
// 2. Action normalization and aliases
// ============================================================================

#[test]
fn raw_action_names_normalize_to_snake_case() {
    assert_eq!(normalize_action("  Scroll   Down "), "scroll_down");
    assert_eq!(normalize_action("READ PAGE"), "read_page");
    assert_eq!(normalize_action("navigate"), "navigate");
}

#[test]
fn alias_table_folds_interpreter_synonyms() {
    assert_eq!(canonical_action("go_to"), "navigate");
    assert_eq!(canonical_action("scroll_to_top"), "top");
    assert_eq!(canonical_action("reload_page"), "refresh");
    assert_eq!(canonical_action("read_aloud"), "read_page");
    assert_eq!(canonical_action("stop_voice_assistance"), "stop");
    assert_eq!(canonical_action("open_widget"), "panel_open");
    assert_eq!(canonical_action("select"), "click");
    assert_eq!(canonical_action("made_up_name"), "made_up_name");
}

#[test]
fn navigation_family_covers_history_and_destinations() {
    assert!(is_navigation_action("navigate"));
    assert!(is_navigation_action("back"));
    assert!(is_navigation_action("refresh"));
    assert!(is_navigation_action("pricing"));
    assert!(is_navigation_action("careers"));
    assert!(!is_navigation_action("scroll_down"));
    assert!(!is_navigation_action("stop"));
    assert!(!is_navigation_action("fill_form"));
}

// ============================================================================
// 3. Viewport and zoom
// ============================================================================

#[test]
fn scroll_commands_reach_the_driver() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    assert_eq!(
        run(&mut fixture, &model, &Intent::new("scroll_down")),
        CommandOutcome::done()
    );
    run(&mut fixture, &model, &Intent::new("scroll_up"));
    run(&mut fixture, &model, &Intent::new("Scroll To Top"));
    run(&mut fixture, &model, &Intent::new("bottom"));
    run(&mut fixture, &model, &Intent::new("middle"));

    assert_eq!(
        fixture.page.scrolls,
        vec![
            ScrollOp::By(400),
            ScrollOp::By(-400),
            ScrollOp::To(ScrollAnchor::Top),
            ScrollOp::To(ScrollAnchor::Bottom),
            ScrollOp::To(ScrollAnchor::Middle),
        ]
    );
}

#[test]
fn zoom_steps_by_tenths_and_announces() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let outcome = run(&mut fixture, &model, &Intent::new("zoom_in"));
    assert_eq!(outcome, CommandOutcome::done_with("Zoomed in".to_string()));
    assert!((fixture.page.zoom() - 1.1).abs() < 1e-9);

    let outcome = run(&mut fixture, &model, &Intent::new("zoom_out"));
    assert_eq!(outcome, CommandOutcome::done_with("Zoomed out".to_string()));
    assert!((fixture.page.zoom() - 1.0).abs() < 1e-9);
}

#[test]
fn zoom_never_drops_below_half() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);
    fixture.page.set_zoom(0.55).unwrap();

    run(&mut fixture, &model, &Intent::new("zoom_out"));
    assert_eq!(fixture.page.zoom(), 0.5);

    run(&mut fixture, &model, &Intent::new("zoom_out"));
    assert_eq!(fixture.page.zoom(), 0.5, "already at the floor");
}

#[test]
fn reset_zoom_returns_to_full_size() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);
    fixture.page.set_zoom(1.6).unwrap();

    let outcome = run(&mut fixture, &model, &Intent::new("reset_zoom"));
    assert_eq!(outcome, CommandOutcome::done());
    assert_eq!(fixture.page.zoom(), 1.0);
}

// ============================================================================
// 4. History and key presses
// ============================================================================

#[test]
fn history_commands_in_order() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    run(&mut fixture, &model, &Intent::new("go back"));
    run(&mut fixture, &model, &Intent::new("forward"));
    run(&mut fixture, &model, &Intent::new("reload page"));
    run(&mut fixture, &model, &Intent::new("print"));

    assert_eq!(
        fixture.page.history_ops,
        vec!["back", "forward", "reload", "print"]
    );
}

#[test]
fn key_presses_announce_themselves() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let tab = run(&mut fixture, &model, &Intent::new("tab"));
    assert_eq!(tab, CommandOutcome::done_with("Next".to_string()));

    let enter = run(&mut fixture, &model, &Intent::new("press_enter"));
    assert_eq!(enter, CommandOutcome::done_with("Clicked".to_string()));

    assert_eq!(fixture.page.pressed_keys, vec!["Tab", "Enter"]);
}

// ============================================================================
// 5. Session-affecting outcomes
// ============================================================================

#[test]
fn session_commands_surface_as_outcomes_not_driver_calls() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    assert_eq!(
        run(&mut fixture, &model, &Intent::new("panel_open")),
        CommandOutcome::SetPanel(true)
    );
    assert_eq!(
        run(&mut fixture, &model, &Intent::new("hide_widget")),
        CommandOutcome::SetPanel(false)
    );
    assert_eq!(
        run(&mut fixture, &model, &Intent::new("stop listening")),
        CommandOutcome::EndSession
    );
    assert_eq!(
        run(&mut fixture, &model, &Intent::new("be quiet")),
        CommandOutcome::HaltSpeech
    );

    assert!(fixture.page.clicked.is_empty());
    assert!(fixture.page.scrolls.is_empty());
}

#[test]
fn language_switch_normalizes_spoken_names() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let hindi = run(
        &mut fixture,
        &model,
        &Intent::new("set_language").with_param("language", "hindi"),
    );
    assert_eq!(hindi, CommandOutcome::SwitchLanguage("hi-IN".to_string()));

    let english = run(
        &mut fixture,
        &model,
        &Intent::new("change language").with_param("lang", "en"),
    );
    assert_eq!(english, CommandOutcome::SwitchLanguage("en-US".to_string()));

    let other = run(
        &mut fixture,
        &model,
        &Intent::new("set_language").with_param("language", "fr-FR"),
    );
    assert_eq!(other, CommandOutcome::SwitchLanguage("fr-FR".to_string()));

    let missing = run(&mut fixture, &model, &Intent::new("set_language"));
    assert_eq!(
        missing,
        CommandOutcome::NotFound {
            target: "language".to_string()
        }
    );
}

// ============================================================================
// 6. Read and list commands
// ============================================================================

#[test]
fn read_page_speaks_a_bounded_excerpt() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let outcome = run(&mut fixture, &model, &Intent::new("read_page"));
    match outcome {
        CommandOutcome::Done { feedback: Some(text) } => {
            assert!(text.starts_with("Acme builds rocket components"));
        }
        other => panic!("expected spoken content, got {:?}", other),
    }

    fixture.page.set_main_text(&"a".repeat(600));
    let outcome = run(&mut fixture, &model, &Intent::new("read aloud"));
    match outcome {
        CommandOutcome::Done { feedback: Some(text) } => {
            assert_eq!(text.chars().count(), 500, "long articles are cut off");
        }
        other => panic!("expected spoken content, got {:?}", other),
    }

    fixture.page.set_main_text("   ");
    let outcome = run(&mut fixture, &model, &Intent::new("read_page"));
    assert_eq!(
        outcome,
        CommandOutcome::done_with("Main content not found".to_string())
    );
}

#[test]
fn list_headings_counts_and_enumerates() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let outcome = run(&mut fixture, &model, &Intent::new("show headings"));
    assert_eq!(
        outcome,
        CommandOutcome::done_with(
            "Found 2 headings. Top five: 1. Ship faster with Acme. 2. What we do".to_string()
        )
    );
}

#[test]
fn hidden_headings_are_not_listed() {
    let mut page = StaticPage::new("https://example.com/", "Fixture");
    page.push(DomNode::new("h1").with_text("Visible"));
    page.push(DomNode::new("h2").with_text("Ghost").hidden());
    let snapshot = page.snapshot().unwrap();
    let model = build_page_model(&snapshot);
    let routes = RouteIndex::empty();

    let outcome = CommandExecutor::new(&mut page, &model, &routes, "en-US")
        .execute(&Intent::new("list_headings"));
    assert_eq!(
        outcome,
        CommandOutcome::done_with("Found 1 headings. Top five: 1. Visible".to_string())
    );
}

#[test]
fn list_landmarks_speaks_regions_with_labels() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let outcome = run(&mut fixture, &model, &Intent::new("list_landmarks"));
    assert_eq!(
        outcome,
        CommandOutcome::done_with(
            "Found 5 landmarks. Top five: 1. header. 2. nav. 3. main. 4. footer. \
             5. section (Testimonials)"
                .to_string()
        )
    );
}

#[test]
fn list_links_caps_at_five() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let outcome = run(&mut fixture, &model, &Intent::new("list_links"));
    assert_eq!(
        outcome,
        CommandOutcome::done_with(
            "Found 7 links. Top five: 1. Home. 2. Products. 3. Pricing. 4. About Us. 5. Contact"
                .to_string()
        )
    );
}

#[test]
fn structureless_page_reports_nothing_to_list() {
    let (mut page, model) = empty_page();
    let routes = RouteIndex::empty();

    let headings = CommandExecutor::new(&mut page, &model, &routes, "en-US")
        .execute(&Intent::new("list_headings"));
    assert_eq!(
        headings,
        CommandOutcome::done_with("No visible headings found".to_string())
    );

    let landmarks = CommandExecutor::new(&mut page, &model, &routes, "en-US")
        .execute(&Intent::new("list_landmarks"));
    assert_eq!(
        landmarks,
        CommandOutcome::done_with("No visible landmarks found".to_string())
    );

    let links = CommandExecutor::new(&mut page, &model, &routes, "en-US")
        .execute(&Intent::new("list_links"));
    assert_eq!(
        links,
        CommandOutcome::done_with("No visible links found".to_string())
    );
}

// ============================================================================
// 7. Form filling
// ============================================================================

#[test]
fn fill_form_writes_every_resolved_field() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let intent = Intent::new("fill_form")
        .with_param("name", "Ada Lovelace")
        .with_param("email", "ada@example.com")
        .with_param("message", "Hello there");
    let outcome = run(&mut fixture, &model, &intent);

    assert_eq!(
        outcome,
        CommandOutcome::Filled {
            count: 3,
            requested: 3
        }
    );
    assert_eq!(fixture.page.value_of(fixture.name_field), Some("Ada Lovelace"));
    assert_eq!(
        fixture.page.value_of(fixture.email_field),
        Some("ada@example.com")
    );
    assert_eq!(
        fixture.page.value_of(fixture.message_field),
        Some("Hello there")
    );
    // Each write fires a raw input event plus a framework change event
    assert_eq!(fixture.page.fired_events.len(), 6);
}

#[test]
fn fill_form_targets_the_form_that_matches_the_keys() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let mut intent = Intent::new("fill_form");
    intent.parameters.insert(
        "fields".to_string(),
        json!({"newsletter_email": "ada@example.com"}),
    );
    let outcome = run(&mut fixture, &model, &intent);

    assert_eq!(
        outcome,
        CommandOutcome::Filled {
            count: 1,
            requested: 1
        }
    );
    assert_eq!(
        fixture.page.value_of(fixture.newsletter_email),
        Some("ada@example.com")
    );
    assert_eq!(fixture.page.value_of(fixture.email_field), None);
}

#[test]
fn unresolved_fill_keys_are_skipped_not_fatal() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let intent = Intent::new("fill_form")
        .with_param("email", "ada@example.com")
        .with_param("fax", "none");
    let outcome = run(&mut fixture, &model, &intent);

    assert_eq!(
        outcome,
        CommandOutcome::Filled {
            count: 1,
            requested: 2
        }
    );
    assert!(outcome.succeeded(), "partial fills report, not fail");
}

#[test]
fn fill_on_a_formless_page_counts_zero() {
    let (mut page, model) = empty_page();
    let routes = RouteIndex::empty();

    let intent = Intent::new("fill_form").with_param("email", "ada@example.com");
    let outcome =
        CommandExecutor::new(&mut page, &model, &routes, "en-US").execute(&intent);

    assert_eq!(
        outcome,
        CommandOutcome::Filled {
            count: 0,
            requested: 1
        }
    );
    assert!(page.filled.is_empty());
}

#[test]
fn fill_with_no_values_counts_zero() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let outcome = run(&mut fixture, &model, &Intent::new("fill_form"));
    assert_eq!(
        outcome,
        CommandOutcome::Filled {
            count: 0,
            requested: 0
        }
    );
}

// ============================================================================
// 8. Clicking
// ============================================================================

#[test]
fn click_defaults_to_the_submit_button() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let outcome = run(&mut fixture, &model, &Intent::new("click"));
    assert_eq!(outcome, CommandOutcome::done());
    assert_eq!(fixture.page.clicked, vec![fixture.send_button]);
    assert_eq!(
        fixture.page.scrolls,
        vec![ScrollOp::IntoView(fixture.send_button)],
        "target is brought into view first"
    );
    assert_eq!(fixture.page.waits, vec![100]);
}

#[test]
fn click_resolves_spoken_targets() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let intent = Intent::new("press").with_param("target", "subscribe");
    run(&mut fixture, &model, &intent);
    assert_eq!(fixture.page.clicked, vec![fixture.subscribe_button]);

    let intent = Intent::new("click").with_param("element", "open menu");
    run(&mut fixture, &model, &intent);
    assert_eq!(
        fixture.page.clicked,
        vec![fixture.subscribe_button, fixture.menu_button]
    );
}

#[test]
fn click_miss_reports_the_spoken_target() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let intent = Intent::new("click").with_param("target", "teleport");
    let outcome = run(&mut fixture, &model, &intent);

    assert_eq!(
        outcome,
        CommandOutcome::NotFound {
            target: "teleport".to_string()
        }
    );
    assert!(fixture.page.clicked.is_empty());
}

// ============================================================================
// 9. Navigation
// ============================================================================

#[test]
fn navigate_follows_a_catalogued_nav_link() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let intent = Intent::new("navigate").with_param("destination", "pricing");
    let outcome = run(&mut fixture, &model, &intent);

    assert_eq!(outcome, CommandOutcome::done());
    assert_eq!(fixture.page.navigations, vec!["/pricing"]);
    assert_eq!(fixture.page.url(), "/pricing");
}

#[test]
fn external_destinations_open_a_new_tab() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let intent = Intent::new("go to").with_param("destination", "twitter");
    let outcome = run(&mut fixture, &model, &intent);

    assert_eq!(outcome, CommandOutcome::done());
    assert_eq!(fixture.page.new_tabs, vec!["https://twitter.com/acme"]);
    assert!(fixture.page.navigations.is_empty(), "current page is kept");
}

#[test]
fn route_index_overrides_live_links() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);
    let routes = RouteIndex::from_routes(vec![Route {
        path: "/plans".to_string(),
        keywords: vec!["pricing".to_string()],
    }]);

    let intent = Intent::new("navigate").with_param("destination", "pricing");
    run_with_routes(&mut fixture, &model, &routes, &intent);

    assert_eq!(fixture.page.navigations, vec!["/plans"]);
}

#[test]
fn bare_destination_actions_navigate() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let outcome = run(&mut fixture, &model, &Intent::new("pricing"));
    assert_eq!(outcome, CommandOutcome::done());
    assert_eq!(fixture.page.navigations, vec!["/pricing"]);
}

#[test]
fn navigate_without_a_destination_is_a_miss() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let outcome = run(&mut fixture, &model, &Intent::new("navigate"));
    assert_eq!(
        outcome,
        CommandOutcome::NotFound {
            target: "destination".to_string()
        }
    );
}

#[test]
fn unmatched_destination_is_a_miss() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let intent = Intent::new("navigate").with_param("destination", "warp zone");
    let outcome = run(&mut fixture, &model, &intent);

    assert_eq!(
        outcome,
        CommandOutcome::NotFound {
            target: "warp zone".to_string()
        }
    );
    assert!(fixture.page.navigations.is_empty());
}

// ============================================================================
// 10. Catalogue boundaries and spoken feedback
// ============================================================================

#[test]
fn chat_and_help_touch_nothing() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    assert_eq!(
        run(&mut fixture, &model, &Intent::new("chat")),
        CommandOutcome::done()
    );
    assert_eq!(
        run(&mut fixture, &model, &Intent::new("help")),
        CommandOutcome::done()
    );
    assert!(fixture.page.clicked.is_empty());
    assert!(fixture.page.scrolls.is_empty());
    assert!(fixture.page.navigations.is_empty());
}

#[test]
fn unknown_actions_are_unsupported() {
    let mut fixture = corporate_page();
    let model = corporate_model(&mut fixture);

    let outcome = run(&mut fixture, &model, &Intent::new("levitate"));
    assert_eq!(
        outcome,
        CommandOutcome::Unsupported {
            action: "levitate".to_string()
        }
    );
    assert!(!outcome.succeeded());
}

#[test]
fn outcome_success_classification() {
    assert!(CommandOutcome::done().succeeded());
    assert!(CommandOutcome::Filled { count: 0, requested: 5 }.succeeded());
    assert!(CommandOutcome::EndSession.succeeded());
    assert!(!CommandOutcome::NotFound { target: "x".to_string() }.succeeded());
    assert!(!CommandOutcome::Failed { reason: "x".to_string() }.succeeded());
}

#[test]
fn outcomes_map_to_spoken_lines() {
    let lang = "en-US";

    assert_eq!(
        feedback::outcome_feedback(&CommandOutcome::done(), lang),
        None
    );
    assert_eq!(
        feedback::outcome_feedback(&CommandOutcome::done_with("Hi".to_string()), lang),
        Some("Hi".to_string())
    );
    assert_eq!(
        feedback::outcome_feedback(
            &CommandOutcome::Filled { count: 2, requested: 3 },
            lang
        ),
        Some("Filled 2 of 3 fields".to_string())
    );
    assert_eq!(
        feedback::outcome_feedback(
            &CommandOutcome::NotFound { target: "docs".to_string() },
            lang
        ),
        Some("Could not find \"docs\"".to_string())
    );
    assert_eq!(
        feedback::outcome_feedback(
            &CommandOutcome::Unsupported { action: "x".to_string() },
            lang
        ),
        Some("Sorry, something went wrong".to_string())
    );
    assert_eq!(
        feedback::outcome_feedback(&CommandOutcome::EndSession, lang),
        Some("Voice navigation stopped".to_string())
    );
    assert_eq!(
        feedback::outcome_feedback(&CommandOutcome::HaltSpeech, lang),
        None,
        "halting speech must not start more speech"
    );
    assert_eq!(
        feedback::outcome_feedback(&CommandOutcome::SetPanel(true), lang),
        Some("Widget opened".to_string())
    );
}

#[test]
fn language_switch_announces_in_the_new_language() {
    let outcome = CommandOutcome::SwitchLanguage("hi-IN".to_string());
    assert_eq!(
        feedback::outcome_feedback(&outcome, "en-US"),
        Some("भाषा बदली गई".to_string())
    );
}

#[test]
fn feedback_localizes_to_hindi() {
    assert_eq!(feedback::apology("hi-IN"), "माफ़ करें, कुछ गड़बड़ हो गई");
    assert_eq!(feedback::fill_summary("hi-IN", 2, 3), "3 में से 2 फ़ील्ड भर दिए");
    assert_eq!(feedback::session_started("hi-IN"), "वॉयस नेविगेशन चालू है");
    assert_eq!(feedback::session_started("en-US"), "Voice navigation is on");
}
