use crate::audio::feedback;
use crate::browser::driver::{PageDriver, ScrollAnchor};
use crate::command::command_model::{
    canonical_action, normalize_action, CommandOutcome, Intent, DESTINATION_ACTIONS,
};
use crate::page::dom::DomNode;
use crate::page::page_model::{FormModel, PageModel};
use crate::resolver::button::locate_button_or_link;
use crate::resolver::field::{locate_live_field, resolve_field};
use crate::resolver::navigation::{locate_navigation_target, NavTarget};
use crate::resolver::routes::RouteIndex;
use crate::session::error::NavError;

/// Fixed scroll step for up/down commands, in pixels.
const SCROLL_STEP_PX: i32 = 400;

/// Zoom changes in tenth steps and never drops below half size.
const ZOOM_STEP: f64 = 0.1;
const MIN_ZOOM: f64 = 0.5;

/// Read-back is bounded so a long article cannot hold the audio channel.
const READ_LIMIT_CHARS: usize = 500;

/// Pause between scrolling a click target into view and clicking it.
const CLICK_SETTLE_MS: u64 = 100;

/// List commands speak at most this many entries.
const LIST_LIMIT: usize = 5;

/// Spoken list entries are capped per item.
const LIST_ITEM_CHARS: usize = 60;

/// Executes one intent against the current page.
///
/// Holds the page model built earlier plus the driver for live access.
/// Execution never panics and never returns `Err`: every outcome, including
/// transport failure, is a `CommandOutcome` so the listening session
/// survives it.
pub struct CommandExecutor<'a> {
    driver: &'a mut dyn PageDriver,
    model: &'a PageModel,
    routes: &'a RouteIndex,
    language: &'a str,
}

impl<'a> CommandExecutor<'a> {
    pub fn new(
        driver: &'a mut dyn PageDriver,
        model: &'a PageModel,
        routes: &'a RouteIndex,
        language: &'a str,
    ) -> Self {
        CommandExecutor {
            driver,
            model,
            routes,
            language,
        }
    }

    /// Dispatch over the operation catalogue. The raw action name is
    /// normalized and run through the alias table first.
    pub fn execute(&mut self, intent: &Intent) -> CommandOutcome {
        let normalized = normalize_action(&intent.action);
        let action = canonical_action(&normalized);

        match action {
            "scroll_down" => self.viewport(|d| d.scroll_by(SCROLL_STEP_PX), None),
            "scroll_up" => self.viewport(|d| d.scroll_by(-SCROLL_STEP_PX), None),
            "top" => self.viewport(|d| d.scroll_to(ScrollAnchor::Top), None),
            "bottom" => self.viewport(|d| d.scroll_to(ScrollAnchor::Bottom), None),
            "middle" => self.viewport(|d| d.scroll_to(ScrollAnchor::Middle), None),
            "zoom_in" => self.zoom(ZOOM_STEP),
            "zoom_out" => self.zoom(-ZOOM_STEP),
            "reset_zoom" => self.viewport(|d| d.set_zoom(1.0), None),
            "back" => self.viewport(|d| d.back(), None),
            "forward" => self.viewport(|d| d.forward(), None),
            "refresh" => self.viewport(|d| d.reload(), None),
            "print" => self.viewport(|d| d.print_page(), None),
            "press_tab" => self.viewport(
                |d| d.press_key("Tab"),
                Some(feedback::focus_next(self.language)),
            ),
            "press_enter" => self.viewport(
                |d| d.press_key("Enter"),
                Some(feedback::clicked(self.language)),
            ),
            "panel_open" => CommandOutcome::SetPanel(true),
            "panel_close" => CommandOutcome::SetPanel(false),
            "stop" => CommandOutcome::EndSession,
            "stop_reading" => CommandOutcome::HaltSpeech,
            "set_language" => match intent.first_param(&["language", "lang"]) {
                Some(lang) => CommandOutcome::SwitchLanguage(normalize_language(lang)),
                None => CommandOutcome::NotFound {
                    target: "language".to_string(),
                },
            },
            "read_page" => self.read_page(),
            "list_headings" => self.list_headings(),
            "list_landmarks" => self.list_landmarks(),
            "list_links" => self.list_links(),
            // The reply text already carries the whole answer
            "chat" | "help" => CommandOutcome::done(),
            "fill_form" => self.fill_form(intent),
            "click" => self.click(intent),
            "navigate" => {
                let destination = intent
                    .first_param(&["destination", "target", "page"])
                    .unwrap_or("");
                self.navigate(destination)
            }
            name if DESTINATION_ACTIONS.contains(&name) => {
                let destination = intent
                    .first_param(&["destination", "target", "page"])
                    .unwrap_or(name);
                self.navigate(destination)
            }
            other => CommandOutcome::Unsupported {
                action: other.to_string(),
            },
        }
    }

    fn viewport<F>(&mut self, op: F, feedback: Option<String>) -> CommandOutcome
    where
        F: FnOnce(&mut dyn PageDriver) -> Result<(), NavError>,
    {
        match op(self.driver) {
            Ok(()) => CommandOutcome::Done { feedback },
            Err(e) => self.transport_failure(e),
        }
    }

    fn zoom(&mut self, step: f64) -> CommandOutcome {
        let level = match self.driver.zoom_level() {
            Ok(level) => level,
            Err(e) => return self.transport_failure(e),
        };
        let next = (level + step).max(MIN_ZOOM);
        match self.driver.set_zoom(next) {
            Ok(()) => {
                let message = if step > 0.0 {
                    feedback::zoomed_in(self.language)
                } else {
                    feedback::zoomed_out(self.language)
                };
                CommandOutcome::done_with(message)
            }
            Err(e) => self.transport_failure(e),
        }
    }

    fn read_page(&mut self) -> CommandOutcome {
        let text = match self.driver.main_content_text() {
            Ok(text) => text,
            Err(e) => return self.transport_failure(e),
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return CommandOutcome::done_with(feedback::no_content(self.language));
        }
        let excerpt: String = trimmed.chars().take(READ_LIMIT_CHARS).collect();
        CommandOutcome::done_with(excerpt)
    }

    fn list_headings(&mut self) -> CommandOutcome {
        let snapshot = match self.driver.snapshot() {
            Ok(s) => s,
            Err(e) => return self.transport_failure(e),
        };
        let headings: Vec<&DomNode> = snapshot
            .nodes
            .iter()
            .filter(|n| {
                matches!(n.tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
                    && n.visible
                    && !n.display_text().trim().is_empty()
            })
            .collect();

        if headings.is_empty() {
            return CommandOutcome::done_with(feedback::no_headings(self.language));
        }
        let first: Vec<String> = headings
            .iter()
            .take(LIST_LIMIT)
            .map(|n| cap_chars(n.display_text().trim(), LIST_ITEM_CHARS))
            .collect();
        CommandOutcome::done_with(feedback::headings_summary(
            self.language,
            headings.len(),
            &first,
        ))
    }

    fn list_landmarks(&mut self) -> CommandOutcome {
        let snapshot = match self.driver.snapshot() {
            Ok(s) => s,
            Err(e) => return self.transport_failure(e),
        };
        let landmarks: Vec<&DomNode> = snapshot
            .nodes
            .iter()
            .filter(|n| n.visible && is_spoken_landmark(n))
            .collect();

        if landmarks.is_empty() {
            return CommandOutcome::done_with(feedback::no_landmarks(self.language));
        }
        let first: Vec<String> = landmarks
            .iter()
            .take(LIST_LIMIT)
            .map(|n| describe_landmark(n))
            .collect();
        CommandOutcome::done_with(feedback::landmarks_summary(
            self.language,
            landmarks.len(),
            &first,
        ))
    }

    fn list_links(&mut self) -> CommandOutcome {
        let snapshot = match self.driver.snapshot() {
            Ok(s) => s,
            Err(e) => return self.transport_failure(e),
        };
        let links: Vec<&DomNode> = snapshot
            .nodes
            .iter()
            .filter(|n| {
                n.tag == "a"
                    && n.href.is_some()
                    && n.visible
                    && (!n.display_text().trim().is_empty() || n.aria_label.is_some())
            })
            .collect();

        if links.is_empty() {
            return CommandOutcome::done_with(feedback::no_links(self.language));
        }
        let first: Vec<String> = links
            .iter()
            .take(LIST_LIMIT)
            .map(|n| link_summary(n))
            .collect();
        CommandOutcome::done_with(feedback::links_summary(self.language, links.len(), &first))
    }

    /// Fill each requested key into the best-matching form, independently.
    /// Unresolved keys are skipped and per-field driver failures absorbed:
    /// the count is the report, partial fills are not errors.
    fn fill_form(&mut self, intent: &Intent) -> CommandOutcome {
        let values = intent.fill_values();
        let requested = values.len();

        if self.model.forms.is_empty() || requested == 0 {
            return CommandOutcome::Filled {
                count: 0,
                requested,
            };
        }

        let snapshot = match self.driver.snapshot() {
            Ok(s) => s,
            Err(e) => return self.transport_failure(e),
        };

        let form = self.pick_target_form(&values);

        let mut count = 0;
        for (key, value) in &values {
            let Some(field) = resolve_field(form, key) else {
                continue;
            };
            let Some(node) = locate_live_field(field, form, self.model, &snapshot) else {
                continue;
            };
            match self.driver.fill(node, value) {
                Ok(()) => count += 1,
                Err(e) => eprintln!("Warning: fill failed for '{}': {}", key, e),
            }
        }

        CommandOutcome::Filled { count, requested }
    }

    /// First form containing any field matching a requested key, else the
    /// first form on the page.
    fn pick_target_form(&self, values: &[(String, String)]) -> &'a FormModel {
        if self.model.forms.len() > 1 {
            for form in &self.model.forms {
                if values.iter().any(|(key, _)| resolve_field(form, key).is_some()) {
                    return form;
                }
            }
        }
        &self.model.forms[0]
    }

    fn click(&mut self, intent: &Intent) -> CommandOutcome {
        let target = intent
            .first_param(&["target", "element", "button"])
            .unwrap_or("submit");

        let snapshot = match self.driver.snapshot() {
            Ok(s) => s,
            Err(e) => return self.transport_failure(e),
        };

        match locate_button_or_link(target, self.model, &snapshot) {
            Some(node) => {
                // Best-effort: failing to scroll must not lose the click
                let _ = self.driver.scroll_into_view(node);
                let _ = self.driver.wait(CLICK_SETTLE_MS);
                match self.driver.click(node) {
                    Ok(()) => CommandOutcome::done(),
                    Err(e) => self.transport_failure(e),
                }
            }
            None => CommandOutcome::NotFound {
                target: target.to_string(),
            },
        }
    }

    fn navigate(&mut self, destination: &str) -> CommandOutcome {
        if destination.trim().is_empty() {
            return CommandOutcome::NotFound {
                target: "destination".to_string(),
            };
        }

        let snapshot = match self.driver.snapshot() {
            Ok(s) => s,
            Err(e) => return self.transport_failure(e),
        };

        match locate_navigation_target(destination, self.model, &snapshot, self.routes) {
            Some(NavTarget::Path(path)) => match self.driver.navigate(&path) {
                Ok(()) => CommandOutcome::done(),
                Err(e) => self.transport_failure(e),
            },
            Some(NavTarget::Link { href, external, .. }) => {
                let result = if external {
                    self.driver.open_new_tab(&href)
                } else {
                    self.driver.navigate(&href)
                };
                match result {
                    Ok(()) => CommandOutcome::done(),
                    Err(e) => self.transport_failure(e),
                }
            }
            None => CommandOutcome::NotFound {
                target: destination.to_string(),
            },
        }
    }

    fn transport_failure(&self, e: NavError) -> CommandOutcome {
        eprintln!("Warning: page action failed: {}", e);
        CommandOutcome::Failed {
            reason: e.to_string(),
        }
    }
}

fn normalize_language(raw: &str) -> String {
    match raw.trim().to_lowercase().as_str() {
        "hindi" | "hi" | "hi-in" => "hi-IN".to_string(),
        "english" | "en" | "en-us" => "en-US".to_string(),
        other => other.to_string(),
    }
}

fn is_spoken_landmark(node: &DomNode) -> bool {
    matches!(node.tag.as_str(), "nav" | "main" | "header" | "footer")
        || (node.tag == "section" && node.aria_label.is_some())
        || matches!(
            node.role.as_deref(),
            Some("navigation") | Some("main") | Some("banner") | Some("contentinfo")
        )
}

fn describe_landmark(node: &DomNode) -> String {
    let role = node
        .role
        .clone()
        .unwrap_or_else(|| node.tag.clone());
    match &node.aria_label {
        Some(label) => format!("{} ({})", role, label),
        None => role,
    }
}

fn link_summary(node: &DomNode) -> String {
    let text = collapse_whitespace(node.display_text().trim());
    if !text.is_empty() {
        return cap_chars(&text, LIST_ITEM_CHARS);
    }
    node.aria_label
        .clone()
        .unwrap_or_else(|| "Link".to_string())
}

fn cap_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
