use std::path::Path;
use std::time::{Duration, Instant};

use crate::{
    audio::{
        credentials::CredentialProvider,
        feedback,
        gateway::SpeechGateway,
        turn::{playback_estimate, TurnController, TurnDecision},
    },
    browser::{driver::PageDriver, session::BrowserSession},
    command::{
        command_model::{
            canonical_action, is_navigation_action, normalize_action, CommandOutcome, Intent,
        },
        executor::CommandExecutor,
    },
    interpret::{
        conversation::Conversation,
        interpreter::{HttpInterpreter, InterpretRequest, Interpreter},
    },
    page::{builder::build_page_model, page_model::PageModel},
    resolver::routes::RouteIndex,
    session::{
        error::NavError,
        store::{FileStore, PersistedSettings, SettingsStore},
        tracker::PageTracker,
    },
    trace::{logger::TraceLogger, trace::TraceEvent},
};

pub mod audio;
pub mod browser;
pub mod cli;
pub mod command;
pub mod interpret;
pub mod page;
pub mod resolver;
pub mod session;
pub mod trace;

/// Gateway poll granularity; timers fire with at most this much slack.
const EVENT_POLL: Duration = Duration::from_millis(150);

/// The page URL is sampled this often to catch in-page navigation.
const URL_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Full-structure sample interval, for content swaps that keep the URL.
const STRUCTURE_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Margin after a reply's estimated playback before a deferred navigation
/// runs, so the page unload cannot cut the reply off.
const NAV_DEFER_MARGIN: Duration = Duration::from_millis(800);

/// Settle delay between navigation and the first snapshot.
const PAGE_SETTLE_MS: u64 = 500;

/// Recognition gets this long to release the microphone when the
/// language changes.
const LANGUAGE_SWITCH_SETTLE: Duration = Duration::from_millis(300);

/// Resolved settings for one `run` invocation, CLI flags and config file
/// already merged by the caller.
pub struct SessionOptions {
    pub url: String,
    pub api_base: String,
    /// Explicit language override; when absent the persisted choice wins.
    pub language: Option<String>,
    pub routes_path: Option<String>,
    pub trace_path: Option<String>,
    pub settings_path: String,
    pub browser_script: String,
    pub speech_script: String,
    pub headless: bool,
    pub verbose: u8,
}

/// What one processed transcript tells the session loop to do next.
pub struct TurnOutput {
    /// Text to hand to the synthesis channel, if any.
    pub reply: Option<String>,
    /// Canonical action name, when the interpreter produced one.
    pub action: Option<String>,
    /// Execution result; `None` when nothing ran this turn.
    pub outcome: Option<CommandOutcome>,
    /// Intent held back until the reply finishes playing.
    pub deferred: Option<Intent>,
}

/// Run one transcript through interpretation and execution.
///
/// The interpreter's reply text, when present, is the turn's spoken line
/// and any outcome feedback is suppressed; without a reply the outcome
/// speaks for itself. An interpreter miss degrades to a spoken apology and
/// the session keeps listening. Actions that unload the page are returned
/// as `deferred` instead of being executed, so the caller can let the
/// reply play out first.
pub fn process_turn(
    transcript: &str,
    driver: &mut dyn PageDriver,
    interpreter: &dyn Interpreter,
    model: &PageModel,
    routes: &RouteIndex,
    conversation: &mut Conversation,
    language: &str,
) -> TurnOutput {
    conversation.record_user(transcript);

    let current_url = match driver.current_url() {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Warning: could not read current URL: {}", e);
            String::new()
        }
    };

    let reply = {
        let request = InterpretRequest {
            command: transcript,
            language,
            page_model: Some(model),
            current_url: &current_url,
            recent_turns: conversation.recent(),
            last_context: conversation.last_context(),
        };
        interpreter.interpret(&request)
    };

    let Some(reply) = reply else {
        return TurnOutput {
            reply: Some(feedback::apology(language)),
            action: None,
            outcome: None,
            deferred: None,
        };
    };

    if let Some(context) = reply.context.as_deref() {
        conversation.set_context(context);
    }

    let response = reply
        .response
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);
    if let Some(text) = &response {
        conversation.record_reply(text);
    }

    let action = reply
        .action
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let Some(action) = action else {
        // Bare reply with no action: a chat turn
        return TurnOutput {
            reply: response,
            action: None,
            outcome: None,
            deferred: None,
        };
    };

    let normalized = normalize_action(action);
    let canonical = canonical_action(&normalized).to_string();
    if canonical == "chat" {
        return TurnOutput {
            reply: response,
            action: Some(canonical),
            outcome: None,
            deferred: None,
        };
    }

    let intent = Intent {
        action: normalized,
        parameters: reply.parameters,
    };

    // A reply that precedes a page unload gets played out first
    if response.is_some() && is_navigation_action(&canonical) {
        return TurnOutput {
            reply: response,
            action: Some(canonical),
            outcome: None,
            deferred: Some(intent),
        };
    }

    let outcome = CommandExecutor::new(driver, model, routes, language).execute(&intent);

    let spoken = match &response {
        Some(text) => Some(text.clone()),
        None => feedback::outcome_feedback(&outcome, language),
    };

    TurnOutput {
        reply: spoken,
        action: Some(canonical),
        outcome: Some(outcome),
        deferred: None,
    }
}

/// Drive a live voice session until the user stops it or the speech
/// channel dies.
pub fn run_session(options: &SessionOptions) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Voice navigation session: {} ===\n", options.url);

    let mut session = LiveSession::start(options)?;
    let outcome = session.run();
    session.shutdown();
    outcome?;

    println!("\n=== Session ended ===");
    Ok(())
}

/// Open a page, build its model once, and tear the browser down.
pub fn analyze_page(
    script: &str,
    headless: bool,
    url: &str,
) -> Result<PageModel, Box<dyn std::error::Error>> {
    let mut session = BrowserSession::launch(script, headless)?;
    session.navigate(url)?;
    session.wait(PAGE_SETTLE_MS)?;
    let snapshot = session.snapshot()?;
    session.quit()?;
    Ok(build_page_model(&snapshot))
}

/// Run a single intent against a page, no voice stack attached.
pub fn exec_intent(
    script: &str,
    headless: bool,
    url: &str,
    intent: &Intent,
    routes: &RouteIndex,
    language: &str,
) -> Result<CommandOutcome, Box<dyn std::error::Error>> {
    let mut session = BrowserSession::launch(script, headless)?;
    session.navigate(url)?;
    session.wait(PAGE_SETTLE_MS)?;
    let snapshot = session.snapshot()?;
    let model = build_page_model(&snapshot);
    let outcome = CommandExecutor::new(&mut session, &model, routes, language).execute(intent);
    session.quit()?;
    Ok(outcome)
}

// =========================================================================
// Live session loop
// =========================================================================

/// One running voice session: both bridge subprocesses, the turn machine,
/// and the current page model.
struct LiveSession {
    driver: BrowserSession,
    gateway: SpeechGateway,
    interpreter: HttpInterpreter,
    credentials: CredentialProvider,
    routes: RouteIndex,
    conversation: Conversation,
    turn: TurnController,
    tracer: TraceLogger,
    store: FileStore,
    settings: PersistedSettings,
    model: PageModel,
    tracker: PageTracker,
    /// Navigation held back until its reply has had time to play.
    pending_nav: Option<(Intent, Instant)>,
    turn_counter: u64,
    next_url_poll: Instant,
    next_structure_poll: Instant,
    verbose: u8,
}

impl LiveSession {
    fn start(options: &SessionOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let tracer = match &options.trace_path {
            Some(path) => TraceLogger::new(path),
            None => TraceLogger::disabled(),
        };
        let routes = match &options.routes_path {
            Some(path) => RouteIndex::load(Path::new(path)),
            None => RouteIndex::empty(),
        };
        let mut store = FileStore::new(Path::new(&options.settings_path));
        let mut settings = store.load();
        let language = options
            .language
            .clone()
            .unwrap_or_else(|| settings.language.clone());

        // ---- Browser side ----
        let mut driver = BrowserSession::launch(&options.browser_script, options.headless)?;
        driver.navigate(&options.url)?;
        driver.wait(PAGE_SETTLE_MS)?;
        let snapshot = driver.snapshot()?;
        let model = build_page_model(&snapshot);
        let tracker = PageTracker::new(&snapshot);
        println!(
            "Page model: {} forms, {} nav links, {} interactables, {} landmarks",
            model.forms.len(),
            model.nav_links.len(),
            model.interactables.len(),
            model.landmarks.len()
        );

        // ---- Speech side ----
        // A credential or gateway failure reverts the persisted state to
        // not-listening before bailing out.
        let mut gateway = SpeechGateway::launch(&options.speech_script)?;
        let mut credentials = CredentialProvider::new(&options.api_base);
        let startup = credentials
            .credential(Instant::now())
            .and_then(|credential| {
                gateway.configure(&credential.token, &credential.region, &language)
            })
            .and_then(|()| gateway.start_recognition());
        if let Err(e) = startup {
            settings.listening_enabled = false;
            store.save(&settings);
            return Err(Box::new(e));
        }

        let mut turn = TurnController::new(&language);
        turn.begin_listening();
        settings.listening_enabled = true;
        settings.language = language;
        store.save(&settings);

        let now = Instant::now();
        Ok(LiveSession {
            driver,
            gateway,
            interpreter: HttpInterpreter::new(&options.api_base),
            credentials,
            routes,
            conversation: Conversation::new(),
            turn,
            tracer,
            store,
            settings,
            model,
            tracker,
            pending_nav: None,
            turn_counter: 0,
            next_url_poll: now + URL_POLL_INTERVAL,
            next_structure_poll: now + STRUCTURE_POLL_INTERVAL,
            verbose: options.verbose,
        })
    }

    fn run(&mut self) -> Result<(), NavError> {
        let hello = feedback::session_started(self.turn.language());
        self.speak(&hello);

        loop {
            let now = Instant::now();

            // ---- Timers: a drained queue entry runs like a fresh dispatch ----
            if let Some(transcript) = self.turn.poll(now) {
                if self.handle_transcript(&transcript) {
                    break;
                }
                continue;
            }

            // ---- Deferred navigation, once its reply has played out ----
            if self.pending_nav.as_ref().is_some_and(|(_, due)| now >= *due) {
                if let Some((intent, _)) = self.pending_nav.take() {
                    self.execute_deferred(&intent);
                }
                continue;
            }

            // ---- Page staleness ----
            self.refresh_model_if_due(now);

            // ---- Gateway events ----
            let event = match self.gateway.poll_event(EVENT_POLL)? {
                Some(event) => event,
                None => continue,
            };

            match event.event.as_str() {
                "final" => {
                    let text = event.text.unwrap_or_default();
                    if self.handle_final(&text) {
                        break;
                    }
                }
                "partial" => {
                    if self.verbose > 1 {
                        if let Some(text) = &event.text {
                            println!("  ... {}", text);
                        }
                    }
                }
                // Submission ack; the duration timer is already armed
                "accepted" => {}
                "playback_done" => self.turn.on_playback_finished(Instant::now()),
                "speak_error" => {
                    eprintln!(
                        "Warning: speech synthesis failed: {}",
                        event.error.as_deref().unwrap_or("unknown error")
                    );
                    self.turn.on_speech_error(Instant::now());
                }
                "error" => {
                    // Recognition channel is gone; park the session rather
                    // than spin on a dead microphone
                    eprintln!(
                        "Speech service error: {}",
                        event.error.as_deref().unwrap_or("unknown error")
                    );
                    self.settings.listening_enabled = false;
                    self.store.save(&self.settings);
                    break;
                }
                other => {
                    if self.verbose > 0 {
                        println!("Unhandled gateway event: {}", other);
                    }
                }
            }
        }

        Ok(())
    }

    /// Route one final transcript through the turn machine. Returns true
    /// when the session should end.
    fn handle_final(&mut self, text: &str) -> bool {
        match self.turn.on_final_transcript(text, Instant::now()) {
            TurnDecision::Dispatch(transcript) => self.handle_transcript(&transcript),
            TurnDecision::Queued => {
                if self.verbose > 0 {
                    println!("Queued behind active speech: {}", text.trim());
                }
                let event = TraceEvent::now(self.turn_counter, self.turn.phase())
                    .with_transcript(text)
                    .with_verdict("queued")
                    .with_queue_len(self.turn.queue_len());
                self.tracer.log(&event);
                false
            }
            TurnDecision::Dropped(verdict) => {
                let event = TraceEvent::now(self.turn_counter, self.turn.phase())
                    .with_transcript(text)
                    .with_verdict(format!("{:?}", verdict));
                self.tracer.log(&event);
                false
            }
            TurnDecision::Ignored => false,
        }
    }

    /// Process one dispatched transcript end to end. Returns true when the
    /// session should end.
    fn handle_transcript(&mut self, transcript: &str) -> bool {
        self.turn_counter += 1;
        if self.verbose > 0 {
            println!("\n--- Turn {}: {} ---", self.turn_counter, transcript);
        }

        let language = self.turn.language().to_string();
        let output = process_turn(
            transcript,
            &mut self.driver,
            &self.interpreter,
            &self.model,
            &self.routes,
            &mut self.conversation,
            &language,
        );

        if let Some(reply) = &output.reply {
            if self.settings.voice_feedback {
                self.speak(reply);
            } else if self.verbose > 0 {
                println!("(muted) {}", reply);
            }
        }

        if let Some(intent) = output.deferred {
            let wait = output
                .reply
                .as_deref()
                .map(playback_estimate)
                .unwrap_or_default();
            self.pending_nav = Some((intent, Instant::now() + wait + NAV_DEFER_MARGIN));
        }

        let mut event = TraceEvent::now(self.turn_counter, self.turn.phase())
            .with_transcript(transcript)
            .with_queue_len(self.turn.queue_len());
        if let Some(action) = &output.action {
            event = event.with_action(action);
        }
        if let Some(outcome) = &output.outcome {
            event = event.with_outcome(outcome);
        }
        if let Some(reply) = &output.reply {
            event = event.with_spoken(reply);
        }
        self.tracer.log(&event);

        let end = match output.outcome {
            Some(outcome) => self.apply_outcome(outcome),
            None => false,
        };

        self.turn.on_turn_complete(Instant::now());
        self.check_page(Instant::now());
        end
    }

    /// Session-level effects of an outcome. Returns true when the session
    /// should end.
    fn apply_outcome(&mut self, outcome: CommandOutcome) -> bool {
        match outcome {
            CommandOutcome::EndSession => {
                self.settings.listening_enabled = false;
                self.store.save(&self.settings);
                if let Err(e) = self.gateway.stop_recognition() {
                    eprintln!("Warning: could not stop recognition: {}", e);
                }
                true
            }
            CommandOutcome::HaltSpeech => {
                if let Err(e) = self.gateway.halt_speech() {
                    eprintln!("Warning: could not halt speech: {}", e);
                }
                self.turn.on_playback_finished(Instant::now());
                false
            }
            CommandOutcome::SwitchLanguage(language) => {
                if let Err(e) = self.restart_recognition(&language) {
                    eprintln!("Language switch failed, stopping session: {}", e);
                    self.settings.listening_enabled = false;
                    self.store.save(&self.settings);
                    return true;
                }
                false
            }
            CommandOutcome::SetPanel(open) => {
                self.settings.panel_open = open;
                self.store.save(&self.settings);
                false
            }
            _ => false,
        }
    }

    /// Tear recognition down and bring it back up in another language.
    fn restart_recognition(&mut self, language: &str) -> Result<(), NavError> {
        self.gateway.stop_recognition()?;
        // Give the service time to release the microphone
        std::thread::sleep(LANGUAGE_SWITCH_SETTLE);
        let credential = self.credentials.credential(Instant::now())?;
        self.gateway
            .configure(&credential.token, &credential.region, language)?;
        self.gateway.start_recognition()?;
        self.turn.set_language(language);
        self.settings.language = language.to_string();
        self.store.save(&self.settings);
        Ok(())
    }

    fn execute_deferred(&mut self, intent: &Intent) {
        let language = self.turn.language().to_string();
        let outcome = CommandExecutor::new(&mut self.driver, &self.model, &self.routes, &language)
            .execute(intent);

        // Success was already announced by the reply; only a miss speaks
        if !outcome.succeeded() {
            if let Some(text) = feedback::outcome_feedback(&outcome, &language) {
                if self.settings.voice_feedback {
                    self.speak(&text);
                }
            }
        }

        let event = TraceEvent::now(self.turn_counter, self.turn.phase())
            .with_action(&intent.action)
            .with_outcome(&outcome);
        self.tracer.log(&event);
        self.check_page(Instant::now());
    }

    fn speak(&mut self, text: &str) {
        if self.verbose > 0 {
            println!("Speaking: {}", text);
        }
        match self.gateway.speak(text) {
            Ok(()) => self.turn.on_speech_submitted(text, Instant::now()),
            Err(e) => eprintln!("Warning: could not submit speech: {}", e),
        }
    }

    fn check_page(&mut self, now: Instant) {
        match self.driver.current_url() {
            Ok(url) => {
                if self.tracker.observe_url(&url, now) && self.verbose > 0 {
                    println!("Page change detected: {}", url);
                }
            }
            Err(e) => eprintln!("Warning: could not read current URL: {}", e),
        }
    }

    fn refresh_model_if_due(&mut self, now: Instant) {
        if now >= self.next_url_poll {
            self.next_url_poll = now + URL_POLL_INTERVAL;
            self.check_page(now);
        }
        if now >= self.next_structure_poll {
            self.next_structure_poll = now + STRUCTURE_POLL_INTERVAL;
            match self.driver.snapshot() {
                Ok(snapshot) => {
                    self.tracker.observe(&snapshot, now);
                }
                Err(e) => eprintln!("Warning: structure sample failed: {}", e),
            }
        }
        if self.tracker.rebuild_due(now) {
            self.rebuild_model(now);
        }
    }

    fn rebuild_model(&mut self, now: Instant) {
        match self.driver.snapshot() {
            Ok(snapshot) => {
                self.model = build_page_model(&snapshot);
                self.tracker.observe(&snapshot, now);
                if self.verbose > 0 {
                    println!("Page model rebuilt: {}", self.model.page_info.url);
                }
            }
            Err(e) => eprintln!("Warning: page model rebuild failed: {}", e),
        }
    }

    fn shutdown(&mut self) {
        // Let a final goodbye play out before the gateway goes down
        let deadline = Instant::now() + Duration::from_secs(8);
        while self.turn.state().speaking && Instant::now() < deadline {
            match self.gateway.poll_event(EVENT_POLL) {
                Ok(Some(event)) if event.event == "playback_done" => {
                    self.turn.on_playback_finished(Instant::now());
                }
                Ok(_) => {}
                Err(_) => break,
            }
            let _ = self.turn.poll(Instant::now());
        }
        self.turn.stop();
        self.store.save(&self.settings);
        if let Err(e) = self.gateway.quit() {
            eprintln!("Warning: speech gateway did not exit cleanly: {}", e);
        }
        if let Err(e) = self.driver.quit() {
            eprintln!("Warning: browser bridge did not exit cleanly: {}", e);
        }
    }
}
