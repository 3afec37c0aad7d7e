//! Localized spoken feedback. The interpreter's reply text does most of the
//! talking; these cover the outcomes the system must announce on its own.

use crate::command::command_model::CommandOutcome;

fn is_hindi(language: &str) -> bool {
    language.starts_with("hi")
}

/// Spoken line for an outcome when the interpreter supplied no reply of its
/// own. `None` means the outcome has nothing to say.
///
/// A language switch is announced in the language being switched to, not
/// the one being left.
pub fn outcome_feedback(outcome: &CommandOutcome, language: &str) -> Option<String> {
    match outcome {
        CommandOutcome::Done { feedback } => feedback.clone(),
        CommandOutcome::Filled { count, requested } => {
            Some(fill_summary(language, *count, *requested))
        }
        CommandOutcome::NotFound { target } => Some(target_not_found(language, target)),
        CommandOutcome::Unsupported { .. } | CommandOutcome::Failed { .. } => {
            Some(apology(language))
        }
        CommandOutcome::EndSession => Some(session_stopped(language)),
        CommandOutcome::HaltSpeech => None,
        CommandOutcome::SwitchLanguage(target) => Some(language_changed(target)),
        CommandOutcome::SetPanel(open) => Some(if *open {
            panel_opened(language)
        } else {
            panel_closed(language)
        }),
    }
}

pub fn session_started(language: &str) -> String {
    if is_hindi(language) {
        "वॉयस नेविगेशन चालू है".to_string()
    } else {
        "Voice navigation is on".to_string()
    }
}

pub fn session_stopped(language: &str) -> String {
    if is_hindi(language) {
        "वॉयस नेविगेशन बंद".to_string()
    } else {
        "Voice navigation stopped".to_string()
    }
}

/// Generic apology for transport failures; the command is dropped.
pub fn apology(language: &str) -> String {
    if is_hindi(language) {
        "माफ़ करें, कुछ गड़बड़ हो गई".to_string()
    } else {
        "Sorry, something went wrong".to_string()
    }
}

pub fn target_not_found(language: &str, target: &str) -> String {
    if is_hindi(language) {
        format!("\"{}\" नहीं मिला", target)
    } else {
        format!("Could not find \"{}\"", target)
    }
}

pub fn fill_summary(language: &str, count: usize, requested: usize) -> String {
    if is_hindi(language) {
        format!("{} में से {} फ़ील्ड भर दिए", requested, count)
    } else {
        format!("Filled {} of {} fields", count, requested)
    }
}

pub fn clicked(language: &str) -> String {
    if is_hindi(language) {
        "क्लिक किया".to_string()
    } else {
        "Clicked".to_string()
    }
}

pub fn focus_next(language: &str) -> String {
    if is_hindi(language) {
        "अगला".to_string()
    } else {
        "Next".to_string()
    }
}

pub fn zoomed_in(language: &str) -> String {
    if is_hindi(language) {
        "ज़ूम इन".to_string()
    } else {
        "Zoomed in".to_string()
    }
}

pub fn zoomed_out(language: &str) -> String {
    if is_hindi(language) {
        "ज़ूम आउट".to_string()
    } else {
        "Zoomed out".to_string()
    }
}

pub fn panel_opened(language: &str) -> String {
    if is_hindi(language) {
        "विजेट खुला".to_string()
    } else {
        "Widget opened".to_string()
    }
}

pub fn panel_closed(language: &str) -> String {
    if is_hindi(language) {
        "विजेट बंद".to_string()
    } else {
        "Widget closed".to_string()
    }
}

pub fn language_changed(language: &str) -> String {
    if is_hindi(language) {
        "भाषा बदली गई".to_string()
    } else {
        "Language changed".to_string()
    }
}

pub fn no_content(language: &str) -> String {
    if is_hindi(language) {
        "मुख्य सामग्री नहीं मिली".to_string()
    } else {
        "Main content not found".to_string()
    }
}

pub fn no_headings(language: &str) -> String {
    if is_hindi(language) {
        "कोई दिखाई देने वाला शीर्षक नहीं मिला".to_string()
    } else {
        "No visible headings found".to_string()
    }
}

pub fn no_landmarks(language: &str) -> String {
    if is_hindi(language) {
        "कोई दिखाई देने वाला लैंडमार्क नहीं मिला".to_string()
    } else {
        "No visible landmarks found".to_string()
    }
}

pub fn no_links(language: &str) -> String {
    if is_hindi(language) {
        "कोई दिखाई देने वाला लिंक नहीं मिला".to_string()
    } else {
        "No visible links found".to_string()
    }
}

pub fn headings_summary(language: &str, total: usize, first: &[String]) -> String {
    let list = enumerate(first);
    if is_hindi(language) {
        format!("{} शीर्षक मिले। पहले पांच: {}", total, list)
    } else {
        format!("Found {} headings. Top five: {}", total, list)
    }
}

pub fn landmarks_summary(language: &str, total: usize, first: &[String]) -> String {
    let list = enumerate(first);
    if is_hindi(language) {
        format!("{} लैंडमार्क मिले। पहले पांच: {}", total, list)
    } else {
        format!("Found {} landmarks. Top five: {}", total, list)
    }
}

pub fn links_summary(language: &str, total: usize, first: &[String]) -> String {
    let list = enumerate(first);
    if is_hindi(language) {
        format!("{} लिंक मिले। पहले पांच: {}", total, list)
    } else {
        format!("Found {} links. Top five: {}", total, list)
    }
}

fn enumerate(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join(". ")
}
