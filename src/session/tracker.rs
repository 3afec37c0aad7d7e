use std::time::{Duration, Instant};

use crate::page::dom::DomSnapshot;

/// New content gets this long to settle before a rebuild fires.
const REBUILD_DEBOUNCE: Duration = Duration::from_millis(500);

/// SHA-1 over the element identity lines of a snapshot. Field values are
/// left out so typing into an input does not read as a structure change.
pub fn structure_fingerprint(snapshot: &DomSnapshot) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    for node in &snapshot.nodes {
        let line = format!(
            "{}|{}|{}|{}|{}\n",
            node.tag,
            node.r#type.as_deref().unwrap_or(""),
            node.id.as_deref().unwrap_or(""),
            node.name.as_deref().unwrap_or(""),
            node.href.as_deref().unwrap_or(""),
        );
        hasher.update(line.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Decides when the page model is stale.
///
/// Tracks the current URL plus a structure fingerprint. Any observed change
/// arms a debounce timer; `rebuild_due` reports readiness once the timer
/// elapses. Further changes inside the window push the timer out, so a page
/// mid-render is not modelled over and over.
pub struct PageTracker {
    url: String,
    fingerprint: String,
    pending_at: Option<Instant>,
}

impl PageTracker {
    pub fn new(snapshot: &DomSnapshot) -> Self {
        PageTracker {
            url: snapshot.url.clone(),
            fingerprint: structure_fingerprint(snapshot),
            pending_at: None,
        }
    }

    /// Cheap check against the live URL alone, for every-tick polling.
    pub fn observe_url(&mut self, url: &str, now: Instant) -> bool {
        if url != self.url {
            self.url = url.to_string();
            self.pending_at = Some(now + REBUILD_DEBOUNCE);
            return true;
        }
        false
    }

    /// Full comparison against a fresh snapshot. Returns whether a change
    /// was detected (and the debounce armed).
    pub fn observe(&mut self, snapshot: &DomSnapshot, now: Instant) -> bool {
        let fingerprint = structure_fingerprint(snapshot);
        if snapshot.url != self.url || fingerprint != self.fingerprint {
            self.url = snapshot.url.clone();
            self.fingerprint = fingerprint;
            self.pending_at = Some(now + REBUILD_DEBOUNCE);
            return true;
        }
        false
    }

    /// True once a detected change has sat out the debounce window. Resets
    /// the timer; the caller is expected to rebuild.
    pub fn rebuild_due(&mut self, now: Instant) -> bool {
        match self.pending_at {
            Some(at) if now >= at => {
                self.pending_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn change_pending(&self) -> bool {
        self.pending_at.is_some()
    }
}
