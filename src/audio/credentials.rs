use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::session::error::NavError;

/// Tokens are refreshed this long before their stated expiry.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

fn default_expires_in() -> u64 {
    600
}

/// Short-lived credential for the speech service.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechCredential {
    pub token: String,
    pub region: String,
    #[serde(default = "default_expires_in", rename = "expiresIn")]
    pub expires_in: u64,
}

/// Fetches and caches the speech-service credential.
///
/// A cached token is reused until it comes within the refresh margin of its
/// expiry, then fetched again. The clock is injected so expiry is testable.
pub struct CredentialProvider {
    endpoint: String,
    cached: Option<(SpeechCredential, Instant)>,
}

impl CredentialProvider {
    pub fn new(api_base: &str) -> Self {
        CredentialProvider {
            endpoint: format!("{}/speech-token", api_base.trim_end_matches('/')),
            cached: None,
        }
    }

    /// Current credential, fetching a fresh one if absent or near expiry.
    pub fn credential(&mut self, now: Instant) -> Result<SpeechCredential, NavError> {
        if let Some((cred, fetched_at)) = &self.cached {
            let ttl = Duration::from_secs(cred.expires_in);
            if now.duration_since(*fetched_at) + REFRESH_MARGIN < ttl {
                return Ok(cred.clone());
            }
        }
        let fresh = self.fetch()?;
        self.cached = Some((fresh.clone(), now));
        Ok(fresh)
    }

    fn fetch(&self) -> Result<SpeechCredential, NavError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| NavError::CredentialFetch(e.to_string()))?;

        let response = client
            .get(&self.endpoint)
            .send()
            .map_err(|e| NavError::CredentialFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NavError::CredentialFetch(format!(
                "{} returned {}",
                self.endpoint,
                response.status()
            )));
        }

        response
            .json()
            .map_err(|e| NavError::CredentialFetch(e.to_string()))
    }
}
