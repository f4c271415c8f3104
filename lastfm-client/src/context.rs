use std::sync::Mutex;

use crate::{ApiResult, Client, LastFmAuth};

/// Identity used when the first caller does not name a user.
pub const FALLBACK_USERNAME: &str = "LASTFM_USERNAME";

/// Owns the one client an application shares between its callers.
///
/// The client is built on first use. Naming a user on a later call
/// re-points the shared client at that user. Handles already returned keep
/// the identity they were built with, so a request in flight is never
/// re-targeted.
#[derive(Debug)]
pub struct ClientContext {
    auth: LastFmAuth,
    base_url: String,
    fallback_username: String,
    shared: Mutex<Option<Client>>,
}

impl ClientContext {
    pub fn new(auth: LastFmAuth, base_url: impl Into<String>) -> Self {
        Self {
            auth,
            base_url: base_url.into(),
            fallback_username: FALLBACK_USERNAME.to_owned(),
            shared: Mutex::new(None),
        }
    }

    pub fn with_fallback_username(mut self, username: impl Into<String>) -> Self {
        self.fallback_username = username.into();
        self
    }

    pub fn get_instance(&self, username: Option<&str>) -> ApiResult<Client> {
        let mut shared = self.shared.lock().unwrap_or_else(|e| e.into_inner());

        match shared.as_mut() {
            Some(client) => {
                if let Some(username) = username {
                    client.set_username(username);
                }
                Ok(client.clone())
            }
            None => {
                let client = Client::with_base_url(
                    self.auth.clone(),
                    username.unwrap_or(&self.fallback_username),
                    &self.base_url,
                )?;
                *shared = Some(client.clone());
                Ok(client)
            }
        }
    }

    pub fn set_username(&self, username: &str) -> ApiResult<()> {
        self.get_instance(Some(username)).map(|_| ())
    }

    pub fn username(&self) -> String {
        let shared = self.shared.lock().unwrap_or_else(|e| e.into_inner());
        match shared.as_ref() {
            Some(client) => client.username().to_owned(),
            None => self.fallback_username.clone(),
        }
    }
}
