// Auth service - Placeholder login gate in front of the dashboard
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Not logged in")]
    Unauthenticated,
}

/// Checks a single configured username/password pair and tracks issued tokens.
#[derive(Clone)]
pub struct AuthService {
    username: String,
    password: String,
    sessions: Arc<Mutex<HashSet<String>>>,
}

impl AuthService {
    pub fn new(username: String, password: String) -> Self {
        Self {
            username,
            password,
            sessions: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Returns a fresh bearer token on success
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if username != self.username || password != self.password {
            tracing::info!("Rejected login for {:?}", username);
            return Err(AuthError::InvalidCredentials);
        }

        let token = Uuid::new_v4().to_string();
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token.clone());
        tracing::info!("User {} logged in", username);
        Ok(token)
    }

    pub fn logout(&self, token: &str) -> Result<(), AuthError> {
        let removed = self
            .sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(token);
        if removed {
            Ok(())
        } else {
            Err(AuthError::Unauthenticated)
        }
    }

    pub fn authorize(&self, token: &str) -> Result<(), AuthError> {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        if sessions.contains(token) {
            Ok(())
        } else {
            Err(AuthError::Unauthenticated)
        }
    }
}
