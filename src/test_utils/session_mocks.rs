//! In-memory implementations of the auth and verification ports.
//!
//! Calls are counted before the optional gate is awaited, so a test can spin
//! on the counter to know the request is "in flight".

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{AuthGateway, VerificationGateway},
    entities::{
        credential::{Credential, DEFAULT_ROLE, TokenValidation},
        document::DocumentFile,
        verification::VerificationResult,
    },
};

// ============================================================================
// MockAuthGateway
// ============================================================================

struct Account {
    password: String,
    token: String,
    role: String,
}

pub struct MockAuthGateway {
    accounts: Mutex<HashMap<String, Account>>,
    validation: TokenValidation,
    validation_gate: Option<Arc<Notify>>,
    pub login_calls: AtomicUsize,
    pub signup_calls: AtomicUsize,
    pub validate_calls: AtomicUsize,
}

impl Default for MockAuthGateway {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            validation: TokenValidation {
                valid: true,
                username: None,
                role: None,
            },
            validation_gate: None,
            login_calls: AtomicUsize::new(0),
            signup_calls: AtomicUsize::new(0),
            validate_calls: AtomicUsize::new(0),
        }
    }
}

impl MockAuthGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, username: &str, password: &str, token: &str, role: &str) -> Self {
        self.accounts.lock().unwrap().insert(
            username.to_string(),
            Account {
                password: password.to_string(),
                token: token.to_string(),
                role: role.to_string(),
            },
        );
        self
    }

    pub fn with_validation(mut self, validation: TokenValidation) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_validation_gate(mut self, gate: Arc<Notify>) -> Self {
        self.validation_gate = Some(gate);
        self
    }
}

#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn login(&self, username: &str, password: &SecretString) -> AppResult<Credential> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(username) {
            Some(account) if account.password == password.expose_secret() => Ok(Credential::new(
                account.token.clone(),
                username,
                account.role.clone(),
            )),
            _ => Err(AppError::AuthenticationFailed("Login failed".into())),
        }
    }

    async fn signup(&self, username: &str, password: &SecretString) -> AppResult<Credential> {
        self.signup_calls.fetch_add(1, Ordering::SeqCst);
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(username) {
            return Err(AppError::AuthenticationFailed("Signup failed".into()));
        }
        let token = format!("token-{}", username);
        accounts.insert(
            username.to_string(),
            Account {
                password: password.expose_secret().to_string(),
                token: token.clone(),
                role: DEFAULT_ROLE.to_string(),
            },
        );
        Ok(Credential::new(token, username, DEFAULT_ROLE))
    }

    async fn validate_token(&self, _credential: &Credential) -> TokenValidation {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.validation_gate {
            gate.notified().await;
        }
        self.validation.clone()
    }
}

// ============================================================================
// MockVerificationGateway
// ============================================================================

#[derive(Debug, Clone)]
pub enum MockOutcome {
    Complete(VerificationResult),
    Failed(String),
    Protocol(String),
    Unauthorized,
}

#[derive(Default)]
pub struct MockVerificationGateway {
    outcomes: Mutex<VecDeque<MockOutcome>>,
    gate: Option<Arc<Notify>>,
    pub calls: AtomicUsize,
    /// File names in submission order.
    pub received: Mutex<Vec<String>>,
}

impl MockVerificationGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome; outcomes are served first in, first out.
    pub fn with_outcome(self, outcome: MockOutcome) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl VerificationGateway for MockVerificationGateway {
    async fn verify(&self, file: DocumentFile) -> AppResult<VerificationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(file.file_name);
        let outcome = self.outcomes.lock().unwrap().pop_front();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match outcome {
            Some(MockOutcome::Complete(result)) => Ok(result),
            Some(MockOutcome::Failed(message)) => Err(AppError::VerificationFailed(message)),
            Some(MockOutcome::Protocol(message)) => Err(AppError::ProtocolError(message)),
            Some(MockOutcome::Unauthorized) => Err(AppError::TokenInvalid),
            None => Err(AppError::VerificationFailed("Verification failed".into())),
        }
    }
}
