//! The session orchestrator: a small state machine that gates document
//! verification behind authentication.
//!
//! Every asynchronous call captures the session epoch when it is issued. Its
//! response is applied only if the epoch is unchanged when it arrives, so a
//! logout or a new login always wins over a response that was still in flight.
//! The state lock is never held across an await.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, instrument, warn};

use crate::app_error::{AppError, AppResult};
use crate::application::jwt;
use crate::application::ports::{AuthGateway, TokenStore, VerificationGateway};
use crate::application::validators;
use crate::entities::credential::{Credential, TokenValidation};
use crate::entities::document::DocumentFile;
use crate::entities::session_state::{AuthMode, SessionState, SessionView};

struct SessionInner {
    state: SessionState,
    epoch: u64,
    /// Read-through copy of the stored credential.
    credential: Option<Credential>,
}

pub struct SessionOrchestrator {
    store: Arc<dyn TokenStore>,
    auth: Arc<dyn AuthGateway>,
    verifier: Arc<dyn VerificationGateway>,
    inner: Mutex<SessionInner>,
}

impl SessionOrchestrator {
    /// Initial state comes straight from the store: `AuthenticatedIdle` when a
    /// complete credential is present, `Unauthenticated(login)` otherwise.
    /// Call [`revalidate`](Self::revalidate) afterwards to confirm the token.
    pub fn new(
        store: Arc<dyn TokenStore>,
        auth: Arc<dyn AuthGateway>,
        verifier: Arc<dyn VerificationGateway>,
    ) -> Self {
        let credential = store.read();
        let state = if credential.is_some() {
            SessionState::AuthenticatedIdle
        } else {
            SessionState::login()
        };

        Self {
            store,
            auth,
            verifier,
            inner: Mutex::new(SessionInner {
                state,
                epoch: 0,
                credential,
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    pub fn credential(&self) -> Option<Credential> {
        self.lock().credential.clone()
    }

    pub fn snapshot(&self) -> SessionView {
        let inner = self.lock();
        SessionView {
            state: inner.state.clone(),
            subject: inner.credential.as_ref().map(|c| c.subject.clone()),
            role: inner.credential.as_ref().map(|c| c.role.clone()),
            epoch: inner.epoch,
        }
    }

    /// Ask the backend whether the stored token is still accepted.
    ///
    /// Fails closed: a rejection, a network error or a locally expired JWT
    /// ends the session. On success the token is kept and the stored claims
    /// are refreshed.
    #[instrument(skip(self))]
    pub async fn revalidate(&self) -> SessionState {
        let (epoch, credential) = {
            let inner = self.lock();
            match (&inner.credential, inner.state.is_authenticated()) {
                (Some(credential), true) => (inner.epoch, credential.clone()),
                _ => {
                    debug!("no stored credential, skipping revalidation");
                    return inner.state.clone();
                }
            }
        };

        let validation = if jwt::is_expired(credential.token.expose_secret(), Utc::now()) {
            info!("stored token has expired");
            TokenValidation::rejected()
        } else {
            self.auth.validate_token(&credential).await
        };

        let mut inner = self.lock();
        if inner.epoch != epoch {
            debug!(epoch, current = inner.epoch, "discarding stale revalidation response");
            return inner.state.clone();
        }

        if validation.valid {
            let refreshed = credential.with_claims(validation.username, validation.role);
            if !refreshed.same_as(&credential) {
                if let Err(e) = self.store.save(&refreshed) {
                    warn!(error = %e, "failed to persist refreshed claims");
                }
                info!(subject = %refreshed.subject, role = %refreshed.role, "session claims refreshed");
            }
            inner.credential = Some(refreshed);
        } else {
            info!("stored token rejected, ending session");
            self.end_session(&mut inner, None);
        }

        inner.state.clone()
    }

    /// Log in or sign up, depending on the current form mode.
    #[instrument(skip(self, password))]
    pub async fn submit_credentials(&self, username: &str, password: SecretString) -> SessionState {
        let (epoch, mode) = {
            let mut inner = self.lock();
            let mode = match &inner.state {
                SessionState::Unauthenticated { mode, .. } => *mode,
                other => {
                    debug!(state = other.name(), "already authenticated, ignoring credentials");
                    return other.clone();
                }
            };

            let rejection = match mode {
                AuthMode::Login => validators::login_rejection(username, password.expose_secret()),
                AuthMode::Signup => validators::signup_rejection(username, password.expose_secret()),
            };
            inner.state = SessionState::Unauthenticated {
                mode,
                pending_error: rejection.map(str::to_string),
            };
            if rejection.is_some() {
                return inner.state.clone();
            }

            (inner.epoch, mode)
        };

        let outcome = match mode {
            AuthMode::Login => self.auth.login(username, &password).await,
            AuthMode::Signup => self.auth.signup(username, &password).await,
        };

        let mut inner = self.lock();
        let current_mode = match &inner.state {
            SessionState::Unauthenticated { mode, .. } if inner.epoch == epoch => *mode,
            _ => {
                debug!(epoch, current = inner.epoch, "discarding stale authentication response");
                return inner.state.clone();
            }
        };

        let outcome = outcome.and_then(|credential| {
            self.store.save(&credential)?;
            Ok(credential)
        });

        match outcome {
            Ok(credential) => {
                info!(subject = %credential.subject, role = %credential.role, %mode, "session established");
                inner.epoch += 1;
                inner.credential = Some(credential);
                inner.state = SessionState::AuthenticatedIdle;
            }
            Err(e) => {
                warn!(error = %e, %mode, "authentication failed");
                inner.state = SessionState::Unauthenticated {
                    mode: current_mode,
                    pending_error: Some(e.to_string()),
                };
            }
        }

        inner.state.clone()
    }

    /// Switch between the login and signup forms.
    pub fn toggle_mode(&self) -> SessionState {
        let mut inner = self.lock();
        let toggled = match &inner.state {
            SessionState::Unauthenticated { mode, .. } => Some(mode.toggled()),
            _ => None,
        };
        if let Some(mode) = toggled {
            inner.state = SessionState::Unauthenticated {
                mode,
                pending_error: None,
            };
        }
        inner.state.clone()
    }

    /// Submit a document for analysis.
    ///
    /// Accepted only from `AuthenticatedIdle`; in any other state this is a
    /// no-op returning the unchanged state. An unsafe file name is rejected
    /// with `InvalidInput` before the state changes.
    #[instrument(skip(self, file), fields(file_name = %file.file_name, size = file.size()))]
    pub async fn submit_document(&self, file: DocumentFile) -> AppResult<SessionState> {
        if !validators::is_safe_file_name(&file.file_name) {
            return Err(AppError::InvalidInput(
                "Invalid filename characters detected".to_string(),
            ));
        }

        let epoch = {
            let mut inner = self.lock();
            if !matches!(inner.state, SessionState::AuthenticatedIdle) {
                debug!(state = inner.state.name(), "verification not accepted in current state");
                return Ok(inner.state.clone());
            }

            match self.store.read() {
                Some(credential) => inner.credential = Some(credential),
                None => {
                    warn!("credential missing from store, returning to login");
                    self.end_session(&mut inner, None);
                    return Ok(inner.state.clone());
                }
            }

            if file.exceeds_soft_limit() {
                warn!("document exceeds the advisory size limit");
            }

            inner.state = SessionState::VerificationPending {
                submitted_at: Utc::now(),
            };
            inner.epoch
        };

        info!(document_sha256 = %file.fingerprint(), kind = file.kind.mime_type(), "submitting document");
        let outcome = self.verifier.verify(file).await;

        let mut inner = self.lock();
        if inner.epoch != epoch || !inner.state.is_pending() {
            debug!(epoch, current = inner.epoch, "discarding verification response from superseded session");
            return Ok(inner.state.clone());
        }

        let next = match outcome {
            Ok(result) => {
                info!(risk_level = %result.risk_level, risk_score = result.risk_score, "verification complete");
                SessionState::VerificationComplete { result }
            }
            Err(AppError::TokenInvalid) => {
                warn!("backend rejected the credential during verification");
                self.end_session(&mut inner, Some(AppError::TokenInvalid.to_string()));
                return Ok(inner.state.clone());
            }
            Err(e @ AppError::ProtocolError(_)) => {
                warn!(failure_class = "protocol", error = %e, "verification response violated the contract");
                SessionState::VerificationError {
                    message: e.to_string(),
                }
            }
            Err(e) => {
                warn!(failure_class = "backend", error = %e, "verification failed");
                SessionState::VerificationError {
                    message: e.to_string(),
                }
            }
        };
        inner.state = next;

        Ok(inner.state.clone())
    }

    /// Leave `VerificationError` for a fresh upload.
    pub fn retry(&self) -> SessionState {
        let mut inner = self.lock();
        if matches!(inner.state, SessionState::VerificationError { .. }) {
            inner.state = SessionState::AuthenticatedIdle;
        }
        inner.state.clone()
    }

    /// Discard a completed report and return to the upload surface.
    pub fn start_new_scan(&self) -> SessionState {
        let mut inner = self.lock();
        if matches!(inner.state, SessionState::VerificationComplete { .. }) {
            inner.state = SessionState::AuthenticatedIdle;
        }
        inner.state.clone()
    }

    /// End the session from any authenticated state. Any response still in
    /// flight is dropped when it arrives.
    #[instrument(skip(self))]
    pub fn logout(&self) -> SessionState {
        let mut inner = self.lock();
        if inner.state.is_authenticated() {
            info!("logging out");
            self.end_session(&mut inner, None);
        }
        inner.state.clone()
    }

    fn end_session(&self, inner: &mut SessionInner, pending_error: Option<String>) {
        if let Err(e) = self.store.clear() {
            error!(error = %e, "failed to clear token store");
        }
        inner.epoch += 1;
        inner.credential = None;
        inner.state = SessionState::Unauthenticated {
            mode: AuthMode::Login,
            pending_error,
        };
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
