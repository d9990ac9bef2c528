//! Session lifecycle and the dual-service "smart login".
//!
//! # Design
//! There is no unified identity provider: both services expose the same
//! login endpoint and either may accept a given user. The manager guesses
//! the role from the username, tries the service that role normally lives
//! on, then falls back to the other one. The recorded role is always the
//! guessed one; server responses carry only a token.
//!
//! The manager is passed explicitly to whatever needs the session. It is the
//! only writer of session state.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::auth::{AuthClient, LoginProvider};
use crate::config::AppConfig;
use crate::error::{ApiError, LoginError, StorageError};
use crate::http::Transport;
use crate::storage::Storage;
use crate::types::{LoginRequest, Role, Session};

pub const TOKEN_SLOT: &str = "token";
pub const USER_SLOT: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticating { username: String },
    Authenticated(Session),
}

#[derive(Serialize, Deserialize)]
struct StoredUser {
    username: String,
    role: Role,
}

/// Order in which login providers are tried for a guessed role.
pub fn login_order(role: Role) -> [LoginProvider; 2] {
    match role {
        Role::Admin => [LoginProvider::EmployeeService, LoginProvider::PayrollService],
        Role::Hr => [LoginProvider::PayrollService, LoginProvider::EmployeeService],
    }
}

pub struct SessionManager<S: Storage> {
    employee_auth: AuthClient,
    payroll_auth: AuthClient,
    storage: S,
    state: AuthState,
}

impl<S: Storage> SessionManager<S> {
    pub fn new(config: &AppConfig, storage: S) -> Self {
        Self {
            employee_auth: AuthClient::new(&config.employee_service_url),
            payroll_auth: AuthClient::new(&config.payroll_service_url),
            storage,
            state: AuthState::Anonymous,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.session().map(|s| s.token.as_str())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Rebuild the session from the persisted slots, if both are present.
    pub fn restore(&mut self) -> Result<Option<&Session>, StorageError> {
        let token = self.storage.get(TOKEN_SLOT)?;
        let user = self.storage.get(USER_SLOT)?;
        if let (Some(token), Some(user)) = (token, user) {
            let user: StoredUser =
                serde_json::from_str(&user).map_err(|e| StorageError::Corrupt(e.to_string()))?;
            self.state = AuthState::Authenticated(Session {
                username: user.username,
                role: user.role,
                token,
            });
        }
        Ok(self.session())
    }

    /// Authenticate against whichever service accepts the credentials.
    ///
    /// Fails with `InvalidCredentials` when both services reject them; the
    /// error never says which one was tried first.
    pub fn login<T: Transport>(
        &mut self,
        transport: &T,
        credentials: &LoginRequest,
    ) -> Result<Session, LoginError> {
        let role = self.begin_login(credentials)?;

        let mut token = None;
        for provider in login_order(role) {
            match self.attempt(transport, provider, credentials) {
                Ok(t) => {
                    debug!(provider = provider.name(), "login accepted");
                    token = Some(t);
                    break;
                }
                Err(e) => debug!(provider = provider.name(), error = %e, "login attempt rejected"),
            }
        }

        self.finish_login(token)
    }

    /// Enter `Authenticating` and return the role guessed for the username.
    /// Hosts that drive the provider requests themselves call this, then
    /// [`finish_login`](Self::finish_login) with the token they obtained.
    pub fn begin_login(&mut self, credentials: &LoginRequest) -> Result<Role, LoginError> {
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(LoginError::MissingFields);
        }
        self.state = AuthState::Authenticating {
            username: credentials.username.clone(),
        };
        Ok(Role::expected_for(&credentials.username))
    }

    /// Leave `Authenticating`. A missing token is a rejected login and also
    /// wipes whatever an earlier session left in storage.
    pub fn finish_login(&mut self, token: Option<String>) -> Result<Session, LoginError> {
        let AuthState::Authenticating { username } =
            std::mem::replace(&mut self.state, AuthState::Anonymous)
        else {
            return Err(LoginError::NotInProgress);
        };

        let Some(token) = token else {
            warn!(username = %username, "login failed on both services");
            self.clear_slots()?;
            return Err(LoginError::InvalidCredentials);
        };

        let session = Session {
            role: Role::expected_for(&username),
            username,
            token,
        };
        self.persist(&session)?;
        info!(username = %session.username, role = %session.role, "signed in");
        self.state = AuthState::Authenticated(session.clone());
        Ok(session)
    }

    /// Clear the persisted slots and drop the session.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.state = AuthState::Anonymous;
        self.clear_slots()?;
        info!("signed out");
        Ok(())
    }

    /// React to a rejected token the same way as an explicit logout.
    pub fn invalidate(&mut self) -> Result<(), StorageError> {
        warn!("session rejected by backend");
        self.logout()
    }

    fn attempt<T: Transport>(
        &self,
        transport: &T,
        provider: LoginProvider,
        credentials: &LoginRequest,
    ) -> Result<String, ApiError> {
        let client = match provider {
            LoginProvider::EmployeeService => &self.employee_auth,
            LoginProvider::PayrollService => &self.payroll_auth,
        };
        let request = client.build_login(credentials)?;
        let response = transport.execute(request)?;
        Ok(client.parse_login(response)?.token)
    }

    fn persist(&mut self, session: &Session) -> Result<(), StorageError> {
        let user = serde_json::to_string(&StoredUser {
            username: session.username.clone(),
            role: session.role,
        })
        .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        self.storage.set(TOKEN_SLOT, &session.token)?;
        if let Err(e) = self.storage.set(USER_SLOT, &user) {
            // A token slot without its user slot must not outlive this call.
            if let Err(cleanup) = self.storage.remove(TOKEN_SLOT) {
                warn!(error = %cleanup, "could not remove orphaned token slot");
            }
            return Err(e);
        }
        Ok(())
    }

    fn clear_slots(&mut self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_SLOT)?;
        self.storage.remove(USER_SLOT)
    }
}
