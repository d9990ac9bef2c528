use tracing::debug;

use crate::error::LoginError;
use crate::http::Transport;
use crate::session::SessionManager;
use crate::storage::Storage;
use crate::types::LoginRequest;
use crate::views::{route, Screen};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";
pub const MISSING_FIELDS: &str = "Username and password are required";

#[derive(Debug, Default, Clone)]
pub struct LoginView {
    pub username: String,
    pub password: String,
    loading: bool,
    error: Option<String>,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn button_label(&self) -> &'static str {
        if self.loading {
            "Signing In..."
        } else {
            "Sign In"
        }
    }

    /// Run the smart login. On success returns the dashboard to show.
    pub fn submit<S: Storage, T: Transport>(
        &mut self,
        sessions: &mut SessionManager<S>,
        transport: &T,
    ) -> Option<Screen> {
        self.error = None;
        self.loading = true;
        let credentials = LoginRequest::new(self.username.clone(), self.password.clone());
        let result = sessions.login(transport, &credentials);
        self.loading = false;

        match result {
            Ok(session) => {
                self.password.clear();
                Some(route(Some(&session)))
            }
            Err(LoginError::MissingFields) => {
                self.error = Some(MISSING_FIELDS.to_string());
                None
            }
            Err(e) => {
                debug!(error = %e, "login rejected");
                self.error = Some(INVALID_CREDENTIALS.to_string());
                None
            }
        }
    }
}
