use std::sync::Arc;

use warden_application::{AccountService, AuthorizationService, TokenManager};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub account_service: AccountService,
    pub token_manager: Arc<dyn TokenManager>,
}
