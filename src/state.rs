use std::sync::Arc;

use crate::{
    clients::{EmailDispatcher, IdentityClient},
    config::AppConfig,
    repository::Store,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub identity: Arc<dyn IdentityClient>,
    pub mailer: Arc<dyn EmailDispatcher>,
}
