use std::sync::Arc;

use crate::config::AppConfig;
use crate::mailer::Mailer;
use crate::store::ContentStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub mailer: Arc<dyn Mailer>,
    pub config: AppConfig,
}
