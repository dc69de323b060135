use std::sync::Arc;

use tutorial_auth::AccessGate;
use tutorial_store::Store;

use crate::config::ApiConfig;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
  pub gate: AccessGate,
  pub config: Arc<ApiConfig>,
}

impl AppState {
  pub fn new(store: Arc<dyn Store>, gate: AccessGate, config: ApiConfig) -> Self {
    Self {
      store,
      gate,
      config: Arc::new(config),
    }
  }
}
