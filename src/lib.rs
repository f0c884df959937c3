pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod format;
pub mod llm;
pub mod session;
pub mod summariser;

use std::sync::{Arc, Mutex};
use config::Config;
use error::Result;
use session::Session;
use summariser::Summariser;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub summariser: Summariser,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let summariser = Summariser::from_config(config)?;
        Ok(Self {
            summariser,
            session: Arc::new(Mutex::new(Session::new())),
        })
    }
}
