use std::sync::Arc;

use anyhow::Result;
use rollcall_core::config::ServerConfig;
use rollcall_core::session::SessionCache;
use rollcall_core::store::CsvStore;
use rollcall_core::AttendanceService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    service: Arc<AttendanceService<CsvStore>>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let store = CsvStore::open(&config.data_dir)?;
        let service = AttendanceService::new(store, SessionCache::new())
            .with_session_ttl(config.session_ttl());

        Ok(Self::from_service(service))
    }

    pub fn from_service(service: AttendanceService<CsvStore>) -> Self {
        AppState {
            service: Arc::new(service),
        }
    }

    pub fn service(&self) -> Arc<AttendanceService<CsvStore>> {
        Arc::clone(&self.service)
    }
}
