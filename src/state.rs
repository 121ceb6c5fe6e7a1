//! Shared application state for the HTTP layer

use crate::config::Settings;
use crate::database::{DatabasePool, DatabaseService};
use crate::services::ServiceFactory;

#[derive(Clone)]
pub struct AppState {
    pub pool: DatabasePool,
    pub db: DatabaseService,
    pub services: ServiceFactory,
    pub settings: Settings,
}

impl AppState {
    pub fn new(
        pool: DatabasePool,
        db: DatabaseService,
        services: ServiceFactory,
        settings: Settings,
    ) -> Self {
        Self {
            pool,
            db,
            services,
            settings,
        }
    }
}
