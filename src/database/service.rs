//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{DatabasePool, EventRepository, RegistrationRepository};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool),
        }
    }
}
