//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod event;
pub mod registration;

// Re-export commonly used models
pub use event::{CreateEventRequest, Event, EventSummary, UpdateEventRequest};
pub use registration::{
    CreateRegistrationRequest, EmergencyContact, ExperienceCount, ExperienceLevel,
    NewRegistration, Pagination, PaymentStatus, Registration, RegistrationFilter,
    RegistrationPage, RegistrationWithEvent, StatsFilter, StatusCounts,
};
