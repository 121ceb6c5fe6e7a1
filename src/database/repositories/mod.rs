//! Repository implementations for database operations

pub mod event;
pub mod registration;

pub use event::EventRepository;
pub use registration::RegistrationRepository;
