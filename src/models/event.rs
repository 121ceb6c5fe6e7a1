//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::{Result, SwingRegError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub year: i32,
    pub name: String,
    pub date: DateTime<Utc>,
    pub max_capacity: i32,
    pub is_active: bool,
    pub registration_open: bool,
    pub waiting_list_enabled: bool,
    pub price: f64,
    pub venue: String,
    pub address: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact event view embedded in registration listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventSummary {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub year: i32,
    pub name: String,
    pub date: DateTime<Utc>,
    pub max_capacity: i32,
    #[serde(default = "default_true")]
    pub registration_open: bool,
    #[serde(default = "default_true")]
    pub waiting_list_enabled: bool,
    pub price: f64,
    pub venue: String,
    pub address: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub year: Option<i32>,
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub max_capacity: Option<i32>,
    pub is_active: Option<bool>,
    pub registration_open: Option<bool>,
    pub waiting_list_enabled: Option<bool>,
    pub price: Option<f64>,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

impl CreateEventRequest {
    /// Validate field bounds before the record reaches the store
    pub fn validate(&self) -> Result<()> {
        validate_year(self.year)?;
        validate_name(&self.name)?;
        validate_capacity(self.max_capacity)?;
        validate_price(self.price)?;
        validate_venue(&self.venue)?;
        validate_address(&self.address)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

impl UpdateEventRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(year) = self.year {
            validate_year(year)?;
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(max_capacity) = self.max_capacity {
            validate_capacity(max_capacity)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(venue) = &self.venue {
            validate_venue(venue)?;
        }
        if let Some(address) = &self.address {
            validate_address(address)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }
}

fn validate_year(year: i32) -> Result<()> {
    if year < 2020 {
        return Err(SwingRegError::Validation(
            "Year must be 2020 or later".to_string(),
        ));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SwingRegError::Validation(
            "Event name is required".to_string(),
        ));
    }
    if name.chars().count() > 100 {
        return Err(SwingRegError::Validation(
            "Event name cannot exceed 100 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_capacity(max_capacity: i32) -> Result<()> {
    if max_capacity < 1 {
        return Err(SwingRegError::Validation(
            "Capacity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(SwingRegError::Validation(
            "Price cannot be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_venue(venue: &str) -> Result<()> {
    if venue.trim().is_empty() {
        return Err(SwingRegError::Validation("Venue is required".to_string()));
    }
    if venue.chars().count() > 200 {
        return Err(SwingRegError::Validation(
            "Venue cannot exceed 200 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_address(address: &str) -> Result<()> {
    if address.trim().is_empty() {
        return Err(SwingRegError::Validation("Address is required".to_string()));
    }
    if address.chars().count() > 200 {
        return Err(SwingRegError::Validation(
            "Address cannot exceed 200 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<()> {
    if description.chars().count() > 1000 {
        return Err(SwingRegError::Validation(
            "Description cannot exceed 1000 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_request() -> CreateEventRequest {
        CreateEventRequest {
            year: 2026,
            name: "Midsummer Swing".to_string(),
            date: Utc::now(),
            max_capacity: 80,
            registration_open: true,
            waiting_list_enabled: true,
            price: 15.0,
            venue: "Floor 33".to_string(),
            address: "Kalasatamankatu 9 A".to_string(),
            description: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_year_lower_bound() {
        let mut request = valid_request();
        request.year = 2019;
        assert_matches!(request.validate(), Err(SwingRegError::Validation(_)));
    }

    #[test]
    fn test_name_length_bound() {
        let mut request = valid_request();
        request.name = "x".repeat(101);
        assert_matches!(request.validate(), Err(SwingRegError::Validation(_)));
    }

    #[test]
    fn test_capacity_lower_bound() {
        let mut request = valid_request();
        request.max_capacity = 0;
        assert_matches!(request.validate(), Err(SwingRegError::Validation(_)));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut request = valid_request();
        request.price = -1.0;
        assert_matches!(request.validate(), Err(SwingRegError::Validation(_)));
    }

    #[test]
    fn test_description_length_bound() {
        let mut request = valid_request();
        request.description = Some("x".repeat(1001));
        assert_matches!(request.validate(), Err(SwingRegError::Validation(_)));

        request.description = Some("x".repeat(1000));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_partial_update_validates_only_present_fields() {
        let request = UpdateEventRequest {
            registration_open: Some(false),
            ..Default::default()
        };
        assert!(request.validate().is_ok());

        let request = UpdateEventRequest {
            year: Some(1999),
            ..Default::default()
        };
        assert_matches!(request.validate(), Err(SwingRegError::Validation(_)));
    }
}
