//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use regex::Regex;
use std::sync::OnceLock;

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,})+$").expect("valid email regex")
    });
    re.is_match(email)
}

/// Normalize an email address for storage and comparison
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Calculate pagination offset for a 1-based page number
pub fn calculate_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1) * page_size
}

/// Escape ILIKE wildcard characters in a user-supplied search string
pub fn escape_like_pattern(input: &str) -> String {
    input
        .replace('\\', r"\\")
        .replace('%', r"\%")
        .replace('_', r"\_")
}
