//! Route modules for the API server
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON endpoints and form submissions
//! - page.rs: HTML page rendering

pub mod input;
pub mod listing;
pub mod summary;

use std::collections::HashMap;

use crate::ApiError;

/// Parse an optional query parameter, rejecting values that are present but malformed
pub(crate) fn parse_param<T: std::str::FromStr>(
    params: &HashMap<String, String>,
    name: &str,
) -> Result<Option<T>, ApiError> {
    match params.get(name).map(String::as_str) {
        None | Some("") => Ok(None),
        Some(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("invalid {}: {}", name, text))),
    }
}
