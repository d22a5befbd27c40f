//! Input validation utilities
//!
//! Validators return the first failing message; handlers surface it as a
//! 400 response.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::models::{ContactInfo, PricingItem};

/// Validate a person's name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.len() < 2 {
        return Err("Name must be at least 2 characters".to_string());
    }

    if name.len() > 100 {
        return Err("Name is too long".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Please enter a valid email".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate an exercise or class title
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }

    if title.len() > 200 {
        return Err("Title is too long".to_string());
    }

    Ok(())
}

/// Validate free-form notes or descriptions
pub fn validate_long_text(text: &str, what: &str) -> Result<(), String> {
    if text.len() > 2000 {
        return Err(format!("{} is too long", what));
    }

    Ok(())
}

/// Validate a URL field (audio, video, photo)
pub fn validate_url(url: &str, what: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err(format!("{} is required", what));
    }

    if url.len() > 500 {
        return Err(format!("{} is too long", what));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(format!("Invalid {}", what.to_lowercase()));
    }

    Ok(())
}

/// Validate that a class interval is well ordered. Equal bounds are
/// rejected; a class must have positive duration.
pub fn validate_class_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), String> {
    if end <= start {
        return Err("End time must be after start time".to_string());
    }

    Ok(())
}

/// Resolve the effective interval of a partial class update and check its
/// ordering. Bounds not supplied fall back to the persisted values, so
/// updating one end cannot silently invert the interval.
pub fn effective_class_interval(
    existing: (DateTime<Utc>, DateTime<Utc>),
    new_start: Option<DateTime<Utc>>,
    new_end: Option<DateTime<Utc>>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), String> {
    let start = new_start.unwrap_or(existing.0);
    let end = new_end.unwrap_or(existing.1);

    validate_class_interval(start, end)?;

    Ok((start, end))
}

/// True when `found` covers every distinct id in the request. Duplicate
/// ids collapse before the comparison, so a request repeating a valid id
/// is not mistaken for one referencing a missing row.
pub fn all_ids_found(ids: &[Uuid], found: i64) -> bool {
    let distinct: HashSet<Uuid> = ids.iter().copied().collect();
    found == distinct.len() as i64
}

/// Validate the public pricing list
pub fn validate_pricing(pricing: &[PricingItem]) -> Result<(), String> {
    for item in pricing {
        if item.name.is_empty() {
            return Err("Name is required".to_string());
        }
        if item.name.len() > 100 {
            return Err("Name is too long".to_string());
        }
        if item.price.is_empty() {
            return Err("Price is required".to_string());
        }
        if item.price.len() > 50 {
            return Err("Price is too long".to_string());
        }
        if let Some(description) = &item.description {
            if description.len() > 500 {
                return Err("Description is too long".to_string());
            }
        }
    }

    Ok(())
}

/// Validate public contact information
pub fn validate_contact_info(contact: &ContactInfo) -> Result<(), String> {
    if let Some(email) = &contact.email {
        if !email.is_empty() {
            validate_email(email)?;
        }
    }
    if let Some(phone) = &contact.phone {
        if phone.len() > 50 {
            return Err("Phone is too long".to_string());
        }
    }
    if let Some(location) = &contact.location {
        if location.len() > 200 {
            return Err("Location is too long".to_string());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_bounds() {
        assert!(validate_name("Jo").is_ok());
        assert!(validate_name("J").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn email_format() {
        assert!(validate_email("student@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn password_length() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn title_bounds() {
        assert!(validate_title("Major scales").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(201)).is_err());
    }

    #[test]
    fn url_scheme_required() {
        assert!(validate_url("https://blob.example.com/a.mp3", "Audio URL").is_ok());
        assert!(validate_url("ftp://blob/a.mp3", "Audio URL").is_err());
        assert!(validate_url("", "Audio URL").is_err());
    }

    #[test]
    fn inverted_interval_is_rejected() {
        let start = Utc::now();
        let end = start - chrono::Duration::hours(1);

        assert_eq!(
            validate_class_interval(start, end).unwrap_err(),
            "End time must be after start time"
        );
    }

    #[test]
    fn zero_length_interval_is_rejected() {
        let start = Utc::now();
        assert!(validate_class_interval(start, start).is_err());
        assert!(validate_class_interval(start, start + chrono::Duration::minutes(30)).is_ok());
    }

    #[test]
    fn partial_update_cannot_invert_the_interval() {
        let start = Utc::now();
        let end = start + chrono::Duration::hours(1);

        // Supplying only an end time before the persisted start fails.
        let result =
            effective_class_interval((start, end), None, Some(start - chrono::Duration::hours(1)));
        assert_eq!(result.unwrap_err(), "End time must be after start time");

        // Supplying only a start time past the persisted end fails.
        let result =
            effective_class_interval((start, end), Some(end + chrono::Duration::hours(1)), None);
        assert!(result.is_err());

        // Omitted bounds fall back to the persisted values.
        let (effective_start, effective_end) =
            effective_class_interval((start, end), None, None).unwrap();
        assert_eq!(effective_start, start);
        assert_eq!(effective_end, end);

        // Moving both bounds together is fine.
        let shifted_start = start + chrono::Duration::days(1);
        let shifted_end = end + chrono::Duration::days(1);
        let (effective_start, effective_end) =
            effective_class_interval((start, end), Some(shifted_start), Some(shifted_end))
                .unwrap();
        assert_eq!(effective_start, shifted_start);
        assert_eq!(effective_end, shifted_end);
    }

    #[test]
    fn duplicate_ids_collapse_before_the_existence_check() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();

        // Two distinct ids, both found.
        assert!(all_ids_found(&[id, other], 2));
        // A repeated valid id still counts as one.
        assert!(all_ids_found(&[id, id, other], 2));
        // One of the ids does not exist.
        assert!(!all_ids_found(&[id, other], 1));
        assert!(all_ids_found(&[], 0));
    }

    #[test]
    fn pricing_first_error_wins() {
        let items = vec![
            PricingItem {
                name: "30 min".to_string(),
                price: "25".to_string(),
                description: None,
            },
            PricingItem {
                name: "60 min".to_string(),
                price: "".to_string(),
                description: None,
            },
        ];
        assert_eq!(validate_pricing(&items).unwrap_err(), "Price is required");
    }

    #[test]
    fn contact_info_allows_empty_email() {
        let contact = ContactInfo {
            email: Some("".to_string()),
            phone: None,
            location: None,
        };
        assert!(validate_contact_info(&contact).is_ok());

        let invalid = ContactInfo {
            email: Some("nope".to_string()),
            phone: None,
            location: None,
        };
        assert!(validate_contact_info(&invalid).is_err());
    }
}
