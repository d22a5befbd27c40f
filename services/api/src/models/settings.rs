//! Site settings models
//!
//! The settings table holds exactly one row, created lazily on first access.
//! Pricing and contact info are stored as JSONB and validated as the typed
//! shapes below before writing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the public pricing list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingItem {
    pub name: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Public contact information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// The settings singleton as stored
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub id: i16,
    pub teacher_name: Option<String>,
    pub teacher_bio: Option<String>,
    pub teacher_photo: Option<String>,
    pub pricing: Option<serde_json::Value>,
    pub contact_info: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial settings update. An empty teacherPhoto clears the field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub teacher_name: Option<String>,
    pub teacher_bio: Option<String>,
    pub teacher_photo: Option<String>,
    pub pricing: Option<Vec<PricingItem>>,
    pub contact_info: Option<ContactInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_body_uses_camel_case() {
        let settings = SiteSettings {
            id: 1,
            teacher_name: Some("Ana".to_string()),
            teacher_bio: None,
            teacher_photo: None,
            pricing: None,
            contact_info: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&settings).unwrap();
        assert!(value.get("teacherName").is_some());
        assert!(value.get("contactInfo").is_some());
        assert!(value.get("teacher_name").is_none());
    }

    #[test]
    fn update_request_parses_pricing_items() {
        let body = r#"{
            "pricing": [
                {"name": "30 min", "price": "25", "description": "single lesson"},
                {"name": "60 min", "price": "45"}
            ],
            "contactInfo": {"email": "ana@example.com"}
        }"#;
        let request: UpdateSettingsRequest = serde_json::from_str(body).unwrap();
        let pricing = request.pricing.unwrap();
        assert_eq!(pricing.len(), 2);
        assert!(pricing[1].description.is_none());
        assert_eq!(
            request.contact_info.unwrap().email.as_deref(),
            Some("ana@example.com")
        );
    }
}
