//! Customer addresses and the form draft used to create or edit them.
//!
//! The backend owns addresses; the storefront validates a draft before it
//! is ever submitted. Whether at most one address is primary is the
//! backend's business, the client only displays the flag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::id::AddressId;
use super::postal_code::PostalCode;

/// Default country for new addresses.
pub const DEFAULT_COUNTRY: &str = "India";

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

/// Kind of address, shown as a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    #[default]
    Home,
    Work,
}

/// A saved address as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "_id")]
    pub id: AddressId,
    pub title: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    #[serde(default)]
    pub address_type: AddressType,
    #[serde(default)]
    pub is_primary: bool,
}

impl Address {
    /// Address lines for display, skipping empty optional parts.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.address_line1.clone()];
        if let Some(line2) = self.address_line2.as_deref().filter(|l| !l.is_empty()) {
            lines.push(line2.to_string());
        }
        if let Some(landmark) = self.landmark.as_deref().filter(|l| !l.is_empty()) {
            lines.push(format!("Near {landmark}"));
        }
        lines.push(format!("{}, {} {}", self.city, self.state, self.postal_code));
        lines.push(self.country.clone());
        lines
    }

    /// Prefill an edit form with this address.
    #[must_use]
    pub fn to_draft(&self) -> AddressDraft {
        AddressDraft {
            title: self.title.clone(),
            address_line1: self.address_line1.clone(),
            address_line2: self.address_line2.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
            landmark: self.landmark.clone(),
            address_type: self.address_type,
            is_primary: self.is_primary,
        }
    }
}

/// Form fields that carry validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddressField {
    Title,
    AddressLine1,
    City,
    State,
    PostalCode,
}

impl AddressField {
    /// The backend/form key for this field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::AddressLine1 => "addressLine1",
            Self::City => "city",
            Self::State => "state",
            Self::PostalCode => "postalCode",
        }
    }
}

/// Field-level validation messages for an address form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressErrors(BTreeMap<AddressField, String>);

impl AddressErrors {
    /// Returns `true` if no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for one field, if it failed.
    #[must_use]
    pub fn get(&self, field: AddressField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Iterate over failed fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = (AddressField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: AddressField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

impl std::fmt::Display for AddressErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, msg)| format!("{}: {msg}", field.as_str()))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Address form payload for create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    #[serde(default)]
    pub address_type: AddressType,
    #[serde(default)]
    pub is_primary: bool,
}

impl Default for AddressDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            address_line1: String::new(),
            address_line2: None,
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: default_country(),
            landmark: None,
            address_type: AddressType::default(),
            is_primary: false,
        }
    }
}

impl AddressDraft {
    /// Validate the draft before submission.
    ///
    /// `title`, `addressLine1`, `city` and `state` must be non-empty after
    /// trimming, and `postalCode` must be a valid six-digit code.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its message.
    pub fn validate(&self) -> Result<(), AddressErrors> {
        let mut errors = AddressErrors::default();

        let required = [
            (AddressField::Title, &self.title, "Title is required"),
            (
                AddressField::AddressLine1,
                &self.address_line1,
                "Address line 1 is required",
            ),
            (AddressField::City, &self.city, "City is required"),
            (AddressField::State, &self.state, "State is required"),
        ];
        for (field, value, message) in required {
            if value.trim().is_empty() {
                errors.insert(field, message);
            }
        }

        if !PostalCode::is_valid(self.postal_code.trim()) {
            errors.insert(
                AddressField::PostalCode,
                "Please enter a valid 6-digit postal code",
            );
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Copy of the draft with surrounding whitespace removed and empty
    /// optional fields dropped, as sent to the backend.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let trim_opt = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let country = self.country.trim();

        Self {
            title: self.title.trim().to_string(),
            address_line1: self.address_line1.trim().to_string(),
            address_line2: trim_opt(&self.address_line2),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: if country.is_empty() {
                default_country()
            } else {
                country.to_string()
            },
            landmark: trim_opt(&self.landmark),
            address_type: self.address_type,
            is_primary: self.is_primary,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_draft() -> AddressDraft {
        AddressDraft {
            title: "Home".to_string(),
            address_line1: "12 Carter Road".to_string(),
            city: "Mumbai".to_string(),
            state: "Maharashtra".to_string(),
            postal_code: "400050".to_string(),
            ..AddressDraft::default()
        }
    }

    #[test]
    fn test_valid_draft_has_no_errors() {
        assert!(valid_draft().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_are_keyed_by_name() {
        let draft = AddressDraft {
            title: "   ".to_string(),
            city: String::new(),
            ..valid_draft()
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.get(AddressField::Title).is_some());
        assert!(errors.get(AddressField::City).is_some());
        assert!(errors.get(AddressField::State).is_none());
    }

    #[test]
    fn test_invalid_postal_code_is_reported() {
        for bad in ["000001", "12345", "1234567", "abcdef"] {
            let draft = AddressDraft {
                postal_code: bad.to_string(),
                ..valid_draft()
            };
            let errors = draft.validate().unwrap_err();
            assert_eq!(errors.len(), 1, "{bad}");
            assert!(errors.get(AddressField::PostalCode).is_some());
        }
    }

    #[test]
    fn test_empty_draft_fails_every_required_field() {
        let errors = AddressDraft::default().validate().unwrap_err();
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_errors_serialize_by_form_key() {
        let draft = AddressDraft {
            address_line1: String::new(),
            ..valid_draft()
        };
        let errors = draft.validate().unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["addressLine1"], "Address line 1 is required");
    }

    #[test]
    fn test_normalized_trims_and_drops_empty_optionals() {
        let draft = AddressDraft {
            title: "  Work ".to_string(),
            address_line2: Some("  ".to_string()),
            landmark: Some(" Opp. Bandstand ".to_string()),
            country: String::new(),
            ..valid_draft()
        };
        let normalized = draft.normalized();
        assert_eq!(normalized.title, "Work");
        assert_eq!(normalized.address_line2, None);
        assert_eq!(normalized.landmark.as_deref(), Some("Opp. Bandstand"));
        assert_eq!(normalized.country, DEFAULT_COUNTRY);
    }

    #[test]
    fn test_address_wire_format() {
        let json = serde_json::json!({
            "_id": "65f1",
            "title": "Home",
            "addressLine1": "12 Carter Road",
            "city": "Mumbai",
            "state": "Maharashtra",
            "postalCode": "400050",
            "country": "India",
            "addressType": "work",
            "isPrimary": true
        });
        let address: Address = serde_json::from_value(json).unwrap();
        assert_eq!(address.id.as_str(), "65f1");
        assert_eq!(address.address_type, AddressType::Work);
        assert!(address.is_primary);
        assert_eq!(
            address.lines(),
            vec![
                "12 Carter Road".to_string(),
                "Mumbai, Maharashtra 400050".to_string(),
                "India".to_string()
            ]
        );
    }
}
