//! Payloads exchanged with the pet store.
//!
//! One canonical schema per entity: identifiers are assigned by the server
//! and therefore optional, the naming field of each entity (`name`,
//! `username`, `petId`) is required, and everything else is optional.
//! Optional fields that are unset are omitted from the serialised JSON.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    /// Listed for sale.
    Available,
    /// Sale in progress.
    Pending,
    /// Sold.
    Sold,
}

impl PetStatus {
    /// All statuses accepted by `findByStatus`.
    pub const ALL: [Self; 3] = [Self::Available, Self::Pending, Self::Sold];

    /// Wire value of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Pending => "pending",
            Self::Sold => "sold",
        }
    }
}

/// Lifecycle status of a store order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order received.
    Placed,
    /// Order approved.
    Approved,
    /// Order delivered.
    Delivered,
}

impl OrderStatus {
    /// Wire value of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Approved => "approved",
            Self::Delivered => "delivered",
        }
    }
}

/// Parse error for [`PetStatus`] and [`OrderStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported {kind} status '{value}'")]
pub struct StatusParseError {
    kind: &'static str,
    value: String,
}

impl FromStr for PetStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "pending" => Ok(Self::Pending),
            "sold" => Ok(Self::Sold),
            _ => Err(StatusParseError {
                kind: "pet",
                value: value.to_owned(),
            }),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "placed" => Ok(Self::Placed),
            "approved" => Ok(Self::Approved),
            "delivered" => Ok(Self::Delivered),
            _ => Err(StatusParseError {
                kind: "order",
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Pet category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Category name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Free-form pet tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Tag name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A pet listed in the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Category the pet belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Display name.
    pub name: String,
    /// Photo URLs.
    #[serde(default)]
    pub photo_urls: Vec<String>,
    /// Tags attached to the pet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    /// Lifecycle status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PetStatus>,
}

impl Pet {
    /// Builds a pet with a name and status and no other fields.
    #[must_use]
    pub fn named(name: impl Into<String>, status: PetStatus) -> Self {
        Self {
            name: name.into(),
            status: Some(status),
            ..Self::default()
        }
    }

    /// Sets the photo URLs.
    #[must_use]
    pub fn with_photo_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.photo_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the client-chosen identifier.
    #[must_use]
    pub const fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// An order placed with the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Pet being ordered.
    pub pet_id: i64,
    /// Number of pets ordered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    /// Shipping date, ISO-8601.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_date: Option<String>,
    /// Lifecycle status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    /// Whether the order is complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

/// A registered store user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Unique login name.
    pub username: String,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Password (sent in clear; the demo service does not care).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Account status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_status: Option<i32>,
}

/// Acknowledgement body returned by create, delete, login and logout calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Echoed status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Message category.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Free-text message, e.g. `logged in user session:...`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Store inventory: status name to count.
pub type Inventory = BTreeMap<String, i64>;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{ApiMessage, Order, OrderStatus, Pet, PetStatus, User};

    #[test]
    fn pet_serialises_camel_case_and_omits_unset_fields() {
        let pet = Pet::named("Doggo_1", PetStatus::Available)
            .with_photo_urls(["https://example.com/photo1.jpg"]);

        let value = serde_json::to_value(&pet).expect("pet should serialise");

        assert_eq!(
            value,
            json!({
                "name": "Doggo_1",
                "photoUrls": ["https://example.com/photo1.jpg"],
                "status": "available"
            })
        );
    }

    #[test]
    fn order_round_trips_optional_fields() {
        let order = Order {
            pet_id: 9,
            quantity: Some(1),
            status: Some(OrderStatus::Placed),
            complete: Some(false),
            ..Order::default()
        };

        let value = serde_json::to_value(&order).expect("order should serialise");
        assert_eq!(
            value,
            json!({"petId": 9, "quantity": 1, "status": "placed", "complete": false})
        );
    }

    #[test]
    fn user_tolerates_missing_optional_fields() {
        let user: User = serde_json::from_value(json!({"id": 3, "username": "jane"}))
            .expect("sparse user should decode");

        assert_eq!(user.username, "jane");
        assert!(user.email.is_none());
    }

    #[test]
    fn api_message_maps_type_field() {
        let message: ApiMessage =
            serde_json::from_value(json!({"code": 200, "type": "unknown", "message": "ok"}))
                .expect("message should decode");

        assert_eq!(message.kind.as_deref(), Some("unknown"));
        assert_eq!(message.message.as_deref(), Some("ok"));
    }

    #[rstest]
    #[case("available", PetStatus::Available)]
    #[case(" Pending ", PetStatus::Pending)]
    #[case("SOLD", PetStatus::Sold)]
    fn pet_status_parses_case_insensitively(#[case] raw: &str, #[case] expected: PetStatus) {
        assert_eq!(raw.parse::<PetStatus>(), Ok(expected));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let error = "lost"
            .parse::<PetStatus>()
            .expect_err("unknown status should fail");
        assert_eq!(error.to_string(), "unsupported pet status 'lost'");
    }
}
