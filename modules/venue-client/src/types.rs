use serde::{Deserialize, Serialize};

// --- Response envelope ---

/// Every endpoint answers `{ meta, response: { <resource>: ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub meta: Meta,
    #[serde(default)]
    pub response: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub code: u16,
    #[serde(rename = "errorType")]
    pub error_type: Option<String>,
    #[serde(rename = "errorDetail")]
    pub error_detail: Option<String>,
}

// --- Categories ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Icon {
    pub prefix: String,
    pub suffix: String,
}

/// A node of the venue category hierarchy. Sub-categories are nested under
/// `categories`; venues carry the same shape without children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueCategory {
    pub id: String,
    pub name: String,
    #[serde(rename = "pluralName", default)]
    pub plural_name: String,
    #[serde(rename = "shortName")]
    pub short_name: Option<String>,
    pub icon: Option<Icon>,
    #[serde(default)]
    pub categories: Vec<VenueCategory>,
}

// --- Venues ---

#[derive(Debug, Clone, Deserialize)]
pub struct VenueLocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "formattedAddress", default)]
    pub formatted_address: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub location: VenueLocation,
    #[serde(default)]
    pub categories: Vec<VenueCategory>,
}

// --- Photos ---

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoList {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub items: Vec<VenuePhoto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenuePhoto {
    pub id: Option<String>,
    pub prefix: String,
    pub suffix: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

// --- Hours ---

/// Hours resource. `timeframes` is absent when the venue publishes no hours.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VenueHours {
    pub timeframes: Option<Vec<VenueTimeframe>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueTimeframe {
    pub days: Option<Vec<u8>>,
    #[serde(rename = "includesToday")]
    pub includes_today: Option<bool>,
    #[serde(default)]
    pub open: Vec<VenueOpen>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueOpen {
    pub start: String,
    pub end: String,
}
