pub mod error;
pub mod types;

pub use error::{Result, VenueError};
pub use types::{
    ApiEnvelope, Icon, PhotoList, Venue, VenueCategory, VenueHours, VenueLocation, VenueOpen,
    VenuePhoto, VenueTimeframe,
};

use serde::de::DeserializeOwned;

const BASE_URL: &str = "https://api.foursquare.com/v2";

/// API version date pinned for every request.
const API_VERSION: &str = "20140806";

/// Response mode, keeps the legacy foursquare payload shape.
const MODE: &str = "foursquare";

pub struct VenueClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    version: String,
}

impl VenueClient {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            client_id,
            client_secret,
            version: API_VERSION.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Fetch the full category hierarchy.
    pub async fn categories(&self) -> Result<Vec<VenueCategory>> {
        let categories: Vec<VenueCategory> = self.get("venues/categories", "categories", &[]).await?;
        tracing::debug!(count = categories.len(), "Fetched top-level categories");
        Ok(categories)
    }

    /// Search venues around a coordinate.
    pub async fn search_venues(&self, lat: f64, lng: f64) -> Result<Vec<Venue>> {
        let ll = format!("{lat},{lng}");
        let venues: Vec<Venue> = self.get("venues/search", "venues", &[("ll", ll)]).await?;
        tracing::info!(lat, lng, count = venues.len(), "Fetched venues");
        Ok(venues)
    }

    pub async fn photos(&self, venue_id: &str) -> Result<Vec<VenuePhoto>> {
        let path = format!("venues/{venue_id}/photos");
        let list: PhotoList = self.get(&path, "photos", &[]).await?;
        Ok(list.items)
    }

    pub async fn hours(&self, venue_id: &str) -> Result<VenueHours> {
        let path = format!("venues/{venue_id}/hours");
        self.get(&path, "hours", &[]).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &str,
        extra: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let mut query: Vec<(&str, String)> = vec![
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("v", self.version.clone()),
            ("m", MODE.to_string()),
        ];
        query.extend(extra.iter().cloned());

        let resp = self.client.get(&url).query(&query).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;

        parse_response(status, &body, resource)
    }
}

/// Unwrap `response[resource]` from a raw body, mapping a non-200 `meta.code`
/// to [`VenueError::Api`].
pub fn parse_response<T: DeserializeOwned>(status: u16, body: &str, resource: &str) -> Result<T> {
    let envelope: ApiEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !(200..300).contains(&status) => {
            return Err(VenueError::Api {
                code: status,
                error_type: "http_error".to_string(),
                error_detail: body.to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    if envelope.meta.code != 200 {
        return Err(VenueError::Api {
            code: envelope.meta.code,
            error_type: envelope.meta.error_type.unwrap_or_default(),
            error_detail: envelope.meta.error_detail.unwrap_or_default(),
        });
    }

    let value = envelope
        .response
        .get(resource)
        .cloned()
        .ok_or_else(|| VenueError::MissingResource(resource.to_string()))?;

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_named_resource() {
        let body = r#"{
            "meta": {"code": 200},
            "response": {"venues": [{
                "id": "v1",
                "name": "Pizzeria Roma",
                "location": {"lat": 37.4, "lng": -122.1, "formattedAddress": ["1 Main St", "Mountain View"]},
                "categories": [{"id": "pizza", "name": "Pizza Place", "pluralName": "Pizza Places"}]
            }]}
        }"#;
        let venues: Vec<Venue> = parse_response(200, body, "venues").unwrap();
        assert_eq!(venues.len(), 1);
        assert_eq!(venues[0].location.formatted_address.len(), 2);
        assert_eq!(venues[0].categories[0].id, "pizza");
    }

    #[test]
    fn non_200_meta_is_api_error() {
        let body = r#"{"meta": {"code": 400, "errorType": "param_error", "errorDetail": "Must provide ll"}, "response": {}}"#;
        let err = parse_response::<Vec<Venue>>(400, body, "venues").unwrap_err();
        match err {
            VenueError::Api { code, error_type, error_detail } => {
                assert_eq!(code, 400);
                assert_eq!(error_type, "param_error");
                assert_eq!(error_detail, "Must provide ll");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn non_json_failure_body_keeps_http_status() {
        let err = parse_response::<Vec<Venue>>(503, "<html>down</html>", "venues").unwrap_err();
        assert!(matches!(err, VenueError::Api { code: 503, .. }));
    }

    #[test]
    fn garbage_with_ok_status_is_parse_error() {
        let err = parse_response::<Vec<Venue>>(200, "not json", "venues").unwrap_err();
        assert!(matches!(err, VenueError::Parse(_)));
    }

    #[test]
    fn hours_without_timeframes_is_empty() {
        let body = r#"{"meta": {"code": 200}, "response": {"hours": {}}}"#;
        let hours: VenueHours = parse_response(200, body, "hours").unwrap();
        assert!(hours.timeframes.is_none());
    }

    #[test]
    fn nested_categories_parse() {
        let body = r#"{"meta": {"code": 200}, "response": {"categories": [
            {"id": "food", "name": "Food", "pluralName": "Food", "categories": [
                {"id": "asian", "name": "Asian Restaurant", "pluralName": "Asian Restaurants", "categories": [
                    {"id": "sushi", "name": "Sushi Restaurant", "pluralName": "Sushi Restaurants"}
                ]}
            ]}
        ]}}"#;
        let categories: Vec<VenueCategory> = parse_response(200, body, "categories").unwrap();
        assert_eq!(categories[0].categories[0].categories[0].id, "sushi");
    }
}
