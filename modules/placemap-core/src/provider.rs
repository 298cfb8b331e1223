// Trait seam for the venue-data provider.
//
// The session never talks HTTP. Production wires in `VenueClient`; tests use
// `testing::MockProvider`. All methods convert the wire shapes into domain
// types and the client's errors into `PlaceMapError`.

use async_trait::async_trait;

use placemap_common::{
    Category, CategoryRef, GeoPoint, ImageUrl, OpenHours, OpenSpan, Photo, Place, PlaceMapError,
    Result, Timeframe,
};
use venue_client::{Venue, VenueCategory, VenueClient, VenueError, VenueHours, VenuePhoto};

#[async_trait]
pub trait VenueProvider: Send + Sync {
    /// The full category forest.
    async fn fetch_categories(&self) -> Result<Vec<Category>>;

    /// Places around a neighborhood center, with leaf category tags only.
    async fn fetch_places(&self, center: GeoPoint) -> Result<Vec<Place>>;

    async fn fetch_photos(&self, place_id: &str) -> Result<Vec<Photo>>;

    async fn fetch_hours(&self, place_id: &str) -> Result<OpenHours>;
}

#[async_trait]
impl VenueProvider for VenueClient {
    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        let categories = self.categories().await.map_err(provider_error)?;
        Ok(categories.into_iter().map(category_from_wire).collect())
    }

    async fn fetch_places(&self, center: GeoPoint) -> Result<Vec<Place>> {
        let venues = self
            .search_venues(center.lat, center.lng)
            .await
            .map_err(provider_error)?;
        Ok(venues.into_iter().map(place_from_wire).collect())
    }

    async fn fetch_photos(&self, place_id: &str) -> Result<Vec<Photo>> {
        let photos = self.photos(place_id).await.map_err(provider_error)?;
        Ok(photos_from_wire(photos))
    }

    async fn fetch_hours(&self, place_id: &str) -> Result<OpenHours> {
        let hours = self.hours(place_id).await.map_err(provider_error)?;
        Ok(hours_from_wire(hours))
    }
}

pub fn provider_error(err: VenueError) -> PlaceMapError {
    match err {
        VenueError::Api {
            code,
            error_type,
            error_detail,
        } => PlaceMapError::ProviderRejected {
            code,
            error_type,
            detail: error_detail,
        },
        other => PlaceMapError::ProviderUnavailable(other.to_string()),
    }
}

fn category_from_wire(wire: VenueCategory) -> Category {
    Category {
        id: wire.id,
        name: wire.name,
        plural_name: wire.plural_name,
        icon: wire.icon.map(|icon| ImageUrl {
            prefix: icon.prefix,
            suffix: icon.suffix,
        }),
        children: wire.categories.into_iter().map(category_from_wire).collect(),
    }
}

fn place_from_wire(venue: Venue) -> Place {
    Place {
        id: venue.id,
        name: venue.name,
        location: GeoPoint::new(venue.location.lat, venue.location.lng),
        address_lines: venue.location.formatted_address,
        leaf_categories: venue
            .categories
            .into_iter()
            .map(|c| CategoryRef {
                id: c.id,
                name: c.name,
                plural_name: c.plural_name,
            })
            .collect(),
        resolved_categories: Vec::new(),
        hours: OpenHours::Unavailable,
        photos: Vec::new(),
    }
}

fn photos_from_wire(photos: Vec<VenuePhoto>) -> Vec<Photo> {
    photos
        .into_iter()
        .enumerate()
        .map(|(position, p)| Photo {
            url: ImageUrl {
                prefix: p.prefix,
                suffix: p.suffix,
            },
            position,
        })
        .collect()
}

/// A missing `timeframes` field means no hours; it is not treated as malformed.
fn hours_from_wire(hours: VenueHours) -> OpenHours {
    match hours.timeframes {
        None => OpenHours::Unavailable,
        Some(frames) => OpenHours::Schedule(
            frames
                .into_iter()
                .map(|f| Timeframe {
                    days: f.days.unwrap_or_default(),
                    open: f
                        .open
                        .into_iter()
                        .map(|o| OpenSpan {
                            start: o.start,
                            end: o.end,
                        })
                        .collect(),
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use venue_client::parse_response;

    #[test]
    fn api_errors_become_rejections() {
        let err = provider_error(VenueError::Api {
            code: 429,
            error_type: "rate_limit_exceeded".into(),
            error_detail: "Quota exceeded".into(),
        });
        assert!(matches!(err, PlaceMapError::ProviderRejected { code: 429, .. }));
    }

    #[test]
    fn transport_errors_become_unavailable() {
        let err = provider_error(VenueError::Network("dns".into()));
        assert!(matches!(err, PlaceMapError::ProviderUnavailable(_)));
        let err = provider_error(VenueError::Parse("eof".into()));
        assert!(matches!(err, PlaceMapError::ProviderUnavailable(_)));
    }

    #[test]
    fn nested_wire_categories_convert_recursively() {
        let body = r#"{"meta": {"code": 200}, "response": {"categories": [
            {"id": "food", "name": "Food", "pluralName": "Food",
             "icon": {"prefix": "https://ss3/food_", "suffix": ".png"},
             "categories": [{"id": "asian", "name": "Asian", "pluralName": "Asians",
                "categories": [{"id": "sushi", "name": "Sushi", "pluralName": "Sushis"}]}]}
        ]}}"#;
        let wire: Vec<VenueCategory> = parse_response(200, body, "categories").unwrap();
        let food = category_from_wire(wire.into_iter().next().unwrap());
        assert_eq!(food.children[0].children[0].id, "sushi");
        assert_eq!(food.header_icon_url(), "https://ss3/food_44.png");
    }

    #[test]
    fn venue_converts_to_unresolved_place() {
        let body = r#"{"meta": {"code": 200}, "response": {"venues": [{
            "id": "v1", "name": "Pizzeria Roma",
            "location": {"lat": 1.5, "lng": 2.5, "formattedAddress": ["1 Main St"]},
            "categories": [{"id": "pizza", "name": "Pizza Place", "pluralName": "Pizza Places"}]
        }]}}"#;
        let wire: Vec<Venue> = parse_response(200, body, "venues").unwrap();
        let place = place_from_wire(wire.into_iter().next().unwrap());
        assert_eq!(place.location, GeoPoint::new(1.5, 2.5));
        assert_eq!(place.leaf_category_ids().collect::<Vec<_>>(), vec!["pizza"]);
        assert!(place.resolved_categories.is_empty());
    }

    #[test]
    fn photos_keep_their_position() {
        let body = r#"{"meta": {"code": 200}, "response": {"photos": {"count": 2, "items": [
            {"prefix": "https://a/", "suffix": "/1.jpg"},
            {"prefix": "https://a/", "suffix": "/2.jpg"}
        ]}}}"#;
        let list: venue_client::PhotoList = parse_response(200, body, "photos").unwrap();
        let photos = photos_from_wire(list.items);
        assert_eq!(photos[1].position, 1);
        assert_eq!(photos[1].thumbnail_url(), "https://a/100x100/2.jpg");
    }

    #[test]
    fn hours_are_permissive() {
        assert_eq!(hours_from_wire(VenueHours::default()), OpenHours::Unavailable);

        let body = r#"{"meta": {"code": 200}, "response": {"hours": {"timeframes": [
            {"days": [1, 2, 3, 4, 5], "open": [{"start": "0800", "end": "1700"}]},
            {"open": []}
        ]}}}"#;
        let wire: VenueHours = parse_response(200, body, "hours").unwrap();
        let hours = hours_from_wire(wire);
        let frames = hours.timeframes();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].hours_label(), "08 h 00 - 17 h 00");
        assert!(frames[1].days.is_empty());

        let empty: VenueHours =
            parse_response(200, r#"{"meta": {"code": 200}, "response": {"hours": {"timeframes": []}}}"#, "hours")
                .unwrap();
        assert_eq!(hours_from_wire(empty), OpenHours::Schedule(vec![]));
    }
}
