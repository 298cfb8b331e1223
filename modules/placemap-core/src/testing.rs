// Test mocks for the neighborhood session.
//
// - MockProvider (VenueProvider): builder-configured categories, place lists
//   per neighborhood center, per-place photos/hours, failures and delays
// - RecordingObserver (ViewObserver): keeps every published view event
//
// Plus helpers for constructing categories and places.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use placemap_common::{
    Category, CategoryRef, GeoPoint, OpenHours, Photo, Place, PlaceMapError, Result,
};

use crate::observer::{ViewEvent, ViewObserver};
use crate::provider::VenueProvider;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Food (Italian, Asian) and Nightlife (Bar).
pub fn sample_categories() -> Vec<Category> {
    vec![
        Category::new("food", "Food", "Food").with_children(vec![
            Category::new("italian", "Italian Restaurant", "Italian Restaurants"),
            Category::new("asian", "Asian Restaurant", "Asian Restaurants"),
        ]),
        Category::new("nightlife", "Nightlife Spot", "Nightlife Spots")
            .with_children(vec![Category::new("bar", "Bar", "Bars")]),
    ]
}

/// A place at the origin with the given `(id, name)` leaf categories.
pub fn place(id: &str, name: &str, leaves: &[(&str, &str)]) -> Place {
    Place {
        id: id.to_string(),
        name: name.to_string(),
        location: GeoPoint::new(0.0, 0.0),
        address_lines: vec![],
        leaf_categories: leaves
            .iter()
            .map(|(id, name)| CategoryRef {
                id: id.to_string(),
                name: name.to_string(),
                plural_name: format!("{name}s"),
            })
            .collect(),
        resolved_categories: vec![],
        hours: OpenHours::Unavailable,
        photos: vec![],
    }
}

fn center_key(center: GeoPoint) -> String {
    format!("{:.5},{:.5}", center.lat, center.lng)
}

// ---------------------------------------------------------------------------
// MockProvider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum PlacesFailure {
    Unavailable,
    Rejected,
}

/// Unregistered centers get the default place list (empty unless set with
/// `.with_places()`); unregistered places get no photos and unknown hours.
pub struct MockProvider {
    categories: Option<Vec<Category>>,
    default_places: Vec<Place>,
    places: HashMap<String, Vec<Place>>,
    places_failure: Option<PlacesFailure>,
    places_delays: HashMap<String, Duration>,
    photos: HashMap<String, Vec<Photo>>,
    hours: HashMap<String, OpenHours>,
    failing_enrichment: HashSet<String>,
    enrichment_delays: HashMap<String, Duration>,
    category_fetches: AtomicUsize,
    enrichment_requests: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            categories: Some(sample_categories()),
            default_places: Vec::new(),
            places: HashMap::new(),
            places_failure: None,
            places_delays: HashMap::new(),
            photos: HashMap::new(),
            hours: HashMap::new(),
            failing_enrichment: HashSet::new(),
            enrichment_delays: HashMap::new(),
            category_fetches: AtomicUsize::new(0),
            enrichment_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn fail_categories(mut self) -> Self {
        self.categories = None;
        self
    }

    pub fn with_places(mut self, places: Vec<Place>) -> Self {
        self.default_places = places;
        self
    }

    pub fn on_places(mut self, center: GeoPoint, places: Vec<Place>) -> Self {
        self.places.insert(center_key(center), places);
        self
    }

    pub fn delay_places(mut self, center: GeoPoint, delay: Duration) -> Self {
        self.places_delays.insert(center_key(center), delay);
        self
    }

    pub fn fail_places_unavailable(mut self) -> Self {
        self.places_failure = Some(PlacesFailure::Unavailable);
        self
    }

    pub fn fail_places_rejected(mut self) -> Self {
        self.places_failure = Some(PlacesFailure::Rejected);
        self
    }

    pub fn on_photos(mut self, place_id: &str, photos: Vec<Photo>) -> Self {
        self.photos.insert(place_id.to_string(), photos);
        self
    }

    pub fn on_hours(mut self, place_id: &str, hours: OpenHours) -> Self {
        self.hours.insert(place_id.to_string(), hours);
        self
    }

    /// Both photo and hours lookups fail for this place.
    pub fn fail_enrichment(mut self, place_id: &str) -> Self {
        self.failing_enrichment.insert(place_id.to_string());
        self
    }

    pub fn delay_enrichment(mut self, place_id: &str, delay: Duration) -> Self {
        self.enrichment_delays.insert(place_id.to_string(), delay);
        self
    }

    pub fn category_fetches(&self) -> usize {
        self.category_fetches.load(Ordering::SeqCst)
    }

    /// Place ids enrichment was requested for, in request order.
    pub fn enrichment_requests(&self) -> Vec<String> {
        self.enrichment_requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VenueProvider for MockProvider {
    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        self.category_fetches.fetch_add(1, Ordering::SeqCst);
        self.categories
            .clone()
            .ok_or_else(|| PlaceMapError::ProviderUnavailable("MockProvider: categories disabled".into()))
    }

    async fn fetch_places(&self, center: GeoPoint) -> Result<Vec<Place>> {
        let key = center_key(center);
        if let Some(delay) = self.places_delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        match self.places_failure {
            Some(PlacesFailure::Unavailable) => {
                return Err(PlaceMapError::ProviderUnavailable(
                    "MockProvider: connection refused".into(),
                ))
            }
            Some(PlacesFailure::Rejected) => {
                return Err(PlaceMapError::ProviderRejected {
                    code: 400,
                    error_type: "param_error".into(),
                    detail: "MockProvider: rejected".into(),
                })
            }
            None => {}
        }

        Ok(self
            .places
            .get(&key)
            .cloned()
            .unwrap_or_else(|| self.default_places.clone()))
    }

    async fn fetch_photos(&self, place_id: &str) -> Result<Vec<Photo>> {
        if let Ok(mut requests) = self.enrichment_requests.lock() {
            requests.push(place_id.to_string());
        }
        if let Some(delay) = self.enrichment_delays.get(place_id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_enrichment.contains(place_id) {
            return Err(PlaceMapError::ProviderUnavailable(format!(
                "MockProvider: no photos for {place_id}"
            )));
        }
        Ok(self.photos.get(place_id).cloned().unwrap_or_default())
    }

    async fn fetch_hours(&self, place_id: &str) -> Result<OpenHours> {
        if self.failing_enrichment.contains(place_id) {
            return Err(PlaceMapError::ProviderUnavailable(format!(
                "MockProvider: no hours for {place_id}"
            )));
        }
        Ok(self.hours.get(place_id).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// RecordingObserver
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    pub fn count(&self, predicate: impl Fn(&ViewEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

impl ViewObserver for RecordingObserver {
    fn on_event(&self, event: &ViewEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
