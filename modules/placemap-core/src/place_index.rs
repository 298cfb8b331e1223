//! Places loaded for the active neighborhood, in arrival order.

use std::collections::HashMap;

use placemap_common::Place;

#[derive(Default)]
pub struct PlaceIndex {
    places: Vec<Place>,
    by_id: HashMap<String, usize>,
}

impl PlaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a place whose categories are already resolved. Returns `false`
    /// (and keeps the first copy) when the id is already indexed.
    pub fn add_place(&mut self, place: Place) -> bool {
        if self.by_id.contains_key(&place.id) {
            tracing::debug!(place_id = place.id.as_str(), "Place already indexed, ignoring");
            return false;
        }
        self.by_id.insert(place.id.clone(), self.places.len());
        self.places.push(place);
        true
    }

    pub fn all_places(&self) -> &[Place] {
        &self.places
    }

    /// Places resolved into `category_id`, in insertion order.
    pub fn places_in(&self, category_id: &str) -> Vec<&Place> {
        self.places
            .iter()
            .filter(|p| p.belongs_to(category_id))
            .collect()
    }

    pub fn get(&self, place_id: &str) -> Option<&Place> {
        self.by_id.get(place_id).map(|&i| &self.places[i])
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn clear(&mut self) {
        self.places.clear();
        self.by_id.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placemap_common::{CategoryRef, GeoPoint, OpenHours};

    fn place(id: &str, roots: &[&str]) -> Place {
        Place {
            id: id.into(),
            name: id.to_uppercase(),
            location: GeoPoint::new(0.0, 0.0),
            address_lines: vec![],
            leaf_categories: vec![],
            resolved_categories: roots
                .iter()
                .map(|r| CategoryRef {
                    id: r.to_string(),
                    name: r.to_string(),
                    plural_name: String::new(),
                })
                .collect(),
            hours: OpenHours::Unavailable,
            photos: vec![],
        }
    }

    #[test]
    fn buckets_keep_insertion_order() {
        let mut index = PlaceIndex::new();
        index.add_place(place("b", &["food"]));
        index.add_place(place("a", &["food", "nightlife"]));
        index.add_place(place("c", &["nightlife"]));

        let food: Vec<_> = index.places_in("food").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(food, vec!["b", "a"]);
        let night: Vec<_> = index.places_in("nightlife").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(night, vec!["a", "c"]);
    }

    #[test]
    fn uncategorized_places_stay_indexed_but_in_no_bucket() {
        let mut index = PlaceIndex::new();
        index.add_place(place("lonely", &[]));
        assert_eq!(index.len(), 1);
        assert!(index.places_in("food").is_empty());
        assert!(index.get("lonely").is_some());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut index = PlaceIndex::new();
        assert!(index.add_place(place("a", &["food"])));
        assert!(!index.add_place(place("a", &["nightlife"])));
        assert_eq!(index.len(), 1);
        assert!(index.get("a").unwrap().belongs_to("food"));
    }

    #[test]
    fn clear_empties_everything() {
        let mut index = PlaceIndex::new();
        index.add_place(place("a", &["food"]));
        index.clear();
        assert!(index.is_empty());
        assert!(index.get("a").is_none());
    }
}
