//! Query and category-visibility filtering.
//!
//! For each top-level category the engine keeps the derived list of places
//! matching the current query, and drives every marker's visibility from it.
//! A marker is visible when its place matches the query and at least one of
//! the categories it resolves into is shown.
//!
//! Recomputation order:
//! - query change: every category
//! - visibility toggle: the toggled category
//! - place arrival: the categories the place resolved into

use std::collections::{HashMap, HashSet};

use placemap_common::Place;

use crate::category_tree::CategoryTree;
use crate::interaction::{CloseReason, PlaceInteractionController};
use crate::observer::ViewEvent;
use crate::place_index::PlaceIndex;
use crate::query::QueryMatcher;

/// Per-neighborhood filter inputs. Reset on every neighborhood switch.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    query: String,
    hidden: HashSet<String>,
}

impl FilterState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_visible(&self, category_id: &str) -> bool {
        !self.hidden.contains(category_id)
    }

    pub fn hidden_categories(&self) -> impl Iterator<Item = &str> {
        self.hidden.iter().map(String::as_str)
    }
}

/// Shared borrows of the session state the engine reads and writes.
pub struct FilterContext<'a> {
    pub tree: &'a CategoryTree,
    pub index: &'a PlaceIndex,
    pub interaction: &'a mut PlaceInteractionController,
    pub out: &'a mut Vec<ViewEvent>,
}

#[derive(Default)]
pub struct ReactiveFilterEngine {
    state: FilterState,
    matcher: QueryMatcher,
    /// Last published matching list per category.
    visible: HashMap<String, Vec<String>>,
}

impl ReactiveFilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn visible_places(&self, category_id: &str) -> &[String] {
        self.visible
            .get(category_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn matches(&self, place: &Place) -> bool {
        self.matcher.matches(place)
    }

    fn marker_visible(&self, place: &Place) -> bool {
        self.matcher.matches(place)
            && place
                .resolved_categories
                .iter()
                .any(|c| self.state.is_visible(&c.id))
    }

    /// Recompute one category: returns the places matching the query, in
    /// insertion order, and applies the marker decision to each of them.
    pub fn recompute_category(&mut self, category_id: &str, ctx: &mut FilterContext<'_>) -> Vec<String> {
        let index = ctx.index;
        let mut matching = Vec::new();

        for place in index.places_in(category_id) {
            let visible = self.marker_visible(place);
            // Hiding closes an open info window before the marker goes away.
            ctx.interaction.set_marker_visible(&place.id, visible, ctx.out);
            if self.matcher.matches(place) {
                matching.push(place.id.clone());
            }
        }

        let previous = self.visible.insert(category_id.to_string(), matching.clone());
        if previous.as_ref() != Some(&matching) {
            ctx.out.push(ViewEvent::VisiblePlacesChanged {
                category_id: category_id.to_string(),
                place_ids: matching.clone(),
            });
        }

        matching
    }

    /// New query text invalidates every category.
    pub fn set_query(&mut self, query: &str, ctx: &mut FilterContext<'_>) {
        if query == self.state.query {
            return;
        }
        tracing::debug!(query, "Query changed");
        self.state.query = query.to_string();
        self.matcher = QueryMatcher::new(query);

        let roots: Vec<String> = ctx.tree.roots().iter().map(|c| c.id.clone()).collect();
        for id in roots {
            self.recompute_category(&id, ctx);
        }
    }

    /// Flip one top-level category. Open info windows of its places close
    /// before the new marker decision is applied. Returns the new visibility,
    /// or `None` for an unknown category.
    pub fn toggle_category(&mut self, category_id: &str, ctx: &mut FilterContext<'_>) -> Option<bool> {
        if ctx.tree.root(category_id).is_none() {
            tracing::warn!(category_id, "Toggle requested for unknown top-level category");
            return None;
        }

        let now_visible = if self.state.hidden.remove(category_id) {
            true
        } else {
            self.state.hidden.insert(category_id.to_string());
            false
        };
        ctx.out.push(ViewEvent::CategoryHiddenChanged {
            category_id: category_id.to_string(),
            hidden: !now_visible,
        });

        let index = ctx.index;
        for place in index.places_in(category_id) {
            ctx.interaction.close(&place.id, CloseReason::Filtered, ctx.out);
        }
        self.recompute_category(category_id, ctx);

        Some(now_visible)
    }

    /// A new place changes only the categories it resolved into.
    pub fn place_arrived(&mut self, place: &Place, ctx: &mut FilterContext<'_>) {
        for category in &place.resolved_categories {
            self.recompute_category(&category.id, ctx);
        }
    }

    /// Back to an empty query with every category shown, and no derived lists.
    pub fn reset(&mut self, out: &mut Vec<ViewEvent>) {
        let mut hidden: Vec<String> = self.state.hidden.drain().collect();
        hidden.sort();
        for category_id in hidden {
            out.push(ViewEvent::CategoryHiddenChanged {
                category_id,
                hidden: false,
            });
        }

        let mut cleared: Vec<String> = self
            .visible
            .drain()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(id, _)| id)
            .collect();
        cleared.sort();
        for category_id in cleared {
            out.push(ViewEvent::VisiblePlacesChanged {
                category_id,
                place_ids: Vec::new(),
            });
        }

        self.state.query.clear();
        self.matcher = QueryMatcher::default();
    }
}
