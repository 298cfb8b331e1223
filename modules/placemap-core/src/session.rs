//! One neighborhood's worth of places, filters and markers.
//!
//! All mutation goes through [`NeighborhoodSession::handle`], one event at a
//! time. Loader results carry the generation they were started for; anything
//! from an abandoned generation is dropped before a marker is created.

use std::sync::Arc;

use tracing::{debug, error, info};

use placemap_common::{Neighborhood, Place, PlaceMapError};

use crate::category_tree::CategoryTree;
use crate::filter::{FilterContext, FilterState, ReactiveFilterEngine};
use crate::interaction::{CloseReason, PlaceInteractionController};
use crate::observer::{ChangePublisher, ViewEvent, ViewObserver};
use crate::place_index::PlaceIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// The provider returned zero places. Not an error.
    NoPlaces,
    Failed {
        message: String,
    },
}

#[derive(Debug)]
pub enum SessionEvent {
    // --- Neighborhood lifecycle ---
    SwitchNeighborhood(Neighborhood),
    PlacesListed {
        generation: u64,
        count: usize,
    },
    PlaceArrived {
        generation: u64,
        place: Box<Place>,
    },
    LoadFailed {
        generation: u64,
        error: PlaceMapError,
    },

    // --- User input ---
    QueryChanged(String),
    CategoryToggled(String),
    MarkerClicked(String),
    InfoWindowClosed(String),
    ListEntryClicked(String),
}

/// Work the session asks its driver to start.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadNeighborhood {
        generation: u64,
        neighborhood: Neighborhood,
    },
}

pub struct NeighborhoodSession {
    tree: Arc<CategoryTree>,
    neighborhood: Neighborhood,
    generation: u64,
    index: PlaceIndex,
    filter: ReactiveFilterEngine,
    interaction: PlaceInteractionController,
    load_state: LoadState,
    failure: Option<PlaceMapError>,
    publisher: ChangePublisher,
}

impl NeighborhoodSession {
    pub fn new(tree: Arc<CategoryTree>, neighborhood: Neighborhood) -> Self {
        Self {
            tree,
            neighborhood,
            generation: 0,
            index: PlaceIndex::new(),
            filter: ReactiveFilterEngine::new(),
            interaction: PlaceInteractionController::new(),
            load_state: LoadState::Loading,
            failure: None,
            publisher: ChangePublisher::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Arc<dyn ViewObserver>) {
        self.publisher.subscribe(observer);
    }

    /// Begin loading the initial neighborhood.
    pub fn start(&mut self) -> Vec<Effect> {
        let neighborhood = self.neighborhood.clone();
        self.handle(SessionEvent::SwitchNeighborhood(neighborhood))
    }

    /// React to one event. View events produced along the way are published
    /// once the reaction is complete.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        let mut out = Vec::new();
        let mut effects = Vec::new();

        match event {
            SessionEvent::SwitchNeighborhood(neighborhood) => {
                effects.push(self.switch_neighborhood(neighborhood, &mut out));
            }
            SessionEvent::PlacesListed { generation, count } => {
                if self.is_current(generation, "place list") {
                    self.places_listed(count, &mut out);
                }
            }
            SessionEvent::PlaceArrived { generation, place } => {
                if self.is_current(generation, "place") {
                    self.place_arrived(*place, &mut out);
                }
            }
            SessionEvent::LoadFailed { generation, error } => {
                if self.is_current(generation, "load failure") {
                    self.load_failed(error, &mut out);
                }
            }
            SessionEvent::QueryChanged(query) => {
                let mut ctx = FilterContext {
                    tree: &self.tree,
                    index: &self.index,
                    interaction: &mut self.interaction,
                    out: &mut out,
                };
                self.filter.set_query(&query, &mut ctx);
            }
            SessionEvent::CategoryToggled(category_id) => {
                let mut ctx = FilterContext {
                    tree: &self.tree,
                    index: &self.index,
                    interaction: &mut self.interaction,
                    out: &mut out,
                };
                self.filter.toggle_category(&category_id, &mut ctx);
            }
            SessionEvent::MarkerClicked(place_id) => {
                self.interaction.marker_clicked(&place_id, &mut out);
            }
            SessionEvent::InfoWindowClosed(place_id) => {
                self.interaction.close(&place_id, CloseReason::User, &mut out);
            }
            SessionEvent::ListEntryClicked(place_id) => {
                self.interaction.list_entry_clicked(&place_id, &mut out);
            }
        }

        debug_assert!(self.interaction.is_consistent());
        self.publisher.publish(&out);
        effects
    }

    fn is_current(&self, generation: u64, what: &str) -> bool {
        if generation == self.generation {
            return true;
        }
        debug!(
            generation,
            current = self.generation,
            what,
            "Discarding result from abandoned neighborhood"
        );
        false
    }

    /// Tear down everything from the previous neighborhood before any result
    /// of the new one can be accepted.
    fn switch_neighborhood(&mut self, neighborhood: Neighborhood, out: &mut Vec<ViewEvent>) -> Effect {
        self.generation += 1;
        info!(
            name = neighborhood.name.as_str(),
            generation = self.generation,
            "Switching neighborhood"
        );

        self.interaction.detach_all(out);
        self.index.clear();
        self.filter.reset(out);
        self.failure = None;
        self.neighborhood = neighborhood.clone();

        out.push(ViewEvent::PanTo(neighborhood.center));
        self.set_load_state(LoadState::Loading, out);

        Effect::LoadNeighborhood {
            generation: self.generation,
            neighborhood,
        }
    }

    fn places_listed(&mut self, count: usize, out: &mut Vec<ViewEvent>) {
        info!(count, generation = self.generation, "Place list received");
        if count == 0 {
            self.clear_loading(LoadState::NoPlaces, out);
        }
    }

    fn place_arrived(&mut self, mut place: Place, out: &mut Vec<ViewEvent>) {
        place.resolved_categories = self.tree.resolve(&place);
        let place_id = place.id.clone();

        if !self.index.add_place(place) {
            return;
        }
        self.clear_loading(LoadState::Ready, out);

        let Some(place) = self.index.get(&place_id) else {
            return;
        };
        if !place.is_displayable() {
            debug!(place_id = place_id.as_str(), "Place has no known category, not displayed");
            return;
        }

        self.interaction.attach(place, out);
        let mut ctx = FilterContext {
            tree: &self.tree,
            index: &self.index,
            interaction: &mut self.interaction,
            out,
        };
        self.filter.place_arrived(place, &mut ctx);
    }

    fn load_failed(&mut self, error: PlaceMapError, out: &mut Vec<ViewEvent>) {
        error!(error = %error, generation = self.generation, "Neighborhood load failed");
        let message = error.user_message();
        self.failure = Some(error);
        self.clear_loading(LoadState::Failed { message }, out);
    }

    /// Leave `Loading` for a terminal state. Only the first call per
    /// generation has any effect.
    fn clear_loading(&mut self, next: LoadState, out: &mut Vec<ViewEvent>) {
        if self.load_state == LoadState::Loading {
            self.set_load_state(next, out);
        }
    }

    fn set_load_state(&mut self, next: LoadState, out: &mut Vec<ViewEvent>) {
        if self.load_state != next {
            self.load_state = next.clone();
            out.push(ViewEvent::LoadStateChanged(next));
        }
    }

    // --- Read access ---

    pub fn tree(&self) -> Arc<CategoryTree> {
        Arc::clone(&self.tree)
    }

    pub fn neighborhood(&self) -> &Neighborhood {
        &self.neighborhood
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// The fatal error of the current generation, if the load failed.
    pub fn failure(&self) -> Option<&PlaceMapError> {
        self.failure.as_ref()
    }

    pub fn index(&self) -> &PlaceIndex {
        &self.index
    }

    pub fn filter_state(&self) -> &FilterState {
        self.filter.state()
    }

    /// Places of a top-level category matching the current query.
    pub fn visible_places(&self, category_id: &str) -> Vec<&Place> {
        self.filter
            .visible_places(category_id)
            .iter()
            .filter_map(|id| self.index.get(id))
            .collect()
    }

    pub fn interaction(&self) -> &PlaceInteractionController {
        &self.interaction
    }
}
