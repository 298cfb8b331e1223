//! Asynchronous retrieval of one neighborhood's places.
//!
//! Results are sent back to the session as [`SessionEvent`]s tagged with the
//! generation the load was started for, so a load that outlives its
//! neighborhood is harmless.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use placemap_common::{Neighborhood, Place};

use crate::category_tree::CategoryTree;
use crate::provider::VenueProvider;
use crate::session::SessionEvent;

pub struct NeighborhoodLoader<P: ?Sized> {
    provider: Arc<P>,
    tree: Arc<CategoryTree>,
}

impl<P: VenueProvider + ?Sized> NeighborhoodLoader<P> {
    pub fn new(provider: Arc<P>, tree: Arc<CategoryTree>) -> Self {
        Self { provider, tree }
    }

    /// Fetch the place list, then enrich every categorized place with photos
    /// and hours. Places are delivered in completion order.
    pub async fn load(&self, generation: u64, neighborhood: Neighborhood, tx: UnboundedSender<SessionEvent>) {
        let places = match self.provider.fetch_places(neighborhood.center).await {
            Ok(places) => places,
            Err(error) => {
                error!(
                    name = neighborhood.name.as_str(),
                    error = %error,
                    "Failed to retrieve places"
                );
                let _ = tx.send(SessionEvent::LoadFailed { generation, error });
                return;
            }
        };

        info!(
            name = neighborhood.name.as_str(),
            count = places.len(),
            generation,
            "Places retrieved"
        );
        if tx
            .send(SessionEvent::PlacesListed {
                generation,
                count: places.len(),
            })
            .is_err()
        {
            return;
        }

        let mut pending: FuturesUnordered<_> = places
            .into_iter()
            .map(|mut place| {
                place.resolved_categories = self.tree.resolve(&place);
                self.enrich(place)
            })
            .collect();

        while let Some(place) = pending.next().await {
            let arrived = SessionEvent::PlaceArrived {
                generation,
                place: Box::new(place),
            };
            if tx.send(arrived).is_err() {
                debug!(generation, "Session gone, abandoning load");
                return;
            }
        }
    }

    /// Photos first, then hours. Either failing leaves that part empty.
    /// Places without a known category are never shown, so they are not
    /// enriched.
    async fn enrich(&self, mut place: Place) -> Place {
        if !place.is_displayable() {
            return place;
        }

        match self.provider.fetch_photos(&place.id).await {
            Ok(photos) => place.photos = photos,
            Err(e) => warn!(place_id = place.id.as_str(), error = %e, "Photos unavailable"),
        }
        match self.provider.fetch_hours(&place.id).await {
            Ok(hours) => place.hours = hours,
            Err(e) => warn!(place_id = place.id.as_str(), error = %e, "Hours unavailable"),
        }

        place
    }
}
