//! Notifications from the session to the rendering layer.
//!
//! The session owns the truth; observers only draw it. Events produced while
//! handling one session event are buffered and delivered together once the
//! reaction has run to completion.

use std::sync::Arc;

use placemap_common::GeoPoint;

use crate::interaction::InteractionState;
use crate::session::LoadState;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    LoadStateChanged(LoadState),
    PanTo(GeoPoint),
    MarkerAttached {
        place_id: String,
        position: GeoPoint,
        icon: String,
    },
    MarkerDetached {
        place_id: String,
    },
    MarkerVisibilityChanged {
        place_id: String,
        visible: bool,
    },
    InteractionStateChanged {
        place_id: String,
        state: InteractionState,
        icon: String,
    },
    ScrollIntoView {
        place_id: String,
    },
    /// Places of a top-level category matching the current query, in
    /// insertion order.
    VisiblePlacesChanged {
        category_id: String,
        place_ids: Vec<String>,
    },
    CategoryHiddenChanged {
        category_id: String,
        hidden: bool,
    },
}

pub trait ViewObserver: Send + Sync {
    fn on_event(&self, event: &ViewEvent);
}

#[derive(Default)]
pub struct ChangePublisher {
    observers: Vec<Arc<dyn ViewObserver>>,
}

impl ChangePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Arc<dyn ViewObserver>) {
        self.observers.push(observer);
    }

    pub fn publish(&self, events: &[ViewEvent]) {
        for event in events {
            for observer in &self.observers {
                observer.on_event(event);
            }
        }
    }
}

/// Logs every view event; used by the CLI in place of a map widget.
pub struct TracingObserver;

impl ViewObserver for TracingObserver {
    fn on_event(&self, event: &ViewEvent) {
        match event {
            ViewEvent::LoadStateChanged(state) => tracing::info!(?state, "Load state changed"),
            ViewEvent::VisiblePlacesChanged { category_id, place_ids } => tracing::debug!(
                category_id = category_id.as_str(),
                count = place_ids.len(),
                "Visible places changed"
            ),
            other => tracing::trace!(event = ?other, "View event"),
        }
    }
}
