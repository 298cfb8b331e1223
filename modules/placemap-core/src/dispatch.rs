//! Drives a [`NeighborhoodSession`]: runs the loads it asks for and feeds
//! their results back in, one event at a time.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::category_tree::CategoryTree;
use crate::loader::NeighborhoodLoader;
use crate::provider::VenueProvider;
use crate::session::{Effect, NeighborhoodSession, SessionEvent};

pub struct Dispatcher<P: ?Sized> {
    provider: Arc<P>,
    tree: Arc<CategoryTree>,
    tx: UnboundedSender<SessionEvent>,
    rx: UnboundedReceiver<SessionEvent>,
    loads: JoinSet<()>,
}

impl<P: VenueProvider + ?Sized + 'static> Dispatcher<P> {
    pub fn new(provider: Arc<P>, tree: Arc<CategoryTree>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            provider,
            tree,
            tx,
            rx,
            loads: JoinSet::new(),
        }
    }

    /// Handle for feeding user input from elsewhere.
    pub fn sender(&self) -> UnboundedSender<SessionEvent> {
        self.tx.clone()
    }

    pub fn start(&mut self, session: &mut NeighborhoodSession) {
        for effect in session.start() {
            self.run_effect(effect);
        }
    }

    /// Handle one event and everything it directly causes.
    pub fn dispatch(&mut self, session: &mut NeighborhoodSession, event: SessionEvent) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            for effect in session.handle(event) {
                self.run_effect(effect);
            }
            while let Ok(next) = self.rx.try_recv() {
                queue.push_back(next);
            }
        }
    }

    /// Process events until every load has finished and the queue is empty.
    pub async fn run_until_idle(&mut self, session: &mut NeighborhoodSession) {
        loop {
            while let Ok(event) = self.rx.try_recv() {
                self.dispatch(session, event);
            }

            if self.loads.is_empty() {
                return;
            }

            let next = tokio::select! {
                Some(event) = self.rx.recv() => Some(event),
                Some(joined) = self.loads.join_next() => {
                    if let Err(e) = joined {
                        warn!(error = %e, "Load task ended abnormally");
                    }
                    None
                }
            };
            if let Some(event) = next {
                self.dispatch(session, event);
            }
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::LoadNeighborhood {
                generation,
                neighborhood,
            } => {
                debug!(generation, name = neighborhood.name.as_str(), "Starting load");
                let loader = NeighborhoodLoader::new(Arc::clone(&self.provider), Arc::clone(&self.tree));
                let tx = self.tx.clone();
                self.loads.spawn(async move {
                    loader.load(generation, neighborhood, tx).await;
                });
            }
        }
    }
}
