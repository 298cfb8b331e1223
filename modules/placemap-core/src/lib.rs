pub mod cache;
pub mod category_tree;
pub mod dispatch;
pub mod filter;
pub mod interaction;
pub mod loader;
pub mod observer;
pub mod place_index;
pub mod provider;
pub mod query;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use cache::{load_categories, CategoryCache, FileCategoryCache, MemoryCategoryCache};
pub use category_tree::{is_ancestor_or_self, resolve_membership, CategoryTree};
pub use dispatch::Dispatcher;
pub use filter::{FilterState, ReactiveFilterEngine};
pub use interaction::{IconVariant, InteractionState, PlaceInteractionController};
pub use observer::{ChangePublisher, TracingObserver, ViewEvent, ViewObserver};
pub use place_index::PlaceIndex;
pub use provider::VenueProvider;
pub use query::QueryMatcher;
pub use session::{Effect, LoadState, NeighborhoodSession, SessionEvent};
