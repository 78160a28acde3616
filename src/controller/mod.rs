//! Filter-driven, stale-response-safe exhibit listing.
//!
//! ```text
//! QueryIntent ──→ QueryReducer ──→ Query ──→ FetchController ──→ ViewState
//!                                               │      ↑
//!                                    dispatch   ↓      │  settle(seq)
//!                                          CatalogTransport
//! ```
//!
//! - **QueryReducer**: pure `(view, intent) -> Transition`
//! - **FetchController**: sequence counter, supersession, commit/discard
//! - **CatalogView**: single task owning the controller, published through
//!   [`ViewHandle`]

mod fetch;
mod intent;
mod reducer;
mod runtime;
mod state;

pub use fetch::{AttemptStatus, FetchAttempt, FetchController, Settlement};
pub use intent::QueryIntent;
pub use reducer::{in_bounds, QueryReducer, Transition};
pub use runtime::{spawn_view, CatalogView, ViewClosed, ViewHandle, ViewOptions};
pub use state::{Sequence, ViewError, ViewState};
