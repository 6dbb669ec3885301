//! Blinc Scroll Spy
//!
//! Tracks which of several registered page sections is in view and publishes
//! the active section's name, so navigation can highlight the matching entry.
//!
//! - **Window or container**: spy on the window with optional top/bottom
//!   thresholds, or on a nested scroll container
//! - **Top-most wins**: when several sections are visible the highest one is
//!   active
//! - **Change notifications**: subscribers hear about the active section only
//!   when it changes
//! - **Bindings**: RAII target registration and per-link active state for
//!   components sharing one spy
//!
//! The spy reads geometry through the [`Viewport`] trait. [`PageLayout`] is an
//! in-memory implementation for hosts that mirror their computed layout, and
//! for tests.
//!
//! # Example
//!
//! ```rust
//! use blinc_spy::prelude::*;
//!
//! let mut page = PageLayout::new(600.0);
//! page.insert("header", None, 0.0, 80.0).unwrap();
//! page.insert("getting-started", None, 80.0, 900.0).unwrap();
//! page.insert("api", None, 980.0, 900.0).unwrap();
//!
//! let mut spy = ScrollSpy::new(page);
//! spy.add_target(SpyTarget::element("getting-started"));
//! spy.add_target(SpyTarget::element("api"));
//!
//! // Ignore the part of the window covered by an 80px fixed header
//! spy.spy(SpyOptions::new().threshold_top(80.0)).unwrap();
//! assert_eq!(spy.active_target(), Some("getting-started"));
//!
//! spy.viewport_mut().scroll_window_to(920.0);
//! spy.handle_event(&SpyEvent::Scroll);
//! assert_eq!(spy.active_target(), Some("api"));
//! ```

pub mod binding;
pub mod error;
pub mod events;
pub mod geometry;
pub mod options;
pub mod page;
pub mod spy;
pub mod target;
pub mod viewport;

pub use binding::{shared, SharedScrollSpy, SpyLink, SpyTargetHandle, DEFAULT_ACTIVE_CLASS};
pub use error::{Result, SpyError};
pub use events::SpyEvent;
pub use geometry::Band;
pub use options::{SpyMode, SpyOptions};
pub use page::{ElementSpec, NodeId, PageLayout, PageSpec};
pub use spy::{ScrollSpy, Subscription};
pub use target::SpyTarget;
pub use viewport::Viewport;

/// Common imports
pub mod prelude {
    pub use crate::binding::{shared, SharedScrollSpy, SpyLink, SpyTargetHandle};
    pub use crate::events::SpyEvent;
    pub use crate::options::{SpyMode, SpyOptions};
    pub use crate::page::PageLayout;
    pub use crate::spy::ScrollSpy;
    pub use crate::target::SpyTarget;
    pub use crate::viewport::Viewport;
}
