//! Element bindings for a shared spy
//!
//! Components don't own the spy; they hold a [`SharedScrollSpy`] and attach
//! to it:
//!
//! - [`SpyTargetHandle`] registers a section while it is mounted and
//!   unregisters it when dropped.
//! - [`SpyLink`] follows one target name for a navigation entry and tells
//!   the renderer whether to apply the active class.
//!
//! # Example
//!
//! ```rust
//! use blinc_spy::prelude::*;
//!
//! let mut page = PageLayout::new(400.0);
//! page.insert("features", None, 0.0, 500.0).unwrap();
//! page.insert("pricing", None, 500.0, 500.0).unwrap();
//!
//! let spy = shared(ScrollSpy::new(page));
//! let pricing_link = SpyLink::attach(&spy, "pricing").with_active_class("current");
//!
//! let _features = SpyTargetHandle::register(&spy, SpyTarget::element("features"));
//! let _pricing = SpyTargetHandle::register(&spy, SpyTarget::element("pricing"));
//! spy.lock().unwrap().spy(SpyOptions::default()).unwrap();
//! assert!(!pricing_link.is_active());
//!
//! {
//!     let mut spy = spy.lock().unwrap();
//!     spy.viewport_mut().scroll_window_to(550.0);
//!     spy.handle_event(&SpyEvent::Scroll);
//! }
//! assert_eq!(pricing_link.class(), Some("current"));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::spy::{ScrollSpy, Subscription};
use crate::target::SpyTarget;
use crate::viewport::Viewport;

/// A spy shared between the host and the components bound to it
pub type SharedScrollSpy<V> = Arc<Mutex<ScrollSpy<V>>>;

/// Class applied to a link whose target is active, unless overridden
pub const DEFAULT_ACTIVE_CLASS: &str = "active";

/// Wrap a spy for sharing
pub fn shared<V: Viewport>(spy: ScrollSpy<V>) -> SharedScrollSpy<V> {
    Arc::new(Mutex::new(spy))
}

// =============================================================================
// Targets
// =============================================================================

/// Keeps a target registered for as long as it lives
///
/// Holds only a weak reference, so a handle outliving its spy is harmless.
pub struct SpyTargetHandle<V: Viewport> {
    spy: Weak<Mutex<ScrollSpy<V>>>,
    name: String,
}

impl<V: Viewport> SpyTargetHandle<V> {
    /// Register `target` with the spy
    pub fn register(spy: &SharedScrollSpy<V>, target: SpyTarget) -> Self {
        let name = target.name.clone();
        if let Ok(mut spy) = spy.lock() {
            spy.add_target(target);
        }
        Self {
            spy: Arc::downgrade(spy),
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<V: Viewport> Drop for SpyTargetHandle<V> {
    fn drop(&mut self) {
        let Some(spy) = self.spy.upgrade() else {
            return;
        };
        if let Ok(mut spy) = spy.lock() {
            spy.remove_target(&self.name);
        };
    }
}

impl<V: Viewport> std::fmt::Debug for SpyTargetHandle<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpyTargetHandle")
            .field("name", &self.name)
            .field("attached", &(self.spy.strong_count() > 0))
            .finish()
    }
}

// =============================================================================
// Links
// =============================================================================

/// Active state for a navigation entry pointing at one target
pub struct SpyLink<V: Viewport> {
    spy: Weak<Mutex<ScrollSpy<V>>>,
    target: String,
    active_class: String,
    active: Arc<AtomicBool>,
    subscription: Option<Subscription>,
}

impl<V: Viewport> SpyLink<V> {
    /// Follow `target` on the spy, starting from its current active target
    pub fn attach(spy: &SharedScrollSpy<V>, target: impl Into<String>) -> Self {
        let target = target.into();
        let active = Arc::new(AtomicBool::new(false));

        let subscription = spy.lock().ok().map(|mut spy| {
            active.store(spy.active_target() == Some(target.as_str()), Ordering::SeqCst);

            let flag = Arc::clone(&active);
            let watched = target.clone();
            spy.subscribe(move |current| {
                flag.store(current == Some(watched.as_str()), Ordering::SeqCst);
            })
        });

        Self {
            spy: Arc::downgrade(spy),
            target,
            active_class: DEFAULT_ACTIVE_CLASS.to_string(),
            active,
            subscription,
        }
    }

    /// Use a different class name while active
    pub fn with_active_class(mut self, class: impl Into<String>) -> Self {
        self.active_class = class.into();
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// The class to apply right now, if any
    pub fn class(&self) -> Option<&str> {
        self.is_active().then_some(self.active_class.as_str())
    }
}

impl<V: Viewport> Drop for SpyLink<V> {
    fn drop(&mut self) {
        let (Some(subscription), Some(spy)) = (self.subscription.take(), self.spy.upgrade())
        else {
            return;
        };
        if let Ok(mut spy) = spy.lock() {
            spy.unsubscribe(subscription);
        };
    }
}

impl<V: Viewport> std::fmt::Debug for SpyLink<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpyLink")
            .field("target", &self.target)
            .field("active", &self.is_active())
            .field("active_class", &self.active_class)
            .finish()
    }
}
