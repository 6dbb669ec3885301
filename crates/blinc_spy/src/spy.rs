//! The scroll-spy service
//!
//! [`ScrollSpy`] owns a list of [`SpyTarget`]s and a [`Viewport`]. On every
//! scroll or resize notification it recomputes which target is active and, if
//! that changed, publishes the new name to its subscribers.
//!
//! # Choosing the active target
//!
//! In [`SpyMode::TopMost`] targets are walked in registration order. A target
//! becomes the candidate when it is visible and no current candidate sits
//! strictly above it, so the top-most visible section wins and, between two
//! sections at the same offset, the later registered one wins.
//!
//! Visibility depends on whether a scroll container is configured:
//!
//! ```text
//! window:     [scroll_top + threshold_top, scroll_top + viewport - threshold_bottom)
//! container:  the container's scrolled content slice that is above the fold,
//!             compared against each target's layout offset
//! ```
//!
//! # Example
//!
//! ```rust
//! use blinc_spy::prelude::*;
//!
//! let mut page = PageLayout::new(500.0);
//! page.insert("intro", None, 0.0, 600.0).unwrap();
//! page.insert("usage", None, 600.0, 600.0).unwrap();
//!
//! let mut spy = ScrollSpy::new(page);
//! spy.add_target(SpyTarget::element("intro"));
//! spy.add_target(SpyTarget::element("usage"));
//! spy.spy(SpyOptions::default()).unwrap();
//! assert_eq!(spy.active_target(), Some("intro"));
//!
//! spy.viewport_mut().scroll_window_to(650.0);
//! spy.handle_event(&SpyEvent::Scroll);
//! assert_eq!(spy.active_target(), Some("usage"));
//! ```

use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::events::SpyEvent;
use crate::geometry::{container_band, window_band};
use crate::options::{SpyMode, SpyOptions};
use crate::target::SpyTarget;
use crate::viewport::Viewport;

new_key_type! {
    /// Handle returned by [`ScrollSpy::subscribe`]
    pub struct Subscription;
}

/// Callback invoked with the new active target name
pub type ActiveCallback = Box<dyn FnMut(Option<&str>) + Send>;

/// Tracks which registered target is in view
pub struct ScrollSpy<V: Viewport> {
    viewport: V,
    options: SpyOptions,
    targets: Vec<SpyTarget>,
    /// Whether scroll/resize notifications are being handled
    spying: bool,
    /// Last published active target name
    active: Option<String>,
    subscribers: SlotMap<Subscription, ActiveCallback>,
}

impl<V: Viewport> std::fmt::Debug for ScrollSpy<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollSpy")
            .field("options", &self.options)
            .field("targets", &self.targets)
            .field("spying", &self.spying)
            .field("active", &self.active)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<V: Viewport> ScrollSpy<V> {
    /// Create an idle spy over a viewport
    pub fn new(viewport: V) -> Self {
        Self {
            viewport,
            options: SpyOptions::default(),
            targets: Vec::new(),
            spying: false,
            active: None,
            subscribers: SlotMap::with_key(),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start reacting to scroll and resize notifications
    ///
    /// Runs a check right away. Calling this while already spying does
    /// nothing, so listeners are never registered twice; call
    /// [`stop_spying`](Self::stop_spying) first to change options.
    pub fn spy(&mut self, options: SpyOptions) -> Result<()> {
        if self.spying {
            warn!("scroll spy already running, ignoring spy()");
            return Ok(());
        }
        options.validate()?;

        debug!(
            container = ?options.container,
            threshold_top = options.threshold_top,
            threshold_bottom = options.threshold_bottom,
            mode = ?options.mode,
            "scroll spy started"
        );
        self.options = options;
        self.spying = true;
        self.check_active_element();
        Ok(())
    }

    /// Stop reacting to notifications and forget all targets
    ///
    /// Nothing is published; subscribers keep the last value they saw. The
    /// spy can be started again with [`spy`](Self::spy).
    pub fn stop_spying(&mut self) {
        debug!(targets = self.targets.len(), "scroll spy stopped");
        self.spying = false;
        self.targets.clear();
    }

    /// Whether the spy is handling notifications
    pub fn is_spying(&self) -> bool {
        self.spying
    }

    /// Handle a notification forwarded by the host
    ///
    /// Returns whether a check ran. Container scrolls only count for the
    /// configured container.
    pub fn handle_event(&mut self, event: &SpyEvent) -> bool {
        if !self.spying {
            return false;
        }
        let relevant = match event {
            SpyEvent::Scroll | SpyEvent::Resize => true,
            SpyEvent::ContainerScroll(id) => self.options.container.as_deref() == Some(id),
        };
        if !relevant {
            return false;
        }
        trace!(event = event.name(), "scroll spy notified");
        self.check_active_element();
        true
    }

    // =========================================================================
    // Targets
    // =========================================================================

    /// Register a target and re-check
    pub fn add_target(&mut self, target: SpyTarget) {
        trace!(name = %target.name, element = %target.element, "spy target added");
        self.targets.push(target);
        self.check_active_element();
    }

    /// Unregister every target with this name and re-check
    pub fn remove_target(&mut self, name: &str) {
        self.targets.retain(|t| t.name != name);
        self.check_active_element();
    }

    pub fn targets(&self) -> &[SpyTarget] {
        &self.targets
    }

    // =========================================================================
    // Active target
    // =========================================================================

    /// Name of the currently active target
    pub fn active_target(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Be told whenever the active target changes
    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(Option<&str>) + Send + 'static,
    {
        self.subscribers.insert(Box::new(callback))
    }

    /// Drop a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.subscribers.remove(subscription).is_some()
    }

    /// Recompute the active target, publishing it if it changed
    pub fn check_active_element(&mut self) -> Option<&str> {
        match self.options.mode {
            SpyMode::TopMost => {
                let next = self.find_top_most().map(str::to_string);
                self.publish(next);
            }
            SpyMode::EveryVisible => {
                let visible: Vec<String> = self
                    .targets
                    .iter()
                    .filter(|t| self.is_element_active(&t.element, 0.0, None))
                    .map(|t| t.name.clone())
                    .collect();
                for name in visible {
                    self.publish(Some(name));
                }
            }
        }
        self.active.as_deref()
    }

    /// Whether `element` should be the active target
    ///
    /// `container_offset` is the configured container's layout offset (zero
    /// without one) and `current_active` the element of the best candidate so
    /// far. In [`SpyMode::EveryVisible`] both are ignored.
    pub fn is_element_active(
        &self,
        element: &str,
        container_offset: f32,
        current_active: Option<&str>,
    ) -> bool {
        let (Some(offset_top), Some(height)) = (
            self.viewport.element_offset_top(element),
            self.viewport.element_height(element),
        ) else {
            trace!(element, "spy target not on page");
            return false;
        };

        if self.options.mode == SpyMode::EveryVisible {
            return window_band(
                self.viewport.scroll_top(),
                self.viewport.viewport_height(),
                0.0,
                0.0,
            )
            .touches_span(offset_top, height);
        }

        if let Some(current_top) =
            current_active.and_then(|current| self.viewport.element_offset_top(current))
        {
            if current_top < offset_top {
                return false;
            }
        }

        self.is_element_inside_window(element, container_offset, offset_top, height)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn find_top_most(&self) -> Option<&str> {
        let container_offset = match self.options.container.as_deref() {
            Some(container) => match self.viewport.total_offset(container) {
                Some(offset) => offset,
                None => {
                    trace!(container, "scroll container not on page");
                    return None;
                }
            },
            None => 0.0,
        };

        let mut active: Option<&SpyTarget> = None;
        for target in &self.targets {
            let current = active.map(|t| t.element.as_str());
            if self.is_element_active(&target.element, container_offset, current) {
                active = Some(target);
            }
        }
        active.map(|t| t.name.as_str())
    }

    fn is_element_inside_window(
        &self,
        element: &str,
        container_offset: f32,
        offset_top: f32,
        height: f32,
    ) -> bool {
        let scroll_top = self.viewport.scroll_top();
        let viewport_height = self.viewport.viewport_height();

        let Some(container) = self.options.container.as_deref() else {
            return window_band(
                scroll_top,
                viewport_height,
                self.options.threshold_top,
                self.options.threshold_bottom,
            )
            .overlaps_span(offset_top, height);
        };

        // Thresholds only apply to the window
        let (Some(container_height), Some(container_scroll)) = (
            self.viewport.element_height(container),
            self.viewport.element_scroll_top(container),
        ) else {
            return false;
        };
        let Some(band) = container_band(
            container_offset,
            container_scroll,
            container_height,
            scroll_top,
            viewport_height,
        ) else {
            return false;
        };
        // Target offsets are compared unscrolled, inside the container's content
        self.viewport
            .total_offset(element)
            .is_some_and(|layout_top| band.overlaps_span(layout_top, height))
    }

    fn publish(&mut self, next: Option<String>) {
        if next == self.active {
            return;
        }
        debug!(from = ?self.active, to = ?next, "active spy target changed");
        self.active = next;
        let active = self.active.as_deref();
        for callback in self.subscribers.values_mut() {
            callback(active);
        }
    }

    // =========================================================================
    // Viewport access
    // =========================================================================

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Mutable access for hosts that drive geometry through the spy
    ///
    /// Changes are not picked up until the next notification or check.
    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn options(&self) -> &SpyOptions {
        &self.options
    }
}
