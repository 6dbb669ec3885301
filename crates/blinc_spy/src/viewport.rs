//! Geometry queries the spy needs from its host
//!
//! The spy never measures anything itself. A host (a windowed app, a test,
//! the CLI simulator) implements [`Viewport`] on top of whatever already holds
//! computed layout, and the spy reads from it on every check.
//!
//! Elements are addressed by string id, the same way element queries work
//! elsewhere in Blinc. Every element query returns `None` for an id the host
//! does not know about.

/// Read access to window scroll state and element geometry
pub trait Viewport {
    /// Vertical scroll position of the window
    fn scroll_top(&self) -> f32;

    /// Height of the visible window area
    fn viewport_height(&self) -> f32;

    /// Top edge of an element in page coordinates
    ///
    /// Accounts for the scroll position of every scroll container the element
    /// sits in, so a scrolled-away element reports where it is drawn.
    fn element_offset_top(&self, id: &str) -> Option<f32>;

    /// Height of an element
    fn element_height(&self, id: &str) -> Option<f32>;

    /// How far an element's own content is scrolled (scroll containers)
    fn element_scroll_top(&self, id: &str) -> Option<f32>;

    /// Layout offset of an element: the sum of offsets along its
    /// offset-parent chain, ignoring any container scrolling
    fn total_offset(&self, id: &str) -> Option<f32>;

    /// Whether the host knows an element with this id
    fn contains(&self, id: &str) -> bool {
        self.element_height(id).is_some()
    }
}

impl<V: Viewport + ?Sized> Viewport for Box<V> {
    fn scroll_top(&self) -> f32 {
        (**self).scroll_top()
    }

    fn viewport_height(&self) -> f32 {
        (**self).viewport_height()
    }

    fn element_offset_top(&self, id: &str) -> Option<f32> {
        (**self).element_offset_top(id)
    }

    fn element_height(&self, id: &str) -> Option<f32> {
        (**self).element_height(id)
    }

    fn element_scroll_top(&self, id: &str) -> Option<f32> {
        (**self).element_scroll_top(id)
    }

    fn total_offset(&self, id: &str) -> Option<f32> {
        (**self).total_offset(id)
    }

    fn contains(&self, id: &str) -> bool {
        (**self).contains(id)
    }
}
