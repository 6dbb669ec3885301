//! Notifications the spy reacts to
//!
//! The host forwards these from its event loop. The spy only listens while it
//! is spying; after [`ScrollSpy::stop_spying`](crate::spy::ScrollSpy::stop_spying)
//! they are dropped.

/// A scroll or resize notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpyEvent {
    /// The window scrolled
    Scroll,
    /// The window was resized
    Resize,
    /// A scroll container scrolled its content
    ContainerScroll(String),
}

impl SpyEvent {
    pub fn container_scroll(id: impl Into<String>) -> Self {
        Self::ContainerScroll(id.into())
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::ContainerScroll(_) => "container-scroll",
        }
    }
}
