//! In-memory page layout
//!
//! [`PageLayout`] is a small element tree that implements [`Viewport`]. Each
//! element stores its offset relative to its offset parent, its height and,
//! for scroll containers, how far its content is scrolled. Hosts that already
//! have computed layout can mirror it here; tests and the CLI simulator build
//! pages directly or load them from a [`PageSpec`].
//!
//! # Example
//!
//! ```rust
//! use blinc_spy::page::PageLayout;
//! use blinc_spy::viewport::Viewport;
//!
//! let mut page = PageLayout::new(600.0);
//! page.insert("panel", None, 100.0, 300.0).unwrap();
//! page.insert("row", Some("panel"), 400.0, 50.0).unwrap();
//!
//! page.scroll_container_to("panel", 100.0).unwrap();
//!
//! assert_eq!(page.total_offset("row"), Some(500.0));
//! assert_eq!(page.element_offset_top("row"), Some(400.0));
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{Result, SpyError};
use crate::viewport::Viewport;

new_key_type! {
    /// Handle to an element on a [`PageLayout`]
    pub struct NodeId;
}

/// Offset-parent chain from an element up to the page root
type Chain = SmallVec<[NodeId; 8]>;

#[derive(Debug, Clone)]
struct PageNode {
    id: String,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    /// Offset from the parent's content top (or the page top for roots)
    offset_top: f32,
    height: f32,
    /// Content scroll position, only non-zero for scroll containers
    scroll_top: f32,
}

/// An element tree with window scroll state
#[derive(Debug, Clone)]
pub struct PageLayout {
    nodes: SlotMap<NodeId, PageNode>,
    ids: FxHashMap<String, NodeId>,
    /// Root elements in document order
    roots: Vec<NodeId>,
    scroll_top: f32,
    viewport_height: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_HEIGHT)
    }
}

impl PageLayout {
    /// Create an empty page with the given window height
    pub fn new(viewport_height: f32) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            ids: FxHashMap::default(),
            roots: Vec::new(),
            scroll_top: 0.0,
            viewport_height: viewport_height.max(0.0),
        }
    }

    /// Build a page from a description
    ///
    /// Parents must be listed before their children.
    pub fn from_spec(spec: &PageSpec) -> Result<Self> {
        let mut page = Self::new(spec.viewport_height);
        for element in &spec.elements {
            page.insert(
                &element.id,
                element.parent.as_deref(),
                element.top,
                element.height,
            )?;
            if element.scroll_top != 0.0 {
                page.set_scroll_top_unclamped(&element.id, element.scroll_top)?;
            }
        }
        if !spec.scroll_top.is_finite() {
            return Err(SpyError::InvalidGeometry {
                element: "window".to_string(),
                reason: format!("scroll_top must be a finite number (got {})", spec.scroll_top),
            });
        }
        page.scroll_window_to(spec.scroll_top);
        Ok(page)
    }

    // =========================================================================
    // Elements
    // =========================================================================

    /// Add an element under `parent` (or at the page root)
    pub fn insert(
        &mut self,
        id: &str,
        parent: Option<&str>,
        offset_top: f32,
        height: f32,
    ) -> Result<NodeId> {
        if self.ids.contains_key(id) {
            return Err(SpyError::DuplicateElement(id.to_string()));
        }
        validate_geometry(id, offset_top, height)?;

        let parent = match parent {
            Some(parent) => Some(self.node(parent).ok_or_else(|| SpyError::UnknownParent {
                element: id.to_string(),
                parent: parent.to_string(),
            })?),
            None => None,
        };

        let node = self.nodes.insert(PageNode {
            id: id.to_string(),
            parent,
            children: SmallVec::new(),
            offset_top,
            height,
            scroll_top: 0.0,
        });
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent_node) => parent_node.children.push(node),
            None => self.roots.push(node),
        }
        self.ids.insert(id.to_string(), node);

        tracing::trace!(id, offset_top, height, "page element inserted");
        Ok(node)
    }

    /// Remove an element and everything inside it
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let node = self
            .node(id)
            .ok_or_else(|| SpyError::ElementNotFound(id.to_string()))?;

        match self.nodes[node].parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(parent) {
                    parent_node.children.retain(|c| *c != node);
                }
            }
            None => self.roots.retain(|r| *r != node),
        }

        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(removed) = self.nodes.remove(current) {
                self.ids.remove(&removed.id);
                stack.extend(removed.children);
            }
        }
        Ok(())
    }

    /// Update an element's offset and height
    pub fn set_geometry(&mut self, id: &str, offset_top: f32, height: f32) -> Result<()> {
        validate_geometry(id, offset_top, height)?;
        let node = self.node_mut(id)?;
        node.offset_top = offset_top;
        node.height = height;
        Ok(())
    }

    /// Look up an element handle by id
    pub fn node(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// Element ids in document order (depth first)
    pub fn element_ids(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if let Some(n) = self.nodes.get(node) {
                out.push(n.id.as_str());
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    /// Number of elements on the page
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the page has no elements
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// Scroll the window, clamped to the document's scrollable range
    ///
    /// Non-finite positions are ignored.
    pub fn scroll_window_to(&mut self, y: f32) {
        if !y.is_finite() {
            tracing::debug!(y, "ignoring non-finite window scroll");
            return;
        }
        let max = (self.document_height() - self.viewport_height).max(0.0);
        self.scroll_top = y.clamp(0.0, max);
    }

    /// Change the window height, re-clamping the scroll position
    pub fn resize_viewport(&mut self, height: f32) {
        self.viewport_height = height.max(0.0);
        self.scroll_window_to(self.scroll_top);
    }

    /// Scroll a container's content, clamped to its scrollable range
    pub fn scroll_container_to(&mut self, id: &str, y: f32) -> Result<()> {
        if !y.is_finite() {
            return Err(SpyError::InvalidGeometry {
                element: id.to_string(),
                reason: format!("scroll_top must be a finite number (got {y})"),
            });
        }
        let max = (self.content_height(id)? - self.node_ref(id)?.height).max(0.0);
        self.node_mut(id)?.scroll_top = y.clamp(0.0, max);
        Ok(())
    }

    /// Height of all root content
    pub fn document_height(&self) -> f32 {
        self.roots
            .iter()
            .filter_map(|r| self.nodes.get(*r))
            .map(|n| n.offset_top + n.height)
            .fold(0.0, f32::max)
    }

    /// Height of a container's content (the lowest child's bottom edge)
    pub fn content_height(&self, id: &str) -> Result<f32> {
        let node = self.node_ref(id)?;
        Ok(node
            .children
            .iter()
            .filter_map(|c| self.nodes.get(*c))
            .map(|n| n.offset_top + n.height)
            .fold(0.0, f32::max))
    }

    // Descriptions may place a container mid-scroll before its content is known
    fn set_scroll_top_unclamped(&mut self, id: &str, y: f32) -> Result<()> {
        if !y.is_finite() || y < 0.0 {
            return Err(SpyError::InvalidGeometry {
                element: id.to_string(),
                reason: format!("scroll_top must be a finite, non-negative number (got {y})"),
            });
        }
        self.node_mut(id)?.scroll_top = y;
        Ok(())
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn node_ref(&self, id: &str) -> Result<&PageNode> {
        self.node(id)
            .and_then(|n| self.nodes.get(n))
            .ok_or_else(|| SpyError::ElementNotFound(id.to_string()))
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut PageNode> {
        let node = self
            .node(id)
            .ok_or_else(|| SpyError::ElementNotFound(id.to_string()))?;
        self.nodes
            .get_mut(node)
            .ok_or_else(|| SpyError::ElementNotFound(id.to_string()))
    }

    /// The element followed by each of its offset parents
    fn chain(&self, id: &str) -> Option<Chain> {
        let mut chain = Chain::new();
        let mut current = self.node(id);
        while let Some(node) = current {
            chain.push(node);
            current = self.nodes.get(node)?.parent;
        }
        (!chain.is_empty()).then_some(chain)
    }
}

impl Viewport for PageLayout {
    fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    fn element_offset_top(&self, id: &str) -> Option<f32> {
        let chain = self.chain(id)?;
        let layout: f32 = chain.iter().map(|n| self.nodes[*n].offset_top).sum();
        // Every ancestor's content scroll shifts the element up
        let scrolled: f32 = chain[1..].iter().map(|n| self.nodes[*n].scroll_top).sum();
        Some(layout - scrolled)
    }

    fn element_height(&self, id: &str) -> Option<f32> {
        self.node_ref(id).ok().map(|n| n.height)
    }

    fn element_scroll_top(&self, id: &str) -> Option<f32> {
        self.node_ref(id).ok().map(|n| n.scroll_top)
    }

    fn total_offset(&self, id: &str) -> Option<f32> {
        let chain = self.chain(id)?;
        Some(chain.iter().map(|n| self.nodes[*n].offset_top).sum())
    }

    fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }
}

fn validate_geometry(id: &str, offset_top: f32, height: f32) -> Result<()> {
    if !offset_top.is_finite() {
        return Err(SpyError::InvalidGeometry {
            element: id.to_string(),
            reason: format!("offset must be finite (got {offset_top})"),
        });
    }
    if !height.is_finite() || height < 0.0 {
        return Err(SpyError::InvalidGeometry {
            element: id.to_string(),
            reason: format!("height must be a finite, non-negative number (got {height})"),
        });
    }
    Ok(())
}

// =============================================================================
// Page descriptions
// =============================================================================

/// Window height used when a description doesn't give one
pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 800.0;

fn default_viewport_height() -> f32 {
    DEFAULT_VIEWPORT_HEIGHT
}

/// Serializable description of a page
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PageSpec {
    /// Window height
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    /// Initial window scroll position
    #[serde(default)]
    pub scroll_top: f32,
    /// Elements in document order
    #[serde(default, rename = "element")]
    pub elements: Vec<ElementSpec>,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            scroll_top: 0.0,
            elements: Vec::new(),
        }
    }
}

/// One element of a [`PageSpec`]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ElementSpec {
    pub id: String,
    /// Offset parent id; omitted for elements placed on the page root
    #[serde(default)]
    pub parent: Option<String>,
    /// Offset from the parent's content top
    pub top: f32,
    pub height: f32,
    /// Initial content scroll for scroll containers
    #[serde(default)]
    pub scroll_top: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_page() -> PageLayout {
        let mut page = PageLayout::new(600.0);
        page.insert("header", None, 0.0, 100.0).unwrap();
        page.insert("main", None, 100.0, 2000.0).unwrap();
        page.insert("panel", Some("main"), 200.0, 400.0).unwrap();
        page.insert("a", Some("panel"), 0.0, 300.0).unwrap();
        page.insert("b", Some("panel"), 300.0, 300.0).unwrap();
        page.insert("c", Some("panel"), 600.0, 300.0).unwrap();
        page
    }

    #[test]
    fn test_total_offset_sums_chain() {
        let page = nested_page();
        assert_eq!(page.total_offset("main"), Some(100.0));
        assert_eq!(page.total_offset("panel"), Some(300.0));
        assert_eq!(page.total_offset("c"), Some(900.0));
        assert_eq!(page.total_offset("missing"), None);
    }

    #[test]
    fn test_offset_top_follows_container_scroll() {
        let mut page = nested_page();
        page.scroll_container_to("panel", 250.0).unwrap();

        assert_eq!(page.total_offset("b"), Some(600.0));
        assert_eq!(page.element_offset_top("b"), Some(350.0));
        // The container itself is not shifted by its own scroll
        assert_eq!(page.element_offset_top("panel"), Some(300.0));
        assert_eq!(page.element_scroll_top("panel"), Some(250.0));
    }

    #[test]
    fn test_container_scroll_is_clamped() {
        let mut page = nested_page();
        assert_eq!(page.content_height("panel").unwrap(), 900.0);

        page.scroll_container_to("panel", 10_000.0).unwrap();
        assert_eq!(page.element_scroll_top("panel"), Some(500.0));

        page.scroll_container_to("panel", -5.0).unwrap();
        assert_eq!(page.element_scroll_top("panel"), Some(0.0));
    }

    #[test]
    fn test_window_scroll_is_clamped() {
        let mut page = nested_page();
        assert_eq!(page.document_height(), 2100.0);

        page.scroll_window_to(5000.0);
        assert_eq!(page.scroll_top(), 1500.0);

        page.resize_viewport(2000.0);
        assert_eq!(page.scroll_top(), 100.0);
    }

    #[test]
    fn test_non_finite_scroll_positions() {
        let mut page = nested_page();
        page.scroll_window_to(300.0);
        page.scroll_container_to("panel", 100.0).unwrap();

        page.scroll_window_to(f32::NAN);
        page.scroll_window_to(f32::INFINITY);
        assert_eq!(page.scroll_top(), 300.0);

        assert!(matches!(
            page.scroll_container_to("panel", f32::NAN),
            Err(SpyError::InvalidGeometry { .. })
        ));
        assert_eq!(page.element_scroll_top("panel"), Some(100.0));
    }

    #[test]
    fn test_insert_rejects_duplicates_and_unknown_parents() {
        let mut page = nested_page();
        assert_eq!(
            page.insert("a", None, 0.0, 10.0),
            Err(SpyError::DuplicateElement("a".into()))
        );
        assert_eq!(
            page.insert("z", Some("nope"), 0.0, 10.0),
            Err(SpyError::UnknownParent {
                element: "z".into(),
                parent: "nope".into()
            })
        );
        assert!(matches!(
            page.insert("neg", None, 0.0, -1.0),
            Err(SpyError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut page = nested_page();
        page.remove("panel").unwrap();

        assert_eq!(page.len(), 2);
        assert!(!page.contains("a"));
        assert!(!page.contains("panel"));
        assert_eq!(page.element_ids(), vec!["header", "main"]);
        assert_eq!(
            page.remove("panel"),
            Err(SpyError::ElementNotFound("panel".into()))
        );
    }

    #[test]
    fn test_element_ids_in_document_order() {
        let page = nested_page();
        assert_eq!(
            page.element_ids(),
            vec!["header", "main", "panel", "a", "b", "c"]
        );
    }

    #[test]
    fn test_from_spec() {
        let spec = PageSpec {
            viewport_height: 500.0,
            scroll_top: 200.0,
            elements: vec![
                ElementSpec {
                    id: "list".into(),
                    parent: None,
                    top: 0.0,
                    height: 1000.0,
                    scroll_top: 0.0,
                },
                ElementSpec {
                    id: "inner".into(),
                    parent: Some("list".into()),
                    top: 50.0,
                    height: 20.0,
                    scroll_top: 0.0,
                },
            ],
        };

        let page = PageLayout::from_spec(&spec).unwrap();
        assert_eq!(page.viewport_height(), 500.0);
        assert_eq!(page.scroll_top(), 200.0);
        assert_eq!(page.total_offset("inner"), Some(50.0));
    }

    #[test]
    fn test_from_spec_requires_parents_first() {
        let spec = PageSpec {
            elements: vec![ElementSpec {
                id: "child".into(),
                parent: Some("later".into()),
                top: 0.0,
                height: 10.0,
                scroll_top: 0.0,
            }],
            ..Default::default()
        };
        assert!(matches!(
            PageLayout::from_spec(&spec),
            Err(SpyError::UnknownParent { .. })
        ));
    }

    #[test]
    fn test_from_spec_rejects_non_finite_window_scroll() {
        let spec = PageSpec {
            scroll_top: f32::NAN,
            elements: vec![ElementSpec {
                id: "body".into(),
                parent: None,
                top: 0.0,
                height: 2000.0,
                scroll_top: 0.0,
            }],
            ..Default::default()
        };
        assert!(matches!(
            PageLayout::from_spec(&spec),
            Err(SpyError::InvalidGeometry { element, .. }) if element == "window"
        ));
    }
}
