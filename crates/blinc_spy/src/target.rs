//! Spy targets

/// A page section the spy watches
///
/// `name` is what gets published while the section is active, `element` is
/// the id used to look up its geometry. They are often the same string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpyTarget {
    pub name: String,
    pub element: String,
}

impl SpyTarget {
    pub fn new(name: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            element: element.into(),
        }
    }

    /// A target whose published name is its element id
    pub fn element(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            element: id,
        }
    }
}
