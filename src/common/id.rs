//! Document-unique identifiers and the shared MaxUnitID counter.
//!
//! Every page, object and resource of a document carries an [`Id`]. Ids are
//! handed out by one [`IdAllocator`] per document; pages, layers and resource
//! registries receive a handle to the same counter when they are created, so
//! ids stay unique no matter which scope allocates them.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// An ST_ID / ST_RefID value. Zero means "unset".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Id(u32);

impl Id {
    /// The unset id.
    pub const UNSET: Id = Id(0);

    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this id has been assigned.
    #[inline]
    pub const fn is_set(self) -> bool {
        self.0 != 0
    }

    /// Parse a decimal id as written in XML.
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<u32>().ok().map(Id)
    }
}

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Id(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = itoa::Buffer::new();
        f.write_str(buf.format(self.0))
    }
}

/// Shared, monotonically increasing id counter of one document.
///
/// Cloning the allocator shares the counter. The stored value is the
/// document's MaxUnitID: the largest id ever issued or observed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdAllocator {
    max: Rc<Cell<u32>>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a counter that continues after `max_unit_id`.
    pub fn starting_at(max_unit_id: u32) -> Self {
        Self {
            max: Rc::new(Cell::new(max_unit_id)),
        }
    }

    /// Issue the next id.
    pub fn next_id(&self) -> Id {
        let next = self.max.get().saturating_add(1);
        self.max.set(next);
        Id(next)
    }

    /// Record an id allocated elsewhere (parsed from XML, cloned by a caller)
    /// so the counter never issues it again.
    pub fn observe(&self, id: Id) {
        if id.0 > self.max.get() {
            self.max.set(id.0);
        }
    }

    /// Current MaxUnitID.
    #[inline]
    pub fn max_unit_id(&self) -> u32 {
        self.max.get()
    }

    /// Whether two handles share the same counter.
    pub fn shares_counter_with(&self, other: &IdAllocator) -> bool {
        Rc::ptr_eq(&self.max, &other.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_id() {
        assert!(!Id::UNSET.is_set());
        assert!(Id::new(3).is_set());
        assert_eq!(Id::default(), Id::UNSET);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(Id::parse(" 42 "), Some(Id::new(42)));
        assert_eq!(Id::parse("-1"), None);
        assert_eq!(Id::parse("abc"), None);
        assert_eq!(Id::new(17).to_string(), "17");
    }

    #[test]
    fn test_shared_counter() {
        let ids = IdAllocator::new();
        let layer_handle = ids.clone();
        assert_eq!(ids.next_id(), Id::new(1));
        assert_eq!(layer_handle.next_id(), Id::new(2));
        assert_eq!(ids.max_unit_id(), 2);
        assert!(ids.shares_counter_with(&layer_handle));
    }

    #[test]
    fn test_observe_never_lowers() {
        let ids = IdAllocator::starting_at(10);
        ids.observe(Id::new(4));
        assert_eq!(ids.max_unit_id(), 10);
        ids.observe(Id::new(25));
        assert_eq!(ids.next_id(), Id::new(26));
    }
}
