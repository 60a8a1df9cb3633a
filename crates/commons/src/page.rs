//! Pagination model: sorts, page requests and pages of items.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Default zero-based page index.
pub const DEFAULT_PAGE_INDEX: u64 = 0;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 25;

/// Direction of a sort, either ascending or descending.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

/// A direction for a property.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sort {
    property: String,
    direction: Direction,
}

impl Sort {
    pub fn new(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }

    /// Ascending sort on a property.
    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(property, Direction::Asc)
    }

    /// Descending sort on a property.
    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(property, Direction::Desc)
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// The request for a page, with a zero based index.
///
/// Page index, size, and sorts to be applied. Sorts are deduplicated per
/// property (case-insensitive), keeping the first occurrence in order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "PageRequestWire")]
pub struct PageRequest {
    index: u64,
    size: u64,
    sorts: Vec<Sort>,
}

/// Wire shape accepting missing fields, normalized through the constructor.
#[derive(Deserialize)]
struct PageRequestWire {
    #[serde(default = "default_index")]
    index: u64,
    #[serde(default = "default_size")]
    size: u64,
    #[serde(default)]
    sorts: Vec<Sort>,
}

fn default_index() -> u64 {
    DEFAULT_PAGE_INDEX
}

fn default_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl From<PageRequestWire> for PageRequest {
    fn from(wire: PageRequestWire) -> Self {
        PageRequest::sorted(wire.index, wire.size, wire.sorts)
    }
}

impl PageRequest {
    /// A request for the given page, with the default size and no sorts.
    pub fn new(index: u64) -> Self {
        Self::of(index, DEFAULT_PAGE_SIZE)
    }

    /// A request for the given page and size, with no sorts.
    pub fn of(index: u64, size: u64) -> Self {
        Self::sorted(index, size, Vec::new())
    }

    /// A request for the given page and size, applying the given sorts.
    pub fn sorted(index: u64, size: u64, sorts: Vec<Sort>) -> Self {
        Self {
            index,
            size,
            sorts: dedup_sorts(sorts),
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    /// Offset of the first item of the requested page.
    pub fn offset(&self) -> u64 {
        self.index.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_INDEX)
    }
}

/// Keeps one sort per property, first occurrence wins.
fn dedup_sorts(sorts: Vec<Sort>) -> Vec<Sort> {
    let mut seen = HashSet::new();
    sorts
        .into_iter()
        .filter(|sort| seen.insert(sort.property().to_lowercase()))
        .collect()
}

/// Number of pages needed for `total_items` items, `page_size` at a time.
pub fn total_pages(total_items: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        0
    } else {
        total_items.div_ceil(page_size)
    }
}

/// A page of items.
///
/// An empty result set still counts as one page, so `total_pages` is never
/// below 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    total_items: u64,
    total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_items: u64, total_pages: u64) -> Self {
        Self {
            items,
            total_items,
            total_pages: total_pages.max(1),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Number of items in this page.
    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }
}
