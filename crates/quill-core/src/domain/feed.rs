//! Feed scopes and pagination.

use serde::Serialize;
use uuid::Uuid;

/// Posts per feed page.
pub const PAGE_SIZE: u64 = 10;

/// Which posts a feed contains. Every scope is ordered newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    /// Every post on the site.
    All,
    /// Posts tagged with one group.
    Group(i32),
    /// Posts written by one author.
    Author(Uuid),
    /// Posts by the authors the given user follows.
    FollowedBy(Uuid),
}

/// A requested page, as parsed from the `page` query parameter.
///
/// Resolution follows the lenient paginator rules: anything that is not an
/// integer means the first page, any out-of-range integer means the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    requested: Option<i64>,
    pub size: u64,
}

impl PageRequest {
    pub fn parse(raw: Option<&str>) -> Self {
        Self {
            requested: raw.and_then(|s| s.trim().parse().ok()),
            size: PAGE_SIZE,
        }
    }

    pub fn first() -> Self {
        Self {
            requested: Some(1),
            size: PAGE_SIZE,
        }
    }

    /// The integer page asked for, if the raw value parsed.
    pub fn requested(&self) -> Option<i64> {
        self.requested
    }

    /// Resolve to a 1-based page number given the total page count.
    pub fn resolve(&self, num_pages: u64) -> u64 {
        let num_pages = num_pages.max(1);
        match self.requested {
            None => 1,
            Some(n) if n >= 1 && (n as u64) <= num_pages => n as u64,
            Some(_) => num_pages,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Number of pages needed for `total_items`; an empty list still has one page.
pub fn page_count(total_items: u64, size: u64) -> u64 {
    total_items.div_ceil(size.max(1)).max(1)
}

/// One page of a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: u64, num_pages: u64, total_items: u64) -> Self {
        Self {
            items,
            number,
            num_pages: num_pages.max(1),
            total_items,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then_some(self.number - 1)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total_items: self.total_items,
        }
    }
}
