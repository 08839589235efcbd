//! Offset pagination shared by the task and team contexts.

use serde::{Deserialize, Serialize};

/// A 1-based page request.
///
/// Zero values are raised to 1 so that every request maps to a valid offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Creates a page request.
    #[must_use]
    pub const fn new(page: u32, limit: u32) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            limit: if limit == 0 { 1 } else { limit },
        }
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Returns the number of rows skipped before this page.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Default and maximum page sizes applied by the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimits {
    default_limit: u32,
    max_limit: u32,
}

impl ListLimits {
    /// Creates list limits. `max_limit` is raised to `default_limit` if lower.
    #[must_use]
    pub const fn new(default_limit: u32, max_limit: u32) -> Self {
        let floor = if default_limit == 0 { 1 } else { default_limit };
        Self {
            default_limit: floor,
            max_limit: if max_limit < floor { floor } else { max_limit },
        }
    }

    /// Returns the default page size.
    #[must_use]
    pub const fn default_limit(self) -> u32 {
        self.default_limit
    }

    /// Returns the maximum page size.
    #[must_use]
    pub const fn max_limit(self) -> u32 {
        self.max_limit
    }

    /// Builds a page request, defaulting a missing or zero limit and clamping
    /// an oversized one.
    #[must_use]
    pub fn page_request(self, page: u32, limit: Option<u32>) -> PageRequest {
        let effective = match limit {
            None | Some(0) => self.default_limit,
            Some(requested) => requested.min(self.max_limit),
        };
        PageRequest::new(page, effective)
    }
}

impl Default for ListLimits {
    fn default() -> Self {
        Self::new(10, 100)
    }
}

/// A page of entities together with the pre-pagination total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult<T> {
    /// Entities on the requested page.
    pub items: Vec<T>,
    /// Requested 1-based page number.
    pub page: u32,
    /// Requested page size.
    pub limit: u32,
    /// Number of matching entities across all pages.
    pub total_items: u64,
}

impl<T> ListResult<T> {
    /// Creates a list result for the given request.
    #[must_use]
    pub const fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page(),
            limit: request.limit(),
            total_items,
        }
    }

    /// Returns the number of pages needed to hold every matching entity.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(u64::from(self.limit.max(1)))
    }
}
