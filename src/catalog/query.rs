//! Catalog query snapshots.
//!
//! A [`Query`] is an immutable value: every edit produces a new snapshot
//! through the `with_*` builders, which is what lets the controller compare
//! "before" and "after" to decide whether a fetch is needed.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of exhibits requested per catalog page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Filterable exhibit attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Collection,
    Culture,
    Medium,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [
        FilterField::Collection,
        FilterField::Culture,
        FilterField::Medium,
    ];

    /// Query-string parameter name for this filter.
    pub fn param_name(&self) -> &'static str {
        match self {
            FilterField::Collection => "collection",
            FilterField::Culture => "culture",
            FilterField::Medium => "medium",
        }
    }

    /// Values offered as suggestions by the catalog front end.
    ///
    /// The catalog accepts any value; these are just the common ones.
    pub fn suggestions(&self) -> &'static [&'static str] {
        match self {
            FilterField::Collection => &[
                "Coins",
                "Drawings",
                "Paintings",
                "Photographs",
                "Prints",
                "Sculpture",
            ],
            FilterField::Culture => &[
                "American", "British", "Chinese", "English", "French", "Italian", "Japanese",
                "Roman",
            ],
            FilterField::Medium => &["silver", "Wood", "Paper", "bronze", "marble", "Watercolor"],
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param_name())
    }
}

impl FromStr for FilterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "collection" => Ok(FilterField::Collection),
            "culture" => Ok(FilterField::Culture),
            "medium" => Ok(FilterField::Medium),
            other => Err(format!(
                "unknown filter '{}' (expected collection, culture or medium)",
                other
            )),
        }
    }
}

/// Full set of user-controlled parameters for one catalog request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    page: NonZeroU32,
    page_size: NonZeroU32,
    search_text: String,
    collection: String,
    culture: String,
    medium: String,
}

impl Query {
    /// First page, no search text, no filters.
    pub fn new(page_size: NonZeroU32) -> Self {
        Self {
            page: NonZeroU32::MIN,
            page_size,
            search_text: String::new(),
            collection: String::new(),
            culture: String::new(),
            medium: String::new(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page.get()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.get()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn filter(&self, field: FilterField) -> &str {
        match field {
            FilterField::Collection => &self.collection,
            FilterField::Culture => &self.culture,
            FilterField::Medium => &self.medium,
        }
    }

    /// True when any filter or the search text is non-blank.
    pub fn is_filtered(&self) -> bool {
        !is_blank(&self.search_text) || FilterField::ALL.iter().any(|f| !is_blank(self.filter(*f)))
    }

    pub fn with_page(&self, page: NonZeroU32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Changes a filter. Changing what is searched always returns to page 1;
    /// setting the value it already has changes nothing. Blank values are
    /// stored as empty.
    pub fn with_filter(&self, field: FilterField, value: impl Into<String>) -> Self {
        let value = normalized(value.into());
        if self.filter(field) == value {
            return self.clone();
        }
        let mut next = self.with_page(NonZeroU32::MIN);
        match field {
            FilterField::Collection => next.collection = value,
            FilterField::Culture => next.culture = value,
            FilterField::Medium => next.medium = value,
        }
        next
    }

    /// Changes the free-text search, same rules as [`Query::with_filter`].
    pub fn with_search_text(&self, text: impl Into<String>) -> Self {
        let text = normalized(text.into());
        if self.search_text == text {
            return self.clone();
        }
        Self {
            page: NonZeroU32::MIN,
            search_text: text,
            ..self.clone()
        }
    }

    /// Same filters, search text and page size; the page may differ.
    pub fn same_results_as(&self, other: &Query) -> bool {
        self.with_page(NonZeroU32::MIN) == other.with_page(NonZeroU32::MIN)
    }

    /// All filters and search text emptied, page 1, same page size.
    pub fn cleared(&self) -> Self {
        Self::new(self.page_size)
    }

    /// Query-string parameters for the catalog endpoint.
    ///
    /// `page` and `pageSize` are always present. Filters and the search text
    /// are included only when non-blank, in the order collection, culture,
    /// medium, query.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        for field in FilterField::ALL {
            let value = self.filter(field);
            if !is_blank(value) {
                params.push((field.param_name(), value.to_string()));
            }
        }
        if !is_blank(&self.search_text) {
            params.push(("query", self.search_text.clone()));
        }
        params
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::new(NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN))
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn normalized(value: String) -> String {
    if is_blank(&value) {
        String::new()
    } else {
        value
    }
}
