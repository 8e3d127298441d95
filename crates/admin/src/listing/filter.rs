//! Search, status filter, sort and pagination for entity lists.
//!
//! Everything here is pure: the same [`FilterState`] over the same records
//! always yields the same page.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::entities::wire::PLACEHOLDER;

/// Rows per page.
pub const PAGE_SIZE: usize = 10;

/// Status filter value meaning "no status filter".
pub const STATUS_ALL: &str = "all";

/// A record that can be searched, filtered and sorted in a list.
pub trait Listable {
    /// Stable numeric id.
    fn id(&self) -> i64;

    /// Fields matched by the search box.
    fn search_fields(&self) -> Vec<&str>;

    /// Status value compared against the status filter.
    fn status(&self) -> Option<&str>;

    /// Creation time; records without one sort last.
    fn created_at(&self) -> Option<DateTime<Utc>>;

    /// Key for the "Name (A-Z)" sort.
    fn sort_name(&self) -> &str;

    /// Key for the "Company (A-Z)" sort.
    fn sort_company(&self) -> &str {
        self.sort_name()
    }

    /// Case-insensitive substring match against every search field.
    /// Placeholders for missing values never match.
    fn matches_search(&self, needle_lowercase: &str) -> bool {
        needle_lowercase.is_empty()
            || self
                .search_fields()
                .iter()
                .filter(|field| **field != PLACEHOLDER)
                .any(|field| field.to_lowercase().contains(needle_lowercase))
    }
}

/// List ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    Name,
    Company,
}

impl SortKey {
    pub const ALL: [Self; 4] = [Self::Newest, Self::Oldest, Self::Name, Self::Company];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Name => "name",
            Self::Company => "company",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::Oldest => "Oldest",
            Self::Name => "Name (A-Z)",
            Self::Company => "Company (A-Z)",
        }
    }

    /// Unknown values fall back to [`SortKey::Newest`].
    #[must_use]
    pub fn parse_or_default(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(value.trim()))
            .unwrap_or_default()
    }

    fn compare<T: Listable>(self, a: &T, b: &T) -> Ordering {
        match self {
            Self::Newest => by_created(a, b, true),
            Self::Oldest => by_created(a, b, false),
            Self::Name => by_text(a.sort_name(), b.sort_name()),
            Self::Company => by_text(a.sort_company(), b.sort_company()),
        }
    }
}

/// Records without a timestamp go after all dated ones in either direction;
/// ties fall back to the id.
fn by_created<T: Listable>(a: &T, b: &T, newest_first: bool) -> Ordering {
    let directed = |ord: Ordering| if newest_first { ord.reverse() } else { ord };
    match (a.created_at(), b.created_at()) {
        (Some(x), Some(y)) => directed(x.cmp(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| directed(a.id().cmp(&b.id())))
}

fn by_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Query string of a list page: `?q=&status=&sort=&page=`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

/// Search term, status filter, sort key and requested page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    search: String,
    status: String,
    sort: SortKey,
    page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: STATUS_ALL.to_string(),
            sort: SortKey::default(),
            page: 1,
        }
    }
}

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list page's query string. Malformed values fall back to
    /// the defaults.
    #[must_use]
    pub fn from_query(query: &ListQuery) -> Self {
        let mut state = Self::new();
        if let Some(q) = &query.q {
            state.set_search(q);
        }
        if let Some(status) = &query.status {
            state.set_status(status);
        }
        if let Some(sort) = &query.sort {
            state.set_sort(SortKey::parse_or_default(sort));
        }
        let page = query
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .unwrap_or(1);
        state.set_page(page);
        state
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub const fn sort(&self) -> SortKey {
        self.sort
    }

    /// Requested page, before clamping to the collection.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// A changed search term sends the list back to page 1.
    pub fn set_search(&mut self, term: &str) {
        let term = term.trim();
        if term != self.search {
            term.clone_into(&mut self.search);
            self.page = 1;
        }
    }

    /// A changed status filter sends the list back to page 1. Blank means
    /// [`STATUS_ALL`].
    pub fn set_status(&mut self, status: &str) {
        let status = status.trim();
        let status = if status.is_empty() { STATUS_ALL } else { status };
        if status != self.status {
            status.clone_into(&mut self.status);
            self.page = 1;
        }
    }

    pub const fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Called when the backing collection is replaced.
    pub const fn reset_page(&mut self) {
        self.page = 1;
    }

    /// Whether a search term or status filter is active.
    #[must_use]
    pub fn is_filtering(&self) -> bool {
        !self.search.is_empty() || !self.status.eq_ignore_ascii_case(STATUS_ALL)
    }

    fn keeps<T: Listable>(&self, item: &T, needle: &str) -> bool {
        let status_ok = self.status.eq_ignore_ascii_case(STATUS_ALL)
            || item
                .status()
                .is_some_and(|s| s.eq_ignore_ascii_case(&self.status));
        status_ok && item.matches_search(needle)
    }

    /// Filter and sort `items`. The sort is stable.
    #[must_use]
    pub fn apply<'a, T: Listable>(&self, items: &'a [T]) -> Vec<&'a T> {
        let needle = self.search.to_lowercase();
        let mut kept: Vec<&T> = items.iter().filter(|i| self.keeps(*i, &needle)).collect();
        kept.sort_by(|a, b| self.sort.compare(*a, *b));
        kept
    }
}

/// One page of a filtered list.
#[derive(Debug)]
pub struct Page<'a, T> {
    pub items: Vec<&'a T>,
    /// 1-based page number, clamped to `1..=total_pages`.
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// 1-based index of the first row shown, 0 when empty.
    #[must_use]
    pub fn first_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.number - 1) * PAGE_SIZE + 1
        }
    }

    /// 1-based index of the last row shown, 0 when empty.
    #[must_use]
    pub fn last_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_index() + self.items.len() - 1
        }
    }
}

/// Number of pages for `total` rows; at least 1.
#[must_use]
pub const fn total_pages(total: usize) -> usize {
    if total == 0 { 1 } else { total.div_ceil(PAGE_SIZE) }
}

/// Slice `rows` to `page`, clamped to `[1, total_pages]`.
#[must_use]
pub fn paginate<T>(rows: Vec<&T>, page: usize) -> Page<'_, T> {
    let total_items = rows.len();
    let total_pages = total_pages(total_items);
    let number = page.clamp(1, total_pages);
    let items = rows
        .into_iter()
        .skip((number - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    Page {
        items,
        number,
        total_pages,
        total_items,
    }
}
