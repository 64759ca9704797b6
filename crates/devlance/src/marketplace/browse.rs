//! Filter, sort, and pagination vocabulary for the public job listing.

use serde::{Deserialize, Serialize};

use super::domain::JobListingView;

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw query parameters as they arrive on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrowseParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub budget: Option<String>,
    pub sort: Option<String>,
}

/// The five fixed budget ranges offered by the listing UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetBucket {
    Under500,
    From500To1000,
    From1000To5000,
    From5000To10000,
    Over10000,
}

impl BudgetBucket {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "under-500" => Some(Self::Under500),
            "500-1000" => Some(Self::From500To1000),
            "1000-5000" => Some(Self::From1000To5000),
            "5000-10000" => Some(Self::From5000To10000),
            "over-10000" => Some(Self::Over10000),
            _ => None,
        }
    }

    /// Inclusive lower / upper bounds; `None` means unbounded on that side.
    pub const fn bounds(self) -> (Option<i64>, Option<i64>) {
        match self {
            Self::Under500 => (None, Some(499)),
            Self::From500To1000 => (Some(500), Some(1000)),
            Self::From1000To5000 => (Some(1000), Some(5000)),
            Self::From5000To10000 => (Some(5000), Some(10000)),
            Self::Over10000 => (Some(10000), None),
        }
    }

    pub fn matches(self, budget: i64) -> bool {
        let (min, max) = self.bounds();
        min.map_or(true, |m| budget >= m) && max.map_or(true, |m| budget <= m)
    }
}

/// Result ordering. Unknown sort keys fall back to newest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    BudgetHigh,
    BudgetLow,
    ProposalsHigh,
    ProposalsLow,
}

impl SortKey {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "oldest" => Self::Oldest,
            "budget-high" => Self::BudgetHigh,
            "budget-low" => Self::BudgetLow,
            "proposals-high" => Self::ProposalsHigh,
            "proposals-low" => Self::ProposalsLow,
            _ => Self::Newest,
        }
    }
}

/// Normalized browse query: defaults applied, sentinels stripped, bucket and
/// sort parsed.
#[derive(Debug, Clone)]
pub struct BrowseQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub category: Option<String>,
    pub budget: Option<BudgetBucket>,
    pub sort: SortKey,
}

impl BrowseQuery {
    pub fn from_params(params: BrowseParams) -> Self {
        let category = params
            .category
            .map(|raw| raw.trim().to_string())
            .filter(|raw| {
                !raw.is_empty()
                    && !raw.eq_ignore_ascii_case("all")
                    && !raw.eq_ignore_ascii_case("all categories")
            });

        Self {
            page: params.page.unwrap_or(1).max(1),
            limit: params
                .limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            search: params
                .search
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty()),
            category,
            budget: params.budget.as_deref().and_then(BudgetBucket::parse),
            sort: params.sort.as_deref().map(SortKey::parse).unwrap_or_default(),
        }
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.limit
    }

    /// Space-split search terms matched individually against job skills.
    pub fn search_terms(&self) -> Vec<&str> {
        self.search
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Pagination envelope returned alongside the listing.
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    pub fn new(query: &BrowseQuery, total: u64) -> Self {
        Self {
            page: query.page,
            limit: query.limit,
            total,
            pages: total.div_ceil(query.limit as u64),
        }
    }
}

/// One page of open jobs.
#[derive(Debug, Clone, Serialize)]
pub struct BrowsePage {
    pub jobs: Vec<JobListingView>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied_when_params_empty() {
        let query = BrowseQuery::from_params(BrowseParams::default());
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, DEFAULT_PAGE_SIZE);
        assert!(query.search.is_none());
        assert!(query.category.is_none());
        assert!(query.budget.is_none());
        assert_eq!(query.sort, SortKey::Newest);
    }

    #[test]
    fn sentinel_category_and_budget_are_stripped() {
        let query = BrowseQuery::from_params(BrowseParams {
            category: Some("All Categories".to_string()),
            budget: Some("all".to_string()),
            ..BrowseParams::default()
        });
        assert!(query.category.is_none());
        assert!(query.budget.is_none());
    }

    #[test]
    fn budget_buckets_cover_their_ranges() {
        assert!(BudgetBucket::Under500.matches(499));
        assert!(!BudgetBucket::Under500.matches(500));
        assert!(BudgetBucket::From500To1000.matches(500));
        assert!(BudgetBucket::From500To1000.matches(1000));
        assert!(!BudgetBucket::From500To1000.matches(1001));
        assert!(BudgetBucket::Over10000.matches(10000));
        assert!(BudgetBucket::Over10000.matches(1_000_000));
    }

    #[test]
    fn unknown_sort_falls_back_to_newest() {
        assert_eq!(SortKey::parse("hot-new-jobs"), SortKey::Newest);
        assert_eq!(SortKey::parse("proposals-low"), SortKey::ProposalsLow);
    }

    #[test]
    fn page_zero_is_clamped() {
        let query = BrowseQuery::from_params(BrowseParams {
            page: Some(0),
            limit: Some(0),
            ..BrowseParams::default()
        });
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 1);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn pagination_rounds_page_count_up() {
        let query = BrowseQuery::from_params(BrowseParams {
            limit: Some(12),
            ..BrowseParams::default()
        });
        let pagination = Pagination::new(&query, 25);
        assert_eq!(pagination.pages, 3);
        assert_eq!(Pagination::new(&query, 0).pages, 0);
    }
}
