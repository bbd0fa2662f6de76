//! Filter, sort and paginate the campaign table.

use adm_core::campaign::{CampaignColumn, CampaignRow, CampaignStatus, CampaignType, Cell};
use adm_core::display::parse_display_value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::pagination::{clamp_page, page_window, showing_range, total_pages};

/// Rows per table page.
pub const PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: CampaignColumn,
    pub direction: SortDirection,
}

/// Everything the user controls about the campaign table.
///
/// Holds no rows of its own. Empty filter sets mean "no restriction".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub search_term: String,
    pub type_filter: BTreeSet<CampaignType>,
    pub status_filter: BTreeSet<CampaignStatus>,
    pub sort: Option<SortConfig>,
    /// 1-based page number.
    pub current_page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            type_filter: BTreeSet::new(),
            status_filter: BTreeSet::new(),
            sort: None,
            current_page: 1,
        }
    }
}

impl QueryState {
    pub fn page_size(&self) -> usize {
        PAGE_SIZE
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.current_page = 1;
    }

    /// Add `t` to the type filter, or remove it if already present.
    pub fn toggle_type(&mut self, t: CampaignType) {
        if !self.type_filter.remove(&t) {
            self.type_filter.insert(t);
        }
        self.current_page = 1;
    }

    /// Add `s` to the status filter, or remove it if already present.
    pub fn toggle_status(&mut self, s: CampaignStatus) {
        if !self.status_filter.remove(&s) {
            self.status_filter.insert(s);
        }
        self.current_page = 1;
    }

    /// Empty both filter sets. The search term is left alone.
    pub fn clear_filters(&mut self) {
        self.type_filter.clear();
        self.status_filter.clear();
        self.current_page = 1;
    }

    /// Header click: the same column flips asc to desc, anything else
    /// (a new column, or a second click on a descending one) sorts ascending.
    pub fn sort_by(&mut self, key: CampaignColumn) {
        let direction = match self.sort {
            Some(SortConfig {
                key: current,
                direction: SortDirection::Asc,
            }) if current == key => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        self.sort = Some(SortConfig { key, direction });
    }

    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        self.current_page = clamp_page(page, total_pages);
    }

    pub fn prev_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.current_page = clamp_page(self.current_page + 1, total_pages);
    }

    /// True if `row` passes the search term and both filter sets.
    pub fn matches(&self, row: &CampaignRow) -> bool {
        let term = self.search_term.to_lowercase();
        let matches_search = term.is_empty()
            || row.campaign.to_lowercase().contains(&term)
            || row.campaign_type.label().to_lowercase().contains(&term);
        let matches_type = self.type_filter.is_empty() || self.type_filter.contains(&row.campaign_type);
        let matches_status = self.status_filter.is_empty() || self.status_filter.contains(&row.status);
        matches_search && matches_type && matches_status
    }
}

/// Compare two cells of the same column.
///
/// Display strings that carry numbers ("$1234", "3.4%", "2.1x") compare by
/// value. Text that does not parse compares as plain strings.
pub fn compare_cells(a: Cell<'_>, b: Cell<'_>) -> Ordering {
    match (a, b) {
        (Cell::Number(x), Cell::Number(y)) => x.total_cmp(&y),
        (Cell::Text(x), Cell::Text(y)) => match (parse_display_value(x), parse_display_value(y)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => x.cmp(y),
        },
        _ => Ordering::Equal,
    }
}

/// Stable sort in place. Rows with equal keys keep their incoming order in
/// both directions.
pub fn sort_rows(rows: &mut [CampaignRow], sort: SortConfig) {
    let key = sort.key;
    match sort.direction {
        SortDirection::Asc => rows.sort_by(|a, b| compare_cells(key.cell(a), key.cell(b))),
        SortDirection::Desc => rows.sort_by(|a, b| compare_cells(key.cell(b), key.cell(a))),
    }
}

/// Stage 1 and 2: every matching row, sorted if a sort is set.
pub fn filter_and_sort(rows: &[CampaignRow], query: &QueryState) -> Vec<CampaignRow> {
    let mut filtered: Vec<CampaignRow> = rows.iter().filter(|row| query.matches(row)).cloned().collect();
    if let Some(sort) = query.sort {
        sort_rows(&mut filtered, sort);
    }
    filtered
}

/// What the table renders for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignView {
    pub page_rows: Vec<CampaignRow>,
    pub total_filtered: usize,
    pub total_pages: usize,
    /// The page actually sliced, after clamping.
    pub page: usize,
    pub page_buttons: Vec<usize>,
    pub showing: (usize, usize),
}

/// Stage 3 on top of [`filter_and_sort`]: slice out the current page.
///
/// A current page past the end (e.g. after a filter shrank the result) is
/// clamped to the last page, or to 1 when nothing matched.
pub fn view(rows: &[CampaignRow], query: &QueryState) -> CampaignView {
    let filtered = filter_and_sort(rows, query);
    let total_filtered = filtered.len();
    let total_pages = total_pages(total_filtered, PAGE_SIZE);
    let page = clamp_page(query.current_page, total_pages);
    let page_rows: Vec<CampaignRow> = filtered
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();
    CampaignView {
        page_rows,
        total_filtered,
        total_pages,
        page,
        page_buttons: page_window(page, total_pages),
        showing: showing_range(page, PAGE_SIZE, total_filtered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adm_core::campaign::generate_campaigns;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn campaigns() -> Vec<CampaignRow> {
        generate_campaigns(&mut StdRng::seed_from_u64(21))
    }

    fn ids(rows: &[CampaignRow]) -> Vec<u32> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn empty_query_passes_everything_through() {
        let rows = campaigns();
        let filtered = filter_and_sort(&rows, &QueryState::default());
        assert_eq!(ids(&filtered), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn search_matches_name_or_type_case_insensitively() {
        let rows = campaigns();
        let mut query = QueryState::default();
        query.set_search("Seasonal");
        let filtered = filter_and_sort(&rows, &query);
        assert_eq!(ids(&filtered), vec![1]);
        for row in &filtered {
            assert!(
                row.campaign.to_lowercase().contains("seasonal")
                    || row.campaign_type.label().to_lowercase().contains("seasonal")
            );
        }

        query.set_search("RE");
        let expected: Vec<u32> = rows
            .iter()
            .filter(|r| r.campaign.to_lowercase().contains("re"))
            .map(|r| r.id)
            .collect();
        assert_eq!(ids(&filter_and_sort(&rows, &query)), expected);

        query.set_search("lead gen");
        assert_eq!(ids(&filter_and_sort(&rows, &query)), vec![6]);
    }

    #[test]
    fn filter_sets_restrict_by_membership() {
        let rows = campaigns();
        let mut query = QueryState::default();
        query.toggle_status(CampaignStatus::Active);
        assert_eq!(ids(&filter_and_sort(&rows, &query)), vec![1, 2, 5, 6, 7, 8]);

        query.toggle_type(CampaignType::Brand);
        query.toggle_type(CampaignType::Product);
        // Product is paused, so only Brand survives both sets
        assert_eq!(ids(&filter_and_sort(&rows, &query)), vec![2]);

        query.toggle_status(CampaignStatus::Active);
        assert!(query.status_filter.is_empty());
        assert_eq!(ids(&filter_and_sort(&rows, &query)), vec![2, 3]);

        query.clear_filters();
        assert_eq!(filter_and_sort(&rows, &query).len(), 8);
    }

    #[test]
    fn filtering_is_idempotent() {
        let rows = campaigns();
        let mut query = QueryState::default();
        query.set_search("campaign");
        query.toggle_status(CampaignStatus::Active);
        query.toggle_type(CampaignType::Retention);
        query.toggle_type(CampaignType::Seasonal);
        let once = filter_and_sort(&rows, &query);
        let twice = filter_and_sort(&once, &query);
        assert_eq!(once, twice);
    }

    #[test]
    fn sort_by_roas_descending_puts_highest_first() {
        let rows = campaigns();
        let mut query = QueryState::default();
        query.sort_by(CampaignColumn::Roas);
        query.sort_by(CampaignColumn::Roas);
        assert_eq!(query.sort.unwrap().direction, SortDirection::Desc);
        let sorted = filter_and_sort(&rows, &query);
        let best = rows
            .iter()
            .map(|r| parse_display_value(&r.roas).unwrap())
            .fold(f64::MIN, f64::max);
        assert_eq!(parse_display_value(&sorted[0].roas), Some(best));
        let values: Vec<f64> = sorted.iter().map(|r| parse_display_value(&r.roas).unwrap()).collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn currency_sorts_numerically_not_lexically() {
        let mut rows = campaigns();
        rows[0].cost = "$900".to_string();
        rows[1].cost = "$10000".to_string();
        rows[2].cost = "$1,500".to_string();
        let mut three = rows[..3].to_vec();
        sort_rows(
            &mut three,
            SortConfig {
                key: CampaignColumn::Cost,
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(ids(&three), vec![1, 3, 2]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut rows = campaigns();
        for (i, row) in rows.iter_mut().enumerate() {
            row.ctr = if i % 2 == 0 { "2.00%".to_string() } else { "4.00%".to_string() };
        }
        let mut asc = rows.clone();
        sort_rows(
            &mut asc,
            SortConfig {
                key: CampaignColumn::Ctr,
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(ids(&asc), vec![1, 3, 5, 7, 2, 4, 6, 8]);

        let mut desc = rows.clone();
        sort_rows(
            &mut desc,
            SortConfig {
                key: CampaignColumn::Ctr,
                direction: SortDirection::Desc,
            },
        );
        assert_eq!(ids(&desc), vec![2, 4, 6, 8, 1, 3, 5, 7]);
    }

    #[test]
    fn status_sorts_as_text() {
        let rows = campaigns();
        let mut sorted = rows.clone();
        sort_rows(
            &mut sorted,
            SortConfig {
                key: CampaignColumn::Status,
                direction: SortDirection::Asc,
            },
        );
        // Active rows first in generation order, then Completed, then Paused
        assert_eq!(ids(&sorted), vec![1, 2, 5, 6, 7, 8, 4, 3]);
    }

    #[test]
    fn sort_toggle_flips_and_resets() {
        let mut query = QueryState::default();
        query.sort_by(CampaignColumn::Cost);
        assert_eq!(query.sort.unwrap().direction, SortDirection::Asc);
        query.sort_by(CampaignColumn::Cost);
        assert_eq!(query.sort.unwrap().direction, SortDirection::Desc);
        query.sort_by(CampaignColumn::Cost);
        assert_eq!(query.sort.unwrap().direction, SortDirection::Asc);
        query.sort_by(CampaignColumn::Cost);
        query.sort_by(CampaignColumn::Clicks);
        assert_eq!(
            query.sort,
            Some(SortConfig {
                key: CampaignColumn::Clicks,
                direction: SortDirection::Asc
            })
        );
    }

    #[test]
    fn view_paginates_in_fives() {
        let rows = campaigns();
        let mut query = QueryState::default();
        let first = view(&rows, &query);
        assert_eq!(first.total_filtered, 8);
        assert_eq!(first.total_pages, 2);
        assert_eq!(ids(&first.page_rows), vec![1, 2, 3, 4, 5]);
        assert_eq!(first.page_buttons, vec![1, 2]);
        assert_eq!(first.showing, (1, 5));

        query.next_page(first.total_pages);
        let second = view(&rows, &query);
        assert_eq!(ids(&second.page_rows), vec![6, 7, 8]);
        assert_eq!(second.showing, (6, 8));

        query.next_page(second.total_pages);
        assert_eq!(query.current_page, 2, "next stops at the last page");
        query.prev_page();
        query.prev_page();
        assert_eq!(query.current_page, 1, "prev stops at page 1");
    }

    #[test]
    fn stale_page_is_clamped_after_filter_shrinks_result() {
        let rows = campaigns();
        let mut query = QueryState::default();
        query.current_page = 2;
        query.type_filter.insert(CampaignType::Brand);
        let v = view(&rows, &query);
        assert_eq!(v.total_pages, 1);
        assert_eq!(v.page, 1);
        assert_eq!(ids(&v.page_rows), vec![2]);

        query.set_search("no such campaign");
        query.current_page = 3;
        let empty = view(&rows, &query);
        assert_eq!(empty.total_pages, 0);
        assert_eq!(empty.page, 1);
        assert!(empty.page_rows.is_empty());
        assert_eq!(empty.showing, (0, 0));
    }

    #[test]
    fn filter_changes_reset_the_page() {
        let mut query = QueryState::default();
        query.current_page = 2;
        query.set_search("brand");
        assert_eq!(query.current_page, 1);
        query.current_page = 2;
        query.toggle_type(CampaignType::Brand);
        assert_eq!(query.current_page, 1);
        query.current_page = 2;
        query.clear_filters();
        assert_eq!(query.current_page, 1);
    }

    #[test]
    fn page_rows_never_exceed_page_size() {
        let mut rows = Vec::new();
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..4 {
            rows.extend(generate_campaigns(&mut rng));
        }
        let mut query = QueryState::default();
        for page in 1..=8 {
            query.current_page = page;
            let v = view(&rows, &query);
            assert_eq!(v.total_pages, 7);
            assert!(v.page_rows.len() <= PAGE_SIZE);
            assert_eq!(v.page, page.min(7));
        }
    }
}
