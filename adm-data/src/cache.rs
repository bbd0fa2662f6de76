//! Memoized campaign view.

use adm_core::campaign::CampaignRow;

use crate::query::{view, CampaignView, QueryState};

struct CacheEntry {
    rows: Vec<CampaignRow>,
    query: QueryState,
    view: CampaignView,
}

/// Remembers the last `(rows, query)` pair and its [`CampaignView`].
///
/// The view is recomputed only when either input differs from the last call.
#[derive(Default)]
pub struct ViewCache {
    entry: Option<CacheEntry>,
    recomputations: usize,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&mut self, rows: &[CampaignRow], query: &QueryState) -> &CampaignView {
        let stale = match &self.entry {
            Some(entry) => entry.rows != rows || entry.query != *query,
            None => true,
        };
        if stale {
            log::debug!("view cache miss for query {:?}", query);
            self.recomputations += 1;
            self.entry = None;
        }
        let entry = self.entry.get_or_insert_with(|| CacheEntry {
            rows: rows.to_vec(),
            query: query.clone(),
            view: view(rows, query),
        });
        &entry.view
    }

    /// How many times the view has been rebuilt.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
