//! Headline metric cards.

use adm_core::metric::Metric;
use adm_core::snapshot::Snapshot;
use adm_db::DashboardConfig;
use adm_live::GaugeState;
use adm_utils::numbers::with_thousands;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CardKind {
    Revenue,
    Users,
    Conversions,
    PageViews,
}

impl CardKind {
    pub const ALL: [CardKind; 4] = [
        CardKind::Revenue,
        CardKind::Users,
        CardKind::Conversions,
        CardKind::PageViews,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            CardKind::Revenue => "Total Revenue",
            CardKind::Users => "Active Users",
            CardKind::Conversions => "Conversions",
            CardKind::PageViews => "Page Views",
        }
    }

    /// Fixed period-over-period change shown on the card.
    pub fn change_percent(&self) -> f64 {
        match self {
            CardKind::Revenue => 12.5,
            CardKind::Users => 8.2,
            CardKind::Conversions => -2.4,
            CardKind::PageViews => 15.8,
        }
    }

    fn visible(&self, config: &DashboardConfig) -> bool {
        match self {
            CardKind::Revenue => config.show_revenue,
            CardKind::Users => config.show_users,
            CardKind::Conversions => config.show_conversions,
            CardKind::PageViews => config.show_page_views,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCard {
    pub kind: CardKind,
    pub title: &'static str,
    pub value: String,
    pub change_percent: f64,
}

/// The visible cards, in display order. Page views come from the live gauges.
pub fn metric_cards(snapshot: &Snapshot, gauges: &GaugeState, config: &DashboardConfig) -> Vec<MetricCard> {
    CardKind::ALL
        .iter()
        .filter(|kind| kind.visible(config))
        .map(|&kind| {
            let value = match kind {
                CardKind::Revenue => snapshot.headline(Metric::Revenue),
                CardKind::Users => snapshot.headline(Metric::Users),
                CardKind::Conversions => snapshot.headline(Metric::Conversions),
                CardKind::PageViews => with_thousands(gauges.page_views as i64),
            };
            MetricCard {
                kind,
                title: kind.title(),
                value,
                change_percent: kind.change_percent(),
            }
        })
        .collect()
}
