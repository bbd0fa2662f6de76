use adm_utils::numbers::with_thousands;
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::campaign::{generate_campaigns, CampaignRow};
use crate::date_range::RangeSelection;
use crate::device::{device_distribution, DeviceShare};
use crate::metric::{synthesize_series, Metric, MetricPoint};

/// The full synthetic dataset for one date-range selection.
///
/// A snapshot is never edited; a range change builds a new one that
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub range: RangeSelection,
    /// The day the series windows end before.
    pub generated_on: NaiveDate,
    pub revenue: Vec<MetricPoint>,
    pub users: Vec<MetricPoint>,
    pub conversions: Vec<MetricPoint>,
    pub sessions: Vec<MetricPoint>,
    pub devices: Vec<DeviceShare>,
    pub campaigns: Vec<CampaignRow>,
}

impl Snapshot {
    /// Synthesize every series and the campaign table for `range`.
    pub fn generate<R: Rng + ?Sized>(range: RangeSelection, today: NaiveDate, rng: &mut R) -> Self {
        let days = range.days();
        Snapshot {
            range,
            generated_on: today,
            revenue: synthesize_series(Metric::Revenue.params(), days, today, rng),
            users: synthesize_series(Metric::Users.params(), days, today, rng),
            conversions: synthesize_series(Metric::Conversions.params(), days, today, rng),
            sessions: synthesize_series(Metric::Sessions.params(), days, today, rng),
            devices: device_distribution(),
            campaigns: generate_campaigns(rng),
        }
    }

    pub fn series(&self, metric: Metric) -> &[MetricPoint] {
        match metric {
            Metric::Revenue => &self.revenue,
            Metric::Users => &self.users,
            Metric::Conversions => &self.conversions,
            Metric::Sessions => &self.sessions,
        }
    }

    /// Sum of a series over the whole window.
    pub fn total(&self, metric: Metric) -> u64 {
        self.series(metric).iter().map(|p| p.value).sum()
    }

    /// Metric card headline: the window total with thousands separators,
    /// revenue prefixed with `$`.
    pub fn headline(&self, metric: Metric) -> String {
        let total = with_thousands(self.total(metric) as i64);
        match metric {
            Metric::Revenue => format!("${}", total),
            _ => total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn snapshot_series_match_range_length() {
        let mut rng = StdRng::seed_from_u64(1);
        for range in RangeSelection::ALL {
            let snapshot = Snapshot::generate(range, today(), &mut rng);
            for metric in Metric::ALL {
                assert_eq!(snapshot.series(metric).len(), range.days() as usize);
            }
            assert_eq!(snapshot.campaigns.len(), 8);
            assert_eq!(snapshot.devices.len(), 4);
        }
    }

    #[test]
    fn total_sums_series_values() {
        let snapshot = Snapshot::generate(RangeSelection::Week, today(), &mut StdRng::seed_from_u64(2));
        let expected: u64 = snapshot.users.iter().map(|p| p.value).sum();
        assert_eq!(snapshot.total(Metric::Users), expected);
    }

    #[test]
    fn headline_formats_revenue_as_currency() {
        let snapshot = Snapshot::generate(RangeSelection::Week, today(), &mut StdRng::seed_from_u64(3));
        let revenue = snapshot.headline(Metric::Revenue);
        assert!(revenue.starts_with('$'));
        assert!(revenue.contains(','), "{}", revenue);
        assert!(!snapshot.headline(Metric::Conversions).starts_with('$'));
    }

    #[test]
    fn snapshot_serializes_camel_case_points() {
        let snapshot = Snapshot::generate(RangeSelection::Week, today(), &mut StdRng::seed_from_u64(4));
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["range"], "7d");
        assert_eq!(json["revenue"][0]["date"], "2024-06-08");
        assert!(json["revenue"][0]["dayLabel"].is_string());
        assert_eq!(json["campaigns"][0]["type"], "Seasonal");
    }
}
