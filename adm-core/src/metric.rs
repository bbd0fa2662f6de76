use adm_utils::dates::short_weekday;
use adm_utils::numbers::round_to;
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::date_range::DateRange;

/// The four synthesized daily series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Revenue,
    Users,
    Conversions,
    Sessions,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Revenue,
        Metric::Users,
        Metric::Conversions,
        Metric::Sessions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::Users => "users",
            Metric::Conversions => "conversions",
            Metric::Sessions => "sessions",
        }
    }

    pub fn params(&self) -> MetricParams {
        match self {
            Metric::Revenue => MetricParams::new(50000.0, 20000.0, 10000.0, 500.0),
            Metric::Users => MetricParams::new(2500.0, 800.0, 400.0, 25.0),
            Metric::Conversions => MetricParams::new(180.0, 60.0, 30.0, 2.0),
            Metric::Sessions => MetricParams::new(5200.0, 1500.0, 800.0, 45.0),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMetricError(pub String);

impl fmt::Display for ParseMetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown metric: {:?}", self.0)
    }
}

impl std::error::Error for ParseMetricError {}

impl FromStr for Metric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revenue" => Ok(Metric::Revenue),
            "users" => Ok(Metric::Users),
            "conversions" => Ok(Metric::Conversions),
            "sessions" => Ok(Metric::Sessions),
            _ => Err(ParseMetricError(s.to_string())),
        }
    }
}

/// Shape parameters for one synthesized series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricParams {
    pub base: f64,
    pub trend_factor: f64,
    pub random_factor: f64,
    pub growth_per_day: f64,
}

impl MetricParams {
    /// Parameters used for any metric name that is not recognized.
    pub const FALLBACK: MetricParams = MetricParams::new(100.0, 50.0, 25.0, 0.0);

    pub const fn new(base: f64, trend_factor: f64, random_factor: f64, growth_per_day: f64) -> Self {
        Self {
            base,
            trend_factor,
            random_factor,
            growth_per_day,
        }
    }

    /// Look up parameters by metric name. Unknown names get [`Self::FALLBACK`].
    pub fn for_name(name: &str) -> MetricParams {
        match name.parse::<Metric>() {
            Ok(metric) => metric.params(),
            Err(e) => {
                log::debug!("{}; using fallback series parameters", e);
                MetricParams::FALLBACK
            }
        }
    }
}

/// One day of a synthesized series.
///
/// `growth` is a cosmetic indicator sampled independently of `value`; it is
/// not the day-over-day change and may contradict it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPoint {
    pub date: NaiveDate,
    pub day_label: String,
    pub value: u64,
    pub growth: f64,
}

/// Synthesize a series for a metric name over the `days` days before `today`.
pub fn synthesize_named<R: Rng + ?Sized>(
    name: &str,
    days: u32,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<MetricPoint> {
    synthesize_series(MetricParams::for_name(name), days, today, rng)
}

/// Synthesize one point per day from `today - days` through yesterday.
///
/// The value is a sine trend over the whole window, uniform noise and a
/// linear growth term, rounded and floored at zero.
pub fn synthesize_series<R: Rng + ?Sized>(
    params: MetricParams,
    days: u32,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<MetricPoint> {
    let window = f64::from(days);
    DateRange::trailing(days, today)
        .enumerate()
        .map(|(i, date)| {
            let i = i as f64;
            let trend = (i / window * PI * 2.0).sin() * 0.3;
            let noise = (rng.gen::<f64>() - 0.5) * 0.4;
            let growth_over_time = i * params.growth_per_day;
            let raw = params.base
                + trend * params.trend_factor
                + noise * params.random_factor
                + growth_over_time;
            let growth = round_to((rng.gen::<f64>() - 0.3) * 20.0, 2);
            MetricPoint {
                date,
                day_label: short_weekday(&date).to_string(),
                value: raw.round().max(0.0) as u64,
                growth,
            }
        })
        .collect()
}
