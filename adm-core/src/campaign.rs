use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::display::{format_display_value, DisplayUnit};

/// Campaign category. Each catalog entry has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CampaignType {
    Seasonal,
    Brand,
    Product,
    Educational,
    Promotional,
    #[serde(rename = "Lead Gen")]
    LeadGen,
    Retargeting,
    Retention,
}

impl CampaignType {
    pub const ALL: [CampaignType; 8] = [
        CampaignType::Seasonal,
        CampaignType::Brand,
        CampaignType::Product,
        CampaignType::Educational,
        CampaignType::Promotional,
        CampaignType::LeadGen,
        CampaignType::Retargeting,
        CampaignType::Retention,
    ];

    /// Label shown in the table, filter menu and exports.
    pub fn label(&self) -> &'static str {
        match self {
            CampaignType::Seasonal => "Seasonal",
            CampaignType::Brand => "Brand",
            CampaignType::Product => "Product",
            CampaignType::Educational => "Educational",
            CampaignType::Promotional => "Promotional",
            CampaignType::LeadGen => "Lead Gen",
            CampaignType::Retargeting => "Retargeting",
            CampaignType::Retention => "Retention",
        }
    }
}

impl fmt::Display for CampaignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CampaignType {
    type Err = String;

    /// Case-insensitive; spaces, dashes and underscores are ignored
    /// ("Lead Gen", "lead-gen" and "leadgen" all parse).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        CampaignType::ALL
            .into_iter()
            .find(|t| t.label().replace(' ', "").to_lowercase() == key)
            .ok_or_else(|| format!("unknown campaign type: {:?}", s))
    }
}

/// Delivery status of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CampaignStatus {
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 3] = [
        CampaignStatus::Active,
        CampaignStatus::Paused,
        CampaignStatus::Completed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "Active",
            CampaignStatus::Paused => "Paused",
            CampaignStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        CampaignStatus::ALL
            .into_iter()
            .find(|status| status.label().to_lowercase() == key)
            .ok_or_else(|| format!("unknown campaign status: {:?}", s))
    }
}

/// One fixed entry of the campaign catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry {
    pub campaign_type: CampaignType,
    pub status: CampaignStatus,
    /// Multiplier applied to every synthesized metric of the row.
    pub performance_factor: f64,
}

const fn entry(campaign_type: CampaignType, status: CampaignStatus, performance_factor: f64) -> CatalogEntry {
    CatalogEntry {
        campaign_type,
        status,
        performance_factor,
    }
}

/// The eight campaigns every snapshot contains, in row order.
pub const CAMPAIGN_CATALOG: [CatalogEntry; 8] = [
    entry(CampaignType::Seasonal, CampaignStatus::Active, 1.2),
    entry(CampaignType::Brand, CampaignStatus::Active, 1.1),
    entry(CampaignType::Product, CampaignStatus::Paused, 0.9),
    entry(CampaignType::Educational, CampaignStatus::Completed, 1.0),
    entry(CampaignType::Promotional, CampaignStatus::Active, 1.3),
    entry(CampaignType::LeadGen, CampaignStatus::Active, 1.15),
    entry(CampaignType::Retargeting, CampaignStatus::Active, 1.25),
    entry(CampaignType::Retention, CampaignStatus::Active, 1.18),
];

/// A campaign performance row as displayed in the table.
///
/// Numeric columns other than `quality` are display strings; use
/// [`crate::display::parse_display_value`] to read them back as numbers.
/// `quality` is documented as 1-10 but is not clamped after scaling, so
/// high performance factors can push it above 10.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRow {
    pub id: u32,
    pub campaign: String,
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    pub status: CampaignStatus,
    pub impressions: String,
    pub clicks: String,
    pub ctr: String,
    pub cost: String,
    pub conversions: String,
    pub roas: String,
    pub cpc: String,
    pub quality: u32,
}

/// Value of one column in one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

/// The table columns, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignColumn {
    Id,
    Campaign,
    Type,
    Status,
    Impressions,
    Clicks,
    Ctr,
    Cost,
    Conversions,
    Roas,
    Cpc,
    Quality,
}

impl CampaignColumn {
    pub const ALL: [CampaignColumn; 12] = [
        CampaignColumn::Id,
        CampaignColumn::Campaign,
        CampaignColumn::Type,
        CampaignColumn::Status,
        CampaignColumn::Impressions,
        CampaignColumn::Clicks,
        CampaignColumn::Ctr,
        CampaignColumn::Cost,
        CampaignColumn::Conversions,
        CampaignColumn::Roas,
        CampaignColumn::Cpc,
        CampaignColumn::Quality,
    ];

    /// Column header used by table rendering and exports.
    pub fn header(&self) -> &'static str {
        match self {
            CampaignColumn::Id => "ID",
            CampaignColumn::Campaign => "Campaign",
            CampaignColumn::Type => "Type",
            CampaignColumn::Status => "Status",
            CampaignColumn::Impressions => "Impressions",
            CampaignColumn::Clicks => "Clicks",
            CampaignColumn::Ctr => "CTR",
            CampaignColumn::Cost => "Cost",
            CampaignColumn::Conversions => "Conversions",
            CampaignColumn::Roas => "ROAS",
            CampaignColumn::Cpc => "CPC",
            CampaignColumn::Quality => "Quality Score",
        }
    }

    /// Stored value of this column for `row`.
    pub fn cell<'a>(&self, row: &'a CampaignRow) -> Cell<'a> {
        match self {
            CampaignColumn::Id => Cell::Number(f64::from(row.id)),
            CampaignColumn::Campaign => Cell::Text(&row.campaign),
            CampaignColumn::Type => Cell::Text(row.campaign_type.label()),
            CampaignColumn::Status => Cell::Text(row.status.label()),
            CampaignColumn::Impressions => Cell::Text(&row.impressions),
            CampaignColumn::Clicks => Cell::Text(&row.clicks),
            CampaignColumn::Ctr => Cell::Text(&row.ctr),
            CampaignColumn::Cost => Cell::Text(&row.cost),
            CampaignColumn::Conversions => Cell::Text(&row.conversions),
            CampaignColumn::Roas => Cell::Text(&row.roas),
            CampaignColumn::Cpc => Cell::Text(&row.cpc),
            CampaignColumn::Quality => Cell::Number(f64::from(row.quality)),
        }
    }

    /// True for columns whose display string carries a number.
    pub fn is_numeric(&self) -> bool {
        !matches!(
            self,
            CampaignColumn::Campaign | CampaignColumn::Type | CampaignColumn::Status
        )
    }
}

impl FromStr for CampaignColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        CampaignColumn::ALL
            .into_iter()
            .find(|c| {
                let header = c.header().to_lowercase();
                header == key || header.replace(' ', "_") == key || (*c == CampaignColumn::Quality && key == "quality")
            })
            .ok_or_else(|| format!("unknown column: {:?}", s))
    }
}

/// Synthesize one row per catalog entry.
///
/// Base values are drawn uniformly, scaled by the entry's performance factor
/// and then formatted. Row ids are the catalog position plus one.
pub fn generate_campaigns<R: Rng + ?Sized>(rng: &mut R) -> Vec<CampaignRow> {
    CAMPAIGN_CATALOG
        .iter()
        .enumerate()
        .map(|(index, entry)| synthesize_row(index, entry, &mut *rng))
        .collect()
}

fn synthesize_row<R: Rng + ?Sized>(index: usize, entry: &CatalogEntry, rng: &mut R) -> CampaignRow {
    let pf = entry.performance_factor;
    let base_impressions = 50000.0 + rng.gen::<f64>() * 200000.0;
    let base_clicks = 1200.0 + rng.gen::<f64>() * 4000.0;
    let base_ctr = 1.5 + rng.gen::<f64>() * 4.0;
    let base_cost = 800.0 + rng.gen::<f64>() * 2500.0;
    let base_conversions = 15.0 + rng.gen::<f64>() * 85.0;
    let base_roas = 1.8 + rng.gen::<f64>() * 3.2;
    let base_cpc = 0.5 + rng.gen::<f64>() * 2.0;
    let base_quality = 6.0 + rng.gen::<f64>() * 4.0;

    let id = index as u32 + 1;
    CampaignRow {
        id,
        campaign: format!("{} Campaign {}", entry.campaign_type.label(), id),
        campaign_type: entry.campaign_type,
        status: entry.status,
        impressions: format_display_value((base_impressions * pf).round(), DisplayUnit::Plain, 0),
        clicks: format_display_value((base_clicks * pf).round(), DisplayUnit::Plain, 0),
        ctr: format_display_value(base_ctr * pf, DisplayUnit::Percent, 2),
        cost: format_display_value((base_cost * pf).round(), DisplayUnit::Currency, 0),
        conversions: format_display_value((base_conversions * pf).round(), DisplayUnit::Plain, 0),
        roas: format_display_value(base_roas * pf, DisplayUnit::Multiplier, 1),
        cpc: format_display_value(base_cpc * pf, DisplayUnit::Currency, 2),
        quality: (base_quality * pf).round() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::parse_display_value;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generates_one_row_per_catalog_entry() {
        let rows = generate_campaigns(&mut StdRng::seed_from_u64(1));
        assert_eq!(rows.len(), 8);
        for (i, (row, entry)) in rows.iter().zip(CAMPAIGN_CATALOG.iter()).enumerate() {
            assert_eq!(row.id, i as u32 + 1);
            assert_eq!(row.campaign_type, entry.campaign_type);
            assert_eq!(row.status, entry.status);
        }
        assert_eq!(rows[5].campaign, "Lead Gen Campaign 6");
    }

    #[test]
    fn numeric_fields_recover_as_non_negative_numbers() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            for row in generate_campaigns(&mut rng) {
                for column in CampaignColumn::ALL.iter().filter(|c| c.is_numeric()) {
                    let value = match column.cell(&row) {
                        Cell::Number(n) => n,
                        Cell::Text(s) => parse_display_value(s)
                            .unwrap_or_else(|| panic!("{:?} = {:?} must parse", column, s)),
                    };
                    assert!(value >= 0.0, "{:?} negative: {}", column, value);
                }
            }
        }
    }

    #[test]
    fn display_strings_carry_units() {
        let rows = generate_campaigns(&mut StdRng::seed_from_u64(3));
        for row in &rows {
            assert!(row.ctr.ends_with('%'));
            assert!(row.roas.ends_with('x'));
            assert!(row.cost.starts_with('$') && !row.cost.contains('.'));
            assert!(row.cpc.starts_with('$'));
            assert_eq!(row.cpc.split('.').nth(1).map(str::len), Some(2));
            assert!(!row.impressions.contains('.'));
        }
    }

    #[test]
    fn values_scale_with_performance_factor() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..20 {
            for (row, entry) in generate_campaigns(&mut rng).iter().zip(CAMPAIGN_CATALOG.iter()) {
                let impressions = parse_display_value(&row.impressions).unwrap();
                let pf = entry.performance_factor;
                assert!(impressions >= (50000.0 * pf).floor());
                assert!(impressions <= (250000.0 * pf).ceil());
                let roas = parse_display_value(&row.roas).unwrap();
                assert!(roas >= 1.8 * pf - 0.05 && roas <= 5.0 * pf + 0.05);
            }
        }
    }

    #[test]
    fn quality_is_not_clamped_to_ten() {
        // (6 + 4u) * 1.3 can round up to 13 for the promotional campaign
        let mut rng = StdRng::seed_from_u64(5);
        let max_quality = (0..200)
            .flat_map(|_| generate_campaigns(&mut rng))
            .map(|row| row.quality)
            .max()
            .unwrap();
        assert!(max_quality > 10, "max quality was {}", max_quality);
        assert!(max_quality <= 13);
    }

    #[test]
    fn parses_types_statuses_and_columns() {
        assert_eq!("lead-gen".parse::<CampaignType>(), Ok(CampaignType::LeadGen));
        assert_eq!("Lead Gen".parse::<CampaignType>(), Ok(CampaignType::LeadGen));
        assert_eq!("seasonal".parse::<CampaignType>(), Ok(CampaignType::Seasonal));
        assert!("viral".parse::<CampaignType>().is_err());
        assert_eq!("paused".parse::<CampaignStatus>(), Ok(CampaignStatus::Paused));
        assert_eq!("roas".parse::<CampaignColumn>(), Ok(CampaignColumn::Roas));
        assert_eq!("quality".parse::<CampaignColumn>(), Ok(CampaignColumn::Quality));
        assert_eq!("quality_score".parse::<CampaignColumn>(), Ok(CampaignColumn::Quality));
    }

    #[test]
    fn serializes_type_label() {
        let rows = generate_campaigns(&mut StdRng::seed_from_u64(6));
        let json = serde_json::to_value(&rows[5]).unwrap();
        assert_eq!(json["type"], "Lead Gen");
        assert_eq!(json["status"], "Active");
    }
}
