//! Campaign table exports.
//!
//! Two sinks share one projection of the rows:
//! - **CSV**: display strings exactly as the table shows them ("$1234", "3.4%")
//! - **XLSX**: one sheet named "Campaign Performance" with numeric columns
//!   written as numbers, recovered through [`parse_display_value`]
//!
//! Both take the filtered and sorted rows, not the current page.

use adm_core::campaign::{CampaignColumn, CampaignRow, Cell};
use adm_core::display::parse_display_value;
use adm_utils::dates::dated_filename;
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Filename stem shared by both export formats.
pub const EXPORT_STEM: &str = "campaign_performance";

/// Worksheet name for the spreadsheet export.
pub const SHEET_NAME: &str = "Campaign Performance";

/// One denormalized export row with the column headers as field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatRecord {
    #[serde(rename = "ID")]
    pub id: u32,
    #[serde(rename = "Campaign")]
    pub campaign: String,
    #[serde(rename = "Type")]
    pub campaign_type: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Impressions")]
    pub impressions: String,
    #[serde(rename = "Clicks")]
    pub clicks: String,
    #[serde(rename = "CTR")]
    pub ctr: String,
    #[serde(rename = "Cost")]
    pub cost: String,
    #[serde(rename = "Conversions")]
    pub conversions: String,
    #[serde(rename = "ROAS")]
    pub roas: String,
    #[serde(rename = "CPC")]
    pub cpc: String,
    #[serde(rename = "Quality Score")]
    pub quality: u32,
}

impl From<&CampaignRow> for FlatRecord {
    fn from(row: &CampaignRow) -> Self {
        FlatRecord {
            id: row.id,
            campaign: row.campaign.clone(),
            campaign_type: row.campaign_type.label().to_string(),
            status: row.status.label().to_string(),
            impressions: row.impressions.clone(),
            clicks: row.clicks.clone(),
            ctr: row.ctr.clone(),
            cost: row.cost.clone(),
            conversions: row.conversions.clone(),
            roas: row.roas.clone(),
            cpc: row.cpc.clone(),
            quality: row.quality,
        }
    }
}

pub fn to_flat_records(rows: &[CampaignRow]) -> Vec<FlatRecord> {
    rows.iter().map(FlatRecord::from).collect()
}

/// A spreadsheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetValue {
    Number(f64),
    Text(String),
}

/// Project rows for the spreadsheet sink, one value per column in
/// [`CampaignColumn::ALL`] order. Numeric columns become numbers; a numeric
/// display string that fails to parse is kept as text.
pub fn to_sheet_rows(rows: &[CampaignRow]) -> Vec<Vec<SheetValue>> {
    rows.iter()
        .map(|row| {
            CampaignColumn::ALL
                .iter()
                .map(|column| match column.cell(row) {
                    Cell::Number(n) => SheetValue::Number(n),
                    Cell::Text(s) if column.is_numeric() => match parse_display_value(s) {
                        Some(n) => SheetValue::Number(n),
                        None => {
                            log::warn!("{} value {:?} is not numeric; exporting as text", column.header(), s);
                            SheetValue::Text(s.to_string())
                        }
                    },
                    Cell::Text(s) => SheetValue::Text(s.to_string()),
                })
                .collect()
        })
        .collect()
}

/// Write rows as CSV: a header line of column names, then one line per row.
///
/// Fields containing commas or quotes are quoted, so campaign names with
/// embedded commas survive a round trip.
pub fn write_csv<W: Write>(rows: &[CampaignRow], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(CampaignColumn::ALL.iter().map(|c| c.header()))?;
    for record in to_flat_records(rows) {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn csv_string(rows: &[CampaignRow]) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Build an `.xlsx` workbook with a single "Campaign Performance" sheet.
pub fn xlsx_bytes(rows: &[CampaignRow]) -> anyhow::Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, column) in CampaignColumn::ALL.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, column.header(), &header_format)?;
    }

    for (i, values) in to_sheet_rows(rows).iter().enumerate() {
        let row = i as u32 + 1;
        for (col, value) in values.iter().enumerate() {
            match value {
                SheetValue::Number(n) => worksheet.write_number(row, col as u16, *n)?,
                SheetValue::Text(s) => worksheet.write_string(row, col as u16, s)?,
            };
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// `campaign_performance_<YYYY-MM-DD>.<ext>`
    pub fn filename(&self, date: &NaiveDate) -> String {
        dated_filename(EXPORT_STEM, date, self.extension())
    }

    pub fn render(&self, rows: &[CampaignRow]) -> anyhow::Result<Vec<u8>> {
        match self {
            ExportFormat::Csv => Ok(csv_string(rows)?.into_bytes()),
            ExportFormat::Xlsx => xlsx_bytes(rows),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            _ => Err(format!("unknown export format: {:?}", s)),
        }
    }
}

/// Render `rows` and write them to a dated file inside `dir`.
pub fn export_to_dir(
    rows: &[CampaignRow],
    format: ExportFormat,
    dir: &Path,
    today: &NaiveDate,
) -> anyhow::Result<PathBuf> {
    let path = dir.join(format.filename(today));
    std::fs::write(&path, format.render(rows)?)?;
    log::info!("Exported {} campaigns to {}", rows.len(), path.display());
    Ok(path)
}
