//! Snapshot, campaign table and export commands.

use adm_core::campaign::{CampaignColumn, CampaignRow, CampaignStatus, CampaignType};
use adm_core::date_range::RangeSelection;
use adm_core::metric::Metric;
use adm_dashboard::{Dashboard, DashboardOptions};
use adm_data::export::ExportFormat;
use adm_data::query::CampaignView;
use adm_db::SettingsStore;
use clap::Args;
use log::info;
use std::path::Path;

use crate::{open_dashboard, GlobalArgs};

#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// 7d, 30d, 90d or 1y
    #[arg(long, default_value = "7d")]
    pub range: RangeSelection,

    /// Series to chart: revenue, users, conversions or sessions
    #[arg(long, default_value = "revenue")]
    pub metric: Metric,

    /// Print the whole snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// 7d, 30d, 90d or 1y
    #[arg(long, default_value = "7d")]
    pub range: RangeSelection,

    /// Case-insensitive match on campaign name or type
    #[arg(long)]
    pub search: Option<String>,

    /// Keep only these campaign types (repeatable)
    #[arg(long = "type")]
    pub types: Vec<CampaignType>,

    /// Keep only these statuses (repeatable)
    #[arg(long = "status")]
    pub statuses: Vec<CampaignStatus>,

    /// Column to sort by
    #[arg(long)]
    pub sort: Option<CampaignColumn>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

impl QueryArgs {
    /// Replay these options as the equivalent table interactions.
    pub fn apply<S: SettingsStore>(&self, dashboard: &mut Dashboard<S>) {
        if let Some(term) = &self.search {
            dashboard.set_search(term.clone());
        }
        for t in &self.types {
            dashboard.toggle_type(*t);
        }
        for s in &self.statuses {
            dashboard.toggle_status(*s);
        }
        if let Some(column) = self.sort {
            dashboard.sort_by(column);
            if self.desc {
                dashboard.sort_by(column);
            }
        }
        dashboard.go_to_page(self.page);
    }
}

pub async fn run_snapshot(globals: &GlobalArgs, args: &SnapshotArgs) -> anyhow::Result<()> {
    let mut dashboard = open_dashboard(globals, args.range, DashboardOptions::default())?;
    dashboard.select_chart_metric(args.metric);
    let snapshot = dashboard
        .loaded()
        .await
        .ok_or_else(|| anyhow::anyhow!("snapshot for {} was not committed", args.range))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&*snapshot)?);
    } else {
        println!("Range: {} (through {})", snapshot.range.label(), snapshot.generated_on);
        for card in dashboard.cards() {
            println!("{:<14} {:>14} {:+.1}%", card.title, card.value, card.change_percent);
        }
        if dashboard.config().show_performance_chart {
            println!();
            println!("{} by day", dashboard.chart_metric());
            for point in dashboard.chart_series() {
                println!("  {} {} {:>10} {:+.2}%", point.date, point.day_label, point.value, point.growth);
            }
        }
        if dashboard.config().show_device_chart {
            println!();
            for device in dashboard.devices() {
                println!("  {:<9} {:>3}% {:>7} users", device.name, device.percentage, device.user_count);
            }
        }
    }
    dashboard.shutdown();
    Ok(())
}

pub async fn run_campaigns(globals: &GlobalArgs, args: &QueryArgs, json: bool) -> anyhow::Result<()> {
    let mut dashboard = open_dashboard(globals, args.range, DashboardOptions::default())?;
    dashboard.loaded().await;
    args.apply(&mut dashboard);
    let view = dashboard.campaign_view();

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else if !dashboard.config().show_campaign_table {
        info!("campaign table is hidden; enable it with `config toggle campaign-table`");
    } else {
        print!("{}", render_table(&view));
    }
    dashboard.shutdown();
    Ok(())
}

pub async fn run_export(
    globals: &GlobalArgs,
    args: &QueryArgs,
    format: ExportFormat,
    out_dir: &Path,
) -> anyhow::Result<()> {
    let mut dashboard = open_dashboard(globals, args.range, DashboardOptions::default())?;
    dashboard.loaded().await;
    args.apply(&mut dashboard);
    let path = dashboard.export(format, out_dir)?;
    println!("{}", path.display());
    dashboard.shutdown();
    Ok(())
}

fn row_cells(row: &CampaignRow) -> Vec<String> {
    vec![
        row.id.to_string(),
        row.campaign.clone(),
        row.campaign_type.label().to_string(),
        row.status.label().to_string(),
        row.impressions.clone(),
        row.clicks.clone(),
        row.ctr.clone(),
        row.cost.clone(),
        row.conversions.clone(),
        row.roas.clone(),
        row.cpc.clone(),
        row.quality.to_string(),
    ]
}

/// Plain-text table for one page, the "Showing a to b of n" footer and the
/// page buttons with the current page bracketed.
pub fn render_table(view: &CampaignView) -> String {
    let headers: Vec<String> = CampaignColumn::ALL.iter().map(|c| c.header().to_string()).collect();
    let rows: Vec<Vec<String>> = view.page_rows.iter().map(row_cells).collect();
    let widths: Vec<usize> = (0..headers.len())
        .map(|i| {
            rows.iter()
                .map(|r| r[i].len())
                .chain(std::iter::once(headers[i].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(&headers));
    out.push('\n');
    for row in &rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    let (from, to) = view.showing;
    out.push_str(&format!(
        "Showing {} to {} of {} results (page {} of {})\n",
        from,
        to,
        view.total_filtered,
        view.page,
        view.total_pages.max(1)
    ));
    let buttons: Vec<String> = view
        .page_buttons
        .iter()
        .map(|&p| if p == view.page { format!("[{}]", p) } else { p.to_string() })
        .collect();
    out.push_str(&format!("Pages: {}\n", buttons.join(" ")));
    out
}
