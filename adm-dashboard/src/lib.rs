//! Composition root for the dashboard.
//!
//! [`Dashboard`] owns each piece of state and the tasks that write it:
//!
//! - the committed [`Snapshot`], written only by the [`SnapshotLoader`]
//! - live gauges and notifications, written only by the simulator task
//! - the campaign [`QueryState`], written only by the filter/sort/page methods
//! - persisted settings, behind an injected [`SettingsStore`]
//! - the chat transcript
//!
//! Each bucket has its own lock; nothing locks two at once.

pub mod cards;
pub mod loader;

use adm_assistant::{AssistantBridge, ChatSession};
use adm_core::campaign::{CampaignColumn, CampaignRow, CampaignStatus, CampaignType};
use adm_core::date_range::RangeSelection;
use adm_core::device::DeviceShare;
use adm_core::metric::{Metric, MetricPoint};
use adm_core::snapshot::Snapshot;
use adm_data::cache::ViewCache;
use adm_data::export::{export_to_dir, ExportFormat};
use adm_data::query::{filter_and_sort, CampaignView, QueryState};
use adm_db::{ConfigFlag, DashboardConfig, Settings, SettingsStore};
use adm_live::{spawn_simulator, GaugeState, LiveMetrics, NotificationEvent, SimulatorHandle};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use cards::{metric_cards, CardKind, MetricCard};
pub use loader::{default_builder, SnapshotBuilder, SnapshotLoader, LOAD_DELAY};

/// Timing knobs for the background tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub load_delay: Duration,
    pub tick_interval: Duration,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            load_delay: LOAD_DELAY,
            tick_interval: adm_live::TICK_INTERVAL,
        }
    }
}

pub struct Dashboard<S: SettingsStore> {
    range: RangeSelection,
    loader: SnapshotLoader,
    live: Arc<Mutex<LiveMetrics>>,
    simulator: Option<SimulatorHandle>,
    query: QueryState,
    cache: ViewCache,
    settings: Settings<S>,
    bridge: AssistantBridge,
    chat: ChatSession,
    chart_metric: Metric,
}

impl<S: SettingsStore> Dashboard<S> {
    /// Start a dashboard on `range`: schedules the first snapshot load and
    /// starts the live simulator.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(range: RangeSelection, settings: Settings<S>, bridge: AssistantBridge, options: DashboardOptions) -> Self {
        Self::start_with_builder(range, settings, bridge, options, default_builder())
    }

    pub fn start_with_builder(
        range: RangeSelection,
        settings: Settings<S>,
        bridge: AssistantBridge,
        options: DashboardOptions,
        builder: SnapshotBuilder,
    ) -> Self {
        let loader = SnapshotLoader::new(builder, options.load_delay);
        loader.request(range);
        let live = Arc::new(Mutex::new(LiveMetrics::default()));
        let simulator = spawn_simulator(live.clone(), options.tick_interval);
        log::info!("dashboard started on {}", range);
        Self {
            range,
            loader,
            live,
            simulator: Some(simulator),
            query: QueryState::default(),
            cache: ViewCache::new(),
            settings,
            bridge,
            chat: ChatSession::new(),
            chart_metric: Metric::Revenue,
        }
    }

    // Snapshot

    pub fn range(&self) -> RangeSelection {
        self.range
    }

    /// Switch the date range. The new snapshot arrives after the load delay;
    /// until then the previous one stays visible.
    pub fn set_range(&mut self, range: RangeSelection) {
        self.range = range;
        self.loader.request(range);
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.loader.current()
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    /// Wait for the pending snapshot load, then return what is committed.
    pub async fn loaded(&self) -> Option<Arc<Snapshot>> {
        self.loader.settle().await;
        self.loader.current()
    }

    pub fn chart_metric(&self) -> Metric {
        self.chart_metric
    }

    pub fn select_chart_metric(&mut self, metric: Metric) {
        self.chart_metric = metric;
    }

    /// The selected metric's series from the committed snapshot.
    pub fn chart_series(&self) -> Vec<MetricPoint> {
        self.snapshot()
            .map(|s| s.series(self.chart_metric).to_vec())
            .unwrap_or_default()
    }

    pub fn devices(&self) -> Vec<DeviceShare> {
        self.snapshot().map(|s| s.devices.clone()).unwrap_or_default()
    }

    pub fn cards(&self) -> Vec<MetricCard> {
        match self.snapshot() {
            Some(snapshot) => metric_cards(&snapshot, &self.gauges(), &self.config()),
            None => Vec::new(),
        }
    }

    // Campaign table

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    fn campaigns(&self) -> Vec<CampaignRow> {
        self.snapshot().map(|s| s.campaigns.clone()).unwrap_or_default()
    }

    /// The current table page. Recomputed only when the campaigns or the
    /// query changed since the last call.
    pub fn campaign_view(&mut self) -> CampaignView {
        let rows = self.campaigns();
        self.cache.view(&rows, &self.query).clone()
    }

    /// Every row matching the current query, sorted, across all pages.
    pub fn filtered_campaigns(&self) -> Vec<CampaignRow> {
        filter_and_sort(&self.campaigns(), &self.query)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.query.set_search(term);
    }

    pub fn toggle_type(&mut self, campaign_type: CampaignType) {
        self.query.toggle_type(campaign_type);
    }

    pub fn toggle_status(&mut self, status: CampaignStatus) {
        self.query.toggle_status(status);
    }

    pub fn clear_filters(&mut self) {
        self.query.clear_filters();
    }

    pub fn sort_by(&mut self, column: CampaignColumn) {
        self.query.sort_by(column);
    }

    pub fn go_to_page(&mut self, page: usize) {
        let total = self.campaign_view().total_pages;
        self.query.go_to_page(page, total);
    }

    pub fn next_page(&mut self) {
        let total = self.campaign_view().total_pages;
        self.query.next_page(total);
    }

    pub fn prev_page(&mut self) {
        self.query.prev_page();
    }

    /// Export the filtered rows into `dir`.
    pub fn export(&self, format: ExportFormat, dir: &Path) -> anyhow::Result<PathBuf> {
        export_to_dir(&self.filtered_campaigns(), format, dir, &Local::now().date_naive())
    }

    // Live metrics

    pub fn gauges(&self) -> GaugeState {
        match self.live.lock() {
            Ok(live) => live.gauges.clone(),
            Err(poisoned) => poisoned.into_inner().gauges.clone(),
        }
    }

    /// Most recent notifications, oldest first.
    pub fn notifications(&self) -> Vec<NotificationEvent> {
        match self.live.lock() {
            Ok(live) => live.notifications.events().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().notifications.events().cloned().collect(),
        }
    }

    // Settings

    pub fn config(&self) -> DashboardConfig {
        self.settings.load_config()
    }

    pub fn toggle_config(&self, flag: ConfigFlag) -> anyhow::Result<DashboardConfig> {
        self.settings.toggle(flag)
    }

    pub fn reset_config(&self) -> anyhow::Result<DashboardConfig> {
        self.settings.reset()
    }

    pub fn dark_mode(&self) -> bool {
        self.settings.dark_mode()
    }

    pub fn toggle_dark_mode(&self) -> anyhow::Result<bool> {
        self.settings.toggle_dark_mode()
    }

    // Assistant

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    /// Send a chat message. Returns the reply, or `None` for blank input.
    pub async fn ask(&mut self, text: &str) -> Option<String> {
        self.chat.send_message(&self.bridge, text).await
    }

    /// Stop the simulator and any pending snapshot load. Safe to call twice.
    pub fn shutdown(&mut self) {
        if let Some(mut simulator) = self.simulator.take() {
            simulator.stop();
            self.loader.cancel();
            log::info!("dashboard shut down");
        }
    }

    pub fn is_running(&self) -> bool {
        self.simulator.is_some()
    }
}

impl<S: SettingsStore> Drop for Dashboard<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
