use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn shown() -> bool {
    true
}

/// Panel visibility. Every flag defaults to shown, including flags missing
/// from a persisted object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    #[serde(default = "shown")]
    pub show_revenue: bool,
    #[serde(default = "shown")]
    pub show_users: bool,
    #[serde(default = "shown")]
    pub show_conversions: bool,
    #[serde(default = "shown")]
    pub show_page_views: bool,
    #[serde(default = "shown")]
    pub show_performance_chart: bool,
    #[serde(default = "shown")]
    pub show_device_chart: bool,
    #[serde(default = "shown")]
    pub show_campaign_table: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            show_revenue: true,
            show_users: true,
            show_conversions: true,
            show_page_views: true,
            show_performance_chart: true,
            show_device_chart: true,
            show_campaign_table: true,
        }
    }
}

impl DashboardConfig {
    pub fn get(&self, flag: ConfigFlag) -> bool {
        *self.slot(flag)
    }

    pub fn set(&mut self, flag: ConfigFlag, value: bool) {
        *self.slot_mut(flag) = value;
    }

    /// Flip `flag`, returning its new value.
    pub fn toggle(&mut self, flag: ConfigFlag) -> bool {
        let slot = self.slot_mut(flag);
        *slot = !*slot;
        *slot
    }

    fn slot(&self, flag: ConfigFlag) -> &bool {
        match flag {
            ConfigFlag::ShowRevenue => &self.show_revenue,
            ConfigFlag::ShowUsers => &self.show_users,
            ConfigFlag::ShowConversions => &self.show_conversions,
            ConfigFlag::ShowPageViews => &self.show_page_views,
            ConfigFlag::ShowPerformanceChart => &self.show_performance_chart,
            ConfigFlag::ShowDeviceChart => &self.show_device_chart,
            ConfigFlag::ShowCampaignTable => &self.show_campaign_table,
        }
    }

    fn slot_mut(&mut self, flag: ConfigFlag) -> &mut bool {
        match flag {
            ConfigFlag::ShowRevenue => &mut self.show_revenue,
            ConfigFlag::ShowUsers => &mut self.show_users,
            ConfigFlag::ShowConversions => &mut self.show_conversions,
            ConfigFlag::ShowPageViews => &mut self.show_page_views,
            ConfigFlag::ShowPerformanceChart => &mut self.show_performance_chart,
            ConfigFlag::ShowDeviceChart => &mut self.show_device_chart,
            ConfigFlag::ShowCampaignTable => &mut self.show_campaign_table,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFlag {
    ShowRevenue,
    ShowUsers,
    ShowConversions,
    ShowPageViews,
    ShowPerformanceChart,
    ShowDeviceChart,
    ShowCampaignTable,
}

impl ConfigFlag {
    pub const ALL: [ConfigFlag; 7] = [
        ConfigFlag::ShowRevenue,
        ConfigFlag::ShowUsers,
        ConfigFlag::ShowConversions,
        ConfigFlag::ShowPageViews,
        ConfigFlag::ShowPerformanceChart,
        ConfigFlag::ShowDeviceChart,
        ConfigFlag::ShowCampaignTable,
    ];

    /// The persisted JSON key.
    pub fn key(&self) -> &'static str {
        match self {
            ConfigFlag::ShowRevenue => "showRevenue",
            ConfigFlag::ShowUsers => "showUsers",
            ConfigFlag::ShowConversions => "showConversions",
            ConfigFlag::ShowPageViews => "showPageViews",
            ConfigFlag::ShowPerformanceChart => "showPerformanceChart",
            ConfigFlag::ShowDeviceChart => "showDeviceChart",
            ConfigFlag::ShowCampaignTable => "showCampaignTable",
        }
    }
}

impl fmt::Display for ConfigFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ConfigFlag {
    type Err = String;

    /// Accepts the JSON key (`showRevenue`), snake case (`show_revenue`),
    /// kebab case, or the bare panel name (`revenue`, `device-chart`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        let wanted = wanted.strip_prefix("show").unwrap_or(&wanted).to_string();
        ConfigFlag::ALL
            .iter()
            .copied()
            .find(|flag| flag.key()["show".len()..].to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown config flag: {:?}", s))
    }
}
