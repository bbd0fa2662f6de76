use serde::{Deserialize, Serialize};

/// Share of traffic for one device category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceShare {
    pub name: String,
    /// Percentage of traffic (0-100).
    pub percentage: u32,
    /// Chart color token (hex).
    pub color_token: String,
    pub user_count: u64,
}

/// Static device breakdown shown in the device pie chart.
/// Percentages sum to 100.
pub fn device_distribution() -> Vec<DeviceShare> {
    [
        ("Desktop", 45, "#3B82F6", 11250),
        ("Mobile", 42, "#10B981", 10500),
        ("Tablet", 10, "#F59E0B", 2500),
        ("Smart TV", 3, "#EF4444", 750),
    ]
    .into_iter()
    .map(|(name, percentage, color, users)| DeviceShare {
        name: name.to_string(),
        percentage,
        color_token: color.to_string(),
        user_count: users,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages_sum_to_100() {
        let total: u32 = device_distribution().iter().map(|d| d.percentage).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_device_categories() {
        let names: Vec<String> = device_distribution().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Desktop", "Mobile", "Tablet", "Smart TV"]);
    }
}
