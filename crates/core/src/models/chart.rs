use serde::{Deserialize, Serialize};

/// Aggregation window for the spending chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Last 7 calendar days, ending today
    Week,
    /// Every day of the current calendar month
    Month,
    /// The 12 months of the current calendar year
    Year,
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
            Period::Year => write!(f, "year"),
        }
    }
}

/// One slot of a fixed-length spending series.
///
/// The core generates these — the frontend just renders them.
/// A slot with no matching expenses carries amount 0; it is never omitted,
/// so the series length depends only on the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Axis label: weekday abbreviation, day-of-month number, or month abbreviation
    pub label: String,

    /// Summed expense amount for this slot
    pub amount: f64,
}
