//! Chart specifications derived from a [`RiskBreakdown`].

use std::fmt;
use std::str::FromStr;

use cloud_risk_core::RiskLevel;
use serde::Serialize;

use crate::RiskBreakdown;

/// Colour of rule-based series.
pub const RULE_COLOR: &str = "#0088FE";
/// Colour of custom-based series.
pub const CUSTOM_COLOR: &str = "#FF8042";

/// Visualization selected by the view-mode toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// Group sizes as pie slices.
    #[default]
    Pie,
    /// Grouped bars per level.
    Bar,
    /// One line per group.
    Line,
    /// One filled area per group.
    Area,
    /// Polar plot per level.
    Radar,
    /// Custom bars with a rule line overlay.
    Composed,
}

impl ChartMode {
    /// Every mode, in selector order.
    pub const ALL: [ChartMode; 6] = [
        ChartMode::Pie,
        ChartMode::Bar,
        ChartMode::Line,
        ChartMode::Area,
        ChartMode::Radar,
        ChartMode::Composed,
    ];

    /// Selector value.
    pub fn name(&self) -> &'static str {
        match self {
            ChartMode::Pie => "pie",
            ChartMode::Bar => "bar",
            ChartMode::Line => "line",
            ChartMode::Area => "area",
            ChartMode::Radar => "radar",
            ChartMode::Composed => "composed",
        }
    }

    /// Selector label.
    pub fn label(&self) -> &'static str {
        match self {
            ChartMode::Pie => "Pie Chart",
            ChartMode::Bar => "Bar Chart",
            ChartMode::Line => "Line Chart",
            ChartMode::Area => "Area Chart",
            ChartMode::Radar => "Radar Chart",
            ChartMode::Composed => "Composed Chart",
        }
    }
}

impl fmt::Display for ChartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().to_ascii_lowercase();
        ChartMode::ALL
            .into_iter()
            .find(|mode| mode.name() == value)
            .ok_or_else(|| format!("unknown chart mode '{value}'"))
    }
}

/// One pie slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    /// Legend label.
    pub name: &'static str,
    /// Entry count.
    pub value: u64,
    /// Fill colour.
    pub color: &'static str,
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// Bars.
    Bar,
    /// Monotone line.
    Line,
    /// Filled area under a line.
    Area,
    /// Radar polygon.
    Radar,
}

/// One data series over the three risk levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    /// Legend label.
    pub name: &'static str,
    /// Drawing style.
    pub kind: SeriesKind,
    /// Stroke/fill colour.
    pub color: &'static str,
    /// Values for Low, Medium, High.
    pub values: [u64; 3],
}

/// Renderer-independent chart description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartSpec {
    /// Pie of group sizes.
    Pie {
        /// Rule-based then custom-based slice.
        slices: Vec<PieSlice>,
    },
    /// Level categories on the x axis.
    Cartesian {
        /// Mode that produced this spec.
        mode: ChartMode,
        /// X axis categories.
        categories: [RiskLevel; 3],
        /// Series in draw order.
        series: Vec<Series>,
        /// Upper bound of the value axis, at least 1.
        value_max: u64,
    },
    /// Level categories around a polar axis.
    Radar {
        /// Angle axis categories.
        categories: [RiskLevel; 3],
        /// Series in draw order.
        series: Vec<Series>,
        /// Upper bound of the radial domain, at least 1.
        radial_max: u64,
    },
}

impl ChartSpec {
    /// Returns `true` when every plotted value is zero.
    pub fn is_empty(&self) -> bool {
        match self {
            ChartSpec::Pie { slices } => slices.iter().all(|slice| slice.value == 0),
            ChartSpec::Cartesian { series, .. } | ChartSpec::Radar { series, .. } => series
                .iter()
                .all(|series| series.values.iter().all(|value| *value == 0)),
        }
    }
}

/// Builds the chart for `mode` from aggregated counts.
pub fn build_chart(mode: ChartMode, breakdown: &RiskBreakdown) -> ChartSpec {
    let rows = breakdown.rows();
    let rule_values = rows.map(|row| row.rule_based);
    let custom_values = rows.map(|row| row.custom_based);
    let rule = |kind| Series {
        name: "RuleBased",
        kind,
        color: RULE_COLOR,
        values: rule_values,
    };
    let custom = |kind| Series {
        name: "CustomBased",
        kind,
        color: CUSTOM_COLOR,
        values: custom_values,
    };

    let series = match mode {
        ChartMode::Pie => {
            return ChartSpec::Pie {
                slices: vec![
                    PieSlice {
                        name: "Rule-based",
                        value: breakdown.rule_entries,
                        color: RULE_COLOR,
                    },
                    PieSlice {
                        name: "Custom-based",
                        value: breakdown.custom_entries,
                        color: CUSTOM_COLOR,
                    },
                ],
            };
        }
        ChartMode::Radar => {
            // Domain spans the largest combined level; floor of 1 keeps it non-degenerate.
            let radial_max = rows.iter().map(|row| row.total()).max().unwrap_or(0).max(1);
            return ChartSpec::Radar {
                categories: RiskLevel::ALL,
                series: vec![rule(SeriesKind::Radar), custom(SeriesKind::Radar)],
                radial_max,
            };
        }
        ChartMode::Bar => vec![rule(SeriesKind::Bar), custom(SeriesKind::Bar)],
        ChartMode::Line => vec![rule(SeriesKind::Line), custom(SeriesKind::Line)],
        ChartMode::Area => vec![rule(SeriesKind::Area), custom(SeriesKind::Area)],
        ChartMode::Composed => vec![custom(SeriesKind::Bar), rule(SeriesKind::Line)],
    };

    let value_max = series
        .iter()
        .flat_map(|series| series.values)
        .max()
        .unwrap_or(0)
        .max(1);

    ChartSpec::Cartesian {
        mode,
        categories: RiskLevel::ALL,
        series,
        value_max,
    }
}
