//! Terminal rendering of chart specifications.

use std::fmt::Write as _;

use cloud_risk_analysis::{ChartSpec, Series, SeriesKind};

/// Width in cells of a full-scale bar.
pub const BAR_WIDTH: u64 = 40;

fn glyph(kind: SeriesKind) -> char {
    match kind {
        SeriesKind::Bar => '█',
        SeriesKind::Line => '─',
        SeriesKind::Area => '▒',
        SeriesKind::Radar => '◆',
    }
}

fn scaled(value: u64, max: u64) -> usize {
    // `max` is at least 1 for every spec the analysis crate builds.
    let cells = value.saturating_mul(BAR_WIDTH) / max.max(1);
    usize::try_from(cells).unwrap_or(usize::MAX)
}

fn bar(series: &Series, value: u64, max: u64) -> String {
    let cells = scaled(value, max);
    let mut out: String = std::iter::repeat_n(glyph(series.kind), cells).collect();
    if series.kind == SeriesKind::Line {
        out.push('●');
    }
    out
}

/// Draws `spec` as plain text, one line per category and series.
pub fn render_chart(spec: &ChartSpec) -> String {
    let mut out = String::new();
    match spec {
        ChartSpec::Pie { slices } => {
            let total: u64 = slices.iter().map(|slice| slice.value).sum();
            let _ = writeln!(out, "Pie Chart");
            for slice in slices {
                let percent = if total == 0 {
                    0.0
                } else {
                    slice.value as f64 * 100.0 / total as f64
                };
                let cells: String =
                    std::iter::repeat_n('█', scaled(slice.value, total.max(1))).collect();
                let _ = writeln!(
                    out,
                    "{:<13} {:<w$} {} ({percent:.1}%)",
                    slice.name,
                    cells,
                    slice.value,
                    w = BAR_WIDTH as usize
                );
            }
        }
        ChartSpec::Cartesian {
            mode,
            categories,
            series,
            value_max,
        } => {
            let _ = writeln!(out, "{} (0..{value_max})", mode.label());
            for (index, level) in categories.iter().enumerate() {
                let _ = writeln!(out, "{level}");
                for line in series {
                    let value = line.values[index];
                    let _ = writeln!(
                        out,
                        "  {:<12} {} {value}",
                        line.name,
                        bar(line, value, *value_max)
                    );
                }
            }
        }
        ChartSpec::Radar {
            categories,
            series,
            radial_max,
        } => {
            let _ = writeln!(out, "Radar Chart (0..{radial_max})");
            for line in series {
                let _ = writeln!(out, "{}", line.name);
                for (index, level) in categories.iter().enumerate() {
                    let value = line.values[index];
                    let _ = writeln!(
                        out,
                        "  {:<7} {} {value}",
                        level.as_str(),
                        bar(line, value, *radial_max)
                    );
                }
            }
        }
    }
    if spec.is_empty() {
        out.push_str("(no data)\n");
    }
    out
}
