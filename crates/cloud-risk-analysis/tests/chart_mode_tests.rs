//! Integration tests for chart specification building.

use cloud_risk_analysis::{
    CUSTOM_COLOR, ChartMode, ChartSpec, RULE_COLOR, RiskBreakdown, SeriesKind, build_chart,
};
use cloud_risk_core::LogEntry;

#[test]
fn chart_mode_tests_empty_breakdown_builds_every_mode() {
    let breakdown = RiskBreakdown::from_entries(&[]);
    for mode in ChartMode::ALL {
        let spec = build_chart(mode, &breakdown);
        assert!(spec.is_empty(), "{mode} should be flat");
        match spec {
            ChartSpec::Radar { radial_max, .. } => assert_eq!(radial_max, 1),
            ChartSpec::Cartesian { value_max, .. } => assert_eq!(value_max, 1),
            ChartSpec::Pie { slices } => assert_eq!(slices.len(), 2),
        }
    }
}

#[test]
fn chart_mode_tests_radar_domain_is_max_combined_level() {
    let entries = vec![
        LogEntry::new("A", "High", "custom"),
        LogEntry::new("B", "High", "rule"),
        LogEntry::new("C", "High", "rule"),
        LogEntry::new("D", "Low", "rule"),
    ];

    let spec = build_chart(ChartMode::Radar, &RiskBreakdown::from_entries(&entries));
    let ChartSpec::Radar { radial_max, series, .. } = spec else {
        panic!("radar mode should build radar spec");
    };
    assert_eq!(radial_max, 3);
    assert_eq!(series[0].values, [1, 0, 2]);
    assert_eq!(series[1].values, [0, 0, 1]);
}

#[test]
fn chart_mode_tests_composed_draws_custom_bars_under_rule_line() {
    let spec = build_chart(ChartMode::Composed, &RiskBreakdown::default());
    let ChartSpec::Cartesian { series, .. } = spec else {
        panic!("composed mode should build cartesian spec");
    };
    assert_eq!(series[0].kind, SeriesKind::Bar);
    assert_eq!(series[0].color, CUSTOM_COLOR);
    assert_eq!(series[1].kind, SeriesKind::Line);
    assert_eq!(series[1].color, RULE_COLOR);
}

#[test]
fn chart_mode_tests_pie_uses_group_sizes() {
    let entries = vec![
        LogEntry::new("A", "Unrated", "custom"),
        LogEntry::new("B", "Low", "rule"),
    ];
    let ChartSpec::Pie { slices } = build_chart(ChartMode::Pie, &RiskBreakdown::from_entries(&entries))
    else {
        panic!("pie mode should build pie spec");
    };
    assert_eq!(slices[0].name, "Rule-based");
    assert_eq!(slices[0].value, 1);
    assert_eq!(slices[1].value, 1);
}
