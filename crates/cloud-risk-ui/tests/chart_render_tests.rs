//! Integration tests for dashboard charts and table projections.

use cloud_risk_analysis::{ChartMode, RiskBreakdown, build_chart};
use cloud_risk_ui::{EMPTY_LOGS_TEXT, RiskDashboardView, render_chart};

#[test]
fn chart_render_tests_empty_aggregates_render_every_mode() {
    let breakdown = RiskBreakdown::default();
    for mode in ChartMode::ALL {
        let text = render_chart(&build_chart(mode, &breakdown));
        assert!(text.contains("(no data)"), "{mode} should render flat");
    }
}

#[test]
fn chart_render_tests_pie_reports_group_shares() {
    let view = RiskDashboardView::sample();
    let breakdown = RiskBreakdown::from_entries(view.entries());
    let text = render_chart(&build_chart(ChartMode::Pie, &breakdown));

    assert!(text.contains("Rule-based"));
    assert!(text.contains("3 (100.0%)"));
    assert!(text.contains("0 (0.0%)"));
}

#[test]
fn chart_render_tests_composed_lists_custom_bars_first() {
    let view = RiskDashboardView::sample();
    let breakdown = RiskBreakdown::from_entries(view.entries());
    let text = render_chart(&build_chart(ChartMode::Composed, &breakdown));

    let custom = text.find("CustomBased").expect("custom series should render");
    let rule = text.find("RuleBased").expect("rule series should render");
    assert!(custom < rule);
    assert!(!text.contains("(no data)"));
}

#[test]
fn chart_render_tests_risk_view_rows_and_empty_text() {
    let rows = RiskDashboardView::sample().rows().expect("sample should have rows");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].event_name, "ConsoleLogin");
    assert_eq!(rows[2].risk, "Medium");

    let empty = RiskDashboardView::with_entries(Vec::new());
    assert_eq!(empty.rows(), Err(EMPTY_LOGS_TEXT));
}
