use std::fmt::Write;

use crate::actions::ActionIntent;
use crate::models::ChartSeries;
use crate::pages::{
    AnalyticsPage, ChartView, Control, DashboardPage, HomePage, InterviewsPage, LoginPage, Page,
    StatCard,
};
use crate::providers::Providers;
use crate::ui::{Icon, Tone};

const BAR_WIDTH: f64 = 24.0;

pub fn render_markdown(page: &Page, providers: &Providers) -> String {
    let mut output = String::new();

    match page {
        Page::Home(home) => render_home(&mut output, home),
        Page::Login(login) => render_login(&mut output, login),
        Page::Dashboard(dashboard) => render_dashboard(&mut output, dashboard),
        Page::Interviews(interviews) => render_interviews(&mut output, interviews),
        Page::Analytics(analytics) => render_analytics(&mut output, analytics),
    }

    let session = match providers.session() {
        Some(session) => format!("signed in as {}", session.user),
        None => "signed out".to_string(),
    };
    let _ = writeln!(output);
    let _ = writeln!(output, "_theme: {:?}, {}_", providers.theme(), session);
    output
}

fn control_label(control: &Control) -> String {
    intent_label(control.label, control.intent)
}

fn intent_label(label: &str, intent: ActionIntent) -> String {
    match intent {
        ActionIntent::Navigate(route) => format!("[{}]({})", label, route),
        ActionIntent::Placeholder => format!("[{}] (not available yet)", label),
    }
}

fn render_home(output: &mut String, home: &HomePage) {
    let _ = writeln!(output, "# {}", home.title);
    let _ = writeln!(output, "{}", home.tagline);
    let _ = writeln!(output);
    let _ = writeln!(output, "{}", control_label(&home.get_started));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Features");
    for feature in &home.features {
        let _ = writeln!(output, "- **{}**: {}", feature.title, feature.description);
    }
}

fn render_login(output: &mut String, login: &LoginPage) {
    let _ = writeln!(output, "# {}", login.title);
    let _ = writeln!(output, "{}", login.subtitle);
    let _ = writeln!(output);
    for button in &login.providers {
        let _ = writeln!(
            output,
            "- {} {} (`{}`)",
            button.icon.glyph(),
            button.label,
            button.provider.id()
        );
    }
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "By continuing, you agree to our [Terms of Service]({}) and [Privacy Policy]({}).",
        login.terms, login.privacy
    );
}

fn render_stats(output: &mut String, stats: &[StatCard]) {
    if stats.is_empty() {
        let _ = writeln!(output, "No metrics available.");
        return;
    }
    for card in stats {
        let marker = match card.tone {
            Tone::Affirmative => "▲",
            Tone::Warning => "▼",
        };
        let _ = writeln!(
            output,
            "- {} **{}**: {} ({} {})",
            card.icon.glyph(),
            card.name,
            card.value,
            marker,
            card.delta
        );
    }
}

fn render_dashboard(output: &mut String, dashboard: &DashboardPage) {
    let _ = writeln!(output, "# {}", dashboard.title);
    let _ = writeln!(output, "{}", control_label(&dashboard.new_interview));
    let _ = writeln!(output);
    render_stats(output, &dashboard.stats);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Interviews");
    if dashboard.recent_interviews.is_empty() {
        let _ = writeln!(output, "No interviews scheduled.");
    } else {
        for interview in &dashboard.recent_interviews {
            let _ = writeln!(
                output,
                "- {} with {}: {} ({})",
                interview.position, interview.candidate, interview.when, interview.duration
            );
        }
    }
    let _ = writeln!(output, "{}", control_label(&dashboard.view_all));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Quick Actions");
    for action in &dashboard.quick_actions {
        let label = intent_label(&action.name, action.intent);
        let _ = writeln!(output, "- {} {}", action.icon.glyph(), label);
    }
}

fn render_interviews(output: &mut String, page: &InterviewsPage) {
    let _ = writeln!(output, "# {}", page.title);
    let _ = writeln!(output, "{}", control_label(&page.schedule));
    let _ = writeln!(output);

    if page.filter.is_active() {
        let _ = writeln!(
            output,
            "Showing {} of {} interviews (type: {:?}, status: {:?}, search: \"{}\")",
            page.interviews.len(),
            page.total,
            page.filter.category,
            page.filter.status,
            page.filter.search.trim()
        );
    } else {
        let _ = writeln!(output, "Showing all {} interviews", page.total);
    }
    let _ = writeln!(output);

    if page.interviews.is_empty() {
        let _ = writeln!(output, "No interviews match the current filters.");
        return;
    }

    for card in &page.interviews {
        let _ = writeln!(output, "### {}", card.position);
        let _ = writeln!(output, "{}", card.candidate);
        let _ = writeln!(output, "- {} {}", Icon::Calendar.glyph(), card.date);
        let _ = writeln!(output, "- {} {}", Icon::Clock.glyph(), card.duration);
        let _ = writeln!(output, "- {} {}", Icon::FileText.glyph(), card.category);
        let _ = writeln!(output, "- status: `{}` ({:?})", card.status, card.badge);
        let _ = writeln!(output);
    }
}

fn render_analytics(output: &mut String, page: &AnalyticsPage) {
    let _ = writeln!(output, "# {}", page.title);
    let _ = writeln!(output, "Period: {}", page.period.label());
    let _ = writeln!(output, "{}", control_label(&page.export));
    let _ = writeln!(output);

    render_chart_heading(output, &page.trends);
    render_table(output, &page.trends.series);
    let _ = writeln!(output);

    render_chart_heading(output, &page.performance);
    render_bars(output, &page.performance.series);
    let _ = writeln!(output);

    let _ = writeln!(output, "## Summary");
    render_stats(output, &page.stats);
}

fn render_chart_heading(output: &mut String, chart: &ChartView) {
    let _ = writeln!(output, "## {}", chart.title);
    let _ = writeln!(output, "{}", chart.description);
    let _ = writeln!(output);
}

/// One table row per point, in the order supplied.
fn render_table(output: &mut String, series: &ChartSeries) {
    if series.points().is_empty() {
        let _ = writeln!(output, "No data points for this chart.");
        return;
    }

    let _ = writeln!(output, "| {} | {} |", series.index(), series.categories().join(" | "));
    let _ = writeln!(output, "|---|{}", "---|".repeat(series.categories().len()));
    for point in series.points() {
        let values: Vec<String> = point.values.iter().map(|value| value.to_string()).collect();
        let _ = writeln!(output, "| {} | {} |", point.index, values.join(" | "));
    }
}

/// Horizontal bars scaled against the largest value of the series.
fn render_bars(output: &mut String, series: &ChartSeries) {
    if series.points().is_empty() {
        let _ = writeln!(output, "No data points for this chart.");
        return;
    }

    let max = series.max_value();
    let label_width = series.points().iter().map(|p| p.index.chars().count()).max().unwrap_or(0);
    for point in series.points() {
        let value = point.values.first().copied().unwrap_or(0.0);
        let filled = if max > 0.0 { (value / max * BAR_WIDTH).round() as usize } else { 0 };
        let _ = writeln!(
            output,
            "`{:<width$}` {} {}",
            point.index,
            "█".repeat(filled),
            value,
            width = label_width
        );
    }
}
