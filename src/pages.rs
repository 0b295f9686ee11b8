use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;

use crate::actions::{ActionIntent, ActionRegistry};
use crate::display::{self, DisplayLocale};
use crate::error::DataIntegrityError;
use crate::filter::{InterviewFilter, ALL_STATUSES, CATEGORY_OPTIONS};
use crate::models::{ChartSeries, InterviewRecord, InterviewStatus, StatSummary};
use crate::providers::{AuthProvider, IdentityProvider, Providers, SignInOutcome};
use crate::ui::{Badge, Icon, RevealAnimation, Route, Tone};

const RECENT_INTERVIEW_COUNT: usize = 3;

/// Per-render inputs that are not owned by the providers.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext {
    pub locale: DisplayLocale,
    pub today: NaiveDate,
}

/// A button or link and what it asks for when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Control {
    pub label: &'static str,
    pub intent: ActionIntent,
}

impl Control {
    const fn new(label: &'static str, intent: ActionIntent) -> Self {
        Self { label, intent }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub name: String,
    pub value: String,
    pub delta: String,
    pub tone: Tone,
    pub icon: Icon,
    pub delay_ms: u32,
}

impl StatCard {
    pub fn build_all(stats: &[StatSummary]) -> Vec<StatCard> {
        stats
            .iter()
            .enumerate()
            .map(|(index, stat)| StatCard {
                name: stat.name().to_string(),
                value: stat.value().to_string(),
                delta: stat.delta_label(),
                tone: stat.change_direction().into(),
                icon: stat.icon(),
                delay_ms: RevealAnimation::CARD.delay_ms(index),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub title: &'static str,
    pub description: &'static str,
    pub colors: &'static [&'static str],
    pub series: ChartSeries,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomePage {
    pub title: &'static str,
    pub tagline: &'static str,
    pub get_started: Control,
    pub features: Vec<Feature>,
    pub animation: RevealAnimation,
}

impl HomePage {
    pub fn build() -> Self {
        Self {
            title: "Welcome to Ivy",
            tagline: "Your AI-powered interview assistant. Enhance your hiring process with \
                      advanced analytics and real-time insights.",
            get_started: Control::new("Get Started", ActionIntent::Navigate(Route::Login)),
            features: vec![
                Feature {
                    title: "AI-Powered Analysis",
                    description: "Real-time emotion detection and behavioral analysis during interviews.",
                },
                Feature {
                    title: "Advanced Analytics",
                    description: "Comprehensive reports and insights to make better hiring decisions.",
                },
                Feature {
                    title: "Smart Scheduling",
                    description: "Automated interview scheduling with calendar integration.",
                },
            ],
            animation: RevealAnimation::HERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderButton {
    pub provider: AuthProvider,
    pub label: &'static str,
    pub icon: Icon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginPage {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub providers: Vec<ProviderButton>,
    pub callback: Route,
    pub terms: Route,
    pub privacy: Route,
}

impl LoginPage {
    pub fn build() -> Self {
        Self {
            title: "Welcome back",
            subtitle: "Sign in to your account to continue",
            providers: AuthProvider::ALL
                .into_iter()
                .map(|provider| ProviderButton {
                    provider,
                    label: provider.label(),
                    icon: provider.icon(),
                })
                .collect(),
            callback: Route::Dashboard,
            terms: Route::Terms,
            privacy: Route::Privacy,
        }
    }

    /// Hands the login to the identity provider and returns where the user
    /// ends up. Failure keeps them on the login view without retrying.
    pub fn sign_in(&self, identity: &dyn IdentityProvider, provider: AuthProvider) -> Route {
        match identity.sign_in(provider, self.callback) {
            SignInOutcome::Redirected(route) => route,
            SignInOutcome::Declined => {
                tracing::info!(provider = provider.id(), "sign-in declined, staying on login");
                Route::Login
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentInterview {
    pub id: i64,
    pub position: String,
    pub candidate: String,
    pub when: String,
    pub duration: String,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionButton {
    pub name: String,
    pub icon: Icon,
    pub intent: ActionIntent,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPage {
    pub title: &'static str,
    pub new_interview: Control,
    pub stats: Vec<StatCard>,
    pub recent_interviews: Vec<RecentInterview>,
    pub view_all: Control,
    pub quick_actions: Vec<ActionButton>,
    #[serde(skip)]
    pub registry: ActionRegistry,
}

impl DashboardPage {
    pub fn build(providers: &Providers, ctx: ViewContext) -> Result<Self, DataIntegrityError> {
        let data = providers.data();
        let recent_interviews = data
            .interviews()
            .iter()
            .take(RECENT_INTERVIEW_COUNT)
            .enumerate()
            .map(|(index, record)| RecentInterview {
                id: record.id,
                position: record.position.clone(),
                candidate: record.candidate.clone(),
                when: display::relative_label(record.scheduled_at, ctx.today, ctx.locale),
                duration: record.duration_label.clone(),
                delay_ms: RevealAnimation::LIST_ITEM.delay_ms(index),
            })
            .collect();

        let registry = ActionRegistry::dashboard()?;
        let quick_actions = registry
            .actions()
            .iter()
            .enumerate()
            .map(|(index, action)| ActionButton {
                name: action.name.clone(),
                icon: action.icon,
                intent: action.intent,
                delay_ms: RevealAnimation::ACTION.delay_ms(index),
            })
            .collect();

        Ok(Self {
            title: "Dashboard",
            new_interview: Control::new("New Interview", ActionIntent::Placeholder),
            stats: StatCard::build_all(data.dashboard_stats()),
            recent_interviews,
            view_all: Control::new("View all", ActionIntent::Navigate(Route::Interviews)),
            quick_actions,
            registry,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewCard {
    pub id: i64,
    pub position: String,
    pub candidate: String,
    pub date: String,
    pub duration: String,
    pub category: String,
    pub status: InterviewStatus,
    pub badge: Badge,
    pub delay_ms: u32,
}

impl InterviewCard {
    fn build(record: &InterviewRecord, index: usize, locale: DisplayLocale) -> Self {
        Self {
            id: record.id,
            position: record.position.clone(),
            candidate: record.candidate.clone(),
            date: display::local_date(record.scheduled_at, locale),
            duration: record.duration_label.clone(),
            category: record.category.clone(),
            status: record.status,
            badge: record.status.into(),
            delay_ms: RevealAnimation::CARD.delay_ms(index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewsPage {
    pub title: &'static str,
    pub schedule: Control,
    pub category_options: Vec<&'static str>,
    pub status_options: Vec<String>,
    pub filter: InterviewFilter,
    pub total: usize,
    pub interviews: Vec<InterviewCard>,
}

impl InterviewsPage {
    pub fn build(providers: &Providers, ctx: ViewContext, filter: InterviewFilter) -> Self {
        let records = providers.data().interviews();
        let interviews = filter
            .apply(records)
            .into_iter()
            .enumerate()
            .map(|(index, record)| InterviewCard::build(record, index, ctx.locale))
            .collect();

        let status_options = std::iter::once(ALL_STATUSES.to_string())
            .chain(InterviewStatus::ALL.into_iter().map(|status| capitalize(status.as_str())))
            .collect();

        Self {
            title: "Interviews",
            schedule: Control::new("Schedule Interview", ActionIntent::Placeholder),
            category_options: CATEGORY_OPTIONS.to_vec(),
            status_options,
            filter,
            total: records.len(),
            interviews,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsPeriod {
    #[default]
    #[value(name = "30d")]
    Last30Days,
    #[value(name = "90d")]
    Last90Days,
    #[value(name = "1y")]
    LastYear,
}

impl AnalyticsPeriod {
    pub fn label(self) -> &'static str {
        match self {
            AnalyticsPeriod::Last30Days => "Last 30 days",
            AnalyticsPeriod::Last90Days => "Last 90 days",
            AnalyticsPeriod::LastYear => "Last year",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsPage {
    pub title: &'static str,
    pub period: AnalyticsPeriod,
    pub export: Control,
    pub trends: ChartView,
    pub performance: ChartView,
    pub stats: Vec<StatCard>,
}

impl AnalyticsPage {
    pub fn build(providers: &Providers, period: AnalyticsPeriod) -> Self {
        let data = providers.data();
        Self {
            title: "Analytics",
            period,
            export: Control::new("Export Report", ActionIntent::Placeholder),
            trends: ChartView {
                title: "Interview Trends",
                description: "Total interviews vs successful hires",
                colors: &["blue", "green"],
                series: data.interview_trends().clone(),
                delay_ms: RevealAnimation::PANEL.delay_ms(0),
            },
            performance: ChartView {
                title: "Performance Metrics",
                description: "Average scores across different categories",
                colors: &["purple"],
                series: data.category_performance().clone(),
                delay_ms: RevealAnimation::PANEL.delay_ms(1),
            },
            stats: StatCard::build_all(data.analytics_stats()),
        }
    }
}

/// Every view this layer can render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    Home(HomePage),
    Login(LoginPage),
    Dashboard(DashboardPage),
    Interviews(InterviewsPage),
    Analytics(AnalyticsPage),
}

/// Builds the view for a route with default selections. Routes served
/// outside the dashboard yield `None`.
pub fn open(
    route: Route,
    providers: &Providers,
    ctx: ViewContext,
) -> Result<Option<Page>, DataIntegrityError> {
    tracing::debug!(path = route.path(), "opening view");
    let page = match route {
        Route::Home => Page::Home(HomePage::build()),
        Route::Login => Page::Login(LoginPage::build()),
        Route::Dashboard => Page::Dashboard(DashboardPage::build(providers, ctx)?),
        Route::Interviews => {
            let filter = InterviewFilter::default();
            Page::Interviews(InterviewsPage::build(providers, ctx, filter))
        }
        Route::Analytics => {
            Page::Analytics(AnalyticsPage::build(providers, AnalyticsPeriod::default()))
        }
        Route::Terms | Route::Privacy => return Ok(None),
    };
    Ok(Some(page))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::models::ChangeDirection;
    use crate::providers::ThemeMode;
    use crate::source::Snapshot;

    fn providers() -> Providers {
        Providers::new(ThemeMode::System, None, Box::new(Snapshot::sample().unwrap()))
    }

    fn ctx(locale: DisplayLocale) -> ViewContext {
        ViewContext {
            locale,
            today: NaiveDate::from_ymd_opt(2023, 12, 10).unwrap(),
        }
    }

    /// Minimal source used to show pages accept any conforming provider.
    struct CustomSource(Snapshot);

    impl crate::source::DataSource for CustomSource {
        fn dashboard_stats(&self) -> &[StatSummary] {
            &self.0.dashboard_stats
        }
        fn analytics_stats(&self) -> &[StatSummary] {
            &self.0.analytics_stats
        }
        fn interviews(&self) -> &[InterviewRecord] {
            &self.0.interviews
        }
        fn interview_trends(&self) -> &ChartSeries {
            &self.0.interview_trends
        }
        fn category_performance(&self) -> &ChartSeries {
            &self.0.category_performance
        }
    }

    #[test]
    fn stat_cards_follow_direction_and_stagger() {
        let page = DashboardPage::build(&providers(), ctx(DisplayLocale::EnUs)).unwrap();
        let tones: Vec<Tone> = page.stats.iter().map(|card| card.tone).collect();
        assert_eq!(
            tones,
            vec![Tone::Affirmative, Tone::Affirmative, Tone::Warning, Tone::Affirmative]
        );
        assert_eq!(page.stats[2].delta, "-2.5%");
        let delays: Vec<u32> = page.stats.iter().map(|card| card.delay_ms).collect();
        assert_eq!(delays, vec![0, 100, 200, 300]);

        let analytics = page
            .quick_actions
            .iter()
            .find(|action| action.name == "View Analytics")
            .unwrap();
        assert_eq!(analytics.intent, ActionIntent::Navigate(Route::Analytics));
        assert_eq!(analytics.delay_ms, 100);
        assert_eq!(
            page.registry.activate("Settings"),
            Some(ActionIntent::Placeholder)
        );
    }

    #[test]
    fn recent_interviews_use_relative_labels() {
        let page = DashboardPage::build(&providers(), ctx(DisplayLocale::EnUs)).unwrap();
        let labels: Vec<&str> = page.recent_interviews.iter().map(|r| r.when.as_str()).collect();
        assert_eq!(labels, vec!["Today, 2:00 PM", "Today, 3:30 PM", "Tomorrow, 10:00 AM"]);
        assert_eq!(page.view_all.intent, ActionIntent::Navigate(Route::Interviews));
    }

    #[test]
    fn dates_are_recomputed_when_locale_changes() {
        let providers = providers();
        let filter = InterviewFilter::default();
        let us = InterviewsPage::build(&providers, ctx(DisplayLocale::EnUs), filter.clone());
        let de = InterviewsPage::build(&providers, ctx(DisplayLocale::DeDe), filter);
        assert_eq!(us.interviews[0].date, "12/10/2023");
        assert_eq!(de.interviews[0].date, "10.12.2023");
    }

    #[test]
    fn interview_page_reports_filtered_subset() {
        let filter = InterviewFilter {
            search: "chen".to_string(),
            ..InterviewFilter::default()
        };
        let page = InterviewsPage::build(&providers(), ctx(DisplayLocale::EnUs), filter);
        assert_eq!(page.total, 3);
        assert_eq!(page.interviews.len(), 1);
        assert_eq!(page.interviews[0].candidate, "Michael Chen");
        assert_eq!(page.interviews[0].badge, Badge::Pending);
        assert_eq!(page.interviews[0].delay_ms, 0);
        assert_eq!(page.status_options, vec!["All Status", "Scheduled", "Completed", "Cancelled"]);
    }

    #[test]
    fn chart_series_keep_input_order() {
        let mut snapshot = Snapshot::sample().unwrap();
        let mut trends = ChartSeries::new("date", &["Total Interviews", "Successful Hires"]);
        for month in ["2023-03", "2023-01", "2023-02"] {
            trends
                .push(month, &[("Total Interviews", 10.0), ("Successful Hires", 5.0)])
                .unwrap();
        }
        snapshot.interview_trends = trends;
        let providers = Providers::new(ThemeMode::Dark, None, Box::new(CustomSource(snapshot)));

        let page = AnalyticsPage::build(&providers, AnalyticsPeriod::LastYear);
        let order: Vec<&str> = page
            .trends
            .series
            .points()
            .iter()
            .map(|p| p.index.as_str())
            .collect();
        assert_eq!(order, vec!["2023-03", "2023-01", "2023-02"]);
        assert_eq!(page.performance.delay_ms, 200);
        assert_eq!(page.export.intent, ActionIntent::Placeholder);
    }

    #[test]
    fn analytics_negative_delta_uses_warning_tone() {
        let page = AnalyticsPage::build(&providers(), AnalyticsPeriod::default());
        let hire = page
            .stats
            .iter()
            .find(|card| card.name == "Average Time to Hire")
            .unwrap();
        assert_eq!(hire.delta, "-2.3 days");
        assert_eq!(hire.tone, Tone::from(ChangeDirection::Negative));
    }

    struct ScriptedIdentity {
        accept: bool,
        calls: RefCell<Vec<(AuthProvider, Route)>>,
    }

    impl IdentityProvider for ScriptedIdentity {
        fn sign_in(&self, provider: AuthProvider, callback: Route) -> SignInOutcome {
            self.calls.borrow_mut().push((provider, callback));
            if self.accept {
                SignInOutcome::Redirected(callback)
            } else {
                SignInOutcome::Declined
            }
        }
    }

    #[test]
    fn sign_in_redirects_to_dashboard_or_stays_on_login() {
        let page = LoginPage::build();
        let accepting = ScriptedIdentity {
            accept: true,
            calls: RefCell::new(Vec::new()),
        };
        assert_eq!(page.sign_in(&accepting, AuthProvider::Github), Route::Dashboard);
        assert_eq!(
            accepting.calls.borrow().as_slice(),
            &[(AuthProvider::Github, Route::Dashboard)]
        );

        let declining = ScriptedIdentity {
            accept: false,
            calls: RefCell::new(Vec::new()),
        };
        assert_eq!(page.sign_in(&declining, AuthProvider::Google), Route::Login);
        assert_eq!(declining.calls.borrow().len(), 1);
    }

    #[test]
    fn configured_session_completes_sign_in() {
        let page = LoginPage::build();
        let session = crate::providers::Session {
            user: "avery".to_string(),
        };
        let identity = crate::providers::SessionIdentity::new(Some(&session));
        assert_eq!(page.sign_in(&identity, AuthProvider::Google), Route::Dashboard);

        let anonymous = crate::providers::SessionIdentity::new(None);
        assert_eq!(page.sign_in(&anonymous, AuthProvider::Google), Route::Login);
    }

    #[test]
    fn open_resolves_internal_routes_only() {
        let providers = providers();
        let ctx = ctx(DisplayLocale::Iso);
        assert!(matches!(open(Route::Home, &providers, ctx), Ok(Some(Page::Home(_)))));
        assert!(matches!(open(Route::Analytics, &providers, ctx), Ok(Some(Page::Analytics(_)))));
        assert_eq!(open(Route::Privacy, &providers, ctx), Ok(None));
    }
}
