use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::DataIntegrityError;
use crate::models::{
    ensure_unique_ids, ChangeDirection, ChartSeries, InterviewRecord, RawInterview, StatSummary,
};
use crate::ui::Icon;

pub const TREND_CATEGORIES: [&str; 2] = ["Total Interviews", "Successful Hires"];

/// Anything that can hand the dashboard its entities. Everything returned has
/// already been validated.
pub trait DataSource {
    fn dashboard_stats(&self) -> &[StatSummary];
    fn analytics_stats(&self) -> &[StatSummary];
    fn interviews(&self) -> &[InterviewRecord];
    fn interview_trends(&self) -> &ChartSeries;
    fn category_performance(&self) -> &ChartSeries;
}

/// In-memory data source: the embedded sample data, a JSON file, or rows
/// loaded from Postgres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct Snapshot {
    pub dashboard_stats: Vec<StatSummary>,
    pub analytics_stats: Vec<StatSummary>,
    pub interviews: Vec<InterviewRecord>,
    pub interview_trends: ChartSeries,
    pub category_performance: ChartSeries,
}

#[derive(Deserialize)]
struct RawSnapshot {
    dashboard_stats: Vec<StatSummary>,
    analytics_stats: Vec<StatSummary>,
    interviews: Vec<InterviewRecord>,
    interview_trends: ChartSeries,
    category_performance: ChartSeries,
}

impl TryFrom<RawSnapshot> for Snapshot {
    type Error = DataIntegrityError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        Snapshot::new(
            raw.dashboard_stats,
            raw.analytics_stats,
            raw.interviews,
            raw.interview_trends,
            raw.category_performance,
        )
    }
}

impl Snapshot {
    pub fn new(
        dashboard_stats: Vec<StatSummary>,
        analytics_stats: Vec<StatSummary>,
        interviews: Vec<InterviewRecord>,
        interview_trends: ChartSeries,
        category_performance: ChartSeries,
    ) -> Result<Self, DataIntegrityError> {
        ensure_unique_ids(&interviews)?;
        Ok(Self {
            dashboard_stats,
            analytics_stats,
            interviews,
            interview_trends,
            category_performance,
        })
    }

    /// Placeholder content shown until a backend is attached.
    pub fn sample() -> Result<Self, DataIntegrityError> {
        use ChangeDirection::{Negative, Positive};

        let dashboard_stats = vec![
            StatSummary::new("Total Interviews", "156", 12.3, "%", Positive, Icon::Users)?,
            StatSummary::new("Scheduled Today", "8", 4.1, "%", Positive, Icon::Calendar)?,
            StatSummary::new("Average Duration", "45m", -2.5, "%", Negative, Icon::Clock)?,
            StatSummary::new("Success Rate", "89%", 5.2, "%", Positive, Icon::TrendingUp)?,
        ];

        let analytics_stats = vec![
            StatSummary::new(
                "Interview Success Rate",
                "68%",
                5.2,
                "%",
                Positive,
                Icon::TrendingUp,
            )?,
            StatSummary::new(
                "Average Time to Hire",
                "18 days",
                -2.3,
                " days",
                Negative,
                Icon::Clock,
            )?,
            StatSummary::new("Active Candidates", "245", 12.0, "", Positive, Icon::Users)?,
            StatSummary::new("Scheduled Interviews", "38", 5.0, "", Positive, Icon::Calendar)?,
        ];

        let interviews = vec![
            InterviewRecord::new(
                1,
                "Senior Frontend Developer",
                "Sarah Johnson",
                "2023-12-10T14:00:00",
                "1 hour",
                "Technical Interview",
                "scheduled",
            )?,
            InterviewRecord::new(
                2,
                "Product Manager",
                "Michael Chen",
                "2023-12-10T15:30:00",
                "45 minutes",
                "First Round",
                "scheduled",
            )?,
            InterviewRecord::new(
                3,
                "UX Designer",
                "Emily Brown",
                "2023-12-11T10:00:00",
                "1 hour",
                "Portfolio Review",
                "scheduled",
            )?,
        ];

        let mut interview_trends = ChartSeries::new("date", &TREND_CATEGORIES);
        for (month, total, hires) in [
            ("2023-01", 45.0, 20.0),
            ("2023-02", 52.0, 24.0),
            ("2023-03", 48.0, 22.0),
        ] {
            interview_trends.push(
                month,
                &[(TREND_CATEGORIES[0], total), (TREND_CATEGORIES[1], hires)],
            )?;
        }

        let mut category_performance = ChartSeries::new("category", &["score"]);
        for (category, score) in [
            ("Technical Skills", 85.0),
            ("Communication", 92.0),
            ("Problem Solving", 78.0),
            ("Cultural Fit", 88.0),
        ] {
            category_performance.push(category, &[("score", score)])?;
        }

        Snapshot::new(
            dashboard_stats,
            analytics_stats,
            interviews,
            interview_trends,
            category_performance,
        )
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read data file {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&contents)
            .with_context(|| format!("invalid dashboard data in {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            interviews = snapshot.interviews.len(),
            trend_points = snapshot.interview_trends.points().len(),
            "loaded dashboard snapshot"
        );
        Ok(snapshot)
    }
}

impl DataSource for Snapshot {
    fn dashboard_stats(&self) -> &[StatSummary] {
        &self.dashboard_stats
    }

    fn analytics_stats(&self) -> &[StatSummary] {
        &self.analytics_stats
    }

    fn interviews(&self) -> &[InterviewRecord] {
        &self.interviews
    }

    fn interview_trends(&self) -> &ChartSeries {
        &self.interview_trends
    }

    fn category_performance(&self) -> &ChartSeries {
        &self.category_performance
    }
}

/// One row of an interview import file.
#[derive(Debug, Deserialize)]
pub struct CsvInterview {
    pub id: i64,
    pub position: String,
    pub candidate: String,
    pub scheduled_at: String,
    pub duration_label: String,
    pub category: String,
    pub status: String,
    pub source_key: Option<String>,
}

impl CsvInterview {
    fn into_parts(self) -> (RawInterview, Option<String>) {
        let raw = RawInterview {
            id: self.id,
            position: self.position,
            candidate: self.candidate,
            scheduled_at: self.scheduled_at,
            duration_label: self.duration_label,
            category: self.category,
            status: self.status,
        };
        (raw, self.source_key)
    }
}

/// Reads and validates an interview CSV. The first bad row aborts the whole
/// file so nothing partial is imported.
pub fn read_interviews_csv(path: &Path) -> anyhow::Result<Vec<(InterviewRecord, Option<String>)>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut rows = Vec::new();

    for (line, result) in reader.deserialize::<CsvInterview>().enumerate() {
        let row = result
            .with_context(|| format!("malformed row {} in {}", line + 1, path.display()))?;
        let (raw, source_key) = row.into_parts();
        let record = InterviewRecord::try_from(raw)
            .with_context(|| format!("rejected row {} in {}", line + 1, path.display()))?;
        let source_key = source_key.filter(|key| !key.trim().is_empty());
        rows.push((record, source_key));
    }

    let records: Vec<InterviewRecord> = rows.iter().map(|(record, _)| record.clone()).collect();
    ensure_unique_ids(&records)?;
    Ok(rows)
}
