use std::path::Path;

use anyhow::Context;
use chrono::NaiveDateTime;
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

use crate::error::DataIntegrityError;
use crate::models::{ChangeDirection, ChartSeries, InterviewRecord, StatSummary};
use crate::source::{self, Snapshot, TREND_CATEGORIES};
use crate::ui::Icon;

const DASHBOARD_PAGE: &str = "dashboard";
const ANALYTICS_PAGE: &str = "analytics";

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Stores the placeholder dataset so a fresh database renders the same pages
/// as the embedded source. Safe to run repeatedly; runs in one transaction.
pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let sample = Snapshot::sample()?;
    let mut tx = pool.begin().await?;

    for (page, stats) in [
        (DASHBOARD_PAGE, &sample.dashboard_stats),
        (ANALYTICS_PAGE, &sample.analytics_stats),
    ] {
        for (position, stat) in stats.iter().enumerate() {
            upsert_stat(&mut *tx, page, position, stat).await?;
        }
    }

    for interview in &sample.interviews {
        upsert_interview(&mut *tx, interview, &format!("seed-{}", interview.id)).await?;
    }

    for (position, point) in sample.interview_trends.points().iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO ivy.analytics (position, period_label, total_interviews, successful_hires)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (position) DO UPDATE
            SET period_label = EXCLUDED.period_label,
                total_interviews = EXCLUDED.total_interviews,
                successful_hires = EXCLUDED.successful_hires
            "#,
        )
        .bind(position as i32)
        .bind(&point.index)
        .bind(point.values[0] as i32)
        .bind(point.values[1] as i32)
        .execute(&mut *tx)
        .await?;
    }

    for (position, point) in sample.category_performance.points().iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO ivy.category_scores (position, category, score)
            VALUES ($1, $2, $3)
            ON CONFLICT (position) DO UPDATE
            SET category = EXCLUDED.category, score = EXCLUDED.score
            "#,
        )
        .bind(position as i32)
        .bind(&point.index)
        .bind(point.values[0])
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await.context("failed to commit seed data")?;
    tracing::info!(interviews = sample.interviews.len(), "seeded sample dashboard data");
    Ok(())
}

async fn upsert_stat(
    conn: &mut PgConnection,
    page: &str,
    position: usize,
    stat: &StatSummary,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO ivy.stat_cards
        (page, position, name, value, change_magnitude, change_unit, change_direction, icon)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (page, position) DO UPDATE
        SET name = EXCLUDED.name,
            value = EXCLUDED.value,
            change_magnitude = EXCLUDED.change_magnitude,
            change_unit = EXCLUDED.change_unit,
            change_direction = EXCLUDED.change_direction,
            icon = EXCLUDED.icon
        "#,
    )
    .bind(page)
    .bind(position as i32)
    .bind(stat.name())
    .bind(stat.value())
    .bind(stat.change_magnitude())
    .bind(stat.change_unit())
    .bind(stat.change_direction().as_str())
    .bind(stat.icon().name())
    .execute(conn)
    .await?;
    Ok(())
}

/// An interview id may only be rewritten by the row that already owns it.
fn check_id_owner(
    id: i64,
    source_key: &str,
    owner: Option<&str>,
) -> Result<(), DataIntegrityError> {
    match owner {
        Some(existing) if existing != source_key => Err(DataIntegrityError::InterviewIdTaken {
            id,
            existing: existing.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Inserts or updates the row keyed by `source_key`. Returns true when a new
/// row was written.
async fn upsert_interview(
    conn: &mut PgConnection,
    interview: &InterviewRecord,
    source_key: &str,
) -> anyhow::Result<bool> {
    let owner: Option<String> =
        sqlx::query_scalar("SELECT source_key FROM ivy.interviews WHERE id = $1")
            .bind(interview.id)
            .fetch_optional(&mut *conn)
            .await?;
    check_id_owner(interview.id, source_key, owner.as_deref())?;

    let row = sqlx::query(
        r#"
        INSERT INTO ivy.interviews
        (id, position, candidate_name, scheduled_time, duration_label, interview_type,
         status, source_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (source_key) DO UPDATE
        SET id = EXCLUDED.id,
            position = EXCLUDED.position,
            candidate_name = EXCLUDED.candidate_name,
            scheduled_time = EXCLUDED.scheduled_time,
            duration_label = EXCLUDED.duration_label,
            interview_type = EXCLUDED.interview_type,
            status = EXCLUDED.status
        RETURNING (xmax = 0) AS inserted
        "#,
    )
    .bind(interview.id)
    .bind(&interview.position)
    .bind(&interview.candidate)
    .bind(interview.scheduled_at)
    .bind(&interview.duration_label)
    .bind(&interview.category)
    .bind(interview.status.as_str())
    .bind(source_key)
    .fetch_one(&mut *conn)
    .await
    .with_context(|| format!("failed to store interview {}", interview.id))?;

    Ok(row.get("inserted"))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportCounts {
    pub inserted: usize,
    pub updated: usize,
}

/// Upserts every CSV row by `source_key` in one transaction. Any rejected row,
/// including an id already owned by another source key, rolls back the file.
pub async fn import_csv(pool: &PgPool, csv_path: &Path) -> anyhow::Result<ImportCounts> {
    let rows = source::read_interviews_csv(csv_path)?;
    let mut counts = ImportCounts::default();
    let mut tx = pool.begin().await?;

    for (interview, source_key) in rows {
        let source_key = source_key.unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));
        let inserted = upsert_interview(&mut *tx, &interview, &source_key)
            .await
            .with_context(|| format!("import of {} rolled back", csv_path.display()))?;
        if inserted {
            counts.inserted += 1;
        } else {
            counts.updated += 1;
        }
    }

    tx.commit()
        .await
        .with_context(|| format!("failed to commit import of {}", csv_path.display()))?;
    tracing::info!(
        path = %csv_path.display(),
        inserted = counts.inserted,
        updated = counts.updated,
        "imported interviews"
    );
    Ok(counts)
}

async fn fetch_stats(pool: &PgPool, page: &str) -> anyhow::Result<Vec<StatSummary>> {
    let rows = sqlx::query(
        "SELECT name, value, change_magnitude, change_unit, change_direction, icon \
         FROM ivy.stat_cards WHERE page = $1 ORDER BY position",
    )
    .bind(page)
    .fetch_all(pool)
    .await?;

    let mut stats = Vec::with_capacity(rows.len());
    for row in rows {
        let direction: String = row.get("change_direction");
        let icon: String = row.get("icon");
        stats.push(StatSummary::new(
            row.get::<String, _>("name"),
            row.get::<String, _>("value"),
            row.get::<f64, _>("change_magnitude"),
            row.get::<String, _>("change_unit"),
            direction.parse::<ChangeDirection>()?,
            icon.parse::<Icon>()?,
        )?);
    }
    Ok(stats)
}

async fn fetch_interviews(pool: &PgPool) -> anyhow::Result<Vec<InterviewRecord>> {
    let rows = sqlx::query(
        "SELECT id, position, candidate_name, scheduled_time, duration_label, \
         interview_type, status \
         FROM ivy.interviews ORDER BY scheduled_time, id",
    )
    .fetch_all(pool)
    .await?;

    let mut interviews = Vec::with_capacity(rows.len());
    for row in rows {
        let scheduled_time: NaiveDateTime = row.get("scheduled_time");
        let status: String = row.get("status");
        interviews.push(InterviewRecord {
            id: row.get("id"),
            position: row.get("position"),
            candidate: row.get("candidate_name"),
            scheduled_at: scheduled_time,
            duration_label: row.get("duration_label"),
            category: row.get("interview_type"),
            status: status.parse()?,
        });
    }
    Ok(interviews)
}

async fn fetch_trends(pool: &PgPool) -> anyhow::Result<ChartSeries> {
    let rows = sqlx::query(
        "SELECT period_label, total_interviews, successful_hires \
         FROM ivy.analytics ORDER BY position",
    )
    .fetch_all(pool)
    .await?;

    let mut series = ChartSeries::new("date", &TREND_CATEGORIES);
    for row in rows {
        let label: String = row.get("period_label");
        let total: i32 = row.get("total_interviews");
        let hires: i32 = row.get("successful_hires");
        series.push(
            label,
            &[
                (TREND_CATEGORIES[0], f64::from(total)),
                (TREND_CATEGORIES[1], f64::from(hires)),
            ],
        )?;
    }
    Ok(series)
}

async fn fetch_category_scores(pool: &PgPool) -> anyhow::Result<ChartSeries> {
    let rows = sqlx::query("SELECT category, score FROM ivy.category_scores ORDER BY position")
        .fetch_all(pool)
        .await?;

    let mut series = ChartSeries::new("category", &["score"]);
    for row in rows {
        let category: String = row.get("category");
        let score: f64 = row.get("score");
        series.push(category, &[("score", score)])?;
    }
    Ok(series)
}

/// Reads every table into a validated snapshot. Any row that breaks an
/// invariant fails the whole load.
pub async fn load_snapshot(pool: &PgPool) -> anyhow::Result<Snapshot> {
    let snapshot = Snapshot::new(
        fetch_stats(pool, DASHBOARD_PAGE).await.context("failed to load dashboard stats")?,
        fetch_stats(pool, ANALYTICS_PAGE).await.context("failed to load analytics stats")?,
        fetch_interviews(pool).await.context("failed to load interviews")?,
        fetch_trends(pool).await.context("failed to load interview trends")?,
        fetch_category_scores(pool).await.context("failed to load category scores")?,
    )?;

    tracing::info!(
        interviews = snapshot.interviews.len(),
        trend_points = snapshot.interview_trends.points().len(),
        "loaded dashboard snapshot from postgres"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unowned_or_same_key_id_may_be_written() {
        assert_eq!(check_id_owner(7, "import-a", None), Ok(()));
        assert_eq!(check_id_owner(7, "import-a", Some("import-a")), Ok(()));
    }

    #[test]
    fn id_owned_by_another_key_is_rejected() {
        assert_eq!(
            check_id_owner(1, "import-b", Some("seed-1")),
            Err(DataIntegrityError::InterviewIdTaken {
                id: 1,
                existing: "seed-1".to_string(),
            })
        );
    }
}
