use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::display;
use crate::error::DataIntegrityError;
use crate::ui::Icon;

/// Largest magnitude an `f64` holds with every integer below it exact.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Positive,
    Negative,
}

impl ChangeDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeDirection::Positive => "positive",
            ChangeDirection::Negative => "negative",
        }
    }

    /// Zero carries no sign, so it agrees with either direction.
    fn agrees_with(self, magnitude: f64) -> bool {
        match self {
            ChangeDirection::Positive => magnitude >= 0.0,
            ChangeDirection::Negative => magnitude <= 0.0,
        }
    }
}

impl std::str::FromStr for ChangeDirection {
    type Err = DataIntegrityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(ChangeDirection::Positive),
            "negative" => Ok(ChangeDirection::Negative),
            _ => Err(DataIntegrityError::UnknownDirection(value.to_string())),
        }
    }
}

/// A labeled metric card. `change_direction` is authored alongside the magnitude
/// rather than derived from it, so construction checks that the two agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStatSummary")]
pub struct StatSummary {
    name: String,
    value: String,
    change_magnitude: f64,
    change_unit: String,
    change_direction: ChangeDirection,
    icon: Icon,
}

#[derive(Deserialize)]
struct RawStatSummary {
    #[serde(alias = "title")]
    name: String,
    value: String,
    change_magnitude: f64,
    #[serde(default)]
    change_unit: String,
    change_direction: ChangeDirection,
    icon: Icon,
}

impl TryFrom<RawStatSummary> for StatSummary {
    type Error = DataIntegrityError;

    fn try_from(raw: RawStatSummary) -> Result<Self, Self::Error> {
        StatSummary::new(
            raw.name,
            raw.value,
            raw.change_magnitude,
            raw.change_unit,
            raw.change_direction,
            raw.icon,
        )
    }
}

impl StatSummary {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        change_magnitude: f64,
        change_unit: impl Into<String>,
        change_direction: ChangeDirection,
        icon: Icon,
    ) -> Result<Self, DataIntegrityError> {
        let name = name.into();
        if !change_magnitude.is_finite() {
            return Err(DataIntegrityError::NonFiniteChange(name));
        }
        if !change_direction.agrees_with(change_magnitude) {
            return Err(DataIntegrityError::DirectionMismatch {
                name,
                magnitude: change_magnitude,
                direction: change_direction,
            });
        }

        Ok(Self {
            name,
            value: value.into(),
            // -0.0 would otherwise print as "-0"
            change_magnitude: if change_magnitude == 0.0 { 0.0 } else { change_magnitude },
            change_unit: change_unit.into(),
            change_direction,
            icon,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn change_magnitude(&self) -> f64 {
        self.change_magnitude
    }

    pub fn change_unit(&self) -> &str {
        &self.change_unit
    }

    pub fn change_direction(&self) -> ChangeDirection {
        self.change_direction
    }

    pub fn icon(&self) -> Icon {
        self.icon
    }

    /// Signed delta with its unit, e.g. `+12.3%` or `-2.3 days`.
    pub fn delta_label(&self) -> String {
        format!("{:+}{}", self.change_magnitude, self.change_unit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub const ALL: [InterviewStatus; 3] = [
        InterviewStatus::Scheduled,
        InterviewStatus::Completed,
        InterviewStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for InterviewStatus {
    type Err = DataIntegrityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        InterviewStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| DataIntegrityError::UnknownStatus(value.to_string()))
    }
}

impl<'de> Deserialize<'de> for InterviewStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInterview")]
pub struct InterviewRecord {
    pub id: i64,
    pub position: String,
    pub candidate: String,
    pub scheduled_at: NaiveDateTime,
    pub duration_label: String,
    pub category: String,
    pub status: InterviewStatus,
}

#[derive(Debug, Deserialize)]
pub struct RawInterview {
    pub id: i64,
    pub position: String,
    pub candidate: String,
    #[serde(alias = "date")]
    pub scheduled_at: String,
    #[serde(alias = "duration")]
    pub duration_label: String,
    #[serde(alias = "type")]
    pub category: String,
    pub status: String,
}

impl TryFrom<RawInterview> for InterviewRecord {
    type Error = DataIntegrityError;

    fn try_from(raw: RawInterview) -> Result<Self, Self::Error> {
        let scheduled_at = display::parse_scheduled_at(&raw.scheduled_at).ok_or_else(|| {
            DataIntegrityError::InvalidTimestamp {
                id: raw.id,
                value: raw.scheduled_at.clone(),
            }
        })?;

        Ok(Self {
            id: raw.id,
            position: raw.position,
            candidate: raw.candidate,
            scheduled_at,
            duration_label: raw.duration_label,
            category: raw.category,
            status: raw.status.parse()?,
        })
    }
}

impl InterviewRecord {
    pub fn new(
        id: i64,
        position: &str,
        candidate: &str,
        scheduled_at: &str,
        duration_label: &str,
        category: &str,
        status: &str,
    ) -> Result<Self, DataIntegrityError> {
        RawInterview {
            id,
            position: position.to_string(),
            candidate: candidate.to_string(),
            scheduled_at: scheduled_at.to_string(),
            duration_label: duration_label.to_string(),
            category: category.to_string(),
            status: status.to_string(),
        }
        .try_into()
    }
}

/// Rejects a list in which two records share an id.
pub fn ensure_unique_ids(records: &[InterviewRecord]) -> Result<(), DataIntegrityError> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.id) {
            return Err(DataIntegrityError::DuplicateInterviewId(record.id));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeriesPoint {
    pub index: String,
    /// Aligned with the owning series' `categories`.
    pub values: Vec<f64>,
}

/// An ordered chart series. Points keep their insertion order; the index
/// labels are never sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawChartSeries", into = "RawChartSeries")]
pub struct ChartSeries {
    index: String,
    categories: Vec<String>,
    points: Vec<ChartSeriesPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawChartSeries {
    index: String,
    categories: Vec<String>,
    data: Vec<Map<String, Value>>,
}

impl ChartSeries {
    pub fn new(index: impl Into<String>, categories: &[&str]) -> Self {
        Self {
            index: index.into(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            points: Vec::new(),
        }
    }

    /// Appends a point. `fields` may be listed in any order but must name
    /// exactly the series categories, each once.
    pub fn push(
        &mut self,
        index: impl Into<String>,
        fields: &[(&str, f64)],
    ) -> Result<(), DataIntegrityError> {
        let index = index.into();
        let shape_error = |index: &str| DataIntegrityError::SeriesShape {
            index: index.to_string(),
            expected: self.categories.clone(),
            found: fields.iter().map(|(name, _)| name.to_string()).collect(),
        };

        if fields.len() != self.categories.len() {
            return Err(shape_error(&index));
        }

        let mut values = Vec::with_capacity(self.categories.len());
        for category in &self.categories {
            let mut matching = fields.iter().filter(|(name, _)| name == category);
            let (Some((_, value)), None) = (matching.next(), matching.next()) else {
                return Err(shape_error(&index));
            };
            if !value.is_finite() || *value < 0.0 {
                return Err(DataIntegrityError::InvalidChartValue {
                    index,
                    field: category.clone(),
                    value: *value,
                });
            }
            values.push(*value);
        }

        self.points.push(ChartSeriesPoint { index, values });
        Ok(())
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn points(&self) -> &[ChartSeriesPoint] {
        &self.points
    }

    pub fn max_value(&self) -> f64 {
        self.points
            .iter()
            .flat_map(|point| point.values.iter().copied())
            .fold(0.0, f64::max)
    }
}

impl TryFrom<RawChartSeries> for ChartSeries {
    type Error = DataIntegrityError;

    fn try_from(raw: RawChartSeries) -> Result<Self, Self::Error> {
        let categories: Vec<&str> = raw.categories.iter().map(String::as_str).collect();
        let mut series = ChartSeries::new(raw.index.clone(), &categories);

        for mut row in raw.data {
            let index = match row.remove(&raw.index) {
                Some(Value::String(label)) => label,
                Some(Value::Number(number)) => number.to_string(),
                _ => {
                    return Err(DataIntegrityError::SeriesShape {
                        index: format!("<missing {}>", raw.index),
                        expected: raw.categories.clone(),
                        found: row.keys().cloned().collect(),
                    })
                }
            };

            let mut fields = Vec::with_capacity(row.len());
            for (name, value) in &row {
                let number = value.as_f64().ok_or_else(|| DataIntegrityError::InvalidChartValue {
                    index: index.clone(),
                    field: name.clone(),
                    value: f64::NAN,
                })?;
                fields.push((name.as_str(), number));
            }
            series.push(index, &fields)?;
        }

        Ok(series)
    }
}

impl From<ChartSeries> for RawChartSeries {
    fn from(series: ChartSeries) -> Self {
        let data = series
            .points
            .iter()
            .map(|point| {
                let mut row = Map::new();
                row.insert(series.index.clone(), Value::String(point.index.clone()));
                for (category, value) in series.categories.iter().zip(&point.values) {
                    let number = if value.fract() == 0.0 && value.abs() < EXACT_INTEGER_LIMIT {
                        Number::from(*value as i64)
                    } else {
                        Number::from_f64(*value).unwrap_or_else(|| Number::from(0))
                    };
                    row.insert(category.clone(), Value::Number(number));
                }
                row
            })
            .collect();

        RawChartSeries {
            index: series.index,
            categories: series.categories,
            data,
        }
    }
}
