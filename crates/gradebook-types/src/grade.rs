//! Grade records, weighted totals, grade bands and grade-table sorting keys.
//!
//! A grade is made of four components (usual, midterm, lab, final) weighted
//! 20/20/20/40. The total is recomputed on every write and stored rounded to
//! two decimals; a missing component counts as zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::GradeError;

/// One of the four graded components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreComponent {
    Usual,
    Midterm,
    Lab,
    Final,
}

impl ScoreComponent {
    /// All components in entry order.
    pub const ALL: [ScoreComponent; 4] = [
        ScoreComponent::Usual,
        ScoreComponent::Midterm,
        ScoreComponent::Lab,
        ScoreComponent::Final,
    ];

    /// Weight of this component in the total.
    pub fn weight(self) -> f64 {
        match self {
            ScoreComponent::Usual | ScoreComponent::Midterm | ScoreComponent::Lab => 0.2,
            ScoreComponent::Final => 0.4,
        }
    }

    /// Column key, as used by sort keys and storage.
    pub fn key(self) -> &'static str {
        match self {
            ScoreComponent::Usual => "usual_score",
            ScoreComponent::Midterm => "mid_score",
            ScoreComponent::Lab => "exp_score",
            ScoreComponent::Final => "final_score",
        }
    }

    /// Human-readable label for prompts and table headers.
    pub fn label(self) -> &'static str {
        match self {
            ScoreComponent::Usual => "Usual",
            ScoreComponent::Midterm => "Midterm",
            ScoreComponent::Lab => "Lab",
            ScoreComponent::Final => "Final",
        }
    }

    /// Parse and range-check a score typed for this component.
    pub fn parse_score(self, input: &str) -> Result<f64, GradeError> {
        let value: f64 = input
            .trim()
            .parse()
            .map_err(|_| GradeError::InvalidScore(input.trim().to_string()))?;
        if !(0.0..=100.0).contains(&value) {
            return Err(GradeError::ScoreOutOfRange {
                component: self.key().to_string(),
                value,
            });
        }
        Ok(value)
    }
}

impl fmt::Display for ScoreComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// The component scores of one student in one course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSheet {
    #[serde(default)]
    pub usual: Option<f64>,
    #[serde(default)]
    pub midterm: Option<f64>,
    #[serde(default)]
    pub lab: Option<f64>,
    #[serde(default)]
    pub final_exam: Option<f64>,
}

impl ScoreSheet {
    pub fn get(&self, component: ScoreComponent) -> Option<f64> {
        match component {
            ScoreComponent::Usual => self.usual,
            ScoreComponent::Midterm => self.midterm,
            ScoreComponent::Lab => self.lab,
            ScoreComponent::Final => self.final_exam,
        }
    }

    pub fn set(&mut self, component: ScoreComponent, value: Option<f64>) {
        match component {
            ScoreComponent::Usual => self.usual = value,
            ScoreComponent::Midterm => self.midterm = value,
            ScoreComponent::Lab => self.lab = value,
            ScoreComponent::Final => self.final_exam = value,
        }
    }

    /// Weighted total, missing components counted as zero, rounded to 2 decimals.
    pub fn total(&self) -> f64 {
        let raw: f64 = ScoreComponent::ALL
            .iter()
            .map(|c| self.get(*c).unwrap_or(0.0) * c.weight())
            .sum();
        round2(raw)
    }

    /// Fill every component missing from `self` with the value in `existing`.
    pub fn or_existing(mut self, existing: &ScoreSheet) -> ScoreSheet {
        for component in ScoreComponent::ALL {
            if self.get(component).is_none() {
                self.set(component, existing.get(component));
            }
        }
        self
    }

    /// Check every present component is within 0..=100.
    pub fn validate(&self) -> Result<(), GradeError> {
        for component in ScoreComponent::ALL {
            if let Some(value) = self.get(component) {
                if !(0.0..=100.0).contains(&value) {
                    return Err(GradeError::ScoreOutOfRange {
                        component: component.key().to_string(),
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A stored grade: one student, one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub gid: Uuid,
    pub sid: String,
    pub cid: String,
    pub scores: ScoreSheet,
    /// Weighted total at the time of the last write.
    pub total: f64,
    pub updated_at: DateTime<Utc>,
}

/// A line of a student's transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRow {
    pub cid: String,
    pub course_name: String,
    pub scores: ScoreSheet,
    pub total: f64,
}

/// A line of a teaching class grade table. Scores are absent when the student
/// is enrolled but no grade has been entered yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRow {
    pub sid: String,
    pub name: String,
    pub scores: Option<ScoreSheet>,
    pub total: Option<f64>,
}

impl GradeRow {
    /// Numeric value for a score-based sort key, if present.
    pub fn score_for(&self, key: SortKey) -> Option<f64> {
        match key {
            SortKey::Sid | SortKey::Name => None,
            SortKey::Total => self.total,
            SortKey::Component(component) => self.scores.and_then(|s| s.get(component)),
        }
    }
}

/// Column a grade table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Sid,
    Name,
    Component(ScoreComponent),
    Total,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Sid,
        SortKey::Name,
        SortKey::Component(ScoreComponent::Usual),
        SortKey::Component(ScoreComponent::Midterm),
        SortKey::Component(ScoreComponent::Lab),
        SortKey::Component(ScoreComponent::Final),
        SortKey::Total,
    ];
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Sid => write!(f, "sid"),
            SortKey::Name => write!(f, "name"),
            SortKey::Component(c) => write!(f, "{}", c.key()),
            SortKey::Total => write!(f, "total_score"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sid" => Ok(SortKey::Sid),
            "name" => Ok(SortKey::Name),
            "usual_score" => Ok(SortKey::Component(ScoreComponent::Usual)),
            "mid_score" => Ok(SortKey::Component(ScoreComponent::Midterm)),
            "exp_score" => Ok(SortKey::Component(ScoreComponent::Lab)),
            "final_score" => Ok(SortKey::Component(ScoreComponent::Final)),
            "total_score" => Ok(SortKey::Total),
            other => Err(format!("invalid sort key: '{other}'")),
        }
    }
}

/// Sort direction for grade tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("invalid sort order: '{other}'")),
        }
    }
}

/// Bucket a total score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeBand {
    Excellent,
    Good,
    Fair,
    Pass,
    Fail,
    Missing,
}

impl GradeBand {
    /// Bands in display order.
    pub const ALL: [GradeBand; 6] = [
        GradeBand::Excellent,
        GradeBand::Good,
        GradeBand::Fair,
        GradeBand::Pass,
        GradeBand::Fail,
        GradeBand::Missing,
    ];

    /// Band for a total; `None` means no grade has been entered.
    pub fn for_total(total: Option<f64>) -> GradeBand {
        match total {
            None => GradeBand::Missing,
            Some(t) if t >= 90.0 => GradeBand::Excellent,
            Some(t) if t >= 80.0 => GradeBand::Good,
            Some(t) if t >= 70.0 => GradeBand::Fair,
            Some(t) if t >= 60.0 => GradeBand::Pass,
            Some(_) => GradeBand::Fail,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GradeBand::Excellent => "90-100 (excellent)",
            GradeBand::Good => "80-89 (good)",
            GradeBand::Fair => "70-79 (fair)",
            GradeBand::Pass => "60-69 (pass)",
            GradeBand::Fail => "<60 (fail)",
            GradeBand::Missing => "not entered",
        }
    }

    fn index(self) -> usize {
        match self {
            GradeBand::Excellent => 0,
            GradeBand::Good => 1,
            GradeBand::Fair => 2,
            GradeBand::Pass => 3,
            GradeBand::Fail => 4,
            GradeBand::Missing => 5,
        }
    }
}

/// Count of students per grade band for one teaching class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Distribution {
    counts: [usize; 6],
}

impl Distribution {
    pub fn record(&mut self, total: Option<f64>) {
        self.counts[GradeBand::for_total(total).index()] += 1;
    }

    pub fn count(&self, band: GradeBand) -> usize {
        self.counts[band.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(band, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (GradeBand, usize)> + '_ {
        GradeBand::ALL.iter().map(|b| (*b, self.count(*b)))
    }
}

impl FromIterator<Option<f64>> for Distribution {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        let mut distribution = Distribution::default();
        for total in iter {
            distribution.record(total);
        }
        distribution
    }
}

impl Serialize for Distribution {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(GradeBand::ALL.len()))?;
        for (band, count) in self.iter() {
            map.serialize_entry(&band, &count)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(usual: f64, mid: f64, lab: f64, fin: f64) -> ScoreSheet {
        ScoreSheet {
            usual: Some(usual),
            midterm: Some(mid),
            lab: Some(lab),
            final_exam: Some(fin),
        }
    }

    #[test]
    fn test_total_is_weighted() {
        // 0.2*80 + 0.2*70 + 0.2*90 + 0.4*60 = 16 + 14 + 18 + 24
        assert_eq!(sheet(80.0, 70.0, 90.0, 60.0).total(), 72.0);
    }

    #[test]
    fn test_total_rounds_to_two_decimals() {
        // 0.2*77.7 + 0.2*66.6 + 0.2*88.8 + 0.4*55.5 = 68.82
        assert_eq!(sheet(77.7, 66.6, 88.8, 55.5).total(), 68.82);
        assert_eq!(round2(1.005_f64 + 0.0001), 1.01);
    }

    #[test]
    fn test_missing_components_count_as_zero() {
        let partial = ScoreSheet {
            final_exam: Some(100.0),
            ..Default::default()
        };
        assert_eq!(partial.total(), 40.0);
        assert_eq!(ScoreSheet::default().total(), 0.0);
    }

    #[test]
    fn test_or_existing_keeps_previous_values() {
        let existing = sheet(80.0, 70.0, 90.0, 60.0);
        let update = ScoreSheet {
            final_exam: Some(95.0),
            ..Default::default()
        };
        let merged = update.or_existing(&existing);
        assert_eq!(merged, sheet(80.0, 70.0, 90.0, 95.0));
    }

    #[test]
    fn test_parse_score_validates_range() {
        assert_eq!(ScoreComponent::Lab.parse_score(" 88.5 ").unwrap(), 88.5);
        assert!(matches!(
            ScoreComponent::Final.parse_score("101"),
            Err(GradeError::ScoreOutOfRange { .. })
        ));
        assert!(matches!(
            ScoreComponent::Usual.parse_score("abc"),
            Err(GradeError::InvalidScore(_))
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(sheet(0.0, 100.0, 50.0, 50.0).validate().is_ok());
        assert!(sheet(-1.0, 100.0, 50.0, 50.0).validate().is_err());
    }

    #[test]
    fn test_sort_key_parse_and_display() {
        for key in SortKey::ALL {
            assert_eq!(key.to_string().parse::<SortKey>().unwrap(), key);
        }
        assert!("gpa".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_grade_band_boundaries() {
        assert_eq!(GradeBand::for_total(Some(90.0)), GradeBand::Excellent);
        assert_eq!(GradeBand::for_total(Some(89.99)), GradeBand::Good);
        assert_eq!(GradeBand::for_total(Some(70.0)), GradeBand::Fair);
        assert_eq!(GradeBand::for_total(Some(60.0)), GradeBand::Pass);
        assert_eq!(GradeBand::for_total(Some(59.99)), GradeBand::Fail);
        assert_eq!(GradeBand::for_total(None), GradeBand::Missing);
    }

    #[test]
    fn test_distribution_counts() {
        let distribution: Distribution =
            vec![Some(95.0), Some(91.0), Some(65.0), None, Some(12.0)].into_iter().collect();
        assert_eq!(distribution.count(GradeBand::Excellent), 2);
        assert_eq!(distribution.count(GradeBand::Pass), 1);
        assert_eq!(distribution.count(GradeBand::Fail), 1);
        assert_eq!(distribution.count(GradeBand::Missing), 1);
        assert_eq!(distribution.count(GradeBand::Good), 0);
        assert_eq!(distribution.total(), 5);
    }

    #[test]
    fn test_distribution_serializes_as_map() {
        let distribution: Distribution = vec![Some(85.0)].into_iter().collect();
        let json = serde_json::to_value(distribution).unwrap();
        assert_eq!(json["good"], 1);
        assert_eq!(json["missing"], 0);
    }
}
