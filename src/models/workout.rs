use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The three triathlon disciplines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SportType {
  Swim,
  Bike,
  Run,
}

impl SportType {
  pub fn display_name(&self) -> &'static str {
    match self {
      SportType::Swim => "Swim",
      SportType::Bike => "Bike",
      SportType::Run => "Run",
    }
  }
}

impl std::fmt::Display for SportType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.display_name())
  }
}

impl std::str::FromStr for SportType {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "swim" => Ok(SportType::Swim),
      "bike" => Ok(SportType::Bike),
      "run" => Ok(SportType::Run),
      _ => Err(format!("Unknown sport type: {}", s)),
    }
  }
}

/// A planned session on the calendar.
///
/// `sort_order` is the zero-based position among workouts sharing the same
/// `date`; it is not globally unique. After a successful reorder the values
/// for a day are dense (0..n-1).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Workout {
  pub id: i64,
  pub sport: SportType,
  pub title: String,
  pub description: Option<String>,
  pub duration_minutes: i64,
  pub date: NaiveDate,
  pub sort_order: i64,
  pub label_id: Option<i64>,
  pub created_at: Option<DateTime<Utc>>,
}

impl Workout {
  /// Title shown on the calendar card; empty titles fall back to the sport name.
  pub fn display_title(&self) -> &str {
    if self.title.trim().is_empty() {
      self.sport.display_name()
    } else {
      &self.title
    }
  }
}

/// For inserting new workouts (without id, created_at).
///
/// `sort_order: None` appends at the end of the target day; `Some(n)` keeps
/// the given value verbatim (used by week-copy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkout {
  pub sport: SportType,
  pub title: String,
  pub description: Option<String>,
  pub duration_minutes: i64,
  pub date: NaiveDate,
  pub sort_order: Option<i64>,
  pub label_id: Option<i64>,
}

/// Editable fields of an existing workout. Date and sort_order are excluded;
/// moving a workout between days goes through the reorder engine so the
/// per-day ordering stays consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWorkout {
  pub sport: SportType,
  pub title: String,
  pub description: Option<String>,
  pub duration_minutes: i64,
  pub label_id: Option<i64>,
}
