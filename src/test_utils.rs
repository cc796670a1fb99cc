//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Entity factories for the pure engines (no database needed)
//! - Helper assertions

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::models::{Label, NewWorkout, SportType, Workout};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  // Run migrations
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Entity Factories
/// ---------------------------------------------------------------------------

/// In-memory workout for exercising the pure engines.
pub fn make_workout(
  id: i64,
  sport: SportType,
  duration_minutes: i64,
  date: &str,
  sort_order: i64,
  label_id: Option<i64>,
) -> Workout {
  Workout {
    id,
    sport,
    title: String::new(),
    description: None,
    duration_minutes,
    date: date.parse().expect("factory date must be YYYY-MM-DD"),
    sort_order,
    label_id,
    created_at: None,
  }
}

/// In-memory label for exercising the pure engines.
pub fn make_label(id: i64, name: &str, color: &str) -> Label {
  Label {
    id,
    name: name.to_string(),
    color: color.to_string(),
    created_at: None,
  }
}

/// Insert spec with no explicit order: the store appends it to its day.
pub fn new_workout_on(sport: SportType, duration_minutes: i64, date: NaiveDate) -> NewWorkout {
  NewWorkout {
    sport,
    title: String::new(),
    description: None,
    duration_minutes,
    date,
    sort_order: None,
    label_id: None,
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    // Verify key tables exist
    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('workouts', 'labels')",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 2, "Expected workouts and labels tables");

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_factories_create_valid_data() {
    let workout = make_workout(7, SportType::Run, 30, "2025-03-10", 2, Some(1));
    assert_eq!(workout.id, 7);
    assert_eq!(workout.sort_order, 2);
    assert_eq!(workout.date.to_string(), "2025-03-10");

    let label = make_label(1, "Zone 2", "#22c55e");
    assert_eq!(label.name, "Zone 2");
  }
}
