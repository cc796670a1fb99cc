//! SQLite persistence for workouts and labels
//!
//! Thin CRUD layer over the pool plus the one operation with real semantics:
//! `apply_order_updates`, which lands a reorder plan as a single
//! all-or-nothing transaction.

use chrono::NaiveDate;

use crate::db::DbPool;
use crate::error::PlannerError;
use crate::models::{Label, NewLabel, NewWorkout, UpdateWorkout, Workout};
use crate::reorder::OrderUpdate;

/// ---------------------------------------------------------------------------
/// Workouts
/// ---------------------------------------------------------------------------

pub async fn list_workouts(pool: &DbPool) -> Result<Vec<Workout>, PlannerError> {
  let workouts = sqlx::query_as::<_, Workout>(
    "SELECT * FROM workouts ORDER BY date, sort_order",
  )
  .fetch_all(pool)
  .await?;
  Ok(workouts)
}

/// Workouts with `start <= date <= end`, in calendar order.
pub async fn list_workouts_between(
  pool: &DbPool,
  start: NaiveDate,
  end: NaiveDate,
) -> Result<Vec<Workout>, PlannerError> {
  let workouts = sqlx::query_as::<_, Workout>(
    "SELECT * FROM workouts WHERE date >= ?1 AND date <= ?2 ORDER BY date, sort_order",
  )
  .bind(start)
  .bind(end)
  .fetch_all(pool)
  .await?;
  Ok(workouts)
}

pub async fn get_workout(pool: &DbPool, id: i64) -> Result<Workout, PlannerError> {
  sqlx::query_as::<_, Workout>("SELECT * FROM workouts WHERE id = ?1")
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(PlannerError::WorkoutNotFound(id))
}

pub async fn create_workout(pool: &DbPool, new: NewWorkout) -> Result<Workout, PlannerError> {
  // Without an explicit order the workout goes to the end of its day.
  let sort_order = match new.sort_order {
    Some(value) => value,
    None => next_sort_order(pool, new.date).await?,
  };

  let result = sqlx::query(
    r#"
    INSERT INTO workouts (sport, title, description, duration_minutes, date, sort_order, label_id)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    "#,
  )
  .bind(new.sport)
  .bind(&new.title)
  .bind(&new.description)
  .bind(new.duration_minutes)
  .bind(new.date)
  .bind(sort_order)
  .bind(new.label_id)
  .execute(pool)
  .await?;

  get_workout(pool, result.last_insert_rowid()).await
}

async fn next_sort_order(pool: &DbPool, date: NaiveDate) -> Result<i64, PlannerError> {
  let next: i64 = sqlx::query_scalar(
    "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM workouts WHERE date = ?1",
  )
  .bind(date)
  .fetch_one(pool)
  .await?;
  Ok(next)
}

pub async fn update_workout(
  pool: &DbPool,
  id: i64,
  update: UpdateWorkout,
) -> Result<Workout, PlannerError> {
  let result = sqlx::query(
    r#"
    UPDATE workouts
    SET sport = ?1,
        title = ?2,
        description = ?3,
        duration_minutes = ?4,
        label_id = ?5
    WHERE id = ?6
    "#,
  )
  .bind(update.sport)
  .bind(&update.title)
  .bind(&update.description)
  .bind(update.duration_minutes)
  .bind(update.label_id)
  .bind(id)
  .execute(pool)
  .await?;

  if result.rows_affected() == 0 {
    return Err(PlannerError::WorkoutNotFound(id));
  }
  get_workout(pool, id).await
}

pub async fn delete_workout(pool: &DbPool, id: i64) -> Result<bool, PlannerError> {
  let result = sqlx::query("DELETE FROM workouts WHERE id = ?1")
    .bind(id)
    .execute(pool)
    .await?;
  Ok(result.rows_affected() > 0)
}

/// Apply a reorder plan in one transaction: every update lands or none do.
/// An update naming a row that no longer exists aborts the whole batch, so
/// the calendar never shows a half-applied gesture.
pub async fn apply_order_updates(
  pool: &DbPool,
  updates: &[OrderUpdate],
) -> Result<(), PlannerError> {
  if updates.is_empty() {
    return Ok(());
  }

  let mut tx = pool.begin().await?;
  for update in updates {
    let result = sqlx::query(
      "UPDATE workouts SET sort_order = ?1, date = COALESCE(?2, date) WHERE id = ?3",
    )
    .bind(update.sort_order)
    .bind(update.date)
    .bind(update.id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
      // Dropping the transaction rolls back the earlier updates.
      return Err(PlannerError::WorkoutNotFound(update.id));
    }
  }
  tx.commit().await?;
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Labels
/// ---------------------------------------------------------------------------

pub async fn list_labels(pool: &DbPool) -> Result<Vec<Label>, PlannerError> {
  let labels = sqlx::query_as::<_, Label>("SELECT * FROM labels ORDER BY id")
    .fetch_all(pool)
    .await?;
  Ok(labels)
}

pub async fn get_label(pool: &DbPool, id: i64) -> Result<Label, PlannerError> {
  sqlx::query_as::<_, Label>("SELECT * FROM labels WHERE id = ?1")
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(PlannerError::LabelNotFound(id))
}

pub async fn create_label(pool: &DbPool, new: NewLabel) -> Result<Label, PlannerError> {
  let result = sqlx::query("INSERT INTO labels (name, color) VALUES (?1, ?2)")
    .bind(&new.name)
    .bind(&new.color)
    .execute(pool)
    .await?;
  get_label(pool, result.last_insert_rowid()).await
}

pub async fn update_label(
  pool: &DbPool,
  id: i64,
  update: NewLabel,
) -> Result<Label, PlannerError> {
  let result = sqlx::query("UPDATE labels SET name = ?1, color = ?2 WHERE id = ?3")
    .bind(&update.name)
    .bind(&update.color)
    .bind(id)
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(PlannerError::LabelNotFound(id));
  }
  get_label(pool, id).await
}

/// Deleting a label never deletes workouts; their references are cleared so
/// they fall back to the "Unlabeled" bucket.
pub async fn delete_label(pool: &DbPool, id: i64) -> Result<bool, PlannerError> {
  let mut tx = pool.begin().await?;
  sqlx::query("UPDATE workouts SET label_id = NULL WHERE label_id = ?1")
    .bind(id)
    .execute(&mut *tx)
    .await?;
  let result = sqlx::query("DELETE FROM labels WHERE id = ?1")
    .bind(id)
    .execute(&mut *tx)
    .await?;
  tx.commit().await?;
  Ok(result.rows_affected() > 0)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
