//! Tauri commands for weekly statistics

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tauri::State;

use crate::db::AppState;
use crate::error::PlannerError;
use crate::rollup::{compute_weekly_rollup, week_start_of, WeeklyRollup};
use crate::store;

/// Rollup for the week containing `week_start`. Recomputed on every call;
/// nothing is cached or persisted.
#[tauri::command]
pub async fn get_weekly_rollup(
  state: State<'_, Arc<AppState>>,
  week_start: NaiveDate,
) -> Result<WeeklyRollup, PlannerError> {
  let start = week_start_of(week_start);
  let workouts = store::list_workouts_between(&state.db, start, start + Duration::days(6)).await?;
  let labels = store::list_labels(&state.db).await?;
  Ok(compute_weekly_rollup(start, &workouts, &labels))
}
