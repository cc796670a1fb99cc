//! Tauri commands for workout CRUD and calendar mutations

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tauri::State;

use crate::db::AppState;
use crate::error::PlannerError;
use crate::models::{NewWorkout, UpdateWorkout, Workout};
use crate::reorder::{compute_reorder_plan, DropTarget};
use crate::rollup::week_start_of;
use crate::{store, week_copy};

#[tauri::command]
pub async fn get_workouts(state: State<'_, Arc<AppState>>) -> Result<Vec<Workout>, PlannerError> {
    store::list_workouts(&state.db).await
}

/// Workouts for the Monday..Sunday week containing `week_start`.
#[tauri::command]
pub async fn get_week_workouts(
    state: State<'_, Arc<AppState>>,
    week_start: NaiveDate,
) -> Result<Vec<Workout>, PlannerError> {
    let start = week_start_of(week_start);
    store::list_workouts_between(&state.db, start, start + Duration::days(6)).await
}

#[tauri::command]
pub async fn create_workout(
    state: State<'_, Arc<AppState>>,
    workout: NewWorkout,
) -> Result<Workout, PlannerError> {
    store::create_workout(&state.db, workout).await
}

#[tauri::command]
pub async fn update_workout(
    state: State<'_, Arc<AppState>>,
    id: i64,
    workout: UpdateWorkout,
) -> Result<Workout, PlannerError> {
    store::update_workout(&state.db, id, workout).await
}

#[tauri::command]
pub async fn delete_workout(
    state: State<'_, Arc<AppState>>,
    id: i64,
) -> Result<bool, PlannerError> {
    store::delete_workout(&state.db, id).await
}

/// Resolve one drag gesture end to end: parse the drop target, compute the
/// plan against the current collection, apply it as one atomic batch, then
/// refetch. The returned set is the authoritative state; the frontend
/// replaces its calendar with it instead of keeping the optimistic version.
#[tauri::command]
pub async fn reorder_workout(
    state: State<'_, Arc<AppState>>,
    dragged_id: i64,
    drop_target: String,
) -> Result<Vec<Workout>, PlannerError> {
    let target: DropTarget = drop_target.parse()?;
    let workouts = store::list_workouts(&state.db).await?;
    let plan = compute_reorder_plan(dragged_id, target, &workouts);
    store::apply_order_updates(&state.db, &plan).await?;
    store::list_workouts(&state.db).await
}

#[derive(Debug, Clone, Serialize)]
pub struct CopyWeekResult {
    pub requested: usize,
    pub created: usize,
}

/// Duplicate the source week's schedule into the target week. Inserts
/// proceed workout-by-workout; partial success is reported by count so the
/// frontend can message it and refetch.
#[tauri::command]
pub async fn copy_week(
    state: State<'_, Arc<AppState>>,
    source_week_start: NaiveDate,
    target_week_start: NaiveDate,
) -> Result<CopyWeekResult, PlannerError> {
    let workouts = store::list_workouts(&state.db).await?;
    let plan = week_copy::compute_copy_plan(source_week_start, target_week_start, &workouts)?;

    let requested = plan.len();
    let mut created = 0;
    for new_workout in plan {
        match store::create_workout(&state.db, new_workout).await {
            Ok(_) => created += 1,
            Err(e) => log::error!("copy_week: failed to insert workout: {}", e),
        }
    }

    Ok(CopyWeekResult { requested, created })
}
