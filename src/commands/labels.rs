//! Tauri commands for intensity-label CRUD

use std::sync::Arc;

use tauri::State;

use crate::db::AppState;
use crate::error::PlannerError;
use crate::models::{Label, NewLabel};
use crate::rollup::sort_labels_for_display;
use crate::store;

/// All labels, in display order (reference zone order, unknown names after).
#[tauri::command]
pub async fn get_labels(state: State<'_, Arc<AppState>>) -> Result<Vec<Label>, PlannerError> {
  let mut labels = store::list_labels(&state.db).await?;
  sort_labels_for_display(&mut labels);
  Ok(labels)
}

#[tauri::command]
pub async fn create_label(
  state: State<'_, Arc<AppState>>,
  label: NewLabel,
) -> Result<Label, PlannerError> {
  store::create_label(&state.db, label).await
}

#[tauri::command]
pub async fn update_label(
  state: State<'_, Arc<AppState>>,
  id: i64,
  label: NewLabel,
) -> Result<Label, PlannerError> {
  store::update_label(&state.db, id, label).await
}

/// Workouts referencing the label are kept; their reference is cleared.
#[tauri::command]
pub async fn delete_label(
  state: State<'_, Arc<AppState>>,
  id: i64,
) -> Result<bool, PlannerError> {
  store::delete_label(&state.db, id).await
}
