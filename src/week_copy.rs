//! Week duplication
//!
//! Plans the copy of one week's schedule into another week: every workout in
//! the source week is recreated at the same day-of-week offset in the target
//! week, keeping sport, title, description, duration and label reference.

use chrono::{Duration, NaiveDate};

use crate::error::PlannerError;
use crate::models::{NewWorkout, Workout};
use crate::rollup::week_start_of;

/// Compute the new-workout specs for copying `source_week_start`'s week into
/// `target_week_start`'s week. Both dates are normalized to their Mondays.
///
/// An empty source week is a user-facing validation error; no writes happen.
/// Source `sort_order` values are kept verbatim, so copies can collide with
/// pre-existing workouts on a target day; the next reorder gesture on that
/// day re-packs it.
pub fn compute_copy_plan(
    source_week_start: NaiveDate,
    target_week_start: NaiveDate,
    workouts: &[Workout],
) -> Result<Vec<NewWorkout>, PlannerError> {
    let source_start = week_start_of(source_week_start);
    let target_start = week_start_of(target_week_start);

    let mut source: Vec<&Workout> = workouts
        .iter()
        .filter(|w| week_start_of(w.date) == source_start)
        .collect();
    if source.is_empty() {
        return Err(PlannerError::EmptySourceWeek);
    }
    source.sort_by_key(|w| (w.date, w.sort_order));

    Ok(source
        .into_iter()
        .map(|workout| {
            let offset = (workout.date - source_start).num_days();
            NewWorkout {
                sport: workout.sport,
                title: workout.title.clone(),
                description: workout.description.clone(),
                duration_minutes: workout.duration_minutes,
                date: target_start + Duration::days(offset),
                sort_order: Some(workout.sort_order),
                label_id: workout.label_id,
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
