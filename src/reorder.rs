//! Drag-and-drop reorder engine
//!
//! Translates one drag gesture (a workout picked up, then dropped on a day
//! surface or on another workout) into the minimal consistent set of
//! order/date updates:
//! - relative ordering of every untouched workout is preserved
//! - only the dragged workout ever changes date
//! - per-day orders come out dense and zero-based
//!
//! The engine is a pure function of (gesture, current collection). It emits
//! a plan; the store applies it as one atomic batch and the caller refetches
//! the authoritative state afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::models::Workout;

// ---------------------------------------------------------------------------
/// Drop Target: what the gesture landed on
// ---------------------------------------------------------------------------

/// The UI reports drops as `day:YYYY-MM-DD` (the day surface) or
/// `workout:<id>` (another workout card). The add-workout button and day
/// padding are not drop targets and produce neither form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Day(NaiveDate),
    Workout(i64),
}

impl std::str::FromStr for DropTarget {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("day", date)) => date
                .parse::<NaiveDate>()
                .map(DropTarget::Day)
                .map_err(|_| PlannerError::InvalidDropTarget(s.to_string())),
            Some(("workout", id)) => id
                .parse::<i64>()
                .map(DropTarget::Workout)
                .map_err(|_| PlannerError::InvalidDropTarget(s.to_string())),
            _ => Err(PlannerError::InvalidDropTarget(s.to_string())),
        }
    }
}

/// One emitted mutation: the workout's new order and, for the dragged
/// workout in a cross-day move, its new date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: i64,
    pub sort_order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
/// Plan Computation
// ---------------------------------------------------------------------------

/// Where the dragged workout is to be inserted, after resolving the target.
enum Destination {
    /// Dropped on a day surface.
    DayContainer(NaiveDate),
    /// Dropped on a workout card; insert immediately before it.
    BeforeWorkout(i64, NaiveDate),
    /// Fallback when the target workout is gone: end of the given day.
    EndOfDay(NaiveDate),
}

/// Compute the update plan for one gesture.
///
/// A dragged workout that is no longer in the collection means the UI was
/// stale; the gesture is dropped silently and the plan is empty. A target
/// workout that is gone degrades to "end of the source day".
pub fn compute_reorder_plan(
    dragged_id: i64,
    target: DropTarget,
    workouts: &[Workout],
) -> Vec<OrderUpdate> {
    let Some(dragged) = workouts.iter().find(|w| w.id == dragged_id) else {
        log::warn!(
            "reorder: dragged workout {} not in collection, ignoring gesture",
            dragged_id
        );
        return Vec::new();
    };

    // A workout dropped onto itself moves nowhere.
    if matches!(target, DropTarget::Workout(id) if id == dragged_id) {
        return Vec::new();
    }

    let source_date = dragged.date;

    let destination = match target {
        DropTarget::Day(date) => Destination::DayContainer(date),
        DropTarget::Workout(target_id) => match workouts.iter().find(|w| w.id == target_id) {
            Some(target_workout) => Destination::BeforeWorkout(target_id, target_workout.date),
            None => {
                log::warn!(
                    "reorder: target workout {} not found, dropping at end of source day",
                    target_id
                );
                Destination::EndOfDay(source_date)
            }
        },
    };

    let source_list = day_workouts(workouts, source_date);

    match destination {
        // Dropping on the source day's own surface reorders nothing.
        Destination::DayContainer(date) if date == source_date => Vec::new(),

        Destination::BeforeWorkout(target_id, date) if date == source_date => {
            let mut reordered: Vec<&Workout> = source_list
                .iter()
                .copied()
                .filter(|w| w.id != dragged_id)
                .collect();
            let insert_at = reordered
                .iter()
                .position(|w| w.id == target_id)
                .unwrap_or(reordered.len());
            reordered.insert(insert_at, dragged);
            repack(&reordered, None)
        }

        Destination::EndOfDay(date) if date == source_date => {
            let mut reordered: Vec<&Workout> = source_list
                .iter()
                .copied()
                .filter(|w| w.id != dragged_id)
                .collect();
            reordered.push(dragged);
            repack(&reordered, None)
        }

        Destination::DayContainer(dest_date) | Destination::EndOfDay(dest_date) => {
            cross_day_plan(dragged, &source_list, workouts, dest_date, None)
        }

        Destination::BeforeWorkout(target_id, dest_date) => {
            cross_day_plan(dragged, &source_list, workouts, dest_date, Some(target_id))
        }
    }
}

fn cross_day_plan(
    dragged: &Workout,
    source_list: &[&Workout],
    workouts: &[Workout],
    dest_date: NaiveDate,
    before_workout: Option<i64>,
) -> Vec<OrderUpdate> {
    // Source day re-packs without the dragged workout.
    let remaining: Vec<&Workout> = source_list
        .iter()
        .copied()
        .filter(|w| w.id != dragged.id)
        .collect();
    let mut updates = repack(&remaining, None);

    // Destination day gains the dragged workout at the requested slot,
    // or at the end when dropped on the day surface.
    let mut dest_list = day_workouts(workouts, dest_date);
    let insert_at = before_workout
        .and_then(|id| dest_list.iter().position(|w| w.id == id))
        .unwrap_or(dest_list.len());
    dest_list.insert(insert_at, dragged);

    updates.extend(repack(&dest_list, Some((dragged.id, dest_date))));
    updates
}

/// All workouts on one day, in their current visual order.
fn day_workouts(workouts: &[Workout], date: NaiveDate) -> Vec<&Workout> {
    let mut list: Vec<&Workout> = workouts.iter().filter(|w| w.date == date).collect();
    list.sort_by_key(|w| w.sort_order);
    list
}

/// Assign order = index across a final day lineup, emitting updates only for
/// rows whose stored order (or date, for the moved workout) actually changes.
fn repack(lineup: &[&Workout], moved: Option<(i64, NaiveDate)>) -> Vec<OrderUpdate> {
    let mut updates = Vec::new();
    for (index, workout) in lineup.iter().enumerate() {
        let index = index as i64;
        match moved {
            Some((moved_id, dest_date)) if workout.id == moved_id => {
                updates.push(OrderUpdate {
                    id: workout.id,
                    sort_order: index,
                    date: Some(dest_date),
                });
            }
            _ => {
                if workout.sort_order != index {
                    updates.push(OrderUpdate {
                        id: workout.id,
                        sort_order: index,
                        date: None,
                    });
                }
            }
        }
    }
    updates
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
