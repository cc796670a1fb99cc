//! Weekly rollup engine
//!
//! Computes the read-only weekly statistics view model from the workout and
//! label collections: per-sport totals, per-label sub-totals, a Monday..Sunday
//! daily breakdown, and the merged intensity-zone distribution. Nothing here
//! is persisted; the rollup is recomputed whenever the collections or the
//! viewed week change.
//!
//! All duration math is done in hours as minutes / 60.0. Percentages are
//! rounded at presentation time only, never while accumulating.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Label, SportType, Workout};

/// ---------------------------------------------------------------------------
/// Intensity Zone Reference Order
/// ---------------------------------------------------------------------------

/// Physiological ordering of the well-known zone names. Labels whose names
/// are not listed here sort alphabetically after all known zones.
pub const ZONE_ORDER: [&str; 8] = [
  "Recovery",
  "Zone 2",
  "Tempo",
  "Sweet Spot",
  "Threshold",
  "VO2 Max",
  "Anaerobic",
  "Sprints",
];

/// Display name and color for workouts without a (resolvable) label.
pub const UNLABELED_NAME: &str = "Unlabeled";
pub const UNLABELED_COLOR: &str = "#ffffff";

/// Key used in by-label maps for workouts with no label reference.
pub const NO_LABEL_KEY: &str = "no-label";

/// Base color for a sport bar with hours but no label breakdown.
const FALLBACK_SEGMENT_COLOR: &str = "#94a3b8";

fn zone_rank(name: &str) -> Option<usize> {
  static RANKS: OnceLock<HashMap<&'static str, usize>> = OnceLock::new();
  let ranks = RANKS.get_or_init(|| {
    ZONE_ORDER
      .iter()
      .enumerate()
      .map(|(rank, name)| (*name, rank))
      .collect()
  });
  ranks.get(name).copied()
}

/// Known zones first in reference order, then unknown names alphabetically,
/// with the synthetic "Unlabeled" bucket always last.
pub fn compare_zone_names(a: &str, b: &str) -> Ordering {
  zone_sort_key(a).cmp(&zone_sort_key(b))
}

fn zone_sort_key(name: &str) -> (u8, usize, &str) {
  if name == UNLABELED_NAME {
    (2, 0, "")
  } else if let Some(rank) = zone_rank(name) {
    (0, rank, "")
  } else {
    (1, 0, name)
  }
}

/// Labels carry no persisted order; this is their read-time display order.
pub fn sort_labels_for_display(labels: &mut [Label]) {
  labels.sort_by(|a, b| compare_zone_names(&a.name, &b.name));
}

/// ---------------------------------------------------------------------------
/// Week Boundaries
/// ---------------------------------------------------------------------------

/// Monday of the ISO week containing `date`. Weeks start on Monday
/// throughout the app.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
  date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// ---------------------------------------------------------------------------
/// Rollup View Model
/// ---------------------------------------------------------------------------

/// Hours attributed to one label within one sport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelHours {
  pub name: String,
  pub color: String,
  pub hours: f64,
}

/// One sport's weekly totals, keyed by label id (or `no-label`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SportRollup {
  pub total_hours: f64,
  pub by_label: BTreeMap<String, LabelHours>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerSport {
  pub swim: SportRollup,
  pub bike: SportRollup,
  pub run: SportRollup,
}

impl PerSport {
  pub fn get(&self, sport: SportType) -> &SportRollup {
    match sport {
      SportType::Swim => &self.swim,
      SportType::Bike => &self.bike,
      SportType::Run => &self.run,
    }
  }

  fn get_mut(&mut self, sport: SportType) -> &mut SportRollup {
    match sport {
      SportType::Swim => &mut self.swim,
      SportType::Bike => &mut self.bike,
      SportType::Run => &mut self.run,
    }
  }
}

/// One row of the Monday..Sunday breakdown matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayBreakdown {
  pub date: NaiveDate,
  pub swim_hours: f64,
  pub bike_hours: f64,
  pub run_hours: f64,
  pub total_hours: f64,
}

/// One intensity zone merged across all three sports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneHours {
  pub name: String,
  pub color: String,
  pub hours: f64,
}

/// Precomputed progress-bar segments per sport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SportBars {
  pub swim: Vec<BarSegment>,
  pub bike: Vec<BarSegment>,
  pub run: Vec<BarSegment>,
}

/// The derived weekly statistics view model. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyRollup {
  pub week_start: NaiveDate,
  pub per_sport: PerSport,
  pub daily_breakdown: Vec<DayBreakdown>,
  pub intensity_zones: Vec<ZoneHours>,
  pub training_days: i64,
  pub rest_days: i64,
  /// Display scaling denominator: max of the three sport totals, floored at
  /// 1 so an empty week never divides by zero.
  pub max_value: f64,
  pub bars: SportBars,
}

/// ---------------------------------------------------------------------------
/// Rollup Computation
/// ---------------------------------------------------------------------------

/// Compute the weekly rollup for the week containing `week_start`.
///
/// `week_start` is normalized to its Monday; workouts are matched by exact
/// calendar day across the 7-day interval.
pub fn compute_weekly_rollup(
  week_start: NaiveDate,
  workouts: &[Workout],
  labels: &[Label],
) -> WeeklyRollup {
  let week_start = week_start_of(week_start);

  let mut per_sport = PerSport::default();
  let mut daily_breakdown = Vec::with_capacity(7);

  for offset in 0..7 {
    let day = week_start + Duration::days(offset);
    let mut entry = DayBreakdown {
      date: day,
      swim_hours: 0.0,
      bike_hours: 0.0,
      run_hours: 0.0,
      total_hours: 0.0,
    };

    for workout in workouts.iter().filter(|w| w.date == day) {
      let hours = workout.duration_minutes as f64 / 60.0;

      match workout.sport {
        SportType::Swim => entry.swim_hours += hours,
        SportType::Bike => entry.bike_hours += hours,
        SportType::Run => entry.run_hours += hours,
      }
      entry.total_hours += hours;

      let sport = per_sport.get_mut(workout.sport);
      sport.total_hours += hours;

      let (name, color) = resolve_label(workout.label_id, labels);
      let slot = sport
        .by_label
        .entry(label_key(workout.label_id))
        .or_insert(LabelHours {
          name,
          color,
          hours: 0.0,
        });
      slot.hours += hours;
    }

    daily_breakdown.push(entry);
  }

  let intensity_zones = merge_intensity_zones(&per_sport);
  let training_days = daily_breakdown
    .iter()
    .filter(|d| d.total_hours > 0.0)
    .count() as i64;

  let max_value = per_sport
    .swim
    .total_hours
    .max(per_sport.bike.total_hours)
    .max(per_sport.run.total_hours)
    .max(1.0);

  let bars = SportBars {
    swim: bar_segments(per_sport.get(SportType::Swim), max_value),
    bike: bar_segments(per_sport.get(SportType::Bike), max_value),
    run: bar_segments(per_sport.get(SportType::Run), max_value),
  };

  WeeklyRollup {
    week_start,
    per_sport,
    daily_breakdown,
    intensity_zones,
    training_days,
    rest_days: 7 - training_days,
    max_value,
    bars,
  }
}

fn label_key(label_id: Option<i64>) -> String {
  match label_id {
    Some(id) => id.to_string(),
    None => NO_LABEL_KEY.to_string(),
  }
}

/// Resolve display name/color for a workout's label reference. A missing
/// label id and a stale reference both fall back to the white "Unlabeled"
/// bucket.
fn resolve_label(label_id: Option<i64>, labels: &[Label]) -> (String, String) {
  match label_id.and_then(|id| labels.iter().find(|l| l.id == id)) {
    Some(label) => (label.name.clone(), label.color.clone()),
    None => (UNLABELED_NAME.to_string(), UNLABELED_COLOR.to_string()),
  }
}

/// Merge the per-sport label maps into one distribution keyed by label name.
/// The first-seen color wins, except that a real label's color replaces a
/// zero-duration placeholder. Zero-duration zones are dropped.
fn merge_intensity_zones(per_sport: &PerSport) -> Vec<ZoneHours> {
  let mut merged: Vec<ZoneHours> = Vec::new();

  for sport in [&per_sport.swim, &per_sport.bike, &per_sport.run] {
    for entry in sport.by_label.values() {
      match merged.iter().position(|z| z.name == entry.name) {
        Some(index) => {
          let zone = &mut merged[index];
          if zone.hours == 0.0 && entry.hours > 0.0 {
            zone.color = entry.color.clone();
          }
          zone.hours += entry.hours;
        }
        None => merged.push(ZoneHours {
          name: entry.name.clone(),
          color: entry.color.clone(),
          hours: entry.hours,
        }),
      }
    }
  }

  merged.retain(|z| z.hours > 0.0);
  merged.sort_by(|a, b| compare_zone_names(&a.name, &b.name));
  merged
}

/// ---------------------------------------------------------------------------
/// Segmented Proportions (progress-bar math)
/// ---------------------------------------------------------------------------

/// One colored slice of a sport's progress bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSegment {
  pub name: String,
  pub color: String,
  pub width_pct: f64,
}

/// Width of one label's slice: its share of the sport's time, scaled by the
/// sport's share of `max_value`.
pub fn segment_width(label_hours: f64, sport_total_hours: f64, max_value: f64) -> f64 {
  if sport_total_hours <= 0.0 || max_value <= 0.0 {
    return 0.0;
  }
  (label_hours / sport_total_hours) * (sport_total_hours / max_value) * 100.0
}

/// Segments for one sport's bar. A sport with no hours renders an empty bar;
/// a sport with hours but no label breakdown (inconsistent data) renders one
/// full-width segment in the base color.
pub fn bar_segments(sport: &SportRollup, max_value: f64) -> Vec<BarSegment> {
  if sport.total_hours <= 0.0 {
    return Vec::new();
  }

  if sport.by_label.is_empty() {
    return vec![BarSegment {
      name: UNLABELED_NAME.to_string(),
      color: FALLBACK_SEGMENT_COLOR.to_string(),
      width_pct: (sport.total_hours / max_value) * 100.0,
    }];
  }

  sport
    .by_label
    .values()
    .map(|entry| BarSegment {
      name: entry.name.clone(),
      color: entry.color.clone(),
      width_pct: segment_width(entry.hours, sport.total_hours, max_value),
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use crate::test_utils::{make_label, make_workout};

  const TOL: f64 = 1e-9;

  fn monday() -> NaiveDate {
    "2025-03-10".parse().unwrap()
  }

  fn zone_labels() -> Vec<Label> {
    vec![
      make_label(1, "Zone 2", "#22c55e"),
      make_label(2, "Threshold", "#f97316"),
      make_label(3, "Recovery", "#38bdf8"),
    ]
  }

  #[test]
  fn week_start_normalizes_to_monday() {
    let monday = monday();
    assert_eq!(week_start_of(monday), monday);
    assert_eq!(week_start_of("2025-03-12".parse().unwrap()), monday);
    // Sunday still belongs to the week that began the previous Monday.
    assert_eq!(week_start_of("2025-03-16".parse().unwrap()), monday);
    assert_eq!(
      week_start_of("2025-03-17".parse().unwrap()),
      "2025-03-17".parse::<NaiveDate>().unwrap()
    );
  }

  #[test]
  fn empty_week_yields_zeroed_rollup() {
    let rollup = compute_weekly_rollup(monday(), &[], &[]);

    assert_eq!(rollup.daily_breakdown.len(), 7);
    for day in &rollup.daily_breakdown {
      assert_eq!(day.total_hours, 0.0);
    }
    assert_eq!(rollup.per_sport.swim.total_hours, 0.0);
    assert_eq!(rollup.per_sport.bike.total_hours, 0.0);
    assert_eq!(rollup.per_sport.run.total_hours, 0.0);
    assert!(rollup.intensity_zones.is_empty());
    assert_eq!(rollup.training_days, 0);
    assert_eq!(rollup.rest_days, 7);
    assert_eq!(rollup.max_value, 1.0);
  }

  #[test]
  fn mixed_week_scenario() {
    // Bike 60min Mon (Zone 2), Run 30min Mon (Threshold), Swim 90min Wed (no label)
    let workouts = vec![
      make_workout(10, SportType::Bike, 60, "2025-03-10", 0, Some(1)),
      make_workout(11, SportType::Run, 30, "2025-03-10", 1, Some(2)),
      make_workout(12, SportType::Swim, 90, "2025-03-12", 0, None),
    ];
    let rollup = compute_weekly_rollup(monday(), &workouts, &zone_labels());

    assert_approx_eq!(rollup.per_sport.bike.total_hours, 1.0, TOL);
    assert_approx_eq!(rollup.per_sport.run.total_hours, 0.5, TOL);
    assert_approx_eq!(rollup.per_sport.swim.total_hours, 1.5, TOL);
    assert_approx_eq!(rollup.daily_breakdown[0].total_hours, 1.5, TOL);
    assert_approx_eq!(rollup.daily_breakdown[2].total_hours, 1.5, TOL);
    assert_eq!(rollup.training_days, 2);
    assert_eq!(rollup.rest_days, 5);
    assert_approx_eq!(rollup.max_value, 1.5, TOL);

    // The unlabeled swim shows up as the white "Unlabeled" bucket.
    let swim_bucket = rollup.per_sport.swim.by_label.get(NO_LABEL_KEY).unwrap();
    assert_eq!(swim_bucket.name, UNLABELED_NAME);
    assert_eq!(swim_bucket.color, UNLABELED_COLOR);
  }

  #[test]
  fn daily_and_sport_totals_reconcile() {
    let workouts = vec![
      make_workout(1, SportType::Bike, 75, "2025-03-10", 0, Some(1)),
      make_workout(2, SportType::Run, 45, "2025-03-11", 0, Some(2)),
      make_workout(3, SportType::Swim, 40, "2025-03-13", 0, Some(3)),
      make_workout(4, SportType::Bike, 120, "2025-03-15", 0, Some(2)),
      make_workout(5, SportType::Run, 50, "2025-03-16", 0, None),
    ];
    let rollup = compute_weekly_rollup(monday(), &workouts, &zone_labels());

    let daily_sum: f64 = rollup.daily_breakdown.iter().map(|d| d.total_hours).sum();
    let sport_sum = rollup.per_sport.swim.total_hours
      + rollup.per_sport.bike.total_hours
      + rollup.per_sport.run.total_hours;
    assert_approx_eq!(daily_sum, sport_sum, TOL);
  }

  #[test]
  fn label_hours_reconcile_per_sport() {
    let workouts = vec![
      make_workout(1, SportType::Bike, 90, "2025-03-10", 0, Some(1)),
      make_workout(2, SportType::Bike, 30, "2025-03-11", 0, Some(2)),
      make_workout(3, SportType::Bike, 25, "2025-03-12", 0, None),
    ];
    let rollup = compute_weekly_rollup(monday(), &workouts, &zone_labels());

    let label_sum: f64 = rollup
      .per_sport
      .bike
      .by_label
      .values()
      .map(|l| l.hours)
      .sum();
    assert_approx_eq!(label_sum, rollup.per_sport.bike.total_hours, TOL);
  }

  #[test]
  fn workouts_outside_week_are_ignored() {
    let workouts = vec![
      make_workout(1, SportType::Run, 60, "2025-03-09", 0, None), // previous Sunday
      make_workout(2, SportType::Run, 60, "2025-03-17", 0, None), // next Monday
      make_workout(3, SportType::Run, 60, "2025-03-16", 0, None), // this Sunday
    ];
    let rollup = compute_weekly_rollup(monday(), &workouts, &[]);

    assert_approx_eq!(rollup.per_sport.run.total_hours, 1.0, TOL);
    assert_eq!(rollup.training_days, 1);
  }

  #[test]
  fn zones_sort_in_reference_order_with_unknown_after() {
    let labels = vec![
      make_label(1, "VO2 Max", "#ef4444"),
      make_label(2, "Recovery", "#38bdf8"),
      make_label(3, "CustomZone", "#a855f7"),
    ];
    let workouts = vec![
      make_workout(1, SportType::Run, 60, "2025-03-10", 0, Some(1)),
      make_workout(2, SportType::Bike, 120, "2025-03-11", 0, Some(2)),
      make_workout(3, SportType::Swim, 60, "2025-03-12", 0, Some(3)),
    ];
    let rollup = compute_weekly_rollup(monday(), &workouts, &labels);

    let names: Vec<&str> = rollup.intensity_zones.iter().map(|z| z.name.as_str()).collect();
    assert_eq!(names, vec!["Recovery", "VO2 Max", "CustomZone"]);
  }

  #[test]
  fn unlabeled_zone_sorts_last() {
    let workouts = vec![
      make_workout(1, SportType::Run, 60, "2025-03-10", 0, None),
      make_workout(2, SportType::Bike, 60, "2025-03-11", 0, Some(3)),
      make_workout(3, SportType::Swim, 60, "2025-03-12", 0, Some(99)), // stale reference
    ];
    let rollup = compute_weekly_rollup(monday(), &workouts, &zone_labels());

    let names: Vec<&str> = rollup.intensity_zones.iter().map(|z| z.name.as_str()).collect();
    assert_eq!(names, vec!["Recovery", UNLABELED_NAME]);

    // Unlabeled and stale-labeled hours pooled into one bucket.
    let unlabeled = rollup.intensity_zones.last().unwrap();
    assert_approx_eq!(unlabeled.hours, 2.0, TOL);
    assert_eq!(unlabeled.color, UNLABELED_COLOR);
  }

  #[test]
  fn zones_merge_across_sports_by_name() {
    let labels = vec![
      make_label(1, "Tempo", "#fbbf24"),
      make_label(2, "Tempo", "#d97706"), // same name, second label
    ];
    let workouts = vec![
      make_workout(1, SportType::Bike, 60, "2025-03-10", 0, Some(1)),
      make_workout(2, SportType::Run, 30, "2025-03-11", 0, Some(2)),
    ];
    let rollup = compute_weekly_rollup(monday(), &workouts, &labels);

    assert_eq!(rollup.intensity_zones.len(), 1);
    let tempo = &rollup.intensity_zones[0];
    assert_approx_eq!(tempo.hours, 1.5, TOL);
    // First-seen color wins when both entries carry real hours.
    assert_eq!(tempo.color, "#fbbf24");
  }

  #[test]
  fn real_color_replaces_zero_duration_placeholder() {
    let labels = vec![
      make_label(1, "Tempo", "#cccccc"), // attached to a zero-minute workout
      make_label(2, "Tempo", "#d97706"),
    ];
    let workouts = vec![
      make_workout(1, SportType::Swim, 0, "2025-03-10", 0, Some(1)),
      make_workout(2, SportType::Bike, 60, "2025-03-11", 0, Some(2)),
    ];
    let rollup = compute_weekly_rollup(monday(), &workouts, &labels);

    assert_eq!(rollup.intensity_zones.len(), 1);
    assert_eq!(rollup.intensity_zones[0].color, "#d97706");
  }

  #[test]
  fn label_display_sort_uses_zone_order() {
    let mut labels = vec![
      make_label(1, "Aerobic Base", "#888888"),
      make_label(2, "Sprints", "#ef4444"),
      make_label(3, "Recovery", "#38bdf8"),
      make_label(4, "Big Gear Work", "#444444"),
    ];
    sort_labels_for_display(&mut labels);

    let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Recovery", "Sprints", "Aerobic Base", "Big Gear Work"]);
  }

  #[test]
  fn segment_widths_scale_by_share_and_max() {
    // Bike: 2h total, 1.5h Zone 2 + 0.5h Threshold; max_value 3h.
    let workouts = vec![
      make_workout(1, SportType::Bike, 90, "2025-03-10", 0, Some(1)),
      make_workout(2, SportType::Bike, 30, "2025-03-11", 0, Some(2)),
      make_workout(3, SportType::Run, 180, "2025-03-12", 0, Some(1)),
    ];
    let rollup = compute_weekly_rollup(monday(), &workouts, &zone_labels());
    assert_approx_eq!(rollup.max_value, 3.0, TOL);

    let segments = &rollup.bars.bike;
    assert_eq!(segments.len(), 2);
    let total_width: f64 = segments.iter().map(|s| s.width_pct).sum();
    // The whole bike bar occupies 2/3 of the scale.
    assert_approx_eq!(total_width, 100.0 * 2.0 / 3.0, TOL);

    let zone2 = segments.iter().find(|s| s.name == "Zone 2").unwrap();
    assert_approx_eq!(zone2.width_pct, (1.5 / 2.0) * (2.0 / 3.0) * 100.0, TOL);
  }

  #[test]
  fn empty_sport_renders_empty_bar() {
    let rollup = compute_weekly_rollup(monday(), &[], &[]);
    assert!(rollup.bars.swim.is_empty());
    assert!(rollup.bars.bike.is_empty());
    assert!(rollup.bars.run.is_empty());
  }

  #[test]
  fn sport_without_labels_falls_back_to_single_segment() {
    let sport = SportRollup {
      total_hours: 1.0,
      by_label: BTreeMap::new(),
    };
    let segments = bar_segments(&sport, 2.0);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].color, FALLBACK_SEGMENT_COLOR);
    assert_approx_eq!(segments[0].width_pct, 50.0, TOL);
  }

  #[test]
  fn rollup_serializes_for_the_frontend() {
    let workouts = vec![make_workout(1, SportType::Run, 60, "2025-03-10", 0, None)];
    let rollup = compute_weekly_rollup(monday(), &workouts, &[]);

    let json = serde_json::to_value(&rollup).unwrap();
    assert_eq!(json["week_start"], "2025-03-10");
    assert_eq!(json["daily_breakdown"].as_array().unwrap().len(), 7);
    assert_eq!(json["per_sport"]["run"]["total_hours"], 1.0);
  }
}
