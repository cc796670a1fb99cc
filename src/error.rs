use serde::Serialize;

/// Errors crossing the command boundary. Serialized as their display string
/// so the frontend receives a single human-readable message.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
  #[error("Invalid drop target: {0}")]
  InvalidDropTarget(String),

  #[error("No workouts in source week")]
  EmptySourceWeek,

  #[error("Workout not found: {0}")]
  WorkoutNotFound(i64),

  #[error("Label not found: {0}")]
  LabelNotFound(i64),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

impl Serialize for PlannerError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}
