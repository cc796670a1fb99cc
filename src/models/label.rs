use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An intensity label ("Zone 2", "Threshold", ...) the user can attach to a
/// workout. Labels carry no persisted order; display order is derived from
/// the reference zone sequence in `rollup`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Label {
  pub id: i64,
  pub name: String,
  pub color: String,
  pub created_at: Option<DateTime<Utc>>,
}

/// For inserting new labels (without id, created_at).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLabel {
  pub name: String,
  pub color: String,
}
