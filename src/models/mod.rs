pub mod label;
pub mod workout;

pub use label::{Label, NewLabel};
pub use workout::{NewWorkout, SportType, UpdateWorkout, Workout};
