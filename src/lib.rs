pub mod constants;
pub mod control;
pub mod error;
pub mod output;
pub mod speed_control;
pub mod steer_control;
pub mod waypoint;

pub use control::{Controller, ControllerInit};
pub use error::ControlError;
pub use output::Output;
pub use waypoint::Waypoint;
