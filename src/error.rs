use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    #[error("waypoint route is empty")]
    EmptyRoute,
    #[error("non-finite {field} in vehicle state: {value}")]
    NonFinitePose { field: &'static str, value: f64 },
}
