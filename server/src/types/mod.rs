pub mod field_errors;
pub mod simulation;

pub use field_errors::FieldErrors;
pub use simulation::{Simulation, SimulationAttributes, SimulationId, SimulationRequest};
