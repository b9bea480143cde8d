//! Vehicle dynamics: lookup curves, drivetrain, tire forces, and the
//! planar rigid-body integrator that composes them each fixed tick.

pub mod curve;
pub mod drivetrain;
pub mod tires;
pub mod types;
pub mod vehicle;

pub use curve::CurveTable;
pub use drivetrain::{Drivetrain, DrivetrainOutput};
pub use tires::{GripState, TireForces, TireInputs, solve_tires};
pub use types::{Steer, TickInput};
pub use vehicle::{VehicleDynamics, VehicleState};
