//! Planar single-vehicle dynamics simulation.
//!
//! The crate simulates one player-controlled vehicle (chassis + drivetrain +
//! tires) at a fixed timestep and exposes pose/velocity accessors for an
//! external renderer to interpolate. Rendering, windowing, input mapping and
//! config file parsing live outside; this crate is the physics.

pub mod config;
pub mod dynamics;
pub mod telemetry;
pub mod ticker;

pub use config::{PhysicsConstants, VehicleDescription, roadster};
pub use dynamics::{Steer, TickInput, VehicleDynamics, VehicleState};
pub use telemetry::{NullSink, TelemetrySink, TickTelemetry, TraceSink};
pub use ticker::Ticker;
