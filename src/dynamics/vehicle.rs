// ==============================================================================
// vehicle.rs — PLANAR RIGID-BODY INTEGRATOR
// ==============================================================================
// Owns the mutable vehicle state and advances it one fixed timestep at a
// time. Each step composes the drivetrain and tire solves with aerodynamic
// drag and rolling resistance into a net body-frame force and a yaw torque,
// then integrates with semi-implicit Euler (velocity first, then position).
//
// Step order:
// 1) edge-triggered commands (gear / automatic toggle)
// 2) low-speed guard (park, or reset to a nominal crawl under power)
// 3) steering rate limit toward the requested lock
// 4) drivetrain evaluate (wheel speed projected through the driveline)
// 5) brake resolution (the opposing pedal brakes while the car rolls)
// 6) tire solve
// 7) yaw torque -> yaw rate -> orientation; facing recomputed from scratch
// 8) force sum -> local acceleration -> local velocity -> world integration
//
// The facing vector and the local->world rotation are rebuilt from the
// orientation angle every tick instead of being rotated incrementally, so
// the orientation representation cannot drift away from unit length.
// ==============================================================================

use anyhow::Result;
use nalgebra::{Rotation2, Vector2};

use crate::config::{PhysicsConstants, VehicleDescription};
use crate::dynamics::drivetrain::Drivetrain;
use crate::dynamics::tires::{GripState, TireInputs, solve_tires};
use crate::dynamics::types::TickInput;
use crate::telemetry::{TelemetrySink, TickTelemetry};

/// Mutable half of a vehicle. Owned exclusively by `VehicleDynamics`; the
/// outside world reads it through accessors.
#[derive(Debug, Clone)]
pub struct VehicleState {
    pub position: Vector2<f32>,           // m, world
    pub velocity: Vector2<f32>,           // m/s, world
    pub acceleration: Vector2<f32>,       // m/s^2, world
    pub velocity_local: Vector2<f32>,     // m/s, body frame (x forward)
    pub acceleration_local: Vector2<f32>, // m/s^2, body frame
    pub orientation: f32,                 // rad, 0 = facing +x
    pub yaw_rate: f32,                    // rad/s
    pub steer_angle: f32,                 // rad, relative to the body
    pub facing: Vector2<f32>,             // unit vector, derived from orientation
    pub throttle: bool,
    pub reverse: bool,
    pub handbrake: bool,
    pub front_grip: GripState,
    pub rear_grip: GripState,
}

impl VehicleState {
    fn at_rest(orientation: f32) -> Self {
        Self {
            position: Vector2::zeros(),
            velocity: Vector2::zeros(),
            acceleration: Vector2::zeros(),
            velocity_local: Vector2::zeros(),
            acceleration_local: Vector2::zeros(),
            orientation,
            yaw_rate: 0.0,
            steer_angle: 0.0,
            facing: facing_from(orientation),
            throttle: false,
            reverse: false,
            handbrake: false,
            front_grip: GripState::Grip,
            rear_grip: GripState::Grip,
        }
    }
}

#[inline]
fn facing_from(orientation: f32) -> Vector2<f32> {
    Vector2::new(orientation.cos(), orientation.sin())
}

pub struct VehicleDynamics {
    description: VehicleDescription,
    constants: PhysicsConstants,
    drivetrain: Drivetrain,
    state: VehicleState,
    telemetry: TickTelemetry,
}

impl VehicleDynamics {
    /// Fails closed on a description that would produce degenerate physics;
    /// a rejected description never yields an instance.
    pub fn new(
        description: VehicleDescription,
        constants: PhysicsConstants,
        initial_orientation: f32,
    ) -> Result<Self> {
        description.validate()?;
        let drivetrain = Drivetrain::new(&description, &constants);
        Ok(Self {
            description,
            constants,
            drivetrain,
            state: VehicleState::at_rest(initial_orientation),
            telemetry: TickTelemetry::default(),
        })
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn position(&self) -> Vector2<f32> {
        self.state.position
    }

    pub fn facing(&self) -> Vector2<f32> {
        self.state.facing
    }

    pub fn velocity(&self) -> Vector2<f32> {
        self.state.velocity
    }

    pub fn acceleration(&self) -> Vector2<f32> {
        self.state.acceleration
    }

    pub fn gear(&self) -> usize {
        self.drivetrain.gear()
    }

    pub fn automatic(&self) -> bool {
        self.drivetrain.automatic()
    }

    pub fn telemetry(&self) -> &TickTelemetry {
        &self.telemetry
    }

    /// Forward the last tick's telemetry snapshot. Fire-and-forget: nothing
    /// here feeds back into the simulation.
    pub fn emit_telemetry(&self, sink: &mut dyn TelemetrySink) {
        self.telemetry.emit(sink);
    }

    /// Advance one fixed tick. Deterministic given the current state, the
    /// description, the input flags and `dt`.
    pub fn step(&mut self, input: &TickInput, dt: f32) {
        // --------------------------------------------------
        // 1) Edge-triggered commands
        // --------------------------------------------------
        if input.toggle_automatic {
            self.drivetrain.toggle_automatic();
        }
        if !self.drivetrain.automatic() {
            if input.gear_up {
                self.drivetrain.shift_up();
            }
            if input.gear_down {
                self.drivetrain.shift_down();
            }
        }
        self.state.throttle = input.throttle;
        self.state.reverse = input.reverse;
        self.state.handbrake = input.handbrake;

        // --------------------------------------------------
        // 2) Low-speed guard. The slip-angle formulas are
        // singular around zero longitudinal speed, so below
        // the threshold the car either parks outright or is
        // reset to a nominal crawl in the driven direction.
        // --------------------------------------------------
        if self.state.velocity_local.x.abs() <= self.constants.low_speed_threshold {
            self.state.velocity_local = Vector2::zeros();
            self.state.acceleration_local = Vector2::zeros();
            self.state.velocity = Vector2::zeros();
            self.state.acceleration = Vector2::zeros();
            self.state.yaw_rate = 0.0;

            if input.reverse {
                self.drivetrain.select_reverse();
                self.state.velocity_local.x = -self.constants.crawl_speed;
            } else if input.throttle {
                if self.drivetrain.is_reverse() {
                    self.drivetrain.select_first();
                }
                self.state.velocity_local.x = self.constants.crawl_speed;
            }
        }

        // --------------------------------------------------
        // 3) Steering, rate-limited toward the requested lock
        // --------------------------------------------------
        let steer_target = input.steer.sign() * self.description.max_steer_angle;
        let max_steer_step = self.description.steer_speed * dt;
        let steer_delta = steer_target - self.state.steer_angle;
        self.state.steer_angle += steer_delta.clamp(-max_steer_step, max_steer_step);

        // Parked and no pedal keeping the car moving: the wheels may still
        // turn, but the slip-angle terms would manufacture lateral force out
        // of the steering angle alone, so skip the force solve entirely.
        if self.state.velocity_local.x == 0.0 {
            let driveline = self.drivetrain.evaluate(0.0, false);
            self.telemetry = TickTelemetry {
                speed: 0.0,
                engine_rpm: driveline.engine_rpm,
                gear: self.drivetrain.gear(),
                ..TickTelemetry::default()
            };
            return;
        }

        // --------------------------------------------------
        // 4) Drivetrain. In reverse gear the reverse pedal is
        // the accelerator.
        // --------------------------------------------------
        let vx = self.state.velocity_local.x;
        let wheel_radius = self.description.wheel_radius;
        let wheel_angular_velocity = vx / wheel_radius;
        let in_reverse = self.drivetrain.is_reverse();
        let throttle_on = if in_reverse { input.reverse } else { input.throttle };
        let driveline = self.drivetrain.evaluate(wheel_angular_velocity, throttle_on);
        let drive_force = driveline.drive_torque / wheel_radius;

        // --------------------------------------------------
        // 5) Brakes. The pedal opposing the selected gear's
        // direction brakes while the car is still rolling;
        // the handbrake always adds on top.
        // --------------------------------------------------
        let mut brake_force = 0.0;
        if !in_reverse && input.reverse && vx > 0.0 {
            brake_force += self.description.brake_torque / wheel_radius;
        }
        if in_reverse && input.throttle && vx < 0.0 {
            brake_force += self.description.brake_torque / wheel_radius;
        }
        if input.handbrake {
            brake_force += self.description.handbrake_torque / wheel_radius;
        }

        // --------------------------------------------------
        // 6) Tires
        // --------------------------------------------------
        let forces = solve_tires(
            &self.description,
            &self.constants,
            &TireInputs {
                velocity_local: self.state.velocity_local,
                accel_local_x: self.state.acceleration_local.x,
                yaw_rate: self.state.yaw_rate,
                steer_angle: self.state.steer_angle,
                drive_force,
                brake_force,
                handbrake: input.handbrake,
                front_state: self.state.front_grip,
                rear_state: self.state.rear_grip,
            },
        );
        self.state.front_grip = forces.front_state;
        self.state.rear_grip = forces.rear_state;

        // --------------------------------------------------
        // 7) Yaw
        // --------------------------------------------------
        let steer_cos = self.state.steer_angle.cos();
        let yaw_torque = forces.front_lateral * steer_cos * self.description.cg_to_front_axle
            - forces.rear.y * self.description.cg_to_back_axle;
        let yaw_accel = yaw_torque / self.description.inertia();
        self.state.yaw_rate += yaw_accel * dt;
        self.state.orientation += self.state.yaw_rate * dt;
        self.state.facing = facing_from(self.state.orientation);

        // --------------------------------------------------
        // 8) Force sum + integration (semi-implicit Euler)
        // --------------------------------------------------
        let v = self.state.velocity_local;
        let drag = -0.5
            * self.description.air_density
            * self.description.frontal_area()
            * self.description.drag_coefficient
            * v.norm()
            * v;
        let rolling = -self.description.rolling_resistance * v.x;

        let force_local = Vector2::new(
            forces.rear.x + drag.x + rolling,
            forces.rear.y + forces.front_lateral * steer_cos + drag.y,
        );
        self.state.acceleration_local = force_local / self.description.total_mass();
        self.state.velocity_local += self.state.acceleration_local * dt;

        let rotation = Rotation2::new(self.state.orientation);
        self.state.velocity = rotation * self.state.velocity_local;
        self.state.acceleration = rotation * self.state.acceleration_local;
        self.state.position += self.state.velocity * dt;

        // --------------------------------------------------
        // 9) Telemetry snapshot
        // --------------------------------------------------
        self.telemetry = TickTelemetry {
            speed: self.state.velocity_local.norm(),
            engine_rpm: driveline.engine_rpm,
            gear: self.drivetrain.gear(),
            drive_force,
            front_lateral: forces.front_lateral,
            rear_lateral: forces.rear.y,
            slip_angle_front: forces.slip_angle_front,
            slip_angle_rear: forces.slip_angle_rear,
            front_slipping: forces.front_state.is_slipping(),
            rear_slipping: forces.rear_state.is_slipping(),
        };
    }
}
