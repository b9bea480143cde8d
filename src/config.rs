// ==============================================================================
// config.rs — VEHICLE DESCRIPTION + PHYSICS CONSTANTS
// ==============================================================================
// The description is the immutable half of a vehicle: everything read from an
// external configuration source, plus values derived from it (inertia, total
// mass). It is validated once, up front; the solver never re-checks it.
//
// The constants are the handful of environment/unit values the integrator
// needs (gravity, rpm conversion, low-speed guards). They are injected into
// VehicleDynamics at construction rather than living as process-wide globals,
// so several vehicles with different tunings can coexist in one process.
// ==============================================================================

use anyhow::{Result, bail};
use serde::Deserialize;

/// Immutable parameters of a single vehicle.
///
/// Produced by an external config loader (any self-describing format serde
/// supports); this crate only defines the shape and the validity rules.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleDescription {
    pub mass: f32,                      // kg (chassis, without wheels)
    pub wheel_mass: f32,                // kg (per wheel)
    pub wheel_radius: f32,              // m

    // --- Geometry ---
    pub cg_to_front: f32,               // m (center of gravity -> front edge)
    pub cg_to_back: f32,                // m (center of gravity -> back edge)
    pub cg_to_front_axle: f32,          // m
    pub cg_to_back_axle: f32,           // m
    pub cg_height: f32,                 // m (above ground)
    pub halfwidth: f32,                 // m
    pub height: f32,                    // m (body height, sets frontal area)

    // --- Resistance ---
    pub drag_coefficient: f32,          // dimensionless
    pub air_density: f32,               // kg/m^3
    pub rolling_resistance: f32,        // N per m/s of longitudinal speed

    // --- Tires ---
    pub cornering_stiffness_front: f32, // per rad, as a fraction of axle load
    pub cornering_stiffness_rear: f32,  // per rad, as a fraction of axle load
    pub tire_grip: f32,                 // traction-circle radius, fraction of load
    pub tire_slide_grip: f32,           // reduced radius once an axle slips
    pub lock_grip_factor: f32,          // rear radius scale under handbrake (0..1)

    // --- Steering ---
    pub max_steer_angle: f32,           // rad
    pub steer_speed: f32,               // rad/s toward the target angle

    // --- Brakes ---
    pub brake_torque: f32,              // N*m at the wheels
    pub handbrake_torque: f32,          // N*m at the rear wheels

    // --- Drivetrain ---
    pub gear_ratios: Vec<f32>,          // index 0 = reverse (negative), 1.. = forward
    pub differential_ratio: f32,
    pub transmission_efficiency: f32,   // 0..1
    pub gear_up_rpm: f32,               // automatic upshift threshold
    pub gear_down_rpm: f32,             // automatic downshift threshold
    pub torque_curve: Vec<(f32, f32)>,  // (rpm, N*m), strictly increasing rpm
}

impl VehicleDescription {
    /// Chassis plus all four wheels.
    pub fn total_mass(&self) -> f32 {
        self.mass + 4.0 * self.wheel_mass
    }

    /// Yaw moment of inertia: cuboid body plus the spin inertia of each wheel.
    pub fn inertia(&self) -> f32 {
        let length = self.cg_to_front + self.cg_to_back;
        let width = 2.0 * self.halfwidth;
        let body = (1.0 / 12.0) * self.mass * (length * length + width * width);
        let wheel = 0.5 * self.wheel_mass * self.wheel_radius * self.wheel_radius;
        body + 4.0 * wheel
    }

    pub fn wheelbase(&self) -> f32 {
        self.cg_to_front_axle + self.cg_to_back_axle
    }

    /// Frontal area for drag. Always faces the direction of travel; the yaw
    /// projection is deliberately ignored.
    pub fn frontal_area(&self) -> f32 {
        self.height * 2.0 * self.halfwidth
    }

    /// Reject descriptions that would produce degenerate physics. The checks
    /// are written as `!(x > 0.0)` so NaN fails them too.
    pub fn validate(&self) -> Result<()> {
        if !(self.total_mass() > 0.0) {
            bail!("total mass must be positive, got {}", self.total_mass());
        }
        if !(self.wheel_radius > 0.0) {
            bail!("wheel radius must be positive, got {}", self.wheel_radius);
        }
        if !(self.wheelbase() > 0.0) {
            bail!("wheelbase must be positive, got {}", self.wheelbase());
        }
        if self.gear_ratios.len() < 2 {
            bail!(
                "gear table needs a reverse and at least one forward gear, got {} entries",
                self.gear_ratios.len()
            );
        }
        if !(self.gear_ratios[0] < 0.0) {
            bail!("reverse ratio (gear 0) must be negative, got {}", self.gear_ratios[0]);
        }
        for (i, &ratio) in self.gear_ratios.iter().enumerate().skip(1) {
            if !(ratio > 0.0) {
                bail!("forward gear {i} ratio must be positive, got {ratio}");
            }
        }
        if !(self.differential_ratio > 0.0) {
            bail!("differential ratio must be positive, got {}", self.differential_ratio);
        }
        if !(self.transmission_efficiency > 0.0 && self.transmission_efficiency <= 1.0) {
            bail!(
                "transmission efficiency must be in (0, 1], got {}",
                self.transmission_efficiency
            );
        }
        if self.torque_curve.is_empty() {
            bail!("torque curve has no samples");
        }
        for pair in self.torque_curve.windows(2) {
            if !(pair[1].0 > pair[0].0) {
                bail!(
                    "torque curve rpm samples must be strictly increasing, got {} after {}",
                    pair[1].0,
                    pair[0].0
                );
            }
        }
        if !(self.tire_grip > 0.0) || !(self.tire_slide_grip > 0.0) {
            bail!(
                "traction-circle radii must be positive, got {} / {}",
                self.tire_grip,
                self.tire_slide_grip
            );
        }
        if !(self.max_steer_angle > 0.0) {
            bail!("max steer angle must be positive, got {}", self.max_steer_angle);
        }
        if !(self.steer_speed > 0.0) {
            bail!("steer speed must be positive, got {}", self.steer_speed);
        }
        Ok(())
    }
}

/// Environment and unit-conversion constants injected into the integrator.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsConstants {
    pub gravity: f32,                  // m/s^2
    pub rpm_to_angular_velocity: f32,  // (rad/s) per rpm
    pub low_speed_threshold: f32,      // m/s, below this the car parks or crawls
    pub crawl_speed: f32,              // m/s, nominal speed under throttle from rest
    pub epsilon: f32,                  // safe-division floor
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            rpm_to_angular_velocity: 2.0 * std::f32::consts::PI / 60.0,
            low_speed_threshold: 1.0,
            crawl_speed: 1.0,
            epsilon: 1e-5,
        }
    }
}

/// Rear-wheel-drive road car, five forward gears. Numbers in the ballpark of
/// a small sports coupe; good enough as a default tuning for tests and demos.
pub fn roadster() -> VehicleDescription {
    VehicleDescription {
        mass: 1250.0,              // kg
        wheel_mass: 20.0,          // kg
        wheel_radius: 0.33,        // m

        cg_to_front: 2.1,          // m
        cg_to_back: 2.1,           // m
        cg_to_front_axle: 1.25,    // m
        cg_to_back_axle: 1.25,     // m
        cg_height: 0.55,           // m
        halfwidth: 0.9,            // m
        height: 1.3,               // m

        drag_coefficient: 0.42,
        air_density: 1.29,         // kg/m^3
        rolling_resistance: 12.8,  // N per m/s

        cornering_stiffness_front: 5.0,
        cornering_stiffness_rear: 5.2,
        tire_grip: 1.05,
        tire_slide_grip: 0.8,
        lock_grip_factor: 0.7,

        max_steer_angle: 0.6,      // rad (~34 degrees)
        steer_speed: 2.5,          // rad/s

        brake_torque: 3000.0,      // N*m
        handbrake_torque: 2200.0,  // N*m

        gear_ratios: vec![-2.9, 2.66, 1.78, 1.3, 1.0, 0.74],
        differential_ratio: 3.42,
        transmission_efficiency: 0.7,
        gear_up_rpm: 5500.0,
        gear_down_rpm: 2500.0,
        torque_curve: vec![
            (1000.0, 220.0),
            (2000.0, 280.0),
            (3000.0, 325.0),
            (4400.0, 350.0),
            (5500.0, 335.0),
            (6500.0, 290.0),
        ],
    }
}
