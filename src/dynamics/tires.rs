// ==============================================================================
// tires.rs — AXLE FORCE MODEL (SLIP ANGLES + TRACTION CIRCLE)
// ==============================================================================
// Pure per-tick solve. Inputs are the body-frame motion state and the drive/
// brake demand; outputs are one lateral force for the steered front axle and
// a combined longitudinal+lateral vector for the rear axle, both clipped to
// a traction circle scaled by the axle's current normal load.
//
// Model steps:
// 1) weight transfer from longitudinal acceleration (cg height / wheelbase)
// 2) slip angle per axle via atan2(lateral slip, |v_long|)
// 3) linear cornering force: -stiffness * slip_angle * axle_load
// 4) traction-circle clamp with grip/slide hysteresis per axle
//
// |v_long| in the atan2 denominator keeps the slip-angle sign consistent in
// both directions of travel; the discontinuity at exactly zero longitudinal
// speed is guarded by the integrator's low-speed reset, not here.
//
// The hysteresis exists because the sliding radius is smaller than the
// adhesive one: choosing the radius from the *previous* tick's state keeps
// the clamp from flip-flopping between radii on consecutive ticks.
// ==============================================================================

use nalgebra::Vector2;

use crate::config::{PhysicsConstants, VehicleDescription};

/// Grip hysteresis state of one axle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum GripState {
    #[default]
    Grip,
    Slide,
}

impl GripState {
    pub fn is_slipping(self) -> bool {
        matches!(self, GripState::Slide)
    }
}

/// Body-frame inputs to one tire solve.
#[derive(Debug, Clone, Copy)]
pub struct TireInputs {
    pub velocity_local: Vector2<f32>, // m/s, x forward
    pub accel_local_x: f32,           // m/s^2, previous tick (drives weight transfer)
    pub yaw_rate: f32,                // rad/s
    pub steer_angle: f32,             // rad
    pub drive_force: f32,             // N at the rear contact, signed
    pub brake_force: f32,             // N, magnitude; applied against motion
    pub handbrake: bool,
    pub front_state: GripState,
    pub rear_state: GripState,
}

/// Per-tick axle forces plus the grip state carried to the next tick.
#[derive(Debug, Clone, Copy)]
pub struct TireForces {
    pub front_lateral: f32,     // N along the steered wheel's lateral axis
    pub rear: Vector2<f32>,     // N, body frame (x longitudinal, y lateral)
    pub front_state: GripState,
    pub rear_state: GripState,
    pub front_load: f32,        // N
    pub rear_load: f32,         // N
    pub slip_angle_front: f32,  // rad
    pub slip_angle_rear: f32,   // rad
}

/// Normal load per axle under longitudinal weight transfer. Braking loads
/// the front, accelerating loads the rear; the two always sum to the static
/// weight.
pub fn axle_loads(
    desc: &VehicleDescription,
    constants: &PhysicsConstants,
    accel_local_x: f32,
) -> (f32, f32) {
    let mass = desc.total_mass();
    let wheelbase = desc.wheelbase();
    let static_front = (desc.cg_to_back_axle / wheelbase) * mass * constants.gravity;
    let static_rear = (desc.cg_to_front_axle / wheelbase) * mass * constants.gravity;
    let transfer = (desc.cg_height / wheelbase) * mass * accel_local_x;
    ((static_front - transfer).max(0.0), (static_rear + transfer).max(0.0))
}

/// Clamp a force vector to `radius * load`. Marks the axle as sliding when
/// the clamp engages; the scaled vector keeps its direction exactly.
fn clip_to_circle(
    force: Vector2<f32>,
    load: f32,
    radius: f32,
    epsilon: f32,
) -> (Vector2<f32>, GripState) {
    let cap = radius * load;
    let magnitude = force.norm();
    if magnitude >= cap && magnitude > epsilon {
        (force * (cap / magnitude), GripState::Slide)
    } else {
        (force, GripState::Grip)
    }
}

pub fn solve_tires(
    desc: &VehicleDescription,
    constants: &PhysicsConstants,
    input: &TireInputs,
) -> TireForces {
    let (front_load, rear_load) = axle_loads(desc, constants, input.accel_local_x);

    // --------------------------------------------------
    // Slip angles
    // --------------------------------------------------
    let v = input.velocity_local;
    let front_lateral_slip = v.y + input.yaw_rate * desc.cg_to_front_axle;
    let rear_lateral_slip = v.y - input.yaw_rate * desc.cg_to_back_axle;

    let steer_sign = if v.x < 0.0 { -1.0 } else { 1.0 };
    let slip_angle_front =
        front_lateral_slip.atan2(v.x.abs()) - steer_sign * input.steer_angle;
    let slip_angle_rear = rear_lateral_slip.atan2(v.x.abs());

    // --------------------------------------------------
    // Raw cornering forces (linear tire model; saturation
    // happens in the traction circle below)
    // --------------------------------------------------
    let front_lateral_raw = -desc.cornering_stiffness_front * slip_angle_front * front_load;
    let rear_lateral_raw = -desc.cornering_stiffness_rear * slip_angle_rear * rear_load;

    // --------------------------------------------------
    // Rear longitudinal: drive minus brakes, brakes oppose
    // the direction of travel
    // --------------------------------------------------
    let brake = if v.x > 0.0 {
        -input.brake_force
    } else if v.x < 0.0 {
        input.brake_force
    } else {
        0.0
    };
    let rear_longitudinal = input.drive_force + brake;

    // --------------------------------------------------
    // Traction circles. Radius comes from last tick's grip
    // state; handbrake shrinks the rear circle.
    // --------------------------------------------------
    let front_radius = if input.front_state.is_slipping() {
        desc.tire_slide_grip
    } else {
        desc.tire_grip
    };
    let mut rear_radius = if input.rear_state.is_slipping() {
        desc.tire_slide_grip
    } else {
        desc.tire_grip
    };
    if input.handbrake {
        rear_radius *= desc.lock_grip_factor;
    }

    let (front_vector, front_state) = clip_to_circle(
        Vector2::new(0.0, front_lateral_raw),
        front_load,
        front_radius,
        constants.epsilon,
    );
    let (rear, rear_state) = clip_to_circle(
        Vector2::new(rear_longitudinal, rear_lateral_raw),
        rear_load,
        rear_radius,
        constants.epsilon,
    );

    TireForces {
        front_lateral: front_vector.y,
        rear,
        front_state,
        rear_state,
        front_load,
        rear_load,
        slip_angle_front,
        slip_angle_rear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::roadster;

    fn constants() -> PhysicsConstants {
        PhysicsConstants::default()
    }

    fn quiet_inputs() -> TireInputs {
        TireInputs {
            velocity_local: Vector2::zeros(),
            accel_local_x: 0.0,
            yaw_rate: 0.0,
            steer_angle: 0.0,
            drive_force: 0.0,
            brake_force: 0.0,
            handbrake: false,
            front_state: GripState::Grip,
            rear_state: GripState::Grip,
        }
    }

    #[test]
    fn static_loads_sum_to_weight_and_split_by_geometry() {
        let desc = roadster();
        let (front, rear) = axle_loads(&desc, &constants(), 0.0);
        let weight = desc.total_mass() * constants().gravity;
        assert!((front + rear - weight).abs() < 1e-2);
        // symmetric axle distances: even split
        assert!((front - rear).abs() < 1e-2);
    }

    #[test]
    fn acceleration_shifts_load_rearward_and_conserves_weight() {
        let desc = roadster();
        let (front_static, rear_static) = axle_loads(&desc, &constants(), 0.0);
        let (front, rear) = axle_loads(&desc, &constants(), 5.0);
        assert!(front < front_static);
        assert!(rear > rear_static);
        assert!(((front + rear) - (front_static + rear_static)).abs() < 1e-2);

        let expected_transfer =
            (desc.cg_height / desc.wheelbase()) * desc.total_mass() * 5.0;
        assert!((rear - rear_static - expected_transfer).abs() < 1e-2);
    }

    #[test]
    fn at_rest_all_forces_are_zero() {
        let desc = roadster();
        let forces = solve_tires(&desc, &constants(), &quiet_inputs());
        assert_eq!(forces.front_lateral, 0.0);
        assert_eq!(forces.rear, Vector2::zeros());
        assert!(!forces.front_state.is_slipping());
        assert!(!forces.rear_state.is_slipping());
    }

    #[test]
    fn yaw_produces_opposing_cornering_forces() {
        let desc = roadster();
        let mut input = quiet_inputs();
        input.velocity_local = Vector2::new(20.0, 0.0);
        input.yaw_rate = 0.5;

        let forces = solve_tires(&desc, &constants(), &input);
        // positive yaw swings the front left, the rear right; the tire
        // forces push back against both
        assert!(forces.slip_angle_front > 0.0);
        assert!(forces.slip_angle_rear < 0.0);
        assert!(forces.front_lateral < 0.0);
        assert!(forces.rear.y > 0.0);
    }

    #[test]
    fn steering_tilts_the_front_slip_angle() {
        let desc = roadster();
        let mut input = quiet_inputs();
        input.velocity_local = Vector2::new(20.0, 0.0);
        input.steer_angle = 0.3;

        let forces = solve_tires(&desc, &constants(), &input);
        assert!((forces.slip_angle_front - (-0.3)).abs() < 1e-6);
        assert!(forces.front_lateral > 0.0, "steering left pulls the nose left");
        assert_eq!(forces.slip_angle_rear, 0.0);
    }

    #[test]
    fn slip_angle_sign_is_stable_in_reverse() {
        let desc = roadster();
        let mut input = quiet_inputs();
        input.velocity_local = Vector2::new(-10.0, 1.0);

        let forces = solve_tires(&desc, &constants(), &input);
        // |v_long| in the denominator: lateral slip keeps its sign
        assert!(forces.slip_angle_rear > 0.0);
        assert!(forces.rear.y < 0.0);
    }

    #[test]
    fn traction_circle_clips_magnitude_and_keeps_direction() {
        let desc = roadster();
        let mut input = quiet_inputs();
        input.velocity_local = Vector2::new(20.0, 0.0);
        input.yaw_rate = 0.8; // large rear slip angle
        input.drive_force = 25_000.0; // far beyond any cap

        let forces = solve_tires(&desc, &constants(), &input);
        assert!(forces.rear_state.is_slipping());

        let cap = desc.tire_grip * forces.rear_load;
        assert!((forces.rear.norm() - cap).abs() < cap * 1e-5);

        // direction must match the unclipped force vector
        let rear_lateral_slip = -input.yaw_rate * desc.cg_to_back_axle;
        let slip_angle = rear_lateral_slip.atan2(input.velocity_local.x);
        let raw = Vector2::new(
            input.drive_force,
            -desc.cornering_stiffness_rear * slip_angle * forces.rear_load,
        );
        let cross = raw.x * forces.rear.y - raw.y * forces.rear.x;
        assert!(cross.abs() < 1e-2 * raw.norm());
        assert!(raw.dot(&forces.rear) > 0.0);
    }

    #[test]
    fn forces_within_the_circle_pass_through_unchanged() {
        let desc = roadster();
        let mut input = quiet_inputs();
        input.velocity_local = Vector2::new(20.0, 0.0);
        input.drive_force = 1000.0;

        let forces = solve_tires(&desc, &constants(), &input);
        assert!(!forces.rear_state.is_slipping());
        assert_eq!(forces.rear.x, 1000.0);
        assert_eq!(forces.rear.y, 0.0);
    }

    #[test]
    fn sliding_axle_uses_the_smaller_radius() {
        let desc = roadster();
        let mut input = quiet_inputs();
        input.velocity_local = Vector2::new(20.0, 0.0);
        input.drive_force = 25_000.0;

        let gripping = solve_tires(&desc, &constants(), &input);
        input.rear_state = gripping.rear_state;
        assert!(input.rear_state.is_slipping());

        let sliding = solve_tires(&desc, &constants(), &input);
        let slide_cap = desc.tire_slide_grip * sliding.rear_load;
        assert!((sliding.rear.norm() - slide_cap).abs() < slide_cap * 1e-5);
        assert!(sliding.rear.norm() < gripping.rear.norm());
    }

    #[test]
    fn handbrake_shrinks_the_rear_circle() {
        let desc = roadster();
        let mut input = quiet_inputs();
        input.velocity_local = Vector2::new(20.0, 0.0);
        input.drive_force = 25_000.0;

        let plain = solve_tires(&desc, &constants(), &input);
        input.handbrake = true;
        let locked = solve_tires(&desc, &constants(), &input);
        let locked_cap = desc.tire_grip * desc.lock_grip_factor * locked.rear_load;
        assert!((locked.rear.norm() - locked_cap).abs() < locked_cap * 1e-5);
        assert!(locked.rear.norm() < plain.rear.norm());
    }

    #[test]
    fn brake_force_opposes_direction_of_travel() {
        let desc = roadster();
        let mut input = quiet_inputs();
        input.velocity_local = Vector2::new(15.0, 0.0);
        input.brake_force = 4000.0;
        let forward = solve_tires(&desc, &constants(), &input);
        assert!(forward.rear.x < 0.0);

        input.velocity_local = Vector2::new(-15.0, 0.0);
        let backward = solve_tires(&desc, &constants(), &input);
        assert!(backward.rear.x > 0.0);
    }
}
