// ==============================================================================
// drivetrain.rs — ENGINE + TRANSMISSION MODEL
// ==============================================================================
// Projects rear-wheel angular velocity back through the driveline to get the
// engine rpm, looks up crank torque on the torque curve, and multiplies the
// overall transmission ratio back in to get drive torque at the wheel.
//
// There is no clutch model: at zero wheel speed the rpm is whatever the
// projection yields. The torque curve's flat extrapolation below its first
// sample stands in for idle behavior.
//
// Gear state lives here. Automatic mode shifts on rpm thresholds (forward
// gears only, never into reverse); manual mode shifts on explicit commands.
// ==============================================================================

use crate::config::{PhysicsConstants, VehicleDescription};
use crate::dynamics::curve::CurveTable;

/// Per-tick result of the driveline projection.
#[derive(Debug, Clone, Copy)]
pub struct DrivetrainOutput {
    pub engine_rpm: f32,
    pub engine_torque: f32, // N*m at the crank
    pub drive_torque: f32,  // N*m at the driven wheels
    pub transmission: f32,  // overall ratio, including efficiency
}

pub struct Drivetrain {
    gear_ratios: Vec<f32>, // index 0 = reverse
    differential_ratio: f32,
    transmission_efficiency: f32,
    gear_up_rpm: f32,
    gear_down_rpm: f32,
    torque_curve: CurveTable,
    rpm_per_rad_s: f32, // reciprocal of the rpm -> rad/s factor

    gear: usize,
    automatic: bool,
}

impl Drivetrain {
    /// Starts in first gear, automatic mode. The description is assumed to
    /// have been validated.
    pub fn new(desc: &VehicleDescription, constants: &PhysicsConstants) -> Self {
        Self {
            gear_ratios: desc.gear_ratios.clone(),
            differential_ratio: desc.differential_ratio,
            transmission_efficiency: desc.transmission_efficiency,
            gear_up_rpm: desc.gear_up_rpm,
            gear_down_rpm: desc.gear_down_rpm,
            torque_curve: CurveTable::from_samples(desc.torque_curve.clone()),
            rpm_per_rad_s: 1.0 / constants.rpm_to_angular_velocity,
            gear: 1,
            automatic: true,
        }
    }

    pub fn gear(&self) -> usize {
        self.gear
    }

    pub fn is_reverse(&self) -> bool {
        self.gear == 0
    }

    pub fn automatic(&self) -> bool {
        self.automatic
    }

    pub fn toggle_automatic(&mut self) {
        self.automatic = !self.automatic;
    }

    fn top_gear(&self) -> usize {
        self.gear_ratios.len() - 1
    }

    /// Manual upshift, clamped to the top forward gear. Leaving reverse goes
    /// through `select_first`, not through shifting.
    pub fn shift_up(&mut self) {
        if self.gear >= 1 && self.gear < self.top_gear() {
            self.gear += 1;
        }
    }

    /// Manual downshift, clamped to first. Never drops into reverse.
    pub fn shift_down(&mut self) {
        if self.gear > 1 {
            self.gear -= 1;
        }
    }

    pub fn select_reverse(&mut self) {
        self.gear = 0;
    }

    pub fn select_first(&mut self) {
        self.gear = 1;
    }

    fn transmission(&self) -> f32 {
        self.gear_ratios[self.gear] * self.differential_ratio * self.transmission_efficiency
    }

    /// One driveline evaluation. In automatic mode this is also where gear
    /// shifts happen; rpm and ratio are recomputed after a shift so the
    /// torque lookup uses the post-shift gearing within the same tick.
    pub fn evaluate(&mut self, wheel_angular_velocity: f32, throttle_on: bool) -> DrivetrainOutput {
        let mut transmission = self.transmission();
        let mut engine_rpm = wheel_angular_velocity * transmission * self.rpm_per_rad_s;

        if self.automatic && self.gear >= 1 {
            if engine_rpm >= self.gear_up_rpm && self.gear < self.top_gear() {
                self.gear += 1;
            } else if engine_rpm <= self.gear_down_rpm && self.gear > 1 {
                self.gear -= 1;
            }
            transmission = self.transmission();
            engine_rpm = wheel_angular_velocity * transmission * self.rpm_per_rad_s;
        }

        let engine_torque = if throttle_on {
            self.torque_curve.evaluate(engine_rpm)
        } else {
            0.0
        };

        DrivetrainOutput {
            engine_rpm,
            engine_torque,
            drive_torque: engine_torque * transmission,
            transmission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::roadster;

    fn drivetrain() -> Drivetrain {
        Drivetrain::new(&roadster(), &PhysicsConstants::default())
    }

    fn shift_test_drivetrain() -> Drivetrain {
        let mut desc = roadster();
        desc.gear_up_rpm = 6000.0;
        desc.gear_down_rpm = 2000.0;
        let mut dt = Drivetrain::new(&desc, &PhysicsConstants::default());
        dt.shift_up(); // start in gear 2
        dt
    }

    #[test]
    fn rpm_follows_wheel_speed_through_gearing() {
        let mut dt = drivetrain();
        let constants = PhysicsConstants::default();
        // gear 1: 2.66 * 3.42 * 0.7
        let transmission: f32 = 2.66 * 3.42 * 0.7;
        let out = dt.evaluate(30.0, false);
        let expected = 30.0 * transmission / constants.rpm_to_angular_velocity;
        assert!((out.engine_rpm - expected).abs() < 1e-2);
        assert_eq!(out.engine_torque, 0.0);
        assert_eq!(out.drive_torque, 0.0);
    }

    #[test]
    fn throttle_drives_torque_through_transmission() {
        let mut dt = drivetrain();
        dt.toggle_automatic(); // manual, keep gear 1
        let out = dt.evaluate(30.0, true);
        assert!(out.engine_torque > 0.0);
        assert!((out.drive_torque - out.engine_torque * out.transmission).abs() < 1e-3);
    }

    #[test]
    fn automatic_upshifts_exactly_when_rpm_reaches_threshold() {
        let mut dt = shift_test_drivetrain();
        assert_eq!(dt.gear(), 2);

        // start fast enough that gear-2 rpm sits between the two thresholds
        let mut shifts = 0;
        let mut previous_rpm = 0.0_f32;
        let mut omega = 60.0_f32;
        while dt.gear() == 2 {
            let gear_before = dt.gear();
            let out = dt.evaluate(omega, true);
            if dt.gear() != gear_before {
                shifts += 1;
                // the rpm computed from the pre-shift ratio crossed the
                // threshold this call, and had not on the previous call
                let pre_shift_rpm = omega * 1.78 * 3.42 * 0.7
                    / PhysicsConstants::default().rpm_to_angular_velocity;
                assert!(pre_shift_rpm >= 6000.0 - 0.5);
                assert!(previous_rpm < 6000.0);
                // reported rpm uses the post-shift ratio
                assert!(out.engine_rpm < pre_shift_rpm);
            } else {
                previous_rpm = out.engine_rpm;
                assert!(out.engine_rpm > 2000.0, "must not downshift in this range");
            }
            omega += 1.0;
            assert!(omega < 500.0, "never reached the upshift threshold");
        }
        assert_eq!(shifts, 1);
        assert_eq!(dt.gear(), 3);
    }

    #[test]
    fn automatic_downshifts_at_low_rpm_but_not_into_reverse() {
        let mut dt = shift_test_drivetrain();
        assert_eq!(dt.gear(), 2);
        dt.evaluate(1.0, false); // rpm well below 2000
        assert_eq!(dt.gear(), 1);
        dt.evaluate(1.0, false);
        assert_eq!(dt.gear(), 1, "downshift clamps at first gear");
    }

    #[test]
    fn automatic_never_shifts_out_of_reverse() {
        let mut dt = drivetrain();
        dt.select_reverse();
        dt.evaluate(-5.0, true);
        assert_eq!(dt.gear(), 0);
    }

    #[test]
    fn manual_shifts_clamp_to_gear_range() {
        let mut dt = drivetrain();
        dt.toggle_automatic();
        assert!(!dt.automatic());

        dt.shift_down();
        assert_eq!(dt.gear(), 1, "manual downshift never selects reverse");
        for _ in 0..10 {
            dt.shift_up();
        }
        assert_eq!(dt.gear(), 5);

        dt.select_reverse();
        dt.shift_up();
        assert_eq!(dt.gear(), 0, "leaving reverse requires an explicit select");
        dt.select_first();
        assert_eq!(dt.gear(), 1);
    }

    #[test]
    fn reverse_gear_produces_negative_drive_torque() {
        let mut dt = drivetrain();
        dt.select_reverse();
        // rolling backwards: negative wheel speed through a negative ratio
        // yields a positive rpm
        let out = dt.evaluate(-10.0, true);
        assert!(out.engine_rpm > 0.0);
        assert!(out.drive_torque < 0.0);
    }
}
