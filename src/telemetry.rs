// ==============================================================================
// telemetry.rs — FIRE-AND-FORGET SCALAR CHANNELS
// ==============================================================================
// The simulation publishes a handful of named scalars once per tick (speed,
// rpm, gear, axle forces, slip flags) for an external stats consumer. The
// sink is strictly write-only from the core's point of view: the simulation
// must behave identically whether the values are displayed, logged, or
// dropped on the floor.
// ==============================================================================

pub trait TelemetrySink {
    fn record(&mut self, channel: &'static str, value: f32);
}

/// Discards everything.
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn record(&mut self, _channel: &'static str, _value: f32) {}
}

/// Forwards channels to `tracing` at debug level under the `telemetry` target.
pub struct TraceSink;

impl TelemetrySink for TraceSink {
    fn record(&mut self, channel: &'static str, value: f32) {
        tracing::debug!(target: "telemetry", channel, value);
    }
}

/// Snapshot of the values the simulation publishes each tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickTelemetry {
    pub speed: f32,          // m/s
    pub engine_rpm: f32,
    pub gear: usize,
    pub drive_force: f32,      // N
    pub front_lateral: f32,    // N
    pub rear_lateral: f32,     // N
    pub slip_angle_front: f32, // rad
    pub slip_angle_rear: f32,  // rad
    pub front_slipping: bool,
    pub rear_slipping: bool,
}

impl TickTelemetry {
    pub fn emit(&self, sink: &mut dyn TelemetrySink) {
        sink.record("speed", self.speed);
        sink.record("speed_kmh", self.speed * 3.6);
        sink.record("rpm", self.engine_rpm);
        sink.record("gear", self.gear as f32);
        sink.record("drive_force", self.drive_force);
        sink.record("front_lateral", self.front_lateral);
        sink.record("rear_lateral", self.rear_lateral);
        sink.record("slip_angle_front", self.slip_angle_front);
        sink.record("slip_angle_rear", self.slip_angle_rear);
        sink.record("front_slip", if self.front_slipping { 1.0 } else { 0.0 });
        sink.record("rear_slip", if self.rear_slipping { 1.0 } else { 0.0 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct VecSink(Vec<(&'static str, f32)>);

    impl TelemetrySink for VecSink {
        fn record(&mut self, channel: &'static str, value: f32) {
            self.0.push((channel, value));
        }
    }

    #[test]
    fn emits_every_documented_channel() {
        let telemetry = TickTelemetry {
            speed: 10.0,
            engine_rpm: 3000.0,
            gear: 2,
            drive_force: 1500.0,
            front_lateral: -200.0,
            rear_lateral: 150.0,
            slip_angle_front: -0.05,
            slip_angle_rear: 0.02,
            front_slipping: false,
            rear_slipping: true,
        };
        let mut sink = VecSink::default();
        telemetry.emit(&mut sink);

        let names: Vec<_> = sink.0.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "speed",
                "speed_kmh",
                "rpm",
                "gear",
                "drive_force",
                "front_lateral",
                "rear_lateral",
                "slip_angle_front",
                "slip_angle_rear",
                "front_slip",
                "rear_slip",
            ]
        );
        assert_eq!(sink.0[1].1, 36.0);
        assert_eq!(sink.0[10].1, 1.0);
    }
}
