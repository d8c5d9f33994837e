//! Simulated parts
//!
//! Thin handles onto a shared [`SimRig`]. Each implements the matching
//! core trait, so the scan runs against the simulation exactly as it
//! would against hardware.

use contour_core::motion::AxisId;
use contour_core::traits::{
    AxisAdapter, AxisError, AxisMotor, DigitalSensor, EmergencyStop, TiltSensor,
};
use embassy_futures::yield_now;
use embedded_hal_async::delay::DelayNs;

use super::rig::{MoveStatus, SimRig, TICK_MS};

/// Axis driver built from simulated parts
pub type SimAxis<'a> = AxisAdapter<SimMotor<'a>, SimBoundary<'a>>;

/// Simulated axis motor
pub struct SimMotor<'a> {
    rig: &'a SimRig,
    id: AxisId,
}

impl<'a> SimMotor<'a> {
    pub fn new(rig: &'a SimRig, id: AxisId) -> Self {
        Self { rig, id }
    }
}

impl AxisMotor for SimMotor<'_> {
    fn run_continuous(&mut self, speed: i32) {
        self.rig.run_continuous(self.id, speed);
    }

    async fn run_relative(&mut self, degrees: i32, speed: u16) -> Result<(), AxisError> {
        self.rig.begin_relative(self.id, degrees, speed)?;

        loop {
            match self.rig.relative_status(self.id) {
                MoveStatus::Done => return Ok(()),
                MoveStatus::Cancelled => return Err(AxisError::Halted),
                MoveStatus::Moving => {}
            }

            let before = self.rig.position_mdeg(self.id);
            self.rig.advance(TICK_MS);
            if self.rig.position_mdeg(self.id) == before
                && self.rig.relative_status(self.id) == MoveStatus::Moving
            {
                self.rig.stop(self.id);
                warn!("Simulated {} motor stalled", self.id.name());
                return Err(AxisError::Stalled);
            }
            yield_now().await;
        }
    }

    fn stop(&mut self) {
        self.rig.stop(self.id);
    }

    fn position(&self) -> i32 {
        self.rig.position(self.id)
    }

    fn zero_position(&mut self) {
        self.rig.zero(self.id);
    }
}

/// Simulated boundary sensor
pub struct SimBoundary<'a> {
    rig: &'a SimRig,
    id: AxisId,
}

impl<'a> SimBoundary<'a> {
    pub fn new(rig: &'a SimRig, id: AxisId) -> Self {
        Self { rig, id }
    }
}

impl DigitalSensor for SimBoundary<'_> {
    fn triggered(&mut self) -> bool {
        self.rig.boundary_triggered(self.id)
    }
}

/// Simulated tilt sensor
pub struct SimTilt<'a> {
    rig: &'a SimRig,
}

impl<'a> SimTilt<'a> {
    pub fn new(rig: &'a SimRig) -> Self {
        Self { rig }
    }
}

impl TiltSensor for SimTilt<'_> {
    fn pitch(&mut self) -> i16 {
        self.rig.pitch()
    }
}

/// Simulated emergency stop line
pub struct SimEStop<'a> {
    rig: &'a SimRig,
}

impl<'a> SimEStop<'a> {
    pub fn new(rig: &'a SimRig) -> Self {
        Self { rig }
    }
}

impl EmergencyStop for SimEStop<'_> {
    fn stop_all(&mut self) {
        self.rig.halt();
    }
}

/// Simulated delay
///
/// Only the scan sequence's delay drives the physics. The watchers run
/// on the same clock and just yield, so time is never counted twice.
pub struct SimDelay<'a> {
    rig: &'a SimRig,
    drives_physics: bool,
}

impl<'a> SimDelay<'a> {
    pub fn driving(rig: &'a SimRig) -> Self {
        Self {
            rig,
            drives_physics: true,
        }
    }

    pub fn passive(rig: &'a SimRig) -> Self {
        Self {
            rig,
            drives_physics: false,
        }
    }
}

impl DelayNs for SimDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        if self.drives_physics {
            self.rig.advance(ns / 1_000_000);
        }
        yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        if self.drives_physics {
            self.rig.advance(ms);
        }
        yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    fn flat(_x: i32, _y: i32) -> Option<i32> {
        Some(50)
    }

    #[test]
    fn test_relative_move_completes() {
        let rig = SimRig::new(100, 100, flat);
        let mut motor = rig.motor(AxisId::X);

        assert_eq!(block_on(motor.run_relative(25, 300)), Ok(()));
        assert_eq!(motor.position(), 25);
        assert_eq!(block_on(motor.run_relative(-25, 600)), Ok(()));
        assert_eq!(motor.position(), 0);
        assert_eq!(rig.relative_moves(AxisId::X), 2);
    }

    #[test]
    fn test_move_into_surface_stalls() {
        let rig = SimRig::new(100, 100, flat);
        let mut motor = rig.motor(AxisId::Z);

        assert_eq!(block_on(motor.run_relative(80, 200)), Err(AxisError::Stalled));
        assert_eq!(motor.position(), 50);
    }

    #[test]
    fn test_zero_speed_stalls() {
        let rig = SimRig::new(100, 100, flat);
        let mut motor = rig.motor(AxisId::Y);

        assert_eq!(block_on(motor.run_relative(10, 0)), Err(AxisError::Stalled));
    }

    #[test]
    fn test_halted_rig_refuses_moves() {
        let rig = SimRig::new(100, 100, flat);
        rig.estop().stop_all();
        let mut motor = rig.motor(AxisId::X);

        assert_eq!(block_on(motor.run_relative(10, 300)), Err(AxisError::Halted));
        assert_eq!(rig.commands_after_halt(), 1);
    }

    #[test]
    fn test_only_driving_delay_advances_time() {
        let rig = SimRig::new(100, 100, flat);

        block_on(rig.watcher_delay().delay_ms(50));
        assert_eq!(rig.clock_ms(), 0);

        block_on(rig.delay().delay_ms(50));
        assert_eq!(rig.clock_ms(), 50);
    }

    #[test]
    fn test_boundary_and_tilt_handles() {
        let rig = SimRig::new(0, 100, flat).with_tilt_fault(0, -120);

        assert!(rig.boundary(AxisId::X).triggered());
        assert!(!rig.boundary(AxisId::Y).triggered());
        assert_eq!(rig.tilt().pitch(), -120);
    }
}
