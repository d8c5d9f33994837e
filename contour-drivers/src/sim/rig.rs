//! Simulated rig state and physics
//!
//! Positions are tracked in millidegrees so any speed integrates exactly
//! over a tick. X and Y trigger their boundary sensor at a marker
//! position. Z touches a surface whose depth depends on the X/Y position
//! and cannot travel past it.

use core::cell::RefCell;

use contour_core::config::ScanConfig;
use contour_core::motion::AxisId;
use contour_core::scan::Axes;
use contour_core::traits::{AxisAdapter, AxisError};

use super::parts::{SimAxis, SimBoundary, SimDelay, SimEStop, SimMotor, SimTilt};

/// Physics step (ms)
pub const TICK_MS: u32 = 10;

/// Surface depth below the probe at an X/Y position, `None` for a hole
pub type Surface = fn(x: i32, y: i32) -> Option<i32>;

#[derive(Debug, Clone, Copy, Default)]
struct MotorState {
    position_mdeg: i64,
    /// Continuous speed (deg/s)
    velocity: i32,
    /// Relative move in progress
    target_mdeg: Option<i64>,
    /// Relative move speed (deg/s)
    speed: u16,
}

/// Progress of a relative move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MoveStatus {
    Moving,
    Done,
    Cancelled,
}

struct RigState {
    motors: [MotorState; 3],
    x_marker: i32,
    y_marker: i32,
    surface: Surface,
    clock_ms: u32,
    tilt_fault: Option<(u32, i16)>,
    halted: bool,
    relative_moves: [u32; 3],
    commands_after_halt: u32,
}

impl RigState {
    fn degrees(&self, id: AxisId) -> i32 {
        (self.motors[id.index()].position_mdeg / 1000) as i32
    }

    fn surface_depth(&self) -> Option<i32> {
        (self.surface)(self.degrees(AxisId::X), self.degrees(AxisId::Y))
    }

    fn step(&mut self, dt_ms: u32) {
        self.clock_ms = self.clock_ms.saturating_add(dt_ms);
        if self.halted {
            return;
        }

        let dt = i64::from(dt_ms);
        for id in AxisId::ALL {
            let before = self.motors[id.index()].position_mdeg;
            let motor = &mut self.motors[id.index()];
            let mut after = match motor.target_mdeg {
                Some(target) => {
                    let max = i64::from(motor.speed) * dt;
                    before + (target - before).clamp(-max, max)
                }
                None => before + i64::from(motor.velocity) * dt,
            };

            if id == AxisId::Z && after > before {
                if let Some(depth) = self.surface_depth() {
                    let depth_mdeg = i64::from(depth) * 1000;
                    if after > depth_mdeg {
                        after = before.max(depth_mdeg);
                    }
                }
            }
            self.motors[id.index()].position_mdeg = after;
        }
    }
}

/// Simulated three-axis rig shared by all simulated parts
pub struct SimRig {
    state: RefCell<RigState>,
}

impl SimRig {
    /// Create a rig with all axes at the operator's reference position
    ///
    /// `x_marker` and `y_marker` are the positions (degrees) where the X
    /// and Y boundary sensors trigger.
    pub fn new(x_marker: i32, y_marker: i32, surface: Surface) -> Self {
        Self {
            state: RefCell::new(RigState {
                motors: [MotorState::default(); 3],
                x_marker,
                y_marker,
                surface,
                clock_ms: 0,
                tilt_fault: None,
                halted: false,
                relative_moves: [0; 3],
                commands_after_halt: 0,
            }),
        }
    }

    /// Tip the rig to `pitch` once the clock reaches `at_ms`
    pub fn with_tilt_fault(self, at_ms: u32, pitch: i16) -> Self {
        self.state.borrow_mut().tilt_fault = Some((at_ms, pitch));
        self
    }

    /// Advance simulated time
    pub fn advance(&self, ms: u32) {
        let mut state = self.state.borrow_mut();
        let mut remaining = ms;
        while remaining > 0 {
            let dt = remaining.min(TICK_MS);
            state.step(dt);
            remaining -= dt;
        }
    }

    /// Simulated time since start (ms)
    pub fn clock_ms(&self) -> u32 {
        self.state.borrow().clock_ms
    }

    /// Axis position (whole degrees)
    pub fn position(&self, id: AxisId) -> i32 {
        self.state.borrow().degrees(id)
    }

    pub(crate) fn position_mdeg(&self, id: AxisId) -> i64 {
        self.state.borrow().motors[id.index()].position_mdeg
    }

    /// Check if the emergency stop fired
    pub fn halted(&self) -> bool {
        self.state.borrow().halted
    }

    /// Relative moves commanded on an axis
    pub fn relative_moves(&self, id: AxisId) -> u32 {
        self.state.borrow().relative_moves[id.index()]
    }

    /// Motion commands received after the emergency stop
    pub fn commands_after_halt(&self) -> u32 {
        self.state.borrow().commands_after_halt
    }

    /// Current pitch (tenths of a degree)
    pub fn pitch(&self) -> i16 {
        let state = self.state.borrow();
        match state.tilt_fault {
            Some((at_ms, pitch)) if state.clock_ms >= at_ms => pitch,
            _ => 0,
        }
    }

    /// Sample an axis boundary sensor
    pub fn boundary_triggered(&self, id: AxisId) -> bool {
        let state = self.state.borrow();
        match id {
            AxisId::X => state.degrees(AxisId::X) >= state.x_marker,
            AxisId::Y => state.degrees(AxisId::Y) >= state.y_marker,
            AxisId::Z => {
                let position_mdeg = state.motors[id.index()].position_mdeg;
                state
                    .surface_depth()
                    .is_some_and(|depth| position_mdeg >= i64::from(depth) * 1000)
            }
        }
    }

    /// Stop every motor and ignore further commands
    pub fn halt(&self) {
        let mut state = self.state.borrow_mut();
        if !state.halted {
            warn!("Simulated rig halted at {} ms", state.clock_ms);
        }
        state.halted = true;
        for motor in state.motors.iter_mut() {
            motor.velocity = 0;
            motor.target_mdeg = None;
        }
    }

    pub(crate) fn run_continuous(&self, id: AxisId, speed: i32) {
        let mut state = self.state.borrow_mut();
        if state.halted {
            state.commands_after_halt += 1;
            return;
        }
        let motor = &mut state.motors[id.index()];
        motor.target_mdeg = None;
        motor.velocity = speed;
    }

    pub(crate) fn begin_relative(
        &self,
        id: AxisId,
        degrees: i32,
        speed: u16,
    ) -> Result<(), AxisError> {
        let mut state = self.state.borrow_mut();
        state.relative_moves[id.index()] += 1;
        if state.halted {
            state.commands_after_halt += 1;
            return Err(AxisError::Halted);
        }
        let motor = &mut state.motors[id.index()];
        motor.velocity = 0;
        motor.speed = speed;
        motor.target_mdeg = Some(motor.position_mdeg + i64::from(degrees) * 1000);
        Ok(())
    }

    pub(crate) fn relative_status(&self, id: AxisId) -> MoveStatus {
        let mut state = self.state.borrow_mut();
        let motor = &mut state.motors[id.index()];
        match motor.target_mdeg {
            Some(target) if target == motor.position_mdeg => {
                motor.target_mdeg = None;
                MoveStatus::Done
            }
            Some(_) => MoveStatus::Moving,
            None => MoveStatus::Cancelled,
        }
    }

    pub(crate) fn stop(&self, id: AxisId) {
        let mut state = self.state.borrow_mut();
        let motor = &mut state.motors[id.index()];
        motor.velocity = 0;
        motor.target_mdeg = None;
    }

    pub(crate) fn zero(&self, id: AxisId) {
        self.state.borrow_mut().motors[id.index()].position_mdeg = 0;
    }

    /// Motor handle for one axis
    pub fn motor(&self, id: AxisId) -> SimMotor<'_> {
        SimMotor::new(self, id)
    }

    /// Boundary sensor handle for one axis
    pub fn boundary(&self, id: AxisId) -> SimBoundary<'_> {
        SimBoundary::new(self, id)
    }

    pub fn tilt(&self) -> SimTilt<'_> {
        SimTilt::new(self)
    }

    pub fn estop(&self) -> SimEStop<'_> {
        SimEStop::new(self)
    }

    /// Delay for the scan sequence: advances simulated time
    pub fn delay(&self) -> SimDelay<'_> {
        SimDelay::driving(self)
    }

    /// Delay for the watchers: yields without advancing time
    pub fn watcher_delay(&self) -> SimDelay<'_> {
        SimDelay::passive(self)
    }

    /// Axis drivers for all three axes, bound to their configuration
    pub fn axes(&self, config: &ScanConfig) -> Axes<SimAxis<'_>, SimAxis<'_>, SimAxis<'_>> {
        let axis = |id| AxisAdapter::new(self.motor(id), self.boundary(id));
        Axes::new(axis(AxisId::X), axis(AxisId::Y), axis(AxisId::Z), config)
    }
}
