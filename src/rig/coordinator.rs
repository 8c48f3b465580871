//! Render cycle scheduling
//!
//! The coordinator owns the publish timer and the in-flight dispatch
//! cycle. A host (the tick thread, or a test stepping manually) calls
//! [`RenderCoordinator::step`] once per fixed simulation step;
//! everything else follows from that call. One step proceeds as:
//!
//! ```text
//! step(dt)
//!   ├─ warm-up countdown (first second of uptime)
//!   ├─ timer += dt; publish due when timer >= 1/tick_rate_hz
//!   │  (the remainder carries over, the timer is never reset to zero)
//!   ├─ FixedStep boundary: advance the in-flight cycle
//!   ├─ begin a new cycle when idle and publish is due
//!   └─ FrameEnd boundary: advance the in-flight cycle
//! ```
//!
//! The publish-due flag does not stack: intervals elapsing while a
//! cycle is in flight coalesce into one upcoming cycle.

use crate::config::RigConfig;
use crate::core::counters::{CounterSnapshot, DispatchCounters};
use crate::core::sensor::SensorRef;
use crate::error::{Error, Result};
use crate::rig::strategy::{Boundary, DispatchMode, DispatchStrategy, PendingSet, build_strategy};
use log::{debug, error, info, trace};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Delay before the publish timer starts accumulating
pub const WARMUP: Duration = Duration::from_secs(1);

/// Schedules camera render cycles on a fixed simulation tick
pub struct RenderCoordinator {
    sensors: Vec<SensorRef>,
    mode: DispatchMode,
    strategy: Box<dyn DispatchStrategy>,
    counters: Arc<DispatchCounters>,
    /// None when publishing is disabled (tick_rate_hz = 0)
    interval: Option<Duration>,
    warmup_remaining: Duration,
    timer: Duration,
    publish_due: bool,
    in_flight: Option<PendingSet>,
    ticks: u64,
}

impl RenderCoordinator {
    /// Build a coordinator over the given rig.
    ///
    /// Fails when the sensor list is empty or the configuration does
    /// not resolve to a dispatch mode.
    pub fn new(sensors: Vec<SensorRef>, config: &RigConfig) -> Result<Self> {
        if sensors.is_empty() {
            error!("Camera sensor list should have at least one camera to render");
            return Err(Error::EmptyRig);
        }
        config.validate()?;
        let mode = DispatchMode::resolve(config.sequential, config.strategy)?;
        let interval = if config.tick_rate_hz > 0 {
            Some(Duration::from_secs_f64(1.0 / config.tick_rate_hz as f64))
        } else {
            None
        };
        info!(
            "Render dispatch mode: {:?}, publish rate {} Hz, {} cameras",
            mode,
            config.tick_rate_hz,
            sensors.len()
        );
        Ok(Self {
            strategy: build_strategy(mode, config.use_command_buffer),
            sensors,
            mode,
            counters: Arc::new(DispatchCounters::new()),
            interval,
            warmup_remaining: WARMUP,
            timer: Duration::ZERO,
            publish_due: false,
            in_flight: None,
            ticks: 0,
        })
    }

    /// Advance the scheduler by one fixed simulation step
    pub fn step(&mut self, dt: Duration) {
        self.ticks += 1;
        if !self.warmup_remaining.is_zero() {
            self.warmup_remaining = self.warmup_remaining.saturating_sub(dt);
            return;
        }
        if let Some(interval) = self.interval {
            self.timer += dt;
            if self.timer >= interval {
                self.timer -= interval;
                self.publish_due = true;
                self.counters.add_requested(self.sensors.len() as u64);
            }
        }
        self.advance(Boundary::FixedStep);
        if self.in_flight.is_none() && self.publish_due {
            self.publish_due = false;
            self.begin_cycle();
        }
        self.advance(Boundary::FrameEnd);
        trace!("Tick {}: {}", self.ticks, self.counters.snapshot());
    }

    fn begin_cycle(&mut self) {
        debug!("Publishing render cycle ({:?})", self.mode);
        let pending = self.strategy.submit(&self.sensors, &self.counters);
        if pending.is_settled() {
            self.finish_cycle();
        } else {
            self.in_flight = Some(pending);
        }
    }

    fn advance(&mut self, boundary: Boundary) {
        let Some(mut pending) = self.in_flight.take() else {
            return;
        };
        if self
            .strategy
            .join(&mut pending, boundary, &self.sensors, &self.counters)
        {
            self.finish_cycle();
        } else {
            self.in_flight = Some(pending);
        }
    }

    fn finish_cycle(&mut self) {
        self.counters.incr_published();
        debug!("Published. {}", self.counters.snapshot());
    }

    /// Read-only counter snapshot
    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    /// True when no dispatch cycle is in flight and none is due
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none() && !self.publish_due
    }

    /// Steps taken so far, warm-up included
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl fmt::Debug for RenderCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderCoordinator")
            .field("sensor_count", &self.sensors.len())
            .field("mode", &self.mode)
            .field("counters", &self.counters)
            .field("interval", &self.interval)
            .field("warmup_remaining", &self.warmup_remaining)
            .field("timer", &self.timer)
            .field("publish_due", &self.publish_due)
            .field("in_flight", &self.in_flight)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}
