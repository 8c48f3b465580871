//! Dispatch strategies for camera render cycles
//!
//! A publish cycle renders every camera in the rig once. How the render
//! calls are issued and waited on is the strategy's decision, resolved
//! once at startup from the configured `(sequential, strategy)` pair
//! into a [`DispatchMode`] and a concrete [`DispatchStrategy`].
//!
//! ## Boundaries
//!
//! The scheduler emits two suspension boundaries per step:
//! [`Boundary::FixedStep`] at the start of the next step and
//! [`Boundary::FrameEnd`] at the end of the current one. A wait
//! installed behind a render completes at the next emission of its
//! kind, so sequential strategies pace at most one render per boundary.
//!
//! ## Sequential strategies (cycle spans multiple steps)
//!
//! | id | entry point      | per-camera wait | final camera |
//! |----|------------------|-----------------|--------------|
//! | 0  | blocking render  | frame end       | waited       |
//! | 1  | batched render   | frame end       | waited       |
//! | 2  | blocking render  | fixed step      | not waited   |
//! | 3  | batched render   | fixed step      | not waited   |
//! | 4  | deferred render  | fixed step      | waited       |
//!
//! ## Concurrent strategies (all renders issued in the due step)
//!
//! | id | behavior                                                |
//! |----|---------------------------------------------------------|
//! | 0  | fire-and-forget blocking renders                        |
//! | 1  | fire-and-forget batched renders                         |
//! | 2  | render units collected, never joined                    |
//! | 3  | render units joined one at a time, progress logged      |
//! | 4  | render units joined in aggregate                        |
//! | 5  | reserved                                                |
//! | 6  | renders off-loaded to worker-pool threads, not joined   |
//! | 7  | parallel fan-out across the worker pool, joined in-step |

mod concurrent;
mod sequential;

pub use concurrent::ConcurrentDispatch;
pub use sequential::SequentialDispatch;

use crate::core::counters::DispatchCounters;
use crate::core::sensor::{CameraSensor, SensorRef};
use crate::error::{Error, Result};
use log::{debug, trace, warn};
use std::collections::VecDeque;
use std::sync::Arc;

/// Suspension boundary kinds emitted by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Start of the next simulation step
    FixedStep,
    /// End of the current simulation step
    FrameEnd,
}

/// Sequential strategy variants, ids 0-4
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequentialKind {
    /// 0: blocking render, frame-end wait per camera
    BlockingFrameEnd,
    /// 1: batched render, frame-end wait per camera
    BatchedFrameEnd,
    /// 2: blocking render, fixed-step wait, final camera not waited
    BlockingFixedStep,
    /// 3: batched render, fixed-step wait, final camera not waited
    BatchedFixedStep,
    /// 4: deferred render, fixed-step wait per camera
    DeferredFixedStep,
}

/// Concurrent strategy variants, ids 0-7
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrentKind {
    /// 0: fire-and-forget blocking renders
    FireAndForget,
    /// 1: fire-and-forget batched renders
    FireAndForgetBatched,
    /// 2: render units collected but never joined
    Collected,
    /// 3: render units joined one at a time in order
    JoinEach,
    /// 4: render units joined in aggregate
    JoinAll,
    /// 5: reserved, publishes without dispatching
    Reserved,
    /// 6: renders off-loaded to worker threads, not joined
    WorkerOffload,
    /// 7: parallel fan-out across the worker pool
    ParallelFanOut,
}

/// Startup resolution of the configured dispatch pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Sequential(SequentialKind),
    Concurrent(ConcurrentKind),
}

impl DispatchMode {
    /// Resolve `(sequential, strategy)` config fields into a typed mode.
    ///
    /// Sequential ids above 4 and any id above 7 are configuration
    /// errors. The reserved concurrent id 5 resolves but warns.
    pub fn resolve(sequential: bool, strategy: u8) -> Result<Self> {
        if sequential {
            let kind = match strategy {
                0 => SequentialKind::BlockingFrameEnd,
                1 => SequentialKind::BatchedFrameEnd,
                2 => SequentialKind::BlockingFixedStep,
                3 => SequentialKind::BatchedFixedStep,
                4 => SequentialKind::DeferredFixedStep,
                _ => {
                    return Err(Error::InvalidConfig(format!(
                        "sequential dispatch defines strategies 0-4, got {}",
                        strategy
                    )));
                }
            };
            Ok(DispatchMode::Sequential(kind))
        } else {
            let kind = match strategy {
                0 => ConcurrentKind::FireAndForget,
                1 => ConcurrentKind::FireAndForgetBatched,
                2 => ConcurrentKind::Collected,
                3 => ConcurrentKind::JoinEach,
                4 => ConcurrentKind::JoinAll,
                5 => ConcurrentKind::Reserved,
                6 => ConcurrentKind::WorkerOffload,
                7 => ConcurrentKind::ParallelFanOut,
                _ => {
                    return Err(Error::InvalidConfig(format!(
                        "strategy {} out of range 0-7",
                        strategy
                    )));
                }
            };
            if kind == ConcurrentKind::Reserved {
                warn!("Concurrent strategy 5 is reserved, render cycles will publish without dispatching");
            }
            Ok(DispatchMode::Concurrent(kind))
        }
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self, DispatchMode::Sequential(_))
    }

    /// Numeric id within the family, matching the configuration value
    pub fn strategy_id(&self) -> u8 {
        match self {
            DispatchMode::Sequential(kind) => *kind as u8,
            DispatchMode::Concurrent(kind) => *kind as u8,
        }
    }
}

/// Build the concrete strategy for a resolved mode
pub fn build_strategy(mode: DispatchMode, use_command_buffer: bool) -> Box<dyn DispatchStrategy> {
    match mode {
        DispatchMode::Sequential(kind) => {
            Box::new(SequentialDispatch::new(kind, use_command_buffer))
        }
        DispatchMode::Concurrent(kind) => {
            Box::new(ConcurrentDispatch::new(kind, use_command_buffer))
        }
    }
}

/// One publish cycle's dispatch behavior
///
/// `submit` issues whatever renders begin in the due step and returns
/// the outstanding work; `join` advances that work at each boundary
/// until the cycle settles.
pub trait DispatchStrategy: Send {
    /// Begin one publish cycle over the rig
    fn submit(&mut self, sensors: &[SensorRef], counters: &Arc<DispatchCounters>) -> PendingSet;

    /// Advance outstanding work at a step boundary
    ///
    /// Returns true once the cycle has settled.
    fn join(
        &mut self,
        pending: &mut PendingSet,
        boundary: Boundary,
        sensors: &[SensorRef],
        counters: &Arc<DispatchCounters>,
    ) -> bool;
}

/// How a pending set's units are waited on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPolicy {
    /// Nothing is waited on; the cycle settles at submit
    Detached,
    /// Units complete one at a time in submission order
    EachInOrder,
    /// The cycle completes once every unit has
    All,
}

/// One issued render whose completion the dispatcher observes
#[derive(Debug)]
pub struct RenderUnit {
    /// Index of the camera in the rig list
    sensor: usize,
    state: UnitState,
}

#[derive(Debug, PartialEq, Eq)]
enum UnitState {
    /// Completes at the next emission of this boundary
    AtBoundary(Boundary),
    Complete,
}

impl RenderUnit {
    fn yielded(sensor: usize) -> Self {
        Self {
            sensor,
            state: UnitState::AtBoundary(Boundary::FixedStep),
        }
    }

    fn is_complete(&self) -> bool {
        self.state == UnitState::Complete
    }
}

/// Outstanding work for one publish cycle
#[derive(Debug)]
pub struct PendingSet {
    /// Camera indices not yet rendered, in dispatch order
    queue: VecDeque<usize>,
    /// Wait installed behind the most recently issued render
    wait: Option<Boundary>,
    /// Units issued by concurrent strategies
    units: Vec<RenderUnit>,
    policy: JoinPolicy,
}

impl PendingSet {
    /// A cycle with nothing outstanding
    pub fn settled() -> Self {
        Self {
            queue: VecDeque::new(),
            wait: None,
            units: Vec::new(),
            policy: JoinPolicy::Detached,
        }
    }

    fn sequential(queue: VecDeque<usize>, wait: Boundary) -> Self {
        Self {
            queue,
            wait: Some(wait),
            units: Vec::new(),
            policy: JoinPolicy::Detached,
        }
    }

    fn collected(units: Vec<RenderUnit>, policy: JoinPolicy) -> Self {
        Self {
            queue: VecDeque::new(),
            wait: None,
            units,
            policy,
        }
    }

    /// True when no render or wait remains outstanding
    pub fn is_settled(&self) -> bool {
        if self.queue.is_empty() && self.wait.is_none() {
            match self.policy {
                JoinPolicy::Detached => true,
                JoinPolicy::EachInOrder | JoinPolicy::All => {
                    self.units.iter().all(RenderUnit::is_complete)
                }
            }
        } else {
            false
        }
    }

    /// Number of units still outstanding under a joining policy
    pub fn outstanding(&self) -> usize {
        self.queue.len() + self.units.iter().filter(|u| !u.is_complete()).count()
    }
}

/// Render entry point selection for one issued call
#[derive(Debug, Clone, Copy)]
pub(crate) enum RenderEntry {
    Blocking,
    Batched(bool),
    Deferred,
}

/// Issue one render call, skipping inactive cameras.
///
/// Returns false when the camera was inactive and nothing was issued.
/// The rendered counter tracks completions the dispatch path observes,
/// so deferred renders bump only the request counter here.
pub(crate) fn dispatch_render(
    sensor: &dyn CameraSensor,
    entry: RenderEntry,
    counters: &DispatchCounters,
) -> bool {
    if !sensor.is_active() {
        trace!("Camera {} inactive, skipping render", sensor.name());
        return false;
    }
    counters.incr_render_requested();
    match entry {
        RenderEntry::Blocking => {
            sensor.render();
            counters.incr_rendered();
            debug!("Completed render for camera {}", sensor.name());
        }
        RenderEntry::Batched(use_command_buffer) => {
            counters.incr_shade_requested();
            sensor.render_batched(use_command_buffer);
            counters.incr_shaded();
            counters.incr_rendered();
            debug!("Completed batched render for camera {}", sensor.name());
        }
        RenderEntry::Deferred => {
            sensor.render_deferred();
            debug!("Dispatched deferred render for camera {}", sensor.name());
        }
    }
    true
}
