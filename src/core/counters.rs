//! Dispatch diagnostics
//!
//! Six monotonic counters owned by the coordinator and bumped only from
//! its dispatch path. Worker threads of the parallel strategies share
//! the struct through an `Arc`, so every counter is atomic. Counters are
//! diagnostic only; no scheduling decision reads them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running dispatch counters for one coordinator instance
#[derive(Debug, Default)]
pub struct DispatchCounters {
    /// Renders requested by the publish timer (sensor count per due tick)
    requested: AtomicU64,
    /// Render calls issued to active sensors
    render_requested: AtomicU64,
    /// Render calls completed
    rendered: AtomicU64,
    /// Command-buffer renders issued
    shade_requested: AtomicU64,
    /// Command-buffer renders completed
    shaded: AtomicU64,
    /// Publish cycles completed
    published: AtomicU64,
}

impl DispatchCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_requested(&self, count: u64) {
        self.requested.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn incr_render_requested(&self) {
        self.render_requested.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn incr_rendered(&self) {
        self.rendered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn incr_shade_requested(&self) {
        self.shade_requested.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn incr_shaded(&self) {
        self.shaded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn incr_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    /// Consistent point-in-time copy for logging and assertions
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            requested: self.requested.load(Ordering::Relaxed),
            render_requested: self.render_requested.load(Ordering::Relaxed),
            rendered: self.rendered.load(Ordering::Relaxed),
            shade_requested: self.shade_requested.load(Ordering::Relaxed),
            shaded: self.shaded.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`DispatchCounters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    pub requested: u64,
    pub render_requested: u64,
    pub rendered: u64,
    pub shade_requested: u64,
    pub shaded: u64,
    pub published: u64,
}

impl fmt::Display for CounterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Requested={} RenderRequested={} Rendered={} ShadeRequested={} Shaded={} Published={}",
            self.requested,
            self.render_requested,
            self.rendered,
            self.shade_requested,
            self.shaded,
            self.published
        )
    }
}
