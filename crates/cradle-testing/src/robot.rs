//! Simulated host scroll container.
//!
//! [`ScrollRobot`] plays the host's part: it owns the controller and its
//! session, feeds scroll samples, applies every [`CradleUpdate`] it gets back
//! and stands in for the visibility tracker. Crossing batches are derived from
//! geometry the way a real tracker would produce them, including the initial
//! report for every newly observed placeholder. The tracker uses the list's
//! `intersection_threshold`: an item reports `intersecting` once more than
//! that fraction of its cell has passed the viewport's leading edge, and the
//! fraction is sent as the event's ratio.
//!
//! # Example
//!
//! ```
//! use cradle_testing::prelude::*;
//!
//! let config = CradleConfig {
//!     list_size: 100,
//!     runway_rows: 2,
//!     ..Default::default()
//! };
//! let mut robot = ScrollRobot::new(config, Viewport::new(400.0, 300.0), RecordingCache::immediate());
//! robot.scroll_by(250.0);
//!
//! assert_eq!(robot.controller().window_range(), 4..32);
//! assert_window_invariants(robot.controller(), "after scroll");
//! ```

use cradle_core::collections::map::HashMap;
use cradle_core::{
    AcquireRequest, ContentController, CradleConfig, CradleSession, CradleStats, CradleUpdate,
    CrossingEvent, Orientation, ScrollDirection, Viewport,
};

use crate::cache::RecordingCache;

/// Observation passes per scroll sample before the robot gives up.
const MAX_OBSERVATION_PASSES: usize = 8;

/// Outcome of [`ScrollRobot::resolve_pending`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub accepted: usize,
    pub stale: usize,
}

pub struct ScrollRobot {
    controller: ContentController,
    session: CradleSession<RecordingCache>,
    offset: f32,
    /// Last state the tracker reported per observed index.
    reported: HashMap<usize, bool>,
    clock: f64,
    updates: Vec<CradleUpdate>,
    batches: Vec<Vec<CrossingEvent>>,
}

impl ScrollRobot {
    /// Sets up the list and delivers the tracker's initial observations.
    pub fn new(config: CradleConfig, viewport: Viewport, cache: RecordingCache) -> Self {
        let mut robot = Self {
            controller: ContentController::new(config, viewport),
            session: CradleSession::new(cache),
            offset: 0.0,
            reported: HashMap::default(),
            clock: 0.0,
            updates: Vec::new(),
            batches: Vec::new(),
        };
        let update = robot.controller.setup(&mut robot.session);
        robot.apply(update);
        robot.observe();
        robot
    }

    pub fn controller(&self) -> &ContentController {
        &self.controller
    }

    pub fn session(&self) -> &CradleSession<RecordingCache> {
        &self.session
    }

    pub fn cache(&self) -> &RecordingCache {
        self.session.cache()
    }

    pub fn cache_mut(&mut self) -> &mut RecordingCache {
        self.session.cache_mut()
    }

    pub fn stats(&self) -> &CradleStats {
        self.session.stats()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Every update the controller returned, oldest first.
    pub fn updates(&self) -> &[CradleUpdate] {
        &self.updates
    }

    pub fn last_update(&self) -> Option<&CradleUpdate> {
        self.updates.last()
    }

    /// Every crossing batch handed to the controller, oldest first.
    pub fn batches(&self) -> &[Vec<CrossingEvent>] {
        &self.batches
    }

    /// Scrolls to `offset` (clamped to the track) and lets the tracker report.
    pub fn scroll_to(&mut self, offset: f32) {
        self.move_to(offset);
        self.observe();
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_to(self.offset + delta);
    }

    /// Scrolls `distance` in steps of at most `step`, reporting after each one.
    pub fn fling(&mut self, distance: f32, step: f32) {
        let step = step.abs().max(1.0);
        let mut remaining = distance;
        while remaining.abs() > f32::EPSILON {
            let delta = remaining.clamp(-step, step);
            let before = self.offset;
            self.scroll_by(delta);
            if self.offset == before {
                break;
            }
            remaining -= delta;
        }
    }

    /// Scrolls without the tracker noticing, as when scrolling outruns it.
    pub fn jump_silently(&mut self, offset: f32) {
        self.move_to(offset);
    }

    /// Ends the gesture and lets the tracker report on the result.
    pub fn settle(&mut self) {
        let update = self.controller.on_scroll_settled(&mut self.session);
        self.apply(update);
        self.observe();
    }

    /// Delivers a hand-made batch in the current scroll direction.
    pub fn deliver(&mut self, events: &[CrossingEvent]) {
        for event in events {
            self.reported.insert(event.index, event.intersecting);
        }
        self.batches.push(events.to_vec());
        let direction = self.controller.scroll_direction();
        let update = self
            .controller
            .on_crossing_batch(&mut self.session, events, direction);
        self.apply(update);
    }

    /// Builds an event stamped with the robot's clock.
    pub fn event(&mut self, index: usize, intersecting: bool) -> CrossingEvent {
        let ratio = if intersecting { 1.0 } else { 0.0 };
        self.stamp(index, intersecting, ratio)
    }

    fn stamp(&mut self, index: usize, intersecting: bool, ratio: f32) -> CrossingEvent {
        self.clock += 1.0;
        CrossingEvent::new(index, intersecting, ratio, self.clock)
    }

    pub fn scroll_to_index(&mut self, index: usize) {
        let update = self.controller.scroll_to_index(&mut self.session, index);
        self.apply(update);
        self.observe();
    }

    /// Resizes in two phases, with `during` run while the gate is up.
    pub fn resize(&mut self, viewport: Viewport, during: impl FnOnce(&mut Self)) {
        self.controller.begin_resize();
        during(self);
        let update = self.controller.finish_resize(&mut self.session, viewport);
        self.apply(update);
        self.observe();
    }

    pub fn set_list_size(&mut self, list_size: usize) {
        let update = self.controller.set_list_size(&mut self.session, list_size);
        self.apply(update);
        self.observe();
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        let update = self.controller.set_orientation(&mut self.session, orientation);
        self.apply(update);
        self.observe();
    }

    /// Resolves every deferred acquisition, oldest first.
    pub fn resolve_pending(&mut self) -> ResolveReport {
        let requests: Vec<AcquireRequest> = self.session.cache_mut().take_pending();
        let mut report = ResolveReport::default();
        for request in requests {
            let handle = self.session.cache_mut().resolve(request);
            if self
                .controller
                .complete_acquisition(&mut self.session, request, handle)
            {
                report.accepted += 1;
            } else {
                report.stale += 1;
            }
        }
        report
    }

    fn move_to(&mut self, offset: f32) {
        let max = self.controller.params().max_scroll_offset();
        self.offset = offset.clamp(0.0, max);
        let update = self.controller.on_scroll(&mut self.session, self.offset);
        self.apply(update);
    }

    /// Applies the host side of an update: the scroll write and forgetting
    /// released placeholders.
    fn apply(&mut self, update: CradleUpdate) {
        for index in &update.released {
            self.reported.remove(index);
        }
        let scroll_to = update.scroll_to;
        if !update.is_empty() {
            self.updates.push(update);
        }
        if let Some(offset) = scroll_to {
            self.offset = offset;
            let arrived = self.controller.on_scroll(&mut self.session, offset);
            if !arrived.is_empty() {
                self.updates.push(arrived);
            }
        }
    }

    /// Reports placeholders whose state changed or that were never reported,
    /// until the tracker has nothing new to say.
    fn observe(&mut self) {
        let threshold = self
            .controller
            .config()
            .intersection_threshold
            .clamp(0.0, 1.0);
        for _ in 0..MAX_OBSERVATION_PASSES {
            let params = *self.controller.params();
            let window = self.controller.window_range();
            self.reported.retain(|index, _| window.contains(index));

            let mut events = Vec::new();
            for index in window {
                let leading = params.row_position(params.row_of(index));
                let passed = ((self.offset - leading) / params.cell_length).clamp(0.0, 1.0);
                let intersecting = passed > threshold;
                if self.reported.get(&index) != Some(&intersecting) {
                    self.reported.insert(index, intersecting);
                    events.push(self.stamp(index, intersecting, passed));
                }
            }
            if events.is_empty() {
                return;
            }

            let direction: ScrollDirection = self.controller.scroll_direction();
            log::trace!("robot: {} events at {} {:?}", events.len(), self.offset, direction);
            let update = self
                .controller
                .on_crossing_batch(&mut self.session, &events, direction);
            self.batches.push(events);
            self.apply(update);
        }
        log::warn!("robot: observations did not settle at offset {}", self.offset);
    }
}
