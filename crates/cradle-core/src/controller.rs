//! The content controller: the state machine tying the window engine together.
//!
//! ```text
//! Setup -> Building -> Ready <-> IncrementalUpdate
//!                        |
//!                        v
//!                  Repositioning -> (settle) Building -> Ready
//! ```
//!
//! Only `Setup` and `Building` consult the planner. Crossing batches in
//! `Ready` run the incremental pipeline: filter, shift, allocate, materialize.
//! Resize, pivot, reload and list-size changes rebuild at the committed axis
//! reference; repositioning rebuilds at the scroll-implied one.

use std::ops::Range;

use web_time::Instant;

use crate::allocator::{allocate_content_list, compute_changes, ChangeInput, ContentLists};
use crate::axis::{AxisReference, ReferenceTracker};
use crate::collaborators::{AcquireRequest, IdentityHandle, ItemCache};
use crate::config::{CradleConfig, Orientation, Viewport};
use crate::intersection::{CrossingEvent, FilteredCrossings, IntersectionFilter};
use crate::model::ListParams;
use crate::planner::compute_window;
use crate::scroll::{ScrollDirection, ScrollTracker};
use crate::session::CradleSession;
use crate::shift::{compute_shift, overshoot_rows, quantize_crossings, ShiftInput};
use crate::window::{MaterializeReport, Window, WindowMaterializer};

/// A programmatic scroll write counts as arrived once the host reports an
/// offset this close to it.
const SCROLL_ARRIVAL_TOLERANCE: f32 = 0.5;

/// Lifecycle state of a [`ContentController`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CradleState {
    /// Constructed; no window yet.
    #[default]
    Setup,
    /// A full window is being planned and materialized.
    Building,
    /// The window is in place and tracking scroll.
    Ready,
    /// A crossing batch is being applied.
    IncrementalUpdate,
    /// The window lost the viewport and was torn down; waiting for scroll to settle.
    Repositioning,
}

/// Why a full window is being built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetWindowMode {
    /// Release everything, then rebuild.
    Reload,
    /// Jump to a new position, keeping any overlap.
    Reposition,
    /// Rebuild after the viewport size settled.
    Resize,
    /// Rebuild after the orientation changed.
    Pivot,
}

/// Where the host should place the axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisPlacement {
    /// Scroll-track position of the axis row's leading edge.
    pub track_offset: f32,
    /// Distance from the viewport's leading edge to the axis.
    pub viewport_offset: f32,
}

impl AxisPlacement {
    /// Scroll offset at which the axis sits at `viewport_offset`.
    pub fn scroll_position(&self) -> f32 {
        self.track_offset - self.viewport_offset
    }
}

/// Outcome of one controller operation.
///
/// The host applies `added`, `released`, `scroll_to` and `axis` together
/// before the next paint so position and content never disagree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CradleUpdate {
    pub state: CradleState,
    pub added: Vec<usize>,
    pub released: Vec<usize>,
    /// Absolute scroll offset to write, after a rebuild.
    pub scroll_to: Option<f32>,
    pub axis: Option<AxisPlacement>,
}

impl CradleUpdate {
    fn idle(state: CradleState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    fn with_report(mut self, report: MaterializeReport) -> Self {
        self.added = report.added;
        self.released = report.released;
        self
    }

    /// True when the host has nothing to do.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.released.is_empty()
            && self.scroll_to.is_none()
            && self.axis.is_none()
    }
}

/// Conditions under which incremental updates are skipped.
#[derive(Clone, Copy, Debug, Default)]
struct PauseGates {
    resizing: bool,
    /// Pending programmatic scroll write.
    scroll_write: Option<f32>,
    repositioning: bool,
}

impl PauseGates {
    fn is_paused(&self) -> bool {
        self.resizing || self.scroll_write.is_some() || self.repositioning
    }
}

/// Owns the window and axis reference of one list and drives them from host events.
///
/// Every operation takes the list's [`CradleSession`] by reference and
/// returns a [`CradleUpdate`] describing what the host must apply.
pub struct ContentController {
    config: CradleConfig,
    viewport: Viewport,
    params: ListParams,
    state: CradleState,
    window: Window,
    references: ReferenceTracker,
    scroll: ScrollTracker,
    filter: IntersectionFilter,
    gates: PauseGates,
}

impl ContentController {
    pub fn new(config: CradleConfig, viewport: Viewport) -> Self {
        let params = ListParams::derive(&config, viewport);
        let initial = AxisReference::new(0, params.padding);
        Self {
            filter: IntersectionFilter::new(params.cross_count),
            config,
            viewport,
            params,
            state: CradleState::Setup,
            window: Window::new(),
            references: ReferenceTracker::new(initial),
            scroll: ScrollTracker::new(0.0),
            gates: PauseGates::default(),
        }
    }

    /// Builds the first window at the configured starting index.
    pub fn setup<C: ItemCache>(&mut self, session: &mut CradleSession<C>) -> CradleUpdate {
        log::debug!(
            "setup: {} items, {} per row, starting at {}",
            self.params.list_size,
            self.params.cross_count,
            self.config.starting_index
        );
        let target = AxisReference::new(self.config.starting_index, 0.0);
        self.build(session, target, SetWindowMode::Reload)
    }

    /// Rebuilds the window around `target`.
    pub fn set_window<C: ItemCache>(
        &mut self,
        session: &mut CradleSession<C>,
        target: AxisReference,
        mode: SetWindowMode,
    ) -> CradleUpdate {
        match mode {
            SetWindowMode::Resize | SetWindowMode::Pivot => self.gates.resizing = false,
            SetWindowMode::Reposition | SetWindowMode::Reload => {}
        }
        self.build(session, target, mode)
    }

    /// Brings `index` to the viewport's leading edge.
    pub fn scroll_to_index<C: ItemCache>(
        &mut self,
        session: &mut CradleSession<C>,
        index: usize,
    ) -> CradleUpdate {
        let index = self.params.clamp_index(index).unwrap_or_else(|err| {
            log::debug!("scroll_to_index: {err}");
            err.clamped_index().unwrap_or(0)
        });
        self.set_window(session, AxisReference::new(index, 0.0), SetWindowMode::Reposition)
    }

    /// Records a scroll sample from the host.
    pub fn on_scroll<C: ItemCache>(
        &mut self,
        session: &mut CradleSession<C>,
        offset: f32,
    ) -> CradleUpdate {
        let direction = self.scroll.sample(offset);
        let implied = self.params.reference_from_scroll(offset);
        self.references.set_scroll_implied(implied);
        log::trace!("on_scroll: {offset} {:?} implies axis {}", direction, implied.index);

        if let Some(target) = self.gates.scroll_write {
            if (offset - target).abs() <= SCROLL_ARRIVAL_TOLERANCE {
                log::trace!("on_scroll: scroll write to {target} arrived");
                self.gates.scroll_write = None;
                self.scroll.reset(offset);
            }
            return CradleUpdate::idle(self.state);
        }

        if self.state == CradleState::Ready && !self.gates.resizing && self.window_lost(offset) {
            log::debug!(
                "on_scroll: visible rows {:?} left window {:?}",
                self.params.visible_rows(offset),
                self.window.range()
            );
            return self.enter_repositioning(session);
        }
        CradleUpdate::idle(self.state)
    }

    /// Handles the end of a scroll gesture.
    ///
    /// Repositioning rebuilds at the scroll-implied reference. In `Ready`,
    /// any drift left by missed crossings is caught up.
    pub fn on_scroll_settled<C: ItemCache>(
        &mut self,
        session: &mut CradleSession<C>,
    ) -> CradleUpdate {
        self.scroll.settle();
        if self.gates.scroll_write.take().is_some() {
            self.scroll.reset(self.scroll.offset());
        }
        if self.gates.resizing {
            return CradleUpdate::idle(self.state);
        }

        let implied = self.references.scroll_implied();
        match self.state {
            CradleState::Repositioning => {
                log::debug!("on_scroll_settled: rebuilding at {}", implied.index);
                self.build(session, implied, SetWindowMode::Reposition)
            }
            CradleState::Ready => {
                let ready_row = self.params.row_of(self.references.ready().index) as i64;
                let implied_row = self.params.row_of(implied.index) as i64;
                let direction = ScrollDirection::from_delta((implied_row - ready_row) as f32);
                self.run_pipeline(session, &FilteredCrossings::default(), direction)
            }
            _ => CradleUpdate::idle(self.state),
        }
    }

    /// Applies a batch of crossing notifications.
    pub fn on_crossing_batch<C: ItemCache>(
        &mut self,
        session: &mut CradleSession<C>,
        events: &[CrossingEvent],
        direction: ScrollDirection,
    ) -> CradleUpdate {
        if self.state != CradleState::Ready || self.gates.is_paused() {
            log::trace!(
                "on_crossing_batch: {} events ignored in {:?}",
                events.len(),
                self.state
            );
            return CradleUpdate::idle(self.state);
        }

        let filtered = {
            let lists = allocate_content_list(&self.window, self.references.ready().index);
            self.filter.isolate(events, &lists, direction)
        };
        match filtered {
            Ok(filtered) => self.run_pipeline(session, &filtered, direction),
            Err(err) => {
                log::warn!("on_crossing_batch: {err}; rebuilding");
                session.stats_mut().noise_aborts += 1;
                let implied = self.references.scroll_implied();
                self.build(session, implied, SetWindowMode::Reload)
            }
        }
    }

    /// Direct report from the host that the window is (or is not) in view.
    pub fn on_window_visibility<C: ItemCache>(
        &mut self,
        session: &mut CradleSession<C>,
        visible: bool,
    ) -> CradleUpdate {
        if !visible && self.state == CradleState::Ready && !self.gates.is_paused() {
            log::debug!("on_window_visibility: window left the viewport");
            return self.enter_repositioning(session);
        }
        CradleUpdate::idle(self.state)
    }

    /// Pauses incremental updates until [`finish_resize`](Self::finish_resize).
    pub fn begin_resize(&mut self) {
        log::trace!("begin_resize");
        self.gates.resizing = true;
    }

    /// Applies the settled viewport size and rebuilds at the committed reference.
    pub fn finish_resize<C: ItemCache>(
        &mut self,
        session: &mut CradleSession<C>,
        viewport: Viewport,
    ) -> CradleUpdate {
        self.viewport = viewport;
        self.rederive();
        let target = self.references.ready();
        self.set_window(session, target, SetWindowMode::Resize)
    }

    /// Switches between vertical and horizontal scrolling.
    pub fn set_orientation<C: ItemCache>(
        &mut self,
        session: &mut CradleSession<C>,
        orientation: Orientation,
    ) -> CradleUpdate {
        if orientation == self.config.orientation {
            return CradleUpdate::idle(self.state);
        }
        self.config.orientation = orientation;
        self.rederive();
        let target = self.references.ready();
        self.set_window(session, target, SetWindowMode::Pivot)
    }

    /// Changes the number of items and reloads at the committed reference.
    pub fn set_list_size<C: ItemCache>(
        &mut self,
        session: &mut CradleSession<C>,
        list_size: usize,
    ) -> CradleUpdate {
        self.config.list_size = list_size;
        self.rederive();
        let mut target = self.references.ready();
        if let Err(err) = self.params.clamp_index(target.index) {
            log::debug!("set_list_size: {err}");
            target.index = err.clamped_index().unwrap_or(0);
        }
        self.set_window(session, target, SetWindowMode::Reload)
    }

    /// Attaches a late acquisition result to its placeholder.
    ///
    /// Returns `false` and hands the content back to the cache if the
    /// placeholder is gone.
    pub fn complete_acquisition<C: ItemCache>(
        &mut self,
        session: &mut CradleSession<C>,
        request: AcquireRequest,
        handle: IdentityHandle,
    ) -> bool {
        match self.window.resolve(request, handle) {
            Ok(()) => true,
            Err(err) => {
                log::debug!("complete_acquisition: {err}");
                session.cache_mut().release(request.index, handle);
                session.stats_mut().stale_discarded += 1;
                false
            }
        }
    }

    pub fn state(&self) -> CradleState {
        self.state
    }

    pub fn config(&self) -> &CradleConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn params(&self) -> &ListParams {
        &self.params
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Index range currently materialized.
    pub fn window_range(&self) -> Range<usize> {
        self.window.range()
    }

    /// Index range of rows intersecting the viewport at the last scroll sample.
    pub fn visible_range(&self) -> Range<usize> {
        self.params.visible_index_range(self.scroll.offset())
    }

    /// The window split at the committed axis.
    pub fn content_lists(&self) -> ContentLists<'_> {
        allocate_content_list(&self.window, self.references.ready().index)
    }

    /// The reference the current window was built or shifted to.
    pub fn axis_reference(&self) -> AxisReference {
        self.references.ready()
    }

    pub fn scroll_implied_reference(&self) -> AxisReference {
        self.references.scroll_implied()
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    pub fn scroll_direction(&self) -> ScrollDirection {
        self.scroll.direction()
    }

    /// True between a scroll sample and the next settle.
    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_scrolling()
    }

    /// Estimated target index while repositioning.
    pub fn reposition_index(&self) -> Option<usize> {
        match self.state {
            CradleState::Repositioning => Some(self.references.scroll_implied().index),
            _ => None,
        }
    }

    /// True while incremental updates are being skipped.
    pub fn is_paused(&self) -> bool {
        self.gates.is_paused()
    }

    fn rederive(&mut self) {
        self.params = ListParams::derive(&self.config, self.viewport);
        self.filter = IntersectionFilter::new(self.params.cross_count);
    }

    /// True when no row of the window intersects the viewport at `offset`.
    /// Smaller drift is left to the crossing and overshoot pipeline.
    fn window_lost(&self, offset: f32) -> bool {
        if self.params.list_size == 0 {
            return false;
        }
        if self.window.is_empty() {
            return true;
        }
        let visible = self.params.visible_rows(offset);
        let first_row = self.params.row_of(self.window.start());
        let end_row = self.params.row_of(self.window.end() - 1) + 1;
        visible.start >= end_row || visible.end <= first_row
    }

    fn placement(&self, reference: AxisReference) -> AxisPlacement {
        AxisPlacement {
            track_offset: self.params.row_position(self.params.row_of(reference.index)),
            viewport_offset: reference.offset,
        }
    }

    fn enter_repositioning<C: ItemCache>(&mut self, session: &mut CradleSession<C>) -> CradleUpdate {
        let band = self.window.range();
        let report = WindowMaterializer::new(session, band).teardown(&mut self.window);
        self.references.discard();
        self.state = CradleState::Repositioning;
        self.gates.repositioning = true;
        CradleUpdate::idle(self.state).with_report(report)
    }

    fn build<C: ItemCache>(
        &mut self,
        session: &mut CradleSession<C>,
        target: AxisReference,
        mode: SetWindowMode,
    ) -> CradleUpdate {
        self.state = CradleState::Building;
        let plan = compute_window(target, &self.params);
        let range = plan.index_range();
        log::debug!("build: {:?} at {} -> {:?}", mode, target.index, range);

        let report = {
            let mut materializer = WindowMaterializer::new(session, range.clone());
            let mut report = match mode {
                SetWindowMode::Reload => materializer.teardown(&mut self.window),
                _ => MaterializeReport::default(),
            };
            report.merge(materializer.rebuild(&mut self.window, range));
            report
        };

        let reference = plan.axis_reference();
        self.references.stage(reference);
        self.references.commit();

        let scroll_to = plan.scroll_position();
        if (scroll_to - self.scroll.offset()).abs() > SCROLL_ARRIVAL_TOLERANCE {
            self.gates.scroll_write = Some(scroll_to);
        }
        self.scroll.reset(scroll_to);
        self.references
            .set_scroll_implied(self.params.reference_from_scroll(scroll_to));

        self.gates.repositioning = false;
        self.state = CradleState::Ready;
        session.stats_mut().rebuilds += 1;

        CradleUpdate {
            state: self.state,
            scroll_to: Some(scroll_to),
            axis: Some(self.placement(reference)),
            ..Default::default()
        }
        .with_report(report)
    }

    fn run_pipeline<C: ItemCache>(
        &mut self,
        session: &mut CradleSession<C>,
        crossings: &FilteredCrossings,
        direction: ScrollDirection,
    ) -> CradleUpdate {
        if !direction.is_determined() {
            return CradleUpdate::idle(self.state);
        }
        let started = Instant::now();
        self.state = CradleState::IncrementalUpdate;

        let ready = self.references.ready();
        let ready_row = self.params.row_of(ready.index);
        let live_offset = self.params.row_position(ready_row) - self.scroll.offset();
        let forward = crossings.forward_count();
        let backward = crossings.backward_count();

        let corrected_row = ready_row as i64 + quantize_crossings(&self.params, forward, backward);
        let overshoot = overshoot_rows(&self.params, corrected_row, self.references.scroll_implied());

        let shift = compute_shift(
            &ShiftInput {
                direction,
                forward_crossings: forward,
                backward_crossings: backward,
                overshoot_rows: overshoot,
                cradle_reference_index: self.window.start(),
                axis_reference_index: ready.index,
                axis_viewport_offset: live_offset,
            },
            &self.params,
        );
        if shift.is_noop() {
            self.state = CradleState::Ready;
            return CradleUpdate::idle(self.state);
        }

        if shift.cradle_shift_count.unsigned_abs() as usize >= self.window.len() {
            log::debug!(
                "run_pipeline: shift of {} exceeds window of {}; rebuilding",
                shift.cradle_shift_count,
                self.window.len()
            );
            let implied = self.references.scroll_implied();
            return self.build(session, implied, SetWindowMode::Reposition);
        }

        let changes = compute_changes(
            &ChangeInput {
                cradle_shift_count: shift.cradle_shift_count,
                direction: ScrollDirection::from_delta(shift.cradle_shift_count as f32),
                cradle_reference_index: self.window.start(),
                content_count: self.window.len(),
                axis_reference_index: shift.new_axis_reference_index,
            },
            &self.params,
        );
        let band = shift.new_cradle_reference_index
            ..shift.new_cradle_reference_index + shift.content_count;
        let report = WindowMaterializer::new(session, band).apply(&mut self.window, changes);
        if self.window.start() != shift.new_cradle_reference_index {
            log::warn!(
                "run_pipeline: window starts at {} but shift expected {}",
                self.window.start(),
                shift.new_cradle_reference_index
            );
        }

        let reference = shift.axis_reference();
        self.references.stage(reference);
        self.references.commit();
        self.state = CradleState::Ready;

        let stats = session.stats_mut();
        stats.incremental_updates += 1;
        stats.last_update_duration = started.elapsed();
        log::trace!(
            "run_pipeline: axis {} at {}, window {:?}",
            reference.index,
            reference.offset,
            self.window.range()
        );

        CradleUpdate {
            state: self.state,
            axis: Some(self.placement(reference)),
            ..Default::default()
        }
        .with_report(report)
    }
}
