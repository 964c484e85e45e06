//! Robot-driven scroll scenarios.

use cradle_testing::prelude::*;

fn grid(list_size: usize) -> CradleConfig {
    CradleConfig {
        list_size,
        runway_rows: 2,
        ..Default::default()
    }
}

fn robot(list_size: usize) -> ScrollRobot {
    ScrollRobot::new(
        grid(list_size),
        Viewport::new(400.0, 300.0),
        RecordingCache::immediate(),
    )
}

#[test]
fn sweep_to_end_and_back_preserves_identity() {
    let mut robot = robot(97);
    assert_eq!(robot.controller().window_range(), 0..28);

    let max = robot.controller().params().max_scroll_offset();
    while robot.offset() < max {
        let before = robot.controller().window().items().to_vec();
        robot.scroll_by(37.0);
        assert_window_invariants(robot.controller(), "forward");
        assert_identity_preserved(&before, robot.controller().window(), "forward");
    }
    assert_eq!(robot.controller().window_range(), 72..97);
    assert_eq!(robot.controller().axis_reference().index, 88);

    while robot.offset() > 0.0 {
        let before = robot.controller().window().items().to_vec();
        robot.scroll_by(-37.0);
        assert_window_invariants(robot.controller(), "backward");
        assert_identity_preserved(&before, robot.controller().window(), "backward");
    }
    assert_eq!(robot.controller().window_range(), 0..28);
    assert_eq!(robot.controller().axis_reference(), AxisReference::new(0, 0.0));

    assert_eq!(robot.stats().rebuilds, 1);
    assert_eq!(robot.stats().noise_aborts, 0);
    assert_eq!(robot.cache().live_count(), 28);
    assert_eq!(robot.cache().unknown_releases(), 0);
    assert!(robot.cache().reattached_count() > 0);
}

#[test]
fn window_never_reaches_past_partial_last_row() {
    let mut robot = robot(97);
    robot.scroll_to_index(96);

    let window = robot.controller().window();
    assert_eq!(window.range(), 72..97);
    assert_eq!(window.get(96).map(|item| item.index), Some(96));
    assert!(window.indices().all(|index| index < 97));
    assert_eq!(robot.offset(), 2200.0);
    assert_window_invariants(robot.controller(), "end of list");
}

#[test]
fn silent_jump_repositions_then_rebuilds_on_settle() {
    let mut robot = robot(100);

    robot.jump_silently(1500.0);
    assert_eq!(robot.controller().state(), CradleState::Repositioning);
    assert_eq!(robot.controller().reposition_index(), Some(60));
    assert!(robot.controller().window().is_empty());
    assert_eq!(robot.cache().live_count(), 0);

    robot.settle();
    assert_eq!(robot.controller().state(), CradleState::Ready);
    assert_eq!(robot.controller().window_range(), 52..80);
    assert_eq!(robot.controller().axis_reference(), AxisReference::new(60, 0.0));
    assert_eq!(robot.stats().rebuilds, 2);
    assert_window_invariants(robot.controller(), "after reposition");

    robot.fling(-600.0, 45.0);
    assert_window_invariants(robot.controller(), "after fling back");
    assert_eq!(robot.stats().rebuilds, 2);
}

#[test]
fn overshoot_catches_up_with_scroll() {
    let mut robot = robot(100);

    robot.jump_silently(450.0);
    assert_eq!(robot.controller().state(), CradleState::Ready);

    // Only the first row's crossing made it through.
    let events: Vec<CrossingEvent> = (0..4).map(|index| robot.event(index, true)).collect();
    robot.deliver(&events);

    assert_eq!(robot.controller().axis_reference(), AxisReference::new(20, 50.0));
    assert_eq!(robot.controller().window_range(), 12..40);

    robot.settle();
    assert_eq!(robot.controller().window_range(), 12..40);
    assert_window_invariants(robot.controller(), "after overshoot");
}

#[test]
fn observer_noise_rebuilds_from_scroll_position() {
    let mut robot = robot(100);
    robot.scroll_to(40.0);
    let reattached = robot.cache().reattached_count();

    let noise = [robot.event(90, true)];
    robot.deliver(&noise);

    assert_eq!(robot.stats().noise_aborts, 1);
    assert_eq!(robot.stats().rebuilds, 2);
    assert_eq!(robot.controller().window_range(), 0..28);
    assert_eq!(robot.controller().axis_reference(), AxisReference::new(4, 60.0));

    let update = robot.last_update().cloned().unwrap();
    assert_eq!(update.released.len(), 28);
    assert_eq!(update.added.len(), 28);
    assert_eq!(robot.cache().reattached_count(), reattached + 28);
    assert_window_invariants(robot.controller(), "after noise");
}

#[test]
fn duplicate_events_cancel_out() {
    let mut robot = robot(100);
    robot.jump_silently(50.0);

    let mut events = Vec::new();
    for index in 0..4 {
        events.push(robot.event(index, true));
        events.push(robot.event(index, false));
    }
    robot.deliver(&events);
    assert_eq!(robot.controller().axis_reference(), AxisReference::new(0, 0.0));
    assert_eq!(robot.stats().incremental_updates, 0);

    let events: Vec<CrossingEvent> = (0..4).map(|index| robot.event(index, true)).collect();
    robot.deliver(&events);
    assert_eq!(robot.controller().axis_reference(), AxisReference::new(4, 50.0));
    assert_eq!(robot.stats().incremental_updates, 1);
}

#[test]
fn deferred_acquisitions_discard_stale_results() {
    let mut robot = ScrollRobot::new(
        grid(100),
        Viewport::new(400.0, 300.0),
        RecordingCache::deferred(),
    );
    assert_eq!(robot.cache().pending().len(), 28);

    robot.scroll_by(250.0);
    assert_eq!(robot.controller().window_range(), 4..32);

    let report = robot.resolve_pending();
    assert_eq!(report, ResolveReport { accepted: 28, stale: 4 });
    assert_all_resolved(robot.controller().window(), "after resolve");
    assert_eq!(robot.stats().stale_discarded, 4);
    assert_eq!(robot.cache().live_count(), 28);
    assert_eq!(robot.cache().detached_count(), 4);
}

#[test]
fn scrolled_away_content_is_reattached() {
    let mut robot = robot(100);

    robot.scroll_by(250.0);
    assert_eq!(robot.controller().window_range(), 4..32);
    assert_eq!(robot.cache().detached_count(), 4);

    robot.scroll_by(-250.0);
    assert_eq!(robot.controller().window_range(), 0..28);
    assert_eq!(robot.controller().axis_reference(), AxisReference::new(0, 0.0));
    assert_eq!(robot.cache().reattached_count(), 4);
    assert_eq!(robot.cache().acquired().len(), 36);
}

#[test]
fn resize_ignores_scroll_until_settled() {
    let mut robot = robot(200);
    robot.fling(1000.0, 90.0);
    assert_eq!(robot.offset(), 1000.0);
    assert_eq!(robot.controller().axis_reference().index, 40);

    robot.resize(Viewport::new(200.0, 300.0), |robot| {
        let before = robot.controller().window_range();
        robot.scroll_by(30.0);
        assert!(robot.controller().is_paused());
        assert_eq!(robot.controller().window_range(), before);
    });

    assert_eq!(robot.controller().params().cross_count, 2);
    assert_eq!(robot.controller().window_range(), 36..50);
    assert!(robot.controller().window().contains(40));
    assert_window_invariants(robot.controller(), "after resize");
}

#[test]
fn list_size_changes_clamp_and_extend() {
    let mut robot = robot(97);
    robot.scroll_to_index(96);

    robot.set_list_size(50);
    assert_eq!(robot.controller().window_range(), 24..50);
    assert_eq!(robot.controller().axis_reference().index, 40);
    assert_eq!(robot.offset(), 1000.0);
    assert_window_invariants(robot.controller(), "after shrink");

    robot.set_list_size(200);
    assert_eq!(robot.controller().window_range(), 32..60);
    assert_window_invariants(robot.controller(), "after grow");
}

#[test]
fn padded_grid_survives_long_flings() {
    let config = CradleConfig {
        gap: 10.0,
        padding: 20.0,
        ..grid(1_000)
    };
    let mut robot = ScrollRobot::new(config, Viewport::new(400.0, 300.0), RecordingCache::immediate());
    assert_eq!(robot.controller().params().cross_count, 3);

    for _ in 0..100 {
        robot.fling(170.0, 170.0);
        assert_window_invariants(robot.controller(), "padded forward");
    }
    while robot.offset() > 0.0 {
        robot.fling(-230.0, 230.0);
        assert_window_invariants(robot.controller(), "padded backward");
    }

    assert_eq!(robot.controller().window_range(), 0..21);
    assert_eq!(robot.controller().axis_reference(), AxisReference::new(0, 20.0));
    assert_eq!(robot.stats().rebuilds, 1);
}

#[test]
fn pivot_mid_list_keeps_axis_in_window() {
    let mut robot = robot(400);
    robot.fling(1500.0, 50.0);
    let axis = robot.controller().axis_reference().index;

    robot.set_orientation(Orientation::Horizontal);
    assert_eq!(robot.controller().params().cross_count, 3);
    assert_eq!(robot.controller().axis_reference().index, axis);
    assert_window_invariants(robot.controller(), "after pivot");

    robot.fling(800.0, 60.0);
    assert_window_invariants(robot.controller(), "scrolling horizontally");
}

#[test]
fn backward_steps_past_the_runway_keep_the_window() {
    let mut robot = robot(100);
    robot.scroll_to_index(60);
    assert_eq!(robot.controller().window_range(), 52..80);
    let rebuilds = robot.stats().rebuilds;

    // One viewport, which is also one row more than the runway.
    robot.scroll_by(-300.0);
    assert_eq!(robot.controller().state(), CradleState::Ready);
    assert_eq!(robot.controller().window_range(), 40..68);
    assert_eq!(robot.controller().axis_reference(), AxisReference::new(48, 0.0));
    assert_window_invariants(robot.controller(), "after one viewport back");

    robot.scroll_by(-310.0);
    assert_eq!(robot.controller().state(), CradleState::Ready);
    assert_eq!(robot.controller().window_range(), 28..56);
    assert_eq!(robot.controller().axis_reference(), AxisReference::new(36, 10.0));
    assert_window_invariants(robot.controller(), "after a longer step back");

    assert_eq!(robot.stats().rebuilds, rebuilds);
    assert_eq!(robot.stats().noise_aborts, 0);
}

#[test]
fn silent_backward_jump_keeps_overlapping_window() {
    let mut robot = robot(100);
    robot.scroll_to_index(60);
    let rebuilds = robot.stats().rebuilds;

    robot.jump_silently(1190.0);
    assert_eq!(robot.controller().state(), CradleState::Ready);
    assert_eq!(robot.controller().window_range(), 52..80);
    assert_eq!(robot.cache().live_count(), 28);

    robot.settle();
    assert_eq!(robot.controller().window_range(), 40..68);
    assert_eq!(robot.controller().axis_reference(), AxisReference::new(48, 10.0));
    assert_eq!(robot.stats().rebuilds, rebuilds);
    assert_window_invariants(robot.controller(), "after settle");
}

#[test]
fn single_runway_row_slides_a_viewport_at_a_time() {
    let config = CradleConfig {
        runway_rows: 1,
        ..grid(200)
    };
    let mut robot = ScrollRobot::new(config, Viewport::new(400.0, 300.0), RecordingCache::immediate());
    assert_eq!(robot.controller().window_range(), 0..20);

    for _ in 0..10 {
        robot.scroll_by(300.0);
        assert_eq!(robot.controller().state(), CradleState::Ready);
        assert_window_invariants(robot.controller(), "forward by a viewport");
    }
    assert_eq!(robot.offset(), 3000.0);
    for _ in 0..10 {
        robot.scroll_by(-300.0);
        assert_eq!(robot.controller().state(), CradleState::Ready);
        assert_window_invariants(robot.controller(), "back by a viewport");
    }

    assert_eq!(robot.controller().window_range(), 0..20);
    assert_eq!(robot.controller().axis_reference(), AxisReference::new(0, 0.0));
    assert_eq!(robot.stats().rebuilds, 1);
}

#[test]
fn zero_runway_keeps_partially_visible_row() {
    let config = CradleConfig {
        runway_rows: 0,
        ..grid(100)
    };
    let mut robot = ScrollRobot::new(config, Viewport::new(400.0, 300.0), RecordingCache::immediate());
    assert_eq!(robot.controller().params().runway_row_count, 1);

    robot.scroll_by(150.0);
    assert_eq!(robot.controller().axis_reference(), AxisReference::new(8, 50.0));
    assert_eq!(robot.controller().visible_range(), 4..20);
    assert_eq!(robot.controller().window_range(), 4..24);
    assert_window_invariants(robot.controller(), "zero runway");
}

#[test]
fn intersection_threshold_gates_reported_crossings() {
    let config = CradleConfig {
        intersection_threshold: 0.5,
        ..grid(100)
    };
    let mut gated = ScrollRobot::new(config, Viewport::new(400.0, 300.0), RecordingCache::immediate());

    let start = gated.batches().len();
    gated.scroll_to(140.0);
    // Row 1 has only 40% of its cell past the edge.
    let indices: Vec<usize> = gated.batches()[start].iter().map(|event| event.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
    assert!(gated.batches()[start].iter().all(|event| event.intersecting));

    let start = gated.batches().len();
    gated.scroll_to(160.0);
    let batch = &gated.batches()[start];
    assert_eq!(batch.iter().map(|event| event.index).collect::<Vec<_>>(), vec![4, 5, 6, 7]);
    assert!(batch.iter().all(|event| (event.ratio - 0.6).abs() < 1e-5));
    assert_eq!(gated.controller().axis_reference().index, 8);

    let mut eager = robot(100);
    let start = eager.batches().len();
    eager.scroll_to(140.0);
    assert_eq!(eager.batches()[start].len(), 8);
}
