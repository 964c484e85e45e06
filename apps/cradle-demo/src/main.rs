use anyhow::ensure;
use cradle_core::{CradleConfig, CradleState, Viewport};
use cradle_testing::{assert_window_invariants, RecordingCache, ScrollRobot};

fn report(robot: &ScrollRobot, step: &str) {
    let controller = robot.controller();
    let axis = controller.axis_reference();
    match controller.state() {
        CradleState::Repositioning => println!(
            "{step:<24} offset {:>10.1}  repositioning near {:?}",
            robot.offset(),
            controller.reposition_index()
        ),
        _ => println!(
            "{step:<24} offset {:>10.1}  window {:>13}  visible {:>13}  axis {} @ {:.1}{}",
            robot.offset(),
            format!("{:?}", controller.window_range()),
            format!("{:?}", controller.visible_range()),
            axis.index,
            axis.offset,
            if controller.is_scrolling() { "" } else { "  (settled)" }
        ),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== Cradle Demo ===");
    println!("A 10,000 item grid, scrolled by a simulated host.");
    println!();

    let config = CradleConfig {
        list_size: 10_000,
        cell_width: 120.0,
        cell_height: 80.0,
        gap: 8.0,
        padding: 16.0,
        runway_rows: 3,
        ..Default::default()
    };
    let mut robot = ScrollRobot::new(config, Viewport::new(800.0, 600.0), RecordingCache::immediate());
    let params = *robot.controller().params();
    log::info!(
        "{} items in {} rows of {}, {} rows per window",
        params.list_size,
        params.list_row_count,
        params.cross_count,
        params.cradle_row_count
    );
    report(&robot, "setup");

    robot.fling(4_000.0, 60.0);
    report(&robot, "fling forward");

    robot.fling(-1_500.0, 140.0);
    report(&robot, "fling back");

    robot.jump_silently(100_000.0);
    report(&robot, "scrollbar drag");
    robot.settle();
    report(&robot, "settled");

    robot.scroll_to_index(9_999);
    report(&robot, "scroll to last item");
    ensure!(
        robot.controller().window_range().end == 10_000,
        "window does not reach the end of the list"
    );

    robot.resize(Viewport::new(480.0, 600.0), |_| {});
    report(&robot, "resized");

    let orientation = robot.controller().config().orientation.pivoted();
    robot.set_orientation(orientation);
    report(&robot, "pivoted");

    robot.set_list_size(500);
    report(&robot, "list shrunk");

    assert_window_invariants(robot.controller(), "demo");
    ensure!(
        robot.cache().unknown_releases() == 0,
        "cache saw {} unknown releases",
        robot.cache().unknown_releases()
    );

    let stats = robot.stats();
    println!();
    println!(
        "rebuilds {}, incremental updates {}, acquired {}, released {}, reattached {}",
        stats.rebuilds,
        stats.incremental_updates,
        stats.acquired,
        stats.released,
        robot.cache().reattached_count()
    );
    log::info!("last incremental update took {:?}", stats.last_update_duration);
    Ok(())
}
