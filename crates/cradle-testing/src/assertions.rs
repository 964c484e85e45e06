//! Assertion helpers for window state.

use cradle_core::{ContentController, CradleState, Placeholder, Window};

/// Asserts the structural invariants every settled window must hold.
///
/// - placeholders are gap-free and strictly ascending
/// - the window starts on a row boundary and ends within the list
/// - head followed by tail is exactly the window
/// - the committed axis is row-aligned and inside the window
/// - the visible rows are inside the window
pub fn assert_window_invariants(controller: &ContentController, msg: &str) {
    let params = controller.params();
    let window = controller.window();
    let range = controller.window_range();

    assert!(window.is_contiguous(), "{}: window {:?} has gaps", msg, range);
    assert_eq!(
        range.start % params.cross_count,
        0,
        "{}: window {:?} not row-aligned",
        msg,
        range
    );
    assert!(
        range.end <= params.list_size,
        "{}: window {:?} runs past list size {}",
        msg,
        range,
        params.list_size
    );

    let lists = controller.content_lists();
    let joined: Vec<usize> = lists.iter().map(|item| item.index).collect();
    assert_eq!(
        joined,
        range.clone().collect::<Vec<_>>(),
        "{}: head ++ tail differs from window",
        msg
    );

    if controller.state() != CradleState::Ready || params.list_size == 0 {
        return;
    }

    let axis = controller.axis_reference().index;
    assert_eq!(axis % params.cross_count, 0, "{}: axis {} not row-aligned", msg, axis);
    assert!(
        window.contains(axis),
        "{}: axis {} outside window {:?}",
        msg,
        axis,
        range
    );

    if !controller.is_paused() {
        let visible = controller.visible_range();
        assert!(
            range.start <= visible.start && visible.end <= range.end,
            "{}: visible {:?} not inside window {:?} at offset {}",
            msg,
            visible,
            range,
            controller.scroll_offset()
        );
    }
}

/// Asserts that every index present both in `before` and in `after` kept its
/// placeholder instance.
pub fn assert_identity_preserved(before: &[Placeholder], after: &Window, msg: &str) {
    for placeholder in before {
        if let Some(current) = after.get(placeholder.index) {
            assert_eq!(
                current.instance, placeholder.instance,
                "{}: index {} changed instance",
                msg, placeholder.index
            );
        }
    }
}

/// Asserts that every placeholder in the window has its content.
pub fn assert_all_resolved(window: &Window, msg: &str) {
    let pending: Vec<usize> = window
        .items()
        .iter()
        .filter(|item| !item.is_resolved())
        .map(|item| item.index)
        .collect();
    assert!(pending.is_empty(), "{}: unresolved indices {:?}", msg, pending);
}
