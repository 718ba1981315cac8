// Host-side tests for pointer gesture tracking.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/core/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn single_pointer_drag_rotates() {
    let mut tracker = PointerTracker::default();
    assert_eq!(tracker.down(1, Vec2::new(100.0, 100.0)), Gesture::None);
    assert_eq!(tracker.active_count(), 1);

    assert_eq!(
        tracker.moved(1, Vec2::new(110.0, 95.0)),
        Gesture::Rotate { dx: 10.0, dy: -5.0 }
    );
    // Deltas are relative to the previous move, not the press
    assert_eq!(
        tracker.moved(1, Vec2::new(111.0, 95.0)),
        Gesture::Rotate { dx: 1.0, dy: 0.0 }
    );

    assert_eq!(tracker.up(1), Gesture::None);
    assert_eq!(tracker.active_count(), 0);
}

#[test]
fn moves_from_unknown_pointers_are_ignored() {
    let mut tracker = PointerTracker::default();
    // Hover without a press
    assert_eq!(tracker.moved(7, Vec2::new(5.0, 5.0)), Gesture::None);
    tracker.down(1, Vec2::ZERO);
    assert_eq!(tracker.moved(2, Vec2::new(5.0, 5.0)), Gesture::None);
    assert_eq!(tracker.up(99), Gesture::None);
    assert_eq!(tracker.active_count(), 1);
}

#[test]
fn second_pointer_starts_pinch() {
    let mut tracker = PointerTracker::default();
    tracker.down(1, Vec2::new(0.0, 0.0));
    assert_eq!(
        tracker.down(2, Vec2::new(30.0, 40.0)),
        Gesture::PinchStart { distance: 50.0 }
    );

    assert_eq!(
        tracker.moved(2, Vec2::new(60.0, 80.0)),
        Gesture::Pinch { distance: 100.0 }
    );
    assert_eq!(
        tracker.moved(1, Vec2::new(30.0, 40.0)),
        Gesture::Pinch { distance: 50.0 }
    );
}

#[test]
fn lifting_one_finger_ends_pinch_and_resumes_rotate() {
    let mut tracker = PointerTracker::default();
    tracker.down(1, Vec2::new(0.0, 0.0));
    tracker.down(2, Vec2::new(10.0, 0.0));

    assert_eq!(tracker.up(2), Gesture::PinchEnd);
    assert_eq!(tracker.active_count(), 1);
    assert_eq!(
        tracker.moved(1, Vec2::new(3.0, 4.0)),
        Gesture::Rotate { dx: 3.0, dy: 4.0 }
    );
}

#[test]
fn repeated_down_updates_position() {
    let mut tracker = PointerTracker::default();
    tracker.down(1, Vec2::new(0.0, 0.0));
    tracker.down(1, Vec2::new(50.0, 50.0));
    assert_eq!(tracker.active_count(), 1);
    assert_eq!(
        tracker.moved(1, Vec2::new(51.0, 50.0)),
        Gesture::Rotate { dx: 1.0, dy: 0.0 }
    );
}

#[test]
fn third_pointer_does_not_drive_controls() {
    let mut tracker = PointerTracker::default();
    tracker.down(1, Vec2::ZERO);
    tracker.down(2, Vec2::new(10.0, 0.0));
    assert_eq!(tracker.down(3, Vec2::new(20.0, 0.0)), Gesture::None);
    assert_eq!(tracker.moved(3, Vec2::new(25.0, 0.0)), Gesture::None);
    // Back to two pointers: the pinch resumes from the pair as it is now
    assert_eq!(tracker.up(3), Gesture::PinchStart { distance: 10.0 });
    assert_eq!(tracker.up(2), Gesture::PinchEnd);
}

#[test]
fn lifting_a_pinch_finger_hands_over_to_the_next_pair() {
    let mut tracker = PointerTracker::default();
    tracker.down(1, Vec2::new(0.0, 0.0));
    tracker.down(2, Vec2::new(100.0, 0.0));
    tracker.down(3, Vec2::new(400.0, 0.0));

    assert_eq!(tracker.up(1), Gesture::PinchStart { distance: 300.0 });
    // No finger motion, so no change in pinch distance
    assert_eq!(
        tracker.moved(2, Vec2::new(100.0, 0.0)),
        Gesture::Pinch { distance: 300.0 }
    );
}

#[test]
fn pair_moved_while_three_down_restarts_on_release() {
    let mut tracker = PointerTracker::default();
    tracker.down(1, Vec2::new(0.0, 0.0));
    tracker.down(2, Vec2::new(10.0, 0.0));
    tracker.down(3, Vec2::new(50.0, 50.0));
    assert_eq!(tracker.moved(2, Vec2::new(40.0, 0.0)), Gesture::None);

    assert_eq!(tracker.up(3), Gesture::PinchStart { distance: 40.0 });
}

#[test]
fn four_pointers_restart_only_when_the_pair_changes() {
    let mut tracker = PointerTracker::default();
    for (id, x) in [(1, 0.0), (2, 10.0), (3, 30.0), (4, 70.0)] {
        tracker.down(id, Vec2::new(x, 0.0));
    }
    assert_eq!(tracker.up(4), Gesture::None);
    tracker.down(4, Vec2::new(70.0, 0.0));
    assert_eq!(tracker.up(2), Gesture::PinchStart { distance: 30.0 });
    assert_eq!(tracker.active_count(), 3);
}
