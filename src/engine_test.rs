#![allow(clippy::float_cmp)]

use super::*;
use crate::scene::{Anchor, Shape};

// =============================================================
// Helpers
// =============================================================

fn square_at(x: f64, y: f64) -> Shape {
    Shape {
        position: Point::new(x, y).into(),
        points: vec![
            Point::new(-5.0, -5.0),
            Point::new(5.0, -5.0),
            Point::new(5.0, 5.0),
            Point::new(-5.0, 5.0),
        ],
        ..Shape::default()
    }
}

/// Two squares at world (0,0) and (100,0); default camera puts them at
/// screen x 595..605 and 695..705, y 295..305.
fn ctx_with_two_squares() -> EditorContext {
    let mut a = square_at(0.0, 0.0);
    a.static_pins = vec![Point::new(1.0, 1.0).into()];
    a.dynamic_anchors = vec!["anchor-a".into()];
    let b = square_at(100.0, 0.0);
    let scene = Scene::from_parts(vec![a, b], vec![Anchor::new("anchor-a", Point::new(2.0, 2.0))]);
    EditorContext::new(scene, 1200, 600)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn key(name: &str) -> InputEvent {
    InputEvent::KeyPress(Key::new(name))
}

fn down(button: Button, x: f64, y: f64) -> InputEvent {
    InputEvent::PointerDown { button, screen: pt(x, y) }
}

fn up(button: Button, x: f64, y: f64) -> InputEvent {
    InputEvent::PointerUp { button, screen: pt(x, y) }
}

fn mv(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerMove { screen: pt(x, y) }
}

fn select_first(ctx: &mut EditorContext) {
    ctx.handle(down(Button::Secondary, 580.0, 280.0));
    ctx.handle(mv(610.0, 310.0));
    ctx.handle(up(Button::Secondary, 610.0, 310.0));
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_context_is_idle_with_centered_camera() {
    let ctx = ctx_with_two_squares();
    assert_eq!(ctx.input, InputState::Idle);
    assert_eq!(ctx.camera, Camera { pan_x: 600.0, pan_y: -300.0, zoom: 1.0 });
    assert!(!ctx.ui.show_hitboxes);
}

// =============================================================
// Dragging
// =============================================================

#[test]
fn primary_down_starts_dragging() {
    let mut ctx = ctx_with_two_squares();
    let actions = ctx.handle(down(Button::Primary, 10.0, 20.0));
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(ctx.input, InputState::Dragging { last_screen: pt(10.0, 20.0) });
}

#[test]
fn drag_pans_camera_by_delta_over_zoom() {
    let mut ctx = ctx_with_two_squares();
    ctx.camera.zoom = 2.0;
    ctx.handle(down(Button::Primary, 10.0, 20.0));
    ctx.handle(mv(30.0, 10.0));
    assert_eq!(ctx.camera.pan_x, 610.0);
    assert_eq!(ctx.camera.pan_y, -295.0);
    ctx.handle(mv(40.0, 10.0));
    assert_eq!(ctx.camera.pan_x, 615.0);
}

#[test]
fn primary_up_ends_dragging() {
    let mut ctx = ctx_with_two_squares();
    ctx.handle(down(Button::Primary, 0.0, 0.0));
    ctx.handle(up(Button::Primary, 0.0, 0.0));
    assert_eq!(ctx.input, InputState::Idle);
}

#[test]
fn move_while_idle_does_nothing() {
    let mut ctx = ctx_with_two_squares();
    let before = ctx.camera;
    assert!(ctx.handle(mv(50.0, 50.0)).is_empty());
    assert_eq!(ctx.camera, before);
}

#[test]
fn secondary_down_ignored_while_dragging() {
    let mut ctx = ctx_with_two_squares();
    ctx.handle(down(Button::Primary, 0.0, 0.0));
    assert!(ctx.handle(down(Button::Secondary, 5.0, 5.0)).is_empty());
    assert!(matches!(ctx.input, InputState::Dragging { .. }));
}

#[test]
fn secondary_up_does_not_end_dragging() {
    let mut ctx = ctx_with_two_squares();
    ctx.handle(down(Button::Primary, 0.0, 0.0));
    assert!(ctx.handle(up(Button::Secondary, 0.0, 0.0)).is_empty());
    assert!(matches!(ctx.input, InputState::Dragging { .. }));
}

#[test]
fn middle_button_is_ignored() {
    let mut ctx = ctx_with_two_squares();
    assert!(ctx.handle(down(Button::Middle, 0.0, 0.0)).is_empty());
    assert_eq!(ctx.input, InputState::Idle);
}

// =============================================================
// Selecting
// =============================================================

#[test]
fn secondary_down_records_start_in_both_spaces() {
    let mut ctx = ctx_with_two_squares();
    ctx.handle(down(Button::Secondary, 610.0, 290.0));
    assert_eq!(
        ctx.input,
        InputState::Selecting {
            start_screen: pt(610.0, 290.0),
            start_world: pt(10.0, 10.0),
            current_screen: pt(610.0, 290.0),
        }
    );
}

#[test]
fn rectangle_select_highlights_touched_shapes() {
    let mut ctx = ctx_with_two_squares();
    ctx.handle(down(Button::Secondary, 580.0, 280.0));
    ctx.handle(mv(610.0, 310.0));
    assert_eq!(ctx.scene.highlighted_indices(), vec![0]);
    ctx.handle(mv(720.0, 310.0));
    assert_eq!(ctx.scene.highlighted_indices(), vec![0, 1]);
}

#[test]
fn shrinking_rectangle_unhighlights() {
    let mut ctx = ctx_with_two_squares();
    ctx.handle(down(Button::Secondary, 580.0, 280.0));
    ctx.handle(mv(720.0, 310.0));
    ctx.handle(mv(610.0, 310.0));
    assert_eq!(ctx.scene.highlighted_indices(), vec![0]);
}

#[test]
fn reverse_drag_selects_same_shapes() {
    let mut forward = ctx_with_two_squares();
    forward.handle(down(Button::Secondary, 580.0, 280.0));
    forward.handle(mv(650.0, 320.0));

    let mut backward = ctx_with_two_squares();
    backward.handle(down(Button::Secondary, 650.0, 320.0));
    backward.handle(mv(580.0, 280.0));

    assert_eq!(forward.scene.highlighted_indices(), backward.scene.highlighted_indices());
}

#[test]
fn secondary_up_clears_rectangle_but_keeps_highlight() {
    let mut ctx = ctx_with_two_squares();
    select_first(&mut ctx);
    assert_eq!(ctx.input, InputState::Idle);
    assert!(ctx.selection_rect().is_none());
    assert_eq!(ctx.scene.highlighted_indices(), vec![0]);
}

#[test]
fn selection_rect_reported_while_selecting() {
    let mut ctx = ctx_with_two_squares();
    ctx.handle(down(Button::Secondary, 100.0, 100.0));
    ctx.handle(mv(10.0, 10.0));
    assert_eq!(
        ctx.selection_rect(),
        Some(hit::ScreenRect { x: 100.0, y: 100.0, width: -90.0, height: -90.0 })
    );
}

// =============================================================
// Scroll
// =============================================================

#[test]
fn scroll_zooms_in_any_state() {
    let mut ctx = ctx_with_two_squares();
    ctx.handle(InputEvent::Scroll(Scroll::Up));
    assert!((ctx.camera.zoom - 1.1).abs() < 1e-12);
    ctx.handle(down(Button::Primary, 0.0, 0.0));
    ctx.handle(InputEvent::Scroll(Scroll::Down));
    assert!((ctx.camera.zoom - 0.99).abs() < 1e-12);
}

#[test]
fn scroll_while_selecting_reselects_against_new_zoom() {
    let mut ctx = ctx_with_two_squares();
    ctx.handle(down(Button::Secondary, 580.0, 280.0));
    ctx.handle(mv(610.0, 310.0));
    assert_eq!(ctx.scene.highlighted_indices(), vec![0]);

    // At zoom 1.1 the first square sits at x 654.5..665.5, outside the rectangle.
    ctx.handle(InputEvent::Scroll(Scroll::Up));
    assert_eq!(ctx.scene.highlighted_count(), 0);
}

#[test]
fn repeated_scroll_down_keeps_zoom_positive() {
    let mut ctx = ctx_with_two_squares();
    for _ in 0..5000 {
        ctx.handle(InputEvent::Scroll(Scroll::Down));
    }
    assert!(ctx.camera.zoom > 0.0);
}

// =============================================================
// Keys
// =============================================================

#[test]
fn h_toggles_hitbox_overlay() {
    let mut ctx = ctx_with_two_squares();
    ctx.handle(key("h"));
    assert!(ctx.ui.show_hitboxes);
    ctx.handle(key("h"));
    assert!(!ctx.ui.show_hitboxes);
}

#[test]
fn move_right_three_times() {
    let mut ctx = ctx_with_two_squares();
    select_first(&mut ctx);
    for _ in 0..3 {
        ctx.handle(key(Key::RIGHT));
    }
    let moved = ctx.scene.shape(0).unwrap();
    assert_eq!(moved.position, pt(3.0, 0.0));
    assert_eq!(moved.static_pins, vec![pt(4.0, 1.0)]);
    assert_eq!(ctx.scene.anchor("anchor-a").unwrap().position, pt(5.0, 2.0));
    assert_eq!(ctx.scene.shape(1).unwrap().position, pt(100.0, 0.0));
}

#[test]
fn arrow_directions() {
    let mut ctx = ctx_with_two_squares();
    select_first(&mut ctx);
    ctx.handle(key(Key::UP));
    ctx.handle(key(Key::UP));
    ctx.handle(key(Key::LEFT));
    ctx.handle(key(Key::DOWN));
    assert_eq!(ctx.scene.shape(0).unwrap().position, pt(-1.0, 1.0));
}

#[test]
fn d_deletes_highlighted_and_keeps_anchors() {
    let mut ctx = ctx_with_two_squares();
    select_first(&mut ctx);
    ctx.handle(key("d"));
    assert_eq!(ctx.scene.shape_count(), 1);
    assert_eq!(ctx.scene.shape(0).unwrap().position, pt(100.0, 0.0));
    assert!(ctx.scene.anchor("anchor-a").is_some());
}

#[test]
fn c_duplicates_highlighted() {
    let mut ctx = ctx_with_two_squares();
    select_first(&mut ctx);
    ctx.handle(key("c"));
    assert_eq!(ctx.scene.shape_count(), 3);
    assert_eq!(ctx.scene.anchor_count(), 2);
    assert!(!ctx.scene.shape(2).unwrap().highlighted);
    assert_eq!(ctx.scene.shape(2).unwrap().dynamic_anchors, vec!["anchor-a".to_string()]);
}

#[test]
fn s_requests_save() {
    let mut ctx = ctx_with_two_squares();
    assert_eq!(ctx.handle(key("s")), vec![Action::SaveRequested]);
}

#[test]
fn unknown_key_is_ignored() {
    let mut ctx = ctx_with_two_squares();
    assert!(ctx.handle(key("z")).is_empty());
}

#[test]
fn quit_event_returns_quit() {
    let mut ctx = ctx_with_two_squares();
    assert_eq!(ctx.handle(InputEvent::Quit), vec![Action::Quit]);
}

#[test]
fn edits_with_no_selection_are_harmless() {
    let mut ctx = ctx_with_two_squares();
    ctx.handle(key("d"));
    ctx.handle(key("c"));
    ctx.handle(key(Key::LEFT));
    assert_eq!(ctx.scene.shape_count(), 2);
    assert_eq!(ctx.scene.anchor_count(), 1);
    assert_eq!(ctx.scene.shape(0).unwrap().position, pt(0.0, 0.0));
}

#[test]
fn delete_during_selection_leaves_state_consistent() {
    let mut ctx = ctx_with_two_squares();
    ctx.handle(down(Button::Secondary, 580.0, 280.0));
    ctx.handle(mv(720.0, 310.0));
    ctx.handle(key("d"));
    assert_eq!(ctx.scene.shape_count(), 0);
    ctx.handle(mv(600.0, 300.0));
    ctx.handle(up(Button::Secondary, 600.0, 300.0));
    assert_eq!(ctx.input, InputState::Idle);
}
