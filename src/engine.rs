use tracing::{debug, info};

use crate::camera::{Camera, Point};
use crate::consts::MOVE_STEP;
use crate::hit;
use crate::input::{Button, InputEvent, InputState, Key, Scroll, UiState};
use crate::scene::Scene;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from event handlers for the host to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Scene, camera, or overlay changed; redraw.
    RenderNeeded,
    /// The user asked to save. The host hands the scene to the layout codec.
    SaveRequested,
    /// The user asked to leave the editor.
    Quit,
}

/// All editor state owned by the interaction loop: the scene, the camera,
/// overlay flags, and the active gesture.
///
/// Nothing here touches a window, so every transition can be driven and
/// inspected directly from tests.
#[derive(Debug, Clone, Default)]
pub struct EditorContext {
    pub scene: Scene,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
}

impl EditorContext {
    /// Wrap a loaded scene with a default camera centered on a viewport of the given size.
    #[must_use]
    pub fn new(scene: Scene, viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            scene,
            camera: Camera::centered(viewport_width, viewport_height),
            ui: UiState::default(),
            input: InputState::Idle,
        }
    }

    /// Feed one event through the state machine.
    pub fn handle(&mut self, event: InputEvent) -> Vec<Action> {
        match event {
            InputEvent::PointerDown { button, screen } => self.on_pointer_down(screen, button),
            InputEvent::PointerUp { button, screen } => self.on_pointer_up(screen, button),
            InputEvent::PointerMove { screen } => self.on_pointer_move(screen),
            InputEvent::Scroll(direction) => self.on_scroll(direction),
            InputEvent::KeyPress(key) => self.on_key_press(&key),
            InputEvent::Quit => vec![Action::Quit],
        }
    }

    // --- Pointer ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        if !matches!(self.input, InputState::Idle) {
            return Vec::new();
        }
        match button {
            Button::Primary => {
                self.input = InputState::Dragging { last_screen: screen };
            }
            Button::Secondary => {
                self.input = InputState::Selecting {
                    start_screen: screen,
                    start_world: self.camera.screen_to_world(screen),
                    current_screen: screen,
                };
            }
            Button::Middle => return Vec::new(),
        }
        debug!(state = %self.input, "gesture started");
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, _screen: Point, button: Button) -> Vec<Action> {
        match (self.input, button) {
            (InputState::Dragging { .. }, Button::Primary) | (InputState::Selecting { .. }, Button::Secondary) => {
                debug!(state = %self.input, "gesture ended");
                self.input = InputState::Idle;
                vec![Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Dragging { last_screen } => {
                let (dx, dy) = (screen.x - last_screen.x, screen.y - last_screen.y);
                *last_screen = screen;
                self.camera.pan_by_screen_delta(dx, dy);
                vec![Action::RenderNeeded]
            }
            InputState::Selecting { current_screen, .. } => {
                *current_screen = screen;
                self.refresh_selection();
                vec![Action::RenderNeeded]
            }
        }
    }

    // --- Wheel ---

    pub fn on_scroll(&mut self, direction: Scroll) -> Vec<Action> {
        let within = match direction {
            Scroll::Up => self.camera.zoom_in(),
            Scroll::Down => self.camera.zoom_out(),
        };
        if !within {
            debug!(zoom = self.camera.zoom, "zoom clamped");
        }
        self.refresh_selection();
        vec![Action::RenderNeeded]
    }

    // --- Keyboard ---

    pub fn on_key_press(&mut self, key: &Key) -> Vec<Action> {
        if let Some((dx, dy)) = key.arrow_step() {
            let moved = self.scene.move_highlighted(dx * MOVE_STEP, dy * MOVE_STEP);
            debug!(moved, dx, dy, "moved highlighted shapes");
            return vec![Action::RenderNeeded];
        }
        match key.0.as_str() {
            Key::TOGGLE_HITBOXES => {
                self.ui.show_hitboxes = !self.ui.show_hitboxes;
                vec![Action::RenderNeeded]
            }
            Key::DELETE => {
                let removed = self.scene.delete_highlighted();
                info!(removed, remaining = self.scene.shape_count(), "deleted shapes");
                vec![Action::RenderNeeded]
            }
            Key::DUPLICATE => {
                let anchors_before = self.scene.anchor_count();
                let copied = self.scene.duplicate_highlighted();
                info!(
                    copied,
                    new_anchors = self.scene.anchor_count() - anchors_before,
                    "duplicated shapes"
                );
                vec![Action::RenderNeeded]
            }
            Key::SAVE => vec![Action::SaveRequested],
            _ => Vec::new(),
        }
    }

    // --- Queries ---

    /// The selection rectangle in screen pixels while one is being dragged.
    #[must_use]
    pub fn selection_rect(&self) -> Option<hit::ScreenRect> {
        self.input.selection_rect()
    }

    /// Re-run rectangle selection against the current camera.
    fn refresh_selection(&mut self) {
        if let Some(rect) = self.input.selection_rect() {
            hit::select_in_rect(&mut self.scene, &self.camera, rect);
        }
    }
}
