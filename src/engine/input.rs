//! Input dispatch and key actions for [`NebulaEngine`].

use web_time::Instant;

use super::scene_management::initial_eye;
use super::{NebulaEngine, WindowRequest};
use crate::input::{Click, InputEvent, KeyAction, MouseButton};
use crate::scene::SceneKind;

impl NebulaEngine {
    /// Process a platform-agnostic input event.
    ///
    /// Left drag orbits (shift + left drag pans), right drag pans, middle
    /// drag dollies, and the wheel zooms. A double-click with the left
    /// button asks the host to toggle fullscreen.
    ///
    /// ```ignore
    /// engine.handle_input(InputEvent::CursorMoved { x, y });
    /// engine.handle_input(InputEvent::Scroll { delta: 1.0 });
    /// ```
    pub fn handle_input(&mut self, event: InputEvent) -> Option<WindowRequest> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.dispatch_cursor_moved(x, y);
                None
            }
            InputEvent::MouseButton { button, pressed } => {
                if pressed {
                    self.pointer.press(button);
                    None
                } else {
                    match self.pointer.release(button, Instant::now()) {
                        Click::Double => Some(WindowRequest::ToggleFullscreen),
                        Click::Single | Click::None => None,
                    }
                }
            }
            InputEvent::Scroll { delta } => {
                self.camera_controller.zoom(delta);
                None
            }
            InputEvent::ModifiersChanged { shift } => {
                self.pointer.set_shift(shift);
                None
            }
        }
    }

    fn dispatch_cursor_moved(&mut self, x: f32, y: f32) {
        let delta = self.pointer.move_to(x, y);
        match self.pointer.held() {
            Some(MouseButton::Left) if self.pointer.shift() => {
                self.camera_controller.pan(delta);
            }
            Some(MouseButton::Left) => self.camera_controller.rotate(delta),
            Some(MouseButton::Right) => self.camera_controller.pan(delta),
            Some(MouseButton::Middle) => {
                self.camera_controller.zoom(-delta.y * 0.05);
            }
            None => {}
        }
    }

    /// Run the action bound to `key` (a winit `KeyCode` debug name such as
    /// `"KeyR"`), if any.
    pub fn handle_key(&mut self, key: &str) -> Option<WindowRequest> {
        let action = self.options.keybindings.lookup(key)?;
        self.execute(action)
    }

    /// Perform `action`. Returns the window-level request, if the action
    /// needs the host's help.
    pub fn execute(&mut self, action: KeyAction) -> Option<WindowRequest> {
        match action {
            KeyAction::ResetCamera => self.camera_controller.reset(),
            KeyAction::Reseed => {
                if let Err(e) = self.slot.reseed() {
                    log::warn!("reseed failed: {e}");
                }
            }
            KeyAction::ToggleWobble => {
                if let Some(enabled) = self.slot.toggle_wobble() {
                    self.options.particles.wobble = enabled;
                    log::debug!("wobble {}", if enabled { "on" } else { "off" });
                }
            }
            KeyAction::ToggleFullscreen => {
                return Some(WindowRequest::ToggleFullscreen);
            }
            KeyAction::SwitchScene => {
                self.switch_scene(self.slot.kind().next());
            }
        }
        None
    }

    /// Replace the live scene with `kind` and move the camera to that
    /// scene's starting viewpoint.
    pub fn switch_scene(&mut self, kind: SceneKind) {
        match self.slot.switch(kind, &self.options) {
            Ok(()) => {
                self.options.scene = kind;
                self.camera_controller.look_from(initial_eye(kind));
            }
            Err(e) => log::warn!("cannot switch to {kind}: {e}"),
        }
    }
}
