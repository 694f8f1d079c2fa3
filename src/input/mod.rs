//! Input handling: platform-agnostic events, pointer state, and the
//! key-bindable actions.

/// Platform-agnostic input events.
pub mod event;
/// Pointer position, drag detection and double-click timing.
pub mod mouse;

pub use event::{InputEvent, MouseButton};
pub use mouse::{Click, PointerState};
use serde::{Deserialize, Serialize};

/// Engine-level actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// reseed = "KeyR"
/// switch_scene = "Tab"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Return the camera to its starting pose.
    ResetCamera,
    /// Regenerate the galaxy with a new seed.
    Reseed,
    /// Pause or resume the particle-field animation.
    ToggleWobble,
    /// Enter or leave borderless fullscreen.
    ToggleFullscreen,
    /// Swap between the galaxy and the particle field.
    SwitchScene,
}
