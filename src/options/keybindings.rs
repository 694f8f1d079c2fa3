use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::input::KeyAction;

#[derive(Debug, Clone, Serialize)]
/// Configurable keyboard bindings mapping actions to key codes.
pub struct KeybindingOptions {
    /// Maps action → key string (e.g. `Reseed` → `"KeyR"`).
    pub bindings: HashMap<KeyAction, String>,
    /// Reverse lookup cache (key string → action). Rebuilt on load.
    #[serde(skip)]
    key_to_action: HashMap<String, KeyAction>,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let bindings = HashMap::from([
            (KeyAction::ResetCamera, "KeyQ".into()),
            (KeyAction::Reseed, "KeyR".into()),
            (KeyAction::ToggleWobble, "KeyW".into()),
            (KeyAction::ToggleFullscreen, "KeyF".into()),
            (KeyAction::SwitchScene, "Tab".into()),
        ]);

        let mut opts = Self {
            bindings,
            key_to_action: HashMap::new(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

impl KeybindingOptions {
    /// Rebuild the reverse lookup map (key string → action).
    pub fn rebuild_reverse_map(&mut self) {
        self.key_to_action.clear();
        for (action, key) in &self.bindings {
            let _ = self.key_to_action.insert(key.clone(), *action);
        }
    }

    /// Look up the action for a key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.key_to_action.get(key).copied()
    }
}

impl PartialEq for KeybindingOptions {
    fn eq(&self, other: &Self) -> bool {
        self.bindings == other.bindings
    }
}

impl Eq for KeybindingOptions {}

impl<'de> Deserialize<'de> for KeybindingOptions {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Stored {
            #[serde(default)]
            bindings: Option<HashMap<KeyAction, String>>,
        }

        let stored = Stored::deserialize(deserializer)?;
        let mut opts = Self::default();
        if let Some(bindings) = stored.bindings {
            opts.bindings = bindings;
            opts.rebuild_reverse_map();
        }
        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lookup() {
        let opts = KeybindingOptions::default();
        assert_eq!(opts.lookup("KeyR"), Some(KeyAction::Reseed));
        assert_eq!(opts.lookup("Tab"), Some(KeyAction::SwitchScene));
        assert_eq!(opts.lookup("KeyZ"), None);
    }

    #[test]
    fn loaded_bindings_rebuild_reverse_map() {
        let opts: KeybindingOptions = toml::from_str(
            r#"
[bindings]
reseed = "Space"
"#,
        )
        .unwrap();
        assert_eq!(opts.lookup("Space"), Some(KeyAction::Reseed));
        assert_eq!(opts.lookup("KeyR"), None);
    }
}
