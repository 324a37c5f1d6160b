use anyhow::Result;
use marionette_input::BindingOverrides;
use marionette_player::{CharacterSettings, ControllerSettings};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_CONTROLS_PATH: &str = "config/controls.toml";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    /// Radians of view rotation per unit of mouse movement.
    pub mouse_sensitivity: f32,
    pub invert_y: bool,
    /// Reach of the interaction trace in world units.
    pub interaction_distance: f32,
    /// Spring arm length behind the character.
    pub arm_length: f32,
    /// Body turn rate when orienting toward movement, degrees per second.
    pub rotation_rate_degrees: f32,
    pub bindings: BindingOverrides,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        let character = CharacterSettings::default();
        let controller = ControllerSettings::default();
        Self {
            mouse_sensitivity: controller.mouse_sensitivity,
            invert_y: controller.invert_y,
            interaction_distance: character.interaction_distance,
            arm_length: character.arm_length,
            rotation_rate_degrees: character.movement.rotation_rate_degrees,
            bindings: BindingOverrides::default(),
        }
    }
}

impl ControlsConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        let cfg = match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ControlsConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    ControlsConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!(
                        "Controls config not found at {}. Using defaults",
                        path.display()
                    );
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                ControlsConfig::default()
            }
        };
        cfg.sanitized()
    }

    /// Save controls configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Character construction parameters derived from this config.
    pub fn character_settings(&self) -> CharacterSettings {
        let mut settings = CharacterSettings {
            interaction_distance: self.interaction_distance,
            arm_length: self.arm_length,
            ..CharacterSettings::default()
        };
        settings.movement.rotation_rate_degrees = self.rotation_rate_degrees;
        settings
    }

    /// Controller look tuning derived from this config.
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            mouse_sensitivity: self.mouse_sensitivity,
            invert_y: self.invert_y,
        }
    }

    // Values that would make every trace invalid are replaced, not passed on.
    fn sanitized(mut self) -> Self {
        let defaults = ControlsConfig::default();
        if !(self.interaction_distance.is_finite() && self.interaction_distance > 0.0) {
            warn!(
                value = self.interaction_distance,
                "interaction_distance must be positive; using {}", defaults.interaction_distance
            );
            self.interaction_distance = defaults.interaction_distance;
        }
        if !(self.arm_length.is_finite() && self.arm_length >= 0.0) {
            warn!(value = self.arm_length, "arm_length must be non-negative");
            self.arm_length = defaults.arm_length;
        }
        if !self.mouse_sensitivity.is_finite() {
            warn!("mouse_sensitivity must be finite");
            self.mouse_sensitivity = defaults.mouse_sensitivity;
        }
        if !(self.rotation_rate_degrees.is_finite() && self.rotation_rate_degrees >= 0.0) {
            warn!(value = self.rotation_rate_degrees, "rotation_rate_degrees must be non-negative");
            self.rotation_rate_degrees = defaults.rotation_rate_degrees;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir()
            .join(format!("marionette_config_{timestamp}_{name}"))
            .join(name)
    }

    #[test]
    fn missing_file_uses_defaults() {
        let cfg = ControlsConfig::load_from_path(&temp_path("absent.toml"));
        assert_eq!(cfg, ControlsConfig::default());
        assert_eq!(cfg.interaction_distance, 350.0);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let path = temp_path("partial.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "interaction_distance = 500.0\n[bindings.gameplay]\nInteract = [\"KeyF\"]\n",
        )
        .unwrap();

        let cfg = ControlsConfig::load_from_path(&path);
        assert_eq!(cfg.interaction_distance, 500.0);
        assert_eq!(cfg.arm_length, 300.0);
        assert_eq!(
            cfg.bindings.gameplay.get("Interact"),
            Some(&vec!["KeyF".to_string()])
        );
        assert_eq!(cfg.character_settings().interaction_distance, 500.0);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn non_positive_reach_is_replaced() {
        let path = temp_path("bad.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "interaction_distance = -1.0\n").unwrap();
        let cfg = ControlsConfig::load_from_path(&path);
        assert_eq!(cfg.interaction_distance, 350.0);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let path = temp_path("saved.toml");
        let cfg = ControlsConfig {
            mouse_sensitivity: 0.004,
            invert_y: true,
            ..ControlsConfig::default()
        };
        cfg.save_to_path(&path).unwrap();
        assert_eq!(ControlsConfig::load_from_path(&path), cfg);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn shipped_controls_parse() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONTROLS_PATH);
        let contents = fs::read_to_string(&path).expect("config/controls.toml readable");
        let cfg: ControlsConfig = toml::from_str(&contents).expect("config/controls.toml parses");
        assert_eq!(cfg.interaction_distance, 350.0);
        assert!(cfg.bindings.gameplay.contains_key("Interact"));
    }
}
