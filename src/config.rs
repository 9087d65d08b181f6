use crate::settings::{CfgDefaultKeymaps, Keymap, Settings};
use eyre::Result;
use serde_json::{Map, Value};
use std::{fs, path::PathBuf};

const APP_DIR: &str = "lectern";

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub keymap: Keymap,
    keymap_user_dict: CfgDefaultKeymaps, // Used for building help menu text
    filepath: PathBuf,
}

impl Config {
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        let filepath = prefix.join("configuration.json");

        if !filepath.exists() {
            // Save initial config if it doesn't exist
            let config = Self::from_parts(Settings::default(), CfgDefaultKeymaps::default(), filepath);
            config.save()?;
            return Ok(config);
        }
        Self::load_from(filepath)
    }

    /// Load configuration from a custom path. A missing or malformed file
    /// yields the defaults.
    pub fn load_from(filepath: PathBuf) -> Result<Self> {
        let mut settings = Settings::default();
        let mut keymap_user_dict = CfgDefaultKeymaps::default();

        if filepath.exists() {
            let config_str = fs::read_to_string(&filepath)?;
            match serde_json::from_str::<Value>(&config_str) {
                Ok(user_config) => {
                    if let Some(user_settings_map) =
                        user_config.get("Setting").and_then(|v| v.as_object())
                    {
                        apply_settings(&mut settings, user_settings_map);
                    }
                    if let Some(user_keymap_map) =
                        user_config.get("Keymap").and_then(|v| v.as_object())
                    {
                        apply_keymaps(&mut keymap_user_dict, user_keymap_map);
                    }
                }
                Err(err) => {
                    tracing::warn!(path = %filepath.display(), "Ignoring invalid configuration: {err}");
                }
            }
        }

        Ok(Self::from_parts(settings, keymap_user_dict, filepath))
    }

    /// Create a config with custom settings for testing
    pub fn with_settings(settings: Settings, keymap_user_dict: CfgDefaultKeymaps) -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        let filepath = prefix.join("test_configuration.json");
        Ok(Self::from_parts(settings, keymap_user_dict, filepath))
    }

    fn from_parts(settings: Settings, keymap_user_dict: CfgDefaultKeymaps, filepath: PathBuf) -> Self {
        let keymap = Keymap::from_config(&keymap_user_dict);
        Self {
            settings,
            keymap,
            keymap_user_dict,
            filepath,
        }
    }

    /// Get the configuration file path
    pub fn filepath(&self) -> &PathBuf {
        &self.filepath
    }

    /// Get the user-configured keymap dictionary (used for help menu text)
    pub fn keymap_user_dict(&self) -> &CfgDefaultKeymaps {
        &self.keymap_user_dict
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<()> {
        let config_json = serde_json::json!({
            "Setting": self.settings,
            "Keymap": self.keymap_user_dict,
        });

        let config_str = serde_json::to_string_pretty(&config_json)?;

        if let Some(parent) = self.filepath.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.filepath, config_str)?;
        Ok(())
    }
}

fn apply_settings(settings: &mut Settings, map: &Map<String, Value>) {
    if let Some(val) = map.get("product").and_then(|v| v.as_str())
        && !val.trim().is_empty()
    {
        settings.product = val.to_string();
    }
    if let Some(val) = map.get("mouse_support").and_then(|v| v.as_bool()) {
        settings.mouse_support = val;
    }
    if let Some(val) = map.get("show_nav_hints").and_then(|v| v.as_bool()) {
        settings.show_nav_hints = val;
    }
    if let Some(val) = map.get("text_width_small").and_then(|v| v.as_u64()) {
        settings.text_width_small = val as usize;
    }
    if let Some(val) = map.get("text_width_medium").and_then(|v| v.as_u64()) {
        settings.text_width_medium = val as usize;
    }
    if let Some(val) = map.get("text_width_large").and_then(|v| v.as_u64()) {
        settings.text_width_large = val as usize;
    }
}

fn apply_keymaps(keymaps: &mut CfgDefaultKeymaps, map: &Map<String, Value>) {
    for (name, value) in map {
        let Some(key) = value.as_str() else {
            continue;
        };
        let slot = match name.as_str() {
            "next_section" => &mut keymaps.next_section,
            "prev_section" => &mut keymaps.prev_section,
            "first_section" => &mut keymaps.first_section,
            "last_section" => &mut keymaps.last_section,
            "scroll_down" => &mut keymaps.scroll_down,
            "scroll_up" => &mut keymaps.scroll_up,
            "table_of_contents" => &mut keymaps.table_of_contents,
            "text_controls" => &mut keymaps.text_controls,
            "info" => &mut keymaps.info,
            "help" => &mut keymaps.help,
            "quit" => &mut keymaps.quit,
            _ => continue,
        };
        *slot = key.to_string();
    }
}

pub fn get_app_data_prefix() -> Result<PathBuf> {
    if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(config_home).join(APP_DIR));
    } else if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home.clone()).join(".config").join(APP_DIR);
        if path.exists() {
            return Ok(path);
        } else {
            return Ok(PathBuf::from(home).join(format!(".{APP_DIR}")));
        }
    } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
        return Ok(PathBuf::from(user_profile).join(format!(".{APP_DIR}")));
    }

    Err(eyre::eyre!(
        "Could not determine application data directory"
    ))
}
