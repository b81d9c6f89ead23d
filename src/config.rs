//! Tree view settings with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeview/treeview.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `TREEVIEW_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;

/// Construction options of a tree view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Expander icon of an open branch
    pub expand_icon_url: String,
    /// Expander icon of a closed branch
    pub collapse_icon_url: String,
    /// Placeholder icon for leaves and nodes added without an icon
    pub blank_icon_url: String,
    pub has_checkbox: bool,
    /// Namespace for generated element ids
    pub tree_name: String,
    /// Carried for hosts; selection count is not restricted
    pub multiple_select: bool,
    /// Carried for hosts; check count is not restricted
    pub multiple_check: bool,
    pub icon_height: String,
    pub icon_width: String,
    pub inline_edit: bool,
    pub drag_n_drop: bool,
    pub item_color: String,
    pub item_active_color: String,
    pub item_focus_color: String,
    pub item_hover_color: String,
    /// Icon caching hint passed through to rendered icons
    pub use_local_storage: bool,
    pub check_box_size: String,
    pub text_box_size: String,
    pub check_box_active_color: String,
    pub check_box_active_border_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            expand_icon_url: "./assets/chevron-down-solid.svg".into(),
            collapse_icon_url: "./assets/chevron-right-solid.svg".into(),
            blank_icon_url: "./assets/blank.svg".into(),
            has_checkbox: false,
            tree_name: "treeView".into(),
            multiple_select: false,
            multiple_check: false,
            icon_height: "16px".into(),
            icon_width: "16px".into(),
            inline_edit: false,
            drag_n_drop: false,
            item_color: "primary".into(),
            item_active_color: String::new(),
            item_focus_color: String::new(),
            item_hover_color: String::new(),
            use_local_storage: true,
            check_box_size: "md".into(),
            text_box_size: "sm".into(),
            check_box_active_color: String::new(),
            check_box_active_border_color: String::new(),
        }
    }
}

/// Get the XDG config directory for treeview.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeview").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeview.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}`; unexpandable input is returned unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist if given
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(global.as_deref(), config_file, true)
    }

    /// Load settings from explicit layers.
    ///
    /// `global` is optional (skipped if missing), `config_file` is required when
    /// given, `with_env` toggles the `TREEVIEW_*` overrides.
    pub fn load_from(
        global: Option<&Path>,
        config_file: Option<&Path>,
        with_env: bool,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let defaults = Config::try_from(&Settings::default()).map_err(config_err)?;
        let mut builder = Config::builder().add_source(defaults);

        // 2. Global config
        if let Some(path) = global {
            debug!("global config: {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("config file: {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        // 4. Environment variables
        if with_env {
            builder = builder.add_source(
                Environment::with_prefix("TREEVIEW")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        // Expand ~ and $VAR in icon references
        settings.expand_paths();

        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        for url in [
            &mut self.expand_icon_url,
            &mut self.collapse_icon_url,
            &mut self.blank_icon_url,
        ] {
            *url = expand_env_vars(url);
        }
    }

    /// Serialize as TOML (used by `treeview config`).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {e}"),
        })
    }
}
