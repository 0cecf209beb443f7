/// User settings, the settings panel schema and the update reducer

use crate::browser::FolderOptions;
use crate::search::{DEFAULT_MAX_RESULTS, SearchConfig, parse_search_engines};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SEARCH_ENGINES: &str =
    "Google,https://www.google.com/search?q={query};Bing,https://www.bing.com/search?q={query}";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LinkOpen {
    #[default]
    CurrentTab,
    NewTab,
}

/// Everything the settings panel can change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub theme: Theme,
    pub font_family: String,
    pub font_size: u32,
    pub lock_layout: bool,
    pub link_open: LinkOpen,
    pub hidden_folders: Vec<String>,
    pub show_most_visited: bool,
    pub show_recently_closed: bool,
    pub search_engines: String,
    pub max_search_results: u32,
    pub excluded_search_folders: Vec<String>,
    pub background_image: String,
    pub background_opacity: u32,
    pub prune_stale_state: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            theme: Theme::Auto,
            font_family: "system-ui".to_string(),
            font_size: 14,
            lock_layout: false,
            link_open: LinkOpen::CurrentTab,
            hidden_folders: Vec::new(),
            show_most_visited: true,
            show_recently_closed: true,
            search_engines: DEFAULT_SEARCH_ENGINES.to_string(),
            max_search_results: DEFAULT_MAX_RESULTS as u32,
            excluded_search_folders: Vec::new(),
            background_image: String::new(),
            background_opacity: 100,
            prune_stale_state: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Theme,
    FontFamily,
    FontSize,
    LockLayout,
    LinkOpen,
    HiddenFolders,
    ShowMostVisited,
    ShowRecentlyClosed,
    SearchEngines,
    MaxSearchResults,
    ExcludedSearchFolders,
    BackgroundImage,
    BackgroundOpacity,
    PruneStaleState,
}

/// A setting's current value, shaped by its control
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Number(u32),
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// The control used to edit a setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingControl {
    Select { options: Vec<SettingOption> },
    Toggle,
    Slider { min: u32, max: u32, step: u32, show_value: bool },
    Input { placeholder: &'static str },
    MultiSelect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingConfig {
    pub key: SettingKey,
    pub label: &'static str,
    pub control: SettingControl,
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("{key:?} expects a {expected} value")]
    TypeMismatch { key: SettingKey, expected: &'static str },
    #[error("{value:?} is not an option of {key:?}")]
    InvalidOption { key: SettingKey, value: String },
    #[error("{value} is outside {min}..={max} for {key:?}")]
    OutOfRange { key: SettingKey, value: u32, min: u32, max: u32 },
}

fn option(value: &'static str, label: &'static str) -> SettingOption {
    SettingOption { value, label }
}

/// Settings panel rows, in display order
pub fn settings_schema() -> Vec<SettingConfig> {
    vec![
        SettingConfig {
            key: SettingKey::Theme,
            label: "Theme",
            control: SettingControl::Select {
                options: vec![option("auto", "Auto"), option("light", "Light"), option("dark", "Dark")],
            },
        },
        SettingConfig {
            key: SettingKey::FontFamily,
            label: "Font",
            control: SettingControl::Input { placeholder: "system-ui" },
        },
        SettingConfig {
            key: SettingKey::FontSize,
            label: "Font size",
            control: SettingControl::Slider { min: 12, max: 20, step: 1, show_value: true },
        },
        SettingConfig {
            key: SettingKey::LockLayout,
            label: "Lock layout",
            control: SettingControl::Toggle,
        },
        SettingConfig {
            key: SettingKey::LinkOpen,
            label: "Open links in",
            control: SettingControl::Select {
                options: vec![option("current-tab", "Current tab"), option("new-tab", "New tab")],
            },
        },
        SettingConfig {
            key: SettingKey::HiddenFolders,
            label: "Hidden folders",
            control: SettingControl::MultiSelect,
        },
        SettingConfig {
            key: SettingKey::ShowMostVisited,
            label: "Show most visited",
            control: SettingControl::Toggle,
        },
        SettingConfig {
            key: SettingKey::ShowRecentlyClosed,
            label: "Show recently closed",
            control: SettingControl::Toggle,
        },
        SettingConfig {
            key: SettingKey::SearchEngines,
            label: "Search engines",
            control: SettingControl::Input { placeholder: "Name,https://...{query};..." },
        },
        SettingConfig {
            key: SettingKey::MaxSearchResults,
            label: "Search results",
            control: SettingControl::Slider { min: 1, max: 5, step: 1, show_value: true },
        },
        SettingConfig {
            key: SettingKey::ExcludedSearchFolders,
            label: "Folders left out of search",
            control: SettingControl::MultiSelect,
        },
        SettingConfig {
            key: SettingKey::BackgroundImage,
            label: "Background image",
            control: SettingControl::Input { placeholder: "https://..." },
        },
        SettingConfig {
            key: SettingKey::BackgroundOpacity,
            label: "Background opacity",
            control: SettingControl::Slider { min: 0, max: 100, step: 5, show_value: true },
        },
        SettingConfig {
            key: SettingKey::PruneStaleState,
            label: "Forget removed folders",
            control: SettingControl::Toggle,
        },
    ]
}

/// Schema row for a key
pub fn setting_config(key: SettingKey) -> Option<SettingConfig> {
    settings_schema().into_iter().find(|config| config.key == key)
}

/// Check a value against the control it will be edited with
pub fn validate(config: &SettingConfig, value: &SettingValue) -> Result<(), SettingsError> {
    let key = config.key;
    match (&config.control, value) {
        (SettingControl::Select { options }, SettingValue::Text(text)) => {
            if options.iter().any(|o| o.value == text.as_str()) {
                Ok(())
            } else {
                Err(SettingsError::InvalidOption { key, value: text.clone() })
            }
        }
        (SettingControl::Slider { min, max, .. }, SettingValue::Number(n)) => {
            if (*min..=*max).contains(n) {
                Ok(())
            } else {
                Err(SettingsError::OutOfRange { key, value: *n, min: *min, max: *max })
            }
        }
        (SettingControl::Toggle, SettingValue::Bool(_)) => Ok(()),
        (SettingControl::Input { .. }, SettingValue::Text(_)) => Ok(()),
        (SettingControl::MultiSelect, SettingValue::List(_)) => Ok(()),
        (control, _) => Err(SettingsError::TypeMismatch {
            key,
            expected: expected_kind(control),
        }),
    }
}

fn expected_kind(control: &SettingControl) -> &'static str {
    match control {
        SettingControl::Select { .. } | SettingControl::Input { .. } => "text",
        SettingControl::Toggle => "boolean",
        SettingControl::Slider { .. } => "number",
        SettingControl::MultiSelect => "list",
    }
}

impl AppSettings {
    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::Theme => SettingValue::Text(
                match self.theme {
                    Theme::Auto => "auto",
                    Theme::Light => "light",
                    Theme::Dark => "dark",
                }
                .to_string(),
            ),
            SettingKey::FontFamily => SettingValue::Text(self.font_family.clone()),
            SettingKey::FontSize => SettingValue::Number(self.font_size),
            SettingKey::LockLayout => SettingValue::Bool(self.lock_layout),
            SettingKey::LinkOpen => SettingValue::Text(
                match self.link_open {
                    LinkOpen::CurrentTab => "current-tab",
                    LinkOpen::NewTab => "new-tab",
                }
                .to_string(),
            ),
            SettingKey::HiddenFolders => SettingValue::List(self.hidden_folders.clone()),
            SettingKey::ShowMostVisited => SettingValue::Bool(self.show_most_visited),
            SettingKey::ShowRecentlyClosed => SettingValue::Bool(self.show_recently_closed),
            SettingKey::SearchEngines => SettingValue::Text(self.search_engines.clone()),
            SettingKey::MaxSearchResults => SettingValue::Number(self.max_search_results),
            SettingKey::ExcludedSearchFolders => SettingValue::List(self.excluded_search_folders.clone()),
            SettingKey::BackgroundImage => SettingValue::Text(self.background_image.clone()),
            SettingKey::BackgroundOpacity => SettingValue::Number(self.background_opacity),
            SettingKey::PruneStaleState => SettingValue::Bool(self.prune_stale_state),
        }
    }

    /// Validated update of one setting
    pub fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), SettingsError> {
        let config = setting_config(key).ok_or(SettingsError::TypeMismatch {
            key,
            expected: "known setting",
        })?;
        validate(&config, &value)?;

        match (key, value) {
            (SettingKey::Theme, SettingValue::Text(t)) => {
                self.theme = match t.as_str() {
                    "light" => Theme::Light,
                    "dark" => Theme::Dark,
                    _ => Theme::Auto,
                }
            }
            (SettingKey::LinkOpen, SettingValue::Text(t)) => {
                self.link_open = if t == "new-tab" {
                    LinkOpen::NewTab
                } else {
                    LinkOpen::CurrentTab
                }
            }
            (SettingKey::FontFamily, SettingValue::Text(t)) => self.font_family = t,
            (SettingKey::SearchEngines, SettingValue::Text(t)) => self.search_engines = t,
            (SettingKey::BackgroundImage, SettingValue::Text(t)) => self.background_image = t,
            (SettingKey::FontSize, SettingValue::Number(n)) => self.font_size = n,
            (SettingKey::MaxSearchResults, SettingValue::Number(n)) => self.max_search_results = n,
            (SettingKey::BackgroundOpacity, SettingValue::Number(n)) => self.background_opacity = n,
            (SettingKey::LockLayout, SettingValue::Bool(b)) => self.lock_layout = b,
            (SettingKey::ShowMostVisited, SettingValue::Bool(b)) => self.show_most_visited = b,
            (SettingKey::ShowRecentlyClosed, SettingValue::Bool(b)) => self.show_recently_closed = b,
            (SettingKey::PruneStaleState, SettingValue::Bool(b)) => self.prune_stale_state = b,
            (SettingKey::HiddenFolders, SettingValue::List(l)) => self.hidden_folders = l,
            (SettingKey::ExcludedSearchFolders, SettingValue::List(l)) => self.excluded_search_folders = l,
            // validate() already rejected every other pairing
            (key, _) => {
                return Err(SettingsError::TypeMismatch {
                    key,
                    expected: expected_kind(&config.control),
                });
            }
        }
        Ok(())
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_results: self.max_search_results as usize,
            excluded_folders: self.excluded_search_folders.clone(),
            engines: parse_search_engines(&self.search_engines),
        }
    }

    pub fn folder_options(&self) -> FolderOptions {
        FolderOptions {
            show_most_visited: self.show_most_visited,
            show_recently_closed: self.show_recently_closed,
            ..FolderOptions::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsAction {
    Load(AppSettings),
    Update(SettingKey, SettingValue),
    Reset,
}

/// Apply an action to the current settings. A rejected update leaves the
/// settings untouched.
pub fn reduce(settings: &AppSettings, action: SettingsAction) -> Result<AppSettings, SettingsError> {
    match action {
        SettingsAction::Load(loaded) => Ok(loaded),
        SettingsAction::Update(key, value) => {
            let mut next = settings.clone();
            next.set(key, value)?;
            Ok(next)
        }
        SettingsAction::Reset => Ok(AppSettings::default()),
    }
}
