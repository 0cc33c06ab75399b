use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    // If None, use OS default autosave directory
    pub autosave_override: Option<PathBuf>,
    // If None, exports land in the OS temporary directory
    #[serde(default)]
    pub export_override: Option<PathBuf>,
    // Autosave debounce: save after this many idle seconds with unsaved
    // changes, and at most this often while changes keep arriving.
    #[serde(default = "AppSettings::default_idle_secs")]
    pub autosave_idle_secs: u64,
    #[serde(default = "AppSettings::default_interval_secs")]
    pub autosave_interval_secs: u64,
    // Double-clicking a node opens it with the OS handler
    #[serde(default = "AppSettings::default_true")]
    pub open_on_double_click: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            autosave_override: None,
            export_override: None,
            autosave_idle_secs: Self::default_idle_secs(),
            autosave_interval_secs: Self::default_interval_secs(),
            open_on_double_click: true,
        }
    }
}

impl AppSettings {
    fn config_dir() -> PathBuf {
        // Cross-platform user config dir
        #[cfg(target_os = "macos")]
        {
            // ~/Library/Application Support/Filescape
            let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("~"));
            return home.join("Library").join("Application Support").join("Filescape");
        }
        #[cfg(target_os = "windows")]
        {
            // %APPDATA%\Filescape
            if let Ok(appdata) = std::env::var("APPDATA") {
                return PathBuf::from(appdata).join("Filescape");
            }
            return PathBuf::from("Filescape");
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            // $XDG_CONFIG_HOME/filescape or ~/.config/filescape
            if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
                return PathBuf::from(xdg).join("filescape");
            }
            let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("~"));
            return home.join(".config").join("filescape");
        }
    }

    fn autosave_default_dir() -> PathBuf {
        // Cross-platform user-writable autosave dir
        #[cfg(target_os = "macos")]
        {
            let tmp = std::env::var_os("TMPDIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("/tmp"));
            return tmp.join("Filescape");
        }
        #[cfg(target_os = "windows")]
        {
            // %LOCALAPPDATA%\Filescape\Autosave else TEMP
            if let Ok(local) = std::env::var("LOCALAPPDATA") {
                return PathBuf::from(local).join("Filescape").join("Autosave");
            }
            if let Ok(temp) = std::env::var("TEMP") {
                return PathBuf::from(temp).join("Filescape");
            }
            return PathBuf::from("Filescape");
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            // $XDG_STATE_HOME/filescape or ~/.local/state/filescape, else /tmp
            if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
                return PathBuf::from(xdg).join("filescape");
            }
            if let Ok(home) = std::env::var("HOME") {
                return PathBuf::from(home).join(".local").join("state").join("filescape");
            }
            return PathBuf::from("/tmp").join("Filescape");
        }
    }

    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_dir().join("settings.json");
        if path.exists() {
            let mut f = std::fs::File::open(path)?;
            let mut s = String::new();
            f.read_to_string(&mut s)?;
            let v: Self = serde_json::from_str(&s)?;
            return Ok(v);
        }
        Ok(Self::default())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;
        let path = dir.join("settings.json");
        let s = serde_json::to_string_pretty(self)?;
        let mut f = std::fs::File::create(path)?;
        f.write_all(s.as_bytes())?;
        Ok(())
    }

    pub fn autosave_dir(&self) -> PathBuf {
        if let Some(p) = &self.autosave_override { return p.clone(); }
        Self::autosave_default_dir()
    }

    /// Default export directory when no override is set: OS temp dir.
    /// Example: {temp_dir}/Filescape/exports
    pub fn export_default_dir() -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push("Filescape");
        p.push("exports");
        p
    }

    /// Effective export directory honoring user override or falling back to OS temp.
    pub fn export_dir(&self) -> PathBuf {
        if let Some(p) = &self.export_override { return p.clone(); }
        Self::export_default_dir()
    }

    pub(crate) fn default_idle_secs() -> u64 { 4 }
    pub(crate) fn default_interval_secs() -> u64 { 90 }
    pub(crate) fn default_true() -> bool { true }
}
