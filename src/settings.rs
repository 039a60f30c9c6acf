use std::path::{Path, PathBuf};

use image::Rgba;

use crate::camera::ZoomSettings;
use crate::canvas::MAX_CANVAS_DIM;
use crate::components::colors::{format_rgba, parse_rgba};
use crate::error::PixelFeError;

/// Editor settings persisted as `key=value` lines.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorSettings {
    /// Canvas size in cells
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Logical window extent the canvas is centred in (also the initial
    /// viewport size)
    pub window_width: u32,
    pub window_height: u32,
    pub zoom: ZoomSettings,
    pub primary_color: Rgba<u8>,
    pub secondary_color: Rgba<u8>,
    /// `.hex` palette file; the built-in palette is used when unset
    pub palette_path: Option<PathBuf>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            canvas_width: 64,
            canvas_height: 64,
            window_width: 1280,
            window_height: 720,
            zoom: ZoomSettings::default(),
            primary_color: Rgba([0, 0, 0, 255]),
            secondary_color: Rgba([255, 0, 0, 255]),
            palette_path: None,
        }
    }
}

impl EditorSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/pixelfe/pixelfe_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\PixelFE\pixelfe_settings.cfg
    /// On macOS:   ~/Library/Application Support/PixelFE/pixelfe_settings.cfg
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA").ok()?;
            return Some(PathBuf::from(appdata).join("PixelFE").join("pixelfe_settings.cfg"));
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").ok()?;
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("PixelFE")
                    .join("pixelfe_settings.cfg"),
            );
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
                .ok()?;
            Some(config_dir.join("pixelfe").join("pixelfe_settings.cfg"))
        }
    }

    /// Load settings from the platform location (defaults if missing).
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from `path`; a missing or unreadable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings text. Unknown keys are ignored and malformed values
    /// keep their defaults.
    pub fn parse(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else { continue };
            let key = key.trim();
            let val = val.trim();
            match key {
                "canvas_width" => s.canvas_width = parse_canvas_dim(val, s.canvas_width),
                "canvas_height" => s.canvas_height = parse_canvas_dim(val, s.canvas_height),
                "window_width" => s.window_width = parse_dim(val, s.window_width),
                "window_height" => s.window_height = parse_dim(val, s.window_height),
                "zoom_in_factor" => s.zoom.in_factor = parse_positive(val, s.zoom.in_factor),
                "zoom_out_factor" => s.zoom.out_factor = parse_positive(val, s.zoom.out_factor),
                "zoom_limit_low" => s.zoom.limit_low = parse_positive(val, s.zoom.limit_low),
                "zoom_limit_high" => s.zoom.limit_high = parse_positive(val, s.zoom.limit_high),
                "primary_color" => {
                    if let Some(c) = parse_rgba(val) {
                        s.primary_color = c;
                    }
                }
                "secondary_color" => {
                    if let Some(c) = parse_rgba(val) {
                        s.secondary_color = c;
                    }
                }
                "palette_path" => {
                    s.palette_path = (!val.is_empty()).then(|| PathBuf::from(val));
                }
                _ => {}
            }
        }
        if !s.zoom.is_valid() {
            s.zoom.limit_low = ZoomSettings::default().limit_low;
            s.zoom.limit_high = ZoomSettings::default().limit_high;
        }
        s
    }

    pub fn to_config_string(&self) -> String {
        format!(
            "canvas_width={}\n\
             canvas_height={}\n\
             window_width={}\n\
             window_height={}\n\
             zoom_in_factor={}\n\
             zoom_out_factor={}\n\
             zoom_limit_low={}\n\
             zoom_limit_high={}\n\
             primary_color={}\n\
             secondary_color={}\n\
             palette_path={}\n",
            self.canvas_width,
            self.canvas_height,
            self.window_width,
            self.window_height,
            self.zoom.in_factor,
            self.zoom.out_factor,
            self.zoom.limit_low,
            self.zoom.limit_high,
            format_rgba(self.primary_color),
            format_rgba(self.secondary_color),
            self.palette_path.as_ref().map(|p| p.display().to_string()).unwrap_or_default(),
        )
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), PixelFeError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_config_string())?;
        Ok(())
    }
}

fn parse_dim(val: &str, fallback: u32) -> u32 {
    val.parse::<u32>().ok().filter(|&v| v > 0).unwrap_or(fallback)
}

/// Canvas sides above `MAX_CANVAS_DIM` are rejected like malformed values.
fn parse_canvas_dim(val: &str, fallback: u32) -> u32 {
    match parse_dim(val, fallback) {
        v if v <= MAX_CANVAS_DIM => v,
        _ => fallback,
    }
}

fn parse_positive(val: &str, fallback: f64) -> f64 {
    val.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(fallback)
}
