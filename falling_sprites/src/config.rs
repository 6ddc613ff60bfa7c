//! Demo configuration, overridable through environment variables

use std::str::FromStr;

use hidpi::{PixelRatio, SurfaceOptions};

pub const WIDTH_VAR: &str = "FALLING_SPRITES_WIDTH";
pub const HEIGHT_VAR: &str = "FALLING_SPRITES_HEIGHT";
pub const WIREFRAMES_VAR: &str = "FALLING_SPRITES_WIREFRAMES";
/// Forces a pixel ratio instead of asking the display.
pub const PIXEL_RATIO_VAR: &str = "HIDPI_PIXEL_RATIO";

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub title: String,
    /// Logical window width
    pub width: f64,
    /// Logical window height
    pub height: f64,
    pub background: wgpu::Color,
    pub wireframes: bool,
    pub pixel_ratio: Option<f64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: String::from("Falling Sprites - Rust/wgpu"),
            width: 800.0,
            height: 600.0,
            background: wgpu::Color::BLACK,
            wireframes: false,
            pixel_ratio: None,
        }
    }
}

impl DemoConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; values that fail to parse are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(width) = parse(&lookup, WIDTH_VAR) {
            config.width = width;
        }
        if let Some(height) = parse(&lookup, HEIGHT_VAR) {
            config.height = height;
        }
        if let Some(wireframes) = parse(&lookup, WIREFRAMES_VAR) {
            config.wireframes = wireframes;
        }
        config.pixel_ratio = parse(&lookup, PIXEL_RATIO_VAR).filter(|ratio: &f64| {
            let usable = PixelRatio::new(*ratio).is_some();
            if !usable {
                log::warn!("ignoring {}={}: must be finite and positive", PIXEL_RATIO_VAR, ratio);
            }
            usable
        });
        config
    }

    pub fn surface_options(&self) -> SurfaceOptions {
        SurfaceOptions {
            title: self.title.clone(),
            background: self.background,
            wireframes: self.wireframes,
            ..Default::default()
        }
    }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> DemoConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DemoConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!((config.width, config.height), (800.0, 600.0));
        assert!(!config.wireframes);
        assert_eq!(config.pixel_ratio, None);
        assert_eq!(config.background, wgpu::Color::BLACK);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            (WIDTH_VAR, "1024"),
            (HEIGHT_VAR, " 768 "),
            (WIREFRAMES_VAR, "true"),
            (PIXEL_RATIO_VAR, "2"),
        ]);
        assert_eq!((config.width, config.height), (1024.0, 768.0));
        assert!(config.wireframes);
        assert_eq!(config.pixel_ratio, Some(2.0));
        assert!(config.surface_options().wireframes);
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let config = config(&[(WIDTH_VAR, "wide"), (PIXEL_RATIO_VAR, "retina")]);
        assert_eq!(config.width, 800.0);
        assert_eq!(config.pixel_ratio, None);
    }

    #[test]
    fn test_unusable_pixel_ratio_is_ignored() {
        for raw in ["0", "-1", "NaN", "inf"] {
            let config = config(&[(PIXEL_RATIO_VAR, raw)]);
            assert_eq!(config.pixel_ratio, None, "{} should be ignored", raw);
        }
        assert_eq!(config(&[(PIXEL_RATIO_VAR, "1.5")]).pixel_ratio, Some(1.5));
    }
}
