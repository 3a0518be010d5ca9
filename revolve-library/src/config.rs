//! Simple configuration persistence for Revolve
//!
//! Stores the music folder and optional physics overrides.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Default, PartialEq)]
pub struct Config {
    /// Folder imported into the track list on startup
    pub music_folder: Option<PathBuf>,
    /// Scratch sensitivity override (pointer rotation -> visual rotation)
    pub scratch_factor: Option<f64>,
    /// Nominal platter speed override, degrees per frame
    pub rotation_speed: Option<f64>,
    /// Free-spin decay override in [0, 1]
    pub friction: Option<f64>,
}

impl Config {
    /// Load config from the default location
    ///
    /// Returns default config if file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        let path = Self::config_path();
        Self::load_from(&path).unwrap_or_default()
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Save config to the default location
    pub fn save(&self) -> io::Result<()> {
        let path = Self::config_path();
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = self.serialize();
        fs::write(path, content)
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("revolve")
            .join("config.txt")
    }

    /// Parse config from simple key=value format
    fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                match key {
                    "music_folder" => {
                        if !value.is_empty() {
                            config.music_folder = Some(PathBuf::from(value));
                        }
                    }
                    "scratch_factor" => config.scratch_factor = value.parse().ok(),
                    "rotation_speed" => config.rotation_speed = value.parse().ok(),
                    "friction" => config.friction = value.parse().ok(),
                    _ => {} // Ignore unknown keys
                }
            }
        }

        config
    }

    /// Serialize config to simple key=value format
    fn serialize(&self) -> String {
        let mut lines = Vec::new();
        lines.push("# Revolve Configuration".to_string());

        if let Some(ref folder) = self.music_folder {
            lines.push(format!("music_folder={}", folder.display()));
        }
        if let Some(v) = self.scratch_factor {
            lines.push(format!("scratch_factor={v}"));
        }
        if let Some(v) = self.rotation_speed {
            lines.push(format!("rotation_speed={v}"));
        }
        if let Some(v) = self.friction {
            lines.push(format!("friction={v}"));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let config = Config::parse("");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_with_folder() {
        let config = Config::parse("music_folder=/home/user/music");
        assert_eq!(config.music_folder, Some(PathBuf::from("/home/user/music")));
    }

    #[test]
    fn test_parse_physics_overrides() {
        let content = "scratch_factor=0.6\nrotation_speed=3.0\nfriction=0.98";
        let config = Config::parse(content);
        assert_eq!(config.scratch_factor, Some(0.6));
        assert_eq!(config.rotation_speed, Some(3.0));
        assert_eq!(config.friction, Some(0.98));
    }

    #[test]
    fn test_parse_ignores_comments_and_junk() {
        let content = "# Comment\nmusic_folder=/music\nfriction=not-a-number\nunknown=1";
        let config = Config::parse(content);
        assert_eq!(config.music_folder, Some(PathBuf::from("/music")));
        assert_eq!(config.friction, None);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config {
            music_folder: Some(PathBuf::from("/test/path")),
            scratch_factor: Some(0.8),
            rotation_speed: None,
            friction: Some(1.0),
        };

        let serialized = config.serialize();
        let parsed = Config::parse(&serialized);

        assert_eq!(parsed, config);
    }
}
