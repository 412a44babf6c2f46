// Sequencer configuration, persisted as RON

use crate::error::{Result, SequencerError};
use crate::sequencer::timeline::{NoteValue, Tempo};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tunables for a sequencer session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Tempo applied when a session starts
    pub default_bpm: u32,
    /// Interpolation window for tempo changes while running
    pub tempo_ramp_seconds: f64,
    /// How far ahead of engine time ticks are dispatched
    pub lookahead_seconds: f64,
    pub chord_duration: NoteValue,
    pub bass_duration: NoteValue,
    pub command_capacity: usize,
    pub update_capacity: usize,
    pub notification_capacity: usize,
    pub mutation_enabled: bool,
    pub compare_enabled: bool,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            default_bpm: 120,
            tempo_ramp_seconds: 0.1,
            lookahead_seconds: 0.1,
            chord_duration: NoteValue::Eighth,
            bass_duration: NoteValue::Half,
            command_capacity: 64,
            update_capacity: 256,
            notification_capacity: 64,
            mutation_enabled: false,
            compare_enabled: false,
        }
    }
}

impl SequencerConfig {
    const FILE_NAME: &'static str = "config.ron";

    /// Default location: `<config dir>/genome_sequencer/config.ron`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("genome_sequencer").join(Self::FILE_NAME))
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: SequencerConfig = ron::from_str(&text)?;
        config.validated()
    }

    /// Load from `path`, else the default location, else built-in defaults.
    /// An explicit path that fails to load is an error; a missing default file is not.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(default) if default.exists() => Self::load(&default),
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Clamp the tempo and reject values the session cannot run with
    pub fn validated(mut self) -> Result<Self> {
        self.default_bpm = Tempo::new(self.default_bpm).bpm();

        if !(self.tempo_ramp_seconds.is_finite() && self.tempo_ramp_seconds >= 0.0) {
            return Err(SequencerError::Config(
                "tempo_ramp_seconds must be a non-negative number".to_string(),
            ));
        }
        if !(self.lookahead_seconds.is_finite() && self.lookahead_seconds >= 0.0) {
            return Err(SequencerError::Config(
                "lookahead_seconds must be a non-negative number".to_string(),
            ));
        }
        if self.command_capacity == 0 || self.update_capacity == 0 || self.notification_capacity == 0 {
            return Err(SequencerError::Config(
                "channel capacities must be greater than zero".to_string(),
            ));
        }

        Ok(self)
    }

    pub fn tempo(&self) -> Tempo {
        Tempo::new(self.default_bpm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SequencerConfig::default().validated().unwrap();
        assert_eq!(config.default_bpm, 120);
        assert_eq!(config.chord_duration, NoteValue::Eighth);
        assert!(!config.mutation_enabled);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.ron");

        let config = SequencerConfig {
            default_bpm: 90,
            mutation_enabled: true,
            ..SequencerConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = SequencerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        std::fs::write(&path, "(default_bpm: 300)").unwrap();

        let loaded = SequencerConfig::load(&path).unwrap();
        assert_eq!(loaded.default_bpm, 240); // clamped
        assert_eq!(loaded.update_capacity, 256);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = SequencerConfig {
            update_capacity: 0,
            ..SequencerConfig::default()
        };
        assert!(matches!(config.validated(), Err(SequencerError::Config(_))));

        let config = SequencerConfig {
            tempo_ramp_seconds: -1.0,
            ..SequencerConfig::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        std::fs::write(&path, "(default_bpm: \"fast\")").unwrap();
        assert!(matches!(
            SequencerConfig::load(&path),
            Err(SequencerError::RonParse(_))
        ));
        assert!(SequencerConfig::load_or_default(Some(&dir.path().join("missing.ron"))).is_err());
    }
}
