// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Composition files.
//!
//! Compositions are stored as YAML (`.yaml`/`.yml`) or TOML (`.toml`).
//! Values are kept as written so a file round-trips unchanged; parsing into
//! theory types happens in `CompositionFile::to_composition`.

pub mod watcher;

pub use watcher::{validate_config, ConfigEvent, ConfigWatcher};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::composition::{Composition, Phrase};
use crate::export::midi_file::{DEFAULT_TEMPO, DEFAULT_TRACK_NAME, DEFAULT_VELOCITY};
use crate::export::MidiFileFormat;
use crate::music::scale::{Mode, Note};

/// Root of a composition file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositionFile {
    /// Key, mode and output settings
    #[serde(default)]
    pub composition: CompositionConfig,
    /// Phrases in playing order
    #[serde(default = "default_phrases")]
    pub phrases: Vec<PhraseConfig>,
}

impl Default for CompositionFile {
    fn default() -> Self {
        Self {
            composition: CompositionConfig::default(),
            phrases: default_phrases(),
        }
    }
}

impl CompositionFile {
    /// Load from a file, choosing TOML or YAML by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read composition file: {:?}", path))?;
        if is_toml(path) {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    /// Save to a file, choosing TOML or YAML by extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = if is_toml(path) {
            self.to_toml()?
        } else {
            self.to_yaml()?
        };
        fs::write(path, contents)
            .with_context(|| format!("Failed to write composition file: {:?}", path))
    }

    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML composition")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize composition to YAML")
    }

    /// Parse from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML composition")
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize composition to TOML")
    }

    /// Starter composition in `mode`: its characteristic progression, one
    /// bar per chord
    pub fn template(mode: Mode) -> Self {
        let phrases = match mode {
            Mode::Ionian => vec!["I", "IV", "V", "I"],
            Mode::Dorian => vec!["I", "IV", "V"],
            Mode::Phrygian => vec!["I", "II", "III"],
            Mode::Lydian => vec!["I", "II", "I"],
            Mode::Mixolydian => vec!["I", "VII", "IV"],
            Mode::Aeolian => vec!["I", "VI", "III", "VII"],
            Mode::Locrian => vec!["I", "IV", "VII"],
        };
        Self {
            composition: CompositionConfig {
                mode: mode.id().to_string(),
                ..Default::default()
            },
            phrases: phrases
                .into_iter()
                .map(|chord| PhraseConfig {
                    chord: chord.to_string(),
                    length: 4,
                    rhythm: "1.0".to_string(),
                })
                .collect(),
        }
    }

    /// Convert to a validated composition
    pub fn to_composition(&self) -> Result<Composition> {
        let settings = &self.composition;
        let key: Note = settings.key.parse()?;
        let mode: Mode = settings.mode.parse()?;

        let phrases = self
            .phrases
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Phrase::new(p.chord.clone(), p.length, &p.rhythm)
                    .with_context(|| format!("Phrase {}", i + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        let composition = Composition::new(key, mode, phrases)?
            .with_name(settings.name.clone())
            .with_tempo(settings.tempo)?
            .with_velocity(settings.velocity)
            .with_format(settings.format);
        Ok(composition)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// Key, mode and output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositionConfig {
    /// Track name
    #[serde(default = "default_name")]
    pub name: String,
    /// Tonic (e.g., "C", "F#", "Bb")
    #[serde(default = "default_key")]
    pub key: String,
    /// Mode (e.g., "dorian")
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Tempo in BPM
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    /// Note velocity (1-127)
    #[serde(default = "default_velocity")]
    pub velocity: u8,
    /// MIDI file layout
    #[serde(default)]
    pub format: MidiFileFormat,
}

fn default_name() -> String {
    DEFAULT_TRACK_NAME.to_string()
}
fn default_key() -> String {
    "G".to_string()
}
fn default_mode() -> String {
    "ionian".to_string()
}
fn default_tempo() -> f64 {
    DEFAULT_TEMPO
}
fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            key: default_key(),
            mode: default_mode(),
            tempo: default_tempo(),
            velocity: default_velocity(),
            format: MidiFileFormat::default(),
        }
    }
}

/// A phrase as written in a composition file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhraseConfig {
    /// Chord token, e.g. "IV:maj7"
    pub chord: String,
    /// Number of chord repetitions
    #[serde(default = "default_length")]
    pub length: u32,
    /// Comma-separated beat durations
    #[serde(default = "default_rhythm")]
    pub rhythm: String,
}

fn default_length() -> u32 {
    4
}
fn default_rhythm() -> String {
    "1.0".to_string()
}
fn default_phrases() -> Vec<PhraseConfig> {
    vec![PhraseConfig {
        chord: "I".to_string(),
        length: default_length(),
        rhythm: default_rhythm(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::NoteEvent;

    #[test]
    fn test_parse_composition() {
        let yaml = r#"
composition:
  name: "Dorian Sketch"
  key: D
  mode: dorian
  tempo: 96
  velocity: 70
phrases:
  - chord: "I"
    length: 4
    rhythm: "1.0"
  - chord: "IV:maj7"
    length: 2
    rhythm: "0.5, 1.5"
"#;

        let file = CompositionFile::from_yaml(yaml).unwrap();
        assert_eq!(file.composition.name, "Dorian Sketch");
        assert_eq!(file.composition.key, "D");
        assert_eq!(file.composition.tempo, 96.0);
        assert_eq!(file.composition.format, MidiFileFormat::Type0);
        assert_eq!(file.phrases.len(), 2);
        assert_eq!(file.phrases[1].chord, "IV:maj7");

        let composition = file.to_composition().unwrap();
        assert_eq!(composition.key, Note::D);
        assert_eq!(composition.mode, Mode::Dorian);
        assert_eq!(composition.velocity, 70);
        assert_eq!(composition.phrases()[1].rhythm.durations(), &[0.5, 1.5]);
    }

    #[test]
    fn test_default_values() {
        let file = CompositionFile::from_yaml("composition: {}").unwrap();
        assert_eq!(file.composition.name, "Modal Composition");
        assert_eq!(file.composition.key, "G");
        assert_eq!(file.composition.mode, "ionian");
        assert_eq!(file.composition.tempo, 120.0);
        assert_eq!(file.composition.velocity, 80);
        assert_eq!(file.phrases, default_phrases());

        let phrase: PhraseConfig = serde_yaml::from_str("chord: V").unwrap();
        assert_eq!(phrase.length, 4);
        assert_eq!(phrase.rhythm, "1.0");
    }

    #[test]
    fn test_default_file_generates_g_major_tonic() {
        let composition = CompositionFile::default().to_composition().unwrap();
        let notes = composition.notes();
        assert_eq!(notes.len(), 12);
        assert_eq!(notes.notes[0], NoteEvent::new(67, 0.0, 1.0));
    }

    #[test]
    fn test_format_field() {
        let yaml = "composition:\n  format: type1\n";
        let file = CompositionFile::from_yaml(yaml).unwrap();
        assert_eq!(file.composition.format, MidiFileFormat::Type1);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let mut file = CompositionFile::default();
        file.composition.key = "H".to_string();
        let err = file.to_composition().unwrap_err();
        assert!(err.to_string().contains("unknown key 'H'"));

        let mut file = CompositionFile::default();
        file.composition.mode = "blues".to_string();
        assert!(file.to_composition().is_err());

        let mut file = CompositionFile::default();
        file.phrases[0].rhythm = "1.0, abc".to_string();
        let err = file.to_composition().unwrap_err();
        assert_eq!(err.to_string(), "Phrase 1");
        assert!(format!("{:#}", err).contains("'abc' is not a number"));

        let mut file = CompositionFile::default();
        file.phrases.clear();
        assert!(file.to_composition().is_err());
    }

    #[test]
    fn test_invalid_tempo_is_reported() {
        let file = CompositionFile::from_yaml("composition:\n  tempo: .nan\n").unwrap();
        let err = file.to_composition().unwrap_err();
        assert!(err.to_string().contains("tempo must be a positive number"));

        for tempo in ["0", "-90"] {
            let yaml = format!("composition:\n  tempo: {}\n", tempo);
            let file = CompositionFile::from_yaml(&yaml).unwrap();
            assert!(file.to_composition().is_err(), "tempo {}", tempo);
        }
    }

    #[test]
    fn test_overlong_rhythm_is_reported() {
        let mut file = CompositionFile::default();
        file.phrases[0].rhythm = "5000000".to_string();
        let err = file.to_composition().unwrap_err();
        assert!(format!("{:#}", err).contains("exceeds the 100000 beat limit"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let file = CompositionFile::template(Mode::Aeolian);
        let yaml = file.to_yaml().unwrap();
        let parsed = CompositionFile::from_yaml(&yaml).unwrap();
        assert_eq!(file, parsed);
    }

    #[test]
    fn test_toml_round_trip() {
        let file = CompositionFile::template(Mode::Lydian);
        let text = file.to_toml().unwrap();
        assert!(text.contains("[[phrases]]"));
        let parsed = CompositionFile::from_toml(&text).unwrap();
        assert_eq!(file, parsed);
    }

    #[test]
    fn test_save_and_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let file = CompositionFile::template(Mode::Phrygian);

        for name in ["song.yaml", "song.toml"] {
            let path = dir.path().join(name);
            file.save(&path).unwrap();
            assert_eq!(CompositionFile::load(&path).unwrap(), file);
        }

        let toml_text = fs::read_to_string(dir.path().join("song.toml")).unwrap();
        assert!(toml_text.contains("[composition]"));
    }

    #[test]
    fn test_templates_are_valid() {
        for mode in Mode::ALL {
            let composition = CompositionFile::template(mode).to_composition().unwrap();
            assert_eq!(composition.mode, mode);
            assert!(!composition.notes().is_empty());
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = CompositionFile::load("/nonexistent/composition.yaml");
        assert!(result.is_err());
    }
}
