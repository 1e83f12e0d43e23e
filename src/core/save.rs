//! Locomotion persistence
//!
//! Serializable records for creatures in flight, in RON (Rusty Object
//! Notation) or JSON. Blend timers are stored as eased fractions plus a
//! direction flag rather than raw tick counts, so a reload resumes every
//! in-progress transition exactly where it left off.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::BlendSnapshot;
use crate::flight::{FlightState, LandingSequence};
use crate::sim::Body;

/// One creature's persisted locomotion record.
///
/// Captures the mode state machine, the animation blend snapshot, and the
/// landing sequence when one was active at save time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedLocomotion {
    /// Mode, navigation, and airborne bookkeeping
    pub state: FlightState,
    /// Wing animator blend fractions and intensity
    pub blend: BlendSnapshot,
    /// In-progress landing, if the creature was mid-sequence
    pub landing: Option<LandingSequence>,
}

/// A creature entry in a save: where it is and what it was doing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCreature {
    /// Position, velocity, and orientation
    pub body: Body,
    /// Locomotion controller state
    pub locomotion: SavedLocomotion,
}

/// A full save of every flying creature in a simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveState {
    /// Save format version for compatibility
    pub version: u32,
    /// All persisted creatures
    pub creatures: Vec<SavedCreature>,
}

impl SaveState {
    /// Create an empty save.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: 1,
            creatures: Vec::new(),
        }
    }

    /// Add a creature record and return its index.
    pub fn add_creature(&mut self, creature: SavedCreature) -> usize {
        let index = self.creatures.len();
        self.creatures.push(creature);
        index
    }

    /// Get the number of persisted creatures.
    #[must_use]
    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }

    /// Check if the save holds no creatures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Save to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SaveError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| SaveError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, SaveError> {
        let content = fs::read_to_string(path).map_err(|e| SaveError::IoError(e.to_string()))?;
        let save: SaveState =
            ron::from_str(&content).map_err(|e| SaveError::DeserializeError(e.to_string()))?;
        Ok(save)
    }

    /// Save to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| SaveError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| SaveError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SaveError> {
        let content = fs::read_to_string(path).map_err(|e| SaveError::IoError(e.to_string()))?;
        let save: SaveState = serde_json::from_str(&content)
            .map_err(|e| SaveError::DeserializeError(e.to_string()))?;
        Ok(save)
    }
}

impl Default for SaveState {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur while saving or loading
#[derive(Debug, Clone)]
pub enum SaveError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for SaveError {}
