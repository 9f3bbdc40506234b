use super::config::FlowConfig;
use super::store::FlowConfigStore;
use crate::error::SnapshotError;
use ahash::AHashMap;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use std::fs;
use std::io::{Read, Write};

impl FlowConfigStore {
    /// Encodes the store in the compact bincode format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        encode_to_vec(self, standard()).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Decodes a store written by [`FlowConfigStore::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        decode_from_slice::<FlowConfigStore, _>(bytes, standard())
            .map(|(store, _)| store) // bincode 2 returns (value, bytes_read)
            .map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    /// Saves the store to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), SnapshotError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })?;
        file.write_all(&bytes).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Loads a store previously written with [`FlowConfigStore::save`].
    pub fn from_file(path: &str) -> Result<Self, SnapshotError> {
        let mut file = fs::File::open(path).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|source| SnapshotError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parses the JSON record shape (`{ "<nodeId>": { "type": ..., ... } }`).
    ///
    /// Alternate links recorded on one side only are mirrored onto the other.
    pub fn from_json_str(json: &str) -> Result<Self, SnapshotError> {
        let raw: AHashMap<String, FlowConfig> = serde_json::from_str(json)?;
        Ok(raw.into_iter().collect())
    }

    pub fn to_json_string(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
