//! Sound store: one JSON file per sound plus an `index.json` catalog.
//!
//! Layout under the store root:
//!
//! ```text
//! index.json
//! sounds/<id>.json
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::SfxError;
use crate::sound::{SoundParameters, SoundType};

const INDEX_FILE: &str = "index.json";
const SOUNDS_DIR: &str = "sounds";
const INDEX_VERSION: u32 = 1;
/// Hex characters kept from the SHA-256 of a record when deriving an id.
const DERIVED_ID_LEN: usize = 12;

/// A stored sound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundRecord {
    /// Empty on insert means "derive one from the content".
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// The sound this one was generated from.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "parentId")]
    pub parent_id: Option<String>,
    /// Seed of the variation batch that produced this sound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub parameters: SoundParameters,
}

impl SoundRecord {
    pub fn new(name: impl Into<String>, parameters: SoundParameters) -> Self {
        SoundRecord {
            id: String::new(),
            name: name.into(),
            tags: Vec::new(),
            parent_id: None,
            seed: None,
            parameters,
        }
    }
}

/// Catalog entry: enough to list and filter without opening each record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub sound_type: SoundType,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "parentId")]
    pub parent_id: Option<String>,
}

impl From<&SoundRecord> for IndexEntry {
    fn from(record: &SoundRecord) -> Self {
        IndexEntry {
            id: record.id.clone(),
            name: record.name.clone(),
            sound_type: record.parameters.sound_type(),
            tags: record.tags.clone(),
            parent_id: record.parent_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SoundIndex {
    version: u32,
    sounds: Vec<IndexEntry>,
}

impl Default for SoundIndex {
    fn default() -> Self {
        SoundIndex {
            version: INDEX_VERSION,
            sounds: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SoundStore {
    root: PathBuf,
}

impl SoundStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SfxError> {
        let root = root.into();
        fs::create_dir_all(root.join(SOUNDS_DIR))?;
        let store = SoundStore { root };
        if !store.index_path().exists() {
            store.write_index(&SoundIndex::default())?;
        }
        debug!(root = %store.root.display(), "opened sound store");
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate and persist `record`, replacing any record with the same id.
    /// Returns the record's id.
    pub fn add(&self, mut record: SoundRecord) -> Result<String, SfxError> {
        record.parameters.validate()?;
        if record.id.is_empty() {
            record.id = derive_id(&record)?;
        }
        let path = self.record_path(&record.id)?;
        let existed = path.exists();
        fs::write(&path, serde_json::to_string_pretty(&record)?)?;

        // A new record file must not outlive a failed index update.
        if let Err(e) = self.index_record(&record) {
            if !existed {
                let _ = fs::remove_file(&path);
            }
            return Err(e);
        }

        info!(id = %record.id, name = %record.name, "stored sound");
        Ok(record.id)
    }

    pub fn get(&self, id: &str) -> Result<SoundRecord, SfxError> {
        let path = self.record_path(id)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SfxError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list(&self) -> Result<Vec<IndexEntry>, SfxError> {
        Ok(self.read_index()?.sounds)
    }

    pub fn remove(&self, id: &str) -> Result<(), SfxError> {
        let path = self.record_path(id)?;
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SfxError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        let mut index = self.read_index()?;
        index.sounds.retain(|e| e.id != id);
        self.write_index(&index)?;

        info!(id, "removed sound");
        Ok(())
    }

    /// Store generated variants of `parent_id`, named after the parent.
    pub fn add_variants(
        &self,
        parent_id: &str,
        variants: Vec<SoundParameters>,
        seed: Option<u64>,
    ) -> Result<Vec<String>, SfxError> {
        let parent = self.get(parent_id)?;
        let mut tags = parent.tags.clone();
        if !tags.iter().any(|t| t == "variant") {
            tags.push("variant".to_string());
        }

        variants
            .into_iter()
            .enumerate()
            .map(|(i, parameters)| {
                self.add(SoundRecord {
                    id: String::new(),
                    name: format!("{} #{}", parent.name, i + 1),
                    tags: tags.clone(),
                    parent_id: Some(parent.id.clone()),
                    seed,
                    parameters,
                })
            })
            .collect()
    }

    fn index_record(&self, record: &SoundRecord) -> Result<(), SfxError> {
        let mut index = self.read_index()?;
        let entry = IndexEntry::from(record);
        match index.sounds.iter_mut().find(|e| e.id == record.id) {
            Some(existing) => *existing = entry,
            None => index.sounds.push(entry),
        }
        self.write_index(&index)
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn record_path(&self, id: &str) -> Result<PathBuf, SfxError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SfxError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(SOUNDS_DIR).join(format!("{id}.json")))
    }

    fn read_index(&self) -> Result<SoundIndex, SfxError> {
        let text = fs::read_to_string(self.index_path())?;
        Ok(serde_json::from_str(&text)?)
    }

    fn write_index(&self, index: &SoundIndex) -> Result<(), SfxError> {
        fs::write(self.index_path(), serde_json::to_string_pretty(index)?)?;
        Ok(())
    }
}

/// Content-derived id: leading hex digits of the SHA-256 of the record JSON.
fn derive_id(record: &SoundRecord) -> Result<String, SfxError> {
    let digest = Sha256::digest(serde_json::to_vec(record)?);
    let hex = format!("{digest:x}");
    Ok(hex[..DERIVED_ID_LEN].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::{Voice, all_effects_off};
    use crate::variation::{VariationGenerator, VariationPreset};

    /// Fresh store in a per-test temp directory.
    fn temp_store(name: &str) -> SoundStore {
        let dir = std::env::temp_dir().join(format!("sfx-store-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        SoundStore::open(dir).unwrap()
    }

    fn cleanup(store: SoundStore) {
        let _ = fs::remove_dir_all(store.root());
    }

    fn beep() -> SoundRecord {
        let mut params = SoundParameters::new(Voice::bare(SoundType::Tone), 800.0, 0.3);
        params.effects = Some(all_effects_off());
        let mut record = SoundRecord::new("Beep", params);
        record.tags = vec!["ui".to_string()];
        record
    }

    #[test]
    fn add_get_roundtrip() {
        let store = temp_store("roundtrip");
        let id = store.add(beep()).unwrap();
        assert_eq!(id.len(), DERIVED_ID_LEN);

        let loaded = store.get(&id).unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.name, "Beep");
        assert_eq!(loaded.parameters, beep().parameters);
        cleanup(store);
    }

    #[test]
    fn explicit_id_replaces_entry() {
        let store = temp_store("replace");
        let mut record = beep();
        record.id = "ok-beep".to_string();
        store.add(record.clone()).unwrap();
        record.name = "Beep 2".to_string();
        store.add(record).unwrap();

        let entries = store.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Beep 2");
        assert_eq!(entries[0].sound_type, SoundType::Tone);
        cleanup(store);
    }

    #[test]
    fn remove_and_missing() {
        let store = temp_store("remove");
        let id = store.add(beep()).unwrap();
        store.remove(&id).unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(matches!(store.get(&id), Err(SfxError::NotFound(_))));
        assert!(matches!(store.remove(&id), Err(SfxError::NotFound(_))));
        cleanup(store);
    }

    #[test]
    fn rejects_path_like_ids() {
        let store = temp_store("ids");
        assert!(matches!(store.get("../index"), Err(SfxError::InvalidId(_))));
        let mut record = beep();
        record.id = "a/b".to_string();
        assert!(matches!(store.add(record), Err(SfxError::InvalidId(_))));
        cleanup(store);
    }

    #[test]
    fn rejects_invalid_parameters() {
        let store = temp_store("invalid");
        let mut record = beep();
        record.parameters.duration = -1.0;
        assert!(matches!(store.add(record), Err(SfxError::InvalidSound(_))));
        assert!(store.list().unwrap().is_empty());
        cleanup(store);
    }

    #[test]
    fn failed_index_update_leaves_no_record() {
        let store = temp_store("orphan");
        let index = store.root().join(INDEX_FILE);
        fs::remove_file(&index).unwrap();
        fs::create_dir(&index).unwrap();

        assert!(matches!(store.add(beep()), Err(SfxError::Io(_))));
        let records = fs::read_dir(store.root().join(SOUNDS_DIR)).unwrap().count();
        assert_eq!(records, 0);
        cleanup(store);
    }

    #[test]
    fn variants_link_to_parent() {
        let store = temp_store("variants");
        let parent_id = store.add(beep()).unwrap();
        let parent = store.get(&parent_id).unwrap();
        let config = VariationPreset::Moderate.params();
        let variants =
            VariationGenerator::seeded(&parent.parameters, &config, 12).generate_batch(3);

        let ids = store.add_variants(&parent_id, variants, Some(12)).unwrap();
        assert_eq!(ids.len(), 3);
        for (i, id) in ids.iter().enumerate() {
            let record = store.get(id).unwrap();
            assert_eq!(record.parent_id.as_deref(), Some(parent_id.as_str()));
            assert_eq!(record.seed, Some(12));
            assert_eq!(record.name, format!("Beep #{}", i + 1));
            assert!(record.tags.contains(&"variant".to_string()));
        }
        assert_eq!(store.list().unwrap().len(), 4);
        cleanup(store);
    }

    #[test]
    fn reopen_keeps_index() {
        let store = temp_store("reopen");
        let id = store.add(beep()).unwrap();
        let reopened = SoundStore::open(store.root().to_path_buf()).unwrap();
        assert_eq!(reopened.list().unwrap()[0].id, id);
        cleanup(store);
    }
}
