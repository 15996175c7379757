//! The local recipe store.
//!
//! [`RecipeStore`] holds the recipe collection and the equipment description
//! in memory and mirrors every change to a [`Backend`] as a whole-collection
//! JSON snapshot. A store is opened once per process and handed to whatever
//! needs it; there is no global instance.

use std::{collections::HashSet, io};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{Equipment, Recipe, RecipeData},
    storage::Backend,
};

/// Storage key of the recipe collection snapshot.
pub const RECIPES_KEY: &str = "brewmate-recipes-storage";
/// Storage key of the equipment snapshot.
pub const EQUIPMENT_KEY: &str = "brewmate-equipment-storage";

#[derive(Serialize)]
struct RecipesSnapshotRef<'a> {
    recipes: &'a [Recipe],
}

#[derive(Deserialize)]
struct RecipesSnapshot {
    #[serde(default)]
    recipes: Vec<Recipe>,
}

#[derive(Serialize)]
struct EquipmentSnapshotRef<'a> {
    equipment: &'a Equipment,
}

#[derive(Deserialize)]
struct EquipmentSnapshot {
    #[serde(default)]
    equipment: Equipment,
}

/// A store of recipes, mirrored to durable storage.
#[derive(Debug)]
pub struct RecipeStore<B> {
    backend: B,
    recipes: Vec<Recipe>,
    equipment: Equipment,
}

impl<B: Backend> RecipeStore<B> {
    /// Open the store, reading any previously saved snapshots.
    ///
    /// Missing snapshots yield an empty collection and a blank equipment
    /// description.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - a snapshot cannot be read from the backend
    /// - a snapshot is not valid JSON of the expected shape
    /// - two stored recipes share an id
    pub fn open(backend: B) -> Result<Self, LoadError> {
        let recipes = match read_blob(&backend, RECIPES_KEY)? {
            Some(blob) => {
                serde_json::from_str::<RecipesSnapshot>(&blob)
                    .map_err(|source| LoadError::Corrupt {
                        key: RECIPES_KEY,
                        source,
                    })?
                    .recipes
            }
            None => Vec::new(),
        };

        let mut seen = HashSet::with_capacity(recipes.len());
        if let Some(duplicate) = recipes.iter().find(|recipe| !seen.insert(recipe.id)) {
            return Err(LoadError::DuplicateId(duplicate.id));
        }

        let equipment = match read_blob(&backend, EQUIPMENT_KEY)? {
            Some(blob) => {
                serde_json::from_str::<EquipmentSnapshot>(&blob)
                    .map_err(|source| LoadError::Corrupt {
                        key: EQUIPMENT_KEY,
                        source,
                    })?
                    .equipment
            }
            None => Equipment::default(),
        };

        tracing::debug!("Opened store with {} recipes", recipes.len());

        Ok(Self {
            backend,
            recipes,
            equipment,
        })
    }

    /// Add a new recipe.
    ///
    /// A fresh id and the current time are assigned, the recipe is appended
    /// to the collection and the collection is saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be saved. The recipe is not
    /// added in that case.
    pub fn add(&mut self, data: RecipeData) -> Result<Recipe, SaveError> {
        let recipe = Recipe::new(data);
        self.recipes.push(recipe.clone());

        if let Err(e) = self.save_recipes() {
            self.recipes.pop();
            return Err(e);
        }

        tracing::info!("Added recipe {} ({})", recipe.id(), recipe.data.name);
        Ok(recipe)
    }

    /// Replace the stored recipe with the same id.
    ///
    /// The stored creation timestamp is kept, whatever `recipe` carries.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - no stored recipe has the given id (nothing is inserted)
    /// - the collection cannot be saved (the previous version is kept)
    pub fn update(&mut self, mut recipe: Recipe) -> Result<&Recipe, UpdateError> {
        let index = self
            .index_of(recipe.id)
            .ok_or(UpdateError::NotFound(recipe.id))?;

        recipe.created_at = self.recipes[index].created_at;
        let previous = std::mem::replace(&mut self.recipes[index], recipe);

        if let Err(e) = self.save_recipes() {
            self.recipes[index] = previous;
            return Err(e.into());
        }

        let updated = &self.recipes[index];
        tracing::info!("Updated recipe {} ({})", updated.id(), updated.data.name);
        Ok(updated)
    }

    /// Delete the recipe with the given id.
    ///
    /// Returns the removed recipe, or `None` if no recipe had that id (in
    /// which case nothing is written).
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be saved. The recipe is not
    /// removed in that case.
    pub fn delete(&mut self, id: Uuid) -> Result<Option<Recipe>, SaveError> {
        let Some(index) = self.index_of(id) else {
            tracing::debug!("Nothing to delete for {id}");
            return Ok(None);
        };

        let removed = self.recipes.remove(index);

        if let Err(e) = self.save_recipes() {
            self.recipes.insert(index, removed);
            return Err(e);
        }

        tracing::info!("Deleted recipe {} ({})", removed.id(), removed.data.name);
        Ok(Some(removed))
    }

    /// Look up a recipe by id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    /// Look up a recipe by its full id or an unambiguous prefix of it.
    ///
    /// # Errors
    ///
    /// Returns an error if no recipe matches, or if the prefix matches more
    /// than one recipe.
    pub fn resolve(&self, id_or_prefix: &str) -> Result<&Recipe, ResolveError> {
        let needle = id_or_prefix.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Err(ResolveError::NotFound(id_or_prefix.to_string()));
        }

        if let Ok(id) = Uuid::parse_str(&needle) {
            return self
                .get(id)
                .ok_or_else(|| ResolveError::NotFound(id_or_prefix.to_string()));
        }

        let mut matches = self
            .recipes
            .iter()
            .filter(|recipe| recipe.id.to_string().starts_with(&needle));

        match (matches.next(), matches.count()) {
            (Some(recipe), 0) => Ok(recipe),
            (Some(_), others) => Err(ResolveError::Ambiguous {
                prefix: id_or_prefix.to_string(),
                count: others + 1,
            }),
            (None, _) => Err(ResolveError::NotFound(id_or_prefix.to_string())),
        }
    }

    /// All recipes, in insertion order.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// All recipes, newest first.
    ///
    /// Recipes without a creation timestamp sort last. Ties keep insertion
    /// order.
    #[must_use]
    pub fn sorted_newest_first(&self) -> Vec<&Recipe> {
        let mut recipes: Vec<_> = self.recipes.iter().collect();
        recipes.sort_by(|a, b| Recipe::newest_first(a, b));
        recipes
    }

    /// The number of stored recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the store holds no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// The current equipment description.
    #[must_use]
    pub const fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    /// Replace the equipment description.
    ///
    /// # Errors
    ///
    /// Returns an error if the description cannot be saved. The previous
    /// description is kept in that case.
    pub fn set_equipment(&mut self, equipment: Equipment) -> Result<(), SaveError> {
        let previous = std::mem::replace(&mut self.equipment, equipment);

        let saved = serde_json::to_string(&EquipmentSnapshotRef {
            equipment: &self.equipment,
        })
        .map_err(SaveError::from)
        .and_then(|blob| Ok(self.backend.save(EQUIPMENT_KEY, &blob)?));

        if let Err(e) = saved {
            self.equipment = previous;
            return Err(e);
        }

        tracing::info!("Updated equipment description");
        Ok(())
    }

    /// The backend this store writes to.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    fn index_of(&self, id: Uuid) -> Option<usize> {
        self.recipes.iter().position(|recipe| recipe.id == id)
    }

    fn save_recipes(&mut self) -> Result<(), SaveError> {
        let blob = serde_json::to_string(&RecipesSnapshotRef {
            recipes: &self.recipes,
        })?;
        self.backend.save(RECIPES_KEY, &blob)?;
        Ok(())
    }
}

fn read_blob<B: Backend>(backend: &B, key: &'static str) -> Result<Option<String>, LoadError> {
    backend
        .load(key)
        .map_err(|source| LoadError::Io { key, source })
}

/// The store could not be opened.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A snapshot could not be read.
    #[error("failed to read '{key}': {source}")]
    Io {
        /// The storage key being read.
        key: &'static str,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// A snapshot could not be parsed.
    #[error("stored '{key}' is corrupt: {source}")]
    Corrupt {
        /// The storage key being parsed.
        key: &'static str,
        /// The underlying parse error.
        source: serde_json::Error,
    },
    /// Two stored recipes share an id.
    #[error("stored recipes contain duplicate id {0}")]
    DuplicateId(Uuid),
}

/// A change could not be written to durable storage.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The snapshot could not be serialized.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The snapshot could not be written.
    #[error("failed to write snapshot: {0}")]
    Io(#[from] io::Error),
}

/// A recipe could not be updated.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// No stored recipe has this id.
    #[error("recipe {0} not found")]
    NotFound(Uuid),
    /// The change could not be saved.
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// A recipe reference could not be resolved.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Nothing matches.
    #[error("recipe '{0}' not found")]
    NotFound(String),
    /// The prefix matches several recipes.
    #[error("'{prefix}' matches {count} recipes; use more characters")]
    Ambiguous {
        /// The prefix as given.
        prefix: String,
        /// How many recipes it matches.
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    use super::*;
    use crate::{
        domain::{Grain, Hop, HopFormat, Yeast, YeastType},
        storage::{FileBackend, MemoryBackend},
    };

    fn pale_ale(name: &str) -> RecipeData {
        RecipeData {
            name: name.to_string(),
            style: "Pale Ale".to_string(),
            volume: 20.0,
            grains: vec![Grain::new("Pale Malt", 5000.0)],
            hops: vec![Hop::new("Citra", 50.0, HopFormat::Pellets, 12.5)],
            yeast: Some(Yeast::new("US-05", YeastType::Ale, 11.5)),
            ..RecipeData::default()
        }
    }

    fn empty_store() -> RecipeStore<MemoryBackend> {
        RecipeStore::open(MemoryBackend::new()).unwrap()
    }

    /// A backend whose writes always fail.
    #[derive(Debug, Default)]
    struct ReadOnly;

    impl Backend for ReadOnly {
        fn load(&self, _key: &str) -> io::Result<Option<String>> {
            Ok(None)
        }

        fn save(&mut self, _key: &str, _contents: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    /// A backend that accepts a fixed number of writes, then fails.
    #[derive(Debug)]
    struct FailsAfter {
        inner: MemoryBackend,
        remaining: usize,
    }

    impl FailsAfter {
        fn new(writes: usize) -> Self {
            Self {
                inner: MemoryBackend::new(),
                remaining: writes,
            }
        }
    }

    impl Backend for FailsAfter {
        fn load(&self, key: &str) -> io::Result<Option<String>> {
            self.inner.load(key)
        }

        fn save(&mut self, key: &str, contents: &str) -> io::Result<()> {
            if self.remaining == 0 {
                return Err(io::Error::other("disk full"));
            }
            self.remaining -= 1;
            self.inner.save(key, contents)
        }
    }

    #[test]
    fn add_assigns_unique_id_and_timestamp() {
        let mut store = empty_store();
        let before = Utc::now();

        let first = store.add(pale_ale("One")).unwrap();
        let second = store.add(pale_ale("Two")).unwrap();

        assert_ne!(first.id(), second.id());
        assert!(!first.id().is_nil());
        assert!(first.created_at().unwrap() >= before);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn add_persists_the_collection() {
        let mut store = empty_store();
        let recipe = store.add(pale_ale("One")).unwrap();

        let blob = store.backend().blob(RECIPES_KEY).unwrap();
        let json: serde_json::Value = serde_json::from_str(blob).unwrap();

        assert_eq!(json["recipes"][0]["id"], recipe.id().to_string());
        assert_eq!(json["recipes"][0]["name"], "One");
    }

    #[test]
    fn update_keeps_id_and_created_at() {
        let mut store = empty_store();
        let original = store.add(pale_ale("One")).unwrap();

        let mut edited = original.clone();
        edited.data.notes = Some("Dry hop on day 3".to_string());
        store.update(edited).unwrap();

        let stored = store.get(original.id()).unwrap();
        assert_eq!(stored.id(), original.id());
        assert_eq!(stored.created_at(), original.created_at());
        assert_eq!(stored.data.notes.as_deref(), Some("Dry hop on day 3"));
    }

    #[test]
    fn update_ignores_caller_supplied_created_at() {
        let mut store = empty_store();
        let original = store.add(pale_ale("One")).unwrap();

        let mut edited = original.clone();
        edited.created_at = Some(Utc::now() + Duration::days(30));
        edited.data.name = "Renamed".to_string();
        let updated = store.update(edited).unwrap();

        assert_eq!(updated.created_at(), original.created_at());
        assert_eq!(updated.data.name, "Renamed");
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = empty_store();
        store.add(pale_ale("One")).unwrap();
        let stranger = Recipe::new(pale_ale("Stranger"));

        let error = store.update(stranger.clone()).unwrap_err();

        assert!(matches!(error, UpdateError::NotFound(id) if id == stranger.id()));
        assert_eq!(store.len(), 1);
        assert!(store.get(stranger.id()).is_none());
    }

    #[test]
    fn delete_removes_exactly_one_and_keeps_order() {
        let mut store = empty_store();
        let a = store.add(pale_ale("A")).unwrap();
        let b = store.add(pale_ale("B")).unwrap();
        let c = store.add(pale_ale("C")).unwrap();

        let removed = store.delete(b.id()).unwrap().unwrap();

        assert_eq!(removed.id(), b.id());
        let ids: Vec<_> = store.recipes().iter().map(Recipe::id).collect();
        assert_eq!(ids, [a.id(), c.id()]);
    }

    #[test]
    fn delete_missing_id_is_a_no_op() {
        let mut store = empty_store();
        store.add(pale_ale("A")).unwrap();

        assert!(store.delete(Uuid::new_v4()).unwrap().is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reload_by_id_round_trips_ingredients() {
        let tmp = tempdir().unwrap();
        let data = pale_ale("Citra Pale");

        let id = {
            let mut store = RecipeStore::open(FileBackend::new(tmp.path().to_path_buf())).unwrap();
            store.add(data.clone()).unwrap().id()
        };

        let store = RecipeStore::open(FileBackend::new(tmp.path().to_path_buf())).unwrap();
        let loaded = store.get(id).unwrap();

        assert_eq!(loaded.data.grains, data.grains);
        assert_eq!(loaded.data.hops, data.hops);
        assert_eq!(loaded.data.yeast, data.yeast);
        assert_eq!(loaded.data.hops[0].format, HopFormat::Pellets);
        assert_eq!(loaded.data.hops[0].alpha_acid, 12.5);
    }

    #[test]
    fn equipment_is_replaced_and_persisted() {
        let tmp = tempdir().unwrap();
        {
            let mut store = RecipeStore::open(FileBackend::new(tmp.path().to_path_buf())).unwrap();
            assert!(store.equipment().is_blank());
            store
                .set_equipment(Equipment::new("30 L all-in-one system"))
                .unwrap();
        }

        let store = RecipeStore::open(FileBackend::new(tmp.path().to_path_buf())).unwrap();
        assert_eq!(store.equipment().description, "30 L all-in-one system");
        assert!(store.is_empty());
    }

    #[test]
    fn equipment_snapshot_layout() {
        let mut store = empty_store();
        store.set_equipment(Equipment::new("kettle")).unwrap();

        let blob = store.backend().blob(EQUIPMENT_KEY).unwrap();
        assert_eq!(blob, r#"{"equipment":{"description":"kettle"}}"#);
    }

    #[test]
    fn corrupt_snapshot_fails_to_open() {
        let backend = MemoryBackend::new().with_blob(RECIPES_KEY, "{not json");
        let error = RecipeStore::open(backend).unwrap_err();
        assert!(matches!(error, LoadError::Corrupt { key: RECIPES_KEY, .. }));
    }

    #[test]
    fn duplicate_ids_fail_to_open() {
        let recipe = Recipe::new(pale_ale("Twin"));
        let blob = serde_json::to_string(&RecipesSnapshotRef {
            recipes: &[recipe.clone(), recipe.clone()],
        })
        .unwrap();
        let backend = MemoryBackend::new().with_blob(RECIPES_KEY, blob);

        let error = RecipeStore::open(backend).unwrap_err();

        assert!(matches!(error, LoadError::DuplicateId(id) if id == recipe.id()));
    }

    #[test]
    fn failed_write_leaves_state_unchanged() {
        let mut store = RecipeStore::open(ReadOnly).unwrap();

        assert!(store.add(pale_ale("Lost")).is_err());
        assert!(store.is_empty());

        assert!(store.set_equipment(Equipment::new("kettle")).is_err());
        assert!(store.equipment().is_blank());
    }

    #[test]
    fn failed_update_keeps_previous_version() {
        let mut store = RecipeStore::open(FailsAfter::new(2)).unwrap();
        let first = store.add(pale_ale("First")).unwrap();
        store.add(pale_ale("Second")).unwrap();

        let mut renamed = first.clone();
        renamed.data.name = "Renamed".to_string();
        let error = store.update(renamed).unwrap_err();

        assert!(matches!(error, UpdateError::Save(_)));
        assert_eq!(store.get(first.id()), Some(&first));
        let blob = store.backend().inner.blob(RECIPES_KEY).unwrap();
        assert!(!blob.contains("Renamed"));
    }

    #[test]
    fn failed_delete_restores_position() {
        let mut store = RecipeStore::open(FailsAfter::new(3)).unwrap();
        let ids: Vec<_> = ["One", "Two", "Three"]
            .into_iter()
            .map(|name| store.add(pale_ale(name)).unwrap().id())
            .collect();

        assert!(store.delete(ids[1]).is_err());

        let order: Vec<_> = store.recipes().iter().map(Recipe::id).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn newest_first_puts_missing_timestamps_last() {
        let mut store = empty_store();
        let old = store.add(pale_ale("Old")).unwrap();
        let new = store.add(pale_ale("New")).unwrap();

        let mut legacy = Recipe::new(pale_ale("Legacy"));
        legacy.created_at = None;
        store.recipes.insert(0, legacy.clone());
        store.recipes[1].created_at = Some(Utc::now() - Duration::days(1));

        let order: Vec<_> = store
            .sorted_newest_first()
            .into_iter()
            .map(Recipe::id)
            .collect();

        assert_eq!(order, [new.id(), old.id(), legacy.id()]);
    }

    #[test]
    fn resolve_accepts_full_id_and_prefix() {
        let mut store = empty_store();
        let recipe = store.add(pale_ale("One")).unwrap();
        let full = recipe.id().to_string();

        assert_eq!(store.resolve(&full).unwrap().id(), recipe.id());
        assert_eq!(store.resolve(&full[..8]).unwrap().id(), recipe.id());
        assert_eq!(
            store.resolve(&full.to_uppercase()[..8]).unwrap().id(),
            recipe.id()
        );
    }

    #[test]
    fn resolve_reports_missing_and_ambiguous() {
        let mut store = empty_store();
        for id in [
            "aaaa1111-0000-4000-8000-000000000001",
            "aaaa2222-0000-4000-8000-000000000002",
        ] {
            let mut recipe = Recipe::new(pale_ale("Twin"));
            recipe.id = Uuid::parse_str(id).unwrap();
            store.recipes.push(recipe);
        }

        assert_eq!(
            store.resolve("bbbb"),
            Err(ResolveError::NotFound("bbbb".to_string()))
        );
        assert!(matches!(store.resolve("  "), Err(ResolveError::NotFound(_))));
        assert_eq!(
            store.resolve("aaaa"),
            Err(ResolveError::Ambiguous {
                prefix: "aaaa".to_string(),
                count: 2
            })
        );
        assert_eq!(
            store.resolve("aaaa2").unwrap().id().to_string(),
            "aaaa2222-0000-4000-8000-000000000002"
        );
    }
}
