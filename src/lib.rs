//! Home-brewing recipe management
//!
//! Recipes are kept in a local store backed by JSON snapshots. Drafts can be
//! requested from a language model and turned into recipes.

pub mod domain;
pub use domain::{
    AdditionalIngredient, BeerColor, Config, Equipment, Grain, Hop, HopFormat, Recipe, RecipeData,
    ValidationErrors, Yeast, YeastType,
};

/// Durable storage for recipes and the equipment description.
pub mod storage;
pub use storage::{FileBackend, MemoryBackend, RecipeStore};

pub mod generator;
pub use generator::{BrewRequest, GeminiBackend, GenerationError, RecipeGenerator};
