mod backend;
pub mod store;

pub use backend::{Backend, FileBackend, MemoryBackend};
pub use store::{
    EQUIPMENT_KEY, LoadError, RECIPES_KEY, RecipeStore, ResolveError, SaveError, UpdateError,
};
