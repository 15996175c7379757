//! Domain models for recipe management.
//!
//! This module contains the core domain types including recipes, their
//! ingredients, the equipment description, validation and configuration.

/// Recipe domain model.
pub mod recipe;
pub use recipe::{Recipe, RecipeData, RemovedIngredient};

/// Ingredient sub-entities and their enumerated properties.
pub mod ingredient;
pub use ingredient::{
    AdditionalIngredient, Grain, Hop, HopFormat, UnknownVariantError, Yeast, YeastType,
};

mod equipment;
pub use equipment::Equipment;

pub mod color;
pub use color::BeerColor;

pub mod ingredient_list;

pub mod stats;

pub mod validation;
pub use validation::{FieldError, ValidationErrors};

mod config;
pub use config::Config;
