//! Validation of recipe values before they are stored.
//!
//! Validation is decoupled from whatever collects the input: callers build a
//! [`RecipeData`] however they like and hand it to [`validate_recipe`], which
//! either accepts it or reports every offending field at once.

use std::{collections::HashSet, fmt, ops::RangeInclusive};

use nonempty::NonEmpty;

use crate::domain::{Equipment, RecipeData};

/// Accepted batch volume, in liters.
pub const VOLUME_RANGE: RangeInclusive<f64> = 0.1..=1000.0;
/// Accepted specific gravity.
pub const GRAVITY_RANGE: RangeInclusive<f64> = 0.9..=1.2;
/// Upper bound for EBC and IBU values.
pub const MAX_COLOR_OR_BITTERNESS: u32 = 200;
/// Accepted alcohol by volume, in percent.
pub const ABV_RANGE: RangeInclusive<f64> = 0.0..=25.0;
/// Accepted alpha-acid percentage.
pub const ALPHA_ACID_RANGE: RangeInclusive<f64> = 0.0..=100.0;
/// Minimum length of free-text descriptions sent to the model.
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Path of the offending field, e.g. `hops[1].alphaAcid`.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field that failed validation, in field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ValidationErrors {
    errors: NonEmpty<FieldError>,
}

impl ValidationErrors {
    /// Iterate over the individual field errors.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// The number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false`; present for symmetry with [`Self::len`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Whether the given field path has an error.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.iter().any(|error| error.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s): ", self.len())?;
        for (i, error) in self.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    fn required(&mut self, field: impl Into<String>, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "is required");
        }
    }

    fn non_negative(&mut self, field: impl Into<String>, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.push(field, format!("must be zero or more, got {value}"));
        }
    }

    fn within(&mut self, field: impl Into<String>, value: f64, range: &RangeInclusive<f64>) {
        if !range.contains(&value) {
            self.push(
                field,
                format!(
                    "must be between {} and {}, got {value}",
                    range.start(),
                    range.end()
                ),
            );
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        match NonEmpty::from_vec(self.errors) {
            Some(errors) => Err(ValidationErrors { errors }),
            None => Ok(()),
        }
    }
}

/// Which rule set a recipe is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rules {
    /// Everything the recipe form enforces.
    Form,
    /// Form rules minus the ones a schema-conforming draft may legitimately
    /// break: empty grain or hop lists and EBC/IBU above the form's cap.
    Draft,
}

/// Check a recipe against the constraints every stored recipe must satisfy.
///
/// # Errors
///
/// Returns every failing field if the recipe is not valid.
pub fn validate_recipe(recipe: &RecipeData) -> Result<(), ValidationErrors> {
    validate(recipe, Rules::Form)
}

/// Check a generated draft before it is stored.
///
/// Drafts skip the form-only rules: a hopless gruit or a sugar-only recipe
/// is a valid answer, as is a stout darker than the form's EBC cap.
///
/// # Errors
///
/// Returns every failing field if the draft is not valid.
pub fn validate_draft(recipe: &RecipeData) -> Result<(), ValidationErrors> {
    validate(recipe, Rules::Draft)
}

fn validate(recipe: &RecipeData, rules: Rules) -> Result<(), ValidationErrors> {
    let mut check = Collector::default();

    check.required("name", &recipe.name);
    check.required("style", &recipe.style);
    check.within("volume", recipe.volume, &VOLUME_RANGE);

    check_statistics(&mut check, recipe, rules);
    check_ingredients(&mut check, recipe, rules);

    check.finish()
}

fn check_statistics(check: &mut Collector, recipe: &RecipeData, rules: Rules) {
    if let Some(gravity) = recipe.initial_gravity {
        check.within("initialGravity", gravity, &GRAVITY_RANGE);
    }
    if let Some(gravity) = recipe.final_gravity {
        check.within("finalGravity", gravity, &GRAVITY_RANGE);
    }
    if rules == Rules::Form {
        for (field, value) in [
            ("colorEBC", recipe.color_ebc),
            ("bitternessIBU", recipe.bitterness_ibu),
        ] {
            if let Some(value) = value.filter(|v| *v > MAX_COLOR_OR_BITTERNESS) {
                check.push(
                    field,
                    format!("must be at most {MAX_COLOR_OR_BITTERNESS}, got {value}"),
                );
            }
        }
    }
    if let Some(abv) = recipe.alcohol_abv {
        check.within("alcoholABV", abv, &ABV_RANGE);
    }
}

fn check_ingredients(check: &mut Collector, recipe: &RecipeData, rules: Rules) {
    if rules == Rules::Form && recipe.grains.is_empty() {
        check.push("grains", "at least one grain or sugar is required");
    }
    for (i, grain) in recipe.grains.iter().enumerate() {
        check.required(format!("grains[{i}].name"), &grain.name);
        check.non_negative(format!("grains[{i}].weight"), grain.weight);
    }

    if rules == Rules::Form && recipe.hops.is_empty() {
        check.push("hops", "at least one hop is required");
    }
    for (i, hop) in recipe.hops.iter().enumerate() {
        check.required(format!("hops[{i}].name"), &hop.name);
        check.non_negative(format!("hops[{i}].weight"), hop.weight);
        check.within(
            format!("hops[{i}].alphaAcid"),
            hop.alpha_acid,
            &ALPHA_ACID_RANGE,
        );
    }

    if let Some(yeast) = &recipe.yeast {
        check.required("yeast.name", &yeast.name);
        check.non_negative("yeast.weight", yeast.weight);
    }

    for (i, extra) in recipe.additional_ingredients.iter().enumerate() {
        check.required(format!("additionalIngredients[{i}].name"), &extra.name);
        check.non_negative(format!("additionalIngredients[{i}].weight"), extra.weight);
    }

    let mut seen = HashSet::new();
    for id in recipe.ingredient_ids() {
        if !seen.insert(id) {
            check.push("ingredients", format!("duplicate ingredient id {id}"));
        }
    }
}

/// Check an equipment description is detailed enough to be useful.
///
/// # Errors
///
/// Returns an error if the description is shorter than
/// [`MIN_DESCRIPTION_LEN`] characters.
pub fn validate_equipment(equipment: &Equipment) -> Result<(), ValidationErrors> {
    let mut check = Collector::default();
    min_length(&mut check, "description", &equipment.description);
    check.finish()
}

/// Check a free-text recipe request is detailed enough to act on.
///
/// # Errors
///
/// Returns an error if the query is shorter than [`MIN_DESCRIPTION_LEN`]
/// characters.
pub fn validate_query(query: &str) -> Result<(), ValidationErrors> {
    let mut check = Collector::default();
    min_length(&mut check, "query", query);
    check.finish()
}

/// Check the ingredient list of a structured request is detailed enough to
/// act on.
///
/// # Errors
///
/// Returns an error if the ingredient list is shorter than
/// [`MIN_DESCRIPTION_LEN`] characters.
pub fn validate_structured(ingredients: &str) -> Result<(), ValidationErrors> {
    let mut check = Collector::default();
    min_length(&mut check, "ingredients", ingredients);
    check.finish()
}

fn min_length(check: &mut Collector, field: &str, value: &str) {
    if value.trim().chars().count() < MIN_DESCRIPTION_LEN {
        check.push(
            field,
            format!("must be at least {MIN_DESCRIPTION_LEN} characters"),
        );
    }
}
