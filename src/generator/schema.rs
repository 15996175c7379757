//! The shape of a recipe draft as returned by the model.
//!
//! The same shape is described twice: once as Rust types, which are what a
//! reply is parsed into, and once as the JSON schema handed to the model by
//! [`response_schema`]. Parsing is strict, so a reply that drifts from the
//! schema is rejected rather than patched up.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::GenerationError;
use crate::domain::{HopFormat, YeastType};

/// A recipe draft produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AiRecipe {
    /// Creative name for the beer.
    pub recipe_name: String,
    /// The style the model chose or recognised.
    pub detected_style: String,
    /// Grains and fermentable sugars.
    pub grains: Vec<AiGrain>,
    /// Hop additions.
    pub hops: Vec<AiHop>,
    /// The yeast.
    pub yeast: AiYeast,
    /// Spices, fruit, finings and the like.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_ingredients: Vec<AiAdditionalIngredient>,
    /// Brewing steps, without restating the ingredient lists.
    pub instructions: String,
    /// e.g. "1.050"
    pub original_gravity: String,
    /// e.g. "1.010"
    pub final_gravity: String,
    /// EBC, e.g. "12"
    pub color: String,
    /// IBU, e.g. "35"
    pub bitterness: String,
    /// e.g. "5.5%"
    pub alcohol_content: String,
}

/// A grain in a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AiGrain {
    /// Name of the grain.
    pub name: String,
    /// Weight in grams.
    pub weight: f64,
}

/// A hop addition in a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AiHop {
    /// Name of the hop.
    pub name: String,
    /// Weight in grams.
    pub weight: f64,
    /// Physical form.
    pub format: HopFormat,
    /// Alpha-acid percentage.
    pub alpha_acid: f64,
}

/// The yeast in a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AiYeast {
    /// Name of the strain.
    pub name: String,
    /// Broad yeast category.
    #[serde(rename = "type")]
    pub kind: YeastType,
    /// Grams for dry yeast, or a count of packs.
    pub weight: f64,
}

/// An additional ingredient in a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AiAdditionalIngredient {
    /// Name of the ingredient.
    pub name: String,
    /// Weight in grams, or a representative count.
    pub weight: f64,
    /// Use or unit, e.g. "for clarity" or "1 tablet".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AiRecipe {
    /// Parse a model reply, rejecting anything that does not match the
    /// schema.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Nonconforming`] if the reply is not JSON of
    /// the expected shape, or if the recipe has no name.
    pub fn from_json(reply: &str) -> Result<Self, GenerationError> {
        let recipe: Self = serde_json::from_str(reply).map_err(|e| {
            tracing::debug!("Rejected model reply: {reply}");
            GenerationError::Nonconforming(e.to_string())
        })?;

        if recipe.recipe_name.trim().is_empty() {
            return Err(GenerationError::Nonconforming(
                "recipeName is blank".to_string(),
            ));
        }

        Ok(recipe)
    }
}

/// The JSON schema a reply must satisfy, in the `OpenAPI` subset accepted by
/// the Gemini `responseSchema` field.
#[must_use]
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recipeName": text("The name of the generated beer recipe."),
            "detectedStyle": text("The beer style detected or chosen based on the request."),
            "grains": array_of(
                "Grains and fermentable sugars with their weights in grams.",
                grain_schema(),
            ),
            "hops": array_of(
                "Hop additions with weight in grams, format and alpha acid percentage.",
                hop_schema(),
            ),
            "yeast": yeast_schema(),
            "additionalIngredients": array_of(
                "Spices, fruit, finings and other additions.",
                additional_ingredient_schema(),
            ),
            "instructions": text(
                "Step-by-step brewing instructions that do not repeat the ingredient lists."
            ),
            "originalGravity": text("Original gravity, e.g. \"1.050\"."),
            "finalGravity": text("Final gravity, e.g. \"1.010\"."),
            "color": text("Color in EBC, e.g. \"12\"."),
            "bitterness": text("Bitterness in IBU, e.g. \"35\"."),
            "alcoholContent": text("Alcohol by volume, e.g. \"5.5%\".")
        },
        "required": [
            "recipeName",
            "detectedStyle",
            "grains",
            "hops",
            "yeast",
            "instructions",
            "originalGravity",
            "finalGravity",
            "color",
            "bitterness",
            "alcoholContent"
        ]
    })
}

fn text(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn number(description: &str) -> Value {
    json!({ "type": "NUMBER", "description": description })
}

fn array_of(description: &str, items: Value) -> Value {
    json!({ "type": "ARRAY", "description": description, "items": items })
}

fn grain_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": text("Name of the grain or sugar."),
            "weight": number("Weight in grams.")
        },
        "required": ["name", "weight"]
    })
}

fn hop_schema() -> Value {
    let formats: Vec<_> = HopFormat::ALL.iter().map(|f| f.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "name": text("Name of the hop."),
            "weight": number("Weight in grams."),
            "format": { "type": "STRING", "enum": formats, "description": "Form of the hop." },
            "alphaAcid": number("Alpha acid percentage, e.g. 12.5 for 12.5%.")
        },
        "required": ["name", "weight", "format", "alphaAcid"]
    })
}

fn yeast_schema() -> Value {
    let types: Vec<_> = YeastType::ALL.iter().map(|t| t.as_str()).collect();
    json!({
        "type": "OBJECT",
        "description": "The yeast strain, its type and amount.",
        "properties": {
            "name": text("Name of the yeast strain."),
            "type": { "type": "STRING", "enum": types, "description": "Type of yeast." },
            "weight": number(
                "Grams for dry yeast, or a count such as 1 for one pack of liquid yeast."
            )
        },
        "required": ["name", "type", "weight"]
    })
}

fn additional_ingredient_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": text("Name of the ingredient."),
            "weight": number(
                "Weight in grams; if not applicable, a representative count with the unit in the description."
            ),
            "description": text("Use, type or unit, e.g. 'for clarity' or '1 tablet'.")
        },
        "required": ["name", "weight"]
    })
}
