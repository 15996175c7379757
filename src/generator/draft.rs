use crate::{
    domain::{
        AdditionalIngredient, Grain, Hop, RecipeData, Yeast,
        stats::{parse_gravity, parse_integer, parse_percentage},
    },
    generator::{AiRecipe, BrewRequest},
};

/// Style recorded when the model leaves the style blank.
const FALLBACK_STYLE: &str = "AI style";

impl AiRecipe {
    /// Turn the draft into editable recipe data.
    ///
    /// Every ingredient gets a fresh id. Statistics are parsed from their
    /// string form; anything that cannot be read as a non-negative number is
    /// left unset.
    #[must_use]
    pub fn into_recipe_data(self, volume: f64, notes: Option<String>) -> RecipeData {
        let style = if self.detected_style.trim().is_empty() {
            FALLBACK_STYLE.to_string()
        } else {
            self.detected_style
        };

        RecipeData {
            name: self.recipe_name,
            style,
            volume,
            initial_gravity: parse_gravity(&self.original_gravity),
            final_gravity: parse_gravity(&self.final_gravity),
            color_ebc: parse_integer(&self.color),
            bitterness_ibu: parse_integer(&self.bitterness),
            alcohol_abv: parse_percentage(&self.alcohol_content),
            grains: self
                .grains
                .into_iter()
                .map(|grain| Grain::new(grain.name, grain.weight))
                .collect(),
            hops: self
                .hops
                .into_iter()
                .map(|hop| Hop::new(hop.name, hop.weight, hop.format, hop.alpha_acid))
                .collect(),
            yeast: Some(Yeast::new(
                self.yeast.name,
                self.yeast.kind,
                self.yeast.weight,
            )),
            additional_ingredients: self
                .additional_ingredients
                .into_iter()
                .map(|extra| AdditionalIngredient::new(extra.name, extra.weight, extra.description))
                .collect(),
            notes,
            instructions: Some(self.instructions).filter(|text| !text.trim().is_empty()),
            ..RecipeData::default()
        }
    }

    /// Notes recording where the draft came from.
    #[must_use]
    pub fn provenance(&self, request: &BrewRequest) -> String {
        format!(
            "AI-generated recipe. {}. Detected style: {}.",
            request.describe().replace('\n', "; "),
            self.detected_style.trim()
        )
    }
}
