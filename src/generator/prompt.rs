
use crate::domain::{
    ValidationErrors,
    validation::{validate_query, validate_structured},
};

/// Equipment assumed when the brewer has not described their own.
pub const DEFAULT_EQUIPMENT: &str = "standard homebrewing equipment";

const PREAMBLE: &str = "You are an expert beer recipe generator. Analyze the brewer's request \
below and generate a detailed beer recipe.
If the brewer specifies a style, use that. If not, infer a suitable style.
If specific ingredients or equipment are mentioned, try to incorporate them. If equipment is not \
mentioned, assume standard homebrewing equipment.";

const GUIDANCE: &str = "Provide the output in the structured format defined by the response schema.
Include a recipe name, the detected beer style, structured lists for grains, hops, yeast and \
additional ingredients (if any), step-by-step brewing instructions, original gravity (e.g. \
\"1.050\"), final gravity (e.g. \"1.010\"), color (EBC, e.g. \"12\"), bitterness (IBU, e.g. \
\"35\") and alcohol content (% alc./vol., e.g. \"5.5%\").

- For grains, provide 'name' (string) and 'weight' (number, in grams).
- For hops, provide 'name' (string), 'weight' (number, in grams), 'format' (one of 'Pellets', \
'Cones', 'Extract', 'Other') and 'alphaAcid' (number, e.g. 12.5 for 12.5% AA).
- For yeast, provide 'name' (string), 'type' (one of 'Ale', 'Lager', 'Wild', 'Other') and \
'weight' (number, in grams or units like 1 for one pack).
- For additionalIngredients (optional), provide 'name' (string), 'weight' (number, in grams or \
units) and optionally 'description' (string, e.g. \"for clarity at 15 min boil\").

The recipe name should be creative and reflect the style and key characteristics.
The instructions should be clear, concise and easy to follow for a homebrewer. Do NOT repeat the \
ingredient lists within the instructions; refer to them generally (e.g. \"Add bittering hops\").
Provide the values for OG, FG, EBC, IBU and ABV as strings in the formats shown above.";

/// What the brewer asked for.
///
/// Exactly one shape is used per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrewRequest {
    /// A free-text description of the beer.
    Query(String),
    /// A style with the ingredients and equipment at hand.
    Structured {
        /// The desired style, or blank to let the model choose.
        style: String,
        /// Ingredients available, as free text.
        ingredients: String,
        /// Brewing hardware, as free text. Blank means standard equipment.
        equipment: String,
    },
}

impl BrewRequest {
    /// Check the request carries enough detail to act on.
    ///
    /// # Errors
    ///
    /// Returns the offending fields if a query, or the ingredient list of a
    /// structured request, is too short.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::Query(query) => validate_query(query),
            Self::Structured { ingredients, .. } => validate_structured(ingredients),
        }
    }

    /// Render the full prompt sent to the model.
    #[must_use]
    pub fn render_prompt(&self) -> String {
        format!("{PREAMBLE}\n\n{}\n\n{GUIDANCE}\n", self.describe())
    }

    /// A short description of the request, suitable for recipe notes.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Query(query) => format!("Brewer's request: \"{}\"", query.trim()),
            Self::Structured {
                style,
                ingredients,
                equipment,
            } => {
                let style = match style.trim() {
                    "" => "not specified, choose a suitable one",
                    style => style,
                };
                let equipment = match equipment.trim() {
                    "" => DEFAULT_EQUIPMENT,
                    equipment => equipment,
                };
                format!(
                    "Style: {style}\nAvailable ingredients: {}\nEquipment: {equipment}",
                    ingredients.trim()
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_quoted_in_prompt() {
        let request = BrewRequest::Query("  A crisp Czech pilsner  ".to_string());
        let prompt = request.render_prompt();

        assert!(prompt.starts_with("You are an expert beer recipe generator."));
        assert!(prompt.contains("Brewer's request: \"A crisp Czech pilsner\""));
        assert!(prompt.contains("Do NOT repeat"));
    }

    #[test]
    fn structured_request_defaults_equipment_and_style() {
        let request = BrewRequest::Structured {
            style: String::new(),
            ingredients: "Maris Otter, Fuggles, S-04".to_string(),
            equipment: "   ".to_string(),
        };

        let text = request.describe();

        assert!(text.contains("Style: not specified"));
        assert!(text.contains("Available ingredients: Maris Otter, Fuggles, S-04"));
        assert!(text.ends_with("Equipment: standard homebrewing equipment"));
    }

    #[test]
    fn structured_request_keeps_given_values() {
        let request = BrewRequest::Structured {
            style: "English Bitter".to_string(),
            ingredients: "Maris Otter, Fuggles".to_string(),
            equipment: "Grainfather G30".to_string(),
        };

        let text = request.describe();

        assert!(text.starts_with("Style: English Bitter\n"));
        assert!(text.ends_with("Equipment: Grainfather G30"));
    }

    #[test]
    fn structured_request_needs_ingredients() {
        let request = BrewRequest::Structured {
            style: "Stout".to_string(),
            ingredients: "malt".to_string(),
            equipment: String::new(),
        };

        assert!(request.validate().unwrap_err().has_field("ingredients"));
    }
}
