use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AdditionalIngredient, BeerColor, Grain, Hop, Yeast, ingredient_list::ListEditor,
};

/// A beer recipe as held by the store.
///
/// Identity (`id`) and the creation timestamp are assigned by the store when
/// the recipe is first added and never change afterwards. Everything a user
/// can edit lives in [`RecipeData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub(crate) id: Uuid,
    /// Recipes written by older snapshots may lack a timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) created_at: Option<DateTime<Utc>>,
    /// The editable content of the recipe.
    #[serde(flatten)]
    pub data: RecipeData,
}

impl Recipe {
    pub(crate) fn new(data: RecipeData) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Some(Utc::now()),
            data,
        }
    }

    /// The unique, stable identifier of this recipe.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// When the recipe was first saved.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// The colour band matching this recipe's EBC value.
    #[must_use]
    pub fn beer_color(&self) -> BeerColor {
        BeerColor::from_ebc(self.data.color_ebc.map(f64::from))
    }

    /// Order by creation time, newest first. Recipes without a timestamp
    /// sort last.
    #[must_use]
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        by_created(a, b, |a, b| b.cmp(&a))
    }

    /// Order by creation time, oldest first. Recipes without a timestamp
    /// sort last.
    #[must_use]
    pub fn oldest_first(a: &Self, b: &Self) -> Ordering {
        by_created(a, b, |a, b| a.cmp(&b))
    }
}

fn by_created(
    a: &Recipe,
    b: &Recipe,
    dated: impl FnOnce(DateTime<Utc>, DateTime<Utc>) -> Ordering,
) -> Ordering {
    match (a.created_at, b.created_at) {
        (Some(a), Some(b)) => dated(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The editable content of a recipe.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeData {
    /// Name of the beer.
    pub name: String,
    /// Free-text style, e.g. "American IPA".
    pub style: String,
    /// Batch volume in liters.
    pub volume: f64,
    /// Original (initial) specific gravity, e.g. 1.050.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_gravity: Option<f64>,
    /// Final specific gravity, e.g. 1.010.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_gravity: Option<f64>,
    /// Colour in EBC.
    #[serde(
        default,
        rename = "colorEBC",
        skip_serializing_if = "Option::is_none"
    )]
    pub color_ebc: Option<u32>,
    /// Bitterness in IBU.
    #[serde(
        default,
        rename = "bitternessIBU",
        skip_serializing_if = "Option::is_none"
    )]
    pub bitterness_ibu: Option<u32>,
    /// Alcohol by volume, in percent.
    #[serde(
        default,
        rename = "alcoholABV",
        skip_serializing_if = "Option::is_none"
    )]
    pub alcohol_abv: Option<f64>,
    /// Grains and fermentable sugars, in mash order.
    #[serde(default)]
    pub grains: Vec<Grain>,
    /// Hop additions, in schedule order.
    #[serde(default)]
    pub hops: Vec<Hop>,
    /// The yeast, if one has been chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yeast: Option<Yeast>,
    /// Spices, finings and other additions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_ingredients: Vec<AdditionalIngredient>,
    /// When fermentation started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fermentation_start_date: Option<DateTime<Utc>>,
    /// When the beer was bottled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottling_date: Option<DateTime<Utc>>,
    /// When conditioning started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditioning_start_date: Option<DateTime<Utc>>,
    /// When the beer is (or was) ready for tasting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasting_date: Option<DateTime<Utc>>,
    /// Brewer's notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Step-by-step brewing instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// An ingredient taken out of a recipe by
/// [`RecipeData::remove_ingredient`].
#[derive(Debug, Clone, PartialEq)]
pub enum RemovedIngredient {
    /// A grain was removed.
    Grain(Grain),
    /// A hop addition was removed.
    Hop(Hop),
    /// The yeast was removed.
    Yeast(Yeast),
    /// An additional ingredient was removed.
    Additional(AdditionalIngredient),
}

impl RemovedIngredient {
    /// The name of the removed ingredient.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Grain(grain) => &grain.name,
            Self::Hop(hop) => &hop.name,
            Self::Yeast(yeast) => &yeast.name,
            Self::Additional(extra) => &extra.name,
        }
    }
}

impl RecipeData {
    /// Remove the ingredient with the given id, whichever list it lives in.
    ///
    /// Returns `None` if no ingredient carries that id.
    pub fn remove_ingredient(&mut self, id: Uuid) -> Option<RemovedIngredient> {
        if let Some(grain) = ListEditor::new(&mut self.grains).remove(id) {
            return Some(RemovedIngredient::Grain(grain));
        }
        if let Some(hop) = ListEditor::new(&mut self.hops).remove(id) {
            return Some(RemovedIngredient::Hop(hop));
        }
        if let Some(extra) = ListEditor::new(&mut self.additional_ingredients).remove(id) {
            return Some(RemovedIngredient::Additional(extra));
        }
        if self.yeast.as_ref().is_some_and(|yeast| yeast.id == id) {
            return self.yeast.take().map(RemovedIngredient::Yeast);
        }
        None
    }

    /// Iterate over the ids of every ingredient in the recipe.
    pub fn ingredient_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.grains
            .iter()
            .map(|grain| grain.id)
            .chain(self.hops.iter().map(|hop| hop.id))
            .chain(self.yeast.iter().map(|yeast| yeast.id))
            .chain(self.additional_ingredients.iter().map(|extra| extra.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HopFormat, YeastType};

    fn sample() -> RecipeData {
        RecipeData {
            name: "Citra Pale".to_string(),
            style: "American Pale Ale".to_string(),
            volume: 20.0,
            color_ebc: Some(12),
            bitterness_ibu: Some(35),
            alcohol_abv: Some(5.5),
            grains: vec![Grain::new("Pale Malt", 5000.0)],
            hops: vec![Hop::new("Citra", 50.0, HopFormat::Pellets, 12.5)],
            yeast: Some(Yeast::new("US-05", YeastType::Ale, 11.5)),
            ..RecipeData::default()
        }
    }

    #[test]
    fn undated_recipes_sort_last_both_ways() {
        let mut old = Recipe::new(sample());
        old.created_at = Some(Utc::now() - chrono::Duration::days(1));
        let new = Recipe::new(sample());
        let mut undated = Recipe::new(sample());
        undated.created_at = None;

        assert_eq!(Recipe::newest_first(&new, &old), Ordering::Less);
        assert_eq!(Recipe::oldest_first(&new, &old), Ordering::Greater);
        assert_eq!(Recipe::newest_first(&undated, &old), Ordering::Greater);
        assert_eq!(Recipe::oldest_first(&undated, &old), Ordering::Greater);
        assert_eq!(Recipe::oldest_first(&undated, &undated), Ordering::Equal);
    }

    #[test]
    fn serializes_with_original_field_names() {
        let recipe = Recipe::new(sample());
        let json = serde_json::to_value(&recipe).unwrap();

        assert_eq!(json["id"], recipe.id().to_string());
        assert!(json["createdAt"].is_string());
        assert_eq!(json["colorEBC"], 12);
        assert_eq!(json["bitternessIBU"], 35);
        assert_eq!(json["alcoholABV"], 5.5);
        assert_eq!(json["grains"][0]["name"], "Pale Malt");
        assert!(json.get("additionalIngredients").is_none());
        assert!(json.get("initialGravity").is_none());
    }

    #[test]
    fn deserializes_without_created_at() {
        let json = r#"{
            "id": "7d4f3a52-2a4c-4c41-9a57-1f0a2b3c4d5e",
            "name": "Old Entry",
            "style": "Stout",
            "volume": 10,
            "grains": [],
            "hops": []
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.created_at(), None);
        assert_eq!(recipe.data.name, "Old Entry");
    }

    #[test]
    fn remove_ingredient_finds_each_list() {
        let mut data = sample();
        data.additional_ingredients
            .push(AdditionalIngredient::new("Irish Moss", 5.0, None));

        let hop_id = data.hops[0].id;
        let yeast_id = data.yeast.as_ref().unwrap().id;
        let extra_id = data.additional_ingredients[0].id;

        assert!(matches!(
            data.remove_ingredient(hop_id),
            Some(RemovedIngredient::Hop(_))
        ));
        assert!(matches!(
            data.remove_ingredient(yeast_id),
            Some(RemovedIngredient::Yeast(_))
        ));
        assert!(matches!(
            data.remove_ingredient(extra_id),
            Some(RemovedIngredient::Additional(_))
        ));
        assert!(data.hops.is_empty());
        assert!(data.yeast.is_none());
        assert_eq!(data.grains.len(), 1);
    }

    #[test]
    fn remove_unknown_ingredient_is_a_no_op() {
        let mut data = sample();
        let before = data.clone();
        assert_eq!(data.remove_ingredient(Uuid::new_v4()), None);
        assert_eq!(data, before);
    }

    #[test]
    fn ingredient_ids_cover_all_lists() {
        let data = sample();
        assert_eq!(data.ingredient_ids().count(), 3);
    }

    #[test]
    fn beer_color_follows_ebc() {
        let recipe = Recipe::new(sample());
        assert_eq!(recipe.beer_color(), BeerColor::DeepGold);
    }
}
