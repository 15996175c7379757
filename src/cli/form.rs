//! The recipe form: `brew new` and `brew edit`.
//!
//! Ingredients are given on the command line as colon-separated specs, e.g.
//! `--hop "Citra:50:pellets:12.5"`. Each parsed spec is appended through the
//! generic list editor, which mints a fresh ingredient id.

use std::{num::ParseFloatError, path::PathBuf, str::FromStr};

use brewmate::{
    AdditionalIngredient, Config, Grain, Hop, HopFormat, RecipeData, Yeast, YeastType,
    domain::{UnknownVariantError, ingredient_list::ListEditor, validation::validate_recipe},
};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, ValueEnum};
use tracing::instrument;
use uuid::Uuid;

use super::{show, terminal::Colorize};

/// An ingredient spec or date given on the command line could not be read.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// An ingredient has the wrong number of `:`-separated parts.
    #[error("expected {expected}, got '{spec}'")]
    Shape {
        /// The accepted layout.
        expected: &'static str,
        /// The text as given.
        spec: String,
    },
    /// A name is blank.
    #[error("ingredient name is blank in '{0}'")]
    BlankName(String),
    /// A numeric part is not a number.
    #[error("'{value}' is not a number")]
    Number {
        /// The offending part.
        value: String,
        /// The underlying parse error.
        source: ParseFloatError,
    },
    /// An enumerated part is not one of its permitted values.
    #[error(transparent)]
    Variant(#[from] UnknownVariantError),
    /// A date is neither `YYYY-MM-DD` nor RFC 3339.
    #[error("invalid date '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    Date(String),
}

const GRAIN_SPEC: &str = "NAME:GRAMS";
const HOP_SPEC: &str = "NAME:GRAMS:FORMAT:ALPHA";
const YEAST_SPEC: &str = "NAME:TYPE:AMOUNT";
const EXTRA_SPEC: &str = "NAME:AMOUNT[:DESCRIPTION]";

fn split<'a>(
    spec: &'a str,
    expected: &'static str,
    min: usize,
    max: usize,
) -> Result<Vec<&'a str>, SpecError> {
    let parts: Vec<&str> = spec.splitn(max, ':').map(str::trim).collect();
    if parts.len() < min {
        return Err(SpecError::Shape {
            expected,
            spec: spec.to_string(),
        });
    }
    if parts[0].is_empty() {
        return Err(SpecError::BlankName(spec.to_string()));
    }
    Ok(parts)
}

fn number(value: &str) -> Result<f64, SpecError> {
    value.parse().map_err(|source| SpecError::Number {
        value: value.to_string(),
        source,
    })
}

/// Parse `NAME:GRAMS`.
pub fn parse_grain(spec: &str) -> Result<Grain, SpecError> {
    let parts = split(spec, GRAIN_SPEC, 2, 2)?;
    Ok(Grain::new(parts[0], number(parts[1])?))
}

/// Parse `NAME:GRAMS:FORMAT:ALPHA`.
pub fn parse_hop(spec: &str) -> Result<Hop, SpecError> {
    let parts = split(spec, HOP_SPEC, 4, 4)?;
    Ok(Hop::new(
        parts[0],
        number(parts[1])?,
        HopFormat::from_str(parts[2])?,
        number(parts[3])?,
    ))
}

/// Parse `NAME:TYPE:AMOUNT`.
pub fn parse_yeast(spec: &str) -> Result<Yeast, SpecError> {
    let parts = split(spec, YEAST_SPEC, 3, 3)?;
    Ok(Yeast::new(
        parts[0],
        YeastType::from_str(parts[1])?,
        number(parts[2])?,
    ))
}

/// Parse `NAME:AMOUNT[:DESCRIPTION]`. The description may itself contain
/// colons.
pub fn parse_extra(spec: &str) -> Result<AdditionalIngredient, SpecError> {
    let parts = split(spec, EXTRA_SPEC, 2, 3)?;
    let description = parts
        .get(2)
        .filter(|d| !d.is_empty())
        .map(ToString::to_string);
    Ok(AdditionalIngredient::new(
        parts[0],
        number(parts[1])?,
        description,
    ))
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, SpecError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|_| SpecError::Date(value.to_string()))
}

/// Scalar recipe fields shared by `new` and `edit`.
#[derive(Debug, Default, Args)]
pub struct RecipeFields {
    /// Name of the beer
    #[arg(long)]
    name: Option<String>,

    /// Style, e.g. "American IPA"
    #[arg(long)]
    style: Option<String>,

    /// Batch volume in liters
    #[arg(long)]
    volume: Option<f64>,

    /// Original gravity, e.g. 1.050
    #[arg(long)]
    og: Option<f64>,

    /// Final gravity, e.g. 1.010
    #[arg(long)]
    fg: Option<f64>,

    /// Colour in EBC
    #[arg(long)]
    ebc: Option<u32>,

    /// Bitterness in IBU
    #[arg(long)]
    ibu: Option<u32>,

    /// Alcohol by volume, in percent
    #[arg(long)]
    abv: Option<f64>,

    /// Brewer's notes
    #[arg(long)]
    notes: Option<String>,

    /// Brewing instructions
    #[arg(long)]
    instructions: Option<String>,

    /// Start of fermentation (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_date)]
    fermentation_start: Option<DateTime<Utc>>,

    /// Bottling date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_date)]
    bottling: Option<DateTime<Utc>>,

    /// Start of conditioning (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_date)]
    conditioning_start: Option<DateTime<Utc>>,

    /// Tasting date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_date)]
    tasting: Option<DateTime<Utc>>,
}

impl RecipeFields {
    /// Overwrite every field that was given.
    fn apply(self, data: &mut RecipeData) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        fn set_some<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }
        // A blank text clears the field.
        fn set_text(slot: &mut Option<String>, value: Option<String>) {
            if let Some(text) = value {
                *slot = Some(text).filter(|t| !t.trim().is_empty());
            }
        }

        set(&mut data.name, self.name);
        set(&mut data.style, self.style);
        set(&mut data.volume, self.volume);
        set_some(&mut data.initial_gravity, self.og);
        set_some(&mut data.final_gravity, self.fg);
        set_some(&mut data.color_ebc, self.ebc);
        set_some(&mut data.bitterness_ibu, self.ibu);
        set_some(&mut data.alcohol_abv, self.abv);
        set_text(&mut data.notes, self.notes);
        set_text(&mut data.instructions, self.instructions);
        set_some(&mut data.fermentation_start_date, self.fermentation_start);
        set_some(&mut data.bottling_date, self.bottling);
        set_some(&mut data.conditioning_start_date, self.conditioning_start);
        set_some(&mut data.tasting_date, self.tasting);
    }
}

/// An optional recipe field that `brew edit --clear` can unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptionalField {
    /// Original gravity
    Og,
    /// Final gravity
    Fg,
    /// Colour in EBC
    Ebc,
    /// Bitterness in IBU
    Ibu,
    /// Alcohol by volume
    Abv,
    /// Brewer's notes
    Notes,
    /// Brewing instructions
    Instructions,
    /// Start of fermentation
    FermentationStart,
    /// Bottling date
    Bottling,
    /// Start of conditioning
    ConditioningStart,
    /// Tasting date
    Tasting,
}

impl OptionalField {
    fn clear(self, data: &mut RecipeData) {
        match self {
            Self::Og => data.initial_gravity = None,
            Self::Fg => data.final_gravity = None,
            Self::Ebc => data.color_ebc = None,
            Self::Ibu => data.bitterness_ibu = None,
            Self::Abv => data.alcohol_abv = None,
            Self::Notes => data.notes = None,
            Self::Instructions => data.instructions = None,
            Self::FermentationStart => data.fermentation_start_date = None,
            Self::Bottling => data.bottling_date = None,
            Self::ConditioningStart => data.conditioning_start_date = None,
            Self::Tasting => data.tasting_date = None,
        }
    }
}

/// Append parsed ingredients, minting a fresh id for each.
fn append_ingredients(
    data: &mut RecipeData,
    grains: Vec<Grain>,
    hops: Vec<Hop>,
    extras: Vec<AdditionalIngredient>,
) {
    let mut editor = ListEditor::new(&mut data.grains);
    for grain in grains {
        editor.append_with(|id| Grain { id, ..grain });
    }
    let mut editor = ListEditor::new(&mut data.hops);
    for hop in hops {
        editor.append_with(|id| Hop { id, ..hop });
    }
    let mut editor = ListEditor::new(&mut data.additional_ingredients);
    for extra in extras {
        editor.append_with(|id| AdditionalIngredient { id, ..extra });
    }
}

#[derive(Debug, Parser)]
#[command(about = "Create a new recipe")]
pub struct New {
    #[command(flatten)]
    fields: RecipeFields,

    /// A grain or sugar, as NAME:GRAMS (repeatable)
    #[arg(long = "grain", value_name = "NAME:GRAMS", value_parser = parse_grain)]
    grains: Vec<Grain>,

    /// A hop addition, as NAME:GRAMS:FORMAT:ALPHA (repeatable)
    #[arg(long = "hop", value_name = "NAME:GRAMS:FORMAT:ALPHA", value_parser = parse_hop)]
    hops: Vec<Hop>,

    /// The yeast, as NAME:TYPE:AMOUNT
    #[arg(long, value_name = "NAME:TYPE:AMOUNT", value_parser = parse_yeast)]
    yeast: Option<Yeast>,

    /// An additional ingredient, as NAME:AMOUNT[:DESCRIPTION] (repeatable)
    #[arg(long = "extra", value_name = "NAME:AMOUNT[:DESCRIPTION]", value_parser = parse_extra)]
    extras: Vec<AdditionalIngredient>,
}

impl New {
    #[instrument(skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let config = Config::load_or_default(&super::config_path(&root));
        let mut store = super::open_store(&root)?;

        let mut data = RecipeData {
            volume: config.default_volume(),
            yeast: self.yeast,
            ..RecipeData::default()
        };
        self.fields.apply(&mut data);
        append_ingredients(&mut data, self.grains, self.hops, self.extras);

        super::ensure_valid(validate_recipe(&data))?;

        let recipe = store.add(data)?;
        println!("{}", format!("✅ Added recipe {}", recipe.id()).success());
        println!();
        print!("{}", show::render(&recipe));
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Edit an existing recipe")]
pub struct Edit {
    /// The recipe id, or an unambiguous prefix of it
    id: String,

    #[command(flatten)]
    fields: RecipeFields,

    /// Append a grain, as NAME:GRAMS (repeatable)
    #[arg(long = "add-grain", value_name = "NAME:GRAMS", value_parser = parse_grain)]
    add_grains: Vec<Grain>,

    /// Append a hop addition, as NAME:GRAMS:FORMAT:ALPHA (repeatable)
    #[arg(long = "add-hop", value_name = "NAME:GRAMS:FORMAT:ALPHA", value_parser = parse_hop)]
    add_hops: Vec<Hop>,

    /// Append an additional ingredient, as NAME:AMOUNT[:DESCRIPTION] (repeatable)
    #[arg(long = "add-extra", value_name = "NAME:AMOUNT[:DESCRIPTION]", value_parser = parse_extra)]
    add_extras: Vec<AdditionalIngredient>,

    /// Replace the yeast, as NAME:TYPE:AMOUNT
    #[arg(long, value_name = "NAME:TYPE:AMOUNT", value_parser = parse_yeast)]
    yeast: Option<Yeast>,

    /// Remove the yeast
    #[arg(long, conflicts_with = "yeast")]
    clear_yeast: bool,

    /// Unset an optional field (repeatable)
    #[arg(long, value_enum, value_name = "FIELD")]
    clear: Vec<OptionalField>,

    /// Remove an ingredient by its id, as shown by `brew show` (repeatable)
    #[arg(long = "remove-ingredient", value_name = "ID")]
    remove: Vec<Uuid>,
}

impl Edit {
    #[instrument(skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = super::open_store(&root)?;
        let mut recipe = store.resolve(&self.id)?.clone();
        let data = &mut recipe.data;

        for id in &self.remove {
            let Some(removed) = data.remove_ingredient(*id) else {
                anyhow::bail!("Recipe has no ingredient {id}");
            };
            tracing::debug!("Removed ingredient {}", removed.name());
        }

        for field in &self.clear {
            field.clear(data);
        }
        self.fields.apply(data);
        append_ingredients(data, self.add_grains, self.add_hops, self.add_extras);
        if self.clear_yeast {
            data.yeast = None;
        } else if let Some(yeast) = self.yeast {
            data.yeast = Some(yeast);
        }

        super::ensure_valid(validate_recipe(data))?;

        let updated = store.update(recipe)?;
        println!("{}", format!("✅ Updated recipe {}", updated.id()).success());
        println!();
        print!("{}", show::render(updated));
        Ok(())
    }
}
