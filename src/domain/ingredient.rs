use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A grain or other fermentable sugar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grain {
    /// Stable identifier, unique within the recipe.
    pub id: Uuid,
    /// Name of the grain, e.g. "Pale Malt".
    pub name: String,
    /// Weight in grams.
    pub weight: f64,
}

impl Grain {
    /// Creates a grain with a freshly minted id.
    #[must_use]
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            weight,
        }
    }
}

/// The physical form hops are supplied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HopFormat {
    /// Compressed pellets (type 90 and similar).
    #[default]
    Pellets,
    /// Whole cones.
    Cones,
    /// Liquid or resin extract.
    Extract,
    /// Anything else.
    Other,
}

impl HopFormat {
    /// Every permitted hop format, in declaration order.
    pub const ALL: [Self; 4] = [Self::Pellets, Self::Cones, Self::Extract, Self::Other];

    /// The canonical name, as stored and as requested from the model.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pellets => "Pellets",
            Self::Cones => "Cones",
            Self::Extract => "Extract",
            Self::Other => "Other",
        }
    }
}

/// A hop addition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hop {
    /// Stable identifier, unique within the recipe.
    pub id: Uuid,
    /// Hop variety, e.g. "Citra".
    pub name: String,
    /// Weight in grams.
    pub weight: f64,
    /// Physical form of the hops.
    pub format: HopFormat,
    /// Alpha-acid content as a percentage (0-100).
    pub alpha_acid: f64,
}

impl Hop {
    /// Creates a hop with a freshly minted id.
    #[must_use]
    pub fn new(name: impl Into<String>, weight: f64, format: HopFormat, alpha_acid: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            weight,
            format,
            alpha_acid,
        }
    }
}

/// Broad yeast family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum YeastType {
    /// Top-fermenting ale yeast.
    #[default]
    Ale,
    /// Bottom-fermenting lager yeast.
    Lager,
    /// Wild yeast and mixed cultures.
    Wild,
    /// Anything else.
    Other,
}

impl YeastType {
    /// Every permitted yeast type, in declaration order.
    pub const ALL: [Self; 4] = [Self::Ale, Self::Lager, Self::Wild, Self::Other];

    /// The canonical name, as stored and as requested from the model.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ale => "Ale",
            Self::Lager => "Lager",
            Self::Wild => "Wild",
            Self::Other => "Other",
        }
    }
}

/// The yeast pitched into the wort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Yeast {
    /// Stable identifier, unique within the recipe.
    pub id: Uuid,
    /// Strain name, e.g. "US-05".
    pub name: String,
    /// Yeast family.
    #[serde(rename = "type")]
    pub kind: YeastType,
    /// Grams for dry yeast, or a count (packs, vials) for liquid yeast.
    pub weight: f64,
}

impl Yeast {
    /// Creates a yeast entry with a freshly minted id.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: YeastType, weight: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            weight,
        }
    }
}

/// Spices, fruit, finings, salts and anything else added to the brew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalIngredient {
    /// Stable identifier, unique within the recipe.
    pub id: Uuid,
    /// Name of the ingredient, e.g. "Irish Moss".
    pub name: String,
    /// Weight in grams, or a representative count when grams do not apply.
    pub weight: f64,
    /// Free-text clarifier, e.g. "zest" or "1 tablet".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AdditionalIngredient {
    /// Creates an additional ingredient with a freshly minted id.
    #[must_use]
    pub fn new(name: impl Into<String>, weight: f64, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            weight,
            description,
        }
    }
}

/// A string did not name a member of an enumerated value set.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid {kind} '{value}': expected one of {expected}")]
pub struct UnknownVariantError {
    kind: &'static str,
    value: String,
    expected: String,
}

fn parse_variant<T: Copy>(
    kind: &'static str,
    value: &str,
    all: &[T],
    name: impl Fn(T) -> &'static str,
) -> Result<T, UnknownVariantError> {
    all.iter()
        .copied()
        .find(|candidate| name(*candidate).eq_ignore_ascii_case(value.trim()))
        .ok_or_else(|| UnknownVariantError {
            kind,
            value: value.to_string(),
            expected: all.iter().map(|v| name(*v)).collect::<Vec<_>>().join(", "),
        })
}

impl FromStr for HopFormat {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("hop format", s, &Self::ALL, Self::as_str)
    }
}

impl fmt::Display for HopFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YeastType {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("yeast type", s, &Self::ALL, Self::as_str)
    }
}

impl fmt::Display for YeastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop_format_parses_case_insensitively() {
        assert_eq!("pellets".parse::<HopFormat>().unwrap(), HopFormat::Pellets);
        assert_eq!(" CONES ".parse::<HopFormat>().unwrap(), HopFormat::Cones);
    }

    #[test]
    fn unknown_hop_format_is_rejected() {
        let error = "Powder".parse::<HopFormat>().unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid hop format 'Powder': expected one of Pellets, Cones, Extract, Other"
        );
    }

    #[test]
    fn yeast_type_round_trips_through_display() {
        for kind in YeastType::ALL {
            assert_eq!(kind.to_string().parse::<YeastType>().unwrap(), kind);
        }
    }

    #[test]
    fn yeast_serializes_kind_as_type() {
        let yeast = Yeast::new("US-05", YeastType::Ale, 11.5);
        let json = serde_json::to_value(&yeast).unwrap();
        assert_eq!(json["type"], "Ale");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn hop_uses_camel_case_alpha_acid() {
        let hop = Hop::new("Citra", 50.0, HopFormat::Pellets, 12.5);
        let json = serde_json::to_value(&hop).unwrap();
        assert_eq!(json["alphaAcid"], 12.5);
        assert_eq!(json["format"], "Pellets");
    }

    #[test]
    fn deserializing_an_unknown_enum_value_fails() {
        let json = r#"{"id":"7d4f3a52-2a4c-4c41-9a57-1f0a2b3c4d5e","name":"Citra","weight":50,"format":"Powder","alphaAcid":12}"#;
        assert!(serde_json::from_str::<Hop>(json).is_err());
    }
}
