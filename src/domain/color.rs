//! Mapping from EBC colour values to representative beer colours.

use std::fmt;

/// A colour band on the EBC scale, from pale straw to black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeerColor {
    /// Below 6 EBC.
    PaleStraw,
    /// 6 to 9 EBC.
    Straw,
    /// 9 to 12 EBC.
    PaleGold,
    /// 12 to 16 EBC.
    DeepGold,
    /// 16 to 20 EBC.
    PaleAmber,
    /// 20 to 26 EBC.
    MediumAmber,
    /// 26 to 33 EBC.
    DeepAmber,
    /// 33 to 39 EBC.
    Copper,
    /// 39 to 47 EBC.
    LightBrown,
    /// 47 to 57 EBC.
    Brown,
    /// 57 to 69 EBC.
    DarkBrown,
    /// 69 to 79 EBC.
    VeryDarkBrown,
    /// 79 EBC and above.
    Black,
}

/// Exclusive upper bounds, checked in order.
const BANDS: [(f64, BeerColor); 12] = [
    (6.0, BeerColor::PaleStraw),
    (9.0, BeerColor::Straw),
    (12.0, BeerColor::PaleGold),
    (16.0, BeerColor::DeepGold),
    (20.0, BeerColor::PaleAmber),
    (26.0, BeerColor::MediumAmber),
    (33.0, BeerColor::DeepAmber),
    (39.0, BeerColor::Copper),
    (47.0, BeerColor::LightBrown),
    (57.0, BeerColor::Brown),
    (69.0, BeerColor::DarkBrown),
    (79.0, BeerColor::VeryDarkBrown),
];

impl BeerColor {
    /// Colour shown when the EBC value is unknown or invalid.
    pub const FALLBACK: Self = Self::PaleStraw;

    /// Pick the band for an EBC value.
    ///
    /// Missing, negative and NaN values fall back to [`Self::FALLBACK`].
    #[must_use]
    pub fn from_ebc(ebc: Option<f64>) -> Self {
        let Some(ebc) = ebc.filter(|value| *value >= 0.0) else {
            return Self::FALLBACK;
        };
        BANDS
            .iter()
            .find(|(upper, _)| ebc < *upper)
            .map_or(Self::Black, |(_, color)| *color)
    }

    /// The swatch colour as `#RRGGBB`.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::PaleStraw => "#F8F753",
            Self::Straw => "#FBEA51",
            Self::PaleGold => "#FDE14D",
            Self::DeepGold => "#FDCB46",
            Self::PaleAmber => "#F0A942",
            Self::MediumAmber => "#E58C3C",
            Self::DeepAmber => "#D97C36",
            Self::Copper => "#C0602B",
            Self::LightBrown => "#AE502C",
            Self::Brown => "#8B422A",
            Self::DarkBrown => "#6A3423",
            Self::VeryDarkBrown => "#4A2A1E",
            Self::Black => "#2A1D1A",
        }
    }

    /// The swatch colour as RGB components.
    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        let hex = &self.hex()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or_default();
        (channel(0), channel(2), channel(4))
    }

    /// A human-readable band name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PaleStraw => "pale straw",
            Self::Straw => "straw",
            Self::PaleGold => "pale gold",
            Self::DeepGold => "deep gold",
            Self::PaleAmber => "pale amber",
            Self::MediumAmber => "medium amber",
            Self::DeepAmber => "deep amber",
            Self::Copper => "copper",
            Self::LightBrown => "light brown",
            Self::Brown => "brown",
            Self::DarkBrown => "dark brown",
            Self::VeryDarkBrown => "very dark brown",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for BeerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pale_beer_is_pale_straw() {
        assert_eq!(BeerColor::from_ebc(Some(5.0)), BeerColor::PaleStraw);
    }

    #[test]
    fn fifty_ebc_is_brown() {
        let color = BeerColor::from_ebc(Some(50.0));
        assert_eq!(color, BeerColor::Brown);
        assert_eq!(color.hex(), "#8B422A");
    }

    #[test]
    fn unknown_ebc_falls_back() {
        assert_eq!(BeerColor::from_ebc(None), BeerColor::FALLBACK);
        assert_eq!(BeerColor::from_ebc(None).hex(), "#F8F753");
    }

    #[test]
    fn negative_ebc_falls_back() {
        assert_eq!(BeerColor::from_ebc(Some(-1.0)), BeerColor::FALLBACK);
        assert_eq!(BeerColor::from_ebc(Some(f64::NAN)), BeerColor::FALLBACK);
    }

    #[test]
    fn band_bounds_are_exclusive() {
        assert_eq!(BeerColor::from_ebc(Some(5.9)), BeerColor::PaleStraw);
        assert_eq!(BeerColor::from_ebc(Some(6.0)), BeerColor::Straw);
        assert_eq!(BeerColor::from_ebc(Some(78.9)), BeerColor::VeryDarkBrown);
        assert_eq!(BeerColor::from_ebc(Some(79.0)), BeerColor::Black);
        assert_eq!(BeerColor::from_ebc(Some(500.0)), BeerColor::Black);
    }

    #[test]
    fn rgb_decodes_hex() {
        assert_eq!(BeerColor::Brown.rgb(), (0x8B, 0x42, 0x2A));
    }
}
