use std::fmt;

use picko_weather::{DayForecast, WeatherSnapshot};
use serde::{Deserialize, Serialize};

/// Youngest supported child age, in years.
pub const MIN_CHILD_AGE: u8 = 1;
/// Oldest supported child age, in years.
pub const MAX_CHILD_AGE: u8 = 10;

/// Clamp an age into the supported range.
pub fn clamp_age(age: u8) -> u8 {
    age.clamp(MIN_CHILD_AGE, MAX_CHILD_AGE)
}

/// Which day a recommendation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Today,
    Tomorrow,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Today, Slot::Tomorrow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
        }
    }

    /// Pick this slot's day out of a snapshot.
    pub fn forecast<'a>(&self, snapshot: &'a WeatherSnapshot) -> &'a DayForecast {
        match self {
            Self::Today => &snapshot.today,
            Self::Tomorrow => &snapshot.tomorrow,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual style preference for clothing suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClothingStyle {
    Boy,
    Girl,
    #[default]
    Neutral,
}

impl ClothingStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boy => "boy",
            Self::Girl => "girl",
            Self::Neutral => "neutral",
        }
    }

    /// Vocabulary the model may pick from for this style.
    pub fn vocabulary(&self) -> Vec<ClothingItem> {
        let mut items = ClothingItem::BASE.to_vec();
        if *self == Self::Girl {
            items.extend_from_slice(&ClothingItem::GIRL_EXTRAS);
        }
        items
    }
}

impl fmt::Display for ClothingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClothingStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boy" => Ok(Self::Boy),
            "girl" => Ok(Self::Girl),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!(
                "unknown clothing style '{}' (expected boy, girl or neutral)",
                other
            )),
        }
    }
}

/// Where an item sits in an outfit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClothingCategory {
    Top,
    Outerwear,
    Bottom,
    Footwear,
    Accessory,
}

impl ClothingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Outerwear => "outerwear",
            Self::Bottom => "bottom",
            Self::Footwear => "footwear",
            Self::Accessory => "accessory",
        }
    }
}

/// Controlled clothing vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClothingItem {
    Tshirt,
    Shirt,
    Sweater,
    Hoodie,
    LightJacket,
    WarmCoat,
    RainJacket,
    Pants,
    Shorts,
    Jeans,
    Boots,
    RainBoots,
    SunHat,
    WarmHat,
    Sunglasses,
    Gloves,
    Dress,
    Skirt,
    Leggings,
}

impl ClothingItem {
    /// Tokens available in every style.
    pub const BASE: [ClothingItem; 16] = [
        Self::Tshirt,
        Self::Shirt,
        Self::Sweater,
        Self::Hoodie,
        Self::LightJacket,
        Self::WarmCoat,
        Self::RainJacket,
        Self::Pants,
        Self::Shorts,
        Self::Jeans,
        Self::Boots,
        Self::RainBoots,
        Self::SunHat,
        Self::WarmHat,
        Self::Sunglasses,
        Self::Gloves,
    ];

    /// Tokens only offered for the girl style.
    pub const GIRL_EXTRAS: [ClothingItem; 3] = [Self::Dress, Self::Skirt, Self::Leggings];

    pub fn token(&self) -> &'static str {
        match self {
            Self::Tshirt => "tshirt",
            Self::Shirt => "shirt",
            Self::Sweater => "sweater",
            Self::Hoodie => "hoodie",
            Self::LightJacket => "light-jacket",
            Self::WarmCoat => "warm-coat",
            Self::RainJacket => "rain-jacket",
            Self::Pants => "pants",
            Self::Shorts => "shorts",
            Self::Jeans => "jeans",
            Self::Boots => "boots",
            Self::RainBoots => "rain-boots",
            Self::SunHat => "sun-hat",
            Self::WarmHat => "warm-hat",
            Self::Sunglasses => "sunglasses",
            Self::Gloves => "gloves",
            Self::Dress => "dress",
            Self::Skirt => "skirt",
            Self::Leggings => "leggings",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::BASE
            .iter()
            .chain(Self::GIRL_EXTRAS.iter())
            .copied()
            .find(|item| item.token() == token)
    }

    pub fn category(&self) -> ClothingCategory {
        match self {
            Self::Tshirt | Self::Shirt | Self::Sweater | Self::Hoodie | Self::Dress => {
                ClothingCategory::Top
            }
            Self::LightJacket | Self::WarmCoat | Self::RainJacket => ClothingCategory::Outerwear,
            Self::Pants | Self::Shorts | Self::Jeans | Self::Skirt | Self::Leggings => {
                ClothingCategory::Bottom
            }
            Self::Boots | Self::RainBoots => ClothingCategory::Footwear,
            Self::SunHat | Self::WarmHat | Self::Sunglasses | Self::Gloves => {
                ClothingCategory::Accessory
            }
        }
    }
}

/// One entry of a recommendation's item list.
///
/// Model output is not validated against the vocabulary, so anything the
/// model invents is carried along as `Unrecognized` and left for display
/// lookup to skip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClothingToken {
    Known(ClothingItem),
    Unrecognized(String),
}

impl ClothingToken {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(item) => item.token(),
            Self::Unrecognized(token) => token,
        }
    }

    pub fn item(&self) -> Option<ClothingItem> {
        match self {
            Self::Known(item) => Some(*item),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<String> for ClothingToken {
    fn from(token: String) -> Self {
        match ClothingItem::from_token(&token) {
            Some(item) => Self::Known(item),
            None => Self::Unrecognized(token),
        }
    }
}

impl From<ClothingToken> for String {
    fn from(token: ClothingToken) -> Self {
        match token {
            ClothingToken::Known(item) => item.token().to_string(),
            ClothingToken::Unrecognized(token) => token,
        }
    }
}

impl From<ClothingItem> for ClothingToken {
    fn from(item: ClothingItem) -> Self {
        Self::Known(item)
    }
}

impl fmt::Display for ClothingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clothing recommendation ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredRecommendation {
    pub summary: String,
    pub clothing_items: Vec<ClothingToken>,
}

impl StructuredRecommendation {
    /// Tokens as plain strings, in order.
    pub fn tokens(&self) -> Vec<&str> {
        self.clothing_items.iter().map(ClothingToken::as_str).collect()
    }
}

/// Recommendations for both slots of one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecommendations {
    pub today: StructuredRecommendation,
    pub tomorrow: StructuredRecommendation,
}

/// Child profile used to personalize recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub child_age: u8,
    pub clothing_style: ClothingStyle,
    pub has_completed_setup: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            child_age: 2,
            clothing_style: ClothingStyle::Neutral,
            has_completed_setup: false,
        }
    }
}

/// Partial preferences update; only `Some` fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferencesUpdate {
    pub child_age: Option<u8>,
    pub clothing_style: Option<ClothingStyle>,
    pub has_completed_setup: Option<bool>,
}

impl UserPreferences {
    /// Apply a partial update, clamping the age.
    pub fn apply(mut self, update: PreferencesUpdate) -> Self {
        if let Some(age) = update.child_age {
            self.child_age = clamp_age(age);
        }
        if let Some(style) = update.clothing_style {
            self.clothing_style = style;
        }
        if let Some(done) = update.has_completed_setup {
            self.has_completed_setup = done;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(ClothingStyle::Boy.vocabulary().len(), 16);
        assert_eq!(ClothingStyle::Neutral.vocabulary().len(), 16);
        let girl = ClothingStyle::Girl.vocabulary();
        assert_eq!(girl.len(), 19);
        assert!(girl.contains(&ClothingItem::Dress));
        assert!(girl.contains(&ClothingItem::Leggings));
    }

    #[test]
    fn test_token_lookup_matches_serde_names() {
        for item in ClothingItem::BASE.iter().chain(ClothingItem::GIRL_EXTRAS.iter()) {
            assert_eq!(ClothingItem::from_token(item.token()), Some(*item));
            let json = serde_json::to_string(item).unwrap();
            assert_eq!(json, format!("\"{}\"", item.token()));
        }
        assert_eq!(ClothingItem::from_token("tutu"), None);
    }

    #[test]
    fn test_unknown_token_passes_through_serde() {
        let tokens: Vec<ClothingToken> = serde_json::from_str(r#"["sun-hat","tutu"]"#).unwrap();
        assert_eq!(tokens[0], ClothingToken::Known(ClothingItem::SunHat));
        assert_eq!(tokens[1], ClothingToken::Unrecognized("tutu".to_string()));
        assert_eq!(serde_json::to_string(&tokens).unwrap(), r#"["sun-hat","tutu"]"#);
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("Girl".parse::<ClothingStyle>().unwrap(), ClothingStyle::Girl);
        assert!("robot".parse::<ClothingStyle>().is_err());
    }

    #[test]
    fn test_preferences_apply_clamps_age() {
        let prefs = UserPreferences::default().apply(PreferencesUpdate {
            child_age: Some(14),
            clothing_style: Some(ClothingStyle::Boy),
            has_completed_setup: None,
        });
        assert_eq!(prefs.child_age, MAX_CHILD_AGE);
        assert_eq!(prefs.clothing_style, ClothingStyle::Boy);
        assert!(!prefs.has_completed_setup);

        let prefs = prefs.apply(PreferencesUpdate {
            child_age: Some(0),
            ..Default::default()
        });
        assert_eq!(prefs.child_age, MIN_CHILD_AGE);
    }

    #[test]
    fn test_default_preferences() {
        let prefs = UserPreferences::default();
        assert_eq!(prefs.child_age, 2);
        assert_eq!(prefs.clothing_style, ClothingStyle::Neutral);
        assert!(!prefs.has_completed_setup);
    }
}
