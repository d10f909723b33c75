//! Rule-based recommendations used whenever generation or parsing fails.
//!
//! Total over every snapshot: whatever the numbers, the result has a
//! non-empty summary ending in a period and 1-5 distinct items.

use picko_weather::WeatherSnapshot;

use crate::types::ClothingItem::{self, *};
use crate::types::{ClothingToken, Slot, StructuredRecommendation};

/// Maximum number of items the fallback ever returns.
pub const MAX_FALLBACK_ITEMS: usize = 5;

/// Precipitation chance above which rain gear is added.
pub const RAIN_THRESHOLD: u8 = 50;

struct TemperatureBand {
    summary: &'static str,
    items: &'static [ClothingItem],
}

const COLD: TemperatureBand = TemperatureBand {
    summary: "Bundle up in warm layers today.",
    items: &[WarmCoat, Sweater, Pants, WarmHat, Gloves],
};

const CHILLY: TemperatureBand = TemperatureBand {
    summary: "A cozy sweater and jacket will keep them comfortable.",
    items: &[LightJacket, Sweater, Pants, Boots],
};

const MILD: TemperatureBand = TemperatureBand {
    summary: "A light jacket over a shirt is just right.",
    items: &[LightJacket, Shirt, Jeans],
};

const WARM: TemperatureBand = TemperatureBand {
    summary: "Comfortable, breathable clothes for a warm day.",
    items: &[Tshirt, Shorts, SunHat],
};

const HOT: TemperatureBand = TemperatureBand {
    summary: "Keep cool and protected from the sun.",
    items: &[Tshirt, Shorts, SunHat, Sunglasses],
};

/// NaN fails every comparison and lands in the hot band.
fn band_for(avg_temp: f64) -> &'static TemperatureBand {
    if avg_temp < 40.0 {
        &COLD
    } else if avg_temp < 55.0 {
        &CHILLY
    } else if avg_temp < 70.0 {
        &MILD
    } else if avg_temp < 85.0 {
        &WARM
    } else {
        &HOT
    }
}

fn with_rain_expected(summary: &str) -> String {
    let base = summary.trim_end().trim_end_matches('.');
    format!("{} with rain expected.", base)
}

/// Deterministic recommendation for `slot` of `snapshot`.
pub fn fallback(snapshot: &WeatherSnapshot, slot: Slot) -> StructuredRecommendation {
    let day = slot.forecast(snapshot);
    let avg_temp = (day.high + day.low) / 2.0;
    let band = band_for(avg_temp);

    let mut items: Vec<ClothingItem> = band.items.to_vec();
    let mut summary = band.summary.to_string();

    let rainy = day.precipitation_chance > RAIN_THRESHOLD
        || day.description.to_lowercase().contains("rain");
    if rainy {
        items.push(RainJacket);
        items.push(RainBoots);
        summary = with_rain_expected(&summary);
    }

    let mut clothing_items: Vec<ClothingToken> = Vec::with_capacity(MAX_FALLBACK_ITEMS);
    for item in items {
        let token = ClothingToken::Known(item);
        if !clothing_items.contains(&token) {
            clothing_items.push(token);
        }
    }
    clothing_items.truncate(MAX_FALLBACK_ITEMS);

    StructuredRecommendation {
        summary,
        clothing_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picko_weather::{CurrentConditions, DayForecast};

    fn snapshot_with(tomorrow: DayForecast) -> WeatherSnapshot {
        WeatherSnapshot {
            location: "Test".to_string(),
            current: CurrentConditions {
                temperature: 0.0,
                feels_like: 0.0,
                description: String::new(),
                weather_code: 0,
                wind_speed: 0.0,
                humidity: 0,
            },
            today: DayForecast {
                high: 0.0,
                low: 0.0,
                description: String::new(),
                weather_code: 0,
                precipitation_chance: 0,
                wind_speed: 0.0,
            },
            tomorrow,
        }
    }

    fn day(high: f64, low: f64, description: &str, precipitation_chance: u8) -> DayForecast {
        DayForecast {
            high,
            low,
            description: description.to_string(),
            weather_code: 0,
            precipitation_chance,
            wind_speed: 5.0,
        }
    }

    fn tokens_for(high: f64, low: f64, description: &str, precip: u8) -> Vec<String> {
        fallback(&snapshot_with(day(high, low, description, precip)), Slot::Tomorrow)
            .tokens()
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn assert_well_formed(rec: &StructuredRecommendation) {
        assert!(!rec.summary.is_empty());
        assert!(rec.summary.ends_with('.'), "summary: {}", rec.summary);
        assert!((1..=MAX_FALLBACK_ITEMS).contains(&rec.clothing_items.len()));
        for token in rec.tokens() {
            assert!(!token.is_empty());
            assert_eq!(token, token.to_lowercase());
        }
        let mut unique = rec.tokens();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), rec.clothing_items.len());
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(
            tokens_for(39.0, 39.0, "Clear", 0),
            ["warm-coat", "sweater", "pants", "warm-hat", "gloves"]
        );
        assert_eq!(
            tokens_for(40.0, 40.0, "Clear", 0),
            ["light-jacket", "sweater", "pants", "boots"]
        );
        assert_eq!(
            tokens_for(55.0, 55.0, "Clear", 0),
            ["light-jacket", "shirt", "jeans"]
        );
        assert_eq!(
            tokens_for(70.0, 70.0, "Clear", 0),
            ["tshirt", "shorts", "sun-hat"]
        );
        assert_eq!(
            tokens_for(85.0, 85.0, "Clear", 0),
            ["tshirt", "shorts", "sun-hat", "sunglasses"]
        );
    }

    #[test]
    fn test_average_of_high_and_low_selects_band() {
        // avg 54.5 stays chilly, avg 55 is mild
        assert_eq!(tokens_for(60.0, 49.0, "Clear", 0)[1], "sweater");
        assert_eq!(tokens_for(60.0, 50.0, "Clear", 0)[1], "shirt");
    }

    #[test]
    fn test_rain_threshold_is_exclusive() {
        let dry = fallback(&snapshot_with(day(75.0, 65.0, "Overcast", 50)), Slot::Tomorrow);
        assert_eq!(dry.tokens(), ["tshirt", "shorts", "sun-hat"]);
        assert_eq!(dry.summary, "Comfortable, breathable clothes for a warm day.");

        let wet = fallback(&snapshot_with(day(75.0, 65.0, "Overcast", 51)), Slot::Tomorrow);
        assert_eq!(
            wet.tokens(),
            ["tshirt", "shorts", "sun-hat", "rain-jacket", "rain-boots"]
        );
        assert_eq!(
            wet.summary,
            "Comfortable, breathable clothes for a warm day with rain expected."
        );
    }

    #[test]
    fn test_rain_in_description_triggers_rain_gear() {
        let rec = fallback(&snapshot_with(day(60.0, 50.0, "Light RAIN", 0)), Slot::Tomorrow);
        assert_eq!(
            rec.tokens(),
            ["light-jacket", "shirt", "jeans", "rain-jacket", "rain-boots"]
        );
        assert!(rec.summary.ends_with("with rain expected."));
    }

    #[test]
    fn test_cold_snow_with_precipitation_truncates_rain_gear() {
        let rec = fallback(&snapshot_with(day(38.0, 28.0, "Light Snow", 70)), Slot::Tomorrow);
        assert_eq!(
            rec.tokens(),
            ["warm-coat", "sweater", "pants", "warm-hat", "gloves"]
        );
        assert_eq!(rec.summary, "Bundle up in warm layers today with rain expected.");
    }

    #[test]
    fn test_hot_with_rain_truncates_to_five() {
        let rec = fallback(&snapshot_with(day(95.0, 80.0, "Showers", 90)), Slot::Tomorrow);
        assert_eq!(
            rec.tokens(),
            ["tshirt", "shorts", "sun-hat", "sunglasses", "rain-jacket"]
        );
    }

    #[test]
    fn test_uses_requested_slot() {
        let mut snapshot = snapshot_with(day(95.0, 85.0, "Clear", 0));
        snapshot.today = day(20.0, 10.0, "Clear", 0);
        assert_eq!(
            fallback(&snapshot, Slot::Today).clothing_items[0],
            ClothingToken::Known(WarmCoat)
        );
        assert_eq!(
            fallback(&snapshot, Slot::Tomorrow).clothing_items[0],
            ClothingToken::Known(Tshirt)
        );
    }

    #[test]
    fn test_non_finite_averages_follow_comparison_chain() {
        assert_eq!(band_for(f64::NEG_INFINITY).summary, COLD.summary);
        assert_eq!(band_for(f64::INFINITY).summary, HOT.summary);
        assert_eq!(band_for(f64::NAN).summary, HOT.summary);

        // A NaN high poisons the average
        assert_eq!(
            tokens_for(f64::NAN, 30.0, "Clear", 0),
            ["tshirt", "shorts", "sun-hat", "sunglasses"]
        );
        assert_eq!(tokens_for(f64::NEG_INFINITY, 30.0, "Clear", 0)[0], "warm-coat");
    }

    #[test]
    fn test_total_over_degenerate_snapshots() {
        let temps = [
            -40.0,
            -1.0,
            0.0,
            39.5,
            40.0,
            54.9,
            55.0,
            69.9,
            70.0,
            84.9,
            85.0,
            130.0,
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ];
        for high in temps {
            for low in temps {
                for precip in [0, 50, 51, 100] {
                    for description in ["", "Rain", "Clear"] {
                        let snapshot = snapshot_with(day(high, low, description, precip));
                        assert_well_formed(&fallback(&snapshot, Slot::Tomorrow));
                        assert_well_formed(&fallback(&snapshot, Slot::Today));
                    }
                }
            }
        }
    }
}
