//! Prompt construction for the generation API.
//!
//! The prompt pins the model to a two-line reply (`SUMMARY:` then
//! `CLOTHING:`) that [`crate::parser::parse`] understands, and restricts
//! clothing tokens to the style's vocabulary.

use picko_weather::WeatherSnapshot;

use crate::types::{ClothingStyle, Slot};

/// Descriptive phrase for a child's age. Out-of-range ages still map to a bucket.
pub fn age_phrase(age: u8) -> &'static str {
    match age {
        0..=1 => "infant/toddler",
        2..=3 => "toddler",
        4..=5 => "preschooler",
        6..=7 => "young child",
        _ => "child",
    }
}

const LAYERING_RULES: &str = "\
Layering rules:
- Pick at most ONE top, at most ONE outerwear layer (light-jacket, warm-coat or rain-jacket) \
  and at most ONE bottom.
- Average below 40°F: warm-coat, sweater, pants, warm-hat, gloves.
- 40-54°F: light-jacket, sweater, pants, boots.
- 55-69°F: light-jacket, shirt, jeans.
- 70-84°F: tshirt, shorts, sun-hat.
- 85°F and above: tshirt, shorts, sun-hat, sunglasses.
- If rain is likely, use rain-jacket as the outerwear layer and add rain-boots.
- Never combine sweater with hoodie.
- Never combine shorts with warm-hat or gloves.
- Never combine warm-coat with sun-hat or light-jacket.
- List between 2 and 5 items.";

/// Build the instruction text for one slot. Pure; no I/O.
pub fn build_prompt(
    snapshot: &WeatherSnapshot,
    slot: Slot,
    age: u8,
    style: ClothingStyle,
) -> String {
    let day = slot.forecast(snapshot);
    let vocabulary = style
        .vocabulary()
        .iter()
        .map(|item| item.token())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a helpful weather assistant. Based on {day}'s weather forecast, \
         recommend an outfit for a {age}-year-old {phrase} who prefers {style} style clothing.

Weather forecast for {day}:
- Temperature: High of {high}°F, Low of {low}°F
- Conditions: {description}
- Wind: {wind} mph
- Chance of precipitation: {precip}%

Allowed clothing items (use these exact tokens only): {vocabulary}

{rules}

Respond with exactly two lines and nothing else:
SUMMARY: <one friendly sentence about what to wear and why>
CLOTHING: <comma-separated tokens from the allowed list>",
        day = slot.as_str(),
        age = age,
        phrase = age_phrase(age),
        style = style,
        high = day.high,
        low = day.low,
        description = day.description,
        wind = day.wind_speed,
        precip = day.precipitation_chance,
        vocabulary = vocabulary,
        rules = LAYERING_RULES,
    )
}
