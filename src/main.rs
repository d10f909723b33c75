use anyhow::Result;
use clap::{Parser, Subcommand};

use picko_core::{App, AppError};
use picko_outfit::{ClothingStyle, PreferencesUpdate, StructuredRecommendation};
use picko_weather::{DayForecast, WeatherSnapshot};

/// Picko - what should the little one wear today?
#[derive(Parser)]
#[command(name = "picko", version, about)]
struct Cli {
    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend outfits for today and tomorrow.
    Advise {
        /// Latitude (uses the configured default if omitted).
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude (uses the configured default if omitted).
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Save the child's age and clothing style.
    Setup {
        /// Age in years (1-10).
        #[arg(long)]
        age: u8,

        /// boy, girl or neutral.
        #[arg(long, default_value = "neutral")]
        style: ClothingStyle,
    },

    /// Show or change saved preferences.
    Preferences {
        #[arg(long)]
        age: Option<u8>,

        #[arg(long)]
        style: Option<ClothingStyle>,
    },

    /// Forget the profile and cached recommendations.
    Reset,

    /// Drop cached recommendations.
    ClearCache,
}

#[tokio::main]
async fn main() -> Result<()> {
    picko_core::init()?;

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let app = App::load()?;
    let advisor = app.advisor();

    match cli.command {
        Commands::Advise { lat, lon } => {
            let coords = app.resolve_location(lat, lon)?;
            let preferences = advisor.preferences().load().await;
            if !preferences.has_completed_setup {
                tracing::info!("No profile saved yet, using defaults");
            }

            let (snapshot, recommendations) = app.advise(coords, &preferences).await?;

            if cli.json {
                print_json(&serde_json::json!({
                    "weather": snapshot,
                    "recommendations": recommendations,
                }))?;
            } else {
                print_weather(&snapshot);
                print_recommendation("Today", &snapshot.today, &recommendations.today);
                print_recommendation("Tomorrow", &snapshot.tomorrow, &recommendations.tomorrow);
            }
        }
        Commands::Setup { age, style } => {
            let preferences = advisor.complete_setup(age, style).await?;
            println!(
                "Saved: {}-year-old, {} style",
                preferences.child_age, preferences.clothing_style
            );
        }
        Commands::Preferences { age, style } => {
            let preferences = if age.is_none() && style.is_none() {
                advisor.preferences().load().await
            } else {
                advisor
                    .update_preferences(PreferencesUpdate {
                        child_age: age,
                        clothing_style: style,
                        ..Default::default()
                    })
                    .await?
            };

            if cli.json {
                print_json(&preferences)?;
            } else {
                println!("Age:   {}", preferences.child_age);
                println!("Style: {}", preferences.clothing_style);
                let setup = if preferences.has_completed_setup {
                    "done"
                } else {
                    "not done"
                };
                println!("Setup: {}", setup);
            }
        }
        Commands::Reset => {
            advisor.reset_profile().await?;
            println!("Profile and cached recommendations cleared");
        }
        Commands::ClearCache => {
            advisor.cache().clear_all().await?;
            println!("Cached recommendations cleared");
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    println!("{}", text);
    Ok(())
}

fn print_weather(snapshot: &WeatherSnapshot) {
    let current = &snapshot.current;
    println!("{}", snapshot.location);
    println!(
        "Now: {}°F (feels like {}°F), {}, wind {} mph, humidity {}%",
        current.temperature,
        current.feels_like,
        current.description,
        current.wind_speed,
        current.humidity
    );
}

fn print_recommendation(
    label: &str,
    day: &DayForecast,
    recommendation: &StructuredRecommendation,
) {
    println!();
    println!(
        "{}: {} / {}°F, {}, {}% chance of rain",
        label, day.high, day.low, day.description, day.precipitation_chance
    );
    println!("  {}", recommendation.summary);
    for token in &recommendation.clothing_items {
        match token.item() {
            Some(item) => println!("  - {} ({})", token, item.category().as_str()),
            None => println!("  - {}", token),
        }
    }
}
