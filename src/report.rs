use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::lookup;
use crate::models::{PredictionRequest, PredictionResult, WeatherReport};
use crate::validation::ValidationErrors;

pub fn build_prediction_report(
    request: &PredictionRequest,
    result: &PredictionResult,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Prediction Result");
    let _ = writeln!(
        output,
        "Generated {} for {:.1}°C, {:.1} PSU, {}",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        request.temperature_degree_c,
        request.salinity_psu,
        request.season
    );
    match request.coordinates {
        Some(at) => {
            let _ = writeln!(output, "Pin dropped at {}, {}", at.latitude, at.longitude);
        }
        None => {
            let _ = writeln!(output, "No pin dropped; zone chosen by the model.");
        }
    }

    let _ = writeln!(output);
    write_result(&mut output, result);

    output
}

fn write_result(output: &mut String, result: &PredictionResult) {
    let fish = if result.fish_recommendations.is_empty() {
        "none".to_string()
    } else {
        result.fish_recommendations.join(", ")
    };

    let _ = writeln!(output, "- Predicted Zone: {}", result.predicted_zone);
    let _ = writeln!(output, "- GPS Zone: {}", result.gps_zone);
    let _ = writeln!(output, "- Fish: {}", fish);
    let _ = writeln!(output, "- Area: {}", result.area_name);
    let _ = writeln!(output, "- Latitude: {}", result.lat);
    let _ = writeln!(output, "- Longitude: {}", result.lon);
    let _ = writeln!(output, "- Radius: {} km", result.radius_km);

    if let Some(tips) = result.top_species().and_then(lookup::fishing_tips) {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Fishing Tips for {}", tips.species);
        let _ = writeln!(output, "- Bait: {}", tips.bait);
        let _ = writeln!(output, "- Best Time: {}", tips.best_time);
        let _ = writeln!(output, "- Gear: {}", tips.gear);
    }

    let zone = lookup::display_zone(&result.gps_zone);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Predicted Zone: {}", zone.name);
    let _ = writeln!(
        output,
        "Centre {}, {} with a {} km radius.",
        zone.latitude, zone.longitude, zone.radius_km
    );
}

pub fn build_validation_report(errors: &ValidationErrors) -> String {
    let mut output = String::new();

    if errors.is_empty() {
        let _ = writeln!(output, "Form is valid and ready to submit.");
        return output;
    }

    let _ = writeln!(output, "Form has {} error(s):", errors.len());
    for (field, _) in errors.iter() {
        if let Some(message) = errors.message(field) {
            let _ = writeln!(output, "- {}: {}", field, message);
        }
    }

    output
}

pub fn build_weather_report(report: &WeatherReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Weather Forecast");
    let _ = writeln!(output, "- Location: {}", report.name);
    let _ = writeln!(output, "- Temperature: {} °C", report.main.temp);
    let _ = writeln!(output, "- Weather: {}", report.description());
    let _ = writeln!(output, "- Wind Speed: {} m/s", report.wind.speed);
    let _ = writeln!(output, "- Humidity: {}%", report.main.humidity);
    let _ = writeln!(output, "- Pressure: {} hPa", report.main.pressure);

    output
}

pub fn build_zone_table() -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Fishing Zones");
    for zone in lookup::ZONES.iter() {
        let _ = writeln!(
            output,
            "- Zone {}: {} ({}, {}) radius {} km",
            zone.id, zone.name, zone.latitude, zone.longitude, zone.radius_km
        );
    }

    output
}

pub fn build_gear_guide(species: Option<&str>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Fishing Gear Guide");
    for gear in lookup::gear_guide(species) {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {} Gear Recommendations", gear.species);
        let _ = writeln!(output, "- Rod: {}", gear.rod);
        let _ = writeln!(output, "- Reel: {}", gear.reel);
        let _ = writeln!(output, "- Bait: {}", gear.bait);
    }

    output
}
