use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SALINITY: &str = "32.5";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        Season::ALL
            .into_iter()
            .find(|season| season.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown season: {value}"))
    }
}

/// Form fields, in display order. `name` is the wire name used by the
/// prediction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Temperature,
    Salinity,
    Season,
    Latitude,
    Longitude,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Temperature => "temperature_degree_c",
            Field::Salinity => "salinity_psu",
            Field::Season => "season",
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw state of one pending prediction request. Values stay as typed by the
/// user; numbers are only parsed when the request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub temperature: String,
    pub salinity: String,
    pub season: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            temperature: String::new(),
            salinity: DEFAULT_SALINITY.to_string(),
            season: Season::default().to_string(),
            latitude: String::new(),
            longitude: String::new(),
        }
    }
}

impl FormInput {
    pub fn raw(&self, field: Field) -> &str {
        match field {
            Field::Temperature => &self.temperature,
            Field::Salinity => &self.salinity,
            Field::Season => &self.season,
            Field::Latitude => &self.latitude,
            Field::Longitude => &self.longitude,
        }
    }

    pub fn set(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::Temperature => &mut self.temperature,
            Field::Salinity => &mut self.salinity,
            Field::Season => &mut self.season,
            Field::Latitude => &mut self.latitude,
            Field::Longitude => &mut self.longitude,
        };
        *slot = value.to_string();
    }

    pub fn is_present(&self, field: Field) -> bool {
        !self.raw(field).trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub temperature_degree_c: f64,
    pub salinity_psu: f64,
    pub season: Season,
    #[serde(flatten)]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_zone: String,
    pub gps_zone: String,
    #[serde(default)]
    pub fish_recommendations: Vec<String>,
    pub area_name: String,
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
}

impl PredictionResult {
    pub fn top_species(&self) -> Option<&str> {
        self.fish_recommendations.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub name: String,
    pub main: WeatherMain,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub wind: Wind,
}

impl WeatherReport {
    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map(|condition| condition.description.as_str())
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherMain {
    pub temp: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_defaults_match_fresh_form() {
        let form = FormInput::default();
        assert_eq!(form.temperature, "");
        assert_eq!(form.salinity, "32.5");
        assert_eq!(form.season, "Spring");
        assert!(!form.is_present(Field::Latitude));
        assert!(!form.is_present(Field::Longitude));
    }

    #[test]
    fn season_parses_case_insensitively() {
        assert_eq!("fall".parse::<Season>(), Ok(Season::Fall));
        assert_eq!(" Winter ".parse::<Season>(), Ok(Season::Winter));
        assert!("Autumn".parse::<Season>().is_err());
    }

    #[test]
    fn request_omits_absent_coordinates() {
        let request = PredictionRequest {
            temperature_degree_c: 15.0,
            salinity_psu: 32.5,
            season: Season::Spring,
            coordinates: None,
        };
        let json = serde_json::to_string(&request).expect("serialize");
        assert_eq!(
            json,
            r#"{"temperature_degree_c":15.0,"salinity_psu":32.5,"season":"Spring"}"#
        );
    }

    #[test]
    fn request_flattens_coordinates() {
        let request = PredictionRequest {
            temperature_degree_c: 10.0,
            salinity_psu: 30.0,
            season: Season::Summer,
            coordinates: Some(Coordinates {
                latitude: 44.67,
                longitude: -63.58,
            }),
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["latitude"], 44.67);
        assert_eq!(json["longitude"], -63.58);
        assert_eq!(json["season"], "Summer");
    }

    #[test]
    fn result_accepts_integer_radius() {
        let body = r#"{
            "predicted_zone": "Zone A",
            "gps_zone": "Zone B",
            "fish_recommendations": ["Cod", "Herring", "Hake"],
            "area_name": "Near Point Pleasant",
            "lat": 44.66,
            "lon": -63.56,
            "radius_km": 7
        }"#;
        let result: PredictionResult = serde_json::from_str(body).expect("deserialize");
        assert_eq!(result.radius_km, 7.0);
        assert_eq!(result.top_species(), Some("Cod"));
    }

    #[test]
    fn weather_description_falls_back_when_missing() {
        let report = WeatherReport {
            name: "Halifax".to_string(),
            main: WeatherMain {
                temp: 8.5,
                humidity: 81.0,
                pressure: 1012.0,
            },
            weather: Vec::new(),
            wind: Wind { speed: 4.1 },
        };
        assert_eq!(report.description(), "unknown");
    }
}
