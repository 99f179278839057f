use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AppError, Result, Service};
use crate::models::{Coordinates, PredictionRequest, PredictionResult, WeatherReport};

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const PREDICT_PATH: &str = "/predict";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PREDICTION_FAILED: &str = "Failed to get prediction. Please try again.";
const WEATHER_FAILED: &str = "Failed to fetch weather data. Please try again.";

/// Returns the bearer token if one was supplied and is not blank.
pub fn require_credential(token: Option<&str>) -> Result<&str> {
    token
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::MissingCredential)
}

fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|err| AppError::Config(format!("failed to build HTTP client: {err}")))
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub struct PredictionClient {
    base_url: String,
    http: reqwest::Client,
}

impl PredictionClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: http_client()?,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, PREDICT_PATH)
    }

    /// Sends one prediction request. Nothing goes on the wire without a
    /// credential, and failures are not retried.
    pub async fn predict(
        &self,
        token: Option<&str>,
        request: &PredictionRequest,
    ) -> Result<PredictionResult> {
        let token = require_credential(token)?;
        let url = self.endpoint();
        debug!(%url, season = %request.season, "sending prediction request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "prediction request failed");
                AppError::upstream(Service::Prediction, None, PREDICTION_FAILED)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| PREDICTION_FAILED.to_string());
            warn!(status = status.as_u16(), %message, "prediction service returned an error");
            return Err(AppError::upstream(
                Service::Prediction,
                Some(status.as_u16()),
                message,
            ));
        }

        response.json::<PredictionResult>().await.map_err(|err| {
            warn!(error = %err, "prediction response could not be decoded");
            AppError::upstream(Service::Prediction, Some(status.as_u16()), PREDICTION_FAILED)
        })
    }
}

pub struct WeatherClient {
    url: String,
    api_key: String,
    http: reqwest::Client,
}

impl WeatherClient {
    pub fn new(url: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            url: url.to_string(),
            api_key: api_key.to_string(),
            http: http_client()?,
        })
    }

    pub async fn current(&self, at: Coordinates) -> Result<WeatherReport> {
        debug!(lat = at.latitude, lon = at.longitude, "fetching current weather");

        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("lat", at.latitude.to_string()),
                ("lon", at.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "weather request failed");
                AppError::upstream(Service::Weather, None, WEATHER_FAILED)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "weather service returned an error");
            return Err(AppError::upstream(
                Service::Weather,
                Some(status.as_u16()),
                WEATHER_FAILED,
            ));
        }

        response.json::<WeatherReport>().await.map_err(|err| {
            warn!(error = %err, "weather response could not be decoded");
            AppError::upstream(Service::Weather, Some(status.as_u16()), WEATHER_FAILED)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Season;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn spring_request() -> PredictionRequest {
        PredictionRequest {
            temperature_degree_c: 15.0,
            salinity_psu: 32.5,
            season: Season::Spring,
            coordinates: None,
        }
    }

    #[test]
    fn clients_build_with_request_timeout() {
        let client = PredictionClient::new("http://localhost:8000/").expect("prediction client");
        assert_eq!(client.endpoint(), "http://localhost:8000/predict");
        assert!(WeatherClient::new(DEFAULT_WEATHER_URL, "key-123").is_ok());
    }

    fn zone_b_result() -> serde_json::Value {
        json!({
            "predicted_zone": "Zone B",
            "gps_zone": "Zone B",
            "fish_recommendations": ["Cod", "Herring", "Hake"],
            "area_name": "Near Point Pleasant",
            "lat": 44.66,
            "lon": -63.56,
            "radius_km": 7
        })
    }

    #[test]
    fn blank_credentials_are_rejected() {
        assert!(matches!(require_credential(None), Err(AppError::MissingCredential)));
        assert!(matches!(require_credential(Some("  ")), Err(AppError::MissingCredential)));
        assert_eq!(require_credential(Some("abc")).ok(), Some("abc"));
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let client = PredictionClient::new("https://api.example.com/prod/").expect("client");
        assert_eq!(client.endpoint(), "https://api.example.com/prod/predict");
    }

    #[tokio::test]
    async fn posts_payload_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(header("authorization", "Bearer id-token"))
            .and(body_json(json!({
                "temperature_degree_c": 15.0,
                "salinity_psu": 32.5,
                "season": "Spring"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(zone_b_result()))
            .expect(1)
            .mount(&server)
            .await;

        let client = PredictionClient::new(&server.uri()).expect("client");
        let result = client
            .predict(Some("id-token"), &spring_request())
            .await
            .expect("prediction");

        assert_eq!(result.gps_zone, "Zone B");
        assert_eq!(result.fish_recommendations, vec!["Cod", "Herring", "Hake"]);
        assert_eq!(result.radius_km, 7.0);
    }

    #[tokio::test]
    async fn missing_token_never_reaches_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(zone_b_result()))
            .expect(0)
            .mount(&server)
            .await;

        let client = PredictionClient::new(&server.uri()).expect("client");
        let err = client
            .predict(None, &spring_request())
            .await
            .expect_err("no token");
        assert!(matches!(err, AppError::MissingCredential));
    }

    #[tokio::test]
    async fn service_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "error": "Coordinates outside Halifax bounds" })),
            )
            .mount(&server)
            .await;

        let client = PredictionClient::new(&server.uri()).expect("client");
        let err = client
            .predict(Some("id-token"), &spring_request())
            .await
            .expect_err("rejected");
        match err {
            AppError::Upstream {
                service,
                status,
                message,
            } => {
                assert_eq!(service, Service::Prediction);
                assert_eq!(status, Some(400));
                assert_eq!(message, "Coordinates outside Halifax bounds");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn opaque_failure_uses_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = PredictionClient::new(&server.uri()).expect("client");
        let err = client
            .predict(Some("id-token"), &spring_request())
            .await
            .expect_err("bad gateway");
        assert_eq!(err.to_string(), PREDICTION_FAILED);
    }

    #[tokio::test]
    async fn weather_query_uses_metric_units() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("lat", "44.67"))
            .and(query_param("lon", "-63.58"))
            .and(query_param("appid", "key-123"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Halifax",
                "main": { "temp": 11.2, "humidity": 77, "pressure": 1014 },
                "weather": [{ "description": "light rain" }],
                "wind": { "speed": 5.4 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/weather", server.uri());
        let client = WeatherClient::new(&url, "key-123").expect("client");
        let report = client
            .current(Coordinates {
                latitude: 44.67,
                longitude: -63.58,
            })
            .await
            .expect("weather");

        assert_eq!(report.name, "Halifax");
        assert_eq!(report.description(), "light rain");
        assert_eq!(report.main.pressure, 1014.0);
    }

    #[tokio::test]
    async fn weather_failure_is_reduced_to_one_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "cod": 401 })))
            .mount(&server)
            .await;

        let client = WeatherClient::new(&server.uri(), "bad-key").expect("client");
        let err = client
            .current(Coordinates {
                latitude: 44.6,
                longitude: -63.6,
            })
            .await
            .expect_err("unauthorised");
        assert_eq!(err.to_string(), WEATHER_FAILED);
    }
}
