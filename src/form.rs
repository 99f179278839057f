use tracing::info;

use crate::client::{require_credential, PredictionClient};
use crate::error::{AppError, Result};
use crate::models::{Field, FormInput, PredictionRequest, PredictionResult};
use crate::validation::{self, ValidationErrors};

const FIELDS: [Field; 5] = [
    Field::Temperature,
    Field::Salinity,
    Field::Season,
    Field::Latitude,
    Field::Longitude,
];

/// The request that went out and the answer it got.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub request: PredictionRequest,
    pub result: PredictionResult,
}

/// A pending prediction request together with its current field errors.
#[derive(Debug, Clone, Default)]
pub struct Form {
    input: FormInput,
    errors: ValidationErrors,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &FormInput {
        &self.input
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Records a new raw value and re-checks that field only.
    pub fn change(&mut self, field: Field, raw: &str) {
        self.input.set(field, raw);
        let errors = std::mem::take(&mut self.errors);
        self.errors = validation::validate_field(errors, field, raw);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Starts over from a blank form and types in every field of `input`.
    pub fn fill(&mut self, input: &FormInput) {
        self.reset();
        for field in FIELDS {
            self.change(field, input.raw(field));
        }
    }

    pub fn is_submittable(&self) -> bool {
        validation::is_submittable(&self.input)
    }

    /// Replaces the field errors with the aggregate check, including the
    /// paired-coordinate rule.
    pub fn validate(&mut self) -> bool {
        let (errors, submittable) = validation::validate_all(&self.input);
        self.errors = errors;
        submittable
    }

    /// Runs the aggregate check, then builds and sends the request once.
    pub async fn submit(
        &mut self,
        client: &PredictionClient,
        token: Option<&str>,
    ) -> Result<Submission> {
        if !self.validate() {
            return Err(AppError::Invalid(self.errors.clone()));
        }

        let token = require_credential(token)?;
        let request = validation::build_request(&self.input).map_err(AppError::Invalid)?;
        let result = client.predict(Some(token), &request).await?;
        info!(
            predicted_zone = %result.predicted_zone,
            gps_zone = %result.gps_zone,
            "prediction received"
        );
        Ok(Submission { request, result })
    }
}
