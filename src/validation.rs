use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::AppError;
use crate::models::{Coordinates, Field, FormInput, PredictionRequest, Season};

pub const TEMPERATURE_RANGE: RangeInclusive<f64> = -2.0..=30.0;
pub const SALINITY_RANGE: RangeInclusive<f64> = 25.0..=35.0;
pub const LATITUDE_RANGE: RangeInclusive<f64> = 44.5..=44.8;
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -63.7..=-63.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    MissingValue,
    OutOfRange,
    NotANumber,
    PairedFieldsIncomplete,
}

pub fn describe(field: Field, kind: FieldErrorKind) -> String {
    if kind == FieldErrorKind::PairedFieldsIncomplete {
        return "Both latitude and longitude must be provided or neither".to_string();
    }

    let message = match (field, kind) {
        (Field::Temperature, FieldErrorKind::MissingValue) => "Temperature is required",
        (Field::Temperature, _) => "Temperature must be between -2 and 30°C",
        (Field::Salinity, FieldErrorKind::MissingValue) => "Salinity is required",
        (Field::Salinity, _) => "Salinity must be between 25 and 35 PSU",
        (Field::Season, FieldErrorKind::MissingValue) => "Season is required",
        (Field::Season, _) => "Season must be one of Spring, Summer, Fall or Winter",
        (Field::Latitude, _) => "Latitude must be between 44.5 and 44.8",
        (Field::Longitude, _) => "Longitude must be between -63.7 and -63.4",
    };
    message.to_string()
}

/// Field errors of a form. A field missing from the map is currently valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, FieldErrorKind>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: Field, kind: FieldErrorKind) -> Self {
        Self::new().with(field, Some(kind))
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<FieldErrorKind> {
        self.errors.get(&field).copied()
    }

    pub fn message(&self, field: Field) -> Option<String> {
        self.get(field).map(|kind| describe(field, kind))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldErrorKind)> + '_ {
        self.errors.iter().map(|(field, kind)| (*field, *kind))
    }

    /// Sets or clears the error for one field, leaving the others alone.
    pub fn with(mut self, field: Field, kind: Option<FieldErrorKind>) -> Self {
        match kind {
            Some(kind) => {
                self.errors.insert(field, kind);
            }
            None => {
                self.errors.remove(&field);
            }
        }
        self
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, kind) in self.iter() {
            map.serialize_entry(field.name(), &describe(field, kind))?;
        }
        map.end()
    }
}

fn bounds(field: Field) -> Option<RangeInclusive<f64>> {
    match field {
        Field::Temperature => Some(TEMPERATURE_RANGE),
        Field::Salinity => Some(SALINITY_RANGE),
        Field::Latitude => Some(LATITUDE_RANGE),
        Field::Longitude => Some(LONGITUDE_RANGE),
        Field::Season => None,
    }
}

fn is_required(field: Field) -> bool {
    !matches!(field, Field::Latitude | Field::Longitude)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn check(field: Field, raw: &str) -> Option<FieldErrorKind> {
    let raw = raw.trim();
    if raw.is_empty() {
        return is_required(field).then_some(FieldErrorKind::MissingValue);
    }

    let valid = match bounds(field) {
        Some(range) => parse_number(raw).is_some_and(|value| range.contains(&value)),
        None => raw.parse::<Season>().is_ok(),
    };

    (!valid).then_some(FieldErrorKind::OutOfRange)
}

/// Re-checks a single field after it changed. Unparseable numbers are
/// reported as out of range.
pub fn validate_field(errors: ValidationErrors, field: Field, raw: &str) -> ValidationErrors {
    errors.with(field, check(field, raw))
}

pub fn validate_all(form: &FormInput) -> (ValidationErrors, bool) {
    let mut errors = ValidationErrors::new();

    for field in [Field::Temperature, Field::Salinity, Field::Season] {
        errors = errors.with(field, check(field, form.raw(field)));
    }
    for field in [Field::Latitude, Field::Longitude] {
        if form.is_present(field) {
            errors = errors.with(field, check(field, form.raw(field)));
        }
    }

    if form.is_present(Field::Latitude) != form.is_present(Field::Longitude) {
        errors = errors
            .with(Field::Latitude, Some(FieldErrorKind::PairedFieldsIncomplete))
            .with(Field::Longitude, Some(FieldErrorKind::PairedFieldsIncomplete));
    }

    let submittable = errors.is_empty();
    (errors, submittable)
}

pub fn is_submittable(form: &FormInput) -> bool {
    validate_all(form).1
}

/// Builds the request payload. Refuses forms that fail `validate_all`.
pub fn build_request(form: &FormInput) -> Result<PredictionRequest, ValidationErrors> {
    let (errors, submittable) = validate_all(form);
    if !submittable {
        return Err(errors);
    }

    let number = |field: Field| {
        parse_number(form.raw(field))
            .ok_or_else(|| ValidationErrors::single(field, FieldErrorKind::OutOfRange))
    };
    let season = form
        .season
        .parse::<Season>()
        .map_err(|_| ValidationErrors::single(Field::Season, FieldErrorKind::OutOfRange))?;

    let coordinates = if form.is_present(Field::Latitude) && form.is_present(Field::Longitude) {
        Some(Coordinates {
            latitude: number(Field::Latitude)?,
            longitude: number(Field::Longitude)?,
        })
    } else {
        None
    };

    Ok(PredictionRequest {
        temperature_degree_c: number(Field::Temperature)?,
        salinity_psu: number(Field::Salinity)?,
        season,
        coordinates,
    })
}

/// Parses a free-form coordinate pair for the weather lookup, which has no
/// harbour bounds.
pub fn parse_coordinates(latitude: &str, longitude: &str) -> Result<Coordinates, AppError> {
    let parse = |field: Field, raw: &str| {
        if raw.trim().is_empty() {
            return Err(AppError::InvalidCoordinates {
                field,
                kind: FieldErrorKind::MissingValue,
            });
        }
        parse_number(raw).ok_or(AppError::InvalidCoordinates {
            field,
            kind: FieldErrorKind::NotANumber,
        })
    };

    Ok(Coordinates {
        latitude: parse(Field::Latitude, latitude)?,
        longitude: parse(Field::Longitude, longitude)?,
    })
}
