//! Arithmetic endpoints
//!
//! `POST /sum`, `/multiply`, `/divide` and `/power` all take a JSON object
//! with numeric fields `a` and `b` and answer `{"result": <number>}`.

use hyper::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::http::{self, body, HttpRequest, HttpResponse};
use crate::routing::PathParams;

/// A JSON number operand or result
///
/// Integers stay integers while the result fits in an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Typed extraction from a JSON value; booleans are not numbers
    pub fn from_value(value: &Value) -> Option<Self> {
        let Value::Number(n) = value else {
            return None;
        };
        n.as_i64()
            .map(Self::Int)
            .or_else(|| n.as_f64().map(Self::Float))
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    #[allow(clippy::float_cmp)]
    pub fn is_zero(self) -> bool {
        match self {
            Self::Int(i) => i == 0,
            Self::Float(f) => f == 0.0,
        }
    }

    pub fn plus(self, other: Self) -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_add(b)
                .map_or_else(|| Self::Float(self.as_f64() + other.as_f64()), Self::Int),
            _ => Self::Float(self.as_f64() + other.as_f64()),
        }
    }

    pub fn times(self, other: Self) -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_mul(b)
                .map_or_else(|| Self::Float(self.as_f64() * other.as_f64()), Self::Int),
            _ => Self::Float(self.as_f64() * other.as_f64()),
        }
    }

    /// True division, always a float
    pub fn divided_by(self, other: Self) -> Result<Self, ApiError> {
        if other.is_zero() {
            return Err(ApiError::DivisionByZero);
        }
        Ok(Self::Float(self.as_f64() / other.as_f64()))
    }

    /// `self` raised to `other`; a negative or fractional exponent gives a float
    pub fn pow(self, other: Self) -> Self {
        if let (Self::Int(base), Self::Int(exp)) = (self, other) {
            if let Some(value) = u32::try_from(exp).ok().and_then(|e| base.checked_pow(e)) {
                return Self::Int(value);
            }
        }
        Self::Float(self.as_f64().powf(other.as_f64()))
    }
}

/// Pull the two operands out of a parsed body
pub fn operands(obj: &Map<String, Value>) -> Result<(Number, Number), ApiError> {
    let a = obj.get("a").ok_or(ApiError::MissingField("a"))?;
    let b = obj.get("b").ok_or(ApiError::MissingField("b"))?;

    let a = Number::from_value(a).ok_or(ApiError::NotANumber("a"))?;
    let b = Number::from_value(b).ok_or(ApiError::NotANumber("b"))?;
    Ok((a, b))
}

/// Validate the body, extract operands, apply `op`, respond
fn binary_op<F>(req: &HttpRequest, op: F) -> HttpResponse
where
    F: FnOnce(Number, Number) -> Result<Number, ApiError>,
{
    let outcome = body::json_object(req)
        .and_then(|obj| operands(&obj))
        .and_then(|(a, b)| op(a, b));

    match outcome {
        Ok(result) => http::json_response(StatusCode::OK, &serde_json::json!({ "result": result })),
        Err(e) => http::json_error(&e),
    }
}

pub fn sum(req: &HttpRequest, _: &PathParams) -> HttpResponse {
    binary_op(req, |a, b| Ok(a.plus(b)))
}

pub fn multiply(req: &HttpRequest, _: &PathParams) -> HttpResponse {
    binary_op(req, |a, b| Ok(a.times(b)))
}

pub fn divide(req: &HttpRequest, _: &PathParams) -> HttpResponse {
    binary_op(req, Number::divided_by)
}

pub fn power(req: &HttpRequest, _: &PathParams) -> HttpResponse {
    binary_op(req, |a, b| Ok(a.pow(b)))
}
