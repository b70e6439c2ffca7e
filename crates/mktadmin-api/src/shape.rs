//! Detection of the upstream product shape.
//!
//! The shape is decided once per response and every record of that response
//! is extracted under it; collections mixing both shapes are not supported.

use serde::Serialize;
use serde_json::Value;

use crate::parse_helpers::value_at;

/// Structural schema of the product records in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shape {
    /// Native marketplace API records.
    A,
    /// External-platform GraphQL `edges[].node` records.
    B,
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::A => write!(f, "native"),
            Shape::B => write!(f, "graphql"),
        }
    }
}

/// Classifies a listing response body.
///
/// `data.products.edges` being an array means the backend proxied a GraphQL
/// connection; anything else is read as the native shape. Never fails.
#[must_use]
pub fn detect_collection_shape(body: &Value) -> Shape {
    if value_at(body, &["data", "products", "edges"]).is_some_and(Value::is_array) {
        Shape::B
    } else {
        Shape::A
    }
}

/// Classifies a single product document (the `data` of a detail response).
///
/// A GraphQL node carries its variants as a connection (`variants.edges`);
/// native records carry a plain array.
#[must_use]
pub fn detect_record_shape(record: &Value) -> Shape {
    if value_at(record, &["variants", "edges"]).is_some_and(Value::is_array) {
        Shape::B
    } else {
        Shape::A
    }
}
