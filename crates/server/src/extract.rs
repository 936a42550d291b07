use std::collections::{BTreeMap, HashMap};

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde_json::Value;

use crate::error::ApiError;

/// Request body as raw JSON. Schema checks run after extraction, so a body
/// that fails to parse gets the same VALIDATION_ERROR envelope as one that
/// fails validation.
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!("rejected request body: {}", rejection);
                Err(ApiError::invalid_json())
            }
        }
    }
}

/// Query string as a raw key/value map, with undecodable query strings
/// reported through the standard envelope.
pub struct QueryParams(pub HashMap<String, String>);

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<HashMap<String, String>>::from_request_parts(parts, state).await {
            Ok(Query(params)) => Ok(QueryParams(params)),
            Err(rejection) => {
                tracing::debug!("rejected query string: {}", rejection);
                Err(ApiError::invalid_query(BTreeMap::new()))
            }
        }
    }
}
