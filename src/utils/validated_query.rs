use std::error::Error;

use axum::{
    async_trait,
    extract::{FromRequest, Query, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::app_error::AppError;

pub struct ValidatedQuery<T>(pub T);

pub struct ValidatedJson<T>(pub T);

fn validate<T: Validate>(data: T) -> Result<T, AppError> {
    data.validate()
        .map_err(|e| AppError::BadRequest(format!("Invalid input: {}", e)))?;

    Ok(data)
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(data) = Query::<T>::from_request(req, state)
            .await
            .map_err(|e| match e.source() {
                Some(source) => AppError::BadRequest(format!("Invalid query: {}", source)),
                None => AppError::BadRequest(e.body_text()),
            })?;

        validate(data).map(ValidatedQuery)
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        validate(data).map(ValidatedJson)
    }
}
