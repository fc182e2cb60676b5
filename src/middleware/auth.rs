// src/middleware/auth.rs

use axum::{extract::FromRequestParts, http::{request::Parts, StatusCode}};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::common::error::ApiError;

// O token de quem usa o painel. Não é validado aqui: vai junto em cada
// chamada à API administrativa, que é quem decide.
#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

impl<S> FromRequestParts<S> for AccessToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    ApiError::new(
                        StatusCode::UNAUTHORIZED,
                        "Token de autenticação inválido ou ausente.",
                    )
                })?;

        let token = bearer.token().trim();
        if token.is_empty() {
            return Err(ApiError::new(
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.",
            ));
        }

        Ok(AccessToken(token.to_string()))
    }
}
