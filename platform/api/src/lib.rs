use std::{collections::BTreeMap, sync::Arc};

use async_graphql::{Error, ErrorExtensions};
use thiserror::Error;

/// Shared GraphQL result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("invalid fields: {}", .0.keys().cloned().collect::<Vec<_>>().join(", "))]
    InvalidFields(BTreeMap<String, String>),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidFields(_) => "INVALID_INPUT",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "internal api error");
        Self::Internal(Arc::new(err))
    }

    /// Field-level validation failure keyed by input field name.
    pub fn fields<K, V>(errors: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::InvalidFields(
            errors
                .into_iter()
                .map(|(field, msg)| (field.into(), msg.into()))
                .collect(),
        )
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        let mut err = Error::new(self.to_string());
        err = err.extend_with(|_err, e| {
            e.set("code", self.code());
        });
        if let ApiError::InvalidFields(fields) = self {
            let fields = async_graphql::to_value(fields).unwrap_or_default();
            err = err.extend_with(|_err, e| {
                e.set("type", "BAD_REQUEST");
                e.set("fields", fields);
            });
        }
        err
    }
}
