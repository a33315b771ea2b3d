use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{Entity, Pagination};
use crate::transport::ApiError;

#[derive(Clone, Debug, PartialEq)]
pub struct ListPage<E> {
    pub items: Vec<E>,
    pub pagination: Option<Pagination>,
}

pub(crate) fn decode_list<E: Entity>(body: &Value, key: &str) -> Result<ListPage<E>, ApiError> {
    let items = decode_field::<Vec<E>>(body, key)?;
    let pagination = match body.get("pagination") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(
            serde_json::from_value::<Pagination>(raw.clone())
                .map_err(|_| ApiError::InvalidResponse)?
                .normalized(),
        ),
    };
    Ok(ListPage { items, pagination })
}

pub(crate) fn decode_field<T: DeserializeOwned>(body: &Value, key: &str) -> Result<T, ApiError> {
    let raw = body.get(key).ok_or(ApiError::InvalidResponse)?;
    serde_json::from_value(raw.clone()).map_err(|_| ApiError::InvalidResponse)
}

pub(crate) fn decode_optional_field<T: DeserializeOwned>(
    body: &Value,
    key: &str,
) -> Result<Option<T>, ApiError> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => serde_json::from_value(raw.clone())
            .map(Some)
            .map_err(|_| ApiError::InvalidResponse),
    }
}
