//! Generic CRUD client for one REST collection. Prisoners and users share the
//! same four verbs against `/{collection}` and `/{collection}/{id}`; the only
//! thing that differs is the collection name and the record type.

use crate::{api::ApiClient, errors::AppError};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::marker::PhantomData;
use tracing::{debug, instrument};

pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    /// Collection path segment under the API base URL.
    const COLLECTION: &'static str;
}

#[derive(Debug)]
pub struct ResourceClient<R> {
    api: ApiClient,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Resource> ResourceClient<R> {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _record: PhantomData,
        }
    }

    /// Fetches the whole collection.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status or undecodable body.
    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn find_all(&self) -> Result<Vec<R>, AppError> {
        let records: Vec<R> = self.api.get_json(&[R::COLLECTION]).await?;
        debug!(count = records.len(), "collection fetched");
        Ok(records)
    }

    /// Fetches the collection as raw JSON, for callers that must tolerate
    /// records that do not decode as `R`.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status or a body that is not a JSON array.
    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn find_all_raw(&self) -> Result<Vec<Value>, AppError> {
        self.api.get_json(&[R::COLLECTION]).await
    }

    /// Fetches one record by id.
    ///
    /// # Errors
    /// Returns `AppError::Config` for a blank id, otherwise any response error.
    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn find_by_id(&self, id: &str) -> Result<R, AppError> {
        let id = require_id(id)?;
        self.api.get_json(&[R::COLLECTION, id]).await
    }

    /// Creates a record and returns the server's copy with its assigned id.
    ///
    /// # Errors
    /// Returns an error if the record cannot be encoded, or on any response error.
    #[instrument(skip(self, record), fields(collection = R::COLLECTION))]
    pub async fn save(&self, record: &R) -> Result<R, AppError> {
        self.api.post_json(&[R::COLLECTION], record).await
    }

    /// Replaces the record stored under `id`.
    ///
    /// # Errors
    /// Returns `AppError::Config` for a blank id, otherwise any request or response error.
    #[instrument(skip(self, record), fields(collection = R::COLLECTION))]
    pub async fn update(&self, id: &str, record: &R) -> Result<R, AppError> {
        let id = require_id(id)?;
        self.api.put_json(&[R::COLLECTION, id], record).await
    }

    /// Deletes the record stored under `id` and passes the server's
    /// confirmation payload through untouched.
    ///
    /// # Errors
    /// Returns `AppError::Config` for a blank id, otherwise any response error.
    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn delete_by_id(&self, id: &str) -> Result<Value, AppError> {
        let id = require_id(id)?;
        self.api.delete_json(&[R::COLLECTION, id]).await
    }
}

fn require_id(id: &str) -> Result<&str, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(AppError::Config("Record id is required.".to_string()))
    } else {
        Ok(trimmed)
    }
}
