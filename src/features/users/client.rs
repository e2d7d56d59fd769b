//! User lookup on top of the generic resource client. The mock API has no
//! login endpoint, so credentials are checked against the fetched collection.
//! Never log the password.

use crate::{
    errors::AppError,
    features::{resource::ResourceClient, users::types::User},
};
use serde_json::Value;
use tracing::{error, info, instrument};

pub type UserClient = ResourceClient<User>;

impl ResourceClient<User> {
    /// Returns the first user whose username and password both match exactly,
    /// or `None`. An unknown user and a wrong password look the same.
    /// Records whose credentials are not strings never match and do not
    /// spoil the lookup for the rest.
    ///
    /// # Errors
    /// Returns the fetch error (after logging it) if the collection cannot be
    /// read, or `AppError::Parse` if the matching record cannot be decoded.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<User>, AppError> {
        let records = self.find_all_raw().await.map_err(|err| {
            error!("Login error: {err}");
            err
        })?;

        let Some(record) = records
            .into_iter()
            .find(|record| credentials_match(record, username, password))
        else {
            info!(matched = false, "credential lookup finished");
            return Ok(None);
        };

        let user: User = serde_json::from_value(record)
            .map_err(|err| AppError::Parse(format!("Failed to decode user: {err}")))?;
        info!(matched = true, "credential lookup finished");
        Ok(Some(user))
    }
}

fn credentials_match(record: &Value, username: &str, password: &str) -> bool {
    record.get("username").and_then(Value::as_str) == Some(username)
        && record.get("password").and_then(Value::as_str) == Some(password)
}
