use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::error::ArmyError;

/// Error body returned by every endpoint that can fail.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct Status {
    pub message: String,
}

pub fn new_status(message: String) -> Json<Status> {
    Json(Status { message })
}

/// Status body for an `ArmyError`. Persistence failures only expose the step that
/// failed ("Failed to publish army"); the detail goes to the log.
pub fn error_status(error: &ArmyError) -> Json<Status> {
    match error {
        ArmyError::Persistence(detail) => {
            log::error!("{}", detail);
            let step = detail.split(':').next().unwrap_or("Failed to save army");
            new_status(step.to_string())
        }
        other => new_status(other.to_string()),
    }
}
