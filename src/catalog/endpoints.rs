use rocket::response::status::NotFound;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use super::{UnitCategory, UnitDefinition};
use crate::gateway::SharedGateway;
use crate::status_messages::{error_status, Status};

/// Published catalog units. Optionally filter by ?category= (variant name or label).
#[openapi]
#[get("/units?<category>")]
pub async fn list_units(
    category: Option<String>,
    gateway: &State<SharedGateway>,
) -> Result<Json<Vec<UnitDefinition>>, NotFound<Json<Status>>> {
    let gw = gateway.lock().await;
    let units = gw.list_units().map_err(|e| NotFound(error_status(&e)))?;
    let wanted = category.as_deref().and_then(|c| c.parse::<UnitCategory>().ok());
    let units = units
        .into_iter()
        .filter(|u| match (category.as_deref(), wanted) {
            (None, _) => true,
            (Some(_), Some(c)) => u.category == c,
            (Some(_), None) => false,
        })
        .collect();
    Ok(Json(units))
}
