use rocket::response::status::{Created, Custom, NotFound};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use super::record::{from_record, to_record, ArmyRecord};
use crate::gateway::{SavedArmy, SharedGateway};
use crate::status_messages::{error_status, Status};

/// Save a complete army list as a new record.
#[openapi]
#[post("/armies", format = "json", data = "<army>")]
pub async fn save_army(
    army: Json<ArmyRecord>,
    gateway: &State<SharedGateway>,
) -> Result<Created<Json<SavedArmy>>, Custom<Json<Status>>> {
    let composition = from_record(army.0);
    let mut gw = gateway.lock().await;
    match gw.save_army(&composition) {
        Ok(saved) => Ok(Created::new(format!("/armies/{}", saved.id)).body(Json(saved))),
        Err(e) => Err(Custom(e.http_status(), error_status(&e))),
    }
}

/// Fetch a saved army by id.
#[openapi]
#[get("/armies/<id>")]
pub async fn get_army(
    id: &str,
    gateway: &State<SharedGateway>,
) -> Result<Json<ArmyRecord>, NotFound<Json<Status>>> {
    let gw = gateway.lock().await;
    match gw.load_army(id) {
        Ok(army) => Ok(Json(to_record(&army))),
        Err(e) => Err(NotFound(error_status(&e))),
    }
}
