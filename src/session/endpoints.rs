use either::{Either, Left, Right};
use rocket::response::status::{BadRequest, Created, Custom, NotFound};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use super::{ArmyAction, SessionView, SharedSession};
use crate::error::ArmyError;
use crate::gateway::{SavedArmy, SharedGateway};
use crate::status_messages::{error_status, Status};

/// Current army, budget and warnings.
#[openapi]
#[get("/session")]
pub async fn get_session(session: &State<SharedSession>) -> Json<SessionView> {
    Json(session.lock().await.view())
}

/// Apply one editing action to the session army.
#[openapi]
#[post("/session/action", format = "json", data = "<army_action>")]
pub async fn apply_action(
    session: &State<SharedSession>,
    army_action: Json<ArmyAction>,
) -> Result<Json<SessionView>, Either<NotFound<Json<Status>>, BadRequest<Json<Status>>>> {
    let mut s = session.lock().await;
    match s.apply(army_action.0) {
        Ok(()) => Ok(Json(s.view())),
        Err(e @ (ArmyError::UnitNotFound(_) | ArmyError::UnitNotInArmy(_))) => {
            Err(Left(NotFound(error_status(&e))))
        }
        Err(e) => Err(Right(BadRequest(error_status(&e)))),
    }
}

/// Save the session army. The session keeps it after saving.
#[openapi]
#[post("/session/save")]
pub async fn save_session(
    session: &State<SharedSession>,
    gateway: &State<SharedGateway>,
) -> Result<Created<Json<SavedArmy>>, Custom<Json<Status>>> {
    let s = session.lock().await;
    let mut gw = gateway.lock().await;
    match s.save(&mut **gw) {
        Ok(saved) => {
            Ok(Created::new(format!("/armies/{}", saved.id)).body(Json(saved)))
        }
        Err(e) => Err(Custom(e.http_status(), error_status(&e))),
    }
}

/// Replace the session army with a saved one.
#[openapi]
#[post("/session/load/<id>")]
pub async fn load_into_session(
    id: &str,
    session: &State<SharedSession>,
    gateway: &State<SharedGateway>,
) -> Result<Json<SessionView>, NotFound<Json<Status>>> {
    let mut s = session.lock().await;
    let gw = gateway.lock().await;
    s.load(&**gw, id)
        .map_err(|e| NotFound(error_status(&e)))?;
    Ok(Json(s.view()))
}

/// Refresh the catalog snapshot from the store.
#[openapi]
#[post("/session/reload-catalog")]
pub async fn reload_catalog(
    session: &State<SharedSession>,
    gateway: &State<SharedGateway>,
) -> Result<Json<SessionView>, NotFound<Json<Status>>> {
    let mut s = session.lock().await;
    let gw = gateway.lock().await;
    s.reload_catalog(&**gw)
        .map_err(|e| NotFound(error_status(&e)))?;
    Ok(Json(s.view()))
}
