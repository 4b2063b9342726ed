//! # Army Builder
//!
//! A web API for assembling tabletop-wargame armies from a unit catalog under a
//! points budget, and saving them to a content store.
//!
//! ## Overview
//!
//! Units are read from a catalog of published unit definitions. An army is a
//! list of (unit, quantity, notes) lines whose name and points cost are copied
//! from the catalog when the line is added. Totals and budget utilization are
//! always derived from the lines. Saved armies are stored as content nodes with
//! the unit list kept as a single JSON text property.
//!
//! ## Architecture
//!
//! The API is built using the Rocket web framework with OpenAPI documentation
//! support. The gateway and the editing session are shared between requests
//! as `Arc<Mutex<T>>` managed state.

// Rocket makes this a bit tricky to support
#![allow(clippy::module_name_repetitions)]
#[macro_use]
extern crate rocket;

use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::{make_swagger_ui, SwaggerUIConfig};

pub mod army;
pub mod catalog;
pub mod config;
pub mod content_store;
pub mod error;
pub mod gateway;
pub mod session;
pub mod status_messages;

use crate::config::ServiceConfig;
use crate::content_store::schema::{army_builder_schema, KIND_HOME};
use crate::content_store::seed::{install_demo_catalog, HOME_NAME};
use crate::content_store::ContentStore;
use crate::error::Result;
use crate::gateway::{ArmyGateway, ContentStoreGateway};
use crate::session::ArmySession;

/// Open (or create) the content store described by `config`, provision the
/// schema and home node, and optionally install the demo catalog.
pub fn build_gateway(config: &ServiceConfig) -> Result<ContentStoreGateway> {
    let mut store = match &config.store_file {
        Some(path) => ContentStore::open(path)?,
        None => ContentStore::new(),
    };
    if store.apply_schema(&army_builder_schema()) {
        store.flush()?;
    }
    store.ensure_root(KIND_HOME, HOME_NAME)?;
    if config.seed_catalog {
        install_demo_catalog(&mut store)?;
    }
    Ok(ContentStoreGateway::new(store))
}

/// Build the Rocket instance around an already-constructed gateway.
///
/// The editing session takes its catalog snapshot from the gateway here, once.
pub fn rocket_with_gateway(gateway: impl ArmyGateway + 'static) -> rocket::Rocket<rocket::Build> {
    use crate::army::endpoints::okapi_add_operation_for_get_army_;
    use crate::army::endpoints::okapi_add_operation_for_save_army_;
    use crate::army::endpoints::{get_army, save_army};
    use crate::catalog::endpoints::list_units;
    use crate::catalog::endpoints::okapi_add_operation_for_list_units_;
    use crate::session::endpoints::okapi_add_operation_for_apply_action_;
    use crate::session::endpoints::okapi_add_operation_for_get_session_;
    use crate::session::endpoints::okapi_add_operation_for_load_into_session_;
    use crate::session::endpoints::okapi_add_operation_for_reload_catalog_;
    use crate::session::endpoints::okapi_add_operation_for_save_session_;
    use crate::session::endpoints::{
        apply_action, get_session, load_into_session, reload_catalog, save_session,
    };

    #[allow(clippy::no_effect_underscore_binding)]
    let _ = env_logger::try_init();

    let session = match ArmySession::start(&gateway) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Starting session with an empty catalog: {}", e);
            ArmySession::default()
        }
    };
    log::info!(
        "Session started with {} catalog units",
        session.catalog().len()
    );

    rocket::build()
        .mount(
            "/",
            openapi_get_routes![
                list_units,
                save_army,
                get_army,
                get_session,
                apply_action,
                save_session,
                load_into_session,
                reload_catalog
            ],
        )
        .mount("/swagger", make_swagger_ui(&get_docs()))
        .manage(crate::gateway::shared(gateway))
        .manage(std::sync::Arc::new(rocket::futures::lock::Mutex::new(
            session,
        )))
}

/// Initializes and configures the Rocket web server from `config`.
///
/// # Example
///
/// ```no_run
/// use army_builder::config::ServiceConfig;
/// use army_builder::try_rocket_initialize;
///
/// #[rocket::main]
/// async fn main() {
///     let rocket = try_rocket_initialize(&ServiceConfig::from_env()).expect("store setup");
///     rocket.launch().await.expect("Failed to launch rocket");
/// }
/// ```
pub fn try_rocket_initialize(config: &ServiceConfig) -> Result<rocket::Rocket<rocket::Build>> {
    Ok(rocket_with_gateway(build_gateway(config)?))
}

/// Rocket instance over an in-memory store with the demo catalog.
pub fn rocket_initialize() -> rocket::Rocket<rocket::Build> {
    let gateway = match build_gateway(&ServiceConfig::default()) {
        Ok(gw) => gw,
        Err(e) => {
            log::error!("In-memory store setup failed: {}", e);
            ContentStoreGateway::new(ContentStore::new())
        }
    };
    rocket_with_gateway(gateway)
}

fn get_docs() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/openapi.json".to_string(),
        ..Default::default()
    }
}
