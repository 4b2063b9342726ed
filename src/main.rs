use army_builder::config::ServiceConfig;
use army_builder::try_rocket_initialize;

#[rocket::main]
async fn main() {
    let _ = env_logger::try_init();
    let config = ServiceConfig::from_env();
    let rocket = match try_rocket_initialize(&config) {
        Ok(r) => r,
        Err(e) => {
            log::error!("Could not open army store: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = rocket.launch().await {
        log::error!("Rocket failed: {}", e);
        std::process::exit(1);
    }
}
