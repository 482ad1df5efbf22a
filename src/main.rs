use actix_web::web::{Data, ServiceConfig};
use esep_webhook::{config::Config, webhook, State};
use shuttle_actix_web::ShuttleActixWeb;
use shuttle_runtime::SecretStore;
use tracing::{info, warn};

#[shuttle_runtime::main]
async fn main(
    #[shuttle_runtime::Secrets] secrets: SecretStore,
) -> ShuttleActixWeb<impl FnOnce(&mut ServiceConfig) + Send + Clone + 'static> {
    let config = Config::from_secrets(&secrets);
    if config.slack_url().is_some() {
        info!("SLACK_URL is configured, issues events will be forwarded");
    } else {
        warn!("SLACK_URL is not set. Issues events will be answered with 500 until it is provided");
    }

    let state = Data::new(State::new(config));

    let config = move |cfg: &mut ServiceConfig| {
        cfg.app_data(state);
        webhook::configure(cfg);
    };

    Ok(config.into())
}
