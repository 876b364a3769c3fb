mod config;
mod endpoint;
mod error;
mod review;
mod store;

use config::Config;
use endpoint::{ProxyRequest, ReviewsEndpoint};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use store::Postgres;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let config = Config::from_env();
    if let Err(err) = config.database_url() {
        log::warn!("{}; only preflight requests will succeed", err);
    }
    let endpoint = ReviewsEndpoint::new(config, Postgres);
    let endpoint = &endpoint;
    run(service_fn(move |event: LambdaEvent<ProxyRequest>| async move {
        endpoint.handle(event.payload).await.map_err(Error::from)
    }))
    .await
}
