use crate::{
    config::Config,
    error::Error,
    review::{Review, ReviewInput},
    store::{Connect, Store},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Reviews returned by a single GET.
pub const LIST_LIMIT: i64 = 50;

/// The subset of an API Gateway proxy event this function reads.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default, deserialize_with = "null_as_unsupported")]
    pub http_method: Method,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Options,
    #[default]
    Get,
    Post,
    #[serde(other)]
    Unsupported,
}

fn null_as_unsupported<'de, D>(deserializer: D) -> Result<Method, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Method>::deserialize(deserializer)
        .map(|method| method.unwrap_or(Method::Unsupported))
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ProxyResponse {
    fn preflight() -> Self {
        ProxyResponse {
            status_code: 200,
            headers: headers(&[
                ("Access-Control-Allow-Origin", "*"),
                ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
                ("Access-Control-Allow-Headers", "Content-Type"),
                ("Access-Control-Max-Age", "86400"),
            ]),
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    fn json(status_code: u16, body: Value) -> Self {
        ProxyResponse {
            status_code,
            headers: headers(&[
                ("Content-Type", "application/json"),
                ("Access-Control-Allow-Origin", "*"),
            ]),
            body: body.to_string(),
            is_base64_encoded: false,
        }
    }

    fn error(status_code: u16, err: &Error) -> Self {
        ProxyResponse::json(status_code, json!({ "error": err.to_string() }))
    }
}

fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

pub struct ReviewsEndpoint<C> {
    config: Config,
    connector: C,
}

impl<C: Connect> ReviewsEndpoint<C> {
    pub fn new(config: Config, connector: C) -> Self {
        ReviewsEndpoint { config, connector }
    }

    /// Answers one proxy request. Client errors become 4xx responses;
    /// store and body faults are returned to the runtime as is.
    pub async fn handle(&self, request: ProxyRequest) -> Result<ProxyResponse, Error> {
        let method = request.http_method;
        match self.dispatch(request).await {
            Ok(response) => Ok(response),
            Err(err) => match err.status_code() {
                Some(status_code) => {
                    log::warn!("rejected {:?} request: {}", method, err);
                    Ok(ProxyResponse::error(status_code, &err))
                }
                None => {
                    log::error!("failed to handle {:?} request: {}", method, err);
                    Err(err)
                }
            },
        }
    }

    async fn dispatch(&self, request: ProxyRequest) -> Result<ProxyResponse, Error> {
        if request.http_method == Method::Options {
            return Ok(ProxyResponse::preflight());
        }
        let mut store = self.connector.connect(&self.config).await?;
        let result = respond(&mut store, request).await;
        release(store).await;
        result
    }
}

async fn respond<S: Store>(store: &mut S, request: ProxyRequest) -> Result<ProxyResponse, Error> {
    match request.http_method {
        Method::Options => Ok(ProxyResponse::preflight()),
        Method::Get => {
            log::info!("listing reviews");
            let reviews = store.recent(LIST_LIMIT).await?;
            Ok(ProxyResponse::json(200, json!({ "reviews": reviews })))
        }
        Method::Post => {
            let input: ReviewInput =
                serde_json::from_str(request.body.as_deref().unwrap_or("{}"))?;
            let review = input.validate()?;
            log::info!("creating review by {}", review.username);
            let review: Review = store.insert(&review).await?;
            Ok(ProxyResponse::json(
                201,
                json!({ "success": true, "review": review }),
            ))
        }
        Method::Unsupported => Err(Error::MethodNotAllowed),
    }
}

/// Closes `store` whatever the outcome of the work done on it. Close
/// failures are logged, not returned.
async fn release<S: Store>(store: S) {
    if let Err(err) = store.close().await {
        log::error!("failed to close store connection: {}", err);
    }
}
