//! Product showcase API as a Spin HTTP component.
//!
//! Adapts Spin's request and response types onto `shelf-api`. Configuration
//! comes from Spin variables, falling back to the process environment.
//!
//! Only built for `wasm32`, where the Spin outbound transport exists.

#![cfg(target_arch = "wasm32")]

use anyhow::{anyhow, Context};
use futures::SinkExt;
use spin_sdk::http::{Fields, IncomingRequest, OutgoingResponse, ResponseOutparam};
use spin_sdk::http_component;

use shelf_api::{ApiRequest, ApiResponse, ShowcaseApi};
use shelf_core::{RequestId, ShowcaseConfig};
use shelf_data::{Method, SpinTransport};
use shelf_observability::{LogFormat, StructuredLogger};

#[http_component]
async fn handle(req: IncomingRequest, response_out: ResponseOutparam) {
    let log_format = LogFormat::parse(&lookup("LOG_FORMAT").unwrap_or_default());

    let response = match load_config() {
        Ok(config) => {
            let api = ShowcaseApi::new(SpinTransport, config).with_log_format(log_format);
            let request = ApiRequest::new(
                map_method(&req.method()),
                req.path_with_query().unwrap_or_default(),
            );
            api.handle(&request).await
        }
        Err(err) => {
            let request_id = RequestId::generate();
            StructuredLogger::new(request_id.clone())
                .with_component("showcase-api")
                .with_format(log_format)
                .error_builder("invalid configuration")
                .field("error", format!("{:#}", err))
                .emit();
            ApiResponse::text(500, "Server misconfigured")
                .with_header("x-request-id", request_id.to_string())
        }
    };

    if let Err(err) = write_response(response, response_out).await {
        eprintln!("failed to write response: {:#}", err);
    }
}

/// Spin variables are lowercase; environment variables keep their case.
fn lookup(key: &str) -> Option<String> {
    spin_sdk::variables::get(&key.to_ascii_lowercase())
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| std::env::var(key).ok())
}

fn load_config() -> anyhow::Result<ShowcaseConfig> {
    ShowcaseConfig::from_lookup(lookup).context("loading showcase configuration")
}

fn map_method(method: &spin_sdk::http::Method) -> Method {
    use spin_sdk::http::Method as Spin;
    match method {
        Spin::Get => Method::Get,
        Spin::Post => Method::Post,
        Spin::Put => Method::Put,
        Spin::Patch => Method::Patch,
        Spin::Delete => Method::Delete,
        Spin::Head => Method::Head,
        // Anything else is answered 405 by the router.
        _ => Method::Options,
    }
}

async fn write_response(response: ApiResponse, response_out: ResponseOutparam) -> anyhow::Result<()> {
    let header_list: Vec<(String, Vec<u8>)> = response
        .headers
        .into_iter()
        .map(|(k, v)| (k, v.into_bytes()))
        .collect();

    let headers = Fields::from_list(&header_list)
        .map_err(|e| anyhow!("invalid response headers: {:?}", e))?;
    let outgoing = OutgoingResponse::new(headers);
    outgoing
        .set_status_code(response.status)
        .map_err(|_| anyhow!("invalid status code {}", response.status))?;

    let mut body = outgoing.take_body();
    response_out.set(outgoing);
    body.send(response.body)
        .await
        .map_err(|e| anyhow!("writing response body: {:?}", e))?;
    Ok(())
}
