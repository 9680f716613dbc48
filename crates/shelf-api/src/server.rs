//! Request dispatch.

use std::time::Duration;

use shelf_assets::AssetResolver;
use shelf_catalog::CatalogSync;
use shelf_core::{RequestId, ShowcaseConfig};
use shelf_data::HttpTransport;
use shelf_observability::{LogFormat, LogLevel, LogSink, StructuredLogger};

use crate::{handlers, ApiRequest, ApiResponse, Route, RouteMiss};

/// The showcase's inbound HTTP surface.
///
/// Holds no per-request state; a single instance may serve any number of
/// requests.
pub struct ShowcaseApi<T: HttpTransport> {
    transport: T,
    config: ShowcaseConfig,
    catalog: CatalogSync<T>,
    assets: AssetResolver<T>,
    log_format: LogFormat,
    min_level: LogLevel,
    log_sink: LogSink,
}

impl<T: HttpTransport + Clone> ShowcaseApi<T> {
    pub fn new(transport: T, config: ShowcaseConfig) -> Self {
        Self {
            catalog: CatalogSync::new(transport.clone(), &config),
            assets: AssetResolver::new(transport.clone(), &config),
            transport,
            config,
            log_format: LogFormat::Json,
            min_level: LogLevel::Info,
            log_sink: LogSink::Stderr,
        }
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_log_sink(mut self, sink: LogSink) -> Self {
        self.log_sink = sink;
        self
    }

    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    /// Handle one request. Never fails; every outcome is a response
    /// carrying an `x-request-id` header.
    pub async fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let request_id = RequestId::generate();
        let logger = StructuredLogger::new(request_id.clone())
            .with_component("api")
            .with_route(request.path())
            .with_format(self.log_format)
            .with_min_level(self.min_level)
            .with_sink(self.log_sink.clone());

        logger
            .debug_builder("request started")
            .field("method", request.method.as_str())
            .emit();

        let response = match Route::resolve(request.method, request.path()) {
            Ok(route) => {
                let scoped = logger.for_component(route.component());
                self.dispatch(route, request, &scoped).await
            }
            Err(miss) => miss_response(miss),
        };

        logger
            .info_builder("request complete")
            .field("method", request.method.as_str())
            .field_u64("status", response.status as u64)
            .duration_ms("duration_ms", Duration::from_micros(logger.elapsed_us()))
            .emit();

        response.with_header("x-request-id", request_id.to_string())
    }

    async fn dispatch(
        &self,
        route: Route,
        request: &ApiRequest,
        logger: &StructuredLogger,
    ) -> ApiResponse {
        match route {
            Route::Products => handlers::products(&self.catalog, &self.config, logger).await,
            Route::ProductsStatus => {
                handlers::products_status(self.transport.clone(), &self.config, logger).await
            }
            Route::Images => handlers::images(&self.assets, request, logger).await,
        }
    }
}

fn miss_response(miss: RouteMiss) -> ApiResponse {
    match miss {
        RouteMiss::NotFound => ApiResponse::json(404, &serde_json::json!({ "error": "Not found" })),
        RouteMiss::MethodNotAllowed => {
            ApiResponse::json(405, &serde_json::json!({ "error": "Method not allowed" }))
                .with_header("allow", "GET")
        }
    }
}
