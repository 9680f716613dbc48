//! Endpoint handlers.

use shelf_assets::{AssetQuery, AssetResolver, CachePolicy};
use shelf_catalog::{check_status, CatalogSync};
use shelf_core::ShowcaseConfig;
use shelf_data::HttpTransport;
use shelf_observability::StructuredLogger;

use crate::{ApiRequest, ApiResponse};

/// `GET /api/products`
pub(crate) async fn products<T: HttpTransport>(
    catalog: &CatalogSync<T>,
    config: &ShowcaseConfig,
    logger: &StructuredLogger,
) -> ApiResponse {
    let snapshot = catalog.fetch_catalog(logger).await;
    let reply = snapshot.into_reply(config.fallback);

    ApiResponse::json(reply.status_code(), &reply.to_json())
        .with_header("cache-control", CachePolicy::no_store().cache_control_header())
}

/// `GET /api/products/status`
pub(crate) async fn products_status<T: HttpTransport>(
    transport: T,
    config: &ShowcaseConfig,
    logger: &StructuredLogger,
) -> ApiResponse {
    let report = check_status(transport, config, logger).await;
    let response = match serde_json::to_value(&report) {
        Ok(body) => ApiResponse::json(report.status_code(), &body),
        Err(err) => {
            logger
                .error_builder("failed to serialize status report")
                .field("error", err.to_string())
                .emit();
            ApiResponse::json(500, &serde_json::json!({ "ok": false }))
        }
    };
    response.with_header("cache-control", CachePolicy::no_store().cache_control_header())
}

/// `GET /api/images`
pub(crate) async fn images<T: HttpTransport>(
    resolver: &AssetResolver<T>,
    request: &ApiRequest,
    logger: &StructuredLogger,
) -> ApiResponse {
    let query = AssetQuery::parse(request.raw_query());

    match resolver.resolve(&query, logger).await {
        Ok(asset) => ApiResponse::new(200)
            .with_header("content-type", asset.content_type)
            .with_header("cache-control", asset.cache_control)
            .with_body(asset.body),
        Err(err) => ApiResponse::text(err.status_code(), err.to_string())
            .with_header("cache-control", CachePolicy::no_store().cache_control_header()),
    }
}
