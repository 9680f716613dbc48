use shelf_data::Method;

/// An inbound endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Products,
    ProductsStatus,
    Images,
}

/// Why a request matched no endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMiss {
    NotFound,
    MethodNotAllowed,
}

impl RouteMiss {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
        }
    }
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Products, Route::ProductsStatus, Route::Images];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Products => "/api/products",
            Self::ProductsStatus => "/api/products/status",
            Self::Images => "/api/images",
        }
    }

    /// Component name used in logs.
    pub fn component(&self) -> &'static str {
        match self {
            Self::Products | Self::ProductsStatus => "catalog",
            Self::Images => "assets",
        }
    }

    /// Match a path (without query). A single trailing slash is ignored.
    pub fn resolve(method: Method, path: &str) -> Result<Self, RouteMiss> {
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        let route = Self::ALL
            .into_iter()
            .find(|r| r.path() == path)
            .ok_or(RouteMiss::NotFound)?;
        if method != Method::Get {
            return Err(RouteMiss::MethodNotAllowed);
        }
        Ok(route)
    }
}
