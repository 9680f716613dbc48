use shelf_data::Method;

/// Inbound request as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path plus raw query string, e.g. `/api/images?url=...`.
    pub path_with_query: String,
}

impl ApiRequest {
    pub fn new(method: Method, path_with_query: impl Into<String>) -> Self {
        Self {
            method,
            path_with_query: path_with_query.into(),
        }
    }

    pub fn get(path_with_query: impl Into<String>) -> Self {
        Self::new(Method::Get, path_with_query)
    }

    pub fn path(&self) -> &str {
        match self.path_with_query.split_once('?') {
            Some((path, _)) => path,
            None => &self.path_with_query,
        }
    }

    /// Raw, undecoded query string without the `?`.
    pub fn raw_query(&self) -> &str {
        self.path_with_query
            .split_once('?')
            .map(|(_, query)| query)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_and_query_split_on_first_question_mark() {
        let req = ApiRequest::get("/api/images?url=https://x.example/a?b=1");
        assert_eq!(req.path(), "/api/images");
        assert_eq!(req.raw_query(), "url=https://x.example/a?b=1");
    }

    #[test]
    fn test_no_query() {
        let req = ApiRequest::get("/api/products");
        assert_eq!(req.path(), "/api/products");
        assert_eq!(req.raw_query(), "");
    }
}
