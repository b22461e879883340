//! Route resolution for computed link URLs.
//!
//! Index documents carry thumbnail/preview/download URLs resolved from
//! named application routes. The resolver is a collaborator owned by the
//! host application; a REST-style default is provided.

use thiserror::Error;

/// Named routes the link fields derive from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Thumbnail,
    Preview,
    Download,
}

impl Route {
    /// The application route name.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Thumbnail => "document-thumb",
            Route::Preview => "document-preview",
            Route::Download => "document-download",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Errors from route resolution.
#[derive(Debug, Error)]
pub enum RouteError {
    /// No route exists for this record id
    #[error("Unknown record: {0}")]
    UnknownRecord(i64),

    /// The resolver does not know this route name
    #[error("Unknown route: {0}")]
    UnknownRoute(String),
}

/// Resolves a named route for a record id to a URL.
///
/// A failed resolution aborts indexing for that record; it is never
/// substituted with an empty link.
pub trait RouteResolver: Send + Sync {
    fn resolve(&self, route: Route, record_id: i64) -> Result<String, RouteError>;
}

/// Default resolver producing REST-style paths under a base prefix.
#[derive(Debug, Clone)]
pub struct ApiRouteResolver {
    base: String,
}

impl ApiRouteResolver {
    /// Create a resolver rooted at the given base path.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for ApiRouteResolver {
    fn default() -> Self {
        Self::new("/api")
    }
}

impl RouteResolver for ApiRouteResolver {
    fn resolve(&self, route: Route, record_id: i64) -> Result<String, RouteError> {
        let segment = match route {
            Route::Thumbnail => "thumb",
            Route::Preview => "preview",
            Route::Download => "download",
        };
        Ok(format!("{}/documents/{}/{}/", self.base, record_id, segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_names() {
        assert_eq!(Route::Thumbnail.name(), "document-thumb");
        assert_eq!(Route::Preview.name(), "document-preview");
        assert_eq!(Route::Download.name(), "document-download");
    }

    #[test]
    fn test_api_resolver_paths() {
        let resolver = ApiRouteResolver::default();
        assert_eq!(
            resolver.resolve(Route::Thumbnail, 42).unwrap(),
            "/api/documents/42/thumb/"
        );
        assert_eq!(
            resolver.resolve(Route::Download, 7).unwrap(),
            "/api/documents/7/download/"
        );
    }

    #[test]
    fn test_api_resolver_trims_trailing_slash() {
        let resolver = ApiRouteResolver::new("https://app.example.org/api/");
        assert_eq!(
            resolver.resolve(Route::Preview, 1).unwrap(),
            "https://app.example.org/api/documents/1/preview/"
        );
    }
}
