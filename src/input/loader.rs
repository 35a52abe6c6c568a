use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::core::Route;
use crate::error::DataLoadError;
use crate::input::{detect_format, parse_route};

/// Source of a recorded route
///
/// Implementations complete exactly once per call, with the route or a
/// single error. Retrying is the caller's decision.
#[async_trait]
pub trait RouteLoader: Send + Sync {
    /// Human-readable description of where the route comes from
    fn describe(&self) -> String;

    async fn load(&self) -> Result<Route, DataLoadError>;
}

/// Loads a route from a JSON or CSV file on disk
#[derive(Debug, Clone)]
pub struct FileRouteLoader {
    path: PathBuf,
}

impl FileRouteLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RouteLoader for FileRouteLoader {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<Route, DataLoadError> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| DataLoadError::io(&self.path, e))?;

        let format = detect_format(&self.path, &data);
        debug!(path = %self.path.display(), ?format, bytes = data.len(), "read route file");

        let route = parse_route(&data, format, &self.path)?;
        info!(path = %self.path.display(), points = route.len(), "route loaded");
        Ok(route)
    }
}
