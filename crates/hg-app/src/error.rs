//! Error types for the hg-app service layer.

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Street graph error: {0}")]
    Graph(String),

    #[error("The plant is unconnectable: nearest street is {distance:.3} away (limit {limit:.3})")]
    PlantUnconnectable { distance: f64, limit: f64 },

    #[error("Routing error: {0}")]
    Route(String),

    #[error("Network synthesis error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for hg-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<hg_project::ProjectError> for AppError {
    fn from(err: hg_project::ProjectError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<hg_project::ValidationError> for AppError {
    fn from(err: hg_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<hg_graph::GraphError> for AppError {
    fn from(err: hg_graph::GraphError) -> Self {
        AppError::Graph(err.to_string())
    }
}

impl From<hg_route::RouteError> for AppError {
    fn from(err: hg_route::RouteError) -> Self {
        AppError::Route(err.to_string())
    }
}

impl From<hg_network::NetworkError> for AppError {
    fn from(err: hg_network::NetworkError) -> Self {
        AppError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_error_converts_with_message() {
        let err: AppError = hg_graph::GraphError::EmptyNetwork.into();
        assert!(err.to_string().contains("empty street network"));
    }
}
