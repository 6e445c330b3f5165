//! Health check endpoint, used by load balancers and monitoring.

use chrono::Utc;

/// GET /
///
/// Always 200 with a short status line; never touches storage.
pub async fn health_check() -> String {
    format!("RentScout API is running... Healthy at {}", Utc::now().to_rfc3339())
}
