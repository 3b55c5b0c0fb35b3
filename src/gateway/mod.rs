//! Persistence gateways the attendance service reads from and writes to.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::backend::BackendClient;
use crate::config::{Config, GatewayKind};
use crate::error::GatewayError;
use crate::model::attendance::AttendanceRecord;

pub mod local;
pub mod remote;
pub mod storage;

pub use local::LocalGateway;
pub use remote::RemoteGateway;
pub use storage::{FileStorage, MemoryStorage, RecordStorage};

#[async_trait]
pub trait ShiftGateway: Send + Sync {
    /// All records of `user`, normalized.
    async fn list(&self, user: &str) -> Result<Vec<AttendanceRecord>, GatewayError>;

    /// Persists `record` and returns the refreshed records of `user`.
    async fn save(
        &self,
        user: &str,
        record: &AttendanceRecord,
    ) -> Result<Vec<AttendanceRecord>, GatewayError>;
}

/// Builds the gateway selected by `GATEWAY`.
pub fn from_config(config: &Config, backend: BackendClient) -> Result<Arc<dyn ShiftGateway>> {
    info!(gateway = %config.gateway, "Selecting persistence gateway");

    let gateway: Arc<dyn ShiftGateway> = match config.gateway {
        GatewayKind::Local => {
            let storage = FileStorage::open(&config.local_store_dir)?;
            Arc::new(LocalGateway::new(Arc::new(storage)))
        }
        GatewayKind::Remote => Arc::new(RemoteGateway::new(backend, config.display_offset)),
    };

    Ok(gateway)
}
