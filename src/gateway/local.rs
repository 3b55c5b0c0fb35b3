use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use crate::error::GatewayError;
use crate::gateway::ShiftGateway;
use crate::gateway::storage::RecordStorage;
use crate::model::attendance::AttendanceRecord;

pub const STORAGE_KEY: &str = "attendanceRecords";

/// Keeps each user's records as one JSON array in a [`RecordStorage`].
pub struct LocalGateway {
    storage: Arc<dyn RecordStorage>,
    write_lock: Mutex<()>,
}

impl LocalGateway {
    pub fn new(storage: Arc<dyn RecordStorage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    fn key(user: &str) -> String {
        format!("{STORAGE_KEY}:{user}")
    }

    fn read(&self, user: &str) -> Result<Vec<AttendanceRecord>, GatewayError> {
        match self.storage.get(&Self::key(user))? {
            Some(json) if !json.trim().is_empty() => Ok(serde_json::from_str(&json)?),
            _ => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl ShiftGateway for LocalGateway {
    async fn list(&self, user: &str) -> Result<Vec<AttendanceRecord>, GatewayError> {
        self.read(user)
    }

    async fn save(
        &self,
        user: &str,
        record: &AttendanceRecord,
    ) -> Result<Vec<AttendanceRecord>, GatewayError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| GatewayError::Storage("local gateway lock poisoned".into()))?;

        let mut records = self.read(user)?;
        match records.iter_mut().find(|existing| existing.date == record.date) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }

        self.storage
            .set(&Self::key(user), &serde_json::to_string(&records)?)?;
        debug!(user, date = %record.date, total = records.len(), "Saved record locally");

        Ok(records)
    }
}
