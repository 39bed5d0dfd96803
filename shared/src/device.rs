use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::storage::{Storage, StorageError, DEVICE_ID_KEY};

/// Advisory identifier for one device. Clearing storage yields a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mixes a random component with the current time.
    pub fn generate() -> Self {
        let mut hasher = Sha256::new();
        hasher.update(Uuid::new_v4().as_bytes());
        hasher.update(OffsetDateTime::now_utc().unix_timestamp_nanos().to_be_bytes());
        let digest = hasher.finalize();
        Self(format!("device_{}", URL_SAFE_NO_PAD.encode(&digest[..12])))
    }

    pub fn load_or_create(storage: &mut impl Storage) -> Result<Self, StorageError> {
        if let Some(existing) = storage.get(DEVICE_ID_KEY)? {
            if !existing.is_empty() {
                return Ok(Self(existing));
            }
        }

        let identity = Self::generate();
        storage.set(DEVICE_ID_KEY, identity.as_str())?;
        info!("🆔 Generated device identity {}", identity);
        Ok(identity)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeviceIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
