use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{error, warn};

use super::api::{BytesVec, SessionError, SessionResult};

const IDENTICALL_SERIALIZATION_VERSION: u16 = 0;

pub fn encode<T: Serialize>(payload: &T) -> SessionResult<BytesVec> {
    serialize(&BytesVecVersioned {
        version: IDENTICALL_SERIALIZATION_VERSION,
        payload: serialize(payload)?,
    })
}

fn serialize<T: ?Sized>(value: &T) -> SessionResult<BytesVec>
where
    T: serde::Serialize,
{
    match bincode::serialize(value) {
        Ok(bytes) => Ok(bytes),
        Err(err) => {
            error!("serialization failure: {}", err.to_string());
            Err(SessionError::Fatal)
        }
    }
}

/// deserialization failures are non-fatal: do not return SessionResult
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    let bytes_versioned: BytesVecVersioned = bincode::deserialize(bytes)
        .map_err(|err| {
            warn!("outer deserialization failure: {}", err.to_string());
        })
        .ok()?;
    if bytes_versioned.version != IDENTICALL_SERIALIZATION_VERSION {
        warn!(
            "encoding version {}, expected {}",
            bytes_versioned.version, IDENTICALL_SERIALIZATION_VERSION
        );
        return None;
    }
    bincode::deserialize(&bytes_versioned.payload)
        .map_err(|err| {
            warn!("inner deserialization failure: {}", err.to_string());
        })
        .ok()
}

#[derive(Serialize, Deserialize)]
struct BytesVecVersioned {
    version: u16,
    payload: BytesVec,
}
