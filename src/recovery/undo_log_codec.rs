//! Encoding of persisted branch undo logs.
//!
//! The first byte of every encoded log names its format, so a store can hold
//! logs written under different `log_serialization` settings and still decode
//! each of them.
//!
//! ```text
//!   +--------+---------------------------------+
//!   | format |  payload (JSON text | bincode)  |
//!   +--------+---------------------------------+
//!     1 byte
//! ```

use bincode::config as bincode_config;

use crate::common::config::LogSerialization;
use crate::common::exception::UndoError;
use crate::recovery::undo_log::BranchUndoLog;

const JSON_TAG: u8 = b'J';
const BINCODE_TAG: u8 = b'B';

/// Bincode settings for persisted undo logs. Changing this is a format change.
#[inline]
fn undo_log_bincode_config() -> impl bincode_config::Config {
    bincode_config::standard()
        .with_little_endian()
        .with_fixed_int_encoding()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoLogCodec {
    serialization: LogSerialization,
}

impl UndoLogCodec {
    pub fn new(serialization: LogSerialization) -> Self {
        Self { serialization }
    }

    pub fn get_serialization(&self) -> LogSerialization {
        self.serialization
    }

    pub fn encode(&self, log: &BranchUndoLog) -> Result<Vec<u8>, UndoError> {
        let (tag, payload) = match self.serialization {
            LogSerialization::Json => (
                JSON_TAG,
                serde_json::to_vec(log).map_err(|e| UndoError::Codec(e.to_string()))?,
            ),
            LogSerialization::Bincode => (
                BINCODE_TAG,
                bincode::serde::encode_to_vec(log, undo_log_bincode_config())
                    .map_err(|e| UndoError::Codec(e.to_string()))?,
            ),
        };
        let mut bytes = Vec::with_capacity(payload.len() + 1);
        bytes.push(tag);
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Decodes a log written by any codec, whatever this codec's own format.
    pub fn decode(&self, bytes: &[u8]) -> Result<BranchUndoLog, UndoError> {
        let (tag, payload) = bytes
            .split_first()
            .ok_or_else(|| UndoError::Codec("empty undo log record".into()))?;
        match *tag {
            JSON_TAG => serde_json::from_slice(payload).map_err(|e| UndoError::Codec(e.to_string())),
            BINCODE_TAG => {
                let (log, read) = bincode::serde::decode_from_slice::<BranchUndoLog, _>(
                    payload,
                    undo_log_bincode_config(),
                )
                .map_err(|e| UndoError::Codec(e.to_string()))?;
                if read != payload.len() {
                    return Err(UndoError::Codec(format!(
                        "{} trailing bytes after undo log",
                        payload.len() - read
                    )));
                }
                Ok(log)
            }
            other => Err(UndoError::Codec(format!(
                "unknown undo log format tag 0x{:02x}",
                other
            ))),
        }
    }
}

impl Default for UndoLogCodec {
    fn default() -> Self {
        Self::new(LogSerialization::default())
    }
}
