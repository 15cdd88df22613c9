use crate::core::Transaction;
use crate::error::{NodeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Largest chunk a single receive will pull off the socket.
///
/// There is no length prefix and no delimiter: one read is one decode
/// attempt, and nothing is carried over to the next read.
pub const MAX_READ_SIZE: usize = 1024;

pub const TRANSACTION_TYPE: &str = "transaction";

/// What goes over the wire
#[derive(Debug, Serialize, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// P2P message envelope
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Transaction(Transaction),
    /// Any other `type`, or a `"transaction"` whose `data` is not a
    /// transaction. Logged by the receiver, never acted on.
    Other { kind: String, data: Value },
}

impl Envelope {
    pub fn kind(&self) -> &str {
        match self {
            Envelope::Transaction(_) => TRANSACTION_TYPE,
            Envelope::Other { kind, .. } => kind.as_str(),
        }
    }

    /// JSON object, UTF-8 encoded
    pub fn encode(&self) -> Result<Vec<u8>> {
        let raw = match self {
            Envelope::Transaction(tx) => RawEnvelope {
                kind: TRANSACTION_TYPE.to_string(),
                data: serde_json::to_value(tx)?,
            },
            Envelope::Other { kind, data } => RawEnvelope {
                kind: kind.clone(),
                data: data.clone(),
            },
        };
        Ok(serde_json::to_vec(&raw)?)
    }

    /// Decode `bytes` as exactly one envelope.
    ///
    /// Fails with `Decode` when the bytes are not UTF-8, are not a single
    /// complete JSON object (two coalesced messages included), or the object
    /// has no string `type`.
    pub fn decode(bytes: &[u8]) -> Result<Envelope> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| NodeError::Decode(format!("Message is not valid UTF-8: {e}")))?;

        let raw: RawEnvelope = serde_json::from_str(text)
            .map_err(|e| NodeError::Decode(format!("Failed to deserialize message: {e}")))?;

        if raw.kind == TRANSACTION_TYPE {
            if let Ok(tx) = serde_json::from_value::<Transaction>(raw.data.clone()) {
                return Ok(Envelope::Transaction(tx));
            }
        }

        Ok(Envelope::Other {
            kind: raw.kind,
            data: raw.data,
        })
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Envelope::Transaction(tx) => write!(f, "{TRANSACTION_TYPE}: {tx}"),
            Envelope::Other { kind, data } => write!(f, "{kind}: {data}"),
        }
    }
}
