//! Rayon-powered batch log decoding.
//!
//! Each log is routed to its event by topic0 and decoded on the rayon pool;
//! the shared [`Interface`] is read-only so no locking is involved. Results
//! carry the index of the log they came from.

use abicodec_core::{error::DecodeError, DecodedLog, RawLog};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::interface::Interface;

/// How a batch reacts to a log that fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Drop failing logs. Suitable for best-effort analytics.
    #[default]
    Skip,
    /// Return errors alongside the successes.
    Collect,
    /// Abort the batch on the first failure (lowest index wins).
    Throw,
}

/// Successful decodes plus, in `Collect` mode, the failures.
#[derive(Debug, Default)]
pub struct BatchDecodeResult {
    pub logs: Vec<(usize, DecodedLog)>,
    /// Populated only when `ErrorMode::Collect` is used.
    pub errors: Vec<(usize, DecodeError)>,
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("log {index} failed to decode: {source}")]
    ItemFailed {
        index: usize,
        #[source]
        source: DecodeError,
    },
}

/// Decode `logs` in parallel against `iface`.
pub fn decode_logs(
    iface: &Interface,
    logs: &[RawLog],
    mode: ErrorMode,
) -> Result<BatchDecodeResult, BatchError> {
    let results: Vec<(usize, Result<DecodedLog, DecodeError>)> = logs
        .par_iter()
        .enumerate()
        .map(|(idx, log)| (idx, iface.parse_log(log)))
        .collect();

    let mut out = BatchDecodeResult {
        logs: Vec::with_capacity(results.len()),
        errors: Vec::new(),
    };
    let mut failed = 0usize;

    for (idx, result) in results {
        match result {
            Ok(decoded) => out.logs.push((idx, decoded)),
            Err(err) => {
                failed += 1;
                match mode {
                    ErrorMode::Skip => {}
                    ErrorMode::Collect => out.errors.push((idx, err)),
                    ErrorMode::Throw => {
                        warn!(index = idx, error = %err, "batch aborted");
                        return Err(BatchError::ItemFailed {
                            index: idx,
                            source: err,
                        });
                    }
                }
            }
        }
    }

    if failed > 0 {
        warn!(failed, total = logs.len(), ?mode, "some logs failed to decode");
    }
    info!(decoded = out.logs.len(), total = logs.len(), "batch decode complete");
    Ok(out)
}

/// Decode in chunks of at most `chunk_size` logs, each chunk in parallel.
/// Indexes in the result refer to positions in the full `logs` slice.
pub fn chunked_decode(
    iface: &Interface,
    logs: &[RawLog],
    mode: ErrorMode,
    chunk_size: usize,
) -> Result<BatchDecodeResult, BatchError> {
    let mut all = BatchDecodeResult::default();
    let mut offset = 0;

    for chunk in logs.chunks(chunk_size.max(1)) {
        let part = decode_logs(iface, chunk, mode).map_err(|BatchError::ItemFailed { index, source }| {
            BatchError::ItemFailed {
                index: offset + index,
                source,
            }
        })?;
        all.logs
            .extend(part.logs.into_iter().map(|(i, l)| (offset + i, l)));
        all.errors
            .extend(part.errors.into_iter().map(|(i, e)| (offset + i, e)));
        offset += chunk.len();
    }
    Ok(all)
}
