//! Payload decoding: drives the record decoder over the stitch stream.
//!
//! # Strategy selection
//! [`decode_records`] decodes `payload.len() / 3` whole records in strict
//! input order; up to two trailing remainder bytes are ignored, never an
//! error. Small payloads decode in one sequential pass. Payloads of at
//! least [`PARALLEL_BYTE_THRESHOLD`] bytes that also clear the
//! [`PARALLEL_RECORD_FLOOR`] are split into [`PARALLEL_CHUNKS`] contiguous
//! record-aligned chunks, decoded independently, and merged back in chunk
//! order.
//!
//! Both strategies produce record-for-record identical output: chunk
//! boundaries are record-aligned, chunks never overlap, and the merge
//! preserves the original record index. The chunked path is safe to force
//! on any input, which the equivalence tests do.
//!
//! # Parallelism
//! Chunk decoding fans out on Rayon when the `parallel` feature is
//! enabled and falls back to plain iteration otherwise. Records carry no
//! state between one another at this layer, so the fan-out shares nothing
//! and the ordered merge is the only join point.

use crate::stitch::{Stitch, RECORD_SIZE};

/// Payload size at which chunked decoding starts to pay for itself.
pub const PARALLEL_BYTE_THRESHOLD: usize = 1024 * 1024;

/// Minimum record count for chunked dispatch. A payload barely over the
/// byte threshold does not justify the fan-out overhead on its own.
pub const PARALLEL_RECORD_FLOOR: usize = 10_000;

/// Number of contiguous chunks the record index range is split into.
pub const PARALLEL_CHUNKS: usize = 4;

/// Decode every whole record in `payload`, selecting the strategy by size.
pub fn decode_records(payload: &[u8]) -> Vec<Stitch> {
    let record_count = payload.len() / RECORD_SIZE;
    if payload.len() >= PARALLEL_BYTE_THRESHOLD && record_count >= PARALLEL_RECORD_FLOOR {
        log::debug!("decoding {record_count} records in {PARALLEL_CHUNKS} chunks");
        decode_chunked(payload)
    } else {
        decode_sequential(payload)
    }
}

/// Decode every whole record in one pass, in input order.
pub fn decode_sequential(payload: &[u8]) -> Vec<Stitch> {
    payload
        .chunks_exact(RECORD_SIZE)
        .map(|r| Stitch::decode([r[0], r[1], r[2]]))
        .collect()
}

/// Decode via contiguous record-aligned chunks and an ordered merge.
///
/// Output is identical to [`decode_sequential`] for every input. Exposed
/// so callers and tests can force the chunked path below the thresholds.
pub fn decode_chunked(payload: &[u8]) -> Vec<Stitch> {
    let record_count = payload.len() / RECORD_SIZE;
    if record_count == 0 {
        return Vec::new();
    }

    // Records per chunk, rounded up so the last chunk absorbs the ragged
    // tail. Byte boundaries stay record-aligned by construction.
    let chunk_records = record_count.div_ceil(PARALLEL_CHUNKS);
    let body = &payload[..record_count * RECORD_SIZE];

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        // par_chunks yields chunks in input order and collect preserves
        // that order, which is the ordered merge.
        let chunks: Vec<Vec<Stitch>> = body
            .par_chunks(chunk_records * RECORD_SIZE)
            .map(decode_sequential)
            .collect();
        merge_ordered(record_count, chunks)
    }

    #[cfg(not(feature = "parallel"))]
    {
        let chunks: Vec<Vec<Stitch>> = body
            .chunks(chunk_records * RECORD_SIZE)
            .map(decode_sequential)
            .collect();
        merge_ordered(record_count, chunks)
    }
}

fn merge_ordered(record_count: usize, chunks: Vec<Vec<Stitch>>) -> Vec<Stitch> {
    let mut records = Vec::with_capacity(record_count);
    for mut chunk in chunks {
        records.append(&mut chunk);
    }
    debug_assert_eq!(records.len(), record_count);
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i.wrapping_mul(37) >> 2) as u8).collect()
    }

    #[test]
    fn record_count_is_floor_of_thirds() {
        assert_eq!(decode_records(&[]).len(), 0);
        assert_eq!(decode_records(&[1]).len(), 0);
        assert_eq!(decode_records(&[1, 2]).len(), 0);
        assert_eq!(decode_records(&[1, 2, 3]).len(), 1);
        assert_eq!(decode_records(&payload(7)).len(), 2);
        assert_eq!(decode_records(&payload(3000)).len(), 1000);
    }

    #[test]
    fn trailing_bytes_ignored() {
        let full = decode_records(&payload(300));
        let ragged = decode_records(&payload(302));
        assert_eq!(full, ragged);
    }

    #[test]
    fn sequential_and_chunked_agree() {
        for len in [0, 1, 2, 3, 11, 12, 300, 3001, 48_000] {
            let data = payload(len);
            assert_eq!(
                decode_sequential(&data),
                decode_chunked(&data),
                "strategy divergence at payload length {len}"
            );
        }
    }

    #[test]
    fn chunked_handles_fewer_records_than_chunks() {
        let data = payload(RECORD_SIZE * 2);
        assert_eq!(decode_chunked(&data).len(), 2);
        assert_eq!(decode_chunked(&data), decode_sequential(&data));
    }

    #[test]
    fn input_order_preserved() {
        // dx=+1 record followed by dx=-1 record.
        let data = [0x01, 0, 0, 0x02, 0, 0];
        let records = decode_records(&data);
        assert_eq!(records[0].dx, 1);
        assert_eq!(records[1].dx, -1);
    }
}
