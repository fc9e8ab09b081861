use proptest::collection::vec;
use proptest::prelude::*;

use dstitch::geometry::{absolute_path, bounds, counts, segments};
use dstitch::stream::{decode_chunked, decode_records, decode_sequential};
use dstitch::{header, Stitch, HEADER_SIZE, MAX_DISPLACEMENT};

proptest! {
    #[test]
    fn record_count_is_floor_of_thirds(payload in vec(any::<u8>(), 0..4096)) {
        prop_assert_eq!(decode_records(&payload).len(), payload.len() / 3);
    }

    #[test]
    fn sequential_and_chunked_strategies_agree(payload in vec(any::<u8>(), 0..6144)) {
        prop_assert_eq!(decode_sequential(&payload), decode_chunked(&payload));
    }

    #[test]
    fn record_decoding_is_pure_and_bounded(bytes in any::<[u8; 3]>()) {
        let first = Stitch::decode(bytes);
        prop_assert_eq!(first, Stitch::decode(bytes));
        prop_assert!(first.dx.abs() <= MAX_DISPLACEMENT);
        prop_assert!(first.dy.abs() <= MAX_DISPLACEMENT);
        prop_assert!(first.set_flag <= 3);
    }

    #[test]
    fn header_extraction_is_total(block in vec(any::<u8>(), HEADER_SIZE)) {
        // Must produce a header for arbitrary bytes, never panic.
        let (extracted, _) = header::extract(&block);
        let _ = extracted.dimensions();
    }

    #[test]
    fn full_decode_of_arbitrary_input(bytes in vec(any::<u8>(), HEADER_SIZE..2048)) {
        let design = dstitch::decode(&bytes).unwrap();
        prop_assert_eq!(design.stitch_count(), (bytes.len() - HEADER_SIZE) / 3);
        prop_assert!(dstitch::validate(&bytes));
    }

    #[test]
    fn geometry_invariants(payload in vec(any::<u8>(), 0..900)) {
        let records = decode_records(&payload);

        // One absolute position per record, in order, as a prefix sum.
        let path = absolute_path(&records);
        prop_assert_eq!(path.len(), records.len());
        let (mut x, mut y) = (0i64, 0i64);
        for (record, point) in records.iter().zip(&path) {
            x += i64::from(record.dx);
            y += i64::from(record.dy);
            prop_assert_eq!((point.x, point.y), (x, y));
        }

        // The bounding box covers every position.
        let b = bounds(&records);
        for point in &path {
            prop_assert!(b.min_x <= point.x && point.x <= b.max_x);
            prop_assert!(b.min_y <= point.y && point.y <= b.max_y);
        }

        // Counts partition the sequence.
        let c = counts(&records);
        prop_assert_eq!(c.total, records.len());
        prop_assert_eq!(c.jumps + c.regular, c.total);

        // Every non-jump contributes exactly one segment position, jumps
        // contribute none, and no emitted segment is empty.
        let segs = segments(&records);
        let segment_positions: usize = segs.iter().map(Vec::len).sum();
        prop_assert_eq!(segment_positions, c.regular);
        prop_assert!(segs.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn validate_rejects_short_input(bytes in vec(any::<u8>(), 0..HEADER_SIZE)) {
        prop_assert!(!dstitch::validate(&bytes));
    }
}
