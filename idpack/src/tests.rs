//! Round-trip testing for verifying that the entire pipeline
//! (extract runs -> package -> encode -> decode -> resolve) works correctly
//! for a wide variety of input data patterns, window sizes and alphabets.

use std::collections::BTreeSet;
use std::num::NonZeroU16;

use more_asserts::assert_le;
use proptest::prelude::*;
use test_case::test_case;

use crate::{Alphabet, Config, Decodable, IdPacker, Segment, Segments};

/// Maximum value for generated IDs to keep tests reasonable
const MAX_ID_VALUE: u64 = 10_000_000;

/// Maximum gap between consecutive values in sparse sequences
const MAX_SPARSE_GAP: u64 = 1_000_000;

/// Window sizes exercised by the property tests.
const WINDOW_SIZES: [u16; 4] = [1, 2, 10, 1000];

fn packer(window_size: u16) -> IdPacker {
    let window_size = NonZeroU16::new(window_size).expect("window sizes are non-zero");
    IdPacker::new(Config::default().with_window_size(window_size))
}

// Main property test suite for round-trip testing of the codec
proptest! {
    #[test]
    fn test_roundtrip_dense_sequences(values in prop::collection::vec(0..10000u64, 1..1000)) {
        for window_size in WINDOW_SIZES {
            roundtrip_test(&packer(window_size), &values).expect("round-trip failed");
        }
    }

    #[test]
    fn test_roundtrip_sparse_sequences(
        base in 0..1000u64,
        increments in prop::collection::vec(1..MAX_SPARSE_GAP, 1..100)
    ) {
        // Create a sparse sequence with large gaps
        let mut values = vec![base];
        let mut current = base;

        for inc in increments {
            current += inc;
            if current <= MAX_ID_VALUE {
                values.push(current);
            }
        }

        for window_size in WINDOW_SIZES {
            roundtrip_test(&packer(window_size), &values).expect("round-trip failed");
        }
    }

    #[test]
    fn test_roundtrip_mixed_density(
        dense_runs in prop::collection::vec((1..5u64, 1..40usize), 1..10),
        gaps in prop::collection::vec(1..10000u64, 1..10),
        window_size in 1..64u16,
    ) {
        // Create sequences with mixed density patterns
        let mut values = Vec::new();
        let mut current = 0u64;

        for (i, (step, count)) in dense_runs.into_iter().enumerate() {
            // Add a gap before each dense run (except first)
            if i > 0 && i - 1 < gaps.len() {
                current += gaps[i - 1];
            }

            for _ in 0..count {
                values.push(current);
                current += step;
            }
        }

        roundtrip_test(&packer(window_size), &values).expect("round-trip failed");
    }

    #[test]
    fn test_roundtrip_custom_alphabets(
        values in prop::collection::vec(0..100_000u64, 0..200),
        symbols in prop::sample::select(vec!["01", "xyz", "0123456789", "ABCDEFGHIJKLMNOPQRSTUVWXYZ"]),
        window_size in 1..32u16,
    ) {
        let alphabet = Alphabet::new(symbols).expect("valid alphabet");
        let config = Config::default()
            .with_alphabet(alphabet)
            .with_window_size(NonZeroU16::new(window_size).expect("non-zero"));
        roundtrip_test(&IdPacker::new(config), &values).expect("round-trip failed");
    }

    #[test]
    fn test_bitmaps_never_exceed_window(
        values in prop::collection::vec(0..5000u64, 1..500),
        window_size in 1..100u16,
    ) {
        let encoded = packer(window_size).encode(values.iter().copied());
        let segments = Segments::decode(&encoded, &Alphabet::default()).expect("valid encoding");

        for segment in segments.iter() {
            if let Segment::Bitmap(bits) = segment {
                assert_le!(bits.bit_len(), usize::from(window_size));
            }
        }
    }

    #[test]
    fn test_corrupted_input_never_panics(encoded in "[_~.A-Za-z0-9@!-]{0,40}") {
        let packer = IdPacker::new(Config::default().with_value_limit(10_000));
        match packer.try_decode(&encoded) {
            Ok(ids) => prop_assert_eq!(packer.decode(&encoded), ids),
            Err(_) => prop_assert!(packer.decode(&encoded).is_empty()),
        }
    }
}

/// Helper function to ensure test data is sorted and unique
fn to_sorted_unique(values: &[u64]) -> Vec<u64> {
    let mut set = BTreeSet::new();
    set.extend(values);
    set.into_iter().collect()
}

/// Performs the full round-trip test: encode -> decode -> compare
fn roundtrip_test(packer: &IdPacker, values: &[u64]) -> Result<(), String> {
    let expected = to_sorted_unique(values);

    let encoded = packer.encode(values.iter().copied());
    let decoded = packer
        .try_decode(&encoded)
        .map_err(|error| format!("decoding {encoded:?} failed: {error}"))?;

    if expected.len() != decoded.len() {
        return Err(format!(
            "mismatched lengths for {encoded:?}: original={}, decoded={}",
            expected.len(),
            decoded.len()
        ));
    }

    // Note: we don't use a simple equals just so that we can provide a more
    // detailed error message in case of a mismatch.
    for (idx, (original, decoded)) in expected.iter().zip(decoded.iter()).enumerate() {
        if original != decoded {
            return Err(format!(
                "mismatch at index {idx} of {encoded:?}: original={original}, decoded={decoded}"
            ));
        }
    }

    Ok(())
}

#[test_case(&[5, 6, 21, 23, 25], "_F~C_P.V"; "reference vector")]
#[test_case(&[0], "_A~B"; "zero")]
#[test_case(&[], ""; "empty set")]
#[test_case(&[0, 2, 9], "_A.KL"; "window filling bitmap")]
#[test_case(&[0, 2, 9, 20], "_A.KL_L~B"; "bitmap then single")]
#[test_case(&[1, 3, 20], "_B.F_R~B"; "short bitmap then single")]
fn test_known_encodings(values: &[u64], expected: &str) {
    let packer = IdPacker::default();
    assert_eq!(packer.encode(values.iter().copied()), expected);
    assert_eq!(packer.decode(expected), values);
}

#[test_case(&[1, 2, 3, 1000, 1001, 1002]; "dense clusters with gap")]
#[test_case(&[10, 20, 30, 10000, 10001]; "varying step sizes")]
#[test_case(&[1, u64::MAX / 2, u64::MAX / 2 + 1]; "near maximum values")]
#[test_case(&[0, 1, 2, 3, 4, 5, 6, 7, 8]; "sequential values")]
#[test_case(&[1000, 10000, 100000, 1000000]; "logarithmic spacing")]
#[test_case(&[u64::MAX - 2, u64::MAX]; "top of the domain")]
fn test_specific_patterns(values: &[u64]) {
    for window_size in WINDOW_SIZES {
        roundtrip_test(&packer(window_size), values).expect("round-trip failed");
    }
}

#[test]
fn test_cached_record_ids() {
    let ids: Vec<u64> = vec![
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 21, 22, 23, 24, 25, 26, 27, 28, 29,
        30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 42, 44, 45, 46, 47, 48, 49, 50, 51, 52, 53, 54,
        55, 56, 57, 58, 59, 60, 61, 62, 63, 64, 65, 66, 67, 68, 69, 70, 71, 72, 73, 74, 75, 76, 77,
        78, 79, 80, 81, 82, 83, 84, 85, 86, 87, 88, 89, 90, 91, 92, 93, 94, 95, 96, 97, 98, 99,
        100, 101, 102, 103, 104, 105, 106, 107, 108, 109, 110, 111, 112, 113, 114, 115, 116, 117,
        118, 119, 120, 121, 122, 123, 124, 125, 126, 127, 128, 129, 130, 131, 132, 133, 134, 135,
        136, 137, 138, 139, 140, 141, 142, 143, 144, 145, 146, 147, 148, 149, 150, 151, 152, 153,
        154, 155, 156, 157, 158, 159, 160, 161, 162, 163, 164, 165, 166, 167, 168, 169, 170, 171,
        172, 173, 174, 175, 176, 177, 178, 179, 180, 181, 182, 183, 184, 185, 186, 187, 188, 189,
        190, 191, 192, 193, 194, 195, 196, 197, 198, 199, 200, 201, 202, 203, 204, 205, 206, 207,
        208, 209, 210, 300, 301, 302, 303, 304, 305, 306, 307, 308, 309, 310, 11111, 11112,
    ];

    for window_size in WINDOW_SIZES {
        roundtrip_test(&packer(window_size), &ids).expect("round-trip failed");
    }
    assert_le!(crate::encode(ids).len(), 40);
}

#[test]
fn test_large_sequence() {
    // Test with a large sequence to stress-test memory and performance
    let mut values: Vec<u64> = (1..10_000).collect();

    // Introduce some random larger gaps
    values.push(20_000);
    values.push(20_001);
    values.push(50_000);

    for window_size in WINDOW_SIZES {
        roundtrip_test(&packer(window_size), &values).expect("round-trip failed");
    }
}

#[test]
fn test_boundary_values() {
    // Values around the powers of the default base, where numerals grow a
    // symbol.
    let mut values = BTreeSet::new();
    for exponent in 1..10 {
        let base = 63u64.pow(exponent);
        values.extend([base - 1, base, base + 1]);
    }
    let values: Vec<u64> = values.into_iter().collect();

    for window_size in WINDOW_SIZES {
        roundtrip_test(&packer(window_size), &values).expect("round-trip failed");
    }
}

#[test]
fn test_crate_level_helpers() {
    assert_eq!(crate::encode([5, 6, 21, 23, 25]), "_F~C_P.V");
    assert_eq!(crate::decode("_F~C_P.V"), vec![5, 6, 21, 23, 25]);
    assert!(crate::decode("@@@invalid@@@").is_empty());
    assert!(crate::decode("").is_empty());
}
