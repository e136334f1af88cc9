//! Round-trip, size-ordering, and corruption-rejection matrices.

use tablepack::random::RandomValue;
use tablepack::{
    compress, decompress, DecodeError, Decoder, DecoderOptions, EncodeError, Level, Table, Value,
};

const LEVELS: [Level; 3] = [Level::One, Level::Two, Level::Three];

fn record_batch(rows: usize) -> Value {
    let mut batch = Table::new();
    for i in 0..rows as i64 {
        let mut row = Table::new();
        row.insert(Value::Str("id".into()), Value::Int(i));
        row.insert(Value::Str("label".into()), Value::Str(format!("row-{i}")));
        row.insert(Value::Str("enabled".into()), Value::Bool(i % 2 == 0));
        row.insert(Value::Str("weight".into()), Value::Float(i as f64 * 0.25));
        batch.push(Value::Table(row));
    }
    Value::Table(batch)
}

#[test]
fn mixed_structure_roundtrips_at_all_levels() {
    let mut t = Table::new();
    t.push(Value::Int(-300));
    t.push(Value::Float(6.25));
    t.push(Value::Str("αβγ unicode".into()));
    t.push(Value::Bytes(vec![0, 1, 2, 3, 255]));
    t.insert(Value::Bool(false), Value::Str("bool key".into()));
    t.insert(Value::Float(2.5), Value::Int(25));
    t.insert(Value::Int(-9), Value::Str("negative key".into()));
    t.insert(Value::Str("nested".into()), record_batch(3));
    t.insert(Value::Str("gone".into()), Value::Nil);
    let value = Value::Table(t);

    for level in LEVELS {
        let payload = compress(&value, level).unwrap();
        assert_eq!(decompress(&payload).unwrap(), value, "{level:?}");
    }
}

#[test]
fn random_values_roundtrip_at_all_levels() {
    for seed in 0..25 {
        let value = RandomValue::new(seed).generate();
        for level in LEVELS {
            let payload = compress(&value, level).unwrap();
            assert_eq!(
                decompress(&payload).unwrap(),
                value,
                "seed {seed} at {level:?}"
            );
        }
    }
}

#[test]
fn repeated_keys_make_level_two_smaller() {
    // Eight repeats of each key is well past the pool's break-even point.
    let value = record_batch(8);
    let l1 = compress(&value, Level::One).unwrap();
    let l2 = compress(&value, Level::Two).unwrap();
    assert!(l2.len() < l1.len(), "l2 {} vs l1 {}", l2.len(), l1.len());
}

#[test]
fn two_repeats_of_a_long_string_benefit() {
    let t = Table::from_array(vec![
        Value::Str("long enough to benefit".into()),
        Value::Str("long enough to benefit".into()),
    ]);
    let value = Value::Table(t);
    let l1 = compress(&value, Level::One).unwrap();
    let l2 = compress(&value, Level::Two).unwrap();
    assert!(l2.len() < l1.len());
}

#[test]
fn level_three_never_exceeds_level_two() {
    // Both compressible and incompressible bodies past 4 KiB.
    let repetitive = record_batch(256);
    let noise = Value::Bytes((0..8192u32).map(|i| ((i * 167 + 13) % 251) as u8).collect());
    for value in [repetitive, noise] {
        let l2 = compress(&value, Level::Two).unwrap();
        let l3 = compress(&value, Level::Three).unwrap();
        assert!(l3.len() <= l2.len(), "l3 {} vs l2 {}", l3.len(), l2.len());
    }
}

#[test]
fn level_three_shrinks_repetitive_batches() {
    let value = record_batch(256);
    let l2 = compress(&value, Level::Two).unwrap();
    let l3 = compress(&value, Level::Three).unwrap();
    assert!(l3.len() < l2.len());
}

#[test]
fn megabyte_buffer_of_short_period_noise() {
    // Pseudo-random 16-bit values from a short-period generator: noisy up
    // close, repetitive at window scale.
    let mut state = 1u32;
    let mut blob = Vec::with_capacity(1 << 20);
    for _ in 0..(1 << 19) {
        state = (state.wrapping_mul(13).wrapping_add(7)) & 0x3ff;
        let word = (state as u16).wrapping_mul(2654);
        blob.extend_from_slice(&word.to_le_bytes());
    }
    let value = Value::Bytes(blob);

    let l2 = compress(&value, Level::Two).unwrap();
    let l3 = compress(&value, Level::Three).unwrap();
    assert!(l3.len() < l2.len());
    assert_eq!(decompress(&l3).unwrap(), value);
}

#[test]
fn sparse_table_preserves_shape() {
    let mut t = Table::new();
    t.insert(Value::Int(1), Value::Str("a".into()));
    t.insert(Value::Int(3), Value::Str("c".into()));
    t.insert(Value::Int(4), Value::Str("d".into()));
    for level in LEVELS {
        let payload = compress(&Value::Table(t.clone()), level).unwrap();
        match decompress(&payload).unwrap() {
            Value::Table(decoded) => {
                assert_eq!(decoded.array().len(), 1, "{level:?}");
                assert_eq!(decoded.hash().len(), 2, "{level:?}");
                assert_eq!(decoded.get(&Value::Int(3)), Some(&Value::Str("c".into())));
                assert_eq!(decoded.get(&Value::Int(4)), Some(&Value::Str("d".into())));
            }
            other => panic!("expected table, got {other}"),
        }
    }
}

#[test]
fn ten_thousand_nested_tables_hit_the_depth_guard() {
    let mut value = Value::Table(Table::new());
    for _ in 0..10_000 {
        value = Value::Table(Table::from_array(vec![value]));
    }
    for level in LEVELS {
        assert_eq!(
            compress(&value, level),
            Err(EncodeError::DepthExceeded),
            "{level:?}"
        );
    }
}

#[test]
fn deep_payload_hits_the_depth_guard_on_decode() {
    // Hand-framed chain of 10 000 tables; the encoder would refuse to
    // produce this, so frame it directly.
    let mut payload = vec![0x01];
    for _ in 0..10_000 {
        // TABLE, n = 1, m = 0
        payload.extend_from_slice(&[0x30, 0x10, 0x01, 0x10, 0x00]);
    }
    payload.extend_from_slice(&[0x30, 0x10, 0x00, 0x10, 0x00]);
    assert_eq!(
        Decoder::new().decode(&payload),
        Err(DecodeError::DepthExceeded)
    );
    // A raised limit accepts a chain that the default refuses.
    let mut shallow_chain = vec![0x01];
    for _ in 0..200 {
        shallow_chain.extend_from_slice(&[0x30, 0x10, 0x01, 0x10, 0x00]);
    }
    shallow_chain.extend_from_slice(&[0x30, 0x10, 0x00, 0x10, 0x00]);
    let relaxed = Decoder::with_options(DecoderOptions { max_depth: 300 });
    assert!(relaxed.decode(&shallow_chain).is_ok());
}

#[test]
fn every_payload_is_fully_consumed() {
    let values = [
        Value::Bool(true),
        Value::Int(-70_000),
        Value::Str("consumed".into()),
        record_batch(4),
    ];
    for value in &values {
        for level in LEVELS {
            let mut payload = compress(value, level).unwrap();
            assert!(decompress(&payload).is_ok());
            payload.push(0x2a);
            assert_eq!(
                decompress(&payload),
                Err(DecodeError::TrailingGarbage),
                "{level:?}"
            );
        }
    }
}

#[test]
fn single_bit_corruption_never_changes_the_type_class() {
    let value = record_batch(3);
    for level in [Level::One, Level::Two] {
        let payload = compress(&value, level).unwrap();
        for byte in 0..payload.len() {
            for bit in 0..8 {
                let mut corrupt = payload.clone();
                corrupt[byte] ^= 1 << bit;
                match decompress(&corrupt) {
                    // A surviving payload must still be a table; scalar
                    // output here would be a silent type confusion.
                    Ok(Value::Table(_)) => {}
                    Ok(other) => {
                        panic!("bit {bit} of byte {byte} decoded to {other} at {level:?}")
                    }
                    Err(_) => {}
                }
            }
        }
    }
}

#[test]
fn truncation_always_errors() {
    let value = record_batch(6);
    for level in LEVELS {
        let payload = compress(&value, level).unwrap();
        for cut in 0..payload.len() {
            assert!(
                decompress(&payload[..cut]).is_err(),
                "cut {cut} at {level:?}"
            );
        }
    }
}
