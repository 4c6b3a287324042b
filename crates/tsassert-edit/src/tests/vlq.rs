use super::*;

#[test]
fn encodes_small_values() {
    assert_eq!(encode(0), "A");
    assert_eq!(encode(1), "C");
    assert_eq!(encode(-1), "D");
    assert_eq!(encode(15), "e");
}

#[test]
fn encodes_values_needing_a_continuation_digit() {
    assert_eq!(encode(16), "gB");
    assert_eq!(encode(-16), "hB");
}

#[test]
fn round_trips_through_decode_by_hand() {
    // No decoder is needed by this crate, but the encoding must still be
    // self-consistent: every digit but the last carries the continuation bit.
    let encoded = encode(1000);
    let bytes = encoded.as_bytes();
    for &b in &bytes[..bytes.len() - 1] {
        let idx = BASE64_CHARS.iter().position(|&c| c == b).unwrap();
        assert!(idx & CONTINUATION_BIT as usize != 0);
    }
    let last_idx = BASE64_CHARS.iter().position(|&c| c == *bytes.last().unwrap()).unwrap();
    assert_eq!(last_idx & CONTINUATION_BIT as usize, 0);
}
