use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

/// Length of a compact identifier token.
pub const COMPACT_ID_LEN: usize = 11;

/// Render a 64-bit span, parent or trace id as an 11-character URL-safe token.
///
/// The id is taken as its unsigned bit pattern, packed big-endian as a high
/// and a low 32-bit word, and base64url-encoded. Eight bytes always encode
/// to eleven characters plus one `=`, which is dropped.
///
/// An absent id yields no token.
pub fn compact_id(id: Option<i64>) -> Option<String> {
    id.map(encode)
}

fn encode(id: i64) -> String {
    let unsigned = id as u64;
    let hi = (unsigned >> 32) as u32;
    let lo = (unsigned & 0xFFFF_FFFF) as u32;

    let mut packed = [0u8; 8];
    packed[..4].copy_from_slice(&hi.to_be_bytes());
    packed[4..].copy_from_slice(&lo.to_be_bytes());

    let mut token = URL_SAFE.encode(packed);
    token.truncate(COMPACT_ID_LEN);
    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Reverse the packing by restoring the padding character.
    fn unpack(token: &str) -> Vec<u8> {
        URL_SAFE.decode(format!("{token}=")).unwrap()
    }

    #[test]
    fn test_absent_id() {
        assert_eq!(compact_id(None), None);
    }

    #[test]
    fn test_known_tokens() {
        assert_eq!(compact_id(Some(0)).as_deref(), Some("AAAAAAAAAAA"));
        assert_eq!(compact_id(Some(1)).as_deref(), Some("AAAAAAAAAAE"));
        assert_eq!(compact_id(Some(-1)).as_deref(), Some("__________8"));
        assert_eq!(
            compact_id(Some(0x0102030405060708)).as_deref(),
            Some("AQIDBAUGBwg")
        );
    }

    #[test]
    fn test_big_endian_packing() {
        let token = compact_id(Some(0x0102030405060708)).unwrap();
        assert_eq!(unpack(&token), [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_negative_wraps_twos_complement() {
        let token = compact_id(Some(i64::MIN)).unwrap();
        assert_eq!(unpack(&token), [0x80, 0, 0, 0, 0, 0, 0, 0]);
    }

    proptest! {
        #[test]
        fn test_token_shape(id in any::<i64>()) {
            let token = compact_id(Some(id)).unwrap();
            prop_assert_eq!(token.len(), COMPACT_ID_LEN);
            prop_assert!(token
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
        }

        #[test]
        fn test_token_is_deterministic(id in any::<i64>()) {
            prop_assert_eq!(compact_id(Some(id)), compact_id(Some(id)));
        }

        #[test]
        fn test_token_preserves_bit_pattern(id in any::<i64>()) {
            let token = compact_id(Some(id)).unwrap();
            prop_assert_eq!(unpack(&token), id.to_be_bytes().to_vec());
        }
    }
}
