//! Reference codes for packed records.
//!
//! Codes are written in a bijective base-36 numeral system using `0-9` then
//! `A-Z`. Place-value ranges are offset cumulatively, so every length gets its
//! own block of values and shorter codes always encode smaller numbers:
//!
//! ```text
//! 0, 1, ..., 9, A, ..., Z, 00, 01, ..., ZZ, 000, ...
//! ```

/// Radix of the reference code alphabet
pub const BASE: u64 = 36;

/// Encode a number as a reference code
pub fn to_alpha_code(mut n: u64) -> String {
    let mut places = 1;
    let mut range = BASE;

    while n >= range {
        n -= range;
        places += 1;
        range = match range.checked_mul(BASE) {
            Some(r) => r,
            // Remaining value fits in the current number of places
            None => break,
        };
    }

    let mut digits = vec![b'0'; places];
    for slot in digits.iter_mut().rev() {
        *slot = digit_char((n % BASE) as u8);
        n /= BASE;
    }

    digits.into_iter().map(char::from).collect()
}

/// Decode a reference code. Returns `None` for an empty code, a character
/// outside `[0-9A-Z]`, or a value that does not fit in a `u64`.
pub fn from_alpha_code(code: &str) -> Option<u64> {
    let bytes = code.as_bytes();
    if bytes.is_empty() {
        return None;
    }

    // Offset contributed by all shorter codes
    let mut n: u64 = 0;
    let mut range = BASE;
    for _ in 1..bytes.len() {
        n = n.checked_add(range)?;
        range = range.checked_mul(BASE).unwrap_or(u64::MAX);
    }

    let mut value: u64 = 0;
    for &b in bytes {
        value = value
            .checked_mul(BASE)?
            .checked_add(digit_value(b)? as u64)?;
    }

    n.checked_add(value)
}

/// Length in characters of `to_alpha_code(n)`, without allocating
pub fn alpha_code_len(mut n: u64) -> usize {
    let mut places = 1;
    let mut range = BASE;
    while n >= range {
        n -= range;
        places += 1;
        range = match range.checked_mul(BASE) {
            Some(r) => r,
            None => break,
        };
    }
    places
}

/// True if `b` can appear in a reference code
#[inline]
pub fn is_code_byte(b: u8) -> bool {
    b.is_ascii_digit() || b.is_ascii_uppercase()
}

#[inline]
fn digit_char(d: u8) -> u8 {
    if d < 10 { b'0' + d } else { b'A' + d - 10 }
}

#[inline]
fn digit_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'Z' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_place() {
        assert_eq!(to_alpha_code(0), "0");
        assert_eq!(to_alpha_code(9), "9");
        assert_eq!(to_alpha_code(10), "A");
        assert_eq!(to_alpha_code(35), "Z");
    }

    #[test]
    fn test_place_boundaries() {
        // Two places start right after "Z"
        assert_eq!(to_alpha_code(36), "00");
        assert_eq!(to_alpha_code(37), "01");
        assert_eq!(to_alpha_code(36 + 36 * 36 - 1), "ZZ");
        assert_eq!(to_alpha_code(36 + 36 * 36), "000");

        assert_eq!(from_alpha_code("00"), Some(36));
        assert_eq!(from_alpha_code("ZZ"), Some(1331));
        assert_eq!(from_alpha_code("000"), Some(1332));
    }

    #[test]
    fn test_roundtrip() {
        for n in (0..20_000).chain([u32::MAX as u64, u64::MAX - 1, u64::MAX]) {
            let code = to_alpha_code(n);
            assert_eq!(code.len(), alpha_code_len(n), "length of {}", n);
            assert_eq!(from_alpha_code(&code), Some(n), "code {:?}", code);
        }
    }

    #[test]
    fn test_shorter_codes_are_smaller() {
        let mut prev_len = 0;
        for n in 0..2000 {
            let len = alpha_code_len(n);
            assert!(len >= prev_len);
            prev_len = len;
        }
    }

    #[test]
    fn test_invalid_codes() {
        assert_eq!(from_alpha_code(""), None);
        assert_eq!(from_alpha_code("a"), None);
        assert_eq!(from_alpha_code("1:"), None);
        // 40 places overflows u64
        assert_eq!(from_alpha_code(&"Z".repeat(40)), None);
    }
}
