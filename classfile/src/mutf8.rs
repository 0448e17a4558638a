//! Class files store strings in "modified UTF-8": real UTF-8 except that the
//! NUL codepoint is written as the two-byte sequence `C0 80`, supplementary
//! characters are written as six bytes (a CESU-8 style surrogate pair), and
//! no byte of a string may be `0x00` or lie in `0xF0..=0xFF`.

use std::borrow::Cow;

/// An offending byte in a modified-UTF-8 run. For a truncated multi-byte
/// sequence, the offset and byte point at the sequence's lead byte.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Mutf8Error {
    pub offset: usize,
    pub byte: u8,
}

pub fn decode_mutf8(bytes: &[u8]) -> Result<Cow<'_, str>, Mutf8Error> {
    match bytes.iter().position(|&b| b == 0 || b >= 0x80) {
        // Plain non-NUL ASCII is already valid UTF-8 and can be borrowed.
        None => Ok(Cow::Borrowed(std::str::from_utf8(bytes).unwrap())),
        Some(_) => decode_owned(bytes).map(Cow::Owned),
    }
}

fn tail(bytes: &[u8], at: usize, lead_offset: usize, lead: u8) -> Result<u8, Mutf8Error> {
    bytes.get(at).copied().ok_or(Mutf8Error {
        offset: lead_offset,
        byte: lead,
    })
}

fn decode_owned(bytes: &[u8]) -> Result<String, Mutf8Error> {
    let mut out = String::with_capacity(bytes.len());
    let mut pos = 0;

    macro_rules! invalid {
        ($offset:expr, $byte:expr) => {
            return Err(Mutf8Error {
                offset: $offset,
                byte: $byte,
            })
        };
    }

    while pos < bytes.len() {
        let b1 = bytes[pos];
        if b1 == 0 || b1 >= 0xf0 {
            invalid!(pos, b1);
        }

        if b1 & 0x80 == 0 {
            // 0xxxxxxx
            out.push(b1 as char);
            pos += 1;
        } else if b1 & 0xe0 == 0xc0 {
            // 110xxxxx 10xxxxxx
            let b2 = tail(bytes, pos + 1, pos, b1)?;
            if b2 & 0xc0 != 0x80 {
                invalid!(pos + 1, b2);
            }

            if b1 == 0xc0 && b2 == 0x80 {
                // the one legal overlong form: an escaped NUL codepoint
                out.push('\0');
            } else {
                let scalar = (u32::from(b1 & 0x1f) << 6) | u32::from(b2 & 0x3f);
                out.push(std::char::from_u32(scalar).unwrap());
            }
            pos += 2;
        } else if b1 == 0xed && tail(bytes, pos + 1, pos, b1)? & 0xf0 == 0xa0 {
            // 11101101 1010xxxx 10xxxxxx 11101101 1011yyyy 10yyyyyy
            // A high surrogate lead: only the paired six-byte form is legal.
            let b2 = tail(bytes, pos + 1, pos, b1)?;
            let b3 = tail(bytes, pos + 2, pos, b1)?;
            let b4 = tail(bytes, pos + 3, pos, b1)?;
            let b5 = tail(bytes, pos + 4, pos, b1)?;
            let b6 = tail(bytes, pos + 5, pos, b1)?;
            if b3 & 0xc0 != 0x80 {
                invalid!(pos + 2, b3);
            }
            if b4 != 0xed {
                invalid!(pos + 3, b4);
            }
            if b5 & 0xf0 != 0xb0 {
                invalid!(pos + 4, b5);
            }
            if b6 & 0xc0 != 0x80 {
                invalid!(pos + 5, b6);
            }

            let scalar = 0x10000
                + ((u32::from(b2) & 0x0f) << 16)
                + ((u32::from(b3) & 0x3f) << 10)
                + ((u32::from(b5) & 0x0f) << 6)
                + (u32::from(b6) & 0x3f);
            out.push(std::char::from_u32(scalar).unwrap());
            pos += 6;
        } else if b1 & 0xf0 == 0xe0 {
            // 1110xxxx 10xxxxxx 10xxxxxx
            let b2 = tail(bytes, pos + 1, pos, b1)?;
            if b2 & 0xc0 != 0x80 {
                invalid!(pos + 1, b2);
            }
            let b3 = tail(bytes, pos + 2, pos, b1)?;
            if b3 & 0xc0 != 0x80 {
                invalid!(pos + 2, b3);
            }

            let scalar =
                (u32::from(b1 & 0x0f) << 12) | (u32::from(b2 & 0x3f) << 6) | u32::from(b3 & 0x3f);
            match std::char::from_u32(scalar) {
                Some(c) => out.push(c),
                // an unpaired low surrogate
                None => invalid!(pos, b1),
            }
            pos += 3;
        } else {
            invalid!(pos, b1);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_borrowed() {
        match decode_mutf8(b"Hello, world!") {
            Ok(Cow::Borrowed(text)) => assert_eq!(text, "Hello, world!"),
            other => panic!("expected a borrowed decode, got {:?}", other),
        }
    }

    #[test]
    fn test_two_byte_form() {
        let text = "Здравствуй, мир";
        assert_eq!(decode_mutf8(text.as_bytes()).unwrap(), text);
    }

    #[test]
    fn test_supplementary_pair() {
        let bytes = &[0x41, 0xed, 0xa0, 0xb4, 0xed, 0xbc, 0xb9];
        assert_eq!(decode_mutf8(bytes).unwrap(), "A𝌹");
    }

    #[test]
    fn test_overlong_nul_decodes() {
        assert_eq!(
            decode_mutf8(b"foo\xc0\x80bar\xc0\x80baz").unwrap(),
            "foo\0bar\0baz"
        );
    }

    #[test]
    fn test_raw_nul_rejected() {
        assert_eq!(
            decode_mutf8(b"foo\0bar"),
            Err(Mutf8Error { offset: 3, byte: 0 })
        );
    }

    #[test]
    fn test_high_range_byte_rejected() {
        assert_eq!(
            decode_mutf8(b"a\xf0b"),
            Err(Mutf8Error {
                offset: 1,
                byte: 0xf0
            })
        );
    }

    #[test]
    fn test_d000_block_is_not_a_surrogate() {
        // U+D000 shares the 0xED lead byte with the surrogate forms but is an
        // ordinary three-byte character.
        assert_eq!(decode_mutf8(&[0xed, 0x80, 0x80]).unwrap(), "\u{d000}");
    }

    #[test]
    fn test_unpaired_high_surrogate_rejected() {
        assert!(decode_mutf8(&[0xed, 0xa0, 0x80]).is_err());
    }
}
