use anyhow::{bail, Context, Result};

/// Number of payload bytes a tag holds.
pub const TAG_BYTES: usize = 7;

/// 7-byte tag payload, parsed from the operator's hex input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPayload([u8; TAG_BYTES]);

impl TagPayload {
    /// Parse whitespace-separated two-digit hex codes, e.g.
    /// `12 AB CD 34 EF 56 78`. Exactly seven tokens are required.
    pub fn parse(input: &str) -> Result<Self> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        if tokens.len() != TAG_BYTES {
            bail!(
                "expected {} two-digit hex codes, got {}",
                TAG_BYTES,
                tokens.len()
            );
        }

        let mut bytes = [0u8; TAG_BYTES];
        for (byte, token) in bytes.iter_mut().zip(&tokens) {
            if token.len() != 2 || !token.chars().all(|c| c.is_ascii_hexdigit()) {
                bail!("'{}' is not a two-digit hex code", token);
            }
            *byte = u8::from_str_radix(token, 16)
                .with_context(|| format!("failed to parse hex code '{}'", token))?;
        }
        Ok(Self(bytes))
    }

    /// Render as a 56-character string of '0'/'1', each byte MSB first,
    /// concatenated with no separators. This is the form the firmware's
    /// `write` command takes on the wire.
    pub fn to_bit_string(&self) -> String {
        let mut bits = String::with_capacity(TAG_BYTES * 8);
        for byte in self.0 {
            for shift in (0..8).rev() {
                bits.push(if byte >> shift & 1 == 1 { '1' } else { '0' });
            }
        }
        bits
    }

    pub fn bytes(&self) -> &[u8; TAG_BYTES] {
        &self.0
    }
}

/// All supported commands for the tag programmer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Program 56 bits of payload onto the tag.
    Write(TagPayload),
    /// Read the tag's current contents back.
    Read,
    /// Zeroise the tag.
    Clear,
}

impl Command {
    /// The newline-terminated ASCII line the firmware expects.
    pub fn wire_line(&self) -> String {
        match self {
            Command::Write(payload) => format!("write {}\n", payload.to_bit_string()),
            Command::Read => "read\n".to_string(),
            Command::Clear => "clear\n".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_string_is_msb_first() {
        let payload = TagPayload::parse("12 AB CD 34 EF 56 78").unwrap();
        let bits = payload.to_bit_string();
        assert_eq!(bits.len(), 56);
        // 0x12 -> 00010010, 0xAB -> 10101011, 0xCD -> 11001101
        assert!(bits.starts_with("000100101010101111001101"));
        assert_eq!(payload.bytes(), &[0x12, 0xAB, 0xCD, 0x34, 0xEF, 0x56, 0x78]);
    }

    #[test]
    fn test_bit_string_extremes() {
        let zeros = TagPayload::parse("00 00 00 00 00 00 00").unwrap();
        assert_eq!(zeros.to_bit_string(), "0".repeat(56));

        let ones = TagPayload::parse("FF ff FF ff FF ff FF").unwrap();
        assert_eq!(ones.to_bit_string(), "1".repeat(56));
    }

    #[test]
    fn test_parse_accepts_mixed_case_and_extra_whitespace() {
        let payload = TagPayload::parse("  0a  B4 ff 00 01 02 03 ").unwrap();
        assert_eq!(payload.bytes(), &[0x0A, 0xB4, 0xFF, 0x00, 0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_parse_rejects_wrong_token_count() {
        assert!(TagPayload::parse("").is_err());
        assert!(TagPayload::parse("12 AB CD 34 EF 56").is_err());
        assert!(TagPayload::parse("12 AB CD 34 EF 56 78 9A").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        // Wrong width
        assert!(TagPayload::parse("1 AB CD 34 EF 56 78").is_err());
        assert!(TagPayload::parse("123 AB CD 34 EF 56 78").is_err());
        // Non-hex characters
        assert!(TagPayload::parse("G1 AB CD 34 EF 56 78").is_err());
        assert!(TagPayload::parse("12 AB CD 34 EF 56 7-").is_err());
    }

    #[test]
    fn test_wire_lines() {
        assert_eq!(Command::Read.wire_line(), "read\n");
        assert_eq!(Command::Clear.wire_line(), "clear\n");

        let payload = TagPayload::parse("12 AB CD 34 EF 56 78").unwrap();
        let line = Command::Write(payload).wire_line();
        assert!(line.starts_with("write 000100101010101111001101"));
        assert!(line.ends_with('\n'));
        // "write " + 56 bits + "\n"
        assert_eq!(line.len(), 6 + 56 + 1);
    }
}
