// ABI layer for the trap contract
//
// Holds the two fixed ABI entries the trap exposes and a decoder for the
// `(uint256, string)` tuple that collect() returns. This is deliberately not
// a general ABI library: the decoder knows exactly one shape.

use ethereum_types::U256;
use tiny_keccak::{Hasher, Keccak};

use crate::error::TrapError;

/// ABI word size in bytes.
pub const WORD: usize = 32;

/// A decoded collect() result: the trap balance in wei and its tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiTuple {
    pub balance: U256,
    pub tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateMutability {
    View,
    Pure,
}

/// A named, typed parameter of an ABI entry.
#[derive(Debug, Clone, Copy)]
pub struct AbiParam {
    pub name: &'static str,
    pub kind: &'static str,
}

/// One entry of the embedded contract ABI.
#[derive(Debug, Clone, Copy)]
pub struct AbiFunction {
    pub name: &'static str,
    pub inputs: &'static [AbiParam],
    pub outputs: &'static [AbiParam],
    pub mutability: StateMutability,
}

/// The trap contract surface: collect() and shouldRespond(bytes[]).
pub const TRAP_ABI: &[AbiFunction] = &[
    AbiFunction {
        name: "collect",
        inputs: &[],
        outputs: &[
            AbiParam { name: "balance", kind: "uint256" },
            AbiParam { name: "tag", kind: "string" },
        ],
        mutability: StateMutability::View,
    },
    AbiFunction {
        name: "shouldRespond",
        inputs: &[AbiParam { name: "data", kind: "bytes[]" }],
        outputs: &[
            AbiParam { name: "", kind: "bool" },
            AbiParam { name: "", kind: "bytes" },
        ],
        mutability: StateMutability::Pure,
    },
];

/// Look up an embedded ABI entry by name.
pub fn function(name: &str) -> Option<&'static AbiFunction> {
    TRAP_ABI.iter().find(|entry| entry.name == name)
}

impl AbiFunction {
    /// Canonical signature, e.g. `collect()` or `shouldRespond(bytes[])`.
    pub fn signature(&self) -> String {
        let args: Vec<&str> = self.inputs.iter().map(|p| p.kind).collect();
        format!("{}({})", self.name, args.join(","))
    }

    /// Four-byte call selector: the leading bytes of keccak-256 of the signature.
    pub fn selector(&self) -> [u8; 4] {
        let mut hasher = Keccak::v256();
        hasher.update(self.signature().as_bytes());
        let mut digest = [0u8; 32];
        hasher.finalize(&mut digest);
        [digest[0], digest[1], digest[2], digest[3]]
    }
}

/// Decode an ABI-encoded `(uint256, string)` tuple.
///
/// Word 0 is the big-endian balance. Word 1 is the byte offset (from the
/// start of the payload) of the string region, which holds one length word
/// followed by the UTF-8 bytes padded to a word boundary. All-or-nothing:
/// a malformed payload never yields a partial tuple.
pub fn decode_collect(payload: &[u8]) -> Result<AbiTuple, TrapError> {
    if payload.len() % WORD != 0 {
        return Err(TrapError::DecodePayload(format!(
            "payload length {} is not a multiple of {WORD} bytes",
            payload.len()
        )));
    }
    if payload.len() < 2 * WORD {
        return Err(TrapError::DecodePayload(format!(
            "payload length {} is too short for a (uint256,string) head",
            payload.len()
        )));
    }

    let balance = U256::from_big_endian(&payload[..WORD]);

    let offset = word_to_usize(&payload[WORD..2 * WORD], "string offset")?;
    let length_end = offset
        .checked_add(WORD)
        .filter(|end| *end <= payload.len())
        .ok_or_else(|| {
            TrapError::DecodePayload(format!("string offset {offset} is out of bounds"))
        })?;

    let length = word_to_usize(&payload[offset..length_end], "string length")?;
    let data_end = length_end
        .checked_add(length)
        .filter(|end| *end <= payload.len())
        .ok_or_else(|| {
            TrapError::DecodePayload(format!(
                "string data of {length} bytes overruns the payload"
            ))
        })?;

    let tag = String::from_utf8(payload[length_end..data_end].to_vec())
        .map_err(|e| TrapError::DecodePayload(e.to_string()))?;

    Ok(AbiTuple { balance, tag })
}

/// Encode a `(uint256, string)` tuple with the head/tail layout that
/// [`decode_collect`] expects. Used for fixtures and round-trip checks.
pub fn encode_collect(balance: &U256, tag: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(3 * WORD + padded_len(tag.len()));
    let mut word = [0u8; WORD];

    balance.to_big_endian(&mut word);
    out.extend_from_slice(&word);

    // The string region starts right after the two head words.
    U256::from(2 * WORD as u64).to_big_endian(&mut word);
    out.extend_from_slice(&word);

    U256::from(tag.len() as u64).to_big_endian(&mut word);
    out.extend_from_slice(&word);

    out.extend_from_slice(tag.as_bytes());
    out.resize(3 * WORD + padded_len(tag.len()), 0);
    out
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

fn word_to_usize(word: &[u8], what: &str) -> Result<usize, TrapError> {
    let value = U256::from_big_endian(word);
    if value > U256::from(usize::MAX as u64) {
        return Err(TrapError::DecodePayload(format!(
            "{what} {value} does not fit in memory"
        )));
    }
    Ok(value.as_usize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn decodes_zero_balance_and_empty_tag() {
        // Zero balance, offset 0x40, zero-length string region.
        let payload = hex!(
            "0000000000000000000000000000000000000000000000000000000000000000"
            "0000000000000000000000000000000000000000000000000000000000000040"
            "0000000000000000000000000000000000000000000000000000000000000000"
        );
        let tuple = decode_collect(&payload).unwrap();
        assert_eq!(tuple.balance, U256::zero());
        assert_eq!(tuple.tag, "");
    }

    #[test]
    fn decodes_one_ether_and_alice() {
        // (1000000000000000000, "alice") as produced by the standard coder.
        let payload = hex!(
            "0000000000000000000000000000000000000000000000000de0b6b3a7640000"
            "0000000000000000000000000000000000000000000000000000000000000040"
            "0000000000000000000000000000000000000000000000000000000000000005"
            "616c696365000000000000000000000000000000000000000000000000000000"
        );
        let tuple = decode_collect(&payload).unwrap();
        assert_eq!(tuple.balance, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(tuple.tag, "alice");
    }

    #[test]
    fn encoder_matches_the_standard_layout() {
        let encoded = encode_collect(&U256::from(1_000_000_000_000_000_000u64), "alice");
        let expected = hex!(
            "0000000000000000000000000000000000000000000000000de0b6b3a7640000"
            "0000000000000000000000000000000000000000000000000000000000000040"
            "0000000000000000000000000000000000000000000000000000000000000005"
            "616c696365000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(encoded, expected);
    }

    #[test]
    fn rejects_non_word_aligned_payloads() {
        for len in [1, 31, 33, 95] {
            let err = decode_collect(&vec![0u8; len]).unwrap_err();
            assert!(matches!(err, TrapError::DecodePayload(_)), "len {len}: {err}");
        }
    }

    #[test]
    fn rejects_truncated_heads() {
        let err = decode_collect(&[0u8; WORD]).unwrap_err();
        assert!(matches!(err, TrapError::DecodePayload(_)));
    }

    #[test]
    fn rejects_out_of_bounds_offsets() {
        let mut payload = vec![0u8; 2 * WORD];
        payload[2 * WORD - 1] = 0x80; // offset 128, past the end
        let err = decode_collect(&payload).unwrap_err();
        assert!(matches!(err, TrapError::DecodePayload(_)));
    }

    #[test]
    fn rejects_oversized_offset_words() {
        let mut payload = vec![0u8; 2 * WORD];
        payload[WORD] = 0xff; // offset with high bytes set
        let err = decode_collect(&payload).unwrap_err();
        assert!(matches!(err, TrapError::DecodePayload(_)));
    }

    #[test]
    fn rejects_string_lengths_that_overrun_the_payload() {
        let mut payload = encode_collect(&U256::zero(), "alice");
        payload[3 * WORD - 1] = 0xff; // claim 255 bytes of string data
        let err = decode_collect(&payload).unwrap_err();
        assert!(matches!(err, TrapError::DecodePayload(_)));
    }

    #[test]
    fn rejects_invalid_utf8_tags() {
        let mut payload = encode_collect(&U256::zero(), "alice");
        payload[3 * WORD] = 0xff; // corrupt the first tag byte
        let err = decode_collect(&payload).unwrap_err();
        assert!(matches!(err, TrapError::DecodePayload(_)));
    }

    #[test]
    fn round_trips_representative_tuples() {
        let cases = [
            (U256::zero(), ""),
            (U256::from(1u64), "a"),
            (U256::from(1_000_000_000_000_000_000u64), "alice"),
            (U256::MAX, "a tag that is longer than one 32-byte word, by some margin"),
            (U256::from(42u64), "ünïcødé ✓"),
        ];
        for (balance, tag) in cases {
            let encoded = encode_collect(&balance, tag);
            let decoded = decode_collect(&encoded).unwrap();
            assert_eq!(decoded, AbiTuple { balance, tag: tag.to_string() });
        }
    }

    #[test]
    fn embedded_abi_has_the_two_fixed_entries() {
        let collect = function("collect").unwrap();
        assert_eq!(collect.signature(), "collect()");
        assert_eq!(collect.mutability, StateMutability::View);
        assert_eq!(collect.outputs.len(), 2);

        let should_respond = function("shouldRespond").unwrap();
        assert_eq!(should_respond.signature(), "shouldRespond(bytes[])");
        assert_eq!(should_respond.mutability, StateMutability::Pure);

        assert!(function("respond").is_none());
        assert_ne!(collect.selector(), should_respond.selector());
    }
}
