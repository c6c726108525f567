//! Byte-order-mark detection.
//!
//! A file that opens with any known BOM is text no matter what follows, so
//! the scanner checks the first read block against this table before looking
//! for NUL bytes. Matching is a plain prefix comparison; the table is probed
//! in order and the first hit wins. UTF-7 is the one entry whose prefix is
//! ambiguous on its own and therefore requires a disambiguator byte.

/// One BOM entry: an encoding name, its byte prefix, and (for UTF-7) the set
/// of bytes allowed directly after the prefix.
struct BomPattern {
    name: &'static str,
    prefix: &'static [u8],
    disambiguator: Option<&'static [u8]>,
}

/// All recognized byte-order marks, probed in order.
const BOM_TABLE: &[BomPattern] = &[
    BomPattern {
        name: "UTF-8",
        prefix: &[0xEF, 0xBB, 0xBF],
        disambiguator: None,
    },
    BomPattern {
        name: "UTF-16 BE",
        prefix: &[0xFE, 0xFF],
        disambiguator: None,
    },
    BomPattern {
        name: "UTF-16 LE",
        prefix: &[0xFF, 0xFE],
        disambiguator: None,
    },
    BomPattern {
        name: "UTF-32 BE",
        prefix: &[0x00, 0x00, 0xFE, 0xFF],
        disambiguator: None,
    },
    BomPattern {
        name: "UTF-32 LE",
        prefix: &[0xFF, 0xFE, 0x00, 0x00],
        disambiguator: None,
    },
    BomPattern {
        name: "UTF-7",
        prefix: &[0x2B, 0x2F, 0x76],
        disambiguator: Some(&[0x38, 0x39, 0x2B, 0x2F]),
    },
    BomPattern {
        name: "UTF-1",
        prefix: &[0xF7, 0x64, 0x4C],
        disambiguator: None,
    },
    BomPattern {
        name: "UTF-EBCDIC",
        prefix: &[0xDD, 0x73, 0x66, 0x73],
        disambiguator: None,
    },
    BomPattern {
        name: "SCSU",
        prefix: &[0x0E, 0xFE, 0xFF],
        disambiguator: None,
    },
    BomPattern {
        name: "BOCU-1",
        prefix: &[0xFB, 0xEE, 0x28],
        disambiguator: None,
    },
    BomPattern {
        name: "GB18030",
        prefix: &[0x84, 0x31, 0x95, 0x33],
        disambiguator: None,
    },
];

impl BomPattern {
    fn matches(&self, block: &[u8]) -> bool {
        if !block.starts_with(self.prefix) {
            return false;
        }
        match self.disambiguator {
            None => true,
            Some(allowed) => block
                .get(self.prefix.len())
                .is_some_and(|next| allowed.contains(next)),
        }
    }
}

/// Returns the name of the encoding whose BOM prefixes `block`, if any.
///
/// A block shorter than a candidate prefix never matches that candidate.
pub(crate) fn detect(block: &[u8]) -> Option<&'static str> {
    BOM_TABLE
        .iter()
        .find(|pattern| pattern.matches(block))
        .map(|pattern| pattern.name)
}

/// Whether `block` starts with any recognized byte-order mark.
pub(crate) fn has_bom(block: &[u8]) -> bool {
    detect(block).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (name, full valid BOM) for every table entry. UTF-7 includes one of
    /// its four valid disambiguator bytes.
    const VALID_BOMS: &[(&str, &[u8])] = &[
        ("UTF-8", &[0xEF, 0xBB, 0xBF]),
        ("UTF-16 BE", &[0xFE, 0xFF]),
        ("UTF-16 LE", &[0xFF, 0xFE]),
        ("UTF-32 BE", &[0x00, 0x00, 0xFE, 0xFF]),
        ("UTF-32 LE", &[0xFF, 0xFE, 0x00, 0x00]),
        ("UTF-7", &[0x2B, 0x2F, 0x76, 0x38]),
        ("UTF-1", &[0xF7, 0x64, 0x4C]),
        ("UTF-EBCDIC", &[0xDD, 0x73, 0x66, 0x73]),
        ("SCSU", &[0x0E, 0xFE, 0xFF]),
        ("BOCU-1", &[0xFB, 0xEE, 0x28]),
        ("GB18030", &[0x84, 0x31, 0x95, 0x33]),
    ];

    #[test]
    fn test_every_table_entry_detected() {
        for (name, bom) in VALID_BOMS {
            let mut block = bom.to_vec();
            block.extend_from_slice(b"trailing content");
            assert!(has_bom(&block), "{name} BOM not detected");
        }
    }

    #[test]
    fn test_truncated_prefix_never_matches_its_entry() {
        for (name, bom) in VALID_BOMS {
            let truncated = &bom[..bom.len() - 1];
            assert_ne!(
                detect(truncated),
                Some(*name),
                "truncated {name} BOM must not match as {name}"
            );
        }
    }

    #[test]
    fn test_utf32_le_reported_as_utf16_le() {
        // FF FE 00 00 also prefixes as UTF-16 LE, which sits earlier in the
        // table. First match wins; the classification (text) is the same.
        assert_eq!(detect(&[0xFF, 0xFE, 0x00, 0x00]), Some("UTF-16 LE"));
    }

    #[test]
    fn test_utf7_disambiguator_required() {
        assert_eq!(detect(&[0x2B, 0x2F, 0x76]), None);
        assert_eq!(detect(&[0x2B, 0x2F, 0x76, 0x41]), None);
        for next in [0x38_u8, 0x39, 0x2B, 0x2F] {
            assert_eq!(detect(&[0x2B, 0x2F, 0x76, next]), Some("UTF-7"));
        }
    }

    #[test]
    fn test_plain_ascii_has_no_bom() {
        assert!(!has_bom(b"plain ascii text"));
        assert!(!has_bom(&[]));
    }
}
