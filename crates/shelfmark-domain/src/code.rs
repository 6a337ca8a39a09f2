//! Unique document codes: a fixed-length base-25 identifier.
//!
//! Codes are five uppercase letters drawn from A-Z *excluding W* (visually
//! ambiguous with double-V in scanned filenames), giving 25^5 = 9,765,625
//! possible values. The mapping between integer indices and codes is a total
//! bijection over that range: `code_to_index(index_to_code(i)) == i`.
//!
//! The legacy filename convention embeds a code before the extension with a
//! four-dash separator: `Smith-v-Jones----ABCDE.pdf`. Tokens that are
//! code-shaped but violate the alphabet (wrong length, lowercase, contains
//! `W`) are never treated as discovered codes.

use thiserror::Error;

/// Allowed code characters: A-Z without `W`.
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVXYZ";

/// Fixed code length.
pub const CODE_LENGTH: usize = 5;

/// Separator between the filename stem and the embedded code.
pub const SEPARATOR: &str = "----";

/// Total number of distinct codes (25^5).
pub const CAPACITY: u64 = {
    let base = ALPHABET.len() as u64;
    base * base * base * base * base
};

/// Errors from code encoding, decoding, and validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    /// Index is outside the representable range; no more codes exist.
    #[error("code space exhausted: index {0} exceeds maximum {max}", max = CAPACITY - 1)]
    Exhausted(u64),

    /// String is not a structurally valid code.
    #[error("invalid code {0:?}: must be {CODE_LENGTH} uppercase letters A-Z excluding W")]
    Invalid(String),
}

/// Convert an integer index to a five-letter code.
///
/// Builds base-25 digits least-significant first, then reverses, so index 0
/// is `AAAAA`, index 1 is `AAAAB`, and index 25 is `AAABA`.
pub fn index_to_code(index: u64) -> Result<String, CodeError> {
    if index >= CAPACITY {
        return Err(CodeError::Exhausted(index));
    }

    let alphabet = ALPHABET.as_bytes();
    let base = alphabet.len() as u64;

    let mut digits = [0u8; CODE_LENGTH];
    let mut rest = index;
    for digit in digits.iter_mut().rev() {
        *digit = alphabet[(rest % base) as usize];
        rest /= base;
    }

    Ok(digits.iter().map(|&b| b as char).collect())
}

/// Convert a five-letter code back to its integer index.
pub fn code_to_index(code: &str) -> Result<u64, CodeError> {
    if !is_valid_code(code) {
        return Err(CodeError::Invalid(code.to_string()));
    }

    let base = ALPHABET.len() as u64;
    let mut index = 0u64;
    for ch in code.chars() {
        match ALPHABET.find(ch) {
            Some(digit) => index = index * base + digit as u64,
            None => return Err(CodeError::Invalid(code.to_string())),
        }
    }

    Ok(index)
}

/// Validate code structure: exact length, uppercase, alphabet-only.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.chars().all(|c| ALPHABET.contains(c))
}

/// Extract a valid embedded code from a filename, if present.
///
/// Looks for `----` followed by a code token that runs up to a dot or the
/// end of the name. Every separator occurrence is scanned left to right and
/// the first validating token wins; a token that is code-shaped but invalid
/// does not stop the scan. A name with no validating token yields `None`,
/// so callers fall through to minting a fresh code.
pub fn extract_code_from_filename(filename: &str) -> Option<String> {
    // Strip any directory components without pulling in std::path semantics.
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    for (sep_at, _) in name.match_indices(SEPARATOR) {
        let after = &name[sep_at + SEPARATOR.len()..];

        // Token runs to the next dot or end of string.
        let token = match after.find('.') {
            Some(dot) => &after[..dot],
            None => after,
        };

        if is_valid_code(token) {
            return Some(token.to_string());
        }
    }
    None
}

/// True when the filename already carries a valid code suffix.
pub fn has_code_suffix(filename: &str) -> bool {
    extract_code_from_filename(filename).is_some()
}

/// Insert a code suffix before the filename's extension.
pub fn append_code_to_filename(filename: &str, code: &str) -> Result<String, CodeError> {
    if !is_valid_code(code) {
        return Err(CodeError::Invalid(code.to_string()));
    }

    match filename.rfind('.') {
        // A leading dot is a hidden file, not an extension.
        Some(dot) if dot > 0 => Ok(format!(
            "{}{}{}{}",
            &filename[..dot],
            SEPARATOR,
            code,
            &filename[dot..]
        )),
        _ => Ok(format!("{}{}{}", filename, SEPARATOR, code)),
    }
}

/// Remove a valid code suffix from a filename, if present.
pub fn strip_code_from_filename(filename: &str) -> String {
    match extract_code_from_filename(filename) {
        Some(code) => filename.replacen(&format!("{}{}", SEPARATOR, code), "", 1),
        None => filename.to_string(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: encode/decode is a total bijection over the valid range.
        #[test]
        fn test_code_round_trip(index in 0..CAPACITY) {
            let code = index_to_code(index).unwrap();
            prop_assert_eq!(code_to_index(&code).unwrap(), index);
        }

        /// Property: encoding never produces the disallowed letter.
        #[test]
        fn test_encoding_never_emits_w(index in 0..CAPACITY) {
            let code = index_to_code(index).unwrap();
            prop_assert!(!code.contains('W'));
            prop_assert!(is_valid_code(&code));
        }

        /// Property: ordering of indices matches lexicographic code ordering.
        #[test]
        fn test_encoding_is_order_preserving(a in 0..CAPACITY, b in 0..CAPACITY) {
            let code_a = index_to_code(a).unwrap();
            let code_b = index_to_code(b).unwrap();
            prop_assert_eq!(a < b, code_a < code_b);
        }

        /// Property: appending a valid code always makes it discoverable.
        #[test]
        fn test_appended_code_is_discovered(index in 0..CAPACITY) {
            let code = index_to_code(index).unwrap();
            let named = append_code_to_filename("brief.pdf", &code).unwrap();
            prop_assert_eq!(extract_code_from_filename(&named), Some(code));
        }
    }
}
