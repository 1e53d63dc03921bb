use std::fmt;

/// Number of digits in a Brazilian postal code (CEP).
pub const POSTAL_CODE_LEN: usize = 8;

/// Returns true when `code` is exactly eight ASCII decimal digits.
///
/// No normalization happens here: hyphens, spaces and surrounding
/// whitespace all make the code invalid.
pub fn is_valid_postal_code(code: &str) -> bool {
    code.len() == POSTAL_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// A postal code that passed [`is_valid_postal_code`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    pub fn parse(code: &str) -> Option<Self> {
        is_valid_postal_code(code).then(|| Self(code.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_eight_digits() {
        for code in ["01234567", "12345678", "00000000", "99999999"] {
            assert!(is_valid_postal_code(code), "expected valid: {code}");
        }
    }

    #[test]
    fn rejects_wrong_length() {
        for code in ["", "1", "1234567", "123456789", "0131010000"] {
            assert!(!is_valid_postal_code(code), "expected invalid: {code}");
        }
    }

    #[test]
    fn rejects_non_digits() {
        for code in [
            "abcdefgh",
            "01310-10",
            "01310 10",
            " 1234567",
            "1234567 ",
            "1234567a",
            "+1234567",
        ] {
            assert!(!is_valid_postal_code(code), "expected invalid: {code:?}");
        }
    }

    #[test]
    fn rejects_non_ascii_digits() {
        // Arabic-Indic and full-width digits are Unicode digits but not ASCII.
        assert!(!is_valid_postal_code("٠١٢٣٤٥٦٧"));
        assert!(!is_valid_postal_code("０１２３４５６７"));
        // Seven ASCII digits plus one two-byte char still has the wrong shape.
        assert!(!is_valid_postal_code("123456é"));
    }

    #[test]
    fn every_position_must_be_a_digit() {
        let base = "12345678";
        for i in 0..POSTAL_CODE_LEN {
            let mut code = base.to_string();
            code.replace_range(i..=i, "x");
            assert!(!is_valid_postal_code(&code), "expected invalid: {code}");
        }
    }

    #[test]
    fn parse_keeps_code_verbatim() {
        let code = PostalCode::parse("01310100").expect("valid code");
        assert_eq!(code.as_str(), "01310100");
        assert_eq!(code.to_string(), "01310100");
        assert!(PostalCode::parse("01310-100").is_none());
    }
}
