// Progressive reformatting of the phone field as the user types: strip
// everything but digits, then shape toward one of the two accepted forms.
// Digit strings with any other leading sequence pass through untouched and
// are left for the field's rules to reject.
pub fn normalize_phone(raw: &str) -> String {
    let digits = raw
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>();

    if digits.starts_with("27") {
        let truncated = &digits[..digits.len().min(11)];
        format!("+{truncated}")
    } else if digits.starts_with('0') {
        digits[..digits.len().min(10)].to_string()
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_input_is_unchanged() {
        assert_eq!(normalize_phone("0761731018"), "0761731018");
        assert_eq!(normalize_phone("+27761731018"), "+27761731018");
    }

    #[test]
    fn separators_are_stripped_while_typing() {
        assert_eq!(normalize_phone("076-173-1018"), "0761731018");
        assert_eq!(normalize_phone("076 173 1018"), "0761731018");
        assert_eq!(normalize_phone("(076) 173 1018"), "0761731018");
    }

    #[test]
    fn bare_international_digits_gain_the_plus_prefix() {
        assert_eq!(normalize_phone("27761731018"), "+27761731018");
        assert_eq!(normalize_phone("27 76 173 1018"), "+27761731018");
    }

    #[test]
    fn overlong_input_is_truncated_not_rounded() {
        assert_eq!(normalize_phone("0761731018999"), "0761731018");
        assert_eq!(normalize_phone("27761731018999"), "+27761731018");
    }

    #[test]
    fn unrecognized_leading_digits_pass_through() {
        assert_eq!(normalize_phone("5612345678"), "5612345678");
        assert_eq!(normalize_phone("hello"), "hello");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["076-173-1018", "27761731018", "+27 76 173 1018"] {
            let once = normalize_phone(raw);
            assert_eq!(normalize_phone(&once), once);
        }
    }
}
