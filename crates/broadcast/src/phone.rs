//! Phone number canonicalization.
//!
//! Profile phones are free-text fields filled in by residents, so they
//! arrive with country prefixes, spaces, dashes and parentheses in every
//! combination. The gateway wants plain digits.

/// Minimum digit count for a dialable number.
const MIN_PHONE_DIGITS: usize = 10;

/// Strip a raw phone field down to a canonical digit string.
///
/// Returns `None` when the input is absent, empty, or keeps fewer than
/// ten digits after stripping. No country-code validation beyond length;
/// inputs are deliberately trusted once they are long enough.
pub fn normalize(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() < MIN_PHONE_DIGITS {
        return None;
    }

    Some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_formatting() {
        assert_eq!(
            normalize(Some("+55 48 99999-8888")),
            Some("5548999998888".to_string())
        );
        assert_eq!(
            normalize(Some("(48) 3333-4444x")),
            Some("4833334444".to_string())
        );
    }

    #[test]
    fn test_rejects_short_numbers() {
        assert_eq!(normalize(Some("123-45")), None);
        assert_eq!(normalize(Some("999998888")), None); // nine digits
        assert_eq!(normalize(Some("")), None);
        assert_eq!(normalize(Some("   ")), None);
        assert_eq!(normalize(None), None);
    }

    #[test]
    fn test_ten_digits_is_enough() {
        assert_eq!(normalize(Some("4899998888")), Some("4899998888".to_string()));
    }

    #[test]
    fn test_idempotent_on_canonical_output() {
        let inputs = ["+55 48 99999-8888", "4899998888", "(11) 98765-4321"];
        for input in inputs {
            let once = normalize(Some(input)).unwrap();
            let twice = normalize(Some(&once)).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_letters_do_not_count_as_digits() {
        assert_eq!(normalize(Some("phone: abc-def-ghij")), None);
        assert_eq!(
            normalize(Some("ramal 48 9999 8888 22")),
            Some("489999888822".to_string())
        );
    }
}