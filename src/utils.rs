/// Utility helpers shared by the router and the player.

/// True for titles shaped like a dated entry, e.g. `11.28.25` or `2.25.26`:
/// three non-empty runs of ASCII digits separated by single dots.
pub fn is_dated_page_key<S: AsRef<str>>(s: S) -> bool {
    let mut parts = 0;
    for part in s.as_ref().split('.') {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        parts += 1;
    }
    parts == 3
}

/// Clamp into `[0, 1]`; NaN collapses to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dated_keys() {
        assert!(is_dated_page_key("11.28.25"));
        assert!(is_dated_page_key("2.25.26"));
        assert!(!is_dated_page_key("music"));
        assert!(!is_dated_page_key("11.28"));
        assert!(!is_dated_page_key("11.28.25.1"));
        assert!(!is_dated_page_key("11..25"));
        assert!(!is_dated_page_key("11.28.2a"));
        assert!(!is_dated_page_key(""));
    }

    #[test]
    fn clamp_unit_handles_nan_and_bounds() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(0.25), 0.25);
    }
}
