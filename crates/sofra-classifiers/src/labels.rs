//! Label and score normalization for API responses

/// Turn a raw model label into a display name.
///
/// Underscores become spaces, then every word is title-cased: the first cased
/// letter after a non-cased character is upper-cased, the rest lower-cased.
///
/// ```
/// use sofra_classifiers::labels::normalize_label;
///
/// assert_eq!(normalize_label("iskender_kebap"), "Iskender Kebap");
/// ```
pub fn normalize_label(raw: &str) -> String {
    title_case(&raw.replace('_', " "))
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;

    for c in text.chars() {
        if prev_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_cased = c.is_uppercase() || c.is_lowercase();
    }

    out
}

/// Round a confidence score to 4 decimal places, clamped to 0.0-1.0.
///
/// Exact ties go to the even neighbour. Every `f32` times 10^4 is exact in
/// `f64`, so a tie in the score is a tie here too.
pub fn round_score(score: f32) -> f64 {
    let rounded = (f64::from(score) * 10_000.0).round_ties_even() / 10_000.0;
    rounded.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscores_become_title_cased_words() {
        assert_eq!(normalize_label("iskender_kebap"), "Iskender Kebap");
        assert_eq!(normalize_label("mercimek_corbasi"), "Mercimek Corbasi");
    }

    #[test]
    fn test_single_word() {
        assert_eq!(normalize_label("lahmacun"), "Lahmacun");
    }

    #[test]
    fn test_mixed_case_is_lowered_after_first_letter() {
        assert_eq!(normalize_label("ADANA_kebap"), "Adana Kebap");
        assert_eq!(normalize_label("tAvUk_sis"), "Tavuk Sis");
    }

    #[test]
    fn test_non_ascii_letters() {
        assert_eq!(normalize_label("çiğ_köfte"), "Çiğ Köfte");
        assert_eq!(normalize_label("şakşuka"), "Şakşuka");
    }

    #[test]
    fn test_digits_and_punctuation_start_new_words() {
        assert_eq!(normalize_label("menemen-2"), "Menemen-2");
        assert_eq!(normalize_label("ali_nazik-kebap"), "Ali Nazik-Kebap");
    }

    #[test]
    fn test_normalizing_twice_is_stable() {
        let once = normalize_label("hunkar_begendi");
        assert_eq!(normalize_label(&once), once);
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.987_654), 0.9877);
        assert_eq!(round_score(1.0), 1.0);
        assert_eq!(round_score(0.812_345_6), 0.8123);
        assert_eq!(round_score(0.0), 0.0);
    }

    #[test]
    fn test_round_score_ties_to_even() {
        assert_eq!(round_score(0.031_25), 0.0312);
        assert_eq!(round_score(0.156_25), 0.1562);
        assert_eq!(round_score(0.093_75), 0.0938);
    }

    #[test]
    fn test_round_score_clamps() {
        assert_eq!(round_score(1.000_01), 1.0);
        assert_eq!(round_score(-0.2), 0.0);
    }
}
