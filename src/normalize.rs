// 🧹 Normalizer - Canonical keys for show names and song titles
// Pure, total, idempotent string cleanup shared by both sources

/// Leading tag some ASCAP exports prepend to commercial/promo cues.
const COMM_PROMO_TAG: &str = "(comm/promo)";

/// Normalize a raw show/series name into a comparable key.
///
/// Lowercases, strips "(comm/promo)" tags (the exports place them leading or
/// trailing), drops everything that is neither alphanumeric nor whitespace,
/// and collapses runs of whitespace. Never fails: empty or whitespace-only
/// input yields an empty key.
pub fn normalize_show(raw: &str) -> String {
    let lower = raw.to_lowercase();
    clean(&lower.replace(COMM_PROMO_TAG, " "))
}

/// Normalize a raw song/work title into a comparable key.
///
/// Same cleanup as [`normalize_show`] minus the comm/promo tag handling.
pub fn normalize_title(raw: &str) -> String {
    clean(&raw.to_lowercase())
}

/// Shared cleanup: keep alphanumerics and whitespace, collapse whitespace.
fn clean(s: &str) -> String {
    let kept: String = s
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_trim() {
        assert_eq!(normalize_show("  Late Night  "), "late night");
        assert_eq!(normalize_title("  MY SONG  "), "my song");
    }

    #[test]
    fn test_comm_promo_tag_stripped() {
        assert_eq!(normalize_show("(Comm/Promo) Late Night"), "late night");
        assert_eq!(normalize_show("(COMM/PROMO)Late Night"), "late night");
    }

    #[test]
    fn test_comm_promo_tag_trailing() {
        assert_eq!(normalize_show("Late Night (Comm/Promo)"), "late night");
    }

    #[test]
    fn test_title_keeps_comm_promo_text() {
        assert_eq!(normalize_title("(Comm/Promo) Jingle"), "commpromo jingle");
    }

    #[test]
    fn test_special_characters_removed() {
        assert_eq!(normalize_show("Law & Order: S.V.U."), "law order svu");
        assert_eq!(normalize_title("Don't Stop Believin'"), "dont stop believin");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(normalize_show("The   Big\tShow"), "the big show");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_show(""), "");
        assert_eq!(normalize_show("   "), "");
        assert_eq!(normalize_title("!!!"), "");
    }

    #[test]
    fn test_idempotence() {
        let samples = [
            "(Comm/Promo) Late Night",
            "Law & Order: S.V.U.",
            "  The   Big Show!  ",
            "midnight runners",
            "",
            "(comm/promo)(comm/promo) twice tagged",
            "Ünïcøde Shôw — Dash",
        ];

        for s in samples {
            let once = normalize_show(s);
            assert_eq!(normalize_show(&once), once, "show not idempotent: {:?}", s);

            let once = normalize_title(s);
            assert_eq!(normalize_title(&once), once, "title not idempotent: {:?}", s);
        }
    }
}
