//! Branch display-name rules shared by every report.

/// Branches whose name contains any of these fragments never appear in
/// reporting output. Matching is case-insensitive substring.
const DENYLIST: [&str; 3] = ["mass market", "twin cities", "accounts receivable"];

/// Returns true when the raw branch name is excluded from reporting.
pub fn is_denylisted(branch_name: &str) -> bool {
    let lower = branch_name.to_lowercase();
    DENYLIST.iter().any(|fragment| lower.contains(fragment))
}

/// Normalizes a raw branch name into its display form.
///
/// Rules, in order: strip the literal "Mayesh" substring and trim, strip a
/// trailing "(<digits>)" group, map "Cut Flower" to "Atlanta", map anything
/// starting with "LAX Shipping" (case-insensitive, optional space) to
/// "LAX/Shipping". Idempotent: normalizing an already-normalized name
/// returns it unchanged.
pub fn normalize_branch_name(branch_name: &str) -> String {
    let without_prefix = branch_name.replace("Mayesh", "");
    let normalized = strip_trailing_parenthetical(without_prefix.trim());

    if normalized == "Cut Flower" {
        return "Atlanta".to_string();
    }
    if is_lax_shipping(&normalized) {
        return "LAX/Shipping".to_string();
    }

    normalized
}

/// Strips a trailing "(<digits>)" group, e.g. "Atlanta (26)" -> "Atlanta".
fn strip_trailing_parenthetical(name: &str) -> String {
    let trimmed = name.trim();
    if let Some(body) = trimmed.strip_suffix(')') {
        if let Some(open) = body.rfind('(') {
            let digits = &body[open + 1..];
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return body[..open].trim_end().to_string();
            }
        }
    }
    trimmed.to_string()
}

fn is_lax_shipping(name: &str) -> bool {
    let lower = name.to_lowercase();
    match lower.strip_prefix("lax") {
        Some(rest) => rest.trim_start().starts_with("shipping"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_prefix_and_trailing_number() {
        assert_eq!(normalize_branch_name("Mayesh Atlanta (26)"), "Atlanta");
        assert_eq!(normalize_branch_name("Mayesh Miami"), "Miami");
        assert_eq!(normalize_branch_name("Naples (31)"), "Naples");
    }

    #[test]
    fn test_special_cases() {
        assert_eq!(normalize_branch_name("Cut Flower"), "Atlanta");
        assert_eq!(normalize_branch_name("Mayesh Cut Flower (4)"), "Atlanta");
        assert_eq!(normalize_branch_name("LAX Shipping (12)"), "LAX/Shipping");
        assert_eq!(normalize_branch_name("LAXShipping"), "LAX/Shipping");
        assert_eq!(normalize_branch_name("lax shipping"), "LAX/Shipping");
    }

    #[test]
    fn test_non_numeric_parenthetical_is_kept() {
        assert_eq!(normalize_branch_name("Miami (South)"), "Miami (South)");
        assert_eq!(normalize_branch_name("Miami ()"), "Miami ()");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Mayesh Atlanta (26)",
            "Cut Flower",
            "LAX Shipping (12)",
            "Miami",
            "Mayesh LAX Shipping",
            "Miami (South)",
            "",
        ];
        for raw in samples {
            let once = normalize_branch_name(raw);
            assert_eq!(normalize_branch_name(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_denylist_is_case_insensitive() {
        assert!(is_denylisted("Mass Market West"));
        assert!(is_denylisted("MASS MARKET"));
        assert!(is_denylisted("Twin Cities (3)"));
        assert!(is_denylisted("Accounts Receivable"));
        assert!(!is_denylisted("Mayesh Atlanta"));
    }
}
