#[cfg(test)]
mod tests {
    use cartograph::inference::signals::naming;

    #[test]
    fn test_known_schema_pairs() {
        let cases = [
            // Exact match, case aside.
            ("cDepCode", "cDepCode", 1.0),
            ("UserID", "UserId", 1.0),
            // One normalized name contains the other.
            ("cDepCode", "DepCode", 0.8),
            ("cInvCode", "Code", 0.8),
            // One typo over ten characters.
            ("cPersonCode", "PersinCode", 0.9),
            // Abbreviations do not clear the edit-distance cutoff.
            ("DepartmentID", "DepID", 0.0),
            ("cMemo", "cDepCode", 0.0),
        ];
        for (a, b, expected) in cases {
            let got = naming::similarity(a, b);
            assert!(
                (got - expected).abs() < 1e-9,
                "{a} vs {b}: got {got}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_similarity_is_reflexive() {
        for name in ["id", "cInvCode", "dVerifyDate", "UFTS", "iQuantity"] {
            assert_eq!(naming::similarity(name, name), 1.0, "{name}");
        }
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let pairs = [
            ("cDepCode", "DepCode"),
            ("cPersonCode", "PersinCode"),
            ("UserID", "id"),
            ("cWhCode", "cWareCode"),
        ];
        for (a, b) in pairs {
            assert_eq!(
                naming::similarity(a, b),
                naming::similarity(b, a),
                "{a} vs {b}"
            );
        }
    }

    #[test]
    fn test_normalization_strips_one_class_prefix() {
        assert_eq!(naming::normalize("cDepCode"), "depcode");
        assert_eq!(naming::normalize("CDepCode"), "depcode");
        assert_eq!(naming::normalize("DepCode"), "depcode");
        // Only one leading letter comes off.
        assert_eq!(naming::normalize("ccDepCode"), "cdepcode");
        // Names without the prefix are just lower-cased.
        assert_eq!(naming::normalize("UFTS"), "ufts");
    }

    #[test]
    fn test_prefix_variants_collapse_to_contains_band() {
        // The raw names differ, the normalized names coincide; that is the
        // containment band, deliberately below an exact match.
        let score = naming::similarity("cDepCode", "DEPCODE");
        assert!((score - 0.8).abs() < 1e-9);
    }
}
