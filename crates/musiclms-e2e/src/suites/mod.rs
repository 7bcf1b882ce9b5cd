//! The MusicLMS test catalog.
//!
//! Every class runs on its own browser session; see [`crate::runner`].

use crate::case::TestClass;

pub mod assignments;
pub mod data_driven;
pub mod invite;
pub mod login;
pub mod signup;

/// Every test class, in reporting order
#[must_use]
pub fn catalog() -> Vec<TestClass> {
    vec![
        login::class(),
        signup::class(),
        data_driven::class(),
        invite::class(),
        assignments::class(),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::case::Selection;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let mut seen = HashSet::new();
        for class in catalog() {
            for case in &class.cases {
                assert!(seen.insert(case.id), "duplicate id {}", case.id);
            }
        }
        assert_eq!(seen.len(), 7 + 8 + 3 + 3 + 1);
    }

    #[test]
    fn test_sanity_selection() {
        let sanity = Selection::all().with_groups(["sanity"]);
        let ids: Vec<&str> = catalog()
            .iter()
            .filter_map(|class| class.select(&sanity))
            .flat_map(|class| class.cases.into_iter().map(|c| c.id))
            .collect();
        assert_eq!(
            ids,
            vec![
                "TC_Auth_001",
                "TC_Auth_002",
                "TC_Auth_006",
                "TC_Auth_007",
                "TC_Auth_008",
                "TC_Auth_013",
                "TC_Auth_014",
                "TC_Invite_001",
            ]
        );
    }

    #[test]
    fn test_class_names() {
        let names: Vec<&str> = catalog().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                login::CLASS,
                signup::CLASS,
                data_driven::CLASS,
                invite::CLASS,
                assignments::CLASS,
            ]
        );
    }
}
