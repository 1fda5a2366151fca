//! Degree classification.
//!
//! The role column is free text ("Consultant General Surgeon", "resident
//! yr 2", ...). Classification is a first-match scan over an ordered rule
//! table of lower-case substrings; anything unmatched is `Other`.

use crate::types::Category;

/// A substring rule. `pattern` must be lower case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub pattern: &'static str,
    pub category: Category,
}

/// Precedence is the slice order: a title containing both "consult" and
/// "special" is a Consultant.
pub const DEFAULT_RULES: &[Rule] = &[
    Rule { pattern: "consult", category: Category::Consultant },
    Rule { pattern: "special", category: Category::Specialist },
    Rule { pattern: "resident", category: Category::Resident },
];

#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    rules: &'a [Rule],
    fallback: Category,
}

impl<'a> Classifier<'a> {
    pub fn new(rules: &'a [Rule], fallback: Category) -> Self {
        Self { rules, fallback }
    }

    pub fn classify(&self, text: &str) -> Category {
        let text = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| text.contains(rule.pattern))
            .map(|rule| rule.category)
            .unwrap_or(self.fallback)
    }
}

impl Default for Classifier<'static> {
    fn default() -> Self {
        Classifier::new(DEFAULT_RULES, Category::Other)
    }
}

/// Classify with the default rule table. A missing degree classifies as
/// the empty string does.
pub fn classify_degree(degree: Option<&str>) -> Category {
    Classifier::default().classify(degree.unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_matches_each_rule_case_insensitively() {
        assert_eq!(classify_degree(Some("Consultant Surgeon")), Category::Consultant);
        assert_eq!(classify_degree(Some("SPECIALIST")), Category::Specialist);
        assert_eq!(classify_degree(Some("Senior Resident")), Category::Resident);
        assert_eq!(classify_degree(Some("Nurse")), Category::Other);
    }

    #[test]
    fn test_missing_degree_is_other() {
        assert_eq!(classify_degree(None), Category::Other);
        assert_eq!(classify_degree(Some("")), Category::Other);
    }

    #[test]
    fn test_consultant_wins_over_specialist() {
        assert_eq!(
            classify_degree(Some("Specialist, acting consultant")),
            Category::Consultant
        );
    }

    #[test]
    fn test_custom_rule_table_changes_precedence() {
        let rules = [
            Rule { pattern: "special", category: Category::Specialist },
            Rule { pattern: "consult", category: Category::Consultant },
        ];
        let classifier = Classifier::new(&rules, Category::Resident);
        assert_eq!(classifier.classify("consultant specialist"), Category::Specialist);
        assert_eq!(classifier.classify("intern"), Category::Resident);
    }

    proptest! {
        #[test]
        fn prop_consult_takes_precedence(
            prefix in "[a-z ]{0,8}",
            middle in "[a-z ]{0,8}",
            suffix in "[a-z ]{0,8}",
            special_first in any::<bool>(),
        ) {
            let (a, b) = if special_first { ("Special", "CONSULT") } else { ("consult", "special") };
            let title = format!("{prefix}{a}{middle}{b}{suffix}");
            prop_assert_eq!(classify_degree(Some(&title)), Category::Consultant);
        }
    }
}
