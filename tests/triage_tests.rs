//! Integration tests for first-aid triage
//!
//! Covers classification, category filtering and step lookup

use monica::triage::{DEFAULT_STEP, EmergencyClassifier, Priority, ScenarioCatalog};

mod classify_tests {
    use super::*;

    #[test]
    fn test_empty_query_is_calm_full_catalog() {
        let result = EmergencyClassifier::default().classify("");

        assert!(!result.is_emergency);
        assert_eq!(result.matches, ScenarioCatalog::builtin().categories());
    }

    #[test]
    fn test_severe_bleeding_is_emergency() {
        let result = EmergencyClassifier::default().classify("severe bleeding after a fall");

        assert!(result.is_emergency);
        assert!(result.matches.iter().any(|c| c.title == "Bleeding & Cuts"));
    }

    #[test]
    fn test_classifier_reads_injected_catalog() {
        let catalog = ScenarioCatalog::builtin();
        let classifier = EmergencyClassifier::new(catalog);

        for keyword in catalog.emergency_keywords() {
            assert!(classifier.is_emergency(&keyword.to_uppercase()), "{keyword}");
        }
    }

    #[test]
    fn test_suggestions_all_find_something() {
        let catalog = ScenarioCatalog::builtin();
        let classifier = EmergencyClassifier::new(catalog);

        for suggestion in catalog.search_suggestions() {
            let result = classifier.classify(suggestion);
            assert!(!result.matches.is_empty(), "{suggestion}");
        }
    }
}

mod catalog_tests {
    use super::*;

    #[test]
    fn test_steps_never_empty() {
        let catalog = ScenarioCatalog::builtin();

        for scenario in ["CPR Steps", "Tourniquets", "", "made-up scenario", "🚑"] {
            assert!(!catalog.steps_for(scenario).is_empty(), "{scenario}");
        }
        assert_eq!(catalog.steps_for("Tourniquets"), [DEFAULT_STEP.to_string()]);
    }

    #[test]
    fn test_cpr_guide_order() {
        let steps = ScenarioCatalog::builtin().steps_for("CPR Steps");

        assert_eq!(steps.len(), 8);
        assert_eq!(steps[1], "Call 911 and get an AED if available");
        assert_eq!(steps[7], "Continue until emergency services arrive");
    }

    #[test]
    fn test_high_priority_categories() {
        let high: Vec<_> = ScenarioCatalog::builtin()
            .categories()
            .iter()
            .filter(|c| c.priority == Priority::High)
            .map(|c| c.id.as_str())
            .collect();

        assert_eq!(high, ["cpr", "bleeding", "choking", "allergic"]);
    }

    #[test]
    fn test_emergency_contacts() {
        let numbers: Vec<_> = ScenarioCatalog::builtin()
            .emergency_contacts()
            .into_iter()
            .map(|c| c.number)
            .collect();

        assert_eq!(numbers, ["911", "1-800-222-1222", "988"]);
    }
}
