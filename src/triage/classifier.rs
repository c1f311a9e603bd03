use super::catalog::{EmergencyCategory, Priority, ScenarioCatalog};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub is_emergency: bool,
    /// Matching categories in catalog order.
    pub matches: Vec<EmergencyCategory>,
}

impl ClassificationResult {
    /// High-priority matches to call out while emergency mode is on.
    pub fn highlighted(&self) -> impl Iterator<Item = &EmergencyCategory> {
        self.matches
            .iter()
            .filter(move |category| self.is_emergency && category.priority == Priority::High)
    }
}

/// Plain case-insensitive substring matching against the catalog. No
/// tokenizing, no ranking.
#[derive(Clone, Copy)]
pub struct EmergencyClassifier<'a> {
    catalog: &'a ScenarioCatalog,
}

impl Default for EmergencyClassifier<'static> {
    fn default() -> Self {
        Self::new(ScenarioCatalog::builtin())
    }
}

impl<'a> EmergencyClassifier<'a> {
    pub fn new(catalog: &'a ScenarioCatalog) -> Self {
        Self { catalog }
    }

    pub fn is_emergency(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.catalog
            .emergency_keywords()
            .iter()
            .any(|keyword| query.contains(keyword.as_str()))
    }

    /// Categories whose title or any scenario contains the query, or is
    /// contained in it ("severe bleeding after a fall" names "Severe
    /// Bleeding"). An empty query matches everything.
    pub fn matching_categories(&self, query: &str) -> Vec<EmergencyCategory> {
        let query = query.to_lowercase();
        let overlaps = |name: &str| {
            let name = name.to_lowercase();
            name.contains(&query) || query.contains(&name)
        };

        self.catalog
            .categories()
            .iter()
            .filter(|category| {
                overlaps(&category.title)
                    || category.scenarios.iter().any(|scenario| overlaps(scenario))
            })
            .cloned()
            .collect()
    }

    pub fn classify(&self, query: &str) -> ClassificationResult {
        ClassificationResult {
            is_emergency: self.is_emergency(query),
            matches: self.matching_categories(query),
        }
    }
}
