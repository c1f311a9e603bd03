/// First-aid triage: a static scenario catalog and a keyword classifier
/// that decides emergency mode and filters categories for a query.
pub mod catalog;
mod classifier;

pub use catalog::{
    DEFAULT_STEP, EmergencyCategory, EmergencyContact, GUIDANCE_DISCLAIMER, Priority, QuickAction,
    QuickActionEntry, ScenarioCatalog,
};
pub use classifier::{ClassificationResult, EmergencyClassifier};
