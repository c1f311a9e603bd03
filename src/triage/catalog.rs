//! Hand-authored first-aid catalog.
//!
//! Categories carry data only; mapping ids to icons or colours is left to
//! whatever renders them.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Returned for any scenario without a written guide.
pub const DEFAULT_STEP: &str =
    "Detailed steps for this scenario are being updated. Please consult emergency services.";

/// Shown alongside every guide.
pub const GUIDANCE_DISCLAIMER: &str = "These steps are for guidance only. Always call emergency services for serious injuries. If you're unsure about the severity, err on the side of caution and seek professional medical help.";

const EMERGENCY_KEYWORDS: &[&str] = &[
    "bleeding",
    "accident",
    "burn",
    "choking",
    "unconscious",
    "emergency",
];

const SEARCH_SUGGESTIONS: &[&str] = &[
    "CPR",
    "bleeding",
    "choking",
    "burns",
    "allergic reaction",
    "fracture",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyCategory {
    pub id: String,
    pub title: String,
    pub priority: Priority,
    pub scenarios: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyContact {
    pub name: &'static str,
    pub number: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "target")]
pub enum QuickAction {
    Call(&'static str),
    OpenCategory(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickActionEntry {
    pub title: &'static str,
    pub action: QuickAction,
}

pub struct ScenarioCatalog {
    categories: Vec<EmergencyCategory>,
    steps: HashMap<String, Vec<String>>,
    keywords: Vec<String>,
    default_steps: Vec<String>,
}

static BUILTIN: Lazy<ScenarioCatalog> = Lazy::new(ScenarioCatalog::load_builtin);

impl ScenarioCatalog {
    /// The compiled-in catalog, built on first use.
    pub fn builtin() -> &'static ScenarioCatalog {
        &BUILTIN
    }

    fn load_builtin() -> Self {
        let category = |id: &str, title: &str, priority, scenarios: [&str; 4]| EmergencyCategory {
            id: id.to_string(),
            title: title.to_string(),
            priority,
            scenarios: scenarios.iter().map(|s| s.to_string()).collect(),
        };

        let categories = vec![
            category(
                "cpr",
                "CPR & Cardiac",
                Priority::High,
                ["Heart Attack", "Cardiac Arrest", "CPR Steps", "AED Usage"],
            ),
            category(
                "bleeding",
                "Bleeding & Cuts",
                Priority::High,
                ["Severe Bleeding", "Deep Cuts", "Pressure Points", "Tourniquets"],
            ),
            category(
                "burns",
                "Burns & Heat",
                Priority::Medium,
                [
                    "First-degree Burns",
                    "Chemical Burns",
                    "Electrical Burns",
                    "Heat Stroke",
                ],
            ),
            category(
                "choking",
                "Choking & Airways",
                Priority::High,
                [
                    "Adult Choking",
                    "Child Choking",
                    "Infant Choking",
                    "Heimlich Maneuver",
                ],
            ),
            category(
                "fractures",
                "Fractures & Sprains",
                Priority::Medium,
                ["Broken Bones", "Sprains", "Dislocations", "Splinting"],
            ),
            category(
                "allergic",
                "Allergic Reactions",
                Priority::High,
                [
                    "Anaphylaxis",
                    "Food Allergies",
                    "Insect Stings",
                    "EpiPen Usage",
                ],
            ),
        ];

        let guides: [(&str, &[&str]); 4] = [
            (
                "Heart Attack",
                &[
                    "Call 911 immediately",
                    "Help person sit down and stay calm",
                    "Give aspirin if available and no allergies",
                    "Loosen tight clothing",
                    "Be prepared to perform CPR if person becomes unconscious",
                ],
            ),
            (
                "CPR Steps",
                &[
                    "Check for responsiveness - tap shoulders and shout \"Are you okay?\"",
                    "Call 911 and get an AED if available",
                    "Place person on firm, flat surface",
                    "Tilt head back, lift chin to open airway",
                    "Place heel of hand on center of chest between nipples",
                    "Push hard and fast at least 2 inches deep at 100-120 compressions per minute",
                    "Allow complete chest recoil between compressions",
                    "Continue until emergency services arrive",
                ],
            ),
            (
                "Severe Bleeding",
                &[
                    "Ensure scene safety and use personal protective equipment",
                    "Apply direct pressure to wound with clean cloth or gauze",
                    "Maintain pressure and add more layers if blood soaks through",
                    "Elevate injured area above heart level if possible",
                    "Apply pressure bandage to maintain pressure",
                    "Check for signs of shock and treat accordingly",
                    "Get medical help immediately",
                ],
            ),
            (
                "Adult Choking",
                &[
                    "Ask \"Are you choking?\" If person can speak or cough, encourage coughing",
                    "If person cannot speak, breathe, or make sound, act quickly",
                    "Stand behind person and wrap arms around waist",
                    "Make a fist with one hand, place above navel but below ribcage",
                    "Grasp fist with other hand and give quick upward thrusts",
                    "Continue until object is expelled or person becomes unconscious",
                    "If unconscious, lower to ground and begin CPR",
                ],
            ),
        ];

        let steps: HashMap<String, Vec<String>> = guides
            .iter()
            .map(|(scenario, steps)| {
                (
                    scenario.to_string(),
                    steps.iter().map(|step| step.to_string()).collect::<Vec<_>>(),
                )
            })
            .collect();

        Self {
            categories,
            steps,
            keywords: EMERGENCY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            default_steps: vec![DEFAULT_STEP.to_string()],
        }
    }

    /// All categories in declared order.
    pub fn categories(&self) -> &[EmergencyCategory] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&EmergencyCategory> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Ordered steps for a scenario. Never empty: unknown scenarios get the
    /// single default step.
    pub fn steps_for(&self, scenario: &str) -> &[String] {
        self.steps
            .get(scenario)
            .filter(|steps| !steps.is_empty())
            .unwrap_or(&self.default_steps)
    }

    /// Scenario opened first when a category is selected.
    pub fn default_scenario<'a>(&self, category: &'a EmergencyCategory) -> Option<&'a str> {
        category.scenarios.first().map(String::as_str)
    }

    /// Lowercase substrings that switch the UI into emergency mode.
    pub fn emergency_keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn search_suggestions(&self) -> &'static [&'static str] {
        SEARCH_SUGGESTIONS
    }

    pub fn emergency_contacts(&self) -> Vec<EmergencyContact> {
        vec![
            EmergencyContact {
                name: "Emergency",
                number: "911",
            },
            EmergencyContact {
                name: "Poison Control",
                number: "1-800-222-1222",
            },
            EmergencyContact {
                name: "Crisis Lifeline",
                number: "988",
            },
        ]
    }

    pub fn quick_actions(&self) -> Vec<QuickActionEntry> {
        vec![
            QuickActionEntry {
                title: "Call 911",
                action: QuickAction::Call("911"),
            },
            QuickActionEntry {
                title: "Poison Control",
                action: QuickAction::Call("1-800-222-1222"),
            },
            QuickActionEntry {
                title: "Start CPR Guide",
                action: QuickAction::OpenCategory("cpr"),
            },
        ]
    }
}
