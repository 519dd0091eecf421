use serde::Serialize;

use super::PickerError;
use crate::models::enums::Severity;

/// One canned disease entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseRecord {
    pub name: &'static str,
    pub severity: Severity,
    /// Percentage, before jitter.
    pub base_confidence: f64,
    pub treatment: &'static str,
    pub prevention: &'static str,
}

/// Read-only disease table. Built once at start-up and shared by
/// reference; never mutated.
#[derive(Debug, Clone)]
pub struct DiseaseCatalog {
    records: Vec<DiseaseRecord>,
}

impl DiseaseCatalog {
    pub fn new(records: Vec<DiseaseRecord>) -> Result<Self, PickerError> {
        if records.is_empty() {
            return Err(PickerError::EmptyCatalog);
        }
        Ok(Self { records })
    }

    /// The four wheat diseases of the demo path, in selection order.
    pub fn wheat() -> Self {
        Self {
            records: vec![
                DiseaseRecord {
                    name: "Leaf Rust",
                    severity: Severity::Medium,
                    base_confidence: 92.5,
                    treatment: "Apply fungicides containing propiconazole or tebuconazole. \
                                Remove infected leaves immediately.",
                    prevention: "Use resistant wheat varieties. Ensure proper spacing for air \
                                 circulation. Avoid excessive nitrogen fertilization.",
                },
                DiseaseRecord {
                    name: "Stem Rust",
                    severity: Severity::High,
                    base_confidence: 88.3,
                    treatment: "Apply triazole-based fungicides immediately. Remove and destroy \
                                infected plants to prevent spread.",
                    prevention: "Plant resistant varieties. Monitor fields regularly during warm, \
                                 humid weather. Implement crop rotation.",
                },
                DiseaseRecord {
                    name: "Powdery Mildew",
                    severity: Severity::Low,
                    base_confidence: 94.7,
                    treatment: "Apply sulfur-based fungicides or systemic fungicides like \
                                triadimefon. Improve air circulation.",
                    prevention: "Avoid excessive nitrogen fertilization. Ensure proper plant \
                                 spacing. Use resistant wheat varieties.",
                },
                DiseaseRecord {
                    name: "Septoria Leaf Blotch",
                    severity: Severity::Medium,
                    base_confidence: 89.1,
                    treatment: "Apply fungicides containing azoxystrobin or propiconazole at \
                                early symptoms. Remove crop debris.",
                    prevention: "Use certified disease-free seeds. Practice crop rotation. Avoid \
                                 overhead irrigation.",
                },
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DiseaseRecord> {
        self.records.get(index)
    }

    /// Row at `index` modulo the catalog length, so a selector that
    /// overshoots still lands on a real record.
    pub fn get_wrapping(&self, index: usize) -> &DiseaseRecord {
        // Non-empty by construction.
        &self.records[index % self.records.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiseaseRecord> {
        self.records.iter()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.name == name)
    }
}
