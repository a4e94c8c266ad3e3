use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillCount {
    pub skill: String,
    pub count: u64,
}

impl SkillCount {
    pub fn new(skill: impl Into<String>, count: u64) -> Self {
        Self {
            skill: skill.into(),
            count,
        }
    }
}

/// Ranked counts together with the labels describing the active filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillReport {
    pub top_n: usize,
    pub location_label: String,
    pub company_label: String,
    pub filtered_rows: usize,
    pub total_rows: usize,
    pub skills: Vec<SkillCount>,
}

impl SkillReport {
    pub fn title(&self) -> String {
        format!(
            "Top {} Skills in {} at {}",
            self.top_n, self.location_label, self.company_label
        )
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
