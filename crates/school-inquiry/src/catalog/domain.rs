use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest standard the school teaches; fee bands above it are hidden.
pub const HIGHEST_OFFERED_STANDARD: u8 = 10;

/// Annual charges for one grade band. `total` is stored as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSchedule {
    #[serde(rename = "class")]
    pub class_band: String,
    pub tuition_fee: u32,
    pub transport_fee: u32,
    pub other_fees: u32,
    pub total: u32,
    /// Highest numeric standard covered by the band, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_ceiling: Option<u8>,
}

impl FeeSchedule {
    /// Whether the band sits within the grades the school offers.
    ///
    /// An explicit ceiling decides on its own. Without one, the band is
    /// hidden when its label names the XI or XII standards as whole words.
    pub fn is_offered(&self) -> bool {
        match self.grade_ceiling {
            Some(ceiling) => ceiling <= HIGHEST_OFFERED_STANDARD,
            None => !names_senior_standard(&self.class_band),
        }
    }
}

fn names_senior_standard(label: &str) -> bool {
    label
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == "XI" || token == "XII")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticePriority {
    High,
    #[default]
    Medium,
    Low,
}

/// Announcement shown on the public site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub priority: NoticePriority,
}

/// Notice creation body before presence checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub priority: Option<NoticePriority>,
}

impl NoticeRequest {
    pub fn into_notice(self, at: DateTime<Utc>) -> Option<Notice> {
        let title = self.title.filter(|title| !title.trim().is_empty())?;
        let content = self.content.filter(|content| !content.trim().is_empty())?;
        Some(Notice {
            title,
            content,
            date: at,
            priority: self.priority.unwrap_or_default(),
        })
    }
}
