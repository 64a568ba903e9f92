use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Topic selected on the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryType {
    General,
    Admission,
    Academic,
    Feedback,
}

impl InquiryType {
    pub const ALL: [InquiryType; 4] = [
        InquiryType::General,
        InquiryType::Admission,
        InquiryType::Academic,
        InquiryType::Feedback,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InquiryType::General => "general",
            InquiryType::Admission => "admission",
            InquiryType::Academic => "academic",
            InquiryType::Feedback => "feedback",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InquiryType::General => "General Inquiry",
            InquiryType::Admission => "Admission",
            InquiryType::Academic => "Academic",
            InquiryType::Feedback => "Feedback",
        }
    }
}

/// Grades a student can apply for, lowest first.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    Nursery,
    #[serde(rename = "LKG")]
    Lkg,
    #[serde(rename = "UKG")]
    Ukg,
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
    VIII,
    IX,
    X,
}

impl Grade {
    pub const ALL: [Grade; 13] = [
        Grade::Nursery,
        Grade::Lkg,
        Grade::Ukg,
        Grade::I,
        Grade::II,
        Grade::III,
        Grade::IV,
        Grade::V,
        Grade::VI,
        Grade::VII,
        Grade::VIII,
        Grade::IX,
        Grade::X,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|grade| grade.as_str().eq_ignore_ascii_case(raw))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Nursery => "Nursery",
            Grade::Lkg => "LKG",
            Grade::Ukg => "UKG",
            Grade::I => "I",
            Grade::II => "II",
            Grade::III => "III",
            Grade::IV => "IV",
            Grade::V => "V",
            Grade::VI => "VI",
            Grade::VII => "VII",
            Grade::VIII => "VIII",
            Grade::IX => "IX",
            Grade::X => "X",
        }
    }

    /// Numeric standard; pre-primary years count as 0.
    pub fn standard(self) -> u8 {
        match self {
            Grade::Nursery | Grade::Lkg | Grade::Ukg => 0,
            Grade::I => 1,
            Grade::II => 2,
            Grade::III => 3,
            Grade::IV => 4,
            Grade::V => 5,
            Grade::VI => 6,
            Grade::VII => 7,
            Grade::VIII => 8,
            Grade::IX => 9,
            Grade::X => 10,
        }
    }
}

/// Normalized contact form payload as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub inquiry_type: InquiryType,
}

/// Normalized admission form payload as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionSubmission {
    pub student_name: String,
    pub parent_name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "class")]
    pub grade: Grade,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Persisted contact inquiry. Never updated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub inquiry_type: InquiryType,
    pub created_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn received(submission: ContactSubmission, at: DateTime<Utc>) -> Self {
        let ContactSubmission {
            name,
            email,
            phone,
            message,
            inquiry_type,
        } = submission;
        Self {
            name,
            email,
            phone,
            message,
            inquiry_type,
            created_at: at,
        }
    }
}

/// Persisted admission inquiry. Never updated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionInquiry {
    pub student_name: String,
    pub parent_name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "class")]
    pub grade: Grade,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AdmissionInquiry {
    pub fn received(submission: AdmissionSubmission, at: DateTime<Utc>) -> Self {
        let AdmissionSubmission {
            student_name,
            parent_name,
            email,
            phone,
            grade,
            previous_school,
            address,
        } = submission;
        Self {
            student_name,
            parent_name,
            email,
            phone,
            grade,
            previous_school,
            address,
            created_at: at,
        }
    }
}

/// Contact request body before presence checks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub inquiry_type: Option<String>,
}

impl ContactRequest {
    pub fn into_submission(self) -> Result<ContactSubmission, SubmissionError> {
        let (Some(name), Some(email), Some(phone), Some(message), Some(inquiry_type)) = (
            present(self.name),
            present(self.email),
            present(self.phone),
            present(self.message),
            present(self.inquiry_type),
        ) else {
            return Err(SubmissionError::MissingContactFields);
        };

        let inquiry_type = InquiryType::parse(&inquiry_type)
            .ok_or(SubmissionError::UnknownInquiryType(inquiry_type))?;

        Ok(ContactSubmission {
            name,
            email,
            phone,
            message,
            inquiry_type,
        })
    }
}

/// Admission request body before presence checks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionRequest {
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, rename = "class")]
    pub grade: Option<String>,
    #[serde(default)]
    pub previous_school: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl AdmissionRequest {
    pub fn into_submission(self) -> Result<AdmissionSubmission, SubmissionError> {
        let (Some(student_name), Some(parent_name), Some(email), Some(phone), Some(grade)) = (
            present(self.student_name),
            present(self.parent_name),
            present(self.email),
            present(self.phone),
            present(self.grade),
        ) else {
            return Err(SubmissionError::MissingAdmissionFields);
        };

        let grade = Grade::parse(&grade).ok_or(SubmissionError::UnknownGrade(grade))?;

        Ok(AdmissionSubmission {
            student_name,
            parent_name,
            email,
            phone,
            grade,
            previous_school: present(self.previous_school),
            address: present(self.address),
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Request rejected before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("All fields are required")]
    MissingContactFields,
    #[error("Required fields are missing")]
    MissingAdmissionFields,
    #[error("Unknown inquiry type '{0}'")]
    UnknownInquiryType(String),
    #[error("Unknown class '{0}'")]
    UnknownGrade(String),
}
