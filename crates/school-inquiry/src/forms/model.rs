use std::collections::BTreeMap;

use super::validator::{
    format_phone, is_valid_email, is_valid_message, is_valid_name, is_valid_phone,
    normalize_phone,
};
use crate::inquiries::{AdmissionSubmission, ContactSubmission, Grade, InquiryType};
use crate::transport::Submission;

/// Inputs across both inquiry forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    StudentName,
    ParentName,
    Email,
    Phone,
    Message,
    InquiryType,
    Class,
    PreviousSchool,
    Address,
}

impl Field {
    /// Field name as used in request bodies.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::StudentName => "studentName",
            Field::ParentName => "parentName",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Message => "message",
            Field::InquiryType => "inquiryType",
            Field::Class => "class",
            Field::PreviousSchool => "previousSchool",
            Field::Address => "address",
        }
    }
}

const NAME_HINT: &str = "Enter at least 2 characters";
const EMAIL_HINT: &str = "Enter a valid email";
const PHONE_HINT: &str = "Enter 10 digits";
const MESSAGE_HINT: &str = "Message must be at least 5 characters";
const SELECTION_HINT: &str = "Select a valid option";

/// Result of validating the current form values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormReport {
    pub submittable: bool,
    /// Hints for fields that hold a value that does not validate.
    pub hints: BTreeMap<Field, &'static str>,
}

impl FormReport {
    fn check(&mut self, field: Field, value: &str, valid: bool, hint: &'static str) {
        if !valid {
            self.submittable = false;
            if !value.is_empty() {
                self.hints.insert(field, hint);
            }
        }
    }
}

/// Behaviour shared by the contact and admission forms.
pub trait InquiryForm {
    fn set_field(&mut self, field: Field, value: &str);
    fn report(&self) -> FormReport;
    /// Normalized payload, present only while the form is submittable.
    fn submission(&self) -> Option<Submission>;
    fn clear(&mut self);
    fn success_message(&self) -> &'static str;
    fn failure_message(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    /// Display-formatted phone number.
    pub phone: String,
    pub message: String,
    pub inquiry_type: String,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            message: String::new(),
            inquiry_type: InquiryType::General.as_str().to_string(),
        }
    }
}

impl InquiryForm for ContactForm {
    fn set_field(&mut self, field: Field, value: &str) {
        match field {
            Field::Name => self.name = value.to_string(),
            Field::Email => self.email = value.to_string(),
            Field::Phone => self.phone = format_phone(value),
            Field::Message => self.message = value.to_string(),
            Field::InquiryType => self.inquiry_type = value.to_string(),
            _ => {}
        }
    }

    fn report(&self) -> FormReport {
        let mut report = FormReport {
            submittable: true,
            ..FormReport::default()
        };
        report.check(Field::Name, &self.name, is_valid_name(&self.name), NAME_HINT);
        report.check(Field::Email, &self.email, is_valid_email(&self.email), EMAIL_HINT);
        report.check(Field::Phone, &self.phone, is_valid_phone(&self.phone), PHONE_HINT);
        report.check(
            Field::Message,
            &self.message,
            is_valid_message(&self.message),
            MESSAGE_HINT,
        );
        report.check(
            Field::InquiryType,
            &self.inquiry_type,
            InquiryType::parse(&self.inquiry_type).is_some(),
            SELECTION_HINT,
        );
        report
    }

    fn submission(&self) -> Option<Submission> {
        if !self.report().submittable {
            return None;
        }
        Some(Submission::Contact(ContactSubmission {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: normalize_phone(&self.phone),
            message: self.message.trim().to_string(),
            inquiry_type: InquiryType::parse(&self.inquiry_type)?,
        }))
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn success_message(&self) -> &'static str {
        "Thank you! Your message has been sent successfully."
    }

    fn failure_message(&self) -> &'static str {
        "Failed to send message. Please try again later."
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdmissionForm {
    pub student_name: String,
    pub parent_name: String,
    pub email: String,
    /// Display-formatted phone number.
    pub phone: String,
    pub class: String,
    pub previous_school: String,
    pub address: String,
}

impl InquiryForm for AdmissionForm {
    fn set_field(&mut self, field: Field, value: &str) {
        match field {
            Field::StudentName => self.student_name = value.to_string(),
            Field::ParentName => self.parent_name = value.to_string(),
            Field::Email => self.email = value.to_string(),
            Field::Phone => self.phone = format_phone(value),
            Field::Class => self.class = value.to_string(),
            Field::PreviousSchool => self.previous_school = value.to_string(),
            Field::Address => self.address = value.to_string(),
            _ => {}
        }
    }

    fn report(&self) -> FormReport {
        let mut report = FormReport {
            submittable: true,
            ..FormReport::default()
        };
        report.check(
            Field::StudentName,
            &self.student_name,
            is_valid_name(&self.student_name),
            NAME_HINT,
        );
        report.check(
            Field::ParentName,
            &self.parent_name,
            is_valid_name(&self.parent_name),
            NAME_HINT,
        );
        report.check(Field::Email, &self.email, is_valid_email(&self.email), EMAIL_HINT);
        report.check(Field::Phone, &self.phone, is_valid_phone(&self.phone), PHONE_HINT);
        report.check(
            Field::Class,
            &self.class,
            Grade::parse(&self.class).is_some(),
            SELECTION_HINT,
        );
        report
    }

    fn submission(&self) -> Option<Submission> {
        if !self.report().submittable {
            return None;
        }
        Some(Submission::Admission(AdmissionSubmission {
            student_name: self.student_name.trim().to_string(),
            parent_name: self.parent_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: normalize_phone(&self.phone),
            grade: Grade::parse(&self.class)?,
            previous_school: optional(&self.previous_school),
            address: optional(&self.address),
        }))
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn success_message(&self) -> &'static str {
        "Admission inquiry submitted successfully."
    }

    fn failure_message(&self) -> &'static str {
        "Submission failed. Please try again later."
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
