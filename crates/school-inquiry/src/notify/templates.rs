use chrono::{DateTime, Local, Utc};

use super::OutboundEmail;
use crate::inquiries::{AdmissionInquiry, ContactMessage};

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
    .container { max-width: 600px; margin: 0 auto; padding: 20px; }
    .header { background: linear-gradient(135deg, #4f46e5 0%, #6366f1 100%); color: white; padding: 20px; border-radius: 8px 8px 0 0; }
    .content { background: #f9fafb; padding: 20px; border-radius: 0 0 8px 8px; }
    .field { margin-bottom: 15px; }
    .label { font-weight: bold; color: #4f46e5; }
    .value { margin-top: 5px; padding: 10px; background: white; border-radius: 4px; border-left: 3px solid #4f46e5; }
    .highlight { background: #fef3c7; padding: 15px; border-radius: 4px; border-left: 4px solid #f59e0b; margin: 20px 0; }
"#;

pub fn contact_email(message: &ContactMessage) -> OutboundEmail {
    let mut body = String::new();
    field(&mut body, "Inquiry Type", message.inquiry_type.as_str());
    field(&mut body, "Name", &message.name);
    field(&mut body, "Email", &message.email);
    field(&mut body, "Phone", &message.phone);
    field(&mut body, "Message", &message.message);
    field(&mut body, "Submitted At", &display_time(message.created_at));

    OutboundEmail {
        subject: format!(
            "New Contact Form Submission - {}",
            message.inquiry_type.as_str()
        ),
        html: page("New Contact Form Submission", &body),
        recipient: None,
    }
}

pub fn admission_email(inquiry: &AdmissionInquiry) -> OutboundEmail {
    let class = inquiry.grade.as_str();
    let mut body = format!(
        "<div class=\"highlight\"><strong>Student:</strong> {}<br><strong>Applying for:</strong> Class {}</div>\n",
        escape_html(&inquiry.student_name),
        escape_html(class)
    );
    field(&mut body, "Student Name", &inquiry.student_name);
    field(&mut body, "Parent/Guardian Name", &inquiry.parent_name);
    field(&mut body, "Email", &inquiry.email);
    field(&mut body, "Phone", &inquiry.phone);
    field(&mut body, "Class Applying For", class);
    if let Some(previous_school) = &inquiry.previous_school {
        field(&mut body, "Previous School", previous_school);
    }
    if let Some(address) = &inquiry.address {
        field(&mut body, "Address", address);
    }
    field(&mut body, "Submitted At", &display_time(inquiry.created_at));

    OutboundEmail {
        subject: format!(
            "New Admission Inquiry - {} for Class {}",
            inquiry.student_name, class
        ),
        html: page("New Admission Inquiry", &body),
        recipient: None,
    }
}

/// Message used to confirm the relay configuration end to end.
pub fn test_email(school_name: &str, at: DateTime<Utc>) -> OutboundEmail {
    let body = format!(
        "<p>This is a test email from the {} website.</p>\n\
         <p>If you received this email, your email configuration is working correctly!</p>\n\
         <p><strong>Timestamp:</strong> {}</p>\n",
        escape_html(school_name),
        escape_html(&display_time(at))
    );

    OutboundEmail {
        subject: format!("Test Email - {school_name}"),
        html: page("Test Email", &body),
        recipient: None,
    }
}

fn display_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%B %d, %Y %I:%M %p")
        .to_string()
}

fn field(html: &mut String, label: &str, value: &str) {
    html.push_str(&format!(
        "<div class=\"field\"><div class=\"label\">{}:</div><div class=\"value\">{}</div></div>\n",
        escape_html(label),
        escape_html(value)
    ));
}

fn page(heading: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <div class=\"container\">\n<div class=\"header\"><h2>{}</h2></div>\n\
         <div class=\"content\">\n{body}</div>\n</div>\n</body>\n</html>\n",
        escape_html(heading)
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
