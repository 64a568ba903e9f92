use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{Receipt, Submission, SubmissionTransport, TransportError};
use crate::config::RelayConfig;

const NOT_PROVIDED: &str = "N/A";

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: BTreeMap<&'static str, String>,
}

/// Sends submissions straight to a hosted email relay, bypassing the API.
/// Nothing is persisted on this path.
#[derive(Debug, Clone)]
pub struct RelayTransport {
    http: reqwest::Client,
    url: String,
    service_id: String,
    public_key: String,
    contact_template: Option<String>,
    admission_template: Option<String>,
}

impl RelayTransport {
    pub fn from_config(config: &RelayConfig) -> Result<Self, TransportError> {
        let service_id = config
            .service_id
            .clone()
            .ok_or(TransportError::NotConfigured("APP_RELAY_SERVICE_ID"))?;
        let public_key = config
            .public_key
            .clone()
            .ok_or(TransportError::NotConfigured("APP_RELAY_PUBLIC_KEY"))?;
        Ok(Self {
            http: reqwest::Client::new(),
            url: config.url.clone(),
            service_id,
            public_key,
            contact_template: config.contact_template.clone(),
            admission_template: config.admission_template.clone(),
        })
    }

    fn template(&self, submission: &Submission) -> Result<&str, TransportError> {
        let (template, setting) = match submission {
            Submission::Contact(_) => (&self.contact_template, "APP_RELAY_CONTACT_TEMPLATE"),
            Submission::Admission(_) => {
                (&self.admission_template, "APP_RELAY_ADMISSION_TEMPLATE")
            }
        };
        template
            .as_deref()
            .ok_or(TransportError::NotConfigured(setting))
    }
}

fn template_params(submission: &Submission) -> BTreeMap<&'static str, String> {
    let mut params = BTreeMap::new();
    match submission {
        Submission::Contact(contact) => {
            params.insert("from_name", contact.name.clone());
            params.insert("from_email", contact.email.clone());
            params.insert("phone", contact.phone.clone());
            params.insert("message", contact.message.clone());
            params.insert("inquiry_type", contact.inquiry_type.label().to_string());
        }
        Submission::Admission(admission) => {
            params.insert("student_name", admission.student_name.clone());
            params.insert("parent_name", admission.parent_name.clone());
            params.insert("from_email", admission.email.clone());
            params.insert("phone", admission.phone.clone());
            params.insert("class", admission.grade.as_str().to_string());
            params.insert(
                "previous_school",
                admission
                    .previous_school
                    .clone()
                    .unwrap_or_else(|| NOT_PROVIDED.to_string()),
            );
            params.insert(
                "address",
                admission
                    .address
                    .clone()
                    .unwrap_or_else(|| NOT_PROVIDED.to_string()),
            );
        }
    }
    params
}

#[async_trait]
impl SubmissionTransport for RelayTransport {
    async fn submit(&self, submission: &Submission) -> Result<Receipt, TransportError> {
        let request = RelayRequest {
            service_id: &self.service_id,
            template_id: self.template(submission)?,
            user_id: &self.public_key,
            template_params: template_params(submission),
        };
        debug!(
            kind = submission.kind(),
            template = request.template_id,
            "relaying submission"
        );

        let response = self.http.post(&self.url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(Receipt { message: body })
    }
}
