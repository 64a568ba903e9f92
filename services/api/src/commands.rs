use std::sync::Arc;

use chrono::Utc;
use school_inquiry::catalog::{CatalogService, FallbackData};
use school_inquiry::config::AppConfig;
use school_inquiry::error::AppError;
use school_inquiry::forms::{
    AdmissionForm, ContactForm, Field, FormSession, InquiryForm, SubmissionStatus,
};
use school_inquiry::notify::{templates, Notifier, SmtpNotifier};
use school_inquiry::store::DocumentStore;
use school_inquiry::telemetry;
use school_inquiry::transport::{build_transport, TransportError};
use serde_json::Value;
use tracing::info;

use crate::cli::{AdmissionArgs, ContactArgs, HealthArgs, SeedArgs, SubmitCommand};
use crate::routes::SCHOOL_NAME;

fn bootstrap() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) fn run_seed(args: SeedArgs) -> Result<(), AppError> {
    let config = bootstrap()?;
    let path = args.file.unwrap_or(config.store.fallback_path);
    let fallback = FallbackData::load(&path)?;

    let store = Arc::new(DocumentStore::connect(&config.store.url)?);
    let catalog = CatalogService::new(store.clone(), Arc::new(fallback));
    let summary = catalog.seed(Utc::now())?;
    store.close()?;

    println!(
        "Seeded {} fee schedules and {} notices from {}",
        summary.fees,
        summary.notices,
        path.display()
    );
    Ok(())
}

pub(crate) async fn run_submit(command: SubmitCommand) -> Result<(), AppError> {
    let mut config = bootstrap()?;

    match command {
        SubmitCommand::Contact(args) => {
            if let Some(api_url) = args.transport.api_url.clone() {
                config.client.api_url = api_url;
            }
            let transport = build_transport(&config.client)?;
            let mut session = FormSession::new(ContactForm::default());
            fill_contact(&mut session, &args);
            print_hints(&session);
            report(session.submit(transport.as_ref()).await)
        }
        SubmitCommand::Admission(args) => {
            if let Some(api_url) = args.transport.api_url.clone() {
                config.client.api_url = api_url;
            }
            let transport = build_transport(&config.client)?;
            let mut session = FormSession::new(AdmissionForm::default());
            fill_admission(&mut session, &args);
            print_hints(&session);
            report(session.submit(transport.as_ref()).await)
        }
    }
}

fn fill_contact(session: &mut FormSession<ContactForm>, args: &ContactArgs) {
    session.set_field(Field::Name, &args.name);
    session.set_field(Field::Email, &args.email);
    session.set_field(Field::Phone, &args.phone);
    session.set_field(Field::Message, &args.message);
    session.set_field(Field::InquiryType, &args.inquiry_type);
}

fn fill_admission(session: &mut FormSession<AdmissionForm>, args: &AdmissionArgs) {
    session.set_field(Field::StudentName, &args.student_name);
    session.set_field(Field::ParentName, &args.parent_name);
    session.set_field(Field::Email, &args.email);
    session.set_field(Field::Phone, &args.phone);
    session.set_field(Field::Class, &args.class);
    if let Some(previous_school) = &args.previous_school {
        session.set_field(Field::PreviousSchool, previous_school);
    }
    if let Some(address) = &args.address {
        session.set_field(Field::Address, address);
    }
}

fn print_hints<F: InquiryForm>(session: &FormSession<F>) {
    for (field, hint) in session.report().hints {
        eprintln!("  {}: {}", field.key(), hint);
    }
}

fn report(status: &SubmissionStatus) -> Result<(), AppError> {
    match status {
        SubmissionStatus::Success(message) => {
            println!("{message}");
            Ok(())
        }
        SubmissionStatus::Error(message) => Err(AppError::Submission(message.clone())),
        SubmissionStatus::Idle => Err(AppError::Submission(
            "submission did not start".to_string(),
        )),
    }
}

pub(crate) async fn run_health(args: HealthArgs) -> Result<(), AppError> {
    let config = bootstrap()?;
    let base = args.url.unwrap_or(config.client.api_url);
    let url = format!("{}/api/health", base.trim_end_matches('/'));

    let response = reqwest::get(&url).await.map_err(TransportError::from)?;
    let status = response.status();
    let body = response.text().await.map_err(TransportError::from)?;
    if !status.is_success() {
        return Err(TransportError::Rejected {
            status: status.as_u16(),
            message: body,
        }
        .into());
    }

    let payload: Value = serde_json::from_str(&body).unwrap_or(Value::String(body));
    println!("{url}: {status}");
    println!("{payload}");
    Ok(())
}

pub(crate) async fn run_mail_check() -> Result<(), AppError> {
    let config = bootstrap()?;
    let notifier = SmtpNotifier::from_config(&config.mail)?;

    notifier.verify().await?;
    info!(host = %config.mail.host, port = config.mail.port, "smtp relay reachable");

    let delivery = notifier
        .send(templates::test_email(SCHOOL_NAME, Utc::now()))
        .await?;
    println!("Test email sent successfully! Message id: {}", delivery.message_id);
    Ok(())
}
