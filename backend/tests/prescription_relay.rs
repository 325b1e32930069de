//! Relay endpoint driven end to end with the real PDF renderer and spool and
//! a recording mailer in place of SMTP.

use std::sync::{Arc, Mutex};

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use ehr_backend::Trace;
use ehr_backend::domain::PrescriptionDispatcher;
use ehr_backend::domain::ports::{
    PrescriptionDeliveryError, PrescriptionEmail, PrescriptionMailer,
};
use ehr_backend::inbound::http::prescriptions::{json_config, send_prescription};
use ehr_backend::inbound::http::state::HttpState;
use ehr_backend::outbound::prescription::{DirPrescriptionSpool, PdfPrescriptionRenderer};
use rstest::rstest;
use serde_json::{Value, json};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<Mutex<Vec<PrescriptionEmail>>>,
    fail: bool,
}

#[async_trait]
impl PrescriptionMailer for RecordingMailer {
    async fn send(&self, email: PrescriptionEmail) -> Result<(), PrescriptionDeliveryError> {
        if self.fail {
            return Err(PrescriptionDeliveryError::mail("relay refused connection"));
        }
        self.sent.lock().expect("mailer lock").push(email);
        Ok(())
    }
}

fn spool_is_empty(dir: &TempDir) -> bool {
    std::fs::read_dir(dir.path())
        .expect("spool dir readable")
        .next()
        .is_none()
}

async fn post_prescription(
    mailer: RecordingMailer,
    spool_dir: &TempDir,
    body: Value,
) -> (StatusCode, Option<String>, Value) {
    let spool = DirPrescriptionSpool::open(spool_dir.path()).expect("open spool");
    let dispatcher = PrescriptionDispatcher::new(
        Arc::new(PdfPrescriptionRenderer),
        Arc::new(spool),
        Arc::new(mailer),
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(HttpState::new(dispatcher)))
            .app_data(json_config())
            .wrap(Trace)
            .service(send_prescription),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/send-prescription")
        .set_json(body)
        .to_request();
    let res = test::call_service(&app, req).await;
    let status = res.status();
    let trace_id = res
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    (status, trace_id, test::read_body_json(res).await)
}

#[actix_web::test]
async fn complete_prescription_is_mailed_as_pdf() {
    let spool_dir = TempDir::new().expect("temp dir");
    let mailer = RecordingMailer::default();

    let (status, trace_id, body) = post_prescription(
        mailer.clone(),
        &spool_dir,
        json!({"patientName":"Jane","diagnosis":"Flu","medicines":"Paracetamol","email":"a@b.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(trace_id.is_some());
    assert_eq!(body, json!({"message": "Email sent successfully!"}));

    let sent = mailer.sent.lock().expect("mailer lock");
    assert_eq!(sent.len(), 1);
    let email = &sent[0];
    assert_eq!(email.to, "a@b.com");
    assert_eq!(email.subject, "Your Prescription");
    assert_eq!(email.body, "Please find your prescription attached.");
    assert_eq!(email.attachment_name, "prescription.pdf");
    assert!(email.attachment.starts_with(b"%PDF"));
    assert!(spool_is_empty(&spool_dir));
}

#[rstest]
#[case(json!({"patientName":"Jane","diagnosis":"Flu","medicines":"Paracetamol"}))]
#[case(json!({"patientName":"Jane","diagnosis":"  ","medicines":"Paracetamol","email":"a@b.com"}))]
#[case(json!([1, 2, 3]))]
#[actix_web::test]
async fn incomplete_prescription_is_not_rendered(#[case] payload: Value) {
    let spool_dir = TempDir::new().expect("temp dir");
    let mailer = RecordingMailer::default();

    let (status, _, body) = post_prescription(mailer.clone(), &spool_dir, payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "All fields are required"}));
    assert!(mailer.sent.lock().expect("mailer lock").is_empty());
    assert!(spool_is_empty(&spool_dir));
}

#[actix_web::test]
async fn failed_delivery_still_cleans_the_spool() {
    let spool_dir = TempDir::new().expect("temp dir");
    let mailer = RecordingMailer {
        fail: true,
        ..RecordingMailer::default()
    };

    let (status, _, body) = post_prescription(
        mailer,
        &spool_dir,
        json!({"patientName":"Jane","diagnosis":"Flu","medicines":"Paracetamol","email":"a@b.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "Failed to send email"}));
    assert!(spool_is_empty(&spool_dir));
}
