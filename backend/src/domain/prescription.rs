//! Relay-side prescription dispatch: render, stage, mail, clean up.
//!
//! Every rendered document is staged under a unique spool name, so
//! concurrent requests never overwrite each other's attachment.

use std::sync::Arc;

use tracing::{info, warn};

use super::Error;
use super::ports::{
    PrescriptionDeliveryError, PrescriptionEmail, PrescriptionMailer, PrescriptionRenderer,
    PrescriptionRequest, PrescriptionSpool, SpooledPrescription,
};

pub const PRESCRIPTION_SUBJECT: &str = "Your Prescription";
pub const PRESCRIPTION_BODY: &str = "Please find your prescription attached.";
pub const PRESCRIPTION_ATTACHMENT: &str = "prescription.pdf";

const SENT_MESSAGE: &str = "Email sent successfully!";
const INCOMPLETE_MESSAGE: &str = "All fields are required";
const FAILED_MESSAGE: &str = "Failed to send email";

/// Delivers prescriptions submitted to the relay.
#[derive(Clone)]
pub struct PrescriptionDispatcher {
    renderer: Arc<dyn PrescriptionRenderer>,
    spool: Arc<dyn PrescriptionSpool>,
    mailer: Arc<dyn PrescriptionMailer>,
}

impl PrescriptionDispatcher {
    pub fn new(
        renderer: Arc<dyn PrescriptionRenderer>,
        spool: Arc<dyn PrescriptionSpool>,
        mailer: Arc<dyn PrescriptionMailer>,
    ) -> Self {
        Self {
            renderer,
            spool,
            mailer,
        }
    }

    /// Render `request`, mail it to the patient, and return the confirmation
    /// message.
    ///
    /// Incomplete requests fail with [`ErrorCode::InvalidRequest`]; any
    /// render, spool, or mail failure becomes [`ErrorCode::DeliveryFailed`].
    ///
    /// [`ErrorCode::InvalidRequest`]: super::ErrorCode::InvalidRequest
    /// [`ErrorCode::DeliveryFailed`]: super::ErrorCode::DeliveryFailed
    pub async fn dispatch(&self, request: &PrescriptionRequest) -> Result<String, Error> {
        if !request.is_complete() {
            return Err(Error::invalid_request(INCOMPLETE_MESSAGE));
        }
        let document = self.renderer.render(request).map_err(delivery_failed)?;
        let staged = self.spool.store(&document).await.map_err(delivery_failed)?;

        let sent = self.mail_staged(request, &staged).await;
        if let Err(err) = self.spool.remove(&staged).await {
            warn!(file = %staged.file_name, error = %err, "failed to remove spooled prescription");
        }
        sent.map_err(delivery_failed)?;

        info!(file = %staged.file_name, "prescription mailed");
        Ok(SENT_MESSAGE.to_owned())
    }

    async fn mail_staged(
        &self,
        request: &PrescriptionRequest,
        staged: &SpooledPrescription,
    ) -> Result<(), PrescriptionDeliveryError> {
        let attachment = self.spool.load(staged).await?;
        self.mailer
            .send(PrescriptionEmail {
                to: request.email.trim().to_owned(),
                subject: PRESCRIPTION_SUBJECT.to_owned(),
                body: PRESCRIPTION_BODY.to_owned(),
                attachment_name: PRESCRIPTION_ATTACHMENT.to_owned(),
                attachment,
            })
            .await
    }
}

fn delivery_failed(err: PrescriptionDeliveryError) -> Error {
    warn!(failure = err.kind(), error = %err, "prescription delivery failed");
    Error::delivery_failed(FAILED_MESSAGE)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        MockPrescriptionMailer, MockPrescriptionRenderer, MockPrescriptionSpool,
    };
    use rstest::{fixture, rstest};

    const PDF: &[u8] = b"%PDF-1.7 fixture";

    #[fixture]
    fn request() -> PrescriptionRequest {
        PrescriptionRequest {
            patient_name: "Jane".to_owned(),
            diagnosis: "Flu".to_owned(),
            medicines: "Paracetamol".to_owned(),
            email: "a@b.com".to_owned(),
        }
    }

    fn staged() -> SpooledPrescription {
        SpooledPrescription {
            file_name: "prescription-fixture.pdf".to_owned(),
        }
    }

    fn rendering() -> MockPrescriptionRenderer {
        let mut renderer = MockPrescriptionRenderer::new();
        renderer.expect_render().returning(|_| Ok(PDF.to_vec()));
        renderer
    }

    fn spooling(removals: usize) -> MockPrescriptionSpool {
        let mut spool = MockPrescriptionSpool::new();
        spool.expect_store().returning(|_| Ok(staged()));
        spool.expect_load().returning(|_| Ok(PDF.to_vec()));
        spool
            .expect_remove()
            .withf(|file| *file == staged())
            .times(removals)
            .returning(|_| Ok(()));
        spool
    }

    fn dispatcher(
        renderer: MockPrescriptionRenderer,
        spool: MockPrescriptionSpool,
        mailer: MockPrescriptionMailer,
    ) -> PrescriptionDispatcher {
        PrescriptionDispatcher::new(Arc::new(renderer), Arc::new(spool), Arc::new(mailer))
    }

    #[rstest]
    #[tokio::test]
    async fn mails_rendered_pdf_to_patient(request: PrescriptionRequest) {
        let mut mailer = MockPrescriptionMailer::new();
        mailer
            .expect_send()
            .withf(|email| {
                email.to == "a@b.com"
                    && email.subject == "Your Prescription"
                    && email.body == "Please find your prescription attached."
                    && email.attachment_name == "prescription.pdf"
                    && email.attachment == PDF
            })
            .times(1)
            .returning(|_| Ok(()));

        let message = dispatcher(rendering(), spooling(1), mailer)
            .dispatch(&request)
            .await
            .expect("sent");
        assert_eq!(message, "Email sent successfully!");
    }

    #[rstest]
    #[case("patient_name")]
    #[case("diagnosis")]
    #[case("medicines")]
    #[case("email")]
    #[tokio::test]
    async fn incomplete_request_renders_nothing(
        mut request: PrescriptionRequest,
        #[case] field: &str,
    ) {
        match field {
            "patient_name" => request.patient_name.clear(),
            "diagnosis" => request.diagnosis.clear(),
            "medicines" => request.medicines.clear(),
            _ => request.email.clear(),
        }
        let mut renderer = MockPrescriptionRenderer::new();
        renderer.expect_render().never();

        let err = dispatcher(
            renderer,
            MockPrescriptionSpool::new(),
            MockPrescriptionMailer::new(),
        )
        .dispatch(&request)
        .await
        .expect_err("incomplete");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "All fields are required");
    }

    #[rstest]
    #[tokio::test]
    async fn mail_failure_still_removes_spooled_file(request: PrescriptionRequest) {
        let mut mailer = MockPrescriptionMailer::new();
        mailer
            .expect_send()
            .returning(|_| Err(PrescriptionDeliveryError::mail("535 authentication failed")));

        let err = dispatcher(rendering(), spooling(1), mailer)
            .dispatch(&request)
            .await
            .expect_err("mail down");
        assert_eq!(err.code(), ErrorCode::DeliveryFailed);
        assert_eq!(err.message(), "Failed to send email");
    }

    #[rstest]
    #[tokio::test]
    async fn render_failure_stages_nothing(request: PrescriptionRequest) {
        let mut renderer = MockPrescriptionRenderer::new();
        renderer
            .expect_render()
            .returning(|_| Err(PrescriptionDeliveryError::render("font missing")));
        let mut spool = MockPrescriptionSpool::new();
        spool.expect_store().never();

        let err = dispatcher(renderer, spool, MockPrescriptionMailer::new())
            .dispatch(&request)
            .await
            .expect_err("render failed");
        assert_eq!(err.code(), ErrorCode::DeliveryFailed);
    }
}
