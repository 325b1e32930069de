//! A4 prescription document rendered with `printpdf`.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::domain::ports::{PrescriptionDeliveryError, PrescriptionRenderer, PrescriptionRequest};

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN: Mm = Mm(20.0);
const TITLE: &str = "Prescription Record";
const TITLE_SIZE: f32 = 20.0;
const BODY_SIZE: f32 = 14.0;
const LINE_GAP: f32 = 9.0;

/// Renders the title followed by one line per prescription field.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfPrescriptionRenderer;

impl PdfPrescriptionRenderer {
    fn lines(request: &PrescriptionRequest) -> [String; 3] {
        [
            format!("Patient Name: {}", request.patient_name),
            format!("Diagnosis: {}", request.diagnosis),
            format!("Medicines: {}", request.medicines),
        ]
    }
}

impl PrescriptionRenderer for PdfPrescriptionRenderer {
    fn render(&self, request: &PrescriptionRequest) -> Result<Vec<u8>, PrescriptionDeliveryError> {
        let (document, page, layer) = PdfDocument::new(TITLE, PAGE_WIDTH, PAGE_HEIGHT, "content");
        let title_font = document
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?;
        let body_font = document
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error)?;
        let layer = document.get_page(page).get_layer(layer);

        // Builtin fonts expose no metrics; centre on an average glyph width.
        let title_width = TITLE.len() as f32 * TITLE_SIZE * 0.5 * 0.3528;
        let mut cursor = PAGE_HEIGHT.0 - MARGIN.0;
        layer.use_text(
            TITLE,
            TITLE_SIZE,
            Mm((PAGE_WIDTH.0 - title_width) / 2.0),
            Mm(cursor),
            &title_font,
        );
        cursor -= LINE_GAP * 2.0;
        for line in Self::lines(request) {
            layer.use_text(line, BODY_SIZE, MARGIN, Mm(cursor), &body_font);
            cursor -= LINE_GAP;
        }

        document.save_to_bytes().map_err(render_error)
    }
}

fn render_error(error: printpdf::Error) -> PrescriptionDeliveryError {
    PrescriptionDeliveryError::render(error.to_string())
}
