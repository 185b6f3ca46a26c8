use crate::model::DocumentType;

/// Decide whether a document is a bill of quantities or a spec sheet.
///
/// Body content wins over the file name: the raw bytes are decoded lossily
/// and searched for BOQ phrases, then spec phrases. Only when neither is
/// present does the file name decide. Anything unrecognized is a BOQ.
pub fn detect_document_type(bytes: &[u8], filename: &str) -> DocumentType {
    let content = String::from_utf8_lossy(bytes).to_lowercase();

    if content.contains("bill of quantities") || content.contains("boq") {
        log::debug!("{filename}: BOQ phrase found in content");
        return DocumentType::Boq;
    }
    if content.contains("specification") || content.contains("spec sheet") {
        log::debug!("{filename}: specification phrase found in content");
        return DocumentType::Spec;
    }

    let name = filename.to_lowercase();
    if name.contains("boq") || name.contains("bill") {
        log::debug!("{filename}: BOQ detected from file name");
        return DocumentType::Boq;
    }
    if name.contains("spec") {
        log::debug!("{filename}: spec sheet detected from file name");
        return DocumentType::Spec;
    }

    log::debug!("{filename}: no type signal, defaulting to BOQ");
    DocumentType::Boq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_phrase_detects_boq() {
        let body = b"%PDF-1.4 ... BILL OF QUANTITIES for Level 2";
        assert_eq!(detect_document_type(body, "doc.pdf"), DocumentType::Boq);
    }

    #[test]
    fn content_beats_file_name() {
        let body = b"Project: Tower A\nBill of Quantities\n";
        assert_eq!(
            detect_document_type(body, "detector_spec.pdf"),
            DocumentType::Boq
        );
    }

    #[test]
    fn spec_phrase_detects_spec() {
        let body = b"Product Specification\nModel: SD-2400A";
        assert_eq!(detect_document_type(body, "doc.pdf"), DocumentType::Spec);
    }

    #[test]
    fn boq_phrase_checked_before_spec_phrase() {
        let body = b"BOQ with specification notes";
        assert_eq!(detect_document_type(body, "x.pdf"), DocumentType::Boq);
    }

    #[test]
    fn file_name_used_when_content_is_silent() {
        assert_eq!(
            detect_document_type(b"binary", "Tower_BILL_rev2.pdf"),
            DocumentType::Boq
        );
        assert_eq!(
            detect_document_type(b"binary", "SD2400_Spec.PDF"),
            DocumentType::Spec
        );
    }

    #[test]
    fn unrecognized_defaults_to_boq() {
        assert_eq!(detect_document_type(b"", "scan.pdf"), DocumentType::Boq);
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let mut body = vec![0xff, 0xfe, 0x00];
        body.extend_from_slice(b"spec sheet");
        assert_eq!(detect_document_type(&body, "x.pdf"), DocumentType::Spec);
    }
}
