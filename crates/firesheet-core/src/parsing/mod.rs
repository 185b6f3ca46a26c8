pub mod boq;
pub mod normalize;
pub mod spec;
pub mod values;

use crate::extraction::RawDocument;
use crate::model::{DocumentType, ParsedDocument, ParsedRecords};
use crate::profile::Profile;

/// Turn an extracted document into records of the given type.
///
/// Never fails: lines and patterns that do not match are skipped, so the
/// result may be empty. Callers decide whether an empty result is an error.
pub fn parse_document(doc: &RawDocument, doc_type: DocumentType, profile: &Profile) -> ParsedDocument {
    let records = match doc_type {
        DocumentType::Boq => ParsedRecords::Boq {
            items: boq::extract_line_items(doc, profile),
        },
        DocumentType::Spec => ParsedRecords::Spec {
            records: spec::extract_spec_records(&doc.text, profile),
        },
    };

    ParsedDocument {
        source: doc.name.clone(),
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::builtin::default_profile;

    #[test]
    fn dispatches_on_document_type() {
        let profile = default_profile().unwrap();
        let doc = RawDocument::new(
            "tower-a.pdf",
            vec![],
            "1 Smoke Detector 10\nModel: SD-1".into(),
            vec![],
        );

        let boq = parse_document(&doc, DocumentType::Boq, &profile);
        assert_eq!(boq.doc_type(), DocumentType::Boq);
        assert_eq!(boq.source, "tower-a.pdf");
        assert_eq!(boq.len(), 1);

        let spec = parse_document(&doc, DocumentType::Spec, &profile);
        assert_eq!(spec.doc_type(), DocumentType::Spec);
        assert!(!spec.is_empty());
    }

    #[test]
    fn unmatched_boq_text_gives_empty_document() {
        let profile = default_profile().unwrap();
        let doc = RawDocument::new("x.pdf", vec![], "nothing numbered here".into(), vec![]);
        assert!(parse_document(&doc, DocumentType::Boq, &profile).is_empty());
    }
}
