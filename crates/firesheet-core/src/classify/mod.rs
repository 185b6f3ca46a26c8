pub mod category;
pub mod doc_type;
pub mod unit;

pub use category::categorize;
pub use doc_type::detect_document_type;
pub use unit::infer_unit;
