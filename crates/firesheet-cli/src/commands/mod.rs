pub mod batch;
pub mod compare;
pub mod convert;
pub mod parse;
pub mod profile;
pub mod totals;

use firesheet_core::error::ConvertError;
use firesheet_core::model::DocumentType;
use firesheet_core::profile::{builtin, load_profile, Profile};
use std::path::Path;

/// `auto` leaves detection to the pipeline.
pub fn doc_type_arg(value: &str) -> Option<DocumentType> {
    match value {
        "auto" => None,
        other => DocumentType::from_str_loose(other),
    }
}

/// The profile at `path`, or the builtin default.
pub fn resolve_profile(path: Option<&Path>) -> Result<Profile, ConvertError> {
    match path {
        Some(path) => {
            let profile = load_profile(path)?;
            log::info!("using profile '{}' from {}", profile.name, path.display());
            Ok(profile)
        }
        None => builtin::default_profile(),
    }
}

/// Error message followed by each source whose text is not already part
/// of it.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_type_arg_values() {
        assert_eq!(doc_type_arg("auto"), None);
        assert_eq!(doc_type_arg("boq"), Some(DocumentType::Boq));
        assert_eq!(doc_type_arg("spec"), Some(DocumentType::Spec));
    }

    #[test]
    fn error_chain_skips_repeated_source() {
        let err = ConvertError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "access denied",
        ));
        assert_eq!(error_chain(&err), "IO error: access denied");
    }
}
