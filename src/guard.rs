use serde::Serialize;
use thiserror::Error;

use crate::constants::{HTTP_BAD_REQUEST, DOC_EXTENSION, PPT_EXTENSION};

/// Rejection signal for a blocked legacy Office format.
///
/// Carries the HTTP-style status code and the user-facing message. The
/// calling upload endpoint is expected to translate this into an HTTP 400
/// response whose body includes `message` verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct LegacyFormatRejection {
    pub status_code: u16,
    pub message: String,
}

/// Instructions shown when a user uploads a legacy Word file.
pub const DOC_REJECTION_MESSAGE: &str = "Les fichiers .doc (ancien format Word) ne sont pas pris en charge. Veuillez convertir votre fichier en .docx (format Word moderne) : Ouvrez le fichier dans Word > Fichier > Enregistrer sous > Format .docx";

/// Instructions shown when a user uploads a legacy PowerPoint file.
pub const PPT_REJECTION_MESSAGE: &str = "Les fichiers .ppt (ancien format PowerPoint) ne sont pas pris en charge. Veuillez convertir votre fichier en .pptx (format PowerPoint moderne) : Ouvrez le fichier dans PowerPoint > Fichier > Enregistrer sous > Format .pptx";

/// Blocked legacy formats, keyed by normalized (lowercase) extension.
///
/// Adding an entry here blocks the extension everywhere without touching
/// control flow; deployment-specific additions go through the config file
/// instead (see `config::BlockedFormatRule`).
pub const BLOCKED_FORMATS: &[(&str, &str)] = &[
    (DOC_EXTENSION, DOC_REJECTION_MESSAGE),
    (PPT_EXTENSION, PPT_REJECTION_MESSAGE),
];

/// Reject uploads carrying legacy Office binary formats (.doc, .ppt).
///
/// # Arguments
/// * `file_extension` - The file extension, without the leading dot,
///   case-insensitive (e.g. "doc", "DOC", "pdf")
///
/// # Returns
/// * `Ok(())` - The extension is not blocked by this check. No judgment is
///   made about its validity otherwise.
/// * `Err(LegacyFormatRejection)` - The extension is a legacy Office format;
///   the rejection carries status 400 and instructions for converting the
///   file to the modern format.
pub fn validate_legacy_office_formats(file_extension: &str) -> Result<(), LegacyFormatRejection> {
    let normalized = file_extension.to_lowercase();

    for (blocked, message) in BLOCKED_FORMATS {
        if normalized == *blocked {
            return Err(LegacyFormatRejection {
                status_code: HTTP_BAD_REQUEST,
                message: (*message).to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_is_rejected_with_word_message() {
        let result = validate_legacy_office_formats("doc");
        assert!(result.is_err(), "doc uploads should be rejected");

        let rejection = result.unwrap_err();
        assert_eq!(rejection.status_code, 400, "rejection should carry a bad request status");
        assert_eq!(rejection.message, DOC_REJECTION_MESSAGE, "rejection should carry the exact Word message");
        assert!(rejection.message.contains(".docx"), "message should point at the modern format");
        assert!(rejection.message.contains("Word"), "message should name the application");
    }

    #[test]
    fn test_ppt_is_rejected_with_powerpoint_message() {
        let result = validate_legacy_office_formats("ppt");
        assert!(result.is_err(), "ppt uploads should be rejected");

        let rejection = result.unwrap_err();
        assert_eq!(rejection.status_code, 400, "rejection should carry a bad request status");
        assert_eq!(rejection.message, PPT_REJECTION_MESSAGE, "rejection should carry the exact PowerPoint message");
        assert!(rejection.message.contains(".pptx"), "message should point at the modern format");
        assert!(rejection.message.contains("PowerPoint"), "message should name the application");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        for extension in ["DOC", "Doc", "dOc", "doC"] {
            let result = validate_legacy_office_formats(extension);
            assert!(result.is_err(), "{} should be rejected like doc", extension);
            assert_eq!(result.unwrap_err().message, DOC_REJECTION_MESSAGE);
        }

        for extension in ["PPT", "Ppt", "pPt"] {
            let result = validate_legacy_office_formats(extension);
            assert!(result.is_err(), "{} should be rejected like ppt", extension);
            assert_eq!(result.unwrap_err().message, PPT_REJECTION_MESSAGE);
        }
    }

    #[test]
    fn test_other_extensions_pass_through() {
        for extension in ["docx", "DOCX", "pptx", "pdf", "txt", "xls", ""] {
            let result = validate_legacy_office_formats(extension);
            assert!(
                result.is_ok(),
                "{:?} is not a legacy Office format and should pass",
                extension
            );
        }
    }

    #[test]
    fn test_validation_is_idempotent() {
        let first = validate_legacy_office_formats("doc");
        let second = validate_legacy_office_formats("doc");
        assert_eq!(first, second, "identical input should produce identical outcome");

        let first = validate_legacy_office_formats("pdf");
        let second = validate_legacy_office_formats("pdf");
        assert_eq!(first.is_ok(), second.is_ok());
    }
}
