/// File extension constants
pub const DOC_EXTENSION: &str = "doc";
pub const DOCX_EXTENSION: &str = "docx";
pub const PPT_EXTENSION: &str = "ppt";
pub const PPTX_EXTENSION: &str = "pptx";
pub const PDF_EXTENSION: &str = "pdf";
pub const TXT_EXTENSION: &str = "txt";

/// HTTP status code carried by every rejection produced by the gate.
pub const HTTP_BAD_REQUEST: u16 = 400;

/// Get MIME type for a given file extension
///
/// # Arguments
/// * `extension` - File extension (case-insensitive)
///
/// # Returns
/// MIME type string, or "application/octet-stream" if extension is not recognized
pub fn get_mime_type(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        PDF_EXTENSION => "application/pdf",
        DOCX_EXTENSION => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        DOC_EXTENSION => "application/msword",
        PPTX_EXTENSION => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        PPT_EXTENSION => "application/vnd.ms-powerpoint",
        TXT_EXTENSION => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Get the modern XML-based successor for a legacy Office extension
///
/// # Arguments
/// * `extension` - File extension (case-insensitive)
///
/// # Returns
/// The successor extension ("docx" for "doc", "pptx" for "ppt"), or None if
/// the extension has no known successor
pub fn modern_successor(extension: &str) -> Option<&'static str> {
    match extension.to_lowercase().as_str() {
        DOC_EXTENSION => Some(DOCX_EXTENSION),
        PPT_EXTENSION => Some(PPTX_EXTENSION),
        _ => None,
    }
}
