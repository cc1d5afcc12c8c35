use std::path::Path;
use anyhow::Result;
use serde::Serialize;

use crate::config::{load_config, BlockedFormatRule};
use crate::constants::{get_mime_type, HTTP_BAD_REQUEST};
use crate::guard::validate_legacy_office_formats;

/// Outcome of a gate check, serialized back to the upload endpoint.
///
/// A rejection is a result, not a transport error: the caller inspects
/// `accepted` and maps a rejection to an HTTP response with `status_code`
/// and `message` in the body.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub accepted: bool,
    /// Normalized (lowercase) extension that was examined, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Verdict {
    fn accepted(extension: Option<String>) -> Self {
        let mime_type = extension.as_deref().map(|ext| get_mime_type(ext).to_string());
        Verdict {
            accepted: true,
            extension,
            mime_type,
            status_code: None,
            message: None,
        }
    }

    fn rejected(extension: String, status_code: u16, message: String) -> Self {
        Verdict {
            accepted: false,
            extension: Some(extension),
            mime_type: None,
            status_code: Some(status_code),
            message: Some(message),
        }
    }
}

/// Extract the extension from an uploaded filename
///
/// # Arguments
/// * `filename` - Filename as supplied by the upload endpoint (e.g. "report.DOC")
///
/// # Returns
/// The normalized (lowercase) extension without the leading dot, or None if
/// the filename has no extension
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Gate combining the built-in legacy-format guard with deployment-supplied
/// blocked-format rules from the config file.
pub struct Gate {
    extra_rules: Vec<BlockedFormatRule>,
}

impl Gate {
    pub fn new(extra_rules: Vec<BlockedFormatRule>) -> Self {
        Gate { extra_rules }
    }

    /// Build a gate from the persisted configuration.
    pub fn from_config() -> Result<Self> {
        let config = load_config()?;
        Ok(Gate::new(config.extra_blocked))
    }

    /// Check a bare extension against the built-in guard and any extra rules.
    ///
    /// The built-in table is consulted first, so its fixed messages cannot be
    /// overridden by configuration. An empty extension is accepted.
    pub fn check_extension(&self, extension: &str) -> Verdict {
        let normalized = extension.to_lowercase();

        if let Err(rejection) = validate_legacy_office_formats(&normalized) {
            return Verdict::rejected(normalized, rejection.status_code, rejection.message);
        }

        for rule in &self.extra_rules {
            if rule.extension.eq_ignore_ascii_case(&normalized) {
                let status_code = rule.status_code.unwrap_or(HTTP_BAD_REQUEST);
                return Verdict::rejected(normalized, status_code, rule.message.clone());
            }
        }

        if normalized.is_empty() {
            Verdict::accepted(None)
        } else {
            Verdict::accepted(Some(normalized))
        }
    }

    /// Check an uploaded filename.
    ///
    /// A filename without an extension is accepted; the gate only blocks what
    /// it recognizes.
    pub fn check_filename(&self, filename: &str) -> Verdict {
        match extension_of(filename) {
            Some(extension) => self.check_extension(&extension),
            None => Verdict::accepted(None),
        }
    }
}
