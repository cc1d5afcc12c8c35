use std::path::Path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use crate::config::{load_config, save_config};
use crate::constants::{modern_successor, HTTP_BAD_REQUEST};
use crate::gate::{extension_of, Gate, Verdict};
use crate::guard::BLOCKED_FORMATS;

/// Parameters for validate_upload
#[derive(Debug, Deserialize)]
pub struct ValidateUploadParams {
    /// Filename as received by the upload endpoint
    pub filename: String,
}

/// Parameters for check_extension
#[derive(Debug, Deserialize)]
pub struct CheckExtensionParams {
    /// File extension without the leading dot
    pub extension: String,
}

/// Parameters for set_staging_directory
#[derive(Debug, Deserialize)]
pub struct SetStagingDirectoryParams {
    pub directory: String,
}

/// Parameters for scan_staging
#[derive(Debug, Deserialize)]
pub struct ScanStagingParams {
    /// Optional directory path. If not provided, uses the active staging directory.
    pub directory: Option<String>,
}

/// Result for set_staging_directory
#[derive(Debug, Serialize)]
pub struct SetStagingDirectoryResult {
    pub message: String,
    pub active_directory: String,
}

/// Result for list_staging_directories
#[derive(Debug, Serialize)]
pub struct ListStagingDirectoriesResult {
    pub staging_directories: Vec<String>,
    pub active_directory: Option<String>,
}

/// One entry of the effective blocked-format table
#[derive(Debug, Serialize)]
pub struct BlockedFormatEntry {
    pub extension: String,
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modern_successor: Option<String>,
}

/// Result for list_blocked_formats
#[derive(Debug, Serialize)]
pub struct ListBlockedFormatsResult {
    pub formats: Vec<BlockedFormatEntry>,
}

/// One scanned file with its verdict
#[derive(Debug, Serialize)]
pub struct ScannedFile {
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    pub verdict: Verdict,
}

/// Result for scan_staging
#[derive(Debug, Serialize)]
pub struct ScanStagingResult {
    pub directory: String,
    pub files: Vec<ScannedFile>,
}

/// Operation 1: Validate an uploaded filename
/// Extracts the extension and checks it against the built-in legacy-format
/// guard plus any configured extra rules. The rejection, if any, travels in
/// the verdict; the caller maps it to its HTTP response.
pub fn validate_upload(params: ValidateUploadParams) -> Result<Verdict> {
    let gate = Gate::from_config()?;
    Ok(gate.check_filename(&params.filename))
}

/// Operation 2: Check a bare extension
/// For callers that already hold the extension (with the leading dot stripped).
pub fn check_extension(params: CheckExtensionParams) -> Result<Verdict> {
    let gate = Gate::from_config()?;
    Ok(gate.check_extension(&params.extension))
}

/// Build the built-in portion of the blocked-format table.
fn builtin_format_entries() -> Vec<BlockedFormatEntry> {
    BLOCKED_FORMATS
        .iter()
        .map(|(extension, message)| BlockedFormatEntry {
            extension: (*extension).to_string(),
            status_code: HTTP_BAD_REQUEST,
            message: (*message).to_string(),
            modern_successor: modern_successor(extension).map(|ext| ext.to_string()),
        })
        .collect()
}

/// Operation 3: List the effective blocked-format table
/// Built-in legacy Office formats first, then configured extras. An extra
/// rule shadowed by a built-in entry is omitted, matching check order.
pub fn list_blocked_formats() -> Result<ListBlockedFormatsResult> {
    let config = load_config()?;

    let mut formats = builtin_format_entries();

    for rule in &config.extra_blocked {
        let normalized = rule.extension.to_lowercase();
        if BLOCKED_FORMATS.iter().any(|(builtin, _)| *builtin == normalized) {
            continue;
        }
        formats.push(BlockedFormatEntry {
            extension: normalized.clone(),
            status_code: rule.status_code.unwrap_or(HTTP_BAD_REQUEST),
            message: rule.message.clone(),
            modern_successor: modern_successor(&normalized).map(|ext| ext.to_string()),
        });
    }

    Ok(ListBlockedFormatsResult { formats })
}

/// Operation 4: Set the active staging directory
/// Validates directory exists and is readable, adds to staging_directories
/// if not present, sets as active_directory, and saves config.
pub fn set_staging_directory(params: SetStagingDirectoryParams) -> Result<SetStagingDirectoryResult> {
    let directory_path = Path::new(&params.directory);

    // Validate directory exists
    if !directory_path.exists() {
        return Err(anyhow::anyhow!("Directory does not exist: {}", params.directory));
    }

    // Validate it's a directory
    if !directory_path.is_dir() {
        return Err(anyhow::anyhow!("Path is not a directory: {}", params.directory));
    }

    // Validate it's readable
    std::fs::read_dir(directory_path)
        .with_context(|| format!("Directory is not readable: {}", params.directory))?;

    // Load current config
    let mut config = load_config()?;

    // Add to staging directories if not present
    let normalized_path = directory_path
        .canonicalize()
        .with_context(|| format!("Failed to canonicalize path: {}", params.directory))?
        .to_string_lossy()
        .to_string();

    if !config.staging_directories.contains(&normalized_path) {
        config.staging_directories.push(normalized_path.clone());
    }

    // Set as active directory
    config.active_directory = Some(normalized_path.clone());

    // Save config
    save_config(&config)?;

    Ok(SetStagingDirectoryResult {
        message: format!("Staging directory set as active: {}", normalized_path),
        active_directory: normalized_path,
    })
}

/// Operation 5: List staging directories
/// Returns all registered staging directories and the active one.
pub fn list_staging_directories() -> Result<ListStagingDirectoriesResult> {
    let config = load_config()?;

    Ok(ListStagingDirectoriesResult {
        staging_directories: config.staging_directories.clone(),
        active_directory: config.active_directory.clone(),
    })
}

/// Operation 6: Scan a staging directory
/// Walks the directory and reports a verdict per file, flagging the ones an
/// upload would reject. If no directory is provided, uses the active staging
/// directory. Subdirectories are skipped.
pub fn scan_staging(params: ScanStagingParams) -> Result<ScanStagingResult> {
    let directory_path = if let Some(dir) = params.directory {
        Path::new(&dir).to_path_buf()
    } else {
        // Use active staging directory if not specified
        let config = load_config()?;
        let active_dir = config.active_directory
            .ok_or_else(|| anyhow::anyhow!("No active staging directory set. Use gate/set_staging_directory first, or provide a directory parameter."))?;
        Path::new(&active_dir).to_path_buf()
    };

    // Validate directory exists
    if !directory_path.exists() {
        return Err(anyhow::anyhow!("Directory does not exist: {}", directory_path.display()));
    }

    // Validate it's a directory
    if !directory_path.is_dir() {
        return Err(anyhow::anyhow!("Path is not a directory: {}", directory_path.display()));
    }

    let gate = Gate::from_config()?;

    // Read directory entries
    let entries = std::fs::read_dir(&directory_path)
        .with_context(|| format!("Failed to read directory: {}", directory_path.display()))?;

    let mut files = Vec::new();

    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();

        // Skip if not a file
        if !path.is_file() {
            continue;
        }

        let name = path.file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid filename: {}", path.display()))?
            .to_string();

        let verdict = gate.check_filename(&name);

        files.push(ScannedFile {
            name: name.clone(),
            path: path.to_string_lossy().to_string(),
            extension: extension_of(&name),
            verdict,
        });
    }

    // Sort files by name for consistent output
    files.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(ScanStagingResult {
        directory: directory_path.to_string_lossy().to_string(),
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::{DOC_REJECTION_MESSAGE, PPT_REJECTION_MESSAGE};

    #[test]
    fn test_builtin_format_entries() {
        let entries = builtin_format_entries();
        assert_eq!(entries.len(), 2, "exactly doc and ppt are blocked out of the box");

        let doc = entries.iter().find(|e| e.extension == "doc").expect("doc entry");
        assert_eq!(doc.status_code, 400);
        assert_eq!(doc.message, DOC_REJECTION_MESSAGE);
        assert_eq!(doc.modern_successor.as_deref(), Some("docx"));

        let ppt = entries.iter().find(|e| e.extension == "ppt").expect("ppt entry");
        assert_eq!(ppt.status_code, 400);
        assert_eq!(ppt.message, PPT_REJECTION_MESSAGE);
        assert_eq!(ppt.modern_successor.as_deref(), Some("pptx"));
    }
}
