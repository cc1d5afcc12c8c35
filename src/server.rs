use std::io::{self, BufRead, Write};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::tools::{
    validate_upload, check_extension, list_blocked_formats, set_staging_directory,
    list_staging_directories, scan_staging,
    ValidateUploadParams, CheckExtensionParams, SetStagingDirectoryParams, ScanStagingParams,
};

/// JSON-RPC request structure
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

/// JSON-RPC response structure
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

fn success_response(id: Option<Value>, result: Value) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: Some(result),
        error: None,
    }
}

fn error_response(id: Option<Value>, code: i32, message: String, data: Option<Value>) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: None,
        error: Some(JsonRpcError { code, message, data }),
    }
}

/// Run the gate service with JSON-RPC stdio communication
///
/// One request per line, one response per line. A rejection verdict is a
/// normal result; JSON-RPC errors are reserved for protocol misuse and
/// operation failures (bad params, missing directories).
pub async fn run_server() -> Result<()> {
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();
    let mut stdout = io::stdout();

    loop {
        let mut line = String::new();
        let bytes_read = stdin_lock.read_line(&mut line)?;

        if bytes_read == 0 {
            // EOF
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Parse JSON-RPC request
        let request: JsonRpcRequest = match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(req) => {
                // Validate JSON-RPC version
                if req.jsonrpc != "2.0" {
                    eprintln!("[ERROR] Invalid JSON-RPC version: {}. Expected 2.0", req.jsonrpc);
                    let response = error_response(
                        req.id.clone(),
                        -32600,
                        format!("Invalid JSON-RPC version: {}. Expected 2.0", req.jsonrpc),
                        None,
                    );
                    let response_json = serde_json::to_string(&response)
                        .context("Failed to serialize error response - critical error")?;
                    writeln!(stdout, "{}", response_json)
                        .context("Failed to write error response to stdout - critical I/O error")?;
                    stdout.flush()
                        .context("Failed to flush stdout - critical I/O error")?;
                    continue;
                }
                req
            }
            Err(e) => {
                // Log parse error to stderr so it's visible to the operator
                eprintln!("[ERROR] Failed to parse JSON-RPC request: {}", e);
                eprintln!("[ERROR] Invalid JSON line: {}", line);

                // Send error response for invalid JSON
                let response = error_response(
                    None,
                    -32700,
                    "Parse error".to_string(),
                    Some(Value::String(e.to_string())),
                );
                let response_json = serde_json::to_string(&response)
                    .context("Failed to serialize error response - critical error")?;
                writeln!(stdout, "{}", response_json)
                    .context("Failed to write error response to stdout - critical I/O error")?;
                stdout.flush()
                    .context("Failed to flush stdout - critical I/O error")?;
                continue;
            }
        };

        // Requests without an ID are notifications - no response needed.
        // The gate defines no notifications, so they are ignored (per JSON-RPC spec).
        if request.id.is_none() {
            continue;
        }

        // Handle requests (with IDs) - must send a response.
        // Errors in handle_request are expected (bad params, missing directories, etc.)
        // and become error responses, not crashes. Critical I/O errors on
        // stdin/stdout still propagate, which is correct.
        let response = match handle_request(&request) {
            Ok(resp) => resp,
            Err(e) => {
                // Log error to stderr so it's visible to the operator
                eprintln!("[ERROR] Request '{}' failed: {}", request.method, e);

                error_response(
                    request.id.clone(),
                    -32000,
                    format!("Request failed: {}", e),
                    Some(Value::String(e.to_string())),
                )
            }
        };

        // Send response - if this fails, it's a critical I/O error and should crash
        let response_json = serde_json::to_string(&response)
            .context("Failed to serialize response - critical error")?;
        writeln!(stdout, "{}", response_json)
            .context("Failed to write response to stdout - critical I/O error")?;
        stdout.flush()
            .context("Failed to flush stdout - critical I/O error")?;
    }

    Ok(())
}

/// Handle a JSON-RPC request
fn handle_request(request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
    let arguments = request.params.clone().unwrap_or(Value::Object(serde_json::Map::new()));

    match request.method.as_str() {
        "gate/validate" => {
            let params: ValidateUploadParams = serde_json::from_value(arguments)
                .context("Failed to parse gate/validate params")?;
            let result = validate_upload(params)?;
            Ok(success_response(request.id.clone(), serde_json::to_value(result)?))
        }

        "gate/check_extension" => {
            let params: CheckExtensionParams = serde_json::from_value(arguments)
                .context("Failed to parse gate/check_extension params")?;
            let result = check_extension(params)?;
            Ok(success_response(request.id.clone(), serde_json::to_value(result)?))
        }

        "gate/formats" => {
            let result = list_blocked_formats()?;
            Ok(success_response(request.id.clone(), serde_json::to_value(result)?))
        }

        "gate/set_staging_directory" => {
            let params: SetStagingDirectoryParams = serde_json::from_value(arguments)
                .context("Failed to parse gate/set_staging_directory params")?;
            let result = set_staging_directory(params)?;
            Ok(success_response(request.id.clone(), serde_json::to_value(result)?))
        }

        "gate/list_staging_directories" => {
            let result = list_staging_directories()?;
            Ok(success_response(request.id.clone(), serde_json::to_value(result)?))
        }

        "gate/scan" => {
            let params: ScanStagingParams = serde_json::from_value(arguments)
                .context("Failed to parse gate/scan params")?;
            let result = scan_staging(params)?;
            Ok(success_response(request.id.clone(), serde_json::to_value(result)?))
        }

        _ => {
            Ok(error_response(
                request.id.clone(),
                -32601,
                format!("Unknown method: {}", request.method),
                None,
            ))
        }
    }
}
