pub mod config;
pub mod constants;
pub mod gate;
pub mod guard;
pub mod server;
pub mod tools;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // If run_server fails, it's a critical error (I/O failure, etc.) and we should exit with error code
    // This ensures the process fails loudly if the gate can't start or run
    // All errors are logged to stderr so the upload endpoint's operator can see them
    if let Err(e) = server::run_server().await {
        eprintln!("[FATAL ERROR] Gate service crashed: {}", e);
        eprintln!("[FATAL ERROR] Error chain: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
