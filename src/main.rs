// Only the browser boot consumes these; host builds compile them for tests.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod api;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod components;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod config;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod db;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod error;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod utils;

#[cfg(not(target_arch = "wasm32"))]
mod catalog_tool;
mod diagnostics;

#[cfg(target_arch = "wasm32")]
fn main() {
    components::boot();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    let cli = catalog_tool::Cli::parse();
    diagnostics::init(&cli.log_level);
    match catalog_tool::run(cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "catalog update failed");
            std::process::ExitCode::FAILURE
        }
    }
}
