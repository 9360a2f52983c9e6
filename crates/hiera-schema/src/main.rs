use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use config_tools_telemetry::{ConsoleTarget, Logging};
use hiera_schema::{
    APP_NAME,
    module::{self, ModuleResponse},
};

/// Ansible module remapping flat hieradata into nested groups according to a schema.
///
/// The result is written to stdout as JSON, logs are written to stderr.
#[derive(Debug, Parser)]
#[command(name = "hiera-schema", author, version)]
struct Opts {
    /// Path to the JSON file containing the module arguments.
    args_file: PathBuf,
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    let response = match Logging::new(APP_NAME)
        .with_console_target(ConsoleTarget::Stderr)
        .dispatch()
    {
        Ok(dispatch) => {
            tracing::dispatcher::with_default(&dispatch, || module::execute(&opts.args_file))
        }
        Err(error) => ModuleResponse::failed(&error),
    };

    match serde_json::to_string(&response) {
        Ok(json) => println!("{json}"),
        Err(error) => {
            println!(
                "{}",
                serde_json::json!({
                    "failed": true,
                    "msg": format!("failed to serialize module response: {error}"),
                })
            );
            return ExitCode::FAILURE;
        }
    }

    if response.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
