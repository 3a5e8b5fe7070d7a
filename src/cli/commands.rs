//! CLI command implementations
//!
//! Every command loads its configuration first; `ask`, `exec` and
//! `describe` then load the dataset and write a single JSON response.

use std::path::Path;

use crate::api::AskHandler;
use crate::executor::execute_json;
use crate::http_server::HttpServer;
use crate::observability::{log_event_with_fields, Event};
use crate::table::{load_path, DatasetSummary, LoadOptions, LoadedDataset};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_response};

/// Main entry point for CLI
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Ask {
            file,
            question,
            config,
        } => ask(&file, &question, config.as_deref()),
        Command::Exec { file, config } => exec(&file, config.as_deref()),
        Command::Describe { file, config } => describe(&file, config.as_deref()),
        Command::Serve { config, port } => serve(config.as_deref(), port),
    }
}

fn load_config(path: Option<&Path>) -> CliResult<Config> {
    let config = Config::load(path)?;
    let source = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    log_event_with_fields(Event::ConfigLoaded, &[("source", source.as_str())]);
    Ok(config)
}

fn load_dataset(file: &Path, options: &LoadOptions) -> CliResult<LoadedDataset> {
    let path = file.display().to_string();
    match load_path(file, options) {
        Ok(dataset) => {
            let rows = dataset.table.row_count().to_string();
            log_event_with_fields(
                Event::DatasetLoaded,
                &[("file", path.as_str()), ("rows", rows.as_str())],
            );
            Ok(dataset)
        }
        Err(e) => {
            let reason = e.to_string();
            log_event_with_fields(
                Event::DatasetRejected,
                &[("file", path.as_str()), ("reason", reason.as_str())],
            );
            Err(e.into())
        }
    }
}

/// Answer one question about `file` with the rule translator
pub fn ask(file: &Path, question: &str, config_path: Option<&Path>) -> CliResult<()> {
    if question.trim().is_empty() {
        return Err(CliError::io_error("Question cannot be empty"));
    }

    let config = load_config(config_path)?;
    let dataset = load_dataset(file, &config.load_options())?;

    let response = AskHandler::with_rules().answer(question, &dataset);
    write_response(&response)
}

/// Execute a plan read from stdin
///
/// The envelope is written even when the plan fails; only configuration,
/// dataset and I/O problems end the command with an error.
pub fn exec(file: &Path, config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let dataset = load_dataset(file, &config.load_options())?;

    let plan_text = read_request()?;
    let envelope = execute_json(&plan_text, &dataset.table);
    write_response(&envelope)
}

/// Print the dataset summary
pub fn describe(file: &Path, config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let dataset = load_dataset(file, &config.load_options())?;

    let summary = DatasetSummary::build(&dataset.table, &dataset.meta);
    write_response(&summary)
}

/// Run the HTTP server until the process is stopped
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let config = load_config(config_path)?;

    let mut server_config = config.server_config();
    if let Some(port) = port {
        if port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }
        server_config.port = port;
    }

    let server = HttpServer::with_config(server_config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server error: {}", e)))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_dataset_reports_bad_extension() {
        let file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = load_dataset(file.path(), &LoadOptions::default()).unwrap_err();
        assert_eq!(err.code_str(), "QA_CLI_DATASET_ERROR");
        assert!(err.message().contains("Unsupported file type"));
    }

    #[test]
    fn test_load_dataset_reads_csv() {
        let file = csv_file("Survived,Sex\n1,female\n0,male\n");
        let dataset = load_dataset(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(dataset.table.row_count(), 2);
    }

    #[test]
    fn test_ask_rejects_blank_question() {
        let file = csv_file("Survived\n1\n");
        let err = ask(file.path(), "   ", None).unwrap_err();
        assert_eq!(err.message(), "Question cannot be empty");
    }

    #[test]
    fn test_serve_rejects_zero_port() {
        let err = serve(None, Some(0)).unwrap_err();
        assert_eq!(err.code_str(), "QA_CLI_CONFIG_ERROR");
    }
}
