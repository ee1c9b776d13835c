use waymark::cli::run_cli;
use waymark::otel::{init_logging_with_config, LogConfig};

fn main() {
    // Logging goes to stderr so command output on stdout stays parseable.
    let mut log_config = LogConfig::from_env();
    if std::env::var_os("WAYMARK_LOG_LEVEL").is_none() {
        log_config.log_level = "warn".to_string();
    }
    if let Err(err) = init_logging_with_config(&log_config) {
        eprintln!("warning: {err:#}");
    }

    if let Err(err) = run_cli() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
