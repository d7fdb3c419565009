#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Command line parsing into a [`MorphologyRequest`](request::MorphologyRequest).
pub mod request;

/// Load, transform and save pipeline with its error taxonomy.
pub mod pipeline;

use std::process::ExitCode;

pub use crate::pipeline::{apply_morphology, run, ProcessingError};
pub use crate::request::{
    parse_fixed_request, parse_int_lenient, parse_request, MorphologyRequest, UsageError,
};

/// Run a parsed request and translate the outcome into a process exit code.
///
/// Usage text goes to standard output, processing diagnostics to standard error.
pub fn execute(request: Result<MorphologyRequest, UsageError>) -> ExitCode {
    let request = match request {
        Ok(request) => request,
        Err(err) => {
            log::debug!("{err}");
            print!("{}", err.usage());
            return ExitCode::from(err.exit_code());
        }
    };

    log::info!(
        "{:?} {} -> {}",
        request.operation,
        request.input.display(),
        request.output.display()
    );

    match run(&request) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                log::debug!("caused by: {cause}");
                source = cause.source();
            }
            ExitCode::from(err.exit_code())
        }
    }
}

/// Split the raw process arguments into the command name and its arguments.
///
/// Non UTF-8 arguments are converted lossily.
pub fn split_env_args() -> (String, Vec<String>) {
    let mut argv = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());

    let command = argv
        .next()
        .as_deref()
        .map(std::path::Path::new)
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    (command, argv.collect())
}
