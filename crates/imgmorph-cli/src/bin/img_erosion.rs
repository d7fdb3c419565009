use std::process::ExitCode;

use imgmorph_cli::{execute, parse_fixed_request, split_env_args};

// NOTE: the name is kept for existing scripts, this tool dilates.
fn main() -> ExitCode {
    env_logger::init();

    let (command, args) = split_env_args();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    execute(parse_fixed_request(&command, &args))
}
