use std::process::ExitCode;

use imgmorph_cli::{execute, parse_request, split_env_args};

fn main() -> ExitCode {
    env_logger::init();

    let (command, args) = split_env_args();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    execute(parse_request(&command, &args))
}
