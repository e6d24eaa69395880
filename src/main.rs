use std::env;
use std::process::ExitCode;

use coral::runner::run_prompt;

/// `coral LIB...` — each argument is a library path, loaded in order (the
/// `.coral` suffix is appended if missing, `spec.md` §6) before the prompt
/// starts. No library paths is legal: the session just starts with an empty
/// rule set.
fn main() -> ExitCode {
    env_logger::init();

    let library_paths: Vec<String> = env::args().skip(1).collect();

    match run_prompt(&library_paths) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(65)
        }
    }
}
