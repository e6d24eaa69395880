use std::io::{self, Write};

use crate::driver::full_reduce;
use crate::error::CoralError;
use crate::parser::parse_input;
use crate::rules::{load_file, RuleSet};

/// Loads each library path in order into a fresh rule set. A syntax error in
/// one file is printed and that file's remaining rules are skipped, but
/// loading continues with the next path (`spec.md` §7's syntax errors
/// recover; only library files, not the whole session, are affected). An
/// I/O error — a missing or unreadable path — aborts immediately and
/// propagates to the caller, since at startup a bad path is a
/// misconfiguration the session can't meaningfully proceed past.
fn load_all(paths: &[String], out: &mut impl Write) -> Result<RuleSet, CoralError> {
    let mut rules = RuleSet::new();
    for path in paths {
        if let Err(err) = load_file(path, &mut rules) {
            match err {
                CoralError::Io(_) => return Err(err),
                other => {
                    log::warn!("failed to load '{}': {}", path, other);
                    writeln!(out, "{}", other)?;
                }
            }
        }
    }
    Ok(rules)
}

/// Like [`load_all`], but for the interactive `reload` command: here even an
/// I/O error is recoverable — the session keeps running with whatever rules
/// did load rather than exiting, since the REPL already has an established
/// session a user wouldn't expect one bad reload to tear down.
fn reload_all(paths: &[String], out: &mut impl Write) -> RuleSet {
    let mut rules = RuleSet::new();
    for path in paths {
        if let Err(err) = load_file(path, &mut rules) {
            log::warn!("reload of '{}' failed: {}", path, err);
            let _ = writeln!(out, "{}", err);
        }
    }
    rules
}

/// Runs the read-eval-print loop: loads `library_paths` in order, then reads
/// lines from stdin until EOF, `exit`, or `quit`. `reload` reparses every
/// library path from scratch; anything else is parsed as a query term,
/// reduced to normal form, and the result printed.
///
/// Returns `Err` only for the startup load failure described on
/// [`load_all`]; a syntax error typed at the prompt is printed and the loop
/// continues (`spec.md` §7).
pub fn run_prompt(library_paths: &[String]) -> Result<(), CoralError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut rules = load_all(library_paths, &mut stdout)?;
    log::info!(
        "loaded {} rule(s) from {} librar{}",
        rules.len(),
        library_paths.len(),
        if library_paths.len() == 1 { "y" } else { "ies" }
    );

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF / Ctrl-D
        }
        let input = line.trim();

        match input {
            "exit" | "quit" => break,
            "reload" => {
                log::info!("reloading libraries");
                rules = reload_all(library_paths, &mut stdout);
            }
            "" => {} // blank line at the prompt, nothing to do
            _ => match parse_input(input, "<stdin>") {
                Ok(term) => match full_reduce(term, &rules, &mut stdout) {
                    Ok(result) => println!("{}", result),
                    Err(err) => {
                        log::warn!("rewrite failed: {}", err);
                        println!("{}", err);
                    }
                },
                Err(err) => {
                    log::warn!("syntax error: {}", err);
                    println!("{}", err);
                }
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_all_reports_io_error_for_missing_path() {
        let mut out = Vec::new();
        let err = load_all(&["/no/such/library".to_string()], &mut out).unwrap_err();
        assert!(matches!(err, CoralError::Io(_)));
    }

    #[test]
    fn load_all_recovers_from_syntax_error_in_one_file_and_keeps_going() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.coral");
        let good = dir.path().join("good.coral");
        std::fs::write(&bad, "X = a\n").unwrap();
        std::fs::write(&good, "zero = 0\n").unwrap();

        let mut out = Vec::new();
        let rules = load_all(
            &[
                bad.to_str().unwrap().to_string(),
                good.to_str().unwrap().to_string(),
            ],
            &mut out,
        )
        .unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.candidates("zero").len(), 1);
    }
}
