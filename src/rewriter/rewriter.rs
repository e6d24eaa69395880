use std::io::Write;

use crate::error::CoralError;
use crate::matcher::{match_term, Bindings};
use crate::rules::RuleSet;
use crate::term::{simplify, Term};

/// Attempts one rewrite step of `term` against `rules`. Returns the
/// replacement term on success, or `None` if no rule applies — which the
/// driver treats as a signal to descend into children, not as an error.
///
/// `out` receives the rendering written by the built-in `print` effect; the
/// REPL passes `stdout`, tests can pass an in-memory buffer.
pub fn rewrite_step<W: Write>(
    term: &Term,
    rules: &RuleSet,
    out: &mut W,
) -> Result<Option<Term>, CoralError> {
    match term {
        Term::Variable(_) => Ok(None),

        Term::Atom(name) => {
            for rule in rules.candidates(name) {
                let mut table = Bindings::new();
                if match_term(&rule.lhs, term, &mut table) {
                    return Ok(Some(substitute(rule.rhs.clone(), &table)?));
                }
            }
            Ok(None)
        }

        Term::Application(children) => {
            let head_name = match &children[0] {
                Term::Atom(name) => name,
                _ => return Ok(None), // head not an atom: not independently reducible
            };

            // built-in: print writes its argument's rendering and reduces to it
            if head_name == "print" && children.len() == 2 {
                let argument = children[1].clone();
                writeln!(out, "{}", argument.render_nested())?;
                log::trace!("print effect wrote '{}'", argument);
                return Ok(Some(argument));
            }

            for rule in rules.candidates(head_name) {
                let mut table = Bindings::new();
                if match_term(&rule.lhs, term, &mut table) {
                    let consumed = match &rule.lhs {
                        Term::Atom(_) => 1,
                        Term::Application(lhs_children) => lhs_children.len(),
                        Term::Variable(_) => unreachable!("rule lhs is never a bare variable"),
                    };
                    let suffix = &children[consumed..];

                    let mut replacement_children = match &rule.rhs {
                        Term::Application(rhs_children) => rhs_children.clone(),
                        leaf => vec![leaf.clone()],
                    };
                    replacement_children.extend_from_slice(suffix);

                    let substituted = substitute(Term::Application(replacement_children), &table)?;
                    return Ok(Some(simplify(substituted)));
                }
            }
            Ok(None)
        }
    }
}

/// Walks `term`, replacing every `Variable` leaf with a fresh clone of its
/// binding. Fails if a variable in the template was never bound by the
/// match that produced `table` — a malformed rule whose right-hand side
/// mentions a variable its left-hand side never introduced.
fn substitute(term: Term, table: &Bindings) -> Result<Term, CoralError> {
    match term {
        Term::Atom(_) => Ok(term),
        Term::Variable(name) => table
            .get(&name)
            .cloned()
            .ok_or(CoralError::UnboundVariable { name }),
        Term::Application(children) => {
            let substituted = children
                .into_iter()
                .map(|child| substitute(child, table))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Term::Application(substituted))
        }
    }
}
