use std::collections::VecDeque;
use std::io::Write;

use crate::error::CoralError;
use crate::rewriter::rewrite_step;
use crate::rules::RuleSet;
use crate::term::Term;

/// A position is a path of child indices from the root down to some
/// subterm; the empty path is the root itself. Walking by path instead of
/// keeping parent pointers sidesteps interior mutability entirely, at the
/// cost of re-descending from the root on every dequeue — cheap, since
/// Coral terms built by real libraries stay shallow.
type Position = Vec<usize>;

fn at<'a>(term: &'a Term, path: &[usize]) -> &'a Term {
    let mut cur = term;
    for &i in path {
        cur = &cur.children()[i];
    }
    cur
}

fn set_at(term: &mut Term, path: &[usize], value: Term) {
    let mut cur = term;
    for &i in path {
        cur = match cur {
            Term::Application(children) => &mut children[i],
            _ => panic!("position does not address a valid subterm"),
        };
    }
    *cur = value;
}

/// Drives `root` to a normal form under `rules`: outermost, breadth-first,
/// restarting from the root after every successful rewrite.
///
/// The restart policy is deliberate (`spec.md` §4.5, §9): it guarantees an
/// outer redex exposed by an inner rewrite is retried before the driver
/// wastes work descending further. A rule set that never reaches a fixed
/// point diverges here exactly as it would in any other implementation —
/// termination is the library author's responsibility, not this driver's.
pub fn full_reduce<W: Write>(
    mut root: Term,
    rules: &RuleSet,
    out: &mut W,
) -> Result<Term, CoralError> {
    let mut queue: VecDeque<Position> = VecDeque::new();
    queue.push_back(Vec::new());

    while let Some(path) = queue.pop_front() {
        match rewrite_step(at(&root, &path), rules, out)? {
            Some(replacement) => {
                set_at(&mut root, &path, replacement);
                queue.clear();
                queue.push_back(Vec::new());
            }
            None => {
                if let Term::Application(children) = at(&root, &path) {
                    for i in 1..children.len() {
                        let mut child_path = path.clone();
                        child_path.push(i);
                        queue.push_back(child_path);
                    }
                }
            }
        }
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{load, RuleSet};

    fn math_rules() -> RuleSet {
        let mut rules = RuleSet::new();
        load(
            "zero = 0\n\
             one = s 0\n\
             two = s (s 0)\n\
             three = s (s (s 0))\n\
             + A 0 = A\n\
             + A (s B) = + (s A) B\n\
             * A 0 = 0\n\
             * A (s B) = + A (* A B)\n",
            "math.coral",
            &mut rules,
        )
        .unwrap();
        rules
    }

    fn reduce(source: &str) -> String {
        let rules = math_rules();
        let term = crate::parser::parse_input(source, "<test>").unwrap();
        let mut out = Vec::new();
        full_reduce(term, &rules, &mut out).unwrap().to_string()
    }

    #[test]
    fn scenario_plus_three_one() {
        assert_eq!(reduce("+ three one"), "s (s (s (s 0)))");
    }

    #[test]
    fn scenario_times_two_three() {
        assert_eq!(reduce("* two three"), "s (s (s (s (s (s 0)))))");
    }

    #[test]
    fn scenario_times_two_zero() {
        assert_eq!(reduce("* two zero"), "0");
    }

    #[test]
    fn scenario_bare_zero() {
        assert_eq!(reduce("zero"), "0");
    }

    #[test]
    fn scenario_print_builtin() {
        let rules = math_rules();
        let term = crate::parser::parse_input("print (s 0)", "<test>").unwrap();
        let mut out = Vec::new();
        let result = full_reduce(term, &rules, &mut out).unwrap();
        assert_eq!(result.to_string(), "s 0");
        assert_eq!(String::from_utf8(out).unwrap(), "(s 0)\n");
    }

    #[test]
    fn normal_form_has_no_remaining_variable() {
        let rules = math_rules();
        let term = crate::parser::parse_input("+ one one", "<test>").unwrap();
        let mut out = Vec::new();
        let result = full_reduce(term, &rules, &mut out).unwrap();
        assert!(!contains_variable(&result));
    }

    fn contains_variable(term: &Term) -> bool {
        match term {
            Term::Variable(_) => true,
            Term::Atom(_) => false,
            Term::Application(children) => children.iter().any(contains_variable),
        }
    }
}
