use std::collections::HashMap;

use crate::term::Term;

/// A variable substitution built up while matching a pattern against a
/// subject. Binds a variable to the first subject term it is ever matched
/// against; later occurrences of the same variable must match the same
/// subject structurally.
#[derive(Debug, Default, Clone)]
pub struct Bindings(HashMap<String, Term>);

impl Bindings {
    pub fn new() -> Self {
        Bindings(HashMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.0.get(name)
    }

    fn bind(&mut self, name: String, value: Term) {
        self.0.insert(name, value);
    }
}

/// Attempts to bind `pattern` against `subject`, recording variable bindings
/// into `table`. Does not mutate `subject`; a successful match leaves
/// bindings that the caller must later substitute into a rule's right-hand
/// side, cloning at each substitution site.
pub fn match_term(pattern: &Term, subject: &Term, table: &mut Bindings) -> bool {
    match pattern {
        Term::Atom(name) => matches!(subject, Term::Atom(other) if other == name),

        Term::Variable(name) => match table.get(name) {
            Some(bound) => bound == subject,
            None => {
                table.bind(name.clone(), subject.clone());
                true
            }
        },

        Term::Application(pattern_children) => match subject {
            // A single-atom-child pattern is equivalent to that atom alone;
            // this is what lets `(f)`-shaped patterns (which the parser
            // never actually produces, since it collapses single-child
            // groups, but a stored rule's application pattern can still be
            // exactly one atom long in principle) match a bare atom subject.
            Term::Atom(subject_name) => {
                pattern_children.len() == 1
                    && matches!(&pattern_children[0], Term::Atom(n) if n == subject_name)
            }
            Term::Application(subject_children) => {
                pattern_children.len() <= subject_children.len()
                    && pattern_children
                        .iter()
                        .zip(subject_children.iter())
                        .all(|(p, s)| match_term(p, s, table))
            }
            Term::Variable(_) => false,
        },
    }
}
