use std::fmt;

/// A Coral term: the only value type in the language. Atoms and variables are
/// leaves; an application is an ordered, non-empty sequence of terms.
///
/// After parsing and simplification (see [`simplify`]) two invariants always
/// hold for every `Term` produced by this crate:
///
/// 1. No `Application` has fewer than two children.
/// 2. No `Application`'s first child is itself an `Application`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Atom(String),
    Variable(String),
    Application(Vec<Term>),
}

impl Term {
    pub fn atom(name: impl Into<String>) -> Term {
        Term::Atom(name.into())
    }

    pub fn variable(name: impl Into<String>) -> Term {
        Term::Variable(name.into())
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Term::Atom(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn is_application(&self) -> bool {
        matches!(self, Term::Application(_))
    }

    /// The name of an atom/variable leaf, or `None` for an application.
    pub fn name(&self) -> Option<&str> {
        match self {
            Term::Atom(n) | Term::Variable(n) => Some(n.as_str()),
            Term::Application(_) => None,
        }
    }

    pub fn children(&self) -> &[Term] {
        match self {
            Term::Application(children) => children,
            _ => &[],
        }
    }

    /// The atom name used to index candidate rules, or `None` if this term
    /// can never head a rule match: a bare variable, or an application whose
    /// first child is not itself an atom.
    pub fn head_key(&self) -> Option<&str> {
        match self {
            Term::Atom(name) => Some(name.as_str()),
            Term::Application(children) => match children.first() {
                Some(Term::Atom(name)) => Some(name.as_str()),
                _ => None,
            },
            Term::Variable(_) => None,
        }
    }

    /// Renders as if this term were nested inside an enclosing application —
    /// wrapped in parens when it's itself an application. This is what the
    /// `print` built-in uses for its argument (`spec.md` §6): `print`'s
    /// argument is always logically "inside" the `print` application, even
    /// though `print` itself never appears in the printed text.
    pub fn render_nested(&self) -> String {
        self.render(true)
    }

    fn render(&self, inner: bool) -> String {
        match self {
            Term::Atom(name) | Term::Variable(name) => name.clone(),
            Term::Application(children) => {
                let body = children
                    .iter()
                    .map(|child| child.render(true))
                    .collect::<Vec<_>>()
                    .join(" ");
                if inner {
                    format!("({})", body)
                } else {
                    body
                }
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(false))
    }
}

/// Collapses a just-closed group of child terms into a single `Term`,
/// enforcing both structural invariants.
///
/// A single-child group collapses to that child. Otherwise, if the group's
/// first child is itself an application, its children are spliced in ahead of
/// the group's remaining children (head-application flattening), and the
/// result is re-simplified in case the splice exposed another one-child or
/// application-headed group.
pub fn simplify(term: Term) -> Term {
    match term {
        Term::Application(mut children) => {
            if !children.is_empty() && matches!(children[0], Term::Application(_)) {
                let head = children.remove(0);
                let mut spliced = match simplify(head) {
                    Term::Application(grandchildren) => grandchildren,
                    leaf => vec![leaf],
                };
                spliced.extend(children);
                simplify(Term::Application(spliced))
            } else if children.len() == 1 {
                simplify(children.pop().expect("checked len == 1"))
            } else {
                Term::Application(children)
            }
        }
        leaf => leaf,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_child_group_collapses() {
        let group = Term::Application(vec![Term::atom("zero")]);
        assert_eq!(simplify(group), Term::atom("zero"));
    }

    #[test]
    fn head_application_flattens() {
        // ((f x) y) -> (f x y)
        let inner = Term::Application(vec![Term::atom("f"), Term::atom("x")]);
        let outer = Term::Application(vec![inner, Term::atom("y")]);
        assert_eq!(
            simplify(outer),
            Term::Application(vec![Term::atom("f"), Term::atom("x"), Term::atom("y")])
        );
    }

    #[test]
    fn render_nests_parens_only_inside_applications() {
        let t = Term::Application(vec![
            Term::atom("+"),
            Term::Application(vec![Term::atom("s"), Term::atom("0")]),
            Term::atom("0"),
        ]);
        assert_eq!(t.to_string(), "+ (s 0) 0");
    }

    #[test]
    fn head_key_of_atom_headed_application() {
        let t = Term::Application(vec![Term::atom("+"), Term::atom("a"), Term::atom("b")]);
        assert_eq!(t.head_key(), Some("+"));
        assert_eq!(Term::atom("zero").head_key(), Some("zero"));
        assert_eq!(Term::variable("X").head_key(), None);
    }
}
