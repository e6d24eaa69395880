use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

use encoding_rs_io::DecodeReaderBytesBuilder;

use crate::error::CoralError;
use crate::parser::Parser;
use crate::term::Term;
use crate::lexer::tokenize;

/// A loaded rewrite rule: `lhs = rhs`. `lhs.head_key()` is always `Some` by
/// the time a `Rule` exists — the parser rejects anything else before one
/// is ever constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub lhs: Term,
    pub rhs: Term,
}

/// All loaded rules, indexed by head key. Insertion order within a key is
/// preserved (first match wins); order across keys carries no meaning.
#[derive(Debug, Default, Clone)]
pub struct RuleSet {
    by_head: HashMap<String, Vec<Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        RuleSet::default()
    }

    pub fn insert(&mut self, rule: Rule) {
        let key = rule
            .lhs
            .head_key()
            .expect("rule lhs is validated to have an atom head during parsing")
            .to_string();
        self.by_head.entry(key).or_default().push(rule);
    }

    pub fn candidates(&self, head: &str) -> &[Rule] {
        self.by_head.get(head).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_head.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses `source` as a library and extends `rules` with every rule found,
/// in file order. On a syntax error, rules already parsed earlier in the
/// same file remain in `rules` — this mirrors `load()` in the source this
/// interpreter is modeled on, which mutates its rule table in place as it
/// goes rather than building a separate result to discard on failure.
pub fn load(source: &str, file: &str, rules: &mut RuleSet) -> Result<(), CoralError> {
    let tokens = tokenize(source, file);
    let mut parser = Parser::new(tokens);

    loop {
        parser.skip_blank_lines();
        if parser.at_end() {
            break;
        }
        let (lhs, rhs) = parser.parse_rule()?;
        log::debug!("loaded rule with head '{}'", lhs.head_key().unwrap());
        rules.insert(Rule { lhs, rhs });
    }

    Ok(())
}

/// Loads a library file into `rules`, appending the `.coral` suffix if the
/// caller didn't supply one (`spec.md` §6's file-name convention). The file
/// is decoded permissively (BOM-sniffed, defaulting to UTF-8) so libraries
/// saved by less careful editors still load.
pub fn load_file(path: &str, rules: &mut RuleSet) -> Result<(), CoralError> {
    let path = if path.ends_with(".coral") {
        path.to_string()
    } else {
        format!("{}.coral", path)
    };

    let file = File::open(&path)?;
    let mut decoder = DecodeReaderBytesBuilder::new().encoding(None).build(file);
    let mut source = String::new();
    decoder.read_to_string(&mut source)?;

    log::info!("loading library '{}'", path);
    load(&source, &path, rules)
}
