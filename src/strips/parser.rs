//! Reader for the line-oriented problem format:
//!
//! ```text
//! Symbols: A,B,Table
//! Initial conditions: On(A,Table), On(B,Table), Clear(A), Clear(B)
//! Goal conditions: On(A,B)
//! Actions:
//!     Stack(x,y)
//!     Preconditions: Clear(x), Clear(y)
//!     Effects: On(x,y), !Clear(y)
//! ```
//!
//! Whitespace is insignificant, keywords are case-insensitive and `#` starts a comment line.
use std::{iter::Enumerate, str::Lines};

use tracing::warn;

use super::{
    environment::Environment,
    error::ParseError,
    fact::{Condition, Fact, Symbol},
    schema::ActionSchema,
};

const SYMBOLS: &str = "symbols:";
const INITIAL: &str = "initialconditions:";
const GOAL: &str = "goalconditions:";
const ACTIONS: &str = "actions:";
const PRECONDITIONS: &str = "preconditions:";
const EFFECTS: &str = "effects:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Symbols,
    Initial,
    Goal,
    Actions,
    Header,
    Preconditions,
    Effects,
}

impl Section {
    fn expected(self) -> &'static str {
        match self {
            Section::Symbols => "Expected 'Symbols:'.",
            Section::Initial => "Expected 'Initial conditions:'.",
            Section::Goal => "Expected 'Goal conditions:'.",
            Section::Actions => "Expected 'Actions:'.",
            Section::Header => "Expected action declaration.",
            Section::Preconditions => "Expected 'Preconditions:'.",
            Section::Effects => "Expected 'Effects:'.",
        }
    }
}

#[derive(Debug, PartialEq)]
struct Atom<'s> {
    name: &'s str,
    args: Vec<&'s str>,
    truth: bool,
}

impl Atom<'_> {
    fn fact(&self) -> Fact {
        Fact::with_truth(self.name, self.args.iter().copied(), self.truth)
    }
}

/// Byte cursor over one whitespace-free line. Only ASCII is ever consumed, so every
/// slice taken lands on a char boundary.
struct Cursor<'s> {
    text: &'s str,
    pos: usize,
    line: usize,
}

impl<'s> Cursor<'s> {
    fn new(text: &'s str, line: usize) -> Self {
        Self { text, pos: 0, line }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    #[inline]
    fn is_done(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, b: u8) -> Result<(), ParseError> {
        if self.eat(b) {
            Ok(())
        } else {
            Err(self.err(format!("Expected '{}'.", b as char)))
        }
    }

    fn err<M: Into<String>>(&self, message: M) -> ParseError {
        ParseError::new(self.line, message)
    }

    fn take_while<F: Fn(u8) -> bool>(&mut self, accept: F) -> &'s str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !accept(b) {
                break;
            }
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    fn symbol(&mut self) -> Result<&'s str, ParseError> {
        let s = self.take_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        if s.is_empty() {
            Err(self.err("Expected symbol."))
        } else {
            Ok(s)
        }
    }

    fn predicate(&mut self) -> Result<&'s str, ParseError> {
        match self.peek() {
            Some(b) if b.is_ascii_uppercase() => Ok(self.take_while(|b| b.is_ascii_alphabetic() || b == b'_')),
            _ => Err(self.err("Expected predicate name starting with an upper-case letter.")),
        }
    }

    fn atom(&mut self) -> Result<Atom<'s>, ParseError> {
        let truth = !self.eat(b'!');
        let name = self.predicate()?;
        self.expect(b'(')?;
        let mut args = Vec::new();
        if !self.eat(b')') {
            loop {
                args.push(self.symbol()?);
                if self.eat(b')') {
                    break;
                }
                self.expect(b',')?;
            }
        }
        Ok(Atom { name, args, truth })
    }

    fn atoms(&mut self) -> Result<Vec<Atom<'s>>, ParseError> {
        let mut atoms = Vec::new();
        while !self.is_done() {
            atoms.push(self.atom()?);
            if !self.is_done() {
                self.expect(b',')?;
            }
        }
        Ok(atoms)
    }

    fn symbols(&mut self) -> Result<Vec<&'s str>, ParseError> {
        let mut symbols = Vec::new();
        while !self.is_done() {
            symbols.push(self.symbol()?);
            if !self.is_done() {
                self.expect(b',')?;
            }
        }
        Ok(symbols)
    }
}

fn strip_keyword<'l>(line: &'l str, keyword: &str) -> Option<&'l str> {
    match line.get(..keyword.len()) {
        Some(head) if head.eq_ignore_ascii_case(keyword) => Some(&line[keyword.len()..]),
        _ => None,
    }
}

pub struct Parser<'a> {
    lines: Enumerate<Lines<'a>>,
    section: Section,
    last_line: usize,
    env: Environment,
    name: Option<Symbol>,
    params: Vec<Symbol>,
    preconditions: Vec<Condition>,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            section: Section::Symbols,
            last_line: 0,
            env: Environment::new(),
            name: None,
            params: Vec::new(),
            preconditions: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Result<Environment, ParseError> {
        while let Some((idx, raw)) = self.lines.next() {
            let line: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.last_line = idx + 1;
            self.line(&line, idx + 1)?;
        }
        match self.section {
            Section::Header => Ok(self.env),
            section => Err(ParseError::new(self.last_line + 1, format!("Unexpected end of input. {}", section.expected()))),
        }
    }

    fn line(&mut self, line: &str, line_no: usize) -> Result<(), ParseError> {
        let section = self.section;
        let expected = || ParseError::new(line_no, section.expected());
        match section {
            Section::Symbols => {
                let rest = strip_keyword(line, SYMBOLS).ok_or_else(expected)?;
                let symbols = Cursor::new(rest, line_no).symbols()?;
                self.env.add_symbols(symbols);
                self.section = Section::Initial;
            }
            Section::Initial => {
                let rest = strip_keyword(line, INITIAL).ok_or_else(expected)?;
                for atom in Cursor::new(rest, line_no).atoms()? {
                    self.env.add_initial_fact(atom.fact());
                }
                self.section = Section::Goal;
            }
            Section::Goal => {
                let rest = strip_keyword(line, GOAL).ok_or_else(expected)?;
                for atom in Cursor::new(rest, line_no).atoms()? {
                    self.env.add_goal_fact(atom.fact());
                }
                self.section = Section::Actions;
            }
            Section::Actions => {
                if !line.eq_ignore_ascii_case(ACTIONS) {
                    return Err(expected());
                }
                self.section = Section::Header;
            }
            Section::Header => {
                let mut cursor = Cursor::new(line, line_no);
                let atom = cursor.atom()?;
                if !cursor.is_done() {
                    return Err(cursor.err("Unexpected text after action declaration."));
                }
                if !atom.truth {
                    return Err(ParseError::new(line_no, "Action declaration can not be negated."));
                }
                let mut params: Vec<Symbol> = Vec::with_capacity(atom.args.len());
                for arg in atom.args {
                    if params.iter().any(|p| p.as_str() == arg) {
                        return Err(ParseError::new(line_no, format!("Duplicate parameter '{}'.", arg)));
                    }
                    params.push(Symbol::new(arg));
                }
                self.name = Some(Symbol::new(atom.name));
                self.params = params;
                self.section = Section::Preconditions;
            }
            Section::Preconditions => {
                let rest = strip_keyword(line, PRECONDITIONS).ok_or_else(expected)?;
                let atoms = Cursor::new(rest, line_no).atoms()?;
                self.preconditions = atoms.iter().map(|a| Condition::from_names(a.name, &a.args, &self.params, a.truth)).collect();
                self.section = Section::Effects;
            }
            Section::Effects => {
                let rest = strip_keyword(line, EFFECTS).ok_or_else(expected)?;
                let atoms = Cursor::new(rest, line_no).atoms()?;
                let effects: Vec<Condition> = atoms.iter().map(|a| Condition::from_names(a.name, &a.args, &self.params, a.truth)).collect();
                let name = self.name.take().ok_or_else(|| ParseError::new(line_no, Section::Header.expected()))?;
                let schema = ActionSchema::new(name, std::mem::take(&mut self.params), std::mem::take(&mut self.preconditions), effects);
                let key = schema.key();
                if !self.env.add_schema(schema) {
                    warn!(line = line_no, schema = %key, "action redeclared, keeping the first declaration");
                }
                self.section = Section::Header;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{Atom, Cursor, Parser};
    use crate::strips::{environment::Environment, error::{Error, ParseError}, fact::Fact};

    const BLOCKS: &str = "Symbols: A,B,C,Table
Initial conditions: On(A,B), On(B,Table), On(C,Table), Block(A), Block(B), Block(C), Clear(A), Clear(C)
Goal conditions: On(B,C), On(C,A), On(A,Table)
Actions:
        MoveToTable(b,x)
        Preconditions: On(b,x), Clear(b), Block(b), Block(x)
        Effects: On(b,Table), Clear(x), !On(b,x)

        Move(b,x,y)
        Preconditions: On(b,x), Clear(b), Clear(y), Block(b), Block(y)
        Effects: On(b,y), Clear(x), !On(b,x), !Clear(y)
";

    #[test]
    fn test_atom() {
        let mut c = Cursor::new("!On(b,Table)", 1);
        assert_eq!(c.atom(), Ok(Atom { name: "On", args: vec!["b", "Table"], truth: false }));
        assert!(c.is_done());
        let mut c = Cursor::new("HandEmpty()", 1);
        assert_eq!(c.atom(), Ok(Atom { name: "HandEmpty", args: vec![], truth: true }));
    }

    #[test]
    fn test_atom_errors() {
        assert_eq!(
            Cursor::new("on(A)", 3).atom(),
            Err(ParseError::new(3, "Expected predicate name starting with an upper-case letter."))
        );
        assert_eq!(Cursor::new("On(A", 1).atom(), Err(ParseError::new(1, "Expected ','.")));
        assert_eq!(Cursor::new("On(A,)", 1).atom(), Err(ParseError::new(1, "Expected symbol.")));
        assert_eq!(Cursor::new("On(A)Clear(B)", 1).atoms(), Err(ParseError::new(1, "Expected ','.")));
    }

    #[test]
    fn test_blocks() {
        let env = Parser::new(BLOCKS).parse().expect("blocks problem parses");
        assert_eq!(env.symbols().count(), 4);
        assert_eq!(env.initial_state().len(), 8);
        assert!(env.initial_state().contains(&Fact::new("On", ["A", "B"])));
        assert_eq!(env.goal().len(), 3);
        let mv = env.schema("Move", 3).expect("Move/3 declared");
        assert_eq!(mv.preconditions().count(), 5);
        assert_eq!(mv.effects().count(), 4);
        let to_table = env.schema("MoveToTable", 2).expect("MoveToTable/2 declared");
        assert_eq!(
            to_table.effects().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["Clear(x)", "On(b,Table)", "!On(b,x)"]
        );
    }

    #[test]
    fn test_negated_initial_removes() {
        let text = "symbols: A\ninitialconditions: P(A), Q(A), !Q(A)\ngoalconditions: P(A), !P(A)\nactions:";
        let env: Environment = text.parse().expect("parses");
        assert_eq!(env.initial_state().len(), 1);
        assert!(env.goal().is_empty());
        assert_eq!(env.schemas().count(), 0);
    }

    #[test]
    fn test_comments_and_case() {
        let text = "# problem\nSYMBOLS: A\n\n  # nothing yet\nInitial Conditions:\nGoal Conditions: P(A)\nACTIONS:\n Make(x)\n preconditions:\n effects: P(x)";
        let env: Environment = text.parse().expect("parses");
        assert!(env.initial_state().is_empty());
        assert_eq!(env.schema("Make", 1).map(|s| s.preconditions().count()), Some(0));
    }

    #[test]
    fn test_section_errors() {
        assert_eq!("Initial conditions: P(A)".parse::<Environment>().unwrap_err(), ParseError::new(1, "Expected 'Symbols:'."));
        assert_eq!(
            "Symbols: A\nInitial conditions: P(A)\nGoal conditions: P(A)".parse::<Environment>().unwrap_err(),
            ParseError::new(4, "Unexpected end of input. Expected 'Actions:'.")
        );
        assert_eq!(
            "Symbols: A\nInitial conditions: P(A)\nGoal conditions: P(A)\nActions:\nMake(x)\nEffects: P(x)".parse::<Environment>().unwrap_err(),
            ParseError::new(6, "Expected 'Preconditions:'.")
        );
        assert_eq!(
            "Symbols: A\nInitial conditions:\nGoal conditions:\nActions:\nMake(x,x)".parse::<Environment>().unwrap_err(),
            ParseError::new(5, "Duplicate parameter 'x'.")
        );
        assert_eq!(
            "Symbols: A\nInitial conditions:\nGoal conditions:\nActions:\nMake(x)\nPreconditions:".parse::<Environment>().unwrap_err(),
            ParseError::new(7, "Unexpected end of input. Expected 'Effects:'.")
        );
    }

    #[test]
    fn test_from_file() {
        use tempfile::Builder;
        let mut file = Builder::new().suffix(".txt").tempfile().expect("Unable to create temporary file");
        write!(file.as_file_mut(), "{}", BLOCKS).expect("Unable to write to tempfile");
        let path = file.path().display().to_string();
        let env = Environment::from_file(&path).expect("blocks problem loads");
        assert_eq!(env.schemas().count(), 2);

        match Environment::from_file("does/not/exist.txt") {
            Err(Error::Io { path, .. }) => assert_eq!(path, "does/not/exist.txt"),
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
