use std::{
    collections::{BTreeMap, BTreeSet},
    fmt, fs,
    str::FromStr,
};

use super::{
    error::{Error, ParseError},
    fact::{Fact, Symbol},
    grounding::{self, BindingMode},
    parser::Parser,
    schema::{ActionSchema, GroundedAction, SchemaKey},
    state::State,
};

#[derive(Clone, Debug, Default)]
pub struct Environment {
    symbols: BTreeSet<Symbol>,
    initial: State,
    goal: BTreeSet<Fact>,
    schemas: BTreeMap<SchemaKey, ActionSchema>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(filepath: &str) -> Result<Self, Error> {
        let text = fs::read_to_string(filepath).map_err(|source| Error::Io { path: filepath.to_owned(), source })?;
        text.parse().map_err(|source| Error::Parse { path: filepath.to_owned(), source })
    }

    pub fn add_symbol<S: Into<Symbol>>(&mut self, symbol: S) -> bool {
        self.symbols.insert(symbol.into())
    }

    pub fn add_symbols<I, S>(&mut self, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.symbols.extend(symbols.into_iter().map(Into::into))
    }

    /// A negative fact removes its positive counterpart and is not stored.
    pub fn add_initial_fact(&mut self, fact: Fact) {
        if fact.truth() {
            self.initial.insert(fact);
        } else {
            self.initial.remove(&fact.positive());
        }
    }

    pub fn remove_initial_fact(&mut self, fact: &Fact) {
        self.initial.remove(fact);
    }

    pub fn add_goal_fact(&mut self, fact: Fact) {
        if fact.truth() {
            self.goal.insert(fact);
        } else {
            self.goal.remove(&fact.positive());
        }
    }

    pub fn remove_goal_fact(&mut self, fact: &Fact) {
        self.goal.remove(fact);
    }

    /// Registers a schema. A schema with the same name and arity already registered
    /// wins and `false` is returned.
    pub fn add_schema(&mut self, schema: ActionSchema) -> bool {
        let key = schema.key();
        if self.schemas.contains_key(&key) {
            false
        } else {
            self.schemas.insert(key, schema);
            true
        }
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn initial_state(&self) -> &State {
        &self.initial
    }

    pub fn goal(&self) -> &BTreeSet<Fact> {
        &self.goal
    }

    pub fn schema(&self, name: &str, arity: usize) -> Option<&ActionSchema> {
        self.schemas.get(&SchemaKey { name: Symbol::new(name), arity })
    }

    pub fn schemas(&self) -> impl Iterator<Item = &ActionSchema> + Clone {
        self.schemas.values()
    }

    pub fn ground(&self, mode: BindingMode) -> Vec<GroundedAction> {
        let symbols: Vec<Symbol> = self.symbols.iter().cloned().collect();
        grounding::ground_all(self.schemas(), &symbols, mode)
    }
}

impl FromStr for Environment {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Parser::new(text).parse()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "***** Environment *****")?;
        let symbols = self.symbols.iter().map(Symbol::as_str).collect::<Vec<_>>().join(",");
        writeln!(f, "Symbols: {}", symbols)?;
        writeln!(f, "Initial conditions: {}", self.initial)?;
        write!(f, "Goal conditions: {{")?;
        for (i, fact) in self.goal.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", fact)?;
        }
        writeln!(f, "}}")?;
        writeln!(f, "Actions:")?;
        for schema in self.schemas.values() {
            writeln!(f, "{}", schema)?;
        }
        Ok(())
    }
}
