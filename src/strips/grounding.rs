//! Full grounding of action schemas over a finite symbol universe.
//!
//! Every schema of arity `k` is instantiated once per ordered binding of `k` symbols. With
//! [`BindingMode::Distinct`] a universe of `S` symbols yields `S!/(S-k)!` bindings per
//! schema, with [`BindingMode::Repeated`] it yields `S^k`. Both grow exponentially with the
//! largest arity, which is what limits this approach to small object universes.
use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::{
    fact::{Condition, Fact, Symbol},
    schema::{ActionSchema, GroundedAction},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BindingMode {
    #[default]
    Distinct,
    Repeated,
}

#[derive(Debug, Default)]
pub struct BindingTable(HashMap<usize, Vec<Vec<Symbol>>>);

impl BindingTable {
    /// Builds sequences for every length in `arities` and nothing else. Sequences of
    /// length `i` are derived from those of length `i-1` by appending each admissible
    /// symbol, so intermediate lengths are computed but only used ones are kept.
    pub fn build(symbols: &[Symbol], arities: &BTreeSet<usize>, mode: BindingMode) -> Self {
        let mut table = HashMap::new();
        let max = match arities.iter().next_back() {
            Some(max) => *max,
            None => return Self(table),
        };
        let mut current: Vec<Vec<Symbol>> = vec![Vec::new()];
        if arities.contains(&0) {
            table.insert(0, current.clone());
        }
        for arity in 1..=max {
            current = extend_sequences(&current, symbols, mode);
            if current.is_empty() {
                // Universe exhausted: no longer sequences exist either.
                break;
            }
            if arities.contains(&arity) {
                debug!(arity, bindings = current.len(), "binding table row built");
                table.insert(arity, current.clone());
            }
        }
        Self(table)
    }

    pub fn get(&self, arity: usize) -> &[Vec<Symbol>] {
        self.0.get(&arity).map(Vec::as_slice).unwrap_or(&[])
    }
}

pub fn extend_sequences(previous: &[Vec<Symbol>], symbols: &[Symbol], mode: BindingMode) -> Vec<Vec<Symbol>> {
    let mut next = Vec::new();
    for sequence in previous {
        for symbol in symbols {
            if mode == BindingMode::Distinct && sequence.contains(symbol) {
                continue;
            }
            let mut extended = Vec::with_capacity(sequence.len() + 1);
            extended.extend(sequence.iter().cloned());
            extended.push(symbol.clone());
            next.push(extended);
        }
    }
    next
}

pub fn ground_conditions<'a, I>(conditions: I, binding: &HashMap<&str, &Symbol>) -> Vec<Fact>
where
    I: IntoIterator<Item = &'a Condition>,
{
    let grounded: BTreeSet<Fact> = conditions.into_iter().map(|c| c.ground(binding)).collect();
    grounded.into_iter().collect()
}

pub fn ground_schema(schema: &ActionSchema, table: &BindingTable) -> Vec<GroundedAction> {
    let sequences = table.get(schema.arity());
    let mut actions = Vec::with_capacity(sequences.len());
    for sequence in sequences {
        let binding: HashMap<&str, &Symbol> = schema.params().iter().map(Symbol::as_str).zip(sequence.iter()).collect();
        let preconditions = ground_conditions(schema.preconditions(), &binding);
        let effects = ground_conditions(schema.effects(), &binding);
        actions.push(GroundedAction::new(schema.name().clone(), sequence.clone(), preconditions, effects));
    }
    debug!(schema = %schema.key(), grounded = actions.len(), "schema grounded");
    actions
}

/// Every grounded action reachable from `schemas` over `symbols`.
pub fn ground_all<'a, I>(schemas: I, symbols: &[Symbol], mode: BindingMode) -> Vec<GroundedAction>
where
    I: IntoIterator<Item = &'a ActionSchema>,
    I::IntoIter: Clone,
{
    let schemas = schemas.into_iter();
    let arities: BTreeSet<usize> = schemas.clone().map(ActionSchema::arity).collect();
    let table = BindingTable::build(symbols, &arities, mode);
    schemas.flat_map(|schema| ground_schema(schema, &table)).collect()
}
