use std::{collections::BTreeSet, fmt, hash::{Hash, Hasher}};

use super::fact::{write_atom, Condition, Fact, Symbol};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaKey {
    pub name: Symbol,
    pub arity: usize,
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

#[derive(Clone, Debug)]
pub struct ActionSchema {
    name: Symbol,
    params: Vec<Symbol>,
    preconditions: BTreeSet<Condition>,
    effects: BTreeSet<Condition>,
}

impl ActionSchema {
    pub fn new<N, P, A>(name: N, params: P, preconditions: impl IntoIterator<Item = Condition>, effects: impl IntoIterator<Item = Condition>) -> Self
    where
        N: Into<Symbol>,
        P: IntoIterator<Item = A>,
        A: Into<Symbol>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
            preconditions: preconditions.into_iter().collect(),
            effects: effects.into_iter().collect(),
        }
    }

    #[inline]
    pub fn name(&self) -> &Symbol {
        &self.name
    }

    #[inline]
    pub fn params(&self) -> &[Symbol] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn preconditions(&self) -> impl Iterator<Item = &Condition> {
        self.preconditions.iter()
    }

    pub fn effects(&self) -> impl Iterator<Item = &Condition> {
        self.effects.iter()
    }

    pub fn key(&self) -> SchemaKey {
        SchemaKey { name: self.name.clone(), arity: self.arity() }
    }
}

impl PartialEq for ActionSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arity() == other.arity()
    }
}

impl Eq for ActionSchema {}

impl Hash for ActionSchema {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.arity().hash(state);
    }
}

impl fmt::Display for ActionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_atom(f, true, &self.name, self.params.as_slice())?;
        write!(f, "\nPreconditions:")?;
        for c in &self.preconditions {
            write!(f, " {}", c)?;
        }
        write!(f, "\nEffects:")?;
        for c in &self.effects {
            write!(f, " {}", c)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct GroundedAction {
    name: Symbol,
    args: Vec<Symbol>,
    preconditions: Vec<Fact>,
    effects: Vec<Fact>,
}

impl GroundedAction {
    pub fn new(name: Symbol, args: Vec<Symbol>, preconditions: Vec<Fact>, effects: Vec<Fact>) -> Self {
        Self { name, args, preconditions, effects }
    }

    #[inline]
    pub fn name(&self) -> &Symbol {
        &self.name
    }

    #[inline]
    pub fn args(&self) -> &[Symbol] {
        &self.args
    }

    #[inline]
    pub fn preconditions(&self) -> &[Fact] {
        &self.preconditions
    }

    #[inline]
    pub fn effects(&self) -> &[Fact] {
        &self.effects
    }
}

impl PartialEq for GroundedAction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args
    }
}

impl Eq for GroundedAction {}

impl Hash for GroundedAction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.args.hash(state);
    }
}

impl fmt::Display for GroundedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_atom(f, true, &self.name, self.args.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{ActionSchema, GroundedAction, SchemaKey};
    use crate::strips::fact::{Condition, Fact, Symbol};

    fn stack() -> ActionSchema {
        let params = [Symbol::new("x"), Symbol::new("y")];
        ActionSchema::new(
            "Stack",
            params.clone(),
            vec![Condition::from_names("Clear", &["x"], &params, true), Condition::from_names("Clear", &["y"], &params, true)],
            vec![Condition::from_names("On", &["x", "y"], &params, true), Condition::from_names("Clear", &["y"], &params, false)],
        )
    }

    #[test]
    fn test_identity_by_name_and_arity() {
        let other = ActionSchema::new("Stack", ["a", "b"], vec![], vec![]);
        assert_eq!(stack(), other);
        assert_eq!(stack().key(), SchemaKey { name: Symbol::new("Stack"), arity: 2 });
        assert_ne!(stack(), ActionSchema::new("Stack", ["a"], vec![], vec![]));

        let set: HashSet<ActionSchema> = [stack(), other].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(stack().to_string(), "Stack(x,y)\nPreconditions: Clear(x) Clear(y)\nEffects: !Clear(y) On(x,y)");
        let a = GroundedAction::new(Symbol::new("Stack"), vec![Symbol::new("A"), Symbol::new("B")], vec![], vec![Fact::new("On", ["A", "B"])]);
        assert_eq!(a.to_string(), "Stack(A,B)");
    }

    #[test]
    fn test_grounded_equality_ignores_conditions() {
        let args = vec![Symbol::new("A"), Symbol::new("B")];
        let l = GroundedAction::new(Symbol::new("Stack"), args.clone(), vec![Fact::new("Clear", ["A"])], vec![]);
        let r = GroundedAction::new(Symbol::new("Stack"), args, vec![], vec![]);
        assert_eq!(l, r);
    }
}
