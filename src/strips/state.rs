use std::{collections::BTreeSet, fmt, iter::FromIterator};

use super::{fact::Fact, schema::GroundedAction};

#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State(BTreeSet<Fact>);

impl State {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn contains(&self, fact: &Fact) -> bool {
        self.0.contains(fact)
    }

    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.0.iter()
    }

    pub fn insert(&mut self, fact: Fact) -> bool {
        self.0.insert(fact)
    }

    pub fn remove(&mut self, fact: &Fact) -> bool {
        self.0.remove(fact)
    }

    pub fn contains_all<'a, I: IntoIterator<Item = &'a Fact>>(&self, facts: I) -> bool {
        facts.into_iter().all(|f| self.0.contains(f))
    }

    pub fn is_subset_of(&self, other: &State) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn apply_effect(&mut self, effect: &Fact) {
        if effect.truth() {
            self.0.insert(effect.clone());
        } else {
            self.0.remove(&effect.positive());
        }
    }

    /// Successor reached by executing `action`. Preconditions are not checked here and
    /// `self` is left untouched. Retractions run before assertions, so an action that
    /// both deletes and adds the same fact leaves it asserted.
    pub fn apply(&self, action: &GroundedAction) -> State {
        let mut next = self.clone();
        for effect in action.effects().iter().filter(|e| !e.truth()) {
            next.apply_effect(effect);
        }
        for effect in action.effects().iter().filter(|e| e.truth()) {
            next.apply_effect(effect);
        }
        next
    }

    /// Exact membership of every precondition, polarity included.
    pub fn is_applicable(&self, action: &GroundedAction) -> bool {
        self.contains_all(action.preconditions())
    }

    pub fn satisfies<'a, I: IntoIterator<Item = &'a Fact>>(&self, goal: I) -> bool {
        self.contains_all(goal)
    }
}

impl FromIterator<Fact> for State {
    fn from_iter<T: IntoIterator<Item = Fact>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Fact> for State {
    fn extend<T: IntoIterator<Item = Fact>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl<'a> IntoIterator for &'a State {
    type Item = &'a Fact;
    type IntoIter = std::collections::btree_set::Iter<'a, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, fact) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", fact)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State{}", self)
    }
}
