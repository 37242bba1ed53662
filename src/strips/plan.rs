use std::fmt;

use super::schema::GroundedAction;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Plan {
    actions: Vec<GroundedAction>,
}

impl Plan {
    pub fn new(actions: Vec<GroundedAction>) -> Self {
        Self { actions }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[inline]
    pub fn cost(&self) -> u32 {
        self.actions.len() as u32
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroundedAction> {
        self.actions.iter()
    }

    pub fn actions(&self) -> &[GroundedAction] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<GroundedAction> {
        self.actions
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a GroundedAction;
    type IntoIter = std::slice::Iter<'a, GroundedAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for action in &self.actions {
            writeln!(f, "{}", action)?;
        }
        Ok(())
    }
}
