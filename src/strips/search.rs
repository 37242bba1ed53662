//! Forward best-first search over states, with grounded actions as edges.
//!
//! Nodes live in a [`SearchTree`] indexed by state. A node's back-pointer is the index of
//! its predecessor, so the tree owns every node and parents are never owned by children.
//! The frontier is keyed by node, ordered by ascending `f = g + h` and then by insertion
//! order. Improving an open node's cost re-prioritises its existing frontier entry.
use std::{
    cmp::Reverse,
    collections::{BTreeSet, HashMap},
    rc::Rc,
};

use priority_queue::PriorityQueue;
use tracing::{debug, trace};

use super::{fact::Fact, heuristic::Heuristic, plan::Plan, schema::GroundedAction, state::State};

pub type NodeId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Open,
    Closed,
}

#[derive(Debug)]
pub struct Node {
    state: Rc<State>,
    parent: Option<NodeId>,
    action: Option<usize>,
    g: u32,
    h: u32,
    status: Status,
}

impl Node {
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn action(&self) -> Option<usize> {
        self.action
    }

    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn h(&self) -> u32 {
        self.h
    }

    pub fn f(&self) -> u32 {
        self.g + self.h
    }

    pub fn status(&self) -> Status {
        self.status
    }
}

#[derive(Debug, Default)]
pub struct SearchTree {
    nodes: Vec<Node>,
    index: HashMap<Rc<State>, NodeId>,
}

impl SearchTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn id_of(&self, state: &State) -> Option<NodeId> {
        self.index.get(state).copied()
    }

    pub fn lookup(&self, state: &State) -> Option<&Node> {
        self.id_of(state).map(|id| &self.nodes[id])
    }

    fn insert(&mut self, state: State, parent: Option<NodeId>, action: Option<usize>, g: u32, h: u32) -> NodeId {
        let id = self.nodes.len();
        let state = Rc::new(state);
        self.index.insert(Rc::clone(&state), id);
        self.nodes.push(Node { state, parent, action, g, h, status: Status::Open });
        id
    }

    pub fn extract_plan(&self, terminal: &State, actions: &[GroundedAction]) -> Option<Plan> {
        self.id_of(terminal).map(|id| self.plan_to(id, actions))
    }

    fn plan_to(&self, terminal: NodeId, actions: &[GroundedAction]) -> Plan {
        // g strictly decreases along parent links, so the walk ends at the root.
        let mut steps = Vec::new();
        let mut current = &self.nodes[terminal];
        while let (Some(parent), Some(action)) = (current.parent, current.action) {
            steps.push(actions[action].clone());
            current = &self.nodes[parent];
        }
        steps.reverse();
        Plan::new(steps)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub grounded_actions: usize,
    pub expanded: usize,
    pub generated: usize,
    pub relaxed: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Solved(Plan),
    Unsolvable,
    Exhausted,
}

impl SearchOutcome {
    pub fn plan(&self) -> Option<&Plan> {
        match self {
            SearchOutcome::Solved(plan) => Some(plan),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SearchOutcome::Solved(_))
    }
}

pub struct Search<'a> {
    actions: &'a [GroundedAction],
    goal: &'a BTreeSet<Fact>,
    heuristic: &'a dyn Heuristic,
    max_expansions: Option<usize>,
    tree: SearchTree,
    frontier: PriorityQueue<NodeId, Reverse<(u32, u64)>>,
    pushes: u64,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    pub fn new(actions: &'a [GroundedAction], goal: &'a BTreeSet<Fact>, heuristic: &'a dyn Heuristic) -> Self {
        Self {
            actions,
            goal,
            heuristic,
            max_expansions: None,
            tree: SearchTree::default(),
            frontier: PriorityQueue::new(),
            pushes: 0,
            stats: SearchStats::default(),
        }
    }

    pub fn with_max_expansions(mut self, limit: Option<usize>) -> Self {
        self.max_expansions = limit;
        self
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    fn push(&mut self, id: NodeId) {
        let f = self.tree.nodes[id].f();
        let seq = self.pushes;
        self.pushes += 1;
        self.frontier.push(id, Reverse((f, seq)));
    }

    /// Searches from `start` until a goal state is popped, the frontier empties or the
    /// budget runs out. Any previous run's tree is discarded.
    pub fn run(&mut self, start: &State) -> SearchOutcome {
        let actions = self.actions;
        let goal = self.goal;
        self.tree = SearchTree::default();
        self.frontier = PriorityQueue::new();
        self.pushes = 0;
        self.stats = SearchStats { grounded_actions: actions.len(), ..SearchStats::default() };

        let h = self.heuristic.estimate(start, goal);
        let root = self.tree.insert(start.clone(), None, None, 0, h);
        self.push(root);

        while let Some((id, _)) = self.frontier.pop() {
            let node = &self.tree.nodes[id];
            if node.state.satisfies(goal) {
                debug!(g = node.g, expanded = self.stats.expanded, "goal reached");
                return SearchOutcome::Solved(self.tree.plan_to(id, actions));
            }
            if node.status == Status::Closed {
                continue;
            }
            if let Some(limit) = self.max_expansions {
                if self.stats.expanded >= limit {
                    debug!(limit, discovered = self.tree.len(), "expansion budget exhausted");
                    return SearchOutcome::Exhausted;
                }
            }
            self.expand(id);
        }
        debug!(expanded = self.stats.expanded, discovered = self.tree.len(), "frontier exhausted, no plan");
        SearchOutcome::Unsolvable
    }

    fn expand(&mut self, id: NodeId) {
        let actions = self.actions;
        let goal = self.goal;
        let heuristic = self.heuristic;
        let (state, g) = {
            let node = &mut self.tree.nodes[id];
            node.status = Status::Closed;
            (Rc::clone(&node.state), node.g)
        };
        self.stats.expanded += 1;
        trace!(node = id, g, state = %state, "expanding");

        let cost = g + 1;
        for (idx, action) in actions.iter().enumerate() {
            if !state.is_applicable(action) {
                continue;
            }
            let successor = state.apply(action);
            self.stats.generated += 1;
            match self.tree.id_of(&successor) {
                None => {
                    let h = heuristic.estimate(&successor, goal);
                    let child = self.tree.insert(successor, Some(id), Some(idx), cost, h);
                    self.push(child);
                }
                Some(known) => {
                    let node = &mut self.tree.nodes[known];
                    if node.status == Status::Closed || cost >= node.g {
                        continue;
                    }
                    node.g = cost;
                    node.parent = Some(id);
                    node.action = Some(idx);
                    self.stats.relaxed += 1;
                    self.push(known);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{Search, SearchOutcome, Status};
    use crate::strips::{
        fact::{Fact, Symbol},
        heuristic::Zero,
        schema::GroundedAction,
        state::State,
    };

    fn at(place: &str) -> Fact {
        Fact::new("At", [place])
    }

    fn go(from: &str, to: &str) -> GroundedAction {
        GroundedAction::new(
            Symbol::new("Go"),
            vec![Symbol::new(from), Symbol::new(to)],
            vec![at(from)],
            vec![at(to), at(from).negated()],
        )
    }

    fn start(place: &str) -> State {
        vec![at(place)].into_iter().collect()
    }

    fn names(outcome: &SearchOutcome) -> Vec<String> {
        outcome.plan().map(|p| p.iter().map(ToString::to_string).collect()).unwrap_or_default()
    }

    #[test]
    fn test_shortest_path() {
        // S-1-2-G is longer than S-3-G
        let actions = vec![go("S", "N1"), go("N1", "N2"), go("N2", "G"), go("S", "N3"), go("N3", "G")];
        let goal = BTreeSet::from([at("G")]);
        let mut search = Search::new(&actions, &goal, &Zero);
        let outcome = search.run(&start("S"));
        assert_eq!(names(&outcome), vec!["Go(S,N3)", "Go(N3,G)"]);
        assert_eq!(search.stats().relaxed, 0);
    }

    #[test]
    fn test_goal_already_satisfied() {
        let actions = vec![go("S", "G")];
        let goal = BTreeSet::from([at("S")]);
        let mut search = Search::new(&actions, &goal, &Zero);
        let outcome = search.run(&start("S"));
        assert_eq!(outcome.plan().map(|p| p.len()), Some(0));
        assert_eq!(search.stats().expanded, 0);
    }

    #[test]
    fn test_unsolvable_terminates() {
        // cycle S <-> A, G unreachable
        let actions = vec![go("S", "A"), go("A", "S"), go("B", "G")];
        let goal = BTreeSet::from([at("G")]);
        let mut search = Search::new(&actions, &goal, &Zero);
        assert_eq!(search.run(&start("S")), SearchOutcome::Unsolvable);
        assert_eq!(search.stats().expanded, 2);
        assert_eq!(search.tree().len(), 2);
        assert!((0..search.tree().len()).all(|id| search.tree().node(id).status() == Status::Closed));
    }

    #[test]
    fn test_budget_exhausted() {
        let actions = vec![go("S", "N1"), go("N1", "N2"), go("N2", "G")];
        let goal = BTreeSet::from([at("G")]);
        let mut search = Search::new(&actions, &goal, &Zero).with_max_expansions(Some(2));
        assert_eq!(search.run(&start("S")), SearchOutcome::Exhausted);
        assert_eq!(search.stats().expanded, 2);

        let mut search = Search::new(&actions, &goal, &Zero).with_max_expansions(Some(3));
        assert!(search.run(&start("S")).is_solved());
    }

    #[test]
    fn test_relaxation_updates_parent() {
        // S-A-C-B and S-D-B. The heuristic makes D look expensive, so B is first reached
        // through C and later improved through D.
        let actions = vec![go("S", "A"), go("A", "C"), go("C", "B"), go("S", "D"), go("D", "B")];
        let goal = BTreeSet::from([at("B")]);
        let misleading = |s: &State, _: &BTreeSet<Fact>| -> u32 {
            if s.contains(&at("D")) {
                2
            } else if s.contains(&at("B")) {
                5
            } else {
                0
            }
        };
        let mut search = Search::new(&actions, &goal, &misleading);
        let outcome = search.run(&start("S"));
        assert_eq!(names(&outcome), vec!["Go(S,D)", "Go(D,B)"]);
        assert_eq!(search.stats().relaxed, 1);
        let b = search.tree().lookup(&start("B")).expect("B discovered");
        assert_eq!(b.g(), 2);
        assert_eq!(b.f(), 7);
    }

    #[test]
    fn test_extract_plan_by_state() {
        let actions = vec![go("S", "A"), go("A", "G")];
        let goal = BTreeSet::from([at("G")]);
        let mut search = Search::new(&actions, &goal, &Zero);
        let outcome = search.run(&start("S"));
        let by_state = search.tree().extract_plan(&start("G"), &actions);
        assert_eq!(by_state.as_ref(), outcome.plan());
        assert_eq!(search.tree().extract_plan(&start("S"), &actions).map(|p| p.len()), Some(0));
        assert!(search.tree().extract_plan(&start("Z"), &actions).is_none());
    }
}
