//! Best-first graph search from one [`State`] to another.
//!
//! Paths are ordered by `moves so far + disks still on rod 0`. A state counts
//! as explored as soon as it is first generated, not when it is expanded, so
//! no state ever sits on the frontier twice. The price is that a state keeps
//! the first path that reached it even if a cheaper one turns up later.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use tracing::{debug, trace, warn};

use crate::error::SearchError;
use crate::state::State;

/// A non-empty sequence of states, each one legal move from the previous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    states: Vec<State>,
}

impl Path {
    pub fn new(start: State) -> Self {
        Self {
            states: vec![start],
        }
    }

    /// This path followed by `next`.
    pub fn extended(&self, next: State) -> Self {
        let mut states = Vec::with_capacity(self.states.len() + 1);
        states.extend_from_slice(&self.states);
        states.push(next);
        Self { states }
    }

    /// Number of moves made; the starting state does not count.
    pub fn moves(&self) -> usize {
        self.states.len() - 1
    }

    /// Moves made plus the disks left on rod 0.
    pub fn cost(&self) -> usize {
        self.moves() + heuristic(self.last())
    }

    pub fn first(&self) -> &State {
        &self.states[0]
    }

    pub fn last(&self) -> &State {
        &self.states[self.states.len() - 1]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always `false`; a path holds at least its starting state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl IntoIterator for Path {
    type Item = State;
    type IntoIter = std::vec::IntoIter<State>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a State;
    type IntoIter = std::slice::Iter<'a, State>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

/// Disks not yet moved off the start rod.
pub fn heuristic(state: &State) -> usize {
    state.num_disks_on_rod(0)
}

/// Counters gathered during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Paths popped from the frontier.
    pub expanded: usize,
    /// Paths pushed onto the frontier, the starting path excluded.
    pub generated: usize,
    /// Largest frontier size seen.
    pub frontier_high_water: usize,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// `None` when the frontier ran dry before reaching the goal.
    pub path: Option<Path>,
    pub stats: SearchStats,
}

/// `BinaryHeap` is a max-heap; the reversed key pops the cheapest path first.
#[derive(Debug)]
struct FrontierEntry {
    key: Reverse<usize>,
    path: Path,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Paths waiting to be expanded, cheapest first. Ties pop in no particular order.
#[derive(Debug, Default)]
struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    high_water: usize,
}

impl Frontier {
    fn push(&mut self, path: Path) {
        self.heap.push(FrontierEntry {
            key: Reverse(path.cost()),
            path,
        });
        self.high_water = self.high_water.max(self.heap.len());
    }

    fn pop(&mut self) -> Option<Path> {
        self.heap.pop().map(|entry| entry.path)
    }
}

/// Shortest path from `initial` to `goal`, or `None` if the goal is unreachable.
pub fn graph_search(initial: &State, goal: &State) -> Option<Path> {
    graph_search_with_stats(initial, goal).path
}

/// Like [`graph_search`], also reporting how much work the search did.
pub fn graph_search_with_stats(initial: &State, goal: &State) -> SearchOutcome {
    debug!(disks = initial.num_disks(), "starting search");

    let mut stats = SearchStats::default();
    let mut explored: HashSet<State> = HashSet::new();
    let mut frontier = Frontier::default();
    frontier.push(Path::new(initial.clone()));

    while let Some(path) = frontier.pop() {
        stats.expanded += 1;
        let current = path.last();
        explored.insert(current.clone());
        trace!(cost = path.cost(), moves = path.moves(), "expanding");

        if current == goal {
            stats.frontier_high_water = frontier.high_water;
            debug!(
                moves = path.moves(),
                expanded = stats.expanded,
                generated = stats.generated,
                frontier_high_water = stats.frontier_high_water,
                "goal reached"
            );
            return SearchOutcome {
                path: Some(path),
                stats,
            };
        }

        for next in current.legal_successors() {
            // Marked on discovery so later routes to the same state are dropped.
            if explored.insert(next.clone()) {
                frontier.push(path.extended(next));
                stats.generated += 1;
            }
        }
    }

    stats.frontier_high_water = frontier.high_water;
    warn!(
        explored = explored.len(),
        expanded = stats.expanded,
        "frontier exhausted without reaching the goal"
    );
    SearchOutcome { path: None, stats }
}

/// Solves the `num_disks` puzzle: every disk from rod 0 to rod 2.
pub fn solve(num_disks: u32) -> Result<SearchOutcome, SearchError> {
    if num_disks == 0 {
        return Err(SearchError::InvalidDiskCount(num_disks));
    }
    let initial = State::stacked(num_disks, 0);
    let goal = State::stacked(num_disks, 2);
    Ok(graph_search_with_stats(&initial, &goal))
}

/// Searches between two arbitrary states after checking they hold the same disks.
pub fn solve_between(initial: &State, goal: &State) -> Result<SearchOutcome, SearchError> {
    let (initial_disks, goal_disks) = (initial.disks(), goal.disks());
    if initial_disks != goal_disks {
        return Err(SearchError::DiskSetMismatch {
            initial: initial_disks,
            goal: goal_disks,
        });
    }
    Ok(graph_search_with_stats(initial, goal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Move;

    #[test]
    fn path_cost_counts_moves_and_disks_on_start_rod() {
        let start = State::stacked(3, 0);
        let path = Path::new(start.clone());
        assert_eq!(path.moves(), 0);
        assert_eq!(path.cost(), 3);

        let next = start.try_move(Move { disk: 1, from: 0, to: 2 }).unwrap();
        let path = path.extended(next);
        assert_eq!(path.moves(), 1);
        assert_eq!(path.cost(), 1 + 2);
        assert_eq!(path.first(), &start);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn frontier_pops_cheapest_first() {
        let start = State::stacked(2, 0);
        let one_move = Path::new(start.clone())
            .extended(start.try_move(Move { disk: 1, from: 0, to: 1 }).unwrap());
        let goal_only = Path::new(State::stacked(2, 2));

        let mut frontier = Frontier::default();
        frontier.push(Path::new(start.clone())); // cost 2
        frontier.push(one_move.clone()); // cost 2
        frontier.push(goal_only.clone()); // cost 0
        assert_eq!(frontier.high_water, 3);

        assert_eq!(frontier.pop(), Some(goal_only));
        let second = frontier.pop().unwrap();
        let third = frontier.pop().unwrap();
        assert_eq!(second.cost(), 2);
        assert_eq!(third.cost(), 2);
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn small_puzzles_are_solved_optimally() {
        for (disks, expected) in [(1, 1), (2, 3), (3, 7), (4, 15)] {
            let path = solve(disks).unwrap().path.expect("goal is reachable");
            assert_eq!(path.moves(), expected, "{disks} disks");
        }
    }

    #[test]
    fn path_steps_are_single_legal_moves() {
        let path = solve(4).unwrap().path.unwrap();
        for pair in path.states().windows(2) {
            assert!(
                pair[0].move_between(&pair[1]).is_some(),
                "consecutive states must be one move apart"
            );
        }
    }

    #[test]
    fn start_equal_to_goal_needs_no_moves() {
        let state = State::stacked(3, 1);
        let path = graph_search(&state, &state).unwrap();
        assert_eq!(path.moves(), 0);
        assert_eq!(path.states(), &[state]);
    }

    #[test]
    fn stats_stay_within_the_state_space() {
        let outcome = solve(5).unwrap();
        let stats = outcome.stats;
        assert!(outcome.path.is_some());
        assert!(stats.expanded >= 32, "at least one expansion per step plus the goal");
        assert!(stats.generated < 3usize.pow(5));
        assert!(stats.expanded <= stats.generated + 1);
        assert!(stats.frontier_high_water >= 1);
    }

    #[test]
    fn mismatched_disk_counts_exhaust_the_frontier() {
        let outcome = graph_search_with_stats(&State::stacked(3, 0), &State::stacked(2, 2));
        assert!(outcome.path.is_none());
        // Every arrangement of 3 disks is visited once.
        assert_eq!(outcome.stats.expanded, 27);
    }

    #[test]
    fn solve_between_rejects_mismatched_disks() {
        let err = solve_between(&State::stacked(3, 0), &State::stacked(2, 2)).unwrap_err();
        assert_eq!(
            err,
            SearchError::DiskSetMismatch {
                initial: vec![1, 2, 3],
                goal: vec![1, 2],
            }
        );
    }

    #[test]
    fn solve_rejects_zero_disks() {
        assert_eq!(solve(0).unwrap_err(), SearchError::InvalidDiskCount(0));
    }
}
