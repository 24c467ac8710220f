//! Shortest solutions to the three-rod Tower of Hanoi by best-first search.

pub mod error;
pub mod search;
pub mod state;

pub use error::{SearchError, StateError};
pub use search::{
    graph_search, graph_search_with_stats, solve, solve_between, Path, SearchOutcome, SearchStats,
};
pub use state::{Disk, Move, State, NUM_RODS};
