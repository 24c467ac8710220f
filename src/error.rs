//! Typed errors for state construction and search pre-flight checks.
//!
//! Running out of frontier is not an error: [`crate::search::graph_search`]
//! reports it as `None`.

use std::fmt;

use crate::state::Disk;

/// Failure to place a disk while building a [`crate::state::State`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Disk ids start at 1.
    NonPositiveDisk,
    /// Only rods 0, 1 and 2 exist.
    BadRod(usize),
    /// The disk is not smaller than the one already on top of the rod.
    OutOfOrder { disk: Disk, rod: usize, top: Disk },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveDisk => write!(f, "disk ids must be greater than 0"),
            Self::BadRod(rod) => write!(f, "rod {rod} does not exist (rods are 0, 1 and 2)"),
            Self::OutOfOrder { disk, rod, top } => {
                write!(f, "cannot place disk {disk} on rod {rod}: top disk {top} is not larger")
            }
        }
    }
}

impl std::error::Error for StateError {}

/// Failure detected before any search step is taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A puzzle needs at least one disk.
    InvalidDiskCount(u32),
    /// The start and goal hold different sets of disks, so the goal can never be reached.
    DiskSetMismatch { initial: Vec<Disk>, goal: Vec<Disk> },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDiskCount(n) => {
                write!(f, "number of disks must be greater than 0 (got {n})")
            }
            Self::DiskSetMismatch { initial, goal } => write!(
                f,
                "initial state holds disks {initial:?} but goal state holds {goal:?}; no path can exist"
            ),
        }
    }
}

impl std::error::Error for SearchError {}
