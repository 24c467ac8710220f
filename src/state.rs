use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

use crate::error::StateError;

/// A disk id. Larger ids are larger disks; disk `n` is the largest of an `n`-disk puzzle.
pub type Disk = u32;

/// A rod's disks, bottom to top. Always strictly decreasing.
pub type Rod = Vec<Disk>;

pub const NUM_RODS: usize = 3;

/// Columns left blank between two rods in the rendering.
const ROD_GAP: usize = 2;

/// Moving the top disk of one rod onto another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub disk: Disk,
    pub from: usize,
    pub to: usize,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "move disk {} from rod {} to rod {}",
            self.disk, self.from, self.to
        )
    }
}

/// One legal arrangement of disks over the three rods.
///
/// States are plain values: deriving a successor clones the rods, so sibling
/// states never share storage. Equality and hashing compare rod contents only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct State {
    rods: [Rod; NUM_RODS],
}

impl State {
    /// Three empty rods.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disks `num_disks..=1` stacked on `rod`, largest at the bottom.
    ///
    /// # Panics
    ///
    /// Panics if `rod` is not 0, 1 or 2.
    pub fn stacked(num_disks: u32, rod: usize) -> Self {
        let mut state = Self::new();
        for disk in (1..=num_disks).rev() {
            state.add_disk(disk, rod);
        }
        state
    }

    /// Places `disk` on top of `rod`.
    ///
    /// # Panics
    ///
    /// Panics when the placement breaks the ordering rules; see [`State::try_add_disk`].
    pub fn add_disk(&mut self, disk: Disk, rod: usize) {
        if let Err(err) = self.try_add_disk(disk, rod) {
            panic!("{err}");
        }
    }

    /// Places `disk` on top of `rod`, which must be empty or topped by a larger disk.
    ///
    /// Build a state by adding disks largest first.
    pub fn try_add_disk(&mut self, disk: Disk, rod: usize) -> Result<(), StateError> {
        if disk == 0 {
            return Err(StateError::NonPositiveDisk);
        }
        let target = self.rods.get_mut(rod).ok_or(StateError::BadRod(rod))?;
        if let Some(&top) = target.last() {
            if top <= disk {
                return Err(StateError::OutOfOrder { disk, rod, top });
            }
        }
        target.push(disk);
        Ok(())
    }

    pub fn num_disks_on_rod(&self, rod: usize) -> usize {
        self.rods[rod].len()
    }

    pub fn rod(&self, rod: usize) -> &[Disk] {
        &self.rods[rod]
    }

    pub fn top_disk(&self, rod: usize) -> Option<Disk> {
        self.rods[rod].last().copied()
    }

    pub fn num_disks(&self) -> usize {
        self.rods.iter().map(Vec::len).sum()
    }

    /// The largest disk present, or 0 for an empty state.
    pub fn max_disk(&self) -> Disk {
        // Bottom disks are the largest of each rod.
        self.rods
            .iter()
            .filter_map(|rod| rod.first().copied())
            .max()
            .unwrap_or(0)
    }

    /// Every disk in the state, smallest first.
    pub fn disks(&self) -> Vec<Disk> {
        let mut disks: Vec<Disk> = self.rods.iter().flatten().copied().collect();
        disks.sort_unstable();
        disks
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        if mv.from >= NUM_RODS || mv.to >= NUM_RODS || mv.from == mv.to {
            return false;
        }
        match (self.top_disk(mv.from), self.top_disk(mv.to)) {
            (Some(disk), None) => disk == mv.disk,
            (Some(disk), Some(top)) => disk == mv.disk && top > disk,
            (None, _) => false,
        }
    }

    /// All legal moves, by source rod and then destination rod.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(NUM_RODS * (NUM_RODS - 1));
        for from in 0..NUM_RODS {
            let Some(disk) = self.top_disk(from) else {
                continue;
            };
            for to in (0..NUM_RODS).filter(|&to| to != from) {
                let mv = Move { disk, from, to };
                if self.is_legal(mv) {
                    moves.push(mv);
                }
            }
        }
        moves
    }

    /// The state after `mv`, or `None` if `mv` is not legal here.
    pub fn try_move(&self, mv: Move) -> Option<Self> {
        if !self.is_legal(mv) {
            return None;
        }
        let mut next = self.clone();
        next.rods[mv.from].pop();
        next.rods[mv.to].push(mv.disk);
        Some(next)
    }

    /// Every state one legal move away, in [`State::legal_moves`] order.
    pub fn legal_successors(&self) -> Vec<Self> {
        self.legal_moves()
            .into_iter()
            .filter_map(|mv| self.try_move(mv))
            .collect()
    }

    /// The single move leading from `self` to `next`, if they are adjacent.
    pub fn move_between(&self, next: &Self) -> Option<Move> {
        self.legal_moves()
            .into_iter()
            .find(|&mv| self.try_move(mv).as_ref() == Some(next))
    }

    /// Random walk of `steps` legal moves starting from this state.
    ///
    /// A move is never undone straight away unless it is the only one available.
    pub fn scramble<R: Rng + ?Sized>(&self, steps: usize, rng: &mut R) -> Self {
        let mut current = self.clone();
        let mut last: Option<Move> = None;

        for _ in 0..steps {
            let mut moves = current.legal_moves();
            if let Some(prev) = last {
                if moves.len() > 1 {
                    moves.retain(|mv| !(mv.from == prev.to && mv.to == prev.from));
                }
            }
            let Some(&mv) = moves.choose(rng) else {
                break;
            };
            if let Some(next) = current.try_move(mv) {
                current = next;
                last = Some(mv);
            }
        }

        current
    }
}

/// ASCII drawing of the rods: each rod is a `|` column and each disk a bar of
/// `_` whose half-width is its id.
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max = self.max_disk() as usize;
        let rod_width = max * 2 + 1;
        let width = rod_width * NUM_RODS + (NUM_RODS - 1) * ROD_GAP;
        let mut grid = vec![vec![' '; width]; max];

        for (index, rod) in self.rods.iter().enumerate() {
            let centre = index * (rod_width + ROD_GAP) + max;
            for line in grid.iter_mut() {
                line[centre] = '|';
            }
            for (pos, &disk) in rod.iter().enumerate() {
                let line = &mut grid[max - 1 - pos];
                let disk = disk as usize;
                for x in (centre - disk..=centre + disk).filter(|&x| x != centre) {
                    line[x] = '_';
                }
            }
        }

        for line in grid {
            writeln!(f, "{}", line.into_iter().collect::<String>())?;
        }
        Ok(())
    }
}
