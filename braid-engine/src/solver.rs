use crate::moves::Move;
use crate::types::{BraidWord, Generator};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

/// How far beyond the start length insertion moves may grow a word.
///
/// Bounds the search space: in principle an insert-then-reduce detour can
/// need arbitrarily large intermediate words, so capping growth trades
/// completeness for bounded cost. Words whose shortest reduction needs more
/// headroom than this come back as `None`.
const GROWTH_ALLOWANCE: usize = 6;

/// A frontier entry: a word snapshot with its accumulated cost, the move
/// history that produced it, and an insertion sequence number.
struct Node {
    /// Scaled f-value: `2 * cost + len`. Ordering by this integer is the
    /// same total order as `cost + len/2` without fractional arithmetic.
    priority: u64,
    /// Moves taken from the start word (the g-value).
    cost: u32,
    /// Monotonic insertion counter: equal-priority entries pop
    /// first-in-first-out, making the search order total and reproducible.
    seq: u64,
    word: Vec<Generator>,
    history: Vec<Move>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the lowest (priority, seq)
        // pops first.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A* search for the shortest move sequence reducing a word to the empty
/// (identity) word.
///
/// The heuristic is `len/2`: RemovePair is the only move that shortens a
/// word and it removes exactly two generators, so at least `len/2` moves
/// remain — the estimate never overshoots, which makes the first goal pop
/// optimal. Two invocations on the same start word walk the frontier in the
/// same order and return the same sequence; there is no randomness and no
/// shared state, so independent solves may run concurrently.
#[derive(Debug, Clone)]
pub struct OptimalReducer {
    n_strands: usize,
    max_len: usize,
}

impl OptimalReducer {
    /// Creates a reducer for words on `n_strands` strands whose
    /// intermediate states must stay under `max_len` generators (the
    /// fixed-width cap of the external encoding).
    /// Panics if `n_strands < 2`, like the word constructors.
    pub fn new(n_strands: usize, max_len: usize) -> Self {
        assert!(n_strands >= 2, "braid group needs n_strands >= 2");
        OptimalReducer { n_strands, max_len }
    }

    /// Searches for a minimal move sequence from `start` to the empty word.
    ///
    /// Returns `Some(moves)` with the shortest sequence by move count,
    /// `Some(vec![])` if `start` is already empty, and `None` when the
    /// deadline elapses or the bounded frontier is exhausted — the growth
    /// cap makes the search incomplete by design, so `None` also covers
    /// words that are reducible only through larger intermediate words.
    ///
    /// The deadline is wall-clock and checked once per frontier pop, so the
    /// search can run at most one full expansion past it.
    pub fn solve(&self, start: &BraidWord, deadline: Duration) -> Option<Vec<Move>> {
        let start_time = Instant::now();
        let initial: Vec<Generator> = start.generators().to_vec();

        if initial.is_empty() {
            return Some(Vec::new());
        }

        let growth_limit = initial.len() + GROWTH_ALLOWANCE;
        let insert_cap = self.max_len.saturating_sub(2);

        let mut frontier: BinaryHeap<Node> = BinaryHeap::new();
        let mut visited_cost: HashMap<Vec<Generator>, u32> = HashMap::new();
        let mut seq: u64 = 0;

        visited_cost.insert(initial.clone(), 0);
        frontier.push(Node {
            priority: initial.len() as u64,
            cost: 0,
            seq,
            word: initial,
            history: Vec::new(),
        });

        while let Some(node) = frontier.pop() {
            if start_time.elapsed() > deadline {
                return None; // Timeout
            }

            // Stale entry: a cheaper path to this word was pushed later.
            if let Some(&best) = visited_cost.get(&node.word) {
                if best < node.cost {
                    continue;
                }
            }

            if node.word.is_empty() {
                return Some(node.history);
            }

            let current = BraidWord::from_generators(self.n_strands, node.word.clone());
            let len = node.word.len();

            let mut successors: Vec<(Move, Vec<Generator>)> = Vec::new();

            for i in 0..len.saturating_sub(1) {
                if current.check_commutation(i) {
                    let mut next = node.word.clone();
                    next.swap(i, i + 1);
                    successors.push((Move::Commute(i), next));
                }
            }

            for i in 0..len.saturating_sub(2) {
                if current.check_braid_relation(i) {
                    let mut next = node.word.clone();
                    let (a, b) = (next[i], next[i + 1]);
                    next[i] = b;
                    next[i + 1] = a;
                    next[i + 2] = b;
                    successors.push((Move::BraidRelation(i), next));
                }
            }

            for i in 0..len.saturating_sub(1) {
                if current.check_remove_pair(i) {
                    let mut next = node.word.clone();
                    next.drain(i..i + 2);
                    successors.push((Move::RemovePair(i), next));
                }
            }

            if len < insert_cap && len < growth_limit {
                for i in 0..=len {
                    for k in 1..self.n_strands {
                        let gen = Generator::Sigma(k);
                        let mut next = node.word.clone();
                        next.insert(i, gen);
                        next.insert(i + 1, gen.inverse());
                        successors.push((Move::InsertPair(i, gen), next));
                    }
                }
            }

            for (mv, next) in successors {
                let next_cost = node.cost + 1;
                let improves = match visited_cost.get(&next) {
                    Some(&known) => next_cost < known,
                    None => true,
                };
                if improves {
                    visited_cost.insert(next.clone(), next_cost);
                    seq += 1;
                    let mut history = node.history.clone();
                    history.push(mv);
                    frontier.push(Node {
                        priority: 2 * u64::from(next_cost) + next.len() as u64,
                        cost: next_cost,
                        seq,
                        word: next,
                        history,
                    });
                }
            }
        }

        None // Frontier exhausted within the growth cap
    }
}
