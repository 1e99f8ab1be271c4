//! Unit-ordering chromosome.
//!
//! # Encoding
//!
//! A chromosome is a permutation of candidate-pool indices. Decoding hands
//! the permutation to the constructive scheduler, which takes units in that
//! order (subject to its no-repeat and preference rules).
//!
//! All operators keep the permutation property: every pool index appears
//! exactly once.

use rand::seq::SliceRandom;
use rand::Rng;

use super::runner::Individual;

/// Permutation chromosome over pool indices.
///
/// Higher fitness = better schedule (maximization convention).
#[derive(Debug, Clone, PartialEq)]
pub struct UnitOrdering {
    /// Pool indices in placement order.
    pub genes: Vec<usize>,
    /// Composite fitness; `NEG_INFINITY` until evaluated or when infeasible.
    pub fitness: f64,
}

impl Individual for UnitOrdering {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

impl UnitOrdering {
    pub fn new(genes: Vec<usize>) -> Self {
        Self {
            genes,
            fitness: f64::NEG_INFINITY,
        }
    }

    /// Identity ordering `0..len`.
    pub fn identity(len: usize) -> Self {
        Self::new((0..len).collect())
    }

    /// Uniformly shuffled ordering.
    pub fn random<R: Rng>(len: usize, rng: &mut R) -> Self {
        let mut genes: Vec<usize> = (0..len).collect();
        genes.shuffle(rng);
        Self::new(genes)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Whether the genes are a permutation of `0..len`.
    pub fn is_valid(&self) -> bool {
        let mut seen = vec![false; self.genes.len()];
        self.genes.iter().all(|&g| {
            if g >= seen.len() || seen[g] {
                false
            } else {
                seen[g] = true;
                true
            }
        })
    }
}

// ======================== Crossover operators ========================

/// Single-point order-preserving crossover.
///
/// Child 1 keeps parent 1's genes up to the cut, then takes the missing
/// genes in parent 2's order. Child 2 is the mirror image.
pub fn one_point_crossover<R: Rng>(
    p1: &UnitOrdering,
    p2: &UnitOrdering,
    rng: &mut R,
) -> (UnitOrdering, UnitOrdering) {
    let len = p1.len();
    if len < 2 {
        return (p1.clone(), p2.clone());
    }
    let cut = rng.random_range(1..len);
    (
        UnitOrdering::new(prefix_then_fill(&p1.genes, &p2.genes, cut)),
        UnitOrdering::new(prefix_then_fill(&p2.genes, &p1.genes, cut)),
    )
}

fn prefix_then_fill(head: &[usize], tail: &[usize], cut: usize) -> Vec<usize> {
    let mut used = vec![false; head.len()];
    let mut genes = Vec::with_capacity(head.len());
    for &g in &head[..cut] {
        used[g] = true;
        genes.push(g);
    }
    genes.extend(tail.iter().copied().filter(|&g| !used[g]));
    genes
}

/// Linear Order Crossover.
///
/// Keeps a random segment of one parent in place and fills the remaining
/// positions with the other parent's genes in order.
///
/// # Reference
/// Falkenauer & Bouffouix (1991)
pub fn lox_crossover<R: Rng>(
    p1: &UnitOrdering,
    p2: &UnitOrdering,
    rng: &mut R,
) -> (UnitOrdering, UnitOrdering) {
    let len = p1.len();
    if len < 2 {
        return (p1.clone(), p2.clone());
    }
    let a = rng.random_range(0..len);
    let b = rng.random_range(0..len);
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    (
        UnitOrdering::new(lox_child(&p1.genes, &p2.genes, start, end)),
        UnitOrdering::new(lox_child(&p2.genes, &p1.genes, start, end)),
    )
}

fn lox_child(keep: &[usize], fill: &[usize], start: usize, end: usize) -> Vec<usize> {
    let len = keep.len();
    let mut used = vec![false; len];
    for &g in &keep[start..=end] {
        used[g] = true;
    }
    let mut rest = fill.iter().copied().filter(|&g| !used[g]);
    (0..len)
        .map(|i| {
            if (start..=end).contains(&i) {
                keep[i]
            } else {
                rest.next().unwrap_or(keep[i])
            }
        })
        .collect()
}

// ======================== Mutation operators ========================

/// Swaps two random positions.
pub fn swap_mutation<R: Rng>(ordering: &mut UnitOrdering, rng: &mut R) {
    let len = ordering.len();
    if len < 2 {
        return;
    }
    let i = rng.random_range(0..len);
    let j = rng.random_range(0..len);
    ordering.genes.swap(i, j);
}

/// Removes a gene and reinserts it at a random position.
pub fn insert_mutation<R: Rng>(ordering: &mut UnitOrdering, rng: &mut R) {
    let len = ordering.len();
    if len < 2 {
        return;
    }
    let from = rng.random_range(0..len);
    let to = rng.random_range(0..len);
    let gene = ordering.genes.remove(from);
    ordering.genes.insert(to, gene);
}
