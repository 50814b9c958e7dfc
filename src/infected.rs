//! Set of infected vertices V^I with cached |V^I| and Σ k over V^I.
//!
//! • O(1) insert, remove-by-position and uniform sampling.
//! • Membership lives in a bitset, the vertices in a swap-remove list.
//! • Works together with [`Graph`] and the event engine.

use bitvec::prelude::*;
use rand::Rng;
use crate::graph::Graph;

/// Mutable infection state of one sample, bound to a single [`Graph`].
#[derive(Clone, Debug)]
pub struct InfectedSet<'g> {
    graph:      &'g Graph,
    /// σ_v = 1 ⇔ v is infected.
    status:     BitVec,
    /// Infected vertices, order irrelevant; `occ.len()` is N_I.
    occ:        Vec<usize>,
    /// N_k = Σ k_v for v in `occ`.
    degree_sum: usize,
}

/*───────────────────────── impl ─────────────────────────*/

impl<'g> InfectedSet<'g> {
    /* constructors */

    /// Everyone susceptible.
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            status: bitvec![0; graph.n()],
            occ: Vec::with_capacity(graph.n()),
            degree_sum: 0,
        }
    }

    /* queries */

    #[inline] pub fn size(&self) -> usize              { self.occ.len() }
    #[inline] pub fn is_empty(&self) -> bool           { self.occ.is_empty() }
    #[inline] pub fn degree_sum(&self) -> usize        { self.degree_sum }
    #[inline] pub fn vertices(&self) -> &[usize]       { &self.occ }
    #[inline] pub fn graph(&self) -> &'g Graph         { self.graph }
    #[inline] pub fn is_infected(&self, v: usize) -> bool { self.status[v] }

    /// Vertex stored at `pos` in the list.
    #[inline] pub fn vertex_at(&self, pos: usize) -> usize { self.occ[pos] }

    /// Infected fraction N_I / N.
    pub fn fraction(&self) -> f64 {
        if self.graph.n() == 0 { 0.0 }
        else { self.occ.len() as f64 / self.graph.n() as f64 }
    }

    /// Uniform position in `[0, N_I)`. Requires a non-empty set.
    #[inline]
    pub fn sample_uniform<R>(&self, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        debug_assert!(!self.occ.is_empty());
        rng.gen_range(0..self.occ.len())
    }

    /* mutators */

    /// Infect a susceptible vertex.
    pub fn insert(&mut self, v: usize) {
        debug_assert!(!self.status[v], "vertex {v} already infected");
        self.status.set(v, true);
        self.occ.push(v);
        self.degree_sum += self.graph.degree(v);
    }

    /// Heal the vertex stored at `pos`; the last entry takes its slot.
    /// Returns the healed vertex.
    pub fn remove_at(&mut self, pos: usize) -> usize {
        let v = self.occ.swap_remove(pos);
        self.status.set(v, false);
        self.degree_sum -= self.graph.degree(v);
        v
    }

    /// Heal everyone.
    pub fn reset(&mut self) {
        self.status.fill(false);
        self.occ.clear();
        self.degree_sum = 0;
    }

    /// Infect `count` distinct vertices drawn uniformly, redrawing hits on
    /// vertices that are already infected.
    pub fn seed<R>(&mut self, count: usize, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let n = self.graph.n();
        assert!(self.occ.len() + count <= n, "cannot infect {count} of {n} vertices");
        let target = self.occ.len() + count;
        while self.occ.len() < target {
            let v = rng.gen_range(0..n);
            if !self.status[v] {
                self.insert(v);
            }
        }
    }
}

/*───────────────────────── tests ─────────────────────────*/
