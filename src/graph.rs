//! Static contact network in compressed adjacency form.
//! Supports plain edge-list parsing and O(1) neighbour slices.

use crate::error::SimError;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Vertex ids allowed per edge end of a list; past this nearly every
/// vertex would be isolated and the id is treated as malformed.
pub const MAX_IDS_PER_EDGE_END: usize = 1_000;

/// How vertex ids are numbered in an edge-list file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexBase {
    Zero,
    #[default]
    One,
}

#[derive(Clone, Debug)]
pub struct Graph {
    /// `degree[v]` = k_v.
    degree: Vec<usize>,
    /// Start of v's neighbour list inside `adj`.
    offset: Vec<usize>,
    /// Flattened neighbour lists, length 2E.
    adj: Vec<usize>,
    edges: usize,
    max_degree: usize,
}

impl Graph {
    /*────────── constructors ──────────*/

    /// Build from explicit edge list (0-based indices, undirected).
    /// Self-loops are dropped; parallel edges are kept.
    pub fn from_edge_list(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut degree = vec![0usize; n];
        let mut kept = 0usize;
        for &(u, v) in edges {
            assert!(u < n && v < n, "edge ({u},{v}) out of range for n = {n}");
            if u == v { continue; }
            degree[u] += 1;
            degree[v] += 1;
            kept += 1;
        }

        let mut offset = Vec::with_capacity(n);
        let mut acc = 0usize;
        for &k in &degree {
            offset.push(acc);
            acc += k;
        }

        // second pass fills each slice through a moving cursor
        let mut cursor = offset.clone();
        let mut adj = vec![0usize; acc];
        for &(u, v) in edges {
            if u == v { continue; }
            adj[cursor[u]] = v;
            cursor[u] += 1;
            adj[cursor[v]] = u;
            cursor[v] += 1;
        }

        let max_degree = degree.iter().copied().max().unwrap_or(0);
        Self { degree, offset, adj, edges: kept, max_degree }
    }

    /// Parse a whitespace separated edge list from any reader.
    ///
    /// Blank lines and lines starting with `#` or `%` are skipped, columns
    /// past the second are ignored. The vertex count is the largest id seen,
    /// bounded by [`MAX_IDS_PER_EDGE_END`] times the number of edge ends.
    pub fn parse_edge_list<R: Read>(reader: R, base: IndexBase) -> Result<Self, SimError> {
        let mut n = 0usize;
        let mut n_line = 0usize;
        let mut edges: Vec<(usize, usize)> = Vec::new();

        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('%') {
                continue;
            }
            let lineno = idx + 1;
            let mut cols = line.split_whitespace();
            let (Some(a), Some(b)) = (cols.next(), cols.next()) else {
                return Err(SimError::parse(lineno, "expected two vertex ids"));
            };
            let u = parse_id(a, base, lineno)?;
            let v = parse_id(b, base, lineno)?;
            let top = u.max(v).checked_add(1)
                .ok_or_else(|| SimError::parse(lineno, "vertex id out of range"))?;
            if top > n {
                n = top;
                n_line = lineno;
            }
            edges.push((u, v));
        }

        if n == 0 {
            return Err(SimError::EmptyNetwork);
        }
        let limit = edges.len().saturating_mul(2).saturating_mul(MAX_IDS_PER_EDGE_END);
        if n > limit {
            return Err(SimError::parse(
                n_line,
                format!("vertex id {} is too large for a list of {} edges", n - 1, edges.len()),
            ));
        }
        Ok(Self::from_edge_list(n, &edges))
    }

    /// Open and parse an edge-list file.
    pub fn open<P: AsRef<Path>>(path: P, base: IndexBase) -> Result<Self, SimError> {
        let file = File::open(path)?;
        Self::parse_edge_list(file, base)
    }

    /*────────── getters ──────────*/

    #[inline] pub fn n(&self) -> usize { self.degree.len() }

    /// Number of edges (each counted once).
    #[inline] pub fn m(&self) -> usize { self.edges }

    #[inline] pub fn degree(&self, v: usize) -> usize { self.degree[v] }

    #[inline] pub fn offset(&self, v: usize) -> usize { self.offset[v] }

    #[inline] pub fn degrees(&self) -> &[usize] { &self.degree }

    /// Largest degree in the network, 0 if every vertex is isolated.
    #[inline] pub fn max_degree(&self) -> usize { self.max_degree }

    /// Neighbours of v, in insertion order.
    #[inline]
    pub fn neighbours(&self, v: usize) -> &[usize] {
        let start = self.offset[v];
        &self.adj[start..start + self.degree[v]]
    }
}

fn parse_id(token: &str, base: IndexBase, line: usize) -> Result<usize, SimError> {
    let id: usize = token
        .parse()
        .map_err(|_| SimError::parse(line, format!("`{token}` is not a vertex id")))?;
    match base {
        IndexBase::Zero => Ok(id),
        IndexBase::One => id
            .checked_sub(1)
            .ok_or_else(|| SimError::parse(line, "vertex id 0 in a one-based edge list")),
    }
}

/*────────────────── unit checks ──────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn square_from_edges() {
        let g = Graph::from_edge_list(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        assert_eq!(g.n(), 4);
        assert_eq!(g.m(), 4);
        assert_eq!(g.max_degree(), 2);
        assert_eq!(g.degrees().iter().sum::<usize>(), 2 * g.m());
        let mut nb = g.neighbours(0).to_vec();
        nb.sort_unstable();
        assert_eq!(nb, vec![1, 3]);
    }

    #[test]
    fn self_loops_dropped_and_isolated_kept() {
        let g = Graph::from_edge_list(5, &[(0, 0), (0, 1)]);
        assert_eq!(g.m(), 1);
        assert_eq!(g.degree(0), 1);
        assert_eq!(g.degree(4), 0);
        assert!(g.neighbours(4).is_empty());
    }

    #[test]
    fn parse_one_based_with_comments() {
        let text = b"# star\n1 2\n\n1 3 0.5\n% trailing\n1 4\n";
        let g = Graph::parse_edge_list(Cursor::new(text), IndexBase::One).unwrap();
        assert_eq!(g.n(), 4);
        assert_eq!(g.m(), 3);
        assert_eq!(g.degree(0), 3);
        assert_eq!(g.max_degree(), 3);
        assert_eq!(g.offset(1), 3);
    }

    #[test]
    fn parse_zero_based() {
        let g = Graph::parse_edge_list(Cursor::new(b"0 1\n1 2\n"), IndexBase::Zero).unwrap();
        assert_eq!(g.n(), 3);
        assert_eq!(g.neighbours(1), &[0, 2]);
    }

    #[test]
    fn parse_errors_carry_line() {
        let err = Graph::parse_edge_list(Cursor::new(b"1 2\n1 x\n"), IndexBase::One).unwrap_err();
        assert!(matches!(err, SimError::Parse { line: 2, .. }));

        let err = Graph::parse_edge_list(Cursor::new(b"0 1\n"), IndexBase::One).unwrap_err();
        assert!(matches!(err, SimError::Parse { line: 1, .. }));

        let err = Graph::parse_edge_list(Cursor::new(b"# nothing\n"), IndexBase::One).unwrap_err();
        assert!(matches!(err, SimError::EmptyNetwork));
    }

    #[test]
    fn oversized_ids_are_parse_errors() {
        let text = format!("0 1\n0 {}\n", usize::MAX);
        let err = Graph::parse_edge_list(Cursor::new(text), IndexBase::Zero).unwrap_err();
        assert!(matches!(err, SimError::Parse { line: 2, .. }));

        let text = format!("1 {}\n", usize::MAX);
        let err = Graph::parse_edge_list(Cursor::new(text), IndexBase::One).unwrap_err();
        assert!(matches!(err, SimError::Parse { line: 1, .. }));

        let err = Graph::parse_edge_list(Cursor::new(b"1 2\n2 1000000000000\n3 4\n"), IndexBase::One)
            .unwrap_err();
        assert!(matches!(err, SimError::Parse { line: 2, .. }), "{err}");

        // sparse but plausible numbering still loads
        let g = Graph::parse_edge_list(Cursor::new(b"1 2\n1 1500\n"), IndexBase::One).unwrap();
        assert_eq!(g.n(), 1500);
        assert_eq!(g.m(), 2);
    }
}
