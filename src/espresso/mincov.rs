//! Minimum unate covering: dominance reductions and branch-and-bound
//!
//! Solves "pick the fewest rows so that every column has a picked row".
//! Used by IRREDUNDANT on the partially-redundant sub-problem and by the
//! exact solver on the prime/minterm table. Reduction loop: essential
//! columns (a column with one remaining row forces that row), row dominance
//! (a row whose column set contains another's makes the other useless) and
//! column dominance (a column whose row set contains another's is implied by
//! it). The residual cyclic core is searched by binary branching on the
//! hardest row, pruned with a greedy maximal-independent-set lower bound.

use std::collections::BTreeSet;
use std::time::Instant;

use log::debug;

/// A Boolean covering matrix with explicit row and column sets.
///
/// Rows and columns are addressed by their construction index; deletion
/// marks the slot `None` so indices stay stable across reductions.
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    rows: Vec<Option<BTreeSet<usize>>>,
    cols: Vec<Option<BTreeSet<usize>>>,
}

impl SparseMatrix {
    /// Empty matrix with `num_rows` rows and `num_cols` columns.
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        SparseMatrix {
            rows: vec![Some(BTreeSet::new()); num_rows],
            cols: vec![Some(BTreeSet::new()); num_cols],
        }
    }

    /// Set entry (row, col).
    pub fn insert(&mut self, row: usize, col: usize) {
        self.rows[row].as_mut().expect("deleted row").insert(col);
        self.cols[col].as_mut().expect("deleted col").insert(row);
    }

    /// Number of live rows.
    pub fn live_rows(&self) -> usize {
        self.rows.iter().flatten().count()
    }

    /// Number of live columns.
    pub fn live_cols(&self) -> usize {
        self.cols.iter().flatten().count()
    }

    fn delete_row(&mut self, r: usize) {
        if let Some(cols) = self.rows[r].take() {
            for c in cols {
                if let Some(set) = self.cols[c].as_mut() {
                    set.remove(&r);
                }
            }
        }
    }

    fn delete_col(&mut self, c: usize) {
        if let Some(rows) = self.cols[c].take() {
            for r in rows {
                if let Some(set) = self.rows[r].as_mut() {
                    set.remove(&c);
                }
            }
        }
    }

    /// Select row `r` into the solution: its columns are satisfied and
    /// disappear together with the row.
    fn select_row(&mut self, r: usize) {
        let cols: Vec<usize> = self.rows[r]
            .as_ref()
            .expect("selecting a deleted row")
            .iter()
            .copied()
            .collect();
        for c in cols {
            self.delete_col(c);
        }
        self.rows[r] = None;
    }

    /// One pass of the reduction loop. Returns selected essential rows and
    /// `None` if some column became uncoverable (infeasible branch).
    fn reduce(&mut self, selected: &mut Vec<usize>) -> Option<()> {
        loop {
            let mut changed = false;

            // Essential columns: a lone remaining row must be taken.
            for c in 0..self.cols.len() {
                match self.cols[c].as_ref() {
                    Some(rows) if rows.is_empty() => return None,
                    Some(rows) if rows.len() == 1 => {
                        let r = *rows.iter().next().expect("len checked");
                        selected.push(r);
                        self.select_row(r);
                        changed = true;
                    }
                    _ => {}
                }
            }

            // Row dominance: drop rows whose columns fit inside another's.
            let live: Vec<usize> = (0..self.rows.len())
                .filter(|&r| self.rows[r].is_some())
                .collect();
            for &a in &live {
                for &b in &live {
                    if a == b || self.rows[a].is_none() || self.rows[b].is_none() {
                        continue;
                    }
                    let (ra, rb) = (
                        self.rows[a].as_ref().expect("live"),
                        self.rows[b].as_ref().expect("live"),
                    );
                    // Ties delete the higher index, keeping the choice
                    // deterministic.
                    let dominates =
                        ra.is_superset(rb) && (ra.len() > rb.len() || a < b);
                    if dominates {
                        self.delete_row(b);
                        changed = true;
                    }
                }
            }

            // Column dominance: a column whose rows include another
            // column's rows is satisfied whenever the other is.
            let live: Vec<usize> = (0..self.cols.len())
                .filter(|&c| self.cols[c].is_some())
                .collect();
            for &x in &live {
                for &y in &live {
                    if x == y || self.cols[x].is_none() || self.cols[y].is_none() {
                        continue;
                    }
                    let (cx, cy) = (
                        self.cols[x].as_ref().expect("live"),
                        self.cols[y].as_ref().expect("live"),
                    );
                    let dominated = cy.is_superset(cx) && (cy.len() > cx.len() || x < y);
                    if dominated {
                        self.delete_col(y);
                        changed = true;
                    }
                }
            }

            if !changed {
                return Some(());
            }
        }
    }

    /// Greedy maximal independent set of columns (pairwise disjoint row
    /// sets); its size lower-bounds the number of rows any cover needs.
    fn independent_set_bound(&self) -> usize {
        let mut remaining: Vec<usize> = (0..self.cols.len())
            .filter(|&c| self.cols[c].is_some())
            .collect();
        let mut size = 0;
        while !remaining.is_empty() {
            // Fewest-row column first: hardest to satisfy, most selective.
            let &pick = remaining
                .iter()
                .min_by_key(|&&c| {
                    (
                        self.cols[c].as_ref().expect("live column").len(),
                        c,
                    )
                })
                .expect("non-empty");
            size += 1;
            let pick_rows = self.cols[pick].as_ref().expect("live column").clone();
            remaining.retain(|&c| {
                c != pick
                    && self.cols[c]
                        .as_ref()
                        .expect("live column")
                        .is_disjoint(&pick_rows)
            });
        }
        size
    }

    /// The live row covering the most columns (ties to the lowest index).
    fn hardest_row(&self) -> Option<usize> {
        (0..self.rows.len())
            .filter(|&r| self.rows[r].is_some())
            .max_by_key(|&r| {
                (
                    self.rows[r].as_ref().expect("live row").len(),
                    std::cmp::Reverse(r),
                )
            })
    }
}

/// Result of a covering search.
#[derive(Debug, Clone)]
pub struct MinCover {
    /// Selected row indices, sorted.
    pub rows: Vec<usize>,
    /// False when the deadline cut the search short; the rows still cover
    /// every column, they just may not be minimum.
    pub optimal: bool,
}

/// Solve the covering problem to minimality (modulo `deadline`).
///
/// Always returns a valid cover when one exists; `None` only when some
/// column has no rows at all.
pub fn minimum_cover(matrix: &SparseMatrix, deadline: Option<Instant>) -> Option<MinCover> {
    if (0..matrix.cols.len()).any(|c| matches!(matrix.cols[c].as_ref(), Some(s) if s.is_empty())) {
        return None;
    }
    let mut search = Search {
        best: None,
        deadline,
        timed_out: false,
        nodes: 0,
    };
    search.branch(matrix.clone(), Vec::new());
    debug!(
        "mincov: {} nodes, best {:?}, timed_out {}",
        search.nodes,
        search.best.as_ref().map(|b| b.len()),
        search.timed_out
    );
    let mut rows = search.best?;
    rows.sort_unstable();
    rows.dedup();
    Some(MinCover {
        rows,
        optimal: !search.timed_out,
    })
}

struct Search {
    best: Option<Vec<usize>>,
    deadline: Option<Instant>,
    timed_out: bool,
    nodes: u64,
}

impl Search {
    fn bound_beaten(&self, partial: usize) -> bool {
        match &self.best {
            Some(best) => partial >= best.len(),
            None => false,
        }
    }

    fn branch(&mut self, mut m: SparseMatrix, mut selected: Vec<usize>) {
        self.nodes += 1;
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.timed_out = true;
                // Deadline fallback: take everything still live so the
                // caller always holds a valid cover.
                if self.best.is_none() {
                    let mut all = selected;
                    all.extend((0..m.rows.len()).filter(|&r| m.rows[r].is_some()));
                    self.best = Some(all);
                }
                return;
            }
        }
        if m.reduce(&mut selected).is_none() {
            return; // infeasible branch
        }
        if m.live_cols() == 0 {
            if self
                .best
                .as_ref()
                .map(|b| selected.len() < b.len())
                .unwrap_or(true)
            {
                self.best = Some(selected);
            }
            return;
        }
        let lower = selected.len() + m.independent_set_bound();
        if self.bound_beaten(lower) {
            return;
        }
        let r = match m.hardest_row() {
            Some(r) => r,
            None => return, // columns remain but no rows: infeasible
        };

        // Include the hardest row first: covering more columns earlier
        // tightens the bound for the exclude branch.
        let mut with = m.clone();
        let mut with_sel = selected.clone();
        with_sel.push(r);
        with.select_row(r);
        self.branch(with, with_sel);

        if self.timed_out {
            return;
        }
        m.delete_row(r);
        self.branch(m, selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[usize]], num_cols: usize) -> SparseMatrix {
        let mut m = SparseMatrix::new(rows.len(), num_cols);
        for (r, cols) in rows.iter().enumerate() {
            for &c in *cols {
                m.insert(r, c);
            }
        }
        m
    }

    #[test]
    fn test_essential_column_forces_row() {
        // Column 0 only reachable through row 1.
        let m = matrix(&[&[1], &[0, 1]], 2);
        let sol = minimum_cover(&m, None).expect("coverable");
        assert_eq!(sol.rows, vec![1]);
        assert!(sol.optimal);
    }

    #[test]
    fn test_row_dominance() {
        // Row 0 covers everything row 1 covers and more.
        let m = matrix(&[&[0, 1, 2], &[0, 1], &[2]], 3);
        let sol = minimum_cover(&m, None).expect("coverable");
        assert_eq!(sol.rows, vec![0]);
    }

    #[test]
    fn test_uncoverable_column() {
        let mut m = SparseMatrix::new(1, 2);
        m.insert(0, 0);
        assert!(minimum_cover(&m, None).is_none());
    }

    #[test]
    fn test_cyclic_core_is_solved_exactly() {
        // Classic 5-row cycle: row i covers columns i and (i+1) mod 5; the
        // optimum needs 3 rows, no reduction applies.
        let m = matrix(&[&[0, 1], &[1, 2], &[2, 3], &[3, 4], &[4, 0]], 5);
        let sol = minimum_cover(&m, None).expect("coverable");
        assert_eq!(sol.rows.len(), 3);
        assert!(sol.optimal);
        // Verify it really covers all five columns.
        let mut covered = [false; 5];
        for &r in &sol.rows {
            covered[r] = true;
            covered[(r + 1) % 5] = true;
        }
        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn test_empty_matrix_is_trivially_covered() {
        let m = SparseMatrix::new(0, 0);
        let sol = minimum_cover(&m, None).expect("coverable");
        assert!(sol.rows.is_empty());
    }

    #[test]
    fn test_deterministic_solution() {
        let m = matrix(&[&[0, 1], &[1, 2], &[0, 2]], 3);
        let a = minimum_cover(&m, None).expect("coverable");
        let b = minimum_cover(&m, None).expect("coverable");
        assert_eq!(a.rows, b.rows);
        assert_eq!(a.rows.len(), 2);
    }
}
