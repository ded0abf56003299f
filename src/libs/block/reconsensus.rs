//! Recomputing a block's consensus from the implied alignment.
//!
//! After a merge the stored consensus may no longer be the per-column
//! plurality of its members. Reconsensus materialises the gapped alignment
//! matrix, takes the plurality of every column (ties broken by the fixed
//! nucleotide order, bases before gaps), and re-encodes every member
//! against the new consensus. Columns in which every member is a gap are
//! dropped.

use super::{Block, Edits, NodeId};
use crate::libs::nt::{self, GAP};
use std::collections::BTreeMap;

/// Accumulates one member's insertion run inside the gap cluster that is
/// currently open.
#[derive(Default)]
struct InsRun {
    start: usize,
    last: usize,
    bytes: Vec<u8>,
}

impl Block {
    /// Recomputes the consensus and re-encodes all edit maps.
    ///
    /// Returns `true` iff a re-encode occurred. For `depth ≤ 2` the
    /// consensus is arbitrary among tied plurality choices; the block is
    /// left untouched and `false` is returned.
    pub fn reconsensus(&mut self) -> bool {
        if self.depth() <= 2 {
            return false;
        }

        let nodes: Vec<NodeId> = self.members.keys().copied().collect();
        let rows: Vec<Vec<u8>> = nodes
            .iter()
            .map(|&n| self.member_row(n).expect("member row"))
            .collect();
        let width = self.gapped_len();

        let mut consensus: Vec<u8> = Vec::with_capacity(self.len());
        let mut gaps: BTreeMap<usize, usize> = BTreeMap::new();
        let mut edits: Vec<Edits> = vec![Edits::new(); nodes.len()];
        let mut del_positions: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        let mut ins_runs: Vec<Option<InsRun>> = Vec::new();
        ins_runs.resize_with(nodes.len(), || None);

        // Width of the gap cluster currently open after `consensus.len()`.
        let mut cluster_width = 0;

        let flush_runs = |ins_runs: &mut Vec<Option<InsRun>>, edits: &mut Vec<Edits>, key: usize| {
            for (m, run) in ins_runs.iter_mut().enumerate() {
                if let Some(run) = run.take() {
                    edits[m].ins.insert((key, run.start), run.bytes);
                }
            }
        };

        for col in 0..width {
            let column: Vec<u8> = rows.iter().map(|row| row[col]).collect();
            if column.iter().all(|&b| b == GAP) {
                continue;
            }
            let winner = plurality(&column);

            if winner == GAP {
                let key = consensus.len();
                let offset = cluster_width;
                cluster_width += 1;
                for (m, &b) in column.iter().enumerate() {
                    if b == GAP {
                        if let Some(run) = ins_runs[m].take() {
                            edits[m].ins.insert((key, run.start), run.bytes);
                        }
                        continue;
                    }
                    match &mut ins_runs[m] {
                        Some(run) if run.last + 1 == offset => {
                            run.last = offset;
                            run.bytes.push(b);
                        }
                        slot => {
                            if let Some(run) = slot.take() {
                                edits[m].ins.insert((key, run.start), run.bytes);
                            }
                            *slot = Some(InsRun {
                                start: offset,
                                last: offset,
                                bytes: vec![b],
                            });
                        }
                    }
                }
            } else {
                let key = consensus.len();
                flush_runs(&mut ins_runs, &mut edits, key);
                if cluster_width > 0 {
                    gaps.insert(key, cluster_width);
                    cluster_width = 0;
                }
                consensus.push(winner);
                let pos = consensus.len();
                for (m, &b) in column.iter().enumerate() {
                    if b == GAP {
                        del_positions[m].push(pos);
                    } else if b != winner {
                        edits[m].snp.insert(pos, b);
                    }
                }
            }
        }
        let key = consensus.len();
        flush_runs(&mut ins_runs, &mut edits, key);
        if cluster_width > 0 {
            gaps.insert(key, cluster_width);
        }

        for (m, positions) in del_positions.iter().enumerate() {
            for &pos in positions {
                super::extend_del_run(&mut edits[m].del, pos);
            }
        }

        let members: BTreeMap<NodeId, Edits> = nodes.into_iter().zip(edits).collect();
        let changed =
            consensus != self.consensus || gaps != self.gaps || members != self.members;
        if changed {
            self.consensus = consensus;
            self.gaps = gaps;
            self.members = members;
        }
        changed
    }
}

/// The plurality byte of a column; ties resolve by `A < C < G < T < N < -`.
fn plurality(column: &[u8]) -> u8 {
    let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
    for &b in column {
        *counts.entry(b).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .min_by_key(|&(b, count)| (std::cmp::Reverse(count), nt::rank(b), b))
        .map(|(b, _)| b)
        .expect("non-empty column")
}
