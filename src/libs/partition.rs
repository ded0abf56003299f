//! Splits a pairwise alignment into segments around long indels.
//!
//! An indel run of `maxgap` or more columns carries no alignment evidence
//! worth compressing: it becomes its own query-only or reference-only
//! segment. Shorter runs are absorbed into the enclosing shared segment as
//! insertion/deletion edits of the query consensus against the reference
//! consensus.

use crate::libs::block::{BlockError, DelMap, InsMap, SnpMap};
use crate::libs::cigar::{Cigar, Op};
use crate::libs::interval::Interval;
use itertools::Itertools;

/// One piece of a partitioned alignment. Intervals are 1-based within the
/// query/reference slices handed to [`partition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Query sequence not matched by the reference.
    QryOnly { consensus: Vec<u8>, qry: Interval },
    /// Reference sequence not matched by the query.
    RefOnly { consensus: Vec<u8>, refr: Interval },
    /// An aligned region. The consensus is the reference slice; `snp`,
    /// `ins` and `del` encode the query consensus against it, keyed in
    /// segment-local reference coordinates.
    Shared {
        consensus: Vec<u8>,
        qry: Interval,
        refr: Interval,
        snp: SnpMap,
        ins: InsMap,
        del: DelMap,
    },
}

/// Consumes a CIGAR over `qry` and `refr` and splits it at indel runs of
/// `maxgap` or more columns.
///
/// `M`, `=` and `X` columns are classified by byte comparison; `S` consumes
/// query like `I`; `H` consumes nothing and is dropped. The CIGAR spans must
/// match the slice lengths exactly.
pub fn partition(
    cigar: &Cigar,
    qry: &[u8],
    refr: &[u8],
    maxgap: usize,
) -> Result<Vec<Segment>, BlockError> {
    if cigar.qry_span() != qry.len() || cigar.ref_span() != refr.len() {
        return Err(BlockError::MalformedCigar(format!(
            "cigar spans {}/{} do not match sequence lengths {}/{}",
            cigar.qry_span(),
            cigar.ref_span(),
            qry.len(),
            refr.len()
        )));
    }

    // Normalize: soft clips consume query like insertions, hard clips
    // vanish, adjacent runs of one op coalesce.
    let runs: Vec<(usize, Op)> = cigar
        .runs()
        .iter()
        .filter_map(|&(len, op)| match op {
            Op::HardClip => None,
            Op::SoftClip => Some((len as usize, Op::Ins)),
            other => Some((len as usize, other)),
        })
        .coalesce(|a, b| {
            if a.1 == b.1 {
                Ok((a.0 + b.0, a.1))
            } else {
                Err((a, b))
            }
        })
        .collect();

    let is_splitter =
        |len: usize, op: Op| -> bool { matches!(op, Op::Ins | Op::Del) && len >= maxgap };

    let mut segments = Vec::new();
    let mut q_pos = 0;
    let mut r_pos = 0;

    let push_qry_only = |segments: &mut Vec<Segment>, q_pos: &mut usize, len: usize| {
        segments.push(Segment::QryOnly {
            consensus: qry[*q_pos..*q_pos + len].to_vec(),
            qry: Interval::new(*q_pos + 1, *q_pos + len + 1),
        });
        *q_pos += len;
    };
    let push_ref_only = |segments: &mut Vec<Segment>, r_pos: &mut usize, len: usize| {
        segments.push(Segment::RefOnly {
            consensus: refr[*r_pos..*r_pos + len].to_vec(),
            refr: Interval::new(*r_pos + 1, *r_pos + len + 1),
        });
        *r_pos += len;
    };

    let mut i = 0;
    while i < runs.len() {
        let (len, op) = runs[i];
        if is_splitter(len, op) {
            match op {
                Op::Ins => push_qry_only(&mut segments, &mut q_pos, len),
                Op::Del => push_ref_only(&mut segments, &mut r_pos, len),
                _ => unreachable!(),
            }
            i += 1;
            continue;
        }

        let group_start = i;
        while i < runs.len() && !is_splitter(runs[i].0, runs[i].1) {
            i += 1;
        }
        let group = &runs[group_start..i];

        let matched: usize = group
            .iter()
            .filter(|(_, op)| op.consumes_query() && op.consumes_reference())
            .map(|(len, _)| len)
            .sum();
        if matched == 0 {
            // Short indels with no aligned column to anchor them.
            for &(len, op) in group {
                match op {
                    Op::Ins => push_qry_only(&mut segments, &mut q_pos, len),
                    Op::Del => push_ref_only(&mut segments, &mut r_pos, len),
                    _ => unreachable!(),
                }
            }
            continue;
        }

        let q_start = q_pos;
        let r_start = r_pos;
        let mut snp = SnpMap::new();
        let mut ins = InsMap::new();
        let mut del = DelMap::new();
        for &(len, op) in group {
            match op {
                Op::Match | Op::Equal | Op::Mismatch => {
                    for k in 0..len {
                        let qb = qry[q_pos + k];
                        let rb = refr[r_pos + k];
                        if qb != rb {
                            snp.insert(r_pos + k - r_start + 1, qb);
                        }
                    }
                    q_pos += len;
                    r_pos += len;
                }
                Op::Ins => {
                    ins.insert((r_pos - r_start, 0), qry[q_pos..q_pos + len].to_vec());
                    q_pos += len;
                }
                Op::Del => {
                    del.insert(r_pos - r_start + 1, len);
                    r_pos += len;
                }
                _ => unreachable!(),
            }
        }

        segments.push(Segment::Shared {
            consensus: refr[r_start..r_pos].to_vec(),
            qry: Interval::new(q_start + 1, q_pos + 1),
            refr: Interval::new(r_start + 1, r_pos + 1),
            snp,
            ins,
            del,
        });
    }

    Ok(segments)
}
