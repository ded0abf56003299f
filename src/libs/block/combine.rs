//! Fusing two blocks along a pairwise alignment of their consensi.
//!
//! The alignment is partitioned around long indels; the pieces become
//! reference-only and query-only slices plus merged shared blocks. In a
//! shared block the reference consensus wins: every query member is
//! re-expressed against it by composing its own edits with the
//! query-vs-reference differences of the segment.

use super::{Block, BlockError, BlockId, DelMap, Edits, InsMap, NodeId};
use crate::libs::cigar::Cigar;
use crate::libs::interval::Interval;
use crate::libs::partition::{partition, Segment};
use std::collections::BTreeMap;

/// Orientation of the query consensus relative to the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

/// A pairwise alignment between the consensus sequences of two blocks.
/// Intervals are 1-based half-open in each block's own consensus
/// coordinates, on the forward strand.
#[derive(Debug, Clone)]
pub struct Alignment {
    pub cigar: Cigar,
    pub orientation: Strand,
    pub qry_interval: Interval,
    pub ref_interval: Interval,
}

/// One child block of a combine, tagged with the region kind it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    RefOnly(Block),
    QryOnly(Block),
    Shared(Block),
}

impl Child {
    pub fn block(&self) -> &Block {
        match self {
            Child::RefOnly(b) | Child::QryOnly(b) | Child::Shared(b) => b,
        }
    }

    pub fn into_block(self) -> Block {
        match self {
            Child::RefOnly(b) | Child::QryOnly(b) | Child::Shared(b) => b,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Child::RefOnly(_) => "ref-only",
            Child::QryOnly(_) => "qry-only",
            Child::Shared(_) => "shared",
        }
    }
}

fn check_interval(iv: &Interval, len: usize, what: &str) -> Result<(), BlockError> {
    if iv.lo < 1 || iv.lo >= iv.hi || iv.hi > len + 1 {
        return Err(BlockError::AlignmentOutOfRange(format!(
            "{} interval {} outside consensus of length {}",
            what, iv, len
        )));
    }
    Ok(())
}

/// Fuses query block `qry` and reference block `refr` along `aln`,
/// splitting at indel runs of `maxgap` or more columns.
///
/// Children are ordered by position along the reference, the uncovered
/// query flanks next to the shared region they border. Shared children are
/// re-canonicalised with [`Block::reconsensus`].
pub fn combine(
    qry: &Block,
    refr: &Block,
    aln: &Alignment,
    maxgap: usize,
) -> Result<Vec<Child>, BlockError> {
    check_interval(&aln.qry_interval, qry.len(), "query")?;
    check_interval(&aln.ref_interval, refr.len(), "reference")?;
    for node in qry.nodes() {
        if refr.contains_node(node) {
            return Err(BlockError::DuplicateMember(node));
        }
    }

    // Operate on the reverse complement of the query when the alignment
    // orients it backwards; the interval moves with it.
    let (qry_block, q_iv) = match aln.orientation {
        Strand::Forward => (qry.clone(), aln.qry_interval),
        Strand::Reverse => {
            let l = qry.len();
            (
                qry.reverse_complement(),
                Interval::new(l + 2 - aln.qry_interval.hi, l + 2 - aln.qry_interval.lo),
            )
        }
    };
    let r_iv = aln.ref_interval;

    let q_seq = &qry_block.sequence()[q_iv.lo - 1..q_iv.hi - 1];
    let r_seq = &refr.sequence()[r_iv.lo - 1..r_iv.hi - 1];
    let segments = partition(&aln.cigar, q_seq, r_seq, maxgap)?;

    let mut children = Vec::new();
    if r_iv.lo > 1 {
        children.push(Child::RefOnly(refr.slice(Interval::new(1, r_iv.lo))?));
    }
    if q_iv.lo > 1 {
        children.push(Child::QryOnly(qry_block.slice(Interval::new(1, q_iv.lo))?));
    }
    for segment in &segments {
        match segment {
            Segment::QryOnly { qry: iv, .. } => {
                children.push(Child::QryOnly(qry_block.slice(iv.shift_up(q_iv.lo - 1))?));
            }
            Segment::RefOnly { refr: iv, .. } => {
                children.push(Child::RefOnly(refr.slice(iv.shift_up(r_iv.lo - 1))?));
            }
            Segment::Shared {
                consensus,
                qry: seg_q,
                refr: seg_r,
                ins,
                del,
                ..
            } => {
                let q_slice = qry_block.slice(seg_q.shift_up(q_iv.lo - 1))?;
                let r_slice = refr.slice(seg_r.shift_up(r_iv.lo - 1))?;
                let merged = merge_shared(&q_slice, &r_slice, consensus.clone(), ins, del)?;
                children.push(Child::Shared(merged));
            }
        }
    }
    if q_iv.hi < qry_block.len() + 1 {
        children.push(Child::QryOnly(
            qry_block.slice(Interval::new(q_iv.hi, qry_block.len() + 1))?,
        ));
    }
    if r_iv.hi < refr.len() + 1 {
        children.push(Child::RefOnly(
            refr.slice(Interval::new(r_iv.hi, refr.len() + 1))?,
        ));
    }

    Ok(children)
}

/// Where a query-consensus position sits against the reference consensus.
#[derive(Debug, Clone, Copy)]
enum RefCoord {
    /// Aligned to this reference position.
    Base(usize),
    /// Inside the insertion cluster after this reference position.
    Gap(usize),
}

/// Builds the merged block of one shared segment.
///
/// `consensus` is the segment's reference consensus; `seg_ins`/`seg_del`
/// describe how the query consensus threads through it. Reference members
/// carry over verbatim. Each query member is composed through the segment
/// alignment: its realized bytes land at the reference coordinates its
/// query-consensus positions map to, and bytes with no reference
/// counterpart go into the gap cluster at the enclosing junction.
fn merge_shared(
    q_slice: &Block,
    r_slice: &Block,
    consensus: Vec<u8>,
    seg_ins: &InsMap,
    seg_del: &DelMap,
) -> Result<Block, BlockError> {
    let lq = q_slice.len();
    let lr = r_slice.len();

    let mut ref_deleted = vec![false; lr + 1];
    for (&pos, &len) in seg_del {
        for p in pos..pos + len {
            ref_deleted[p] = true;
        }
    }
    let seg_del_positions: Vec<usize> = (1..=lr).filter(|&p| ref_deleted[p]).collect();

    // Query-consensus position x → reference coordinate, index 0 unused.
    let mut map: Vec<RefCoord> = Vec::with_capacity(lq + 1);
    map.push(RefCoord::Base(0));
    for r in 0..=lr {
        if r >= 1 && !ref_deleted[r] {
            map.push(RefCoord::Base(r));
        }
        if let Some(s) = seg_ins.get(&(r, 0)) {
            for _ in 0..s.len() {
                map.push(RefCoord::Gap(r));
            }
        }
    }
    if map.len() != lq + 1 {
        return Err(BlockError::MalformedCigar(format!(
            "segment edits span {} query positions, expected {}",
            map.len() - 1,
            lq
        )));
    }

    // Junction where bytes following query position x land.
    let junction_of = |x: usize| -> usize {
        let probe = if x == 0 { map[1] } else { map[x] };
        match (x, probe) {
            (0, RefCoord::Base(r)) => r - 1,
            (_, RefCoord::Base(r)) => r,
            (_, RefCoord::Gap(p)) => p,
        }
    };

    let mut gaps = r_slice.gaps().clone();
    let mut q_widths: BTreeMap<usize, usize> = BTreeMap::new();
    let mut members: BTreeMap<NodeId, Edits> = BTreeMap::new();

    for (node, edits) in q_slice.members() {
        let mut q_deleted = vec![false; lq + 1];
        for (&pos, &len) in &edits.del {
            for p in pos..pos + len {
                q_deleted[p] = true;
            }
        }

        let mut out = Edits::new();
        let mut deleted_positions = seg_del_positions.clone();
        let mut cluster_buf: BTreeMap<usize, Vec<u8>> = BTreeMap::new();

        for (&(_, _), s) in edits.ins.range((0, 0)..(1, 0)) {
            cluster_buf
                .entry(junction_of(0))
                .or_default()
                .extend_from_slice(s);
        }
        for x in 1..=lq {
            let content = if q_deleted[x] {
                None
            } else if let Some(&alt) = edits.snp.get(&x) {
                Some(alt)
            } else {
                Some(q_slice.sequence()[x - 1])
            };
            match map[x] {
                RefCoord::Base(r) => match content {
                    None => deleted_positions.push(r),
                    Some(b) if b != consensus[r - 1] => {
                        out.snp.insert(r, b);
                    }
                    Some(_) => {}
                },
                RefCoord::Gap(p) => {
                    if let Some(b) = content {
                        cluster_buf.entry(p).or_default().push(b);
                    }
                }
            }
            for (&(_, _), s) in edits.ins.range((x, 0)..(x + 1, 0)) {
                cluster_buf
                    .entry(junction_of(x))
                    .or_default()
                    .extend_from_slice(s);
            }
        }

        deleted_positions.sort_unstable();
        for pos in deleted_positions {
            super::extend_del_run(&mut out.del, pos);
        }

        for (p, buf) in cluster_buf {
            let base = r_slice.gaps().get(&p).copied().unwrap_or(0);
            let width = q_widths.entry(p).or_insert(0);
            *width = (*width).max(buf.len());
            out.ins.insert((p, base), buf);
        }

        members.insert(*node, out);
    }

    for (&p, &w) in &q_widths {
        *gaps.entry(p).or_insert(0) += w;
    }
    for (node, edits) in r_slice.members() {
        members.insert(*node, edits.clone());
    }

    let mut block = Block::from_parts(BlockId::fresh(), consensus, gaps, members);
    block.reconsensus();
    Ok(block)
}
