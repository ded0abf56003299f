pub mod libs;

pub use crate::libs::block::{Alignment, Block, BlockError, BlockId, Child, NodeId, Strand};
pub use crate::libs::cigar::{Cigar, Op};
pub use crate::libs::interval::{Interval, IntervalSet};
pub use crate::libs::io::{reader, writer};
