//! Common imports for code that reads or mutates documents.

pub use crate::offsets::OffsetTheory;
pub use crate::reference::Ref;
pub use crate::sequence::SequenceTheory;
pub use crate::theories::*;
pub use crate::{Document, Theory};
