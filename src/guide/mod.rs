//! Guide construction and output
//!
//! Aggregated fetch results are turned into a single, ordered guide by the
//! [`ProgramMerger`], wrapped into a [`crate::models::GuideDocument`] by the
//! [`GuideAssembler`] and persisted by a [`GuideWriter`].

pub mod assembler;
pub mod merger;
pub mod xmltv;

pub use assembler::GuideAssembler;
pub use merger::{stitch, MergedGuide, ProgramMerger};
pub use xmltv::{render_xmltv, GuideWriter, XmltvFileWriter};
