//! # recall-packer
//!
//! Turns ranked evidence into the two portable formats handed to generation:
//! a budget-bounded [`TextPack`](recall_core::models::TextPack) and a
//! [`GraphPack`](recall_core::models::GraphPack) cut from the snapshot the
//! evidence was retrieved from.

pub mod graph_pack;
pub mod packer;
pub mod text_pack;

pub use graph_pack::pack_graph;
pub use packer::Packer;
pub use text_pack::{pack_text, provenance_tag};
