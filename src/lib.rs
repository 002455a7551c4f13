//! Tactical motif detection for chess positions.
//!
//! Given a position snapshot, the crate derives geometric motifs (pins,
//! skewers, x-rays, discovered attacks, forks), vulnerability motifs
//! (hanging, trapped, overloaded and capturable-defender pieces), king
//! safety findings (exposed kings, back-rank weaknesses, mate threats and
//! named mate patterns), attaches a static-exchange-based material
//! judgement to each, and cross-references motifs that share squares.
//!
//! The entry point is [`analysis::analyze_tactics`]; everything it returns
//! is plain serializable data with no references back into the board.

pub mod analysis;
pub mod board;
pub mod error;
pub mod motifs;
pub mod rays;
pub mod see;
pub mod valuation;
pub mod values;

pub use analysis::{analyze_tactics, piece_index, AnalysisConfig};
pub use board::board_from_fen;
pub use error::AnalysisError;
pub use motifs::TacticalMotifs;
pub use see::see;
