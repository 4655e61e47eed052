//! Export of derived data
//!
//! Currently supports frame-time CSV: one column per model with the commit
//! intervals of each frame, for spreadsheets and plotting tools.

pub mod frame_times;

pub use frame_times::FrameTimesExporter;
