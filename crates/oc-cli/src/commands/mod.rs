//! CLI subcommand implementations.

pub mod cancel;
pub mod clock_in;
pub mod clock_out;
pub mod recalc;
pub mod report;
pub mod status;
pub mod util;
