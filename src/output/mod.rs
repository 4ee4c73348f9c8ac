//! Artifacts for downstream plotting and human-readable summaries.

mod json;
mod terminal;
mod text;

pub use json::{load_draws, save_draws, to_json, to_json_pretty, write_report};
pub use terminal::format_report;
pub use text::{
    format_entropy_traces, parse_entropy_traces, read_convergence_index, read_entropy_traces,
    write_convergence_index, write_entropy_traces,
};

use std::path::Path;

use crate::error::OutputError;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> OutputError + '_ {
    move |source| OutputError::Io {
        path: path.display().to_string(),
        source,
    }
}
