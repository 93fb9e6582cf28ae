//! UI widgets for the readout screen.

pub mod dialog;
pub mod help;
pub mod readout;
pub mod status_bar;

pub use dialog::{dialog_height, render_dialog};
pub use help::render_help;
pub use readout::render_readout;
pub use status_bar::render_status_bar;
