pub mod action_outputs;
pub mod output;

pub use action_outputs::{format_outputs, write_outputs};
pub use output::Output;
