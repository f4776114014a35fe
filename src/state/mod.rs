//! Wizard state module

mod forms;

pub use forms::*;
