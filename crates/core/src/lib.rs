pub mod config;
pub mod error;
pub mod problem;

pub use config::{Config, EmailConfig};
pub use error::*;
pub use problem::{Problem, ProblemSet};
