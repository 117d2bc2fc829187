pub mod check_parent;
pub mod config;
pub mod progress;
pub mod run;
pub mod strict;
pub mod tree;
pub mod validate;
