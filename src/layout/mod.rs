pub(crate) mod auto_adjust;
pub(crate) mod config;
pub(crate) mod engine;
