pub mod chain_resolver;
pub mod component;
pub mod convergence;
pub mod equivalence;
pub mod equivalence_scanner;
pub mod grid;
pub mod run_labeler;
