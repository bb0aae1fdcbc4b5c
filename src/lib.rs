#[macro_use] extern crate log;

mod error;
mod disjoint_set;
mod naive;
mod kruskal;
mod workload;

pub use error::DisjointSetError;
pub use disjoint_set::DisjointSet;
pub use naive::NaiveDisjointSet;
pub use kruskal::{minimum_spanning_forest, connected_components};
pub use workload::{Workload, WorkloadError, Op, Outcome, write_outcomes, MAX_RANDOM_ITERATIONS};
