pub mod benchmark;
pub mod rng;
pub mod runner;
pub mod scenario;
pub mod sim;
pub mod snapshot;
pub mod util;
