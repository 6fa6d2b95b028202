pub mod ai;
pub mod calculators;
pub mod context;
pub mod stats;
pub mod trace;

#[cfg(test)]
mod tests;
