//! Mechanical bot policies for the Big Two server. They enumerate legal
//! plays with the combination cursor and pick one; there is no strategy.

pub mod policy;

pub use policy::{LowestPlayPolicy, RandomPolicy, legal_plays};
