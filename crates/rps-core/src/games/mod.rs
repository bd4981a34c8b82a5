//! Game definitions and logic.

mod rps;

pub use rps::{Move, RpsGame};
