#![allow(clippy::must_use_candidate)]

pub mod cached_powers;
mod diy_fp;
mod ieee;

pub use diy_fp::DiyFp;
pub use ieee::Double;
