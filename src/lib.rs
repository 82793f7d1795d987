#![cfg_attr(not(any(test, doctest, feature = "std")), no_std)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod process;
pub use process::*;
mod num;
pub use num::*;
mod error;
pub use error::*;
mod pdm;
pub use pdm::*;
mod bits;
pub use bits::*;
mod upsample;
pub use upsample::*;
mod cic;
pub use cic::*;
mod config;
pub use config::*;
