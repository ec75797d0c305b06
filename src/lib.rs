#![doc = include_str!("../README.md")]
#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate alloc;

mod decode;
mod guess;
mod infer;
mod merge;
mod probe;

pub use guess::{guess_abi_encoded_data, guess_fragment};

#[doc(no_inline)]
pub use alloy_dyn_abi::{DynSolType, DynSolValue};
#[doc(no_inline)]
pub use hex;
