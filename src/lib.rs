#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_raw as raw;
pub use vc_vector as vector;

pub use vc_vector::{Vector, vector};
