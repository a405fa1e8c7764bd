//! # Collection of Basic Data Structures
//!
//! This module contains the following submodules:
//!
//! - `ring`: Sentinel-based circular ring with arena-based storage.
//! - `storage`: Arena-based storage to deal with linked data structures.

pub mod ring;
pub mod storage;
