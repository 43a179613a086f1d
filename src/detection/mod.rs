//! Hole and boundary detection

pub mod boundary;

pub use boundary::{find_boundary, locate_hole, neighborhood};
