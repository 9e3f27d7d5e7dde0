//! LatticeWorks shared plumbing.

pub mod logging;
