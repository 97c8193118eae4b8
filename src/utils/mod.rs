//! Small helpers shared by the stream driver and the command line.

pub mod grouping;
