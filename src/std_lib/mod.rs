//! Built-ins of the implicit root class.

pub mod object;
