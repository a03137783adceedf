//! Data structures of the object model: values, property tables, functions,
//! class records and instances.

pub mod call_stack;
pub mod class;
pub mod error;
pub mod function;
pub mod instance;
pub mod method_table;
pub mod object;
pub mod property;
pub mod value;
