//! Class composition and dispatch.
//!
//! - **[`realm`]** - the class arena and the composition operations
//! - **[`descriptor`]** - fluent composition handle
//! - **[`dispatch`]** - invocation, super pointer management, property access
//! - **[`namespace`]** - dotted-path registration

pub mod descriptor;
pub mod dispatch;
pub mod namespace;
pub mod realm;
