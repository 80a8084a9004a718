//! Protocol state machine
//!
//! Tracks where the slave is inside a bus transaction. The state only
//! changes from interrupt context; foreground code never sees it.

pub mod machine;

pub use machine::ProtocolState;
