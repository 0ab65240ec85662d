//! Display name -> session identifier mapping.
//!
//! The mapping lets a returning user find their conversation again by typing
//! the same name. It is a convenience lookup with no confidentiality
//! guarantee: anyone who knows a name can resume that session.

pub mod store;
