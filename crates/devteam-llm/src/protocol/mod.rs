//! Wire format types for each vendor API
//!
//! Pure serde structs matching the vendors' JSON. They never leave the
//! adapter layer.

pub mod anthropic;
pub mod google;
pub mod openai;
