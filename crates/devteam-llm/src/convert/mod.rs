//! Bidirectional conversion between canonical types and wire formats
//!
//! Each submodule handles one vendor. Outbound functions build request
//! bodies from the transcript; inbound functions rebuild canonical messages
//! from vendor messages and responses.

pub mod anthropic;
pub mod google;
pub mod openai;

use crate::types::LOCAL_ID_PREFIX;

/// Generate a tool-use id for a call the vendor left unnamed
pub(crate) fn local_tool_use_id() -> String {
    format!("{LOCAL_ID_PREFIX}{}", uuid::Uuid::new_v4().simple())
}
