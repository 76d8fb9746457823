//! Transport plan and remote object handles.

use serde::{Deserialize, Serialize};

/// How a payload reaches the backend.
///
/// Chosen once per request and never switched within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TransportPlan {
    /// Payload embedded directly in the generation request
    #[display("inline")]
    Inline,
    /// Payload uploaded out of band and referenced by handle
    #[display("remote upload")]
    RemoteUpload,
}

/// Reference to an object previously uploaded to the backend's file store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteHandle {
    /// Resource name, e.g. `files/abc123`
    pub name: String,
    /// URI used to reference the object in generation requests
    pub uri: String,
    /// MIME type the object was uploaded with
    pub mime_type: String,
}
