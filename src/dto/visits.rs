use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Browser/device characteristics the fingerprint is derived from.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct DeviceTraits {
    #[validate(length(max = 512))]
    pub user_agent: String,
    #[validate(length(max = 35))]
    pub locale: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub color_depth: u8,
    /// Minutes from UTC as reported by the browser.
    pub timezone_offset: i32,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct RecordVisitRequest {
    /// Identifier kept in the client's local storage, if any.
    pub client_id: Option<Uuid>,
    #[validate(nested)]
    pub device: DeviceTraits,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VisitRecorded {
    pub client_id: Uuid,
    pub visit_id: Uuid,
    /// True when this visit created the client record.
    pub new_client: bool,
}
