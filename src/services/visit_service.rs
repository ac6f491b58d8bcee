use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::visits::{DeviceTraits, RecordVisitRequest, VisitRecorded},
    entity::{
        clients::{ActiveModel as ClientActive, Column as ClientCol, Entity as Clients},
        visits::ActiveModel as VisitActive,
    },
    error::AppResult,
    response::ApiResponse,
    state::AppState,
};

/// Weak anonymous identifier: hex SHA-256 over the device traits.
pub fn fingerprint(device: &DeviceTraits) -> String {
    let material = format!(
        "{}|{}|{}x{}x{}|{}",
        device.user_agent,
        device.locale,
        device.screen_width,
        device.screen_height,
        device.color_depth,
        device.timezone_offset
    );
    hex::encode(Sha256::digest(material.as_bytes()))
}

/// Resolve the client (stored id, then fingerprint, else new) and append a
/// visit. The cooldown between visits is applied by the caller before
/// reaching this endpoint.
pub async fn record_visit(
    state: &AppState,
    payload: RecordVisitRequest,
) -> AppResult<ApiResponse<VisitRecorded>> {
    payload.validate()?;
    let now = Utc::now();

    let by_id = match payload.client_id {
        Some(id) => Clients::find_by_id(id).one(&state.orm).await?,
        None => None,
    };

    let fingerprint = fingerprint(&payload.device);
    let existing = match by_id {
        Some(client) => Some(client),
        None => {
            Clients::find()
                .filter(ClientCol::Fingerprint.eq(fingerprint.clone()))
                .one(&state.orm)
                .await?
        }
    };

    let (client_id, new_client) = match existing {
        Some(client) => {
            let id = client.id;
            let mut active: ClientActive = client.into();
            active.last_seen_at = Set(now.into());
            active.update(&state.orm).await?;
            (id, false)
        }
        None => {
            let client = ClientActive {
                id: Set(Uuid::new_v4()),
                fingerprint: Set(fingerprint),
                user_agent: Set(Some(payload.device.user_agent.clone())
                    .filter(|ua| !ua.is_empty())),
                created_at: NotSet,
                last_seen_at: Set(now.into()),
            }
            .insert(&state.orm)
            .await?;
            tracing::debug!(client_id = %client.id, "new client registered");
            (client.id, true)
        }
    };

    let visit = VisitActive {
        id: Set(Uuid::new_v4()),
        client_id: Set(client_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Visit recorded",
        VisitRecorded {
            client_id,
            visit_id: visit.id,
            new_client,
        },
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> DeviceTraits {
        DeviceTraits {
            user_agent: "Mozilla/5.0".into(),
            locale: "es-MX".into(),
            screen_width: 390,
            screen_height: 844,
            color_depth: 24,
            timezone_offset: 360,
        }
    }

    #[test]
    fn fingerprint_is_stable_hex() {
        let first = fingerprint(&device());
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(first, fingerprint(&device()));
    }

    #[test]
    fn fingerprint_changes_with_any_trait() {
        let base = fingerprint(&device());
        let mut other = device();
        other.timezone_offset = 300;
        assert_ne!(base, fingerprint(&other));
    }
}
