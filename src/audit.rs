use serde_json::Value;
use uuid::Uuid;

use crate::{models::AuditEntry, state::AppState};

/// Best-effort audit trail. Failures are logged, never surfaced.
pub async fn log_audit(
    state: &AppState,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) {
    let entry = AuditEntry {
        id: Uuid::new_v4(),
        user_id,
        action: action.to_string(),
        resource: resource.map(str::to_string),
        metadata,
    };

    if let Err(err) = state.store.audit.record_audit(entry).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
