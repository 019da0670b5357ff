//! Read-only views of the deletion history and the update log.

use inventory_core::{InventoryHistoryEntry, InventoryLogEntry};

use super::{CommandOutcome, CommandResult};
use crate::session::Session;

/// Snapshots of deleted rows, newest first. `item_code` narrows to one item.
pub async fn deletion_history(
    session: &Session,
    item_code: Option<&str>,
) -> CommandResult<Vec<InventoryHistoryEntry>> {
    session.require_admin("audit history")?;

    let audit = session.db().audit();
    let entries = match item_code {
        Some(code) => audit.history_for(code).await?,
        None => audit.list_history().await?,
    };
    Ok(CommandOutcome::new(
        format!("{} deletion(s) recorded", entries.len()),
        entries,
    ))
}

/// Update log entries, newest first.
pub async fn update_log(
    session: &Session,
    item_code: Option<&str>,
) -> CommandResult<Vec<InventoryLogEntry>> {
    session.require_admin("audit logs")?;

    let audit = session.db().audit();
    let entries = match item_code {
        Some(code) => audit.logs_for(code).await?,
        None => audit.list_logs().await?,
    };
    Ok(CommandOutcome::new(
        format!("{} log entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" }),
        entries,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::session::test_support::*;
    use inventory_core::{NewInventoryItem, DELETE_ACTION};

    #[tokio::test]
    async fn test_deletions_show_up_newest_first() {
        let session = admin_session().await;
        let repo = session.db().inventory();
        for name in ["Chair", "Table"] {
            repo.add_item(&NewInventoryItem {
                item_name: name.to_string(),
                category: "Furniture".to_string(),
                quantity: 2,
            })
            .await
            .unwrap();
        }
        repo.delete("A001").await.unwrap();
        repo.delete("A002").await.unwrap();

        let all = deletion_history(&session, None).await.unwrap().data;
        let codes: Vec<&str> = all.iter().map(|e| e.item_code.as_str()).collect();
        assert_eq!(codes, vec!["A002", "A001"]);
        assert!(all.iter().all(|e| e.action == DELETE_ACTION));

        let one = deletion_history(&session, Some("A001")).await.unwrap().data;
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].item_name, "Chair");
    }

    #[tokio::test]
    async fn test_empty_log() {
        let session = admin_session().await;
        let outcome = update_log(&session, None).await.unwrap();
        assert!(outcome.data.is_empty());
        assert_eq!(outcome.message, "0 log entries");
    }

    #[tokio::test]
    async fn test_audit_needs_login() {
        let session = session().await;
        let err = deletion_history(&session, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }
}
