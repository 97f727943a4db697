use std::future::Future;
use tracing::{info, warn};

use super::{BackupError, RecordKind, RestorePlan};
use crate::domain::session::{SessionContext, SessionUser};
use crate::storage::EntityStore;
use shared::{RestoreSummary, SkippedRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Succeeded { id: i64 },
    Skipped { reason: String },
}

/// Result of inserting a single planned record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    pub kind: RecordKind,
    pub name: String,
    pub outcome: InsertOutcome,
}

impl RecordOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, InsertOutcome::Succeeded { .. })
    }
}

/// Every per-record outcome of a restore, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertionReport {
    pub outcomes: Vec<RecordOutcome>,
    /// First user inserted, now the session user
    pub active_user: Option<SessionUser>,
}

impl InsertionReport {
    pub fn inserted(&self, kind: RecordKind) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.kind == kind && outcome.succeeded())
            .count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.succeeded())
    }

    pub fn to_summary(&self) -> RestoreSummary {
        let skipped: Vec<SkippedRecord> = self
            .skipped()
            .filter_map(|outcome| match &outcome.outcome {
                InsertOutcome::Skipped { reason } => Some(SkippedRecord {
                    kind: outcome.kind.to_string(),
                    name: outcome.name.clone(),
                    reason: reason.clone(),
                }),
                InsertOutcome::Succeeded { .. } => None,
            })
            .collect();

        let users = self.inserted(RecordKind::User);
        let wardrobes = self.inserted(RecordKind::Wardrobe);
        let clothes = self.inserted(RecordKind::Clothes);
        let shoes = self.inserted(RecordKind::Shoes);

        let mut message = format!(
            "Restored {} users, {} wardrobes, {} clothes and {} shoes",
            users, wardrobes, clothes, shoes
        );
        if !skipped.is_empty() {
            message.push_str(&format!(" ({} skipped)", skipped.len()));
        }

        RestoreSummary {
            users_count: users,
            wardrobes_count: wardrobes,
            clothes_count: clothes,
            shoes_count: shoes,
            skipped,
            active_user_id: self.active_user.as_ref().map(|user| user.id),
            message,
        }
    }
}

async fn insert_record<F>(kind: RecordKind, name: &str, insert: F) -> RecordOutcome
where
    F: Future<Output = anyhow::Result<i64>>,
{
    let outcome = match insert.await {
        Ok(id) => InsertOutcome::Succeeded { id },
        Err(e) => {
            let error = BackupError::RecordInsert {
                kind,
                name: name.to_string(),
                reason: format!("{:#}", e),
            };
            warn!("{}", error);
            InsertOutcome::Skipped {
                reason: format!("{:#}", e),
            }
        }
    };

    RecordOutcome {
        kind,
        name: name.to_string(),
        outcome,
    }
}

/// Insert a restore plan record by record: users, wardrobes, clothes, shoes.
///
/// A failing record is skipped and processing continues. The first user that
/// is inserted becomes the session user. Nothing is rolled back.
pub async fn insert_planned_records(
    plan: &RestorePlan,
    store: &EntityStore,
    session: &SessionContext,
) -> InsertionReport {
    let mut report = InsertionReport::default();

    for user in &plan.users {
        let outcome = insert_record(RecordKind::User, &user.name, store.users.insert_user(user)).await;
        if let InsertOutcome::Succeeded { id } = outcome.outcome {
            if report.active_user.is_none() {
                let session_user = SessionUser {
                    id,
                    name: user.name.clone(),
                };
                session.assign(session_user.clone());
                report.active_user = Some(session_user);
            }
        }
        report.outcomes.push(outcome);
    }

    for wardrobe in &plan.wardrobes {
        let insert = store.wardrobes.insert_wardrobe(wardrobe);
        report
            .outcomes
            .push(insert_record(RecordKind::Wardrobe, &wardrobe.name, insert).await);
    }

    for item in &plan.clothes {
        let insert = store.clothes.insert_clothes(item);
        report
            .outcomes
            .push(insert_record(RecordKind::Clothes, &item.name, insert).await);
    }

    for item in &plan.shoes {
        let insert = store.shoes.insert_shoes(item);
        report
            .outcomes
            .push(insert_record(RecordKind::Shoes, &item.name, insert).await);
    }

    info!(
        "Inserted {} of {} planned records",
        report.outcomes.iter().filter(|outcome| outcome.succeeded()).count(),
        plan.record_count()
    );

    report
}
