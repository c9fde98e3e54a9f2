//! Audit trail for record mutations
//!
//! Every create/update/delete on a finance resource appends an entry.
//! Entries are hash-chained so a rewritten entry can be detected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::Result;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub audit_id: Uuid,
    pub action: AuditAction,
    pub resource: String,
    pub resource_id: String,
    pub actor: Option<String>,
    pub at: DateTime<Utc>,
    /// Hash of the previous entry, empty for the first one
    pub previous_hash: String,
    pub hash: String,
}

/// The hashed part of an entry
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashedFields<'a> {
    audit_id: &'a Uuid,
    action: AuditAction,
    resource: &'a str,
    resource_id: &'a str,
    actor: &'a Option<String>,
    at: &'a DateTime<Utc>,
    previous_hash: &'a str,
}

impl AuditEntry {
    fn hashed_fields(&self) -> HashedFields<'_> {
        HashedFields {
            audit_id: &self.audit_id,
            action: self.action,
            resource: &self.resource,
            resource_id: &self.resource_id,
            actor: &self.actor,
            at: &self.at,
            previous_hash: &self.previous_hash,
        }
    }
}

/// Audit trail storage
pub struct AuditLog {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append an entry for a mutation
    pub async fn record(
        &self,
        action: AuditAction,
        resource: &str,
        resource_id: &str,
        actor: Option<&str>,
    ) -> Result<Uuid> {
        let mut entries = self.entries.write().await;

        let previous_hash = entries
            .last()
            .map(|entry| entry.hash.clone())
            .unwrap_or_default();

        let mut entry = AuditEntry {
            audit_id: Uuid::new_v4(),
            action,
            resource: resource.to_string(),
            resource_id: resource_id.to_string(),
            actor: actor.map(str::to_string),
            at: Utc::now(),
            previous_hash,
            hash: String::new(),
        };
        entry.hash = compute_entry_hash(&entry)?;

        debug!(
            audit_id = %entry.audit_id,
            action = ?action,
            resource = %resource,
            resource_id = %resource_id,
            "Audit entry recorded"
        );

        let audit_id = entry.audit_id;
        entries.push(entry);
        Ok(audit_id)
    }

    /// All entries, oldest first
    pub async fn list(&self) -> Vec<AuditEntry> {
        self.entries.read().await.clone()
    }

    /// Entries about one resource instance
    pub async fn list_for(&self, resource: &str, resource_id: &str) -> Vec<AuditEntry> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .filter(|e| e.resource == resource && e.resource_id == resource_id)
            .cloned()
            .collect()
    }

    /// Recompute every hash and check the chain links
    pub async fn verify_integrity(&self) -> Result<bool> {
        let entries = self.entries.read().await;
        let mut previous = String::new();

        for entry in entries.iter() {
            if entry.previous_hash != previous || compute_entry_hash(entry)? != entry.hash {
                return Ok(false);
            }
            previous = entry.hash.clone();
        }

        Ok(true)
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

/// SHA256 over the entry's JSON, streamed straight into the hasher
fn compute_entry_hash(entry: &AuditEntry) -> Result<String> {
    let mut hasher = Sha256::new();
    serde_json::to_writer(&mut HashWriter(&mut hasher), &entry.hashed_fields())?;
    Ok(hex::encode(hasher.finalize()))
}

/// Adapter to allow writing into Sha256 via std::io::Write
struct HashWriter<'a, H: Digest>(&'a mut H);

impl<'a, H: Digest> Write for HashWriter<'a, H> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
