//! Logins staged between `LOGIN` and the wait-module confirmation.
//!
//! A client logs in on one connection, then opens a second one and
//! confirms. The only thing tying the two together is the source IP, so
//! entries are keyed by address. Each entry carries a ticket; its expiry
//! task removes it only if the ticket still matches, so a re-login from
//! the same address is not cut short by the older timer.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use crate::{Player, SessionError};

struct PendingEntry {
    ticket: u64,
    player: Player,
}

/// Provisional players awaiting confirmation, keyed by source IP.
#[derive(Clone)]
pub struct PendingLogins {
    entries: Arc<Mutex<HashMap<IpAddr, PendingEntry>>>,
    tickets: Arc<AtomicU64>,
    ttl: Duration,
}

impl PendingLogins {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            tickets: Arc::new(AtomicU64::new(1)),
            ttl,
        }
    }

    /// Stages `player` for `address` and schedules its expiry.
    ///
    /// Replaces any earlier entry from the same address.
    ///
    /// # Errors
    /// [`SessionError::NameTaken`] if another address has the same name
    /// pending.
    pub async fn insert(&self, address: IpAddr, player: Player) -> Result<(), SessionError> {
        let ticket = self.tickets.fetch_add(1, Ordering::Relaxed);
        {
            let mut entries = self.entries.lock().await;
            let clash = entries
                .iter()
                .any(|(ip, e)| *ip != address && e.player.name() == player.name());
            if clash {
                return Err(SessionError::NameTaken(player.name().to_owned()));
            }
            tracing::debug!(%address, name = %player.name(), "login staged");
            entries.insert(address, PendingEntry { ticket, player });
        }

        let entries = Arc::clone(&self.entries);
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut entries = entries.lock().await;
            if entries.get(&address).is_some_and(|e| e.ticket == ticket) {
                entries.remove(&address);
                tracing::debug!(%address, "staged login expired");
            }
        });

        Ok(())
    }

    /// Takes the staged player for `address` if its name matches.
    ///
    /// # Errors
    /// - [`SessionError::PendingNotFound`]: nothing staged (or expired).
    /// - [`SessionError::PendingNameMismatch`]: staged under another name;
    ///   the entry is kept.
    pub async fn confirm(&self, address: IpAddr, name: &str) -> Result<Player, SessionError> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .get(&address)
            .ok_or(SessionError::PendingNotFound(address))?;

        if entry.player.name() != name {
            return Err(SessionError::PendingNameMismatch {
                expected: entry.player.name().to_owned(),
                got: name.to_owned(),
            });
        }

        let entry = entries
            .remove(&address)
            .ok_or(SessionError::PendingNotFound(address))?;
        Ok(entry.player)
    }

    pub async fn contains_name(&self, name: &str) -> bool {
        self.entries
            .lock()
            .await
            .values()
            .any(|e| e.player.name() == name)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
