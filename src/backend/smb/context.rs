//! Process-wide client context shared by the SMB surfaces.
//!
//! libsmbclient keeps a single context per process: opening a second client
//! reuses it and dropping any client frees it. `ContextSlot` owns that one
//! client and counts leases on it. The client is dropped only when the last
//! lease goes, and a lease for a different server or credential pair is
//! refused while one is live. Every call into the client runs under the slot
//! lock, so the context is never used from two threads at once.

#![cfg_attr(not(all(unix, feature = "smbclient")), allow(dead_code))]

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use crate::error::FsError;

struct Live<K, C> {
    key: K,
    leases: usize,
    client: C,
}

pub struct ContextSlot<K, C> {
    live: Mutex<Option<Live<K, C>>>,
}

impl<K, C> ContextSlot<K, C> {
    pub const fn new() -> Self {
        ContextSlot {
            live: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Live<K, C>>> {
        // A panic inside a client call leaves the count intact.
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[cfg(test)]
    fn leases(&self) -> usize {
        self.lock().as_ref().map_or(0, |live| live.leases)
    }
}

impl<K: PartialEq + fmt::Display, C> ContextSlot<K, C> {
    /// Lease the live client for `key`, opening it with `open` if none is live.
    pub fn acquire<F>(&'static self, key: K, open: F) -> Result<ContextLease<K, C>, FsError>
    where
        F: FnOnce() -> Result<C, FsError>,
    {
        let mut live = self.lock();
        match live.as_mut() {
            Some(current) if current.key == key => current.leases += 1,
            Some(current) => {
                return Err(FsError::Config(format!(
                    "an SMB context for {} is already open in this process; \
                     cannot open another for {}",
                    current.key, key
                )));
            }
            None => {
                let client = open()?;
                *live = Some(Live {
                    key,
                    leases: 1,
                    client,
                });
            }
        }
        Ok(ContextLease { slot: self })
    }
}

/// One holder of the shared client. Dropping the last lease drops the client.
pub struct ContextLease<K: 'static, C: 'static> {
    slot: &'static ContextSlot<K, C>,
}

impl<K: 'static, C: 'static> ContextLease<K, C> {
    /// Run `f` against the shared client while holding the slot lock.
    pub fn with_client<T>(&self, f: impl FnOnce(&C) -> T) -> Result<T, FsError> {
        let live = self.slot.lock();
        match live.as_ref() {
            Some(live) => Ok(f(&live.client)),
            None => Err(FsError::ProtocolError(
                "SMB client context was released".to_string(),
            )),
        }
    }
}

impl<K: 'static, C: 'static> Drop for ContextLease<K, C> {
    fn drop(&mut self) {
        let mut live = self.slot.lock();
        let last = match live.as_mut() {
            Some(current) => {
                current.leases = current.leases.saturating_sub(1);
                current.leases == 0
            }
            None => false,
        };
        if last {
            // Freed under the lock so a concurrent acquire cannot pick up a
            // context that is being torn down.
            *live = None;
        }
    }
}
