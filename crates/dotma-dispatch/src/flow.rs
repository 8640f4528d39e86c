//! Per-user interactive flow guard.
//!
//! A confirmation flow holds the guard for its user until it resolves
//! (confirmed, declined, or timed out). A second flow started for the
//! same user while one is pending is rejected, never interleaved.

use std::sync::Arc;

use dashmap::DashSet;

use dotma_common::UserId;

/// Tracks which users currently have a pending confirmation flow.
#[derive(Debug, Default, Clone)]
pub struct FlowGuard {
    pending: Arc<DashSet<UserId>>,
}

impl FlowGuard {
    /// Creates an empty guard set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tries to open a flow for `user`. Returns `None` while another
    /// flow is pending for the same user.
    pub fn try_begin(&self, user: UserId) -> Option<FlowTicket> {
        if self.pending.insert(user) {
            Some(FlowTicket {
                pending: self.pending.clone(),
                user,
            })
        } else {
            None
        }
    }

    /// Whether a flow is pending for `user`.
    pub fn is_pending(&self, user: UserId) -> bool {
        self.pending.contains(&user)
    }
}

/// Held for the lifetime of one interactive flow; releases the user's
/// slot on drop, so every exit path (including timeout) releases it.
#[derive(Debug)]
pub struct FlowTicket {
    pending: Arc<DashSet<UserId>>,
    user: UserId,
}

impl Drop for FlowTicket {
    fn drop(&mut self) {
        self.pending.remove(&self.user);
    }
}
