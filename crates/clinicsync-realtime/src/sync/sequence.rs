//! Issue-order sequencing of refresh requests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Issuance number of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// Decides which completed requests may be applied.
///
/// A completion is applied only if no request issued after it has already
/// completed. The latest *issued* request wins, whatever order the
/// responses arrive in.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
    /// Highest ticket applied so far.
    completed: Mutex<u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a new request.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Run `apply` for `ticket` unless a later-issued request has already
    /// completed, in which case `None` is returned.
    ///
    /// `apply` receives whether `ticket` is the most recently issued
    /// request. It runs while the sequencer is locked, so two completions
    /// never interleave.
    pub fn try_complete<R>(&self, ticket: RequestTicket, apply: impl FnOnce(bool) -> R) -> Option<R> {
        let mut completed = self.completed.lock().unwrap_or_else(|e| e.into_inner());
        if ticket.0 <= *completed {
            return None;
        }
        *completed = ticket.0;
        let latest = ticket.0 == self.issued.load(Ordering::SeqCst);
        Some(apply(latest))
    }

    /// Number of requests issued so far.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_order_completions_apply() {
        let seq = RequestSequencer::new();
        let r1 = seq.issue();
        assert_eq!(seq.try_complete(r1, |latest| latest), Some(true));
        let r2 = seq.issue();
        assert_eq!(seq.try_complete(r2, |latest| latest), Some(true));
    }

    #[test]
    fn test_older_completion_after_newer_is_discarded() {
        let seq = RequestSequencer::new();
        let r1 = seq.issue();
        let r2 = seq.issue();
        assert_eq!(seq.try_complete(r2, |_| "r2"), Some("r2"));
        assert_eq!(seq.try_complete(r1, |_| "r1"), None);
    }

    #[test]
    fn test_older_completion_first_is_applied_but_not_latest() {
        let seq = RequestSequencer::new();
        let r1 = seq.issue();
        let r2 = seq.issue();
        assert_eq!(seq.try_complete(r1, |latest| latest), Some(false));
        assert_eq!(seq.try_complete(r2, |latest| latest), Some(true));
        assert_eq!(seq.issued(), 2);
    }
}
