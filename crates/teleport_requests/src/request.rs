//! Pending requests and the table that owns them.

use std::collections::HashMap;
use std::hash::Hash;

/// Logical server time, one step per host loop iteration.
pub type Tick = u64;

/// An unanswered teleport request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest<Id> {
    /// The actor who has to accept
    pub target: Id,
    /// The actor who wants to be moved
    pub requester: Id,
    /// Tick at which the request was stored
    pub created_at: Tick,
}

impl<Id: Clone> PendingRequest<Id> {
    /// The ticket that identifies exactly this request at expiry time.
    pub fn ticket(&self) -> ExpiryTicket<Id> {
        ExpiryTicket {
            target: self.target.clone(),
            requester: self.requester.clone(),
            created_at: self.created_at,
        }
    }
}

/// Captured when a request is stored and handed back to the manager once the
/// expiry delay elapsed.
///
/// A ticket only expires the request it was issued for: both the requester
/// and the creation tick must still match the stored entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpiryTicket<Id> {
    pub target: Id,
    pub requester: Id,
    pub created_at: Tick,
}

impl<Id: PartialEq> ExpiryTicket<Id> {
    pub fn matches(&self, request: &PendingRequest<Id>) -> bool {
        self.target == request.target
            && self.requester == request.requester
            && self.created_at == request.created_at
    }
}

/// `target -> PendingRequest` mapping. At most one entry per target.
#[derive(Debug, Clone)]
pub struct RequestTable<Id> {
    entries: HashMap<Id, PendingRequest<Id>>,
}

impl<Id> RequestTable<Id>
where
    Id: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Stores `request`, returning the entry it replaced for the same target.
    pub fn insert(&mut self, request: PendingRequest<Id>) -> Option<PendingRequest<Id>> {
        self.entries.insert(request.target.clone(), request)
    }

    pub fn get(&self, target: &Id) -> Option<&PendingRequest<Id>> {
        self.entries.get(target)
    }

    pub fn remove(&mut self, target: &Id) -> Option<PendingRequest<Id>> {
        self.entries.remove(target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingRequest<Id>> {
        self.entries.values()
    }
}

impl<Id> Default for RequestTable<Id>
where
    Id: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(target: u32, requester: u32, created_at: Tick) -> PendingRequest<u32> {
        PendingRequest {
            target,
            requester,
            created_at,
        }
    }

    #[test]
    fn test_insert_replaces_per_target() {
        let mut table = RequestTable::new();
        assert!(table.insert(request(1, 2, 0)).is_none());
        assert!(table.insert(request(3, 2, 0)).is_none());

        let replaced = table.insert(request(1, 4, 10));
        assert_eq!(replaced, Some(request(1, 2, 0)));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&1).map(|r| r.requester), Some(4));
    }

    #[test]
    fn test_ticket_matches_only_its_request() {
        let original = request(1, 2, 5);
        let ticket = original.ticket();
        assert!(ticket.matches(&original));

        // Same requester asking again later is a different request.
        assert!(!ticket.matches(&request(1, 2, 6)));
        assert!(!ticket.matches(&request(1, 3, 5)));
        assert!(!ticket.matches(&request(9, 2, 5)));
    }
}
