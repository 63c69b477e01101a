use crate::error::TeleportError;
use crate::host::TeleportHost;
use crate::notice::Notice;
use crate::request::{ExpiryTicket, PendingRequest, RequestTable, Tick};
use crate::DEFAULT_EXPIRY_TICKS;
use std::hash::Hash;
use tracing::{debug, info, warn};

/// Owns the pending requests and enforces consent and timeout.
///
/// The manager does no locking and expects calls to be delivered serially.
/// Host state is never stored: every operation takes the host as an argument.
///
/// # Examples
///
/// ```rust,ignore
/// let mut manager = TeleportRequestManager::new();
/// manager.request_teleport(&mut host, &alice, "bo")?;   // Alice asks Bob
/// manager.accept_teleport(&mut host, &bob)?;            // Alice lands on Bob
/// ```
#[derive(Debug)]
pub struct TeleportRequestManager<Id> {
    table: RequestTable<Id>,
    expiry_delay: Tick,
}

impl<Id> TeleportRequestManager<Id>
where
    Id: Clone + Eq + Hash + std::fmt::Debug,
{
    /// A manager with an empty table and the default 30 second expiry.
    pub fn new() -> Self {
        Self::with_table(RequestTable::new(), DEFAULT_EXPIRY_TICKS)
    }

    /// A manager over an existing table.
    pub fn with_table(table: RequestTable<Id>, expiry_delay: Tick) -> Self {
        Self {
            table,
            expiry_delay,
        }
    }

    pub fn expiry_delay(&self) -> Tick {
        self.expiry_delay
    }

    /// Applies to requests made from now on; already scheduled expiries keep
    /// their delay.
    pub fn set_expiry_delay(&mut self, delay: Tick) {
        self.expiry_delay = delay;
    }

    /// Asks for `requester` to be moved to whoever `target_query` resolves to.
    ///
    /// Replaces any request already pending for that target without telling
    /// the previous requester. Exactly one expiry is scheduled per successful
    /// call; the returned ticket is the one that was scheduled.
    pub fn request_teleport<H>(
        &mut self,
        host: &mut H,
        requester: &Id,
        target_query: &str,
    ) -> Result<ExpiryTicket<Id>, TeleportError>
    where
        H: TeleportHost<Id = Id>,
    {
        let Some(target) = host.resolve_by_prefix_or_name(target_query) else {
            debug!("Teleport target '{}' not found", target_query);
            host.notify(requester, &Notice::TargetNotFound);
            return Err(TeleportError::TargetNotFound);
        };

        if &target == requester {
            host.notify(requester, &Notice::SelfTargetDenied);
            return Err(TeleportError::SelfTargetDenied);
        }

        let request = PendingRequest {
            target: target.clone(),
            requester: requester.clone(),
            created_at: host.now(),
        };
        let ticket = request.ticket();

        if let Some(previous) = self.table.insert(request) {
            debug!(
                "Request for {:?} from {:?} replaced by one from {:?}",
                target, previous.requester, requester
            );
        }

        host.schedule_once(self.expiry_delay, ticket.clone());

        let target_name = host.display_name(&target);
        let requester_name = host.display_name(requester);
        host.notify(requester, &Notice::RequestSent { target: target_name.clone() });
        host.notify(
            &target,
            &Notice::RequestReceived {
                requester: requester_name.clone(),
            },
        );

        info!("📨 {} asked to teleport to {}", requester_name, target_name);
        Ok(ticket)
    }

    /// Accepts the request pending for `target`, moving its requester to the
    /// target's current position.
    ///
    /// Returns the requester that was moved.
    pub fn accept_teleport<H>(&mut self, host: &mut H, target: &Id) -> Result<Id, TeleportError>
    where
        H: TeleportHost<Id = Id>,
    {
        let Some(request) = self.table.get(target).cloned() else {
            host.notify(target, &Notice::NoPendingRequest);
            return Err(TeleportError::NoPendingRequest);
        };

        let Some(requester) = host.resolve_exact(&request.requester) else {
            self.table.remove(target);
            host.notify(target, &Notice::RequesterUnreachable);
            debug!("Requester {:?} left before {:?} accepted", request.requester, target);
            return Err(TeleportError::RequesterUnreachable);
        };

        let Some(destination) = host.current_position(target) else {
            warn!("Accepting actor {:?} has no position; request kept", target);
            return Err(TeleportError::TargetNotFound);
        };

        host.relocate(&requester, destination);
        self.table.remove(target);

        let target_name = host.display_name(target);
        let requester_name = host.display_name(&requester);
        host.notify(&requester, &Notice::TeleportedTo { target: target_name.clone() });
        host.notify(
            target,
            &Notice::TeleportedToYou {
                requester: requester_name.clone(),
            },
        );

        info!("✅ Teleported {} to {}", requester_name, target_name);
        Ok(requester)
    }

    /// Handles a ticket whose delay elapsed.
    ///
    /// Removes the pending request and tells its requester only when the
    /// stored entry is still the one the ticket was issued for. Returns
    /// whether anything expired.
    pub fn fire_expiry<H>(&mut self, host: &mut H, ticket: &ExpiryTicket<Id>) -> bool
    where
        H: TeleportHost<Id = Id>,
    {
        match self.table.get(&ticket.target) {
            Some(current) if ticket.matches(current) => {}
            _ => {
                debug!("Stale expiry for {:?} ignored", ticket.target);
                return false;
            }
        }

        self.table.remove(&ticket.target);
        let target_name = host.display_name(&ticket.target);
        host.notify(&ticket.requester, &Notice::RequestExpired { target: target_name.clone() });
        info!("⌛ Teleport request to {} expired", target_name);
        true
    }

    /// The request currently waiting on `target`, if any.
    pub fn pending_for(&self, target: &Id) -> Option<&PendingRequest<Id>> {
        self.table.get(target)
    }

    pub fn pending_count(&self) -> usize {
        self.table.len()
    }

    /// Drops every pending request. Tickets still scheduled become no-ops.
    pub fn clear(&mut self) {
        self.table.clear();
    }
}

impl<Id> Default for TeleportRequestManager<Id>
where
    Id: Clone + Eq + Hash + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ActorDirectory, Mover, Notifier, Scheduler};
    use std::collections::{HashMap, HashSet};

    #[derive(Default)]
    struct MockHost {
        now: Tick,
        names: HashMap<u32, &'static str>,
        online: HashSet<u32>,
        positions: HashMap<u32, i64>,
        notices: Vec<(u32, Notice)>,
        scheduled: Vec<(Tick, ExpiryTicket<u32>)>,
    }

    impl MockHost {
        fn with_players(players: &[(u32, &'static str, i64)]) -> Self {
            let mut host = MockHost::default();
            for (id, name, position) in players {
                host.names.insert(*id, *name);
                host.online.insert(*id);
                host.positions.insert(*id, *position);
            }
            host
        }

        fn notices_for(&self, id: u32) -> Vec<String> {
            self.notices
                .iter()
                .filter(|(to, _)| *to == id)
                .map(|(_, notice)| notice.to_string())
                .collect()
        }
    }

    impl ActorDirectory for MockHost {
        type Id = u32;
        type Position = i64;

        fn resolve_by_prefix_or_name(&self, query: &str) -> Option<u32> {
            let query = query.to_lowercase();
            self.online
                .iter()
                .copied()
                .filter(|id| self.names[id].to_lowercase().starts_with(&query))
                .min_by_key(|id| self.names[id].len())
        }

        fn resolve_exact(&self, id: &u32) -> Option<u32> {
            self.online.contains(id).then_some(*id)
        }

        fn current_position(&self, id: &u32) -> Option<i64> {
            self.online.contains(id).then(|| self.positions[id])
        }

        fn display_name(&self, id: &u32) -> String {
            self.names.get(id).map(|n| n.to_string()).unwrap_or_default()
        }
    }

    impl Notifier for MockHost {
        fn notify(&mut self, to: &u32, notice: &Notice) {
            self.notices.push((*to, notice.clone()));
        }
    }

    impl Mover for MockHost {
        fn relocate(&mut self, who: &u32, to: i64) {
            self.positions.insert(*who, to);
        }
    }

    impl Scheduler for MockHost {
        fn now(&self) -> Tick {
            self.now
        }

        fn schedule_once(&mut self, delay: Tick, ticket: ExpiryTicket<u32>) {
            self.scheduled.push((self.now + delay, ticket));
        }
    }

    const ALICE: u32 = 1;
    const BOB: u32 = 2;
    const CAROL: u32 = 3;

    fn world() -> MockHost {
        MockHost::with_players(&[(ALICE, "Alice", 10), (BOB, "Bob", 20), (CAROL, "Carol", 30)])
    }

    #[test]
    fn test_request_then_accept_relocates_requester() {
        let mut host = world();
        let mut manager = TeleportRequestManager::new();

        let ticket = manager.request_teleport(&mut host, &ALICE, "bo").unwrap();
        assert_eq!(ticket.target, BOB);
        assert_eq!(host.scheduled.len(), 1);
        assert_eq!(host.scheduled[0].0, DEFAULT_EXPIRY_TICKS);
        assert_eq!(host.notices_for(ALICE), vec!["Teleport request sent to Bob"]);
        assert_eq!(
            host.notices_for(BOB),
            vec!["Alice wants to teleport to you. Type /tpaccept to accept."]
        );

        assert_eq!(manager.accept_teleport(&mut host, &BOB), Ok(ALICE));
        assert_eq!(host.positions[&ALICE], 20);
        assert!(manager.pending_for(&BOB).is_none());
        assert_eq!(manager.pending_count(), 0);
    }

    #[test]
    fn test_self_request_is_denied() {
        let mut host = world();
        let mut manager = TeleportRequestManager::new();

        let result = manager.request_teleport(&mut host, &ALICE, "Alice");
        assert_eq!(result, Err(TeleportError::SelfTargetDenied));
        assert_eq!(manager.pending_count(), 0);
        assert!(host.scheduled.is_empty());
        assert_eq!(host.notices_for(ALICE), vec!["You cannot teleport to yourself!"]);
    }

    #[test]
    fn test_unknown_target_is_reported_to_requester_only() {
        let mut host = world();
        let mut manager = TeleportRequestManager::new();

        let result = manager.request_teleport(&mut host, &ALICE, "zed");
        assert_eq!(result, Err(TeleportError::TargetNotFound));
        assert_eq!(manager.pending_count(), 0);
        assert_eq!(host.notices, vec![(ALICE, Notice::TargetNotFound)]);
    }

    #[test]
    fn test_newer_request_overwrites_older_one() {
        let mut host = world();
        let mut manager = TeleportRequestManager::new();

        manager.request_teleport(&mut host, &ALICE, "Bob").unwrap();
        host.now = 5;
        manager.request_teleport(&mut host, &CAROL, "Bob").unwrap();

        assert_eq!(manager.pending_count(), 1);
        assert_eq!(manager.accept_teleport(&mut host, &BOB), Ok(CAROL));
        assert_eq!(host.positions[&CAROL], 20);
        assert_eq!(host.positions[&ALICE], 10);
        // The superseded requester is never told.
        assert_eq!(host.notices_for(ALICE), vec!["Teleport request sent to Bob"]);
    }

    #[test]
    fn test_accept_without_request_changes_nothing() {
        let mut host = world();
        let mut manager = TeleportRequestManager::new();
        manager.request_teleport(&mut host, &ALICE, "Carol").unwrap();

        assert_eq!(
            manager.accept_teleport(&mut host, &BOB),
            Err(TeleportError::NoPendingRequest)
        );
        assert_eq!(manager.pending_count(), 1);
        assert_eq!(host.notices_for(BOB), vec!["No pending teleport requests!"]);
    }

    #[test]
    fn test_unreachable_requester_clears_request() {
        let mut host = world();
        let mut manager = TeleportRequestManager::new();
        manager.request_teleport(&mut host, &ALICE, "Bob").unwrap();
        host.online.remove(&ALICE);
        host.notices.clear();

        assert_eq!(
            manager.accept_teleport(&mut host, &BOB),
            Err(TeleportError::RequesterUnreachable)
        );
        assert!(manager.pending_for(&BOB).is_none());
        assert_eq!(host.notices, vec![(BOB, Notice::RequesterUnreachable)]);
    }

    #[test]
    fn test_target_without_position_keeps_request() {
        let mut host = world();
        let mut manager = TeleportRequestManager::new();
        manager.request_teleport(&mut host, &ALICE, "Bob").unwrap();
        host.online.remove(&BOB);

        assert_eq!(
            manager.accept_teleport(&mut host, &BOB),
            Err(TeleportError::TargetNotFound)
        );
        assert!(manager.pending_for(&BOB).is_some());
        assert_eq!(host.positions[&ALICE], 10);
    }

    #[test]
    fn test_expiry_only_matches_its_own_request() {
        let mut host = world();
        let mut manager = TeleportRequestManager::new();

        let first = manager.request_teleport(&mut host, &ALICE, "Bob").unwrap();
        host.now = 100;
        let second = manager.request_teleport(&mut host, &ALICE, "Bob").unwrap();

        // Same requester, same target: the older ticket must not expire the
        // newer request.
        assert!(!manager.fire_expiry(&mut host, &first));
        assert!(manager.pending_for(&BOB).is_some());

        host.notices.clear();
        assert!(manager.fire_expiry(&mut host, &second));
        assert!(manager.pending_for(&BOB).is_none());
        assert_eq!(host.notices_for(ALICE), vec!["Teleport request to Bob expired."]);

        assert!(!manager.fire_expiry(&mut host, &second));
    }

    #[test]
    fn test_custom_delay_and_clear() {
        let mut host = world();
        let mut manager = TeleportRequestManager::with_table(RequestTable::new(), 40);
        assert_eq!(manager.expiry_delay(), 40);

        host.now = 7;
        let ticket = manager.request_teleport(&mut host, &ALICE, "Bob").unwrap();
        assert_eq!(host.scheduled, vec![(47, ticket.clone())]);

        manager.clear();
        assert_eq!(manager.pending_count(), 0);
        assert!(!manager.fire_expiry(&mut host, &ticket));
    }
}
