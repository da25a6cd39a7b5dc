//! Guard against responses that resolve out of order.
//!
//! A request issued on one timer tick may still be in flight when the next
//! tick issues another one. Each request takes a [`Ticket`]; once a response
//! has been applied, responses holding an older ticket are dropped.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    next: u64,
    last_applied: Option<u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for a request about to be sent.
    pub fn issue(&mut self) -> Ticket {
        let t = Ticket(self.next);
        self.next += 1;
        t
    }

    /// Whether the response for `ticket` may be applied. Admitting a ticket
    /// makes every older outstanding ticket stale.
    pub fn admit(&mut self, ticket: Ticket) -> bool {
        match self.last_applied {
            Some(last) if ticket.0 < last => false,
            _ => {
                self.last_applied = Some(ticket.0);
                true
            }
        }
    }

    pub fn last_applied(&self) -> Option<Ticket> {
        self.last_applied.map(Ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_order_responses_are_all_admitted() {
        let mut s = RequestSequencer::new();
        let a = s.issue();
        let b = s.issue();
        assert!(s.admit(a));
        assert!(s.admit(b));
        assert_eq!(s.last_applied(), Some(b));
    }

    #[test]
    fn overtaken_response_is_dropped() {
        let mut s = RequestSequencer::new();
        let slow = s.issue();
        let fast = s.issue();
        assert!(s.admit(fast));
        assert!(!s.admit(slow));
        assert_eq!(s.last_applied(), Some(fast));
    }

    #[test]
    fn tickets_are_monotonic() {
        let mut s = RequestSequencer::new();
        let a = s.issue();
        let b = s.issue();
        assert!(b > a);
        assert_eq!(b.get(), a.get() + 1);
    }
}
