//! Order lifecycle transition graph
//!
//! Single authority for which status moves are legal. The engine consults
//! this table before every transition; nothing else encodes the graph.
//!
//! ```text
//! NEW -> CONFIRMED -> IN_PRODUCTION -> PACKED -> SHIPPED -> CLOSED
//!  \________\_____________\____________\_________/
//!                 |
//!                 v
//!        REJECTED | CANCELLED   (from any non-terminal status)
//! ```

use shared::models::OrderStatus;

/// Legal successor statuses for a given status
///
/// Terminal statuses return an empty slice. The same-status no-op case is
/// handled by the engine, not here.
pub fn next_statuses(from: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match from {
        New => &[Confirmed, Rejected, Cancelled],
        Confirmed => &[InProduction, Rejected, Cancelled],
        InProduction => &[Packed, Rejected, Cancelled],
        Packed => &[Shipped, Rejected, Cancelled],
        Shipped => &[Closed, Rejected, Cancelled],
        Closed | Rejected | Cancelled => &[],
    }
}

/// Whether `from -> to` is a legal transition
pub fn is_transition_allowed(from: OrderStatus, to: OrderStatus) -> bool {
    next_statuses(from).contains(&to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_forward_chain() {
        assert!(is_transition_allowed(New, Confirmed));
        assert!(is_transition_allowed(Confirmed, InProduction));
        assert!(is_transition_allowed(InProduction, Packed));
        assert!(is_transition_allowed(Packed, Shipped));
        assert!(is_transition_allowed(Shipped, Closed));
    }

    #[test]
    fn test_no_skipping_or_backtracking() {
        assert!(!is_transition_allowed(New, InProduction));
        assert!(!is_transition_allowed(New, Packed));
        assert!(!is_transition_allowed(InProduction, New));
        assert!(!is_transition_allowed(Shipped, Confirmed));
    }

    #[test]
    fn test_side_branches_from_every_non_terminal() {
        for from in [New, Confirmed, InProduction, Packed, Shipped] {
            assert!(is_transition_allowed(from, Rejected), "{from} -> REJECTED");
            assert!(is_transition_allowed(from, Cancelled), "{from} -> CANCELLED");
        }
    }

    #[test]
    fn test_terminal_statuses_have_no_successors() {
        for from in [Closed, Rejected, Cancelled] {
            assert!(next_statuses(from).is_empty());
        }
    }
}
