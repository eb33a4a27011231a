//! Order status classification.
//!
//! Order status is a free-form string. Only two literals are terminal; every
//! other value, including the empty string and labels nobody recognizes, keeps
//! the order active and therefore keeps blocking deletion of whatever it
//! references.

/// Status of an order that was cancelled.
pub const CANCELLED: &str = "CANCELADO";

/// Status of an order that was delivered.
pub const DELIVERED: &str = "ENTREGADO";

/// Statuses that release an order's references. Matched case-sensitively.
pub const TERMINAL_STATUSES: [&str; 2] = [CANCELLED, DELIVERED];

/// Returns true unless `status` is exactly one of [`TERMINAL_STATUSES`].
pub fn is_active(status: &str) -> bool {
    !TERMINAL_STATUSES.contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_are_inactive() {
        assert!(!is_active("CANCELADO"));
        assert!(!is_active("ENTREGADO"));
    }

    #[test]
    fn known_pending_labels_are_active() {
        assert!(is_active("pendiente"));
        assert!(is_active("en preparacion"));
        assert!(is_active("en camino"));
    }

    #[test]
    fn empty_and_unknown_statuses_are_active() {
        assert!(is_active(""));
        assert!(is_active("ARCHIVADO"));
    }

    #[test]
    fn classification_is_case_sensitive() {
        assert!(is_active("cancelado"));
        assert!(is_active("Entregado"));
        assert!(is_active(" ENTREGADO"));
    }
}
