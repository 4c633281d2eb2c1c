//! Order status transitions.
//!
//! `paid` is only reached through a verified payment, never by an
//! administrator.

use crate::domain::orders::{OrdersServiceError, records::OrderStatus};

/// Statuses an administrator may move an order to from `from`.
#[must_use]
pub const fn admin_targets(from: OrderStatus) -> &'static [OrderStatus] {
    match from {
        OrderStatus::Pending => &[OrderStatus::Cancelled],
        OrderStatus::Paid => &[OrderStatus::Shipped, OrderStatus::Cancelled],
        OrderStatus::Shipped => &[OrderStatus::Delivered, OrderStatus::Cancelled],
        OrderStatus::Delivered | OrderStatus::Cancelled => &[],
    }
}

/// Check an administrator's status change.
///
/// # Errors
///
/// Delivered orders fail with [`OrdersServiceError::InvalidState`]; any other
/// move outside [`admin_targets`] fails with
/// [`OrdersServiceError::InvalidTransition`].
pub fn check_admin_transition(
    from: OrderStatus,
    to: OrderStatus,
) -> Result<(), OrdersServiceError> {
    if from == OrderStatus::Delivered {
        return Err(OrdersServiceError::InvalidState(
            "order is already delivered".to_string(),
        ));
    }

    if admin_targets(from).contains(&to) {
        Ok(())
    } else {
        Err(OrdersServiceError::InvalidTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_moves_and_cancellation_are_allowed() {
        for (from, to) in [
            (OrderStatus::Pending, OrderStatus::Cancelled),
            (OrderStatus::Paid, OrderStatus::Shipped),
            (OrderStatus::Paid, OrderStatus::Cancelled),
            (OrderStatus::Shipped, OrderStatus::Delivered),
            (OrderStatus::Shipped, OrderStatus::Cancelled),
        ] {
            assert!(
                check_admin_transition(from, to).is_ok(),
                "{from} -> {to} should be allowed"
            );
        }
    }

    #[test]
    fn delivered_is_always_invalid_state() {
        for to in OrderStatus::ALL {
            let result = check_admin_transition(OrderStatus::Delivered, to);

            assert!(
                matches!(&result, Err(OrdersServiceError::InvalidState(message))
                    if message == "order is already delivered"),
                "delivered -> {to}: {result:?}"
            );
        }
    }

    #[test]
    fn paid_is_never_an_admin_target() {
        for from in OrderStatus::ALL {
            assert!(
                check_admin_transition(from, OrderStatus::Paid).is_err(),
                "{from} -> paid should be rejected"
            );
        }
    }

    #[test]
    fn same_status_and_backward_moves_are_invalid_transitions() {
        for (from, to) in [
            (OrderStatus::Pending, OrderStatus::Pending),
            (OrderStatus::Pending, OrderStatus::Shipped),
            (OrderStatus::Shipped, OrderStatus::Paid),
            (OrderStatus::Shipped, OrderStatus::Shipped),
            (OrderStatus::Cancelled, OrderStatus::Pending),
        ] {
            assert!(
                matches!(
                    check_admin_transition(from, to),
                    Err(OrdersServiceError::InvalidTransition { .. })
                ),
                "{from} -> {to} should be an invalid transition"
            );
        }
    }
}
