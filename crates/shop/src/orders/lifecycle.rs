//! Pure order lifecycle rules.
//!
//! Nothing here touches storage or spawns tasks: these functions decide what a
//! creation or status change produces, and the [`Shop`](crate::Shop) applies
//! the result under the store's write lock.

use chrono::{DateTime, Utc};
use topup_core::{
    Email, Order, OrderId, OrderStatus, PaymentMethod, Price, Product, ProductId, TransactionId,
};

use crate::error::{Result, ShopError};
use crate::notify::NotificationKind;

/// Everything a collaborator submits to place an order.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    /// In-game account to deliver to.
    pub player_id: String,
    pub payment_method: PaymentMethod,
    /// Raw proof-of-payment reference; ignored for administrative orders.
    pub transaction_id: String,
    /// Owner of the order.
    pub buyer_email: String,
    /// Administrator fast-fill: no verification, delivered immediately.
    pub administrative: bool,
}

/// Outcome of a legal status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The order with its new status.
    pub order: Order,
    /// Amount to add to the owner's spend aggregate.
    pub spend: Option<Price>,
    /// Notification to dispatch once the change is committed.
    pub event: Option<NotificationKind>,
}

/// Check the request fields that do not depend on other orders.
///
/// # Errors
///
/// Returns `ShopError::Validation` naming the first offending field.
pub fn validate_request(request: &OrderRequest, product: &Product, store_open: bool) -> Result<()> {
    if !product.price.is_positive() {
        return Err(ShopError::Validation(format!(
            "product {} has no valid price",
            product.id
        )));
    }
    if request.quantity == 0 {
        return Err(ShopError::Validation("quantity must be at least 1".into()));
    }
    line_total(product, request.quantity)?;
    if request.administrative {
        return Ok(());
    }
    if !store_open {
        return Err(ShopError::Validation(
            "the store is closed right now, please order later".into(),
        ));
    }
    if request.player_id.trim().is_empty() {
        return Err(ShopError::Validation("Player ID is required.".into()));
    }
    if TransactionId::normalize(&request.transaction_id).is_empty() {
        return Err(ShopError::Validation("Transaction ID is required.".into()));
    }
    Ok(())
}

/// Price of `quantity` units of `product`.
///
/// # Errors
///
/// Returns `ShopError::Validation` if the total is too large to represent.
pub fn line_total(product: &Product, quantity: u32) -> Result<Price> {
    product.price.checked_times(quantity).ok_or_else(|| {
        ShopError::Validation(format!(
            "order total for {quantity} x {} is too large",
            product.id
        ))
    })
}

/// Find any stored order, whatever its status, already holding `transaction_id`.
#[must_use]
pub fn find_duplicate<'a>(orders: &'a [Order], transaction_id: &TransactionId) -> Option<&'a Order> {
    orders.iter().find(|o| o.transaction_id == *transaction_id)
}

/// An order id derived from `now_millis` that no stored order uses.
#[must_use]
pub fn unique_order_id(orders: &[Order], now_millis: i64) -> OrderId {
    let mut millis = now_millis;
    loop {
        let candidate = OrderId::from_millis(millis);
        if !orders.iter().any(|o| o.id.matches(candidate.as_str())) {
            return candidate;
        }
        millis += 1;
    }
}

/// A synthesized fast-fill transaction id that no stored order uses.
#[must_use]
pub fn unique_admin_transaction(orders: &[Order], now_millis: i64) -> TransactionId {
    let mut millis = now_millis;
    loop {
        let candidate = TransactionId::synthesized(millis);
        if find_duplicate(orders, &candidate).is_none() {
            return candidate;
        }
        millis += 1;
    }
}

/// Assemble a new order record from a validated request.
///
/// # Errors
///
/// Returns `ShopError::Validation` if the line total is out of range.
pub fn build_order(
    request: &OrderRequest,
    product: &Product,
    buyer: Email,
    id: OrderId,
    transaction_id: TransactionId,
    now: DateTime<Utc>,
) -> Result<Order> {
    let (payment_method, status) = if request.administrative {
        (PaymentMethod::default(), OrderStatus::Completed)
    } else {
        (request.payment_method, OrderStatus::Pending)
    };

    Ok(Order {
        id,
        player_id: request.player_id.trim().to_string(),
        product_id: product.id.clone(),
        product_name: Order::display_name(&product.name, request.quantity),
        price: line_total(product, request.quantity)?,
        payment_method,
        transaction_id,
        status,
        created_at: now,
        user_email: buyer,
    })
}

/// Apply `to` to `order`, returning the updated record and its side effects.
///
/// # Errors
///
/// Returns `ShopError::InvalidTransition` for anything that is not an edge of
/// the pipeline, including every move out of a terminal status.
pub fn transition(order: &Order, to: OrderStatus) -> Result<Transition> {
    if !order.status.can_transition_to(to) {
        return Err(ShopError::InvalidTransition {
            order_id: order.id.clone(),
            from: order.status,
            to,
        });
    }

    let mut updated = order.clone();
    updated.status = to;

    let (spend, event) = match to {
        OrderStatus::Completed => (Some(order.price), Some(NotificationKind::Invoice)),
        OrderStatus::Cancelled => (None, Some(NotificationKind::Cancellation)),
        OrderStatus::Processing => (None, Some(NotificationKind::Review)),
        OrderStatus::Pending => (None, None),
    };

    Ok(Transition {
        order: updated,
        spend,
        event,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use topup_core::ProductKind;

    use super::*;

    fn product(price: i64) -> Product {
        Product {
            id: ProductId::new("ff-100"),
            name: "100 Diamonds".into(),
            amount: 100,
            price: Price::from_taka(price),
            image: None,
            kind: ProductKind::Diamonds,
            parent_category: None,
        }
    }

    fn request() -> OrderRequest {
        OrderRequest {
            product_id: ProductId::new("ff-100"),
            quantity: 3,
            player_id: " 5123456789 ".into(),
            payment_method: PaymentMethod::Nagad,
            transaction_id: " bk7x9q ".into(),
            buyer_email: "buyer@example.com".into(),
            administrative: false,
        }
    }

    fn order_with(id: &str, trx: &str, status: OrderStatus) -> Order {
        let mut order = build_order(
            &request(),
            &product(70),
            Email::parse("buyer@example.com").unwrap(),
            OrderId::new(id),
            TransactionId::normalize(trx),
            Utc::now(),
        )
        .unwrap();
        order.status = status;
        order
    }

    #[test]
    fn test_build_order_computes_price_and_name() {
        let order = order_with("ORD-1", "bk7x9q", OrderStatus::Pending);
        assert_eq!(order.price, Price::from_taka(210));
        assert!(order.product_name.ends_with("x3"));
        assert_eq!(order.player_id, "5123456789");
        assert_eq!(order.payment_method, PaymentMethod::Nagad);
        assert_eq!(order.transaction_id.as_str(), "BK7X9Q");
    }

    #[test]
    fn test_administrative_orders_start_completed() {
        let mut req = request();
        req.administrative = true;
        let order = build_order(
            &req,
            &product(70),
            Email::parse("buyer@example.com").unwrap(),
            OrderId::new("ORD-2"),
            TransactionId::synthesized(5),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.payment_method, PaymentMethod::Bkash);
    }

    #[test]
    fn test_validate_request() {
        assert!(validate_request(&request(), &product(70), true).is_ok());

        let mut req = request();
        req.quantity = 0;
        assert!(matches!(
            validate_request(&req, &product(70), true),
            Err(ShopError::Validation(_))
        ));

        let mut req = request();
        req.player_id = "   ".into();
        assert!(validate_request(&req, &product(70), true).is_err());

        let mut req = request();
        req.transaction_id = " ".into();
        assert!(validate_request(&req, &product(70), true).is_err());

        assert!(validate_request(&request(), &product(0), true).is_err());
        assert!(validate_request(&request(), &product(70), false).is_err());
    }

    #[test]
    fn test_out_of_range_total_is_a_validation_error() {
        let mut huge = product(70);
        huge.price = Price::new(rust_decimal::Decimal::MAX);

        assert!(matches!(
            validate_request(&request(), &huge, true),
            Err(ShopError::Validation(msg)) if msg.contains("too large")
        ));
        assert!(matches!(
            line_total(&huge, 2),
            Err(ShopError::Validation(_))
        ));
        assert_eq!(line_total(&huge, 1).unwrap(), huge.price);
    }

    #[test]
    fn test_administrative_requests_skip_buyer_fields() {
        let mut req = request();
        req.administrative = true;
        req.player_id = String::new();
        req.transaction_id = String::new();
        assert!(validate_request(&req, &product(70), false).is_ok());
    }

    #[test]
    fn test_find_duplicate_ignores_status() {
        let orders = vec![order_with("ORD-1", "TRX1", OrderStatus::Cancelled)];
        assert!(find_duplicate(&orders, &TransactionId::normalize(" trx1 ")).is_some());
        assert!(find_duplicate(&orders, &TransactionId::normalize("TRX2")).is_none());
    }

    #[test]
    fn test_unique_ids_skip_taken_values() {
        let orders = vec![
            order_with("ORD-100", "ADMIN-100", OrderStatus::Completed),
            order_with("ORD-101", "ADMIN-101", OrderStatus::Completed),
        ];
        assert_eq!(unique_order_id(&orders, 100).as_str(), "ORD-102");
        assert_eq!(unique_order_id(&orders, 99).as_str(), "ORD-99");
        assert_eq!(unique_admin_transaction(&orders, 100).as_str(), "ADMIN-102");
    }

    #[test]
    fn test_transition_side_effects() {
        let pending = order_with("ORD-1", "T", OrderStatus::Pending);

        let done = transition(&pending, OrderStatus::Completed).unwrap();
        assert_eq!(done.order.status, OrderStatus::Completed);
        assert_eq!(done.spend, Some(Price::from_taka(210)));
        assert_eq!(done.event, Some(NotificationKind::Invoice));

        let cancelled = transition(&pending, OrderStatus::Cancelled).unwrap();
        assert_eq!(cancelled.spend, None);
        assert_eq!(cancelled.event, Some(NotificationKind::Cancellation));

        let review = transition(&pending, OrderStatus::Processing).unwrap();
        assert_eq!(review.spend, None);
        assert_eq!(review.event, Some(NotificationKind::Review));
    }

    #[test]
    fn test_transition_out_of_terminal_is_rejected() {
        let completed = order_with("ORD-1", "T", OrderStatus::Completed);
        let err = transition(&completed, OrderStatus::Completed).unwrap_err();
        assert!(matches!(
            err,
            ShopError::InvalidTransition {
                from: OrderStatus::Completed,
                to: OrderStatus::Completed,
                ..
            }
        ));

        let cancelled = order_with("ORD-2", "U", OrderStatus::Cancelled);
        assert!(transition(&cancelled, OrderStatus::Pending).is_err());
    }
}
