//! The shop facade.
//!
//! [`Shop`] is the only entry point collaborators use. It owns the order store,
//! the user ledger, the catalog and the notification dispatcher, and it is the
//! one place where the three collections are mutated together.
//!
//! Locking: every order mutation runs under the order store's write
//! transaction; ledger updates nested inside it always take the user lock
//! second. Notifications are dispatched only after the transaction is dropped.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;
use topup_core::{
    AppNotification, AppUser, Email, Order, OrderStatus, Price, TransactionId,
};

use crate::catalog::Catalog;
use crate::config::ShopConfig;
use crate::error::{Result, ShopError};
use crate::ledger::UserLedger;
use crate::notify::{
    Dispatcher, EmailNotifier, InAppNotifier, Inbox, Notification, NotificationKind, Notifier,
    Retrying, StandardNotifier,
};
use crate::orders::lifecycle::{
    OrderRequest, Transition, build_order, find_duplicate, transition, unique_admin_transaction,
    unique_order_id, validate_request,
};
use crate::orders::{OrderFilter, OrderStore, OrdersTxn};
use crate::storage::Storage;

/// Dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Sum of completed order prices.
    pub total_revenue: Price,
    pub pending_count: usize,
    pub completed_count: usize,
    pub total_users: usize,
}

/// The top-up shop.
pub struct Shop<S, N = StandardNotifier<S>> {
    config: ShopConfig,
    orders: OrderStore<S>,
    ledger: UserLedger<S>,
    catalog: Catalog<S>,
    inbox: Arc<Inbox<S>>,
    dispatcher: Dispatcher<N>,
}

impl<S: Storage> Shop<S> {
    /// Open the shop with email and in-app notifications.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Storage` if a stored collection cannot be loaded.
    pub async fn open(config: ShopConfig, storage: Arc<S>) -> Result<Self> {
        let notify = config.notify.clone();

        Self::open_with_notifier(config, storage, |inbox| {
            (
                Retrying::from_config(EmailNotifier::new(notify.email_delay), &notify),
                Retrying::from_config(InAppNotifier::new(Arc::clone(inbox)), &notify),
            )
        })
        .await
    }

    /// The email channel of the standard notifier.
    #[must_use]
    pub fn email(&self) -> &EmailNotifier {
        self.dispatcher.notifier().0.inner()
    }
}

impl<S: Storage, N: Notifier> Shop<S, N> {
    /// Open the shop with a custom notifier. `make_notifier` receives the
    /// shop's in-app inbox so it can be wired into the notifier if wanted.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Storage` if a stored collection cannot be loaded.
    pub async fn open_with_notifier(
        config: ShopConfig,
        storage: Arc<S>,
        make_notifier: impl FnOnce(&Arc<Inbox<S>>) -> N,
    ) -> Result<Self> {
        let orders = OrderStore::open(Arc::clone(&storage)).await?;
        let ledger = UserLedger::open(Arc::clone(&storage)).await?;
        let catalog = Catalog::open(Arc::clone(&storage)).await?;
        let inbox = Arc::new(Inbox::open(storage).await?);
        let dispatcher = Dispatcher::new(make_notifier(&inbox));

        tracing::info!(admin = %config.admin_email, "Shop opened");

        Ok(Self {
            config,
            orders,
            ledger,
            catalog,
            inbox,
            dispatcher,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ShopConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog<S> {
        &self.catalog
    }

    /// The notifier deliveries go through.
    #[must_use]
    pub fn notifier(&self) -> &N {
        self.dispatcher.notifier()
    }

    /// Email-only login. New users are registered; banned users are refused.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidEmail`, `ShopError::Banned`, or
    /// `ShopError::Storage` if a new user cannot be persisted.
    #[instrument(skip(self))]
    pub async fn login(&self, email: &str) -> Result<AppUser> {
        let email = Email::parse(email)?;
        if self.ledger.is_banned(&email).await {
            tracing::warn!(email = %email, "Banned user attempted login");
            return Err(ShopError::Banned(email));
        }
        let is_admin = email == self.config.admin_email;
        self.ledger.register_if_absent(&email, is_admin).await
    }

    /// Place an order.
    ///
    /// Buyer orders wait out the simulated verification round trip, then the
    /// duplicate check and insert run as one unit under the order lock.
    /// Administrative orders skip verification and are delivered immediately.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidEmail`, `ShopError::EntityNotFound` for an
    /// unknown product, `ShopError::Validation`, `ShopError::Banned`,
    /// `ShopError::DuplicateTransaction`, or `ShopError::Storage`.
    #[instrument(skip(self, request), fields(product_id = %request.product_id, administrative = request.administrative))]
    pub async fn create_order(&self, request: OrderRequest) -> Result<Order> {
        let buyer = Email::parse(&request.buyer_email)?;
        let product = self
            .catalog
            .product(&request.product_id)
            .await
            .ok_or_else(|| ShopError::EntityNotFound {
                kind: "product",
                id: request.product_id.to_string(),
            })?;
        let store_open = self.catalog.settings().await.is_store_open;
        validate_request(&request, &product, store_open)?;

        let transaction_id = TransactionId::normalize(&request.transaction_id);
        if !request.administrative {
            if self.ledger.is_banned(&buyer).await {
                return Err(ShopError::Banned(buyer));
            }
            let seen = self
                .orders
                .read(|orders| find_duplicate(orders, &transaction_id).is_some())
                .await;
            if seen {
                tracing::warn!(transaction_id = %transaction_id, "Duplicate transaction id rejected");
                return Err(ShopError::DuplicateTransaction(transaction_id));
            }
            tokio::time::sleep(self.config.verification_delay).await;
        }

        let mut txn = self.orders.begin().await;
        let now = Utc::now();
        let millis = now.timestamp_millis();

        let transaction_id = if request.administrative {
            unique_admin_transaction(txn.orders(), millis)
        } else if find_duplicate(txn.orders(), &transaction_id).is_some() {
            tracing::warn!(transaction_id = %transaction_id, "Duplicate transaction id rejected");
            return Err(ShopError::DuplicateTransaction(transaction_id));
        } else {
            transaction_id
        };

        let id = unique_order_id(txn.orders(), millis);
        let order = build_order(&request, &product, buyer, id, transaction_id, now)?;

        let previous = txn.orders().to_vec();
        let mut next = Vec::with_capacity(previous.len() + 1);
        next.push(order.clone());
        next.extend(previous.iter().cloned());
        txn.commit(next)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to persist new order"))?;

        // Fast-fill orders are born completed, so their spend is recorded here.
        if order.status == OrderStatus::Completed {
            if let Err(e) = self.ledger.record_spend(&order.user_email, order.price).await {
                Self::rollback(&mut txn, previous).await;
                return Err(e);
            }
        }
        drop(txn);

        tracing::info!(
            order_id = %order.id,
            email = %order.user_email,
            price = %order.price,
            status = %order.status,
            "Order created"
        );
        self.notify(NotificationKind::Confirmation, &order).await;
        Ok(order)
    }

    /// Move an order along the pipeline.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::OrderNotFound`, `ShopError::InvalidTransition`, or
    /// `ShopError::Storage`. Nothing changes on error.
    #[instrument(skip(self))]
    pub async fn set_status(&self, order_id: &str, status: OrderStatus) -> Result<Order> {
        let mut txn = self.orders.begin().await;
        let current = txn
            .orders()
            .iter()
            .find(|o| o.id.matches(order_id))
            .ok_or_else(|| ShopError::OrderNotFound(order_id.trim().to_string()))?;
        let Transition {
            order,
            spend,
            event,
        } = transition(current, status)?;

        let previous = txn.orders().to_vec();
        let next = previous
            .iter()
            .map(|o| if o.id == order.id { order.clone() } else { o.clone() })
            .collect();
        txn.commit(next)
            .await
            .inspect_err(|e| tracing::error!(order_id = %order.id, error = %e, "Failed to persist status change"))?;

        if let Some(amount) = spend {
            if let Err(e) = self.ledger.record_spend(&order.user_email, amount).await {
                Self::rollback(&mut txn, previous).await;
                return Err(e);
            }
        }
        drop(txn);

        tracing::info!(order_id = %order.id, status = %order.status, "Order status updated");
        if let Some(kind) = event {
            self.notify(kind, &order).await;
        }
        Ok(order)
    }

    /// Hard-delete an order. Ledger effects are kept. Returns `false` if the
    /// order did not exist.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Storage` if the change cannot be persisted.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, order_id: &str) -> Result<bool> {
        let mut txn = self.orders.begin().await;
        if !txn.orders().iter().any(|o| o.id.matches(order_id)) {
            return Ok(false);
        }
        let next = txn
            .orders()
            .iter()
            .filter(|o| !o.id.matches(order_id))
            .cloned()
            .collect();
        txn.commit(next).await?;
        tracing::info!(order_id = %order_id.trim(), "Order deleted");
        Ok(true)
    }

    /// Orders passing `filter`, newest first.
    pub async fn list_orders(&self, filter: &OrderFilter) -> Vec<Order> {
        self.orders.list(filter).await
    }

    /// A user's own orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidEmail` if `email` does not parse.
    pub async fn orders_for(&self, email: &str) -> Result<Vec<Order>> {
        let owner = Email::parse(email)?;
        Ok(self
            .orders
            .list(&OrderFilter::default().with_owner(owner))
            .await)
    }

    /// Find an order by its id or its transaction id.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::OrderNotFound` if neither matches.
    pub async fn lookup_order(&self, reference: &str) -> Result<Order> {
        self.orders
            .read(|orders| {
                orders
                    .iter()
                    .find(|o| o.matches_reference(reference))
                    .cloned()
            })
            .await
            .ok_or_else(|| ShopError::OrderNotFound(reference.trim().to_string()))
    }

    /// Dashboard figures.
    pub async fn stats(&self) -> Stats {
        let (total_revenue, pending_count, completed_count) = self
            .orders
            .read(|orders| {
                let completed: Vec<&Order> = orders
                    .iter()
                    .filter(|o| o.status == OrderStatus::Completed)
                    .collect();
                let revenue: Price = completed.iter().map(|o| o.price).sum();
                let pending = orders
                    .iter()
                    .filter(|o| o.status == OrderStatus::Pending)
                    .count();
                (revenue, pending, completed.len())
            })
            .await;

        Stats {
            total_revenue,
            pending_count,
            completed_count,
            total_users: self.ledger.count().await,
        }
    }

    /// All registered users.
    pub async fn users(&self) -> Vec<AppUser> {
        self.ledger.users().await
    }

    /// Look up a user.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidEmail` or `ShopError::EntityNotFound`.
    pub async fn user(&self, email: &str) -> Result<AppUser> {
        let email = Email::parse(email)?;
        self.ledger
            .get(&email)
            .await
            .ok_or_else(|| ShopError::EntityNotFound {
                kind: "user",
                id: email.to_string(),
            })
    }

    /// Ban or unban a user.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidEmail`, `ShopError::EntityNotFound`, or
    /// `ShopError::Storage`.
    #[instrument(skip(self))]
    pub async fn set_banned(&self, email: &str, banned: bool) -> Result<AppUser> {
        let email = Email::parse(email)?;
        let user = self.ledger.set_banned(&email, banned).await?;
        tracing::info!(email = %email, banned, "User moderation updated");
        Ok(user)
    }

    /// A user's in-app alerts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidEmail` if `email` does not parse.
    pub async fn notifications_for(&self, email: &str) -> Result<Vec<AppNotification>> {
        let email = Email::parse(email)?;
        Ok(self.inbox.for_user(&email).await)
    }

    /// Number of unread in-app alerts.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidEmail` if `email` does not parse.
    pub async fn unread_notifications(&self, email: &str) -> Result<usize> {
        let email = Email::parse(email)?;
        Ok(self.inbox.unread_count(&email).await)
    }

    /// Mark all of a user's alerts read.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::InvalidEmail` or `ShopError::Storage`.
    pub async fn mark_notifications_read(&self, email: &str) -> Result<usize> {
        let email = Email::parse(email)?;
        Ok(self.inbox.mark_read(&email).await?)
    }

    /// Wait for outstanding notification deliveries.
    pub async fn shutdown(&self) {
        self.dispatcher.shutdown().await;
    }

    /// Dispatch `kind` for `order` with the support contact currently in the
    /// store settings.
    async fn notify(&self, kind: NotificationKind, order: &Order) {
        let support = self.catalog.settings().await.support_whatsapp;
        self.dispatcher.dispatch(
            Notification::for_owner(kind, order.clone()).with_support_whatsapp(support),
        );
    }

    async fn rollback(txn: &mut OrdersTxn<'_, S>, previous: Vec<Order>) {
        if let Err(e) = txn.commit(previous).await {
            tracing::error!(error = %e, "Failed to roll back order collection");
        }
    }
}

impl Stats {
    /// Revenue as a plain decimal.
    #[must_use]
    pub const fn revenue_amount(&self) -> Decimal {
        self.total_revenue.amount()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use topup_core::{PaymentMethod, ProductId};

    use super::*;
    use crate::storage::MemoryStorage;

    const ADMIN: &str = "admin@sadikstore.example";

    async fn shop() -> (Arc<MemoryStorage>, Shop<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let config = ShopConfig::without_delays(Email::parse(ADMIN).unwrap());
        let shop = Shop::open(config, Arc::clone(&storage)).await.unwrap();
        (storage, shop)
    }

    fn request(trx: &str) -> OrderRequest {
        OrderRequest {
            product_id: ProductId::new("ff-100"),
            quantity: 1,
            player_id: "5123456789".into(),
            payment_method: PaymentMethod::Bkash,
            transaction_id: trx.into(),
            buyer_email: "buyer@example.com".into(),
            administrative: false,
        }
    }

    #[tokio::test]
    async fn test_login_assigns_admin_flag() {
        let (_, shop) = shop().await;
        assert!(shop.login(" Admin@SadikStore.example ").await.unwrap().is_admin);
        assert!(!shop.login("buyer@example.com").await.unwrap().is_admin);
        assert_eq!(shop.users().await.len(), 2);
    }

    #[tokio::test]
    async fn test_create_then_complete_records_spend_once() {
        let (_, shop) = shop().await;
        shop.login("buyer@example.com").await.unwrap();
        let order = shop.create_order(request("trx1")).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        shop.set_status(order.id.as_str(), OrderStatus::Completed)
            .await
            .unwrap();
        assert!(matches!(
            shop.set_status(order.id.as_str(), OrderStatus::Completed).await,
            Err(ShopError::InvalidTransition { .. })
        ));

        let user = shop.user("buyer@example.com").await.unwrap();
        assert_eq!(user.total_spent, Price::from_taka(70));
        shop.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_order_and_product() {
        let (_, shop) = shop().await;
        assert!(matches!(
            shop.set_status("ORD-404", OrderStatus::Completed).await,
            Err(ShopError::OrderNotFound(_))
        ));
        let mut req = request("trx1");
        req.product_id = ProductId::new("nope");
        assert!(matches!(
            shop.create_order(req).await,
            Err(ShopError::EntityNotFound { kind: "product", .. })
        ));
        assert!(!shop.delete_order("ORD-404").await.unwrap());
    }

    #[tokio::test]
    async fn test_closed_store_blocks_buyers_only() {
        let (_, shop) = shop().await;
        let mut settings = shop.catalog().settings().await;
        settings.is_store_open = false;
        shop.catalog().update_settings(settings).await.unwrap();

        assert!(matches!(
            shop.create_order(request("trx1")).await,
            Err(ShopError::Validation(_))
        ));

        let mut admin = request("");
        admin.administrative = true;
        assert!(shop.create_order(admin).await.is_ok());
        shop.shutdown().await;
    }

    #[tokio::test]
    async fn test_stats() {
        let (_, shop) = shop().await;
        shop.login("buyer@example.com").await.unwrap();
        let first = shop.create_order(request("a")).await.unwrap();
        shop.create_order(request("b")).await.unwrap();
        shop.set_status(first.id.as_str(), OrderStatus::Completed)
            .await
            .unwrap();

        let stats = shop.stats().await;
        assert_eq!(stats.total_revenue, Price::from_taka(70));
        assert_eq!(stats.revenue_amount(), Decimal::from(70));
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.completed_count, 1);
        assert_eq!(stats.total_users, 1);
        shop.shutdown().await;
    }

    #[tokio::test]
    async fn test_verification_delay_does_not_block_reads() {
        let storage = Arc::new(MemoryStorage::new());
        let mut config = ShopConfig::without_delays(Email::parse(ADMIN).unwrap());
        config.verification_delay = Duration::from_millis(200);
        let shop = Arc::new(Shop::open(config, storage).await.unwrap());

        let creating = {
            let shop = Arc::clone(&shop);
            tokio::spawn(async move { shop.create_order(request("slow")).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        // The order lock is free while verification is in progress.
        let listed = tokio::time::timeout(
            Duration::from_millis(100),
            shop.list_orders(&OrderFilter::default()),
        )
        .await
        .unwrap();
        assert!(listed.is_empty());

        creating.await.unwrap().unwrap();
        shop.shutdown().await;
    }
}
