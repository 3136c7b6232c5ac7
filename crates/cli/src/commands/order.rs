//! Order commands.

#![allow(clippy::print_stdout)]

use topup_core::{Order, OrderStatus};
use topup_shop::{OrderFilter, OrderRequest};

use super::{CliError, CliShop};

fn print_order(order: &Order) {
    println!("Order:       {}", order.id);
    println!("Status:      {}", order.status);
    println!("Product:     {}", order.product_name);
    println!("Price:       {}", order.price);
    println!("Player ID:   {}", order.player_id);
    println!("Payment:     {}", order.payment_method.display_name());
    println!("Transaction: {}", order.transaction_id);
    println!("Placed:      {}", order.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Owner:       {}", order.user_email);
}

/// Place an order.
pub async fn create(shop: &CliShop, request: OrderRequest) -> Result<(), CliError> {
    if !request.administrative {
        println!("Verifying payment with {}...", request.payment_method.display_name());
    }
    let order = shop.create_order(request).await?;
    println!("Order placed.");
    print_order(&order);
    Ok(())
}

/// Change an order's status.
pub async fn set_status(shop: &CliShop, id: &str, status: OrderStatus) -> Result<(), CliError> {
    let order = shop.set_status(id, status).await?;
    println!("Order {} is now {}", order.id, order.status);
    Ok(())
}

/// Delete an order.
pub async fn delete(shop: &CliShop, id: &str) -> Result<(), CliError> {
    if shop.delete_order(id).await? {
        println!("Order {} deleted", id.trim());
    } else {
        println!("No order {} to delete", id.trim());
    }
    Ok(())
}

/// List orders.
pub async fn list(
    shop: &CliShop,
    status: Option<OrderStatus>,
    email: Option<String>,
    search: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let orders = match email {
        Some(email) => {
            let mut orders = shop.orders_for(&email).await?;
            let filter = OrderFilter {
                status,
                owner: None,
                search,
            };
            orders.retain(|o| filter.accepts(o));
            orders
        }
        None => {
            shop.list_orders(&OrderFilter {
                status,
                owner: None,
                search,
            })
            .await
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&orders)?);
        return Ok(());
    }

    println!(
        "{:<18} {:<11} {:<22} {:>10} {:<14} {:<16}",
        "ID", "STATUS", "PRODUCT", "PRICE", "PLAYER", "TRANSACTION"
    );
    for order in &orders {
        println!(
            "{:<18} {:<11} {:<22} {:>10} {:<14} {:<16}",
            order.id.as_str(),
            order.status.as_str(),
            order.product_name,
            order.price.to_string(),
            order.player_id,
            order.transaction_id.as_str()
        );
    }
    println!("{} order(s)", orders.len());
    Ok(())
}

/// Find an order by id or transaction id.
pub async fn track(shop: &CliShop, reference: &str) -> Result<(), CliError> {
    let order = shop.lookup_order(reference).await?;
    print_order(&order);
    Ok(())
}
