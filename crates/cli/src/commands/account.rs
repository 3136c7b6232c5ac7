//! Login, user moderation, stats and notifications.

#![allow(clippy::print_stdout)]

use super::{CliError, CliShop};

/// Log in, registering the email on first use.
pub async fn login(shop: &CliShop, email: &str) -> Result<(), CliError> {
    let user = shop.login(email).await?;
    let role = if user.is_admin { "admin" } else { "buyer" };
    println!("Logged in as {} ({role})", user.email);
    if !user.is_admin {
        let unread = shop.unread_notifications(email).await?;
        if unread > 0 {
            println!("You have {unread} unread notification(s).");
        }
    }
    Ok(())
}

/// Print every registered user.
pub async fn list_users(shop: &CliShop) -> Result<(), CliError> {
    let users = shop.users().await;
    println!("{:<36} {:<6} {:<7} {:>12}", "EMAIL", "ADMIN", "BANNED", "SPENT");
    for user in &users {
        println!(
            "{:<36} {:<6} {:<7} {:>12}",
            user.email.as_str(),
            user.is_admin,
            user.is_banned,
            user.total_spent.to_string()
        );
    }
    println!("{} user(s)", users.len());
    Ok(())
}

/// Ban or unban a user.
pub async fn set_banned(shop: &CliShop, email: &str, banned: bool) -> Result<(), CliError> {
    let user = shop.set_banned(email, banned).await?;
    let state = if user.is_banned { "banned" } else { "active" };
    println!("{} is now {state}", user.email);
    Ok(())
}

/// Print dashboard figures.
pub async fn stats(shop: &CliShop) -> Result<(), CliError> {
    let stats = shop.stats().await;
    println!("Revenue:   {}", stats.total_revenue);
    println!("Pending:   {}", stats.pending_count);
    println!("Completed: {}", stats.completed_count);
    println!("Users:     {}", stats.total_users);
    Ok(())
}

/// Print a user's in-app notifications, optionally marking them read.
pub async fn notifications(shop: &CliShop, email: &str, mark_read: bool) -> Result<(), CliError> {
    let alerts = shop.notifications_for(email).await?;
    if alerts.is_empty() {
        println!("No notifications.");
    }
    for alert in &alerts {
        let marker = if alert.read { ' ' } else { '*' };
        println!(
            "{marker} {} {}",
            alert.timestamp.format("%Y-%m-%d %H:%M"),
            alert.message
        );
    }
    if mark_read {
        let marked = shop.mark_notifications_read(email).await?;
        println!("Marked {marked} notification(s) read.");
    }
    Ok(())
}
