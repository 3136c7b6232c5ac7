//! Top-up shop CLI - buyer and administrator front end.
//!
//! # Usage
//!
//! ```bash
//! # Log in (registers the email on first use)
//! topup login buyer@example.com
//!
//! # Place an order for 3 x 100 Diamonds paid with bKash
//! topup order create -e buyer@example.com -p ff-100 -q 3 --player 5123456789 -m bkash -t 8N7A6B5C4
//!
//! # Administrator: review and complete it
//! topup order list --status pending
//! topup order status ORD-1718000000000 completed
//!
//! # Buyer: track it by order id or transaction id
//! topup order track 8n7a6b5c4
//! ```
//!
//! # Commands
//!
//! - `login` - Email-only login
//! - `order` - Create, update, delete, list and track orders
//! - `user` - List, ban and unban users
//! - `catalog` - Browse products and categories
//! - `stats` - Dashboard figures
//! - `notifications` - In-app alerts for a user
//!
//! Configuration is read from the environment (see `topup_shop::ShopConfig`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use topup_core::{OrderStatus, PaymentMethod};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "topup")]
#[command(author, version, about = "Game top-up shop CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with an email address
    Login {
        /// Email address
        email: String,
    },
    /// Manage orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Show dashboard figures
    Stats,
    /// Show a user's in-app notifications
    Notifications {
        /// Email address
        email: String,

        /// Mark them read after listing
        #[arg(long)]
        mark_read: bool,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Place a new order
    Create {
        /// Buyer email address
        #[arg(short, long)]
        email: String,

        /// Product id (`ff-100`, `evo-7d`, ...)
        #[arg(short, long)]
        product: String,

        /// Number of packs
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// In-game player id
        #[arg(long, default_value = "")]
        player: String,

        /// Payment method (`bkash`, `nagad`, `rocket`)
        #[arg(short, long, default_value = "bkash")]
        method: PaymentMethod,

        /// Payment transaction id
        #[arg(short, long, default_value = "")]
        trx: String,

        /// Administrator fast-fill: deliver immediately, no payment reference
        #[arg(long)]
        admin: bool,
    },
    /// Change an order's status
    Status {
        /// Order id
        id: String,

        /// New status (`processing`, `completed`, `cancelled`)
        status: OrderStatus,
    },
    /// Delete an order
    Delete {
        /// Order id
        id: String,
    },
    /// List orders, newest first
    List {
        /// Only this status
        #[arg(short, long)]
        status: Option<OrderStatus>,

        /// Only this owner
        #[arg(short, long)]
        email: Option<String>,

        /// Player id or transaction id substring
        #[arg(long)]
        search: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Find an order by order id or transaction id
    Track {
        /// Order id or transaction id
        reference: String,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List registered users
    List,
    /// Ban a user
    Ban {
        /// Email address
        email: String,
    },
    /// Lift a ban
    Unban {
        /// Email address
        email: String,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    Products {
        /// Only products listed under this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List categories
    Categories,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "topup_shop=warn,topup=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match &e {
            CliError::Shop(err) => {
                tracing::debug!("Command failed: {err}");
                tracing::error!("{}", err.user_message());
            }
            other => tracing::error!("Command failed: {other}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let shop = commands::open_shop().await?;

    let result = match cli.command {
        Commands::Login { email } => commands::account::login(&shop, &email).await,
        Commands::Order { action } => match action {
            OrderAction::Create {
                email,
                product,
                quantity,
                player,
                method,
                trx,
                admin,
            } => {
                let request = topup_shop::OrderRequest {
                    product_id: product.as_str().into(),
                    quantity,
                    player_id: player,
                    payment_method: method,
                    transaction_id: trx,
                    buyer_email: email,
                    administrative: admin,
                };
                commands::order::create(&shop, request).await
            }
            OrderAction::Status { id, status } => {
                commands::order::set_status(&shop, &id, status).await
            }
            OrderAction::Delete { id } => commands::order::delete(&shop, &id).await,
            OrderAction::List {
                status,
                email,
                search,
                json,
            } => commands::order::list(&shop, status, email, search, json).await,
            OrderAction::Track { reference } => commands::order::track(&shop, &reference).await,
        },
        Commands::User { action } => match action {
            UserAction::List => commands::account::list_users(&shop).await,
            UserAction::Ban { email } => commands::account::set_banned(&shop, &email, true).await,
            UserAction::Unban { email } => {
                commands::account::set_banned(&shop, &email, false).await
            }
        },
        Commands::Catalog { action } => match action {
            CatalogAction::Products { category } => {
                commands::catalog::products(&shop, category.as_deref()).await
            }
            CatalogAction::Categories => commands::catalog::categories(&shop),
        },
        Commands::Stats => commands::account::stats(&shop).await,
        Commands::Notifications { email, mark_read } => {
            commands::account::notifications(&shop, &email, mark_read).await
        }
    };

    // Let background email and in-app deliveries finish before exiting.
    shop.shutdown().await;
    result
}
