//! Status enums for orders and payments.

use serde::{Deserialize, Serialize};

/// Order pipeline status.
///
/// ```text
/// pending ──► processing ──► completed
///    │            │
///    ├────────────┴────────► cancelled
///    └─────────────────────► completed
/// ```
///
/// `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in pipeline order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Returns `true` for states with no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns `true` if `self → next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing | Self::Completed | Self::Cancelled)
                | (Self::Processing, Self::Completed | Self::Cancelled)
        )
    }

    /// Lower-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Mobile-wallet payment method the buyer paid through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Bkash,
    Nagad,
    Rocket,
}

impl PaymentMethod {
    /// All supported methods.
    pub const ALL: [Self; 3] = [Self::Bkash, Self::Nagad, Self::Rocket];

    /// Display name shown to buyers.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Bkash => "bKash (Personal)",
            Self::Nagad => "Nagad (Personal)",
            Self::Rocket => "Rocket (Personal)",
        }
    }

    /// How to send money and obtain a transaction id.
    #[must_use]
    pub const fn instructions(self) -> &'static str {
        match self {
            Self::Bkash => {
                "Go to your bKash app, select \"Send Money\", enter our number, and pay the exact amount. Then copy the Transaction ID."
            }
            Self::Nagad => {
                "Use Nagad \"Send Money\" to our number. Enter amount and PIN. Paste the Transaction ID here after successful payment."
            }
            Self::Rocket => {
                "Send money to our Rocket number. Keep the 10-digit Transaction ID ready to submit."
            }
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bkash => write!(f, "bkash"),
            Self::Nagad => write!(f, "nagad"),
            Self::Rocket => write!(f, "rocket"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bkash" => Ok(Self::Bkash),
            "nagad" => Ok(Self::Nagad),
            "rocket" => Ok(Self::Rocket),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        use OrderStatus::{Cancelled, Completed, Pending, Processing};

        let legal = [
            (Pending, Processing),
            (Pending, Completed),
            (Pending, Cancelled),
            (Processing, Completed),
            (Processing, Cancelled),
        ];

        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    legal.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for status in [OrderStatus::Completed, OrderStatus::Cancelled] {
            assert!(status.is_terminal());
            assert!(OrderStatus::ALL.iter().all(|&to| !status.can_transition_to(to)));
        }
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Processing.is_terminal());
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("Completed".parse::<OrderStatus>(), Ok(OrderStatus::Completed));
        assert_eq!("canceled".parse::<OrderStatus>(), Ok(OrderStatus::Cancelled));
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert_eq!(OrderStatus::Processing.to_string(), "processing");
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("bKash".parse::<PaymentMethod>(), Ok(PaymentMethod::Bkash));
        assert_eq!(" rocket ".parse::<PaymentMethod>(), Ok(PaymentMethod::Rocket));
        assert!("paypal".parse::<PaymentMethod>().is_err());
        assert_eq!(PaymentMethod::Nagad.to_string(), "nagad");
    }
}
