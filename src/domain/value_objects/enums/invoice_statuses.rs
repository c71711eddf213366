use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::payment_statuses::PaymentStatus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Canceled,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "PENDING",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Canceled => "CANCELED",
            InvoiceStatus::Overdue => "OVERDUE",
        }
    }

    /// Invoice status mirrors its payment: only a completed payment marks the
    /// invoice paid, every other payment status pulls it back to pending.
    pub fn from_payment(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Completed => InvoiceStatus::Paid,
            _ => InvoiceStatus::Pending,
        }
    }
}

impl Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_payment_marks_invoice_paid() {
        assert_eq!(
            InvoiceStatus::from_payment(PaymentStatus::Completed),
            InvoiceStatus::Paid
        );
    }

    #[test]
    fn non_completed_payments_keep_invoice_pending() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(
                InvoiceStatus::from_payment(status),
                InvoiceStatus::Pending
            );
        }
    }
}
