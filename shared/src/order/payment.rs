//! Payment method vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the customer pays for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery
    #[default]
    Cod,
    /// Bank transfer
    Bank,
    Momo,
    Vnpay,
    Qr,
    Paypal,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "cod",
            PaymentMethod::Bank => "bank",
            PaymentMethod::Momo => "momo",
            PaymentMethod::Vnpay => "vnpay",
            PaymentMethod::Qr => "qr",
            PaymentMethod::Paypal => "paypal",
        }
    }

    /// Localized (Vietnamese) display label
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "Tiền mặt khi nhận hàng",
            PaymentMethod::Bank => "Chuyển khoản ngân hàng",
            PaymentMethod::Momo => "Ví MoMo",
            PaymentMethod::Vnpay => "VNPay",
            PaymentMethod::Qr => "QR Code",
            PaymentMethod::Paypal => "PayPal",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(PaymentMethod::Cod.label(), "Tiền mặt khi nhận hàng");
        assert_eq!(PaymentMethod::Bank.label(), "Chuyển khoản ngân hàng");
        assert_eq!(PaymentMethod::Momo.label(), "Ví MoMo");
        assert_eq!(PaymentMethod::Vnpay.label(), "VNPay");
        assert_eq!(PaymentMethod::Qr.label(), "QR Code");
        assert_eq!(PaymentMethod::Paypal.label(), "PayPal");
    }

    #[test]
    fn test_serde() {
        let method: PaymentMethod = serde_json::from_str("\"vnpay\"").unwrap();
        assert_eq!(method, PaymentMethod::Vnpay);
        assert_eq!(serde_json::to_string(&PaymentMethod::Qr).unwrap(), "\"qr\"");
        assert!(serde_json::from_str::<PaymentMethod>("\"cash\"").is_err());
    }
}
