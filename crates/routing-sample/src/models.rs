use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bank account kept in the state store, keyed by `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(alias = "Id")]
    pub id: String,
    #[serde(alias = "Balance", default, with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl Account {
    /// A fresh account with a zero balance
    pub fn open(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            balance: Decimal::ZERO,
        }
    }

    /// Add `amount`, or `None` with the balance untouched on overflow
    pub fn deposit(&mut self, amount: Decimal) -> Option<Decimal> {
        self.balance = self.balance.checked_add(amount)?;
        Some(self.balance)
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Option<Decimal> {
        self.balance = self.balance.checked_sub(amount)?;
        Some(self.balance)
    }
}

/// A deposit or withdrawal against the account `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(alias = "Id")]
    pub id: String,
    #[serde(alias = "Amount", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl Transaction {
    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

/// Inbound voice webhook payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VoiceRequest {
    pub call_sid: Option<String>,
    pub account_sid: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub call_status: Option<String>,
    pub direction: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_account_accepts_either_casing() {
        let lower: Account = serde_json::from_str(r#"{"id":"17","balance":5.5}"#).unwrap();
        let pascal: Account = serde_json::from_str(r#"{"Id":"17","Balance":5.5}"#).unwrap();
        assert_eq!(lower, pascal);
        assert_eq!(
            serde_json::to_string(&lower).unwrap(),
            r#"{"id":"17","balance":5.5}"#
        );
    }

    #[test]
    fn test_transaction_sign() {
        let tx: Transaction = serde_json::from_str(r#"{"Id":"17","Amount":-1}"#).unwrap();
        assert!(tx.is_negative());
        assert!(!Transaction {
            id: "17".into(),
            amount: Decimal::ZERO
        }
        .is_negative());
    }

    #[test]
    fn test_voice_request_ignores_unknown_fields() {
        let request: VoiceRequest = serde_json::from_str(
            r#"{"CallSid":"CA123","To":"+15551234567","ApiVersion":"2010-04-01"}"#,
        )
        .unwrap();
        assert_eq!(request.call_sid.as_deref(), Some("CA123"));
        assert_eq!(request.to.as_deref(), Some("+15551234567"));
        assert_eq!(request.from, None);
    }

    #[test]
    fn test_amounts_are_exact() {
        let tx: Transaction = serde_json::from_str(r#"{"id":"17","amount":0.1}"#).unwrap();
        let mut account = Account::open("17");
        account.deposit(tx.amount).unwrap();
        account.deposit(Decimal::new(2, 1)).unwrap();
        assert_eq!(account.balance, Decimal::new(3, 1));
        assert_eq!(
            serde_json::to_string(&account).unwrap(),
            r#"{"id":"17","balance":0.3}"#
        );
    }

    #[test]
    fn test_overflow_leaves_balance_untouched() {
        let mut account = Account {
            id: "17".into(),
            balance: Decimal::MAX,
        };
        assert_eq!(account.deposit(Decimal::ONE), None);
        assert_eq!(account.balance, Decimal::MAX);

        account.balance = Decimal::MIN;
        assert_eq!(account.withdraw(Decimal::ONE), None);
        assert_eq!(account.balance, Decimal::MIN);
    }
}
