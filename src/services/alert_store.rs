use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::models::{Alert, Condition};

/// In-memory collection of active alerts, shared between the HTTP handlers
/// and the poll loop. Every operation takes the lock exactly once and never
/// holds it across an await point.
#[derive(Clone, Default)]
pub struct AlertStore {
    inner: Arc<Mutex<Vec<Alert>>>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a new alert. The symbol is normalized to
    /// uppercase; the id and creation timestamp are assigned here.
    pub fn add(
        &self,
        symbol: &str,
        condition: &str,
        threshold: f64,
    ) -> Result<Alert, ValidationError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ValidationError::MissingField("symbol"));
        }

        let condition: Condition = condition
            .parse()
            .map_err(|_| ValidationError::BadCondition)?;

        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ValidationError::BadPrice);
        }

        let alert = Alert {
            id: Uuid::new_v4(),
            symbol,
            condition,
            threshold,
            created_at: Utc::now().timestamp(),
        };

        let mut alerts = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        alerts.push(alert.clone());

        Ok(alert)
    }

    /// Snapshot of all active alerts, most recently created first.
    pub fn list(&self) -> Vec<Alert> {
        let alerts = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        alerts.iter().rev().cloned().collect()
    }

    /// Removes an alert by id. Returns false when the id is unknown, which
    /// callers treat as "already gone" rather than an error.
    pub fn remove(&self, id: Uuid) -> bool {
        let mut alerts = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let before = alerts.len();
        alerts.retain(|a| a.id != id);
        alerts.len() < before
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_assigns_unique_ids_and_uppercases() {
        let store = AlertStore::new();
        let a = store.add("aapl", "above", 100.0).unwrap();
        let b = store.add("aapl", "below", 90.0).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.symbol, "AAPL");
        assert_eq!(a.condition, Condition::Above);
    }

    #[test]
    fn add_rejects_unknown_condition() {
        let store = AlertStore::new();
        let err = store.add("AAPL", "sideways", 100.0).unwrap_err();

        assert_eq!(err, ValidationError::BadCondition);
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_non_positive_threshold() {
        let store = AlertStore::new();
        assert_eq!(
            store.add("AAPL", "above", 0.0).unwrap_err(),
            ValidationError::BadPrice
        );
        assert_eq!(
            store.add("AAPL", "above", -5.0).unwrap_err(),
            ValidationError::BadPrice
        );
        assert_eq!(
            store.add("AAPL", "above", f64::NAN).unwrap_err(),
            ValidationError::BadPrice
        );
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_blank_symbol() {
        let store = AlertStore::new();
        assert_eq!(
            store.add("  ", "above", 100.0).unwrap_err(),
            ValidationError::MissingField("symbol")
        );
    }

    #[test]
    fn list_is_newest_first() {
        let store = AlertStore::new();
        let first = store.add("AAPL", "above", 100.0).unwrap();
        let second = store.add("MSFT", "below", 300.0).unwrap();

        let listed = store.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[test]
    fn remove_is_idempotent() {
        let store = AlertStore::new();
        let alert = store.add("AAPL", "above", 100.0).unwrap();

        assert!(store.remove(alert.id));
        assert!(!store.remove(alert.id));
        assert!(!store.remove(Uuid::new_v4()));
        assert!(store.is_empty());
    }
}
