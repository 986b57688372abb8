use anyhow::{Context, Result};
use uuid::Uuid;

use crate::domain::order::ORDER_AGGREGATE_TYPE;

// ============================================================================
// Application Configuration
// ============================================================================
//
// Read from the environment; every setting has a default.
//
//   ORDER_FSM_LOG_FILTER      tracing filter when RUST_LOG is unset
//   ORDER_FSM_ACTOR_ID        UUID stamped on emitted events
//   ORDER_FSM_AGGREGATE_TYPE  aggregate type recorded on envelopes
//
// ============================================================================

pub const LOG_FILTER_VAR: &str = "ORDER_FSM_LOG_FILTER";
pub const ACTOR_ID_VAR: &str = "ORDER_FSM_ACTOR_ID";
pub const AGGREGATE_TYPE_VAR: &str = "ORDER_FSM_AGGREGATE_TYPE";

pub const DEFAULT_LOG_FILTER: &str = "info,order_fsm=debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_filter: String,
    pub actor_id: Option<Uuid>,
    pub aggregate_type: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            actor_id: None,
            aggregate_type: ORDER_AGGREGATE_TYPE.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values fall back to the default
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let actor_id = read(ACTOR_ID_VAR)
            .map(|raw| {
                Uuid::parse_str(&raw).with_context(|| format!("{ACTOR_ID_VAR} is not a valid UUID: {raw}"))
            })
            .transpose()?;

        Ok(Self {
            log_filter: read(LOG_FILTER_VAR).unwrap_or(defaults.log_filter),
            actor_id,
            aggregate_type: read(AGGREGATE_TYPE_VAR).unwrap_or(defaults.aggregate_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.log_filter, "info,order_fsm=debug");
        assert_eq!(config.aggregate_type, "Order");
    }

    #[test]
    fn test_overrides() {
        let actor = Uuid::new_v4();
        let actor_text = actor.to_string();
        let config = AppConfig::from_lookup(lookup_from(&[
            (LOG_FILTER_VAR, "warn"),
            (ACTOR_ID_VAR, actor_text.as_str()),
            (AGGREGATE_TYPE_VAR, "PurchaseOrder"),
        ]))
        .unwrap();

        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.actor_id, Some(actor));
        assert_eq!(config.aggregate_type, "PurchaseOrder");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[(LOG_FILTER_VAR, "  ")])).unwrap();
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_invalid_actor_id_fails() {
        let err = AppConfig::from_lookup(lookup_from(&[(ACTOR_ID_VAR, "not-a-uuid")])).unwrap_err();
        assert!(err.to_string().contains(ACTOR_ID_VAR));
    }
}
