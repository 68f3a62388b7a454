use crate::rules::{Rules, TrickEvaluator};
use serde::{Deserialize, Serialize};

pub const DEFAULT_START_MONEY: u32 = 500;

/// Table-wide settings fixed for a whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub start_money: u32,
    pub rules: Rules,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            start_money: DEFAULT_START_MONEY,
            rules: Rules::default(),
        }
    }
}

impl TableConfig {
    pub const fn evaluator(&self) -> TrickEvaluator {
        TrickEvaluator::new(self.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_START_MONEY, TableConfig};

    #[test]
    fn missing_fields_take_defaults() {
        let config: TableConfig = serde_json::from_str(r#"{"rules": {"two_pair": true}}"#).unwrap();
        assert_eq!(config.start_money, DEFAULT_START_MONEY);
        assert!(config.rules.two_pair);
        assert!(config.rules.flush);
        assert!(!config.rules.three_of_kind);
    }
}
