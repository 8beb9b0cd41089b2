//! Named model options.
//!
//! [`ModelConfig`] holds typed fields; [`ModelConfig::set`] accepts the
//! legacy by-name interface (`grid_delta_t`, `min_D`, ...) used by command
//! lines and parameter files. Values are validated on every set, so a
//! `ModelConfig` that exists is always usable.
use crate::reconciliation::errors::{ConfigError, ConfigResult};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Maximal grid step, in relative time units (root age = 1).
    pub grid_delta_t: f64,
    /// Minimal number of grid steps per time slice.
    pub min_d: usize,
    /// Any-of characters splitting a gene name; the first token is the species.
    pub gene_name_separators: String,
    /// Internal species-tree labels are support values and are discarded.
    pub bootstrap_labels: bool,
    /// Carried for event labelling; does not change the likelihood.
    pub event_node: bool,
    /// Allow duplication and transfer on terminal branches.
    pub leaf_events: bool,
    /// Carried for event labelling; does not change the likelihood.
    pub n: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            grid_delta_t: 0.05,
            min_d: 3,
            gene_name_separators: "_".to_string(),
            bootstrap_labels: false,
            event_node: false,
            leaf_events: true,
            n: 1,
        }
    }
}

impl ModelConfig {
    /// Set an option by its legacy name.
    ///
    /// Booleans accept `yes`/`no`, `true`/`false` and `1`/`0`
    /// (case-insensitive).
    ///
    /// # Errors
    /// - [`ConfigError::UnknownOption`] for an unrecognized name.
    /// - [`ConfigError::InvalidValue`] when the value does not parse or is out
    ///   of range; the config is left unchanged.
    pub fn set(&mut self, name: &str, value: &str) -> ConfigResult<()> {
        let value = value.trim();
        match name {
            "grid_delta_t" => {
                let v: f64 = parse_num("grid_delta_t", value)?;
                if !v.is_finite() || v <= 0.0 {
                    return Err(invalid("grid_delta_t", value, "must be finite and > 0"));
                }
                self.grid_delta_t = v;
            }
            "min_D" => {
                let v: usize = parse_num("min_D", value)?;
                if v == 0 {
                    return Err(invalid("min_D", value, "must be >= 1"));
                }
                self.min_d = v;
            }
            "gene_name_separators" => {
                if value.is_empty() {
                    return Err(invalid("gene_name_separators", value, "must not be empty"));
                }
                self.gene_name_separators = value.to_string();
            }
            "BOOTSTRAP_LABELS" => self.bootstrap_labels = parse_flag("BOOTSTRAP_LABELS", value)?,
            "event_node" => self.event_node = parse_flag("event_node", value)?,
            "leaf_events" => self.leaf_events = parse_flag("leaf_events", value)?,
            "N" => {
                let v: usize = parse_num("N", value)?;
                if v == 0 {
                    return Err(invalid("N", value, "must be >= 1"));
                }
                self.n = v;
            }
            other => return Err(ConfigError::UnknownOption { name: other.to_string() }),
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidValue { name, value: value.to_string(), reason }
}

fn parse_num<T: std::str::FromStr>(name: &'static str, value: &str) -> ConfigResult<T> {
    value.parse().map_err(|_| invalid(name, value, "not a number"))
}

fn parse_flag(name: &'static str, value: &str) -> ConfigResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        _ => Err(invalid(name, value, "expected yes/no, true/false or 1/0")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Legacy option names reach the typed fields.
    //
    // Given
    // -----
    // - A default config.
    //
    // Expect
    // ------
    // - Each set call updates exactly its field.
    fn set_accepts_legacy_names() {
        let mut cfg = ModelConfig::default();

        cfg.set("grid_delta_t", "0.1").unwrap();
        cfg.set("min_D", "5").unwrap();
        cfg.set("gene_name_separators", "_@").unwrap();
        cfg.set("BOOTSTRAP_LABELS", "yes").unwrap();
        cfg.set("leaf_events", "0").unwrap();
        cfg.set("event_node", "TRUE").unwrap();
        cfg.set("N", "4").unwrap();

        assert_eq!(cfg.grid_delta_t, 0.1);
        assert_eq!(cfg.min_d, 5);
        assert_eq!(cfg.gene_name_separators, "_@");
        assert!(cfg.bootstrap_labels);
        assert!(!cfg.leaf_events);
        assert!(cfg.event_node);
        assert_eq!(cfg.n, 4);
    }

    #[test]
    // Purpose
    // -------
    // Unknown names and bad values fail without touching the config.
    fn set_rejects_unknown_names_and_bad_values() {
        let mut cfg = ModelConfig::default();

        let unknown = cfg.set("grid_dt", "0.1").unwrap_err();
        let zero = cfg.set("min_D", "0").unwrap_err();
        let nan = cfg.set("grid_delta_t", "abc").unwrap_err();
        let flag = cfg.set("leaf_events", "maybe").unwrap_err();

        assert_eq!(unknown, ConfigError::UnknownOption { name: "grid_dt".into() });
        assert!(matches!(zero, ConfigError::InvalidValue { name: "min_D", .. }));
        assert!(matches!(nan, ConfigError::InvalidValue { name: "grid_delta_t", .. }));
        assert!(matches!(flag, ConfigError::InvalidValue { name: "leaf_events", .. }));
        assert_eq!(cfg, ModelConfig::default());
    }
}
