//! Configuration passed explicitly into kernel entry points.
//!
//! Replaces a global mutable settings dictionary: every entry point that
//! needs a toggle takes a `&Config` parameter. The only process-wide state
//! left in the kernel is the optional diagnostic logger, which goes through
//! the standard `log` facade rather than a bespoke handle.

/// API-shape toggle for callers building comparison terms: whether the
/// overloaded comparison builders should hand back `LessThan`/`GreaterThan`
/// propositions or plain booleans. This has zero effect on kernel behavior -
/// it only selects which builder namespace a caller is using.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOutput {
    /// Builders return `Proposition` relations (`LessThan`, `Equals`, ...).
    Propositions,
    /// Builders return plain `bool`.
    Booleans,
}

/// Recognized kernel-wide configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Enables classical rule 8 (proof by contradiction) in the backward
    /// prover and double-negation elimination in the rule table.
    pub use_classical_logic: bool,
    /// Which namespace comparison builders hand results back through.
    pub comparison_output: ComparisonOutput,
    /// Controls the renderer only; has no kernel effect.
    pub show_all_parentheses: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            use_classical_logic: true,
            comparison_output: ComparisonOutput::Propositions,
            show_all_parentheses: false,
        }
    }
}

impl Config {
    pub fn intuitionistic() -> Config {
        Config {
            use_classical_logic: false,
            ..Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_classical() {
        assert!(Config::default().use_classical_logic);
    }

    #[test]
    fn intuitionistic_disables_classical_logic() {
        assert!(!Config::intuitionistic().use_classical_logic);
    }
}
