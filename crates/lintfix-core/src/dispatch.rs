//! Rule identifier → fix strategy.

use crate::strategies::Strategy;
use std::collections::HashMap;
use std::sync::LazyLock;

const SCOPELINT_EXPLANATION: &str =
    "https://github.com/xxpxxxxp/intellij-plugin-golangci-lint/blob/master/explanation/scopelint.md";
const GOERR113_EXPLANATION: &str =
    "https://github.com/xxpxxxxp/intellij-plugin-golangci-lint/blob/master/explanation/goerr113.md";
const EXPORTLOOPREF_EXPLANATION: &str =
    "https://github.com/xxpxxxxp/intellij-plugin-golangci-lint/blob/master/explanation/exportloopref.md";
const NOCTX_EXPLANATION: &str = "https://github.com/sonatard/noctx/blob/master/README.md";

static TABLE: LazyLock<DispatchTable> = LazyLock::new(DispatchTable::builtin);

/// Immutable mapping from a rule identifier to its [`Strategy`].
///
/// Unknown rules resolve to [`Strategy::SuppressLine`].
#[derive(Debug, Clone)]
pub struct DispatchTable {
    strategies: HashMap<&'static str, Strategy>,
}

impl DispatchTable {
    /// The process-wide table, built on first use.
    pub fn global() -> &'static DispatchTable {
        &TABLE
    }

    fn builtin() -> Self {
        let strategies = HashMap::from([
            ("ineffassign", Strategy::UnusedValueRename),
            ("interfacer", Strategy::ParameterTypeNarrowing),
            ("whitespace", Strategy::RedundantWhitespace),
            ("goconst", Strategy::StringConstant),
            ("godot", Strategy::CommentPeriod),
            ("testpackage", Strategy::TestPackage),
            ("goprintffuncname", Strategy::PrintfFuncName),
            ("exhaustive", Strategy::ExhaustiveSwitch),
            ("nlreturn", Strategy::NewlineBefore),
            ("scopelint", Strategy::Explanation(SCOPELINT_EXPLANATION)),
            ("goerr113", Strategy::Explanation(GOERR113_EXPLANATION)),
            ("exportloopref", Strategy::Explanation(EXPORTLOOPREF_EXPLANATION)),
            ("noctx", Strategy::Explanation(NOCTX_EXPLANATION)),
            ("gofumpt", Strategy::FormatterSettings),
            ("dupl", Strategy::DuplicateCode),
            ("gomnd", Strategy::MagicNumber),
            ("unparam", Strategy::UnusedParameter),
            ("funlen", Strategy::FunctionSuppress("funlen")),
            ("gocognit", Strategy::FunctionSuppress("gocognit")),
            ("gocyclo", Strategy::FunctionSuppress("gocyclo")),
            ("nestif", Strategy::FunctionSuppress("nestif")),
        ]);
        Self { strategies }
    }

    /// Strategy for `rule`, falling back to line suppression.
    pub fn resolve(&self, rule: &str) -> Strategy {
        self.strategies
            .get(rule)
            .copied()
            .unwrap_or(Strategy::SuppressLine)
    }

    /// Returns `true` if `rule` has a dedicated strategy.
    pub fn is_known(&self, rule: &str) -> bool {
        self.strategies.contains_key(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_rule_falls_back_to_suppress_line() {
        let table = DispatchTable::global();
        assert_eq!(table.resolve("gosec"), Strategy::SuppressLine);
        assert_eq!(table.resolve(""), Strategy::SuppressLine);
        assert!(!table.is_known("gosec"));
    }

    #[test]
    fn test_known_rules() {
        let table = DispatchTable::global();
        assert_eq!(table.resolve("ineffassign"), Strategy::UnusedValueRename);
        assert_eq!(table.resolve("whitespace"), Strategy::RedundantWhitespace);
        assert_eq!(table.resolve("gocyclo"), Strategy::FunctionSuppress("gocyclo"));
        assert!(matches!(
            table.resolve("scopelint"),
            Strategy::Explanation(url) if url.ends_with("/scopelint.md")
        ));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(
            DispatchTable::global().resolve("IneffAssign"),
            Strategy::SuppressLine
        );
    }
}
