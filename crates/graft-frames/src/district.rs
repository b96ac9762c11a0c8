//! District-name standardization.
//!
//! School-district names arrive in wildly different conventions across
//! datasets ("Adams County S/D No 14", "ADAMS COUNTY 14", "Adams 14").
//! Standardizing before a merge means uppercasing, stripping boilerplate,
//! normalizing the reorganization-number suffixes, and pushing the number
//! to the end. The rewrite table is ordered and data-driven: the built-in
//! table covers the common conventions, and callers can load their own
//! from TOML.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// Errors from loading or compiling a rule table.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("rule {index} ('{pattern}') is not a valid pattern: {source}")]
    Pattern {
        index: usize,
        pattern: String,
        source: regex::Error,
    },
}

/// One rewrite rule as expressed in TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    /// Regex applied against the uppercased name.
    pub pattern: String,
    /// Replacement text; capture groups as `${1}`. Defaults to deletion.
    #[serde(default)]
    pub replace: String,
}

/// A TOML rule file: a sequence of `[[rules]]` entries, applied in order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// An ordered, compiled rewrite table.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<(Regex, String)>,
}

impl RuleSet {
    /// Compile a parsed config into a rule set.
    pub fn compile(config: RulesConfig) -> Result<Self, RulesError> {
        let mut rules = Vec::with_capacity(config.rules.len());
        for (index, rule) in config.rules.into_iter().enumerate() {
            let regex = Regex::new(&rule.pattern).map_err(|source| RulesError::Pattern {
                index,
                pattern: rule.pattern.clone(),
                source,
            })?;
            rules.push((regex, rule.replace));
        }
        Ok(Self { rules })
    }

    /// Parse and compile a TOML rule table.
    pub fn parse(text: &str) -> Result<Self, RulesError> {
        let config: RulesConfig = toml::from_str(text)?;
        Self::compile(config)
    }

    /// Load a TOML rule table from disk.
    pub fn load(path: &Path) -> Result<Self, RulesError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Standardize one name: uppercase, apply every rule in order, then
    /// collapse leftover whitespace.
    pub fn standardize(&self, name: &str) -> String {
        let mut out = name.to_uppercase();
        for (regex, replacement) in &self.rules {
            out = regex.replace_all(&out, replacement.as_str()).into_owned();
        }
        out.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// The built-in rewrite table, in application order. Boilerplate strips
/// first, then the reorganization-number suffixes, then whitespace removal,
/// and finally the number is pushed to the end.
const DEFAULT_RULES: &[(&str, &str)] = &[
    ("S/D", ""),
    (r"[-.()/:]", ""),
    (" CONSOLIDATED", ""),
    (r"\s?SCHOOL DISTRICT", ""),
    (r" NO\s?(\d+)", "${1}"),
    (r" RD\s?(\d+)", "${1}"),
    (r" RJ\s?(\d+)", "${1}"),
    (r" RE\s?(\d+)J?T?", "${1}"),
    (r" R\s?(\d+)J?", "${1}"),
    (r" C\s?(\d+)", "${1}"),
    (r"\s", ""),
    (r"(\d+)JT?$", "${1}"),
    (r"(\d+)R$", "${1}"),
    ("RURAL", ""),
    ("SCHOOLS", ""),
    ("SCHOOLDIST", ""),
    ("WATERSHED", ""),
    (r"^(.*?)(\d+)(.*)$", "${1}${3} ${2}"),
];

static DEFAULT: LazyLock<RuleSet> = LazyLock::new(|| {
    let config = RulesConfig {
        rules: DEFAULT_RULES
            .iter()
            .map(|(pattern, replace)| RuleConfig {
                pattern: pattern.to_string(),
                replace: replace.to_string(),
            })
            .collect(),
    };
    RuleSet::compile(config).expect("built-in rule table compiles")
});

/// Standardize a district name with the built-in rule table.
///
/// Apply iteratively over a name column before merging datasets whose
/// naming conventions differ.
pub fn standardize(name: &str) -> String {
    DEFAULT.standardize(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_boilerplate_and_pushes_number_out() {
        assert_eq!(standardize("Adams County S/D No 14"), "ADAMSCOUNTY 14");
        assert_eq!(standardize("Gilcrest RE-1"), "GILCREST 1");
        assert_eq!(standardize("Weld County School District RE-8"), "WELDCOUNTY 8");
    }

    #[test]
    fn names_without_numbers_pass_through() {
        assert_eq!(standardize("Creede Consolidated School District"), "CREEDE");
    }

    #[test]
    fn converging_conventions_agree() {
        let a = standardize("Adams County S/D No 14");
        let b = standardize("ADAMS COUNTY 14");
        assert_eq!(a, b);
    }

    #[test]
    fn custom_rules_from_toml() {
        let table = r#"
            [[rules]]
            pattern = ' ACADEMY'

            [[rules]]
            pattern = '(\d+)'
            replace = 'N${1}'
        "#;
        let rules = RuleSet::parse(table).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.standardize("Vista Academy 21"), "VISTA N21");
    }

    #[test]
    fn bad_pattern_is_a_typed_error() {
        let err = RuleSet::parse("[[rules]]\npattern = '('\n").unwrap_err();
        assert!(matches!(err, RulesError::Pattern { index: 0, .. }));
    }

    #[test]
    fn load_reads_a_rule_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[[rules]]\npattern = 'X'\nreplace = 'Y'\n").unwrap();
        let rules = RuleSet::load(file.path()).unwrap();
        assert_eq!(rules.standardize("box"), "BOY");
    }
}
