//! Annotation-based discovery of injectable definitions.
//!
//! The second entry point into the framework: instead of an explicit call
//! per definition, callers tag a definition's free-text description with an
//! inline marker — `::Frame,Series does stuff` — and hand the whole pool
//! over for scanning. Target names are resolved through a caller-supplied
//! [`Resolver`]; the framework never evaluates strings as code.
//!
//! Both entry points route through [`Registry::inject_one`], so the
//! conflict and idempotence contract is uniform.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::attr::Definition;
use crate::error::InjectError;
use crate::registry::{InjectOptions, Registry};
use crate::target::{Target, TypeProxy};

/// Marker syntax: the description starts (after optional whitespace) with
/// `::` followed by a comma-separated target list.
static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*::(\S+)").expect("marker pattern is a valid regex"));

/// A definition offered for annotation-based discovery.
pub struct Candidate<T> {
    /// Declared name. Trailing underscores are stripped at injection time,
    /// so `head_` and `head__` both inject as `head` — one declaration per
    /// target without name collisions in the pool.
    pub name: String,
    /// The definition to inject.
    pub definition: Definition<T>,
    /// Optional free-text description, possibly carrying a marker.
    pub description: Option<String>,
}

impl<T> Candidate<T> {
    /// A candidate with no description.
    pub fn new(name: impl Into<String>, definition: Definition<T>) -> Self {
        Self {
            name: name.into(),
            definition,
            description: None,
        }
    }

    /// Attach a description.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}

/// Parse the target list out of a description, if it carries a marker.
pub fn parse_marker(description: &str) -> Option<Vec<String>> {
    let captures = MARKER.captures(description)?;
    let names: Vec<String> = captures[1]
        .split(',')
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();
    if names.is_empty() { None } else { Some(names) }
}

/// The name an annotated candidate injects under.
pub fn injected_name(declared: &str) -> &str {
    declared.trim_end_matches('_')
}

/// Scan a pool for marked candidates.
///
/// Lazy and restartable: a pure function of the pool, yielding each marked
/// candidate together with its parsed target names. Resolution and
/// injection are separate steps — see [`inject_annotated`].
pub fn find_by_annotation<T>(
    pool: &[Candidate<T>],
) -> impl Iterator<Item = (&Candidate<T>, Vec<String>)> {
    pool.iter().filter_map(|candidate| {
        let description = candidate.description.as_deref()?;
        let targets = parse_marker(description)?;
        Some((candidate, targets))
    })
}

/// Resolves marker target names to live target handles.
///
/// Supplied by the caller, scoped to the caller's environment. The obvious
/// implementation is a name → proxy map; see the blanket impl below.
pub trait Resolver<T> {
    /// The target registered under `name`, if any.
    fn resolve(&mut self, name: &str) -> Option<&mut dyn Target<T>>;
}

impl<T> Resolver<T> for BTreeMap<String, TypeProxy<T>> {
    fn resolve(&mut self, name: &str) -> Option<&mut dyn Target<T>> {
        self.get_mut(name).map(|proxy| proxy as &mut dyn Target<T>)
    }
}

/// Outcome of an [`inject_annotated`] pass.
#[derive(Debug, Default)]
pub struct AnnotatedReport {
    /// Candidates fully injected into all of their targets.
    pub injected: usize,
    /// Candidates skipped because a named target did not resolve.
    /// Other candidates are still processed.
    pub skipped: Vec<(String, InjectError)>,
}

/// Inject every marked candidate in the pool into its annotated targets.
///
/// A candidate naming an unresolvable target is skipped whole — reported in
/// [`AnnotatedReport::skipped`], with no partial injection for that
/// candidate — and scanning continues. An injection failure (for example a
/// conflict) halts the pass and propagates, matching bundle semantics.
pub fn inject_annotated<T, R>(
    registry: &mut Registry,
    pool: &[Candidate<T>],
    resolver: &mut R,
    opts: InjectOptions,
) -> Result<AnnotatedReport, InjectError>
where
    R: Resolver<T> + ?Sized,
{
    let mut report = AnnotatedReport::default();

    for (candidate, target_names) in find_by_annotation(pool) {
        let attribute = injected_name(&candidate.name);
        debug!(
            candidate = %candidate.name,
            attribute,
            targets = target_names.len(),
            "discovered annotated candidate"
        );

        // Resolve everything up front so an unknown name skips the whole
        // candidate before any target is mutated.
        if let Some(missing) = target_names
            .iter()
            .find(|name| resolver.resolve(name).is_none())
        {
            debug!(
                candidate = %candidate.name,
                missing = %missing,
                "skipping candidate with unresolved target"
            );
            report.skipped.push((
                candidate.name.clone(),
                InjectError::UnknownTarget {
                    name: missing.to_string(),
                },
            ));
            continue;
        }

        for name in &target_names {
            let target = resolver
                .resolve(name)
                .ok_or_else(|| InjectError::UnknownTarget { name: name.clone() })?;
            registry.inject_one(target, attribute, candidate.definition.clone(), opts)?;
        }
        report.injected += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::Value;

    #[test]
    fn marker_parses_comma_separated_targets() {
        assert_eq!(
            parse_marker("::Foo,Bar does stuff"),
            Some(vec!["Foo".to_string(), "Bar".to_string()])
        );
        assert_eq!(parse_marker("  ::Frame standalone"), Some(vec!["Frame".to_string()]));
        assert_eq!(parse_marker("no marker here"), None);
        assert_eq!(parse_marker("prefix ::Frame not at start"), None);
    }

    #[test]
    fn trailing_underscores_are_stripped() {
        assert_eq!(injected_name("head_"), "head");
        assert_eq!(injected_name("head__"), "head");
        assert_eq!(injected_name("head"), "head");
    }

    #[test]
    fn scan_is_restartable() {
        let pool: Vec<Candidate<Value>> = vec![
            Candidate::new("a", Definition::constant(1)).describe("::Frame first"),
            Candidate::new("b", Definition::constant(2)),
            Candidate::new("c", Definition::constant(3)).describe("::Series second"),
        ];
        let first: Vec<_> = find_by_annotation(&pool).map(|(c, _)| c.name.as_str()).collect();
        let second: Vec<_> = find_by_annotation(&pool).map(|(c, _)| c.name.as_str()).collect();
        assert_eq!(first, vec!["a", "c"]);
        assert_eq!(first, second);
    }
}
