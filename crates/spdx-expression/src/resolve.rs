//! Identifier normalisation and validation applied at every leaf.

use crate::errors::{IdentifierKind, ValidationError};
use crate::options::ParseOptions;

/// Rewrites a raw identifier before it is checked against the catalog.
///
/// Any `Fn(&str) -> String` closure implements this trait.
///
/// # Examples
/// ```
/// use spdx_expression::{Normalize, ParseOptions, parse_with};
///
/// let upper_mit = |id: &str| if id == "mit" { "MIT".to_owned() } else { id.to_owned() };
/// assert_eq!(upper_mit.normalize("mit"), "MIT");
///
/// let options = ParseOptions::default().license_visitor(&upper_mit);
/// assert!(parse_with("mit", &options).is_ok());
/// ```
pub trait Normalize: Send + Sync {
    /// Return the identifier to validate in place of `identifier`.
    fn normalize(&self, identifier: &str) -> String;
}

impl<F> Normalize for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, identifier: &str) -> String {
        self(identifier)
    }
}

/// Maps an identifier the catalog rejected onto a `LicenseRef-…` form.
///
/// Any `Fn(&str) -> Option<String>` closure implements this trait. Returning
/// `None` or an empty string leaves the identifier unresolved.
///
/// # Examples
/// ```
/// use spdx_expression::Resolve;
///
/// let scancode = |id: &str| (id == "afpl-9.0").then(|| "LicenseRef-scancode-afpl-9.0".to_owned());
/// assert_eq!(scancode.resolve("afpl-9.0").as_deref(), Some("LicenseRef-scancode-afpl-9.0"));
/// assert_eq!(scancode.resolve("other"), None);
/// ```
pub trait Resolve: Send + Sync {
    /// Return the reference that stands in for `identifier`, if any.
    fn resolve(&self, identifier: &str) -> Option<String>;
}

impl<F> Resolve for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn resolve(&self, identifier: &str) -> Option<String> {
        self(identifier)
    }
}

/// Result of running an identifier through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// The identifier to record in the tree.
    Accepted(String),
    /// Relaxed mode swallowed a validation failure for this raw identifier.
    Degraded(String),
}

/// Runs the normalise, validate, look up, degrade sequence for one parse.
pub(crate) struct Resolver<'o, 'a> {
    options: &'o ParseOptions<'a>,
}

impl<'o, 'a> Resolver<'o, 'a> {
    pub(crate) fn new(options: &'o ParseOptions<'a>) -> Self {
        Self { options }
    }

    /// Resolve an identifier standing in `kind` position.
    pub(crate) fn resolve(
        &self,
        raw: &str,
        kind: IdentifierKind,
    ) -> Result<Resolution, ValidationError> {
        self.settle(self.validate(raw, kind))
    }

    fn validate(&self, raw: &str, kind: IdentifierKind) -> Result<String, ValidationError> {
        let working = match self.options.visitor() {
            Some(visitor) => {
                let normalized = visitor.normalize(raw);
                if normalized != raw {
                    log::debug!("normalised {kind} `{raw}` to `{normalized}`");
                }
                normalized
            }
            None => raw.to_owned(),
        };

        let catalog = self.options.identifier_catalog();
        let known = match kind {
            IdentifierKind::License => catalog.is_valid_license_id(&working),
            IdentifierKind::Exception => catalog.is_valid_exception_id(&working),
        };
        if known {
            return Ok(working);
        }

        if let Some(mapped) = self
            .options
            .lookup()
            .and_then(|lookup| lookup.resolve(raw))
            .filter(|mapped| !mapped.is_empty())
        {
            log::debug!("resolved {kind} `{raw}` to `{mapped}`");
            return Ok(mapped);
        }

        Err(ValidationError::new(raw, kind))
    }

    /// The single place where relaxed mode decides between failing and
    /// degrading.
    fn settle(
        &self,
        result: Result<String, ValidationError>,
    ) -> Result<Resolution, ValidationError> {
        match result {
            Ok(id) => Ok(Resolution::Accepted(id)),
            Err(err) if self.options.is_relaxed() => {
                log::debug!("relaxed mode: {err}; recording no assertion");
                Ok(Resolution::Degraded(err.identifier))
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_catalog;
    use rstest::rstest;

    fn resolve(options: &ParseOptions<'_>, raw: &str, kind: IdentifierKind) -> Resolution {
        match Resolver::new(options).resolve(raw, kind) {
            Ok(resolution) => resolution,
            Err(err) => panic!("`{raw}` should resolve: {err}"),
        }
    }

    #[rstest]
    #[case("MIT", IdentifierKind::License)]
    #[case("GCC-exception-3.1", IdentifierKind::Exception)]
    fn accepts_catalog_identifiers(#[case] raw: &str, #[case] kind: IdentifierKind) {
        let catalog = test_catalog();
        let options = ParseOptions::default().catalog(&catalog);
        assert_eq!(
            resolve(&options, raw, kind),
            Resolution::Accepted(raw.to_owned())
        );
    }

    #[test]
    fn validates_the_normalised_identifier() {
        let catalog = test_catalog();
        let visitor = |id: &str| id.to_ascii_uppercase();
        let options = ParseOptions::default()
            .catalog(&catalog)
            .license_visitor(&visitor);
        assert_eq!(
            resolve(&options, "mit", IdentifierKind::License),
            Resolution::Accepted("MIT".into())
        );
    }

    #[test]
    fn lookup_receives_the_raw_identifier() {
        let catalog = test_catalog();
        let visitor = |id: &str| format!("{id}-normalised");
        let lookup = |id: &str| (id == "afpl-9.0").then(|| "LicenseRef-raw".to_owned());
        let options = ParseOptions::default()
            .catalog(&catalog)
            .license_visitor(&visitor)
            .license_ref_lookup(&lookup);
        assert_eq!(
            resolve(&options, "afpl-9.0", IdentifierKind::License),
            Resolution::Accepted("LicenseRef-raw".into())
        );
    }

    #[test]
    fn empty_lookup_result_counts_as_unresolved() {
        let catalog = test_catalog();
        let lookup = |_: &str| Some(String::new());
        let options = ParseOptions::default()
            .catalog(&catalog)
            .license_ref_lookup(&lookup);
        let Err(err) = Resolver::new(&options).resolve("nope", IdentifierKind::License) else {
            panic!("empty mapping should not resolve");
        };
        assert_eq!(err, ValidationError::new("nope", IdentifierKind::License));
    }

    #[test]
    fn lookup_wins_over_relaxed_degradation() {
        let catalog = test_catalog();
        let lookup =
            |id: &str| (id == "afpl-9.0").then(|| "LicenseRef-scancode-afpl-9.0".to_owned());
        let options = ParseOptions::default()
            .catalog(&catalog)
            .relaxed(true)
            .license_ref_lookup(&lookup);
        assert_eq!(
            resolve(&options, "afpl-9.0", IdentifierKind::License),
            Resolution::Accepted("LicenseRef-scancode-afpl-9.0".into())
        );
    }

    #[rstest]
    #[case(IdentifierKind::License, "Apache-2.0")]
    #[case(IdentifierKind::Exception, "Classpath-exception-2.0")]
    fn visitor_runs_in_both_positions(#[case] kind: IdentifierKind, #[case] canonical: &str) {
        let catalog = test_catalog();
        let visitor = move |id: &str| {
            if id.eq_ignore_ascii_case(canonical) {
                canonical.to_owned()
            } else {
                id.to_owned()
            }
        };
        let options = ParseOptions::default()
            .catalog(&catalog)
            .license_visitor(&visitor);
        assert_eq!(
            resolve(&options, &canonical.to_ascii_lowercase(), kind),
            Resolution::Accepted(canonical.to_owned())
        );
    }

    #[test]
    fn mapped_exception_beats_relaxed_degradation() {
        let catalog = test_catalog();
        let lookup =
            |id: &str| (id == "custom-exception").then(|| "LicenseRef-custom".to_owned());
        let options = ParseOptions::default()
            .catalog(&catalog)
            .relaxed(true)
            .license_ref_lookup(&lookup);
        assert_eq!(
            resolve(&options, "custom-exception", IdentifierKind::Exception),
            Resolution::Accepted("LicenseRef-custom".into())
        );
    }

    #[rstest]
    #[case(IdentifierKind::License)]
    #[case(IdentifierKind::Exception)]
    fn relaxed_mode_degrades_with_raw_text(#[case] kind: IdentifierKind) {
        let catalog = test_catalog();
        let visitor = |id: &str| id.to_ascii_lowercase();
        let options = ParseOptions::default()
            .catalog(&catalog)
            .relaxed(true)
            .license_visitor(&visitor);
        assert_eq!(
            resolve(&options, "Commercial", kind),
            Resolution::Degraded("Commercial".into())
        );
    }

    #[test]
    fn strict_mode_reports_the_position() {
        let catalog = test_catalog();
        let options = ParseOptions::default().catalog(&catalog);
        let Err(err) = Resolver::new(&options).resolve("MIT", IdentifierKind::Exception) else {
            panic!("a license is not an exception");
        };
        assert_eq!(err.kind, IdentifierKind::Exception);
        assert_eq!(err.identifier, "MIT");
    }
}
