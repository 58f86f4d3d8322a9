use std::collections::BTreeSet;

use super::{Diagnostic, RepairError, RuleName};

/// Rules enabled for a run
///
/// A set, not a list: the order rules run in is fixed by [`RuleName::ALL`]
/// no matter how they were enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    enabled: BTreeSet<RuleName>,
}

impl RuleSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        RuleName::ALL.into_iter().collect()
    }

    pub fn enable(&mut self, rule: RuleName) {
        self.enabled.insert(rule);
    }

    pub fn with(mut self, rule: RuleName) -> Self {
        self.enable(rule);
        self
    }

    pub fn is_enabled(&self, rule: RuleName) -> bool {
        self.enabled.contains(&rule)
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Enabled rules in application order
    pub fn iter(&self) -> impl Iterator<Item = RuleName> + '_ {
        RuleName::ALL
            .into_iter()
            .filter(move |rule| self.is_enabled(*rule))
    }
}

impl FromIterator<RuleName> for RuleSet {
    fn from_iter<I: IntoIterator<Item = RuleName>>(iter: I) -> Self {
        Self {
            enabled: iter.into_iter().collect(),
        }
    }
}

/// Result of running the pipeline over one post body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repair {
    pub text: String,
    pub applied: Vec<RuleName>,
    pub diagnostics: Vec<Diagnostic>,
    changed: bool,
}

impl Repair {
    /// Whether the repaired text differs from the original body
    pub fn changed(&self) -> bool {
        self.changed
    }
}

/// Applies the enabled pattern rules, each exactly once, in canonical order
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    rules: RuleSet,
}

impl Pipeline {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Run every enabled rule over `body`.
    ///
    /// The first rule error aborts the whole repair; the caller still owns
    /// the untouched `body`.
    pub fn apply(&self, body: &str) -> Result<Repair, RepairError> {
        let mut text = body.to_string();
        let mut applied = Vec::new();
        let mut diagnostics = Vec::new();

        for rule in self.rules.iter() {
            text = (rule.rule())(&text, &mut diagnostics)?;
            applied.push(rule);
        }

        let changed = text != body;
        Ok(Repair {
            text,
            applied,
            diagnostics,
            changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_POST: &str = concat!(
        "<p>Regardez :<br/><br/>\n",
        "<ATTACHMENT filename=\"photo.jpg\">photo.jpg</ATTACHMENT></p></p>\n",
        "[quote=&quot;Alice&quot;]Bonjour<br/>\ntout le monde[/quote]\n",
        "<a download=\"photo.jpg\" class=\"imported-anchor-tag\" href=\"/uploads/photo.jpg\" >photo.jpg</a>",
    );

    // ============================================================================
    // RuleSet tests
    // ============================================================================

    #[test]
    fn test_rule_set_iterates_in_canonical_order() {
        let rules = RuleSet::none()
            .with(RuleName::Quote)
            .with(RuleName::ImageUploads)
            .with(RuleName::MultipleBr);

        assert_eq!(
            rules.iter().collect::<Vec<_>>(),
            vec![RuleName::ImageUploads, RuleName::MultipleBr, RuleName::Quote]
        );
    }

    #[test]
    fn test_rule_set_all() {
        let rules = RuleSet::all();
        assert_eq!(rules.iter().collect::<Vec<_>>(), RuleName::ALL.to_vec());
        assert!(!rules.is_empty());
    }

    #[test]
    fn test_rule_set_none() {
        let rules = RuleSet::none();
        assert!(rules.is_empty());
        assert_eq!(rules.iter().count(), 0);
    }

    // ============================================================================
    // Pipeline tests
    // ============================================================================

    #[test]
    fn test_pipeline_applies_enabled_rules() {
        let repair = Pipeline::new(RuleSet::all()).apply(LEGACY_POST).unwrap();

        assert!(repair.changed());
        assert_eq!(repair.applied, RuleName::ALL.to_vec());
        assert!(repair.text.contains("![photo.jpg](/uploads/photo.jpg)"));
        assert!(repair.text.contains("@Alice a dit :"));
        assert!(repair.text.contains("> Bonjour\n> tout le monde"));
        assert!(!repair.text.contains("<br/><br/>"));
        assert!(!repair.text.contains("</p></p>"));
        assert!(!repair.text.contains("imported-anchor-tag"));
        assert!(repair.diagnostics.is_empty());
    }

    #[test]
    fn test_pipeline_skips_disabled_rules() {
        let rules = RuleSet::none().with(RuleName::MultipleBr);
        let repair = Pipeline::new(rules).apply(LEGACY_POST).unwrap();

        assert_eq!(repair.applied, vec![RuleName::MultipleBr]);
        assert!(repair.text.contains("<ATTACHMENT"));
        assert!(repair.text.contains("[quote="));
        assert!(!repair.text.contains("</p></p>"));
    }

    #[test]
    fn test_pipeline_without_rules_is_unchanged() {
        let repair = Pipeline::new(RuleSet::none()).apply(LEGACY_POST).unwrap();

        assert!(!repair.changed());
        assert_eq!(repair.text, LEGACY_POST);
    }

    #[test]
    fn test_pipeline_unchanged_when_nothing_matches() {
        let body = "<p>Déjà propre</p>";
        let repair = Pipeline::new(RuleSet::all()).apply(body).unwrap();

        assert!(!repair.changed());
        assert_eq!(repair.text, body);
        assert_eq!(repair.applied.len(), RuleName::ALL.len());
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let pipeline = Pipeline::new(RuleSet::all());

        let first = pipeline.apply(LEGACY_POST).unwrap();
        let second = pipeline.apply(LEGACY_POST).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_pipeline_collects_diagnostics() {
        let body = "<ATTACHMENT filename=\"missing.png\">x</ATTACHMENT>";
        let repair = Pipeline::new(RuleSet::all()).apply(body).unwrap();

        assert!(repair.changed());
        assert!(repair.text.contains("![missing.png]()"));
        assert_eq!(
            repair.diagnostics,
            vec![Diagnostic::MissingAttachment {
                filename: "missing.png".to_string()
            }]
        );
    }
}
