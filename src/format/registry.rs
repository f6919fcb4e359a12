use crate::action::ActionKind;
use crate::err::{FormatError, Result};

use hashbrown::HashMap;
use log::debug;

/// Per-action output templates, replacing the default layout for the kinds they cover.
///
/// Built once during startup and never touched again while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOverrides {
    templates: HashMap<ActionKind, String>,
}

impl FormatOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a `<kind>,<template>` specifier.
    ///
    /// Registering `M` applies to both merge directions, so it also sets `B`.
    pub fn register(&mut self, spec: &str) -> Result<ActionKind> {
        let mut chars = spec.chars();

        let letter = chars.next().ok_or_else(|| FormatError::MalformedSpec {
            spec: spec.to_owned(),
            reason: "empty specifier",
        })?;

        let kind = ActionKind::from_letter(letter)
            .filter(|kind| kind.is_overridable())
            .ok_or(FormatError::InvalidKind { kind: letter })?;

        if chars.next() != Some(',') {
            return Err(FormatError::MalformedSpec {
                spec: spec.to_owned(),
                reason: "need ','",
            });
        }

        let template = chars.as_str();
        if template.is_empty() {
            return Err(FormatError::MalformedSpec {
                spec: spec.to_owned(),
                reason: "need fmt",
            });
        }

        self.set(kind, template)?;
        Ok(kind)
    }

    /// Sets the template used for `kind`.
    pub fn set(&mut self, kind: ActionKind, template: impl Into<String>) -> Result<()> {
        if !kind.is_overridable() {
            return Err(FormatError::InvalidKind {
                kind: kind.letter(),
            });
        }

        let template = template.into();
        debug!("registering format for `{}`: {:?}", kind.letter(), template);

        if kind == ActionKind::Merge {
            self.templates.insert(ActionKind::BackMerge, template.clone());
        }
        self.templates.insert(kind, template);

        Ok(())
    }

    /// Uses `template` for every kind that does not have one yet.
    pub fn fill_unset(&mut self, template: &str) {
        for kind in ActionKind::OVERRIDABLE {
            self.templates.entry(kind).or_insert_with(|| {
                debug!("using bulk format for `{}`", kind.letter());
                template.to_owned()
            });
        }
    }

    pub fn lookup(&self, kind: ActionKind) -> Option<&str> {
        self.templates.get(&kind).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_register_merge_sets_both_directions() {
        let mut overrides = FormatOverrides::new();
        assert_eq!(overrides.register("M,%S\\n").unwrap(), ActionKind::Merge);

        assert_eq!(overrides.lookup(ActionKind::Merge), Some("%S\\n"));
        assert_eq!(overrides.lookup(ActionKind::BackMerge), Some("%S\\n"));
        assert_eq!(overrides.lookup(ActionKind::FrontMerge), None);
        assert_eq!(overrides.len(), 2);
    }

    #[test]
    fn test_fill_unset_keeps_earlier_registrations() {
        let mut overrides = FormatOverrides::new();
        overrides.register("Q,A").unwrap();
        overrides.fill_unset("B");

        assert_eq!(overrides.lookup(ActionKind::Queue), Some("A"));
        for kind in ActionKind::OVERRIDABLE {
            if kind != ActionKind::Queue {
                assert_eq!(overrides.lookup(kind), Some("B"), "kind {kind:?}");
            }
        }
        assert_eq!(overrides.lookup(ActionKind::Insert), None);
    }

    #[test]
    fn test_second_fill_does_not_overwrite() {
        let mut overrides = FormatOverrides::new();
        overrides.fill_unset("first");
        overrides.fill_unset("second");
        assert_eq!(overrides.lookup(ActionKind::Complete), Some("first"));
    }

    #[test]
    fn test_later_register_replaces() {
        let mut overrides = FormatOverrides::new();
        overrides.register("C,one").unwrap();
        overrides.register("C,two").unwrap();
        assert_eq!(overrides.lookup(ActionKind::Complete), Some("two"));
    }

    #[test]
    fn test_register_rejects_unknown_kind() {
        let mut overrides = FormatOverrides::new();

        assert!(matches!(
            overrides.register("Z,%p"),
            Err(FormatError::InvalidKind { kind: 'Z' })
        ));
        assert!(matches!(
            overrides.register("I,%p"),
            Err(FormatError::InvalidKind { kind: 'I' })
        ));
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_register_rejects_malformed_specs() {
        let mut overrides = FormatOverrides::new();

        let cases = [
            ("", "empty specifier"),
            ("Q", "need ','"),
            ("Q:%p", "need ','"),
            ("Q,", "need fmt"),
        ];

        for (spec, reason) in cases {
            match overrides.register(spec) {
                Err(FormatError::MalformedSpec { reason: got, .. }) => {
                    assert_eq!(got, reason, "spec {spec:?}")
                }
                other => panic!("expected malformed spec for {spec:?}, got {other:?}"),
            }
        }
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_template_may_contain_commas() {
        let mut overrides = FormatOverrides::new();
        overrides.register("D,%M,%m").unwrap();
        assert_eq!(overrides.lookup(ActionKind::Issue), Some("%M,%m"));
    }
}
