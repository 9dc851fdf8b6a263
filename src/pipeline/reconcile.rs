//! Schema reconciliation: sparse parsed features → scorer-ready vector.
//!
//! Two modes, chosen by the scorer's [`FeatureSchema`]:
//!
//! * **Named** (`SchemaAware`): each schema position takes the parsed value,
//!   else the template value, else `0`. `missing` lists schema names that were
//!   not parsed, whether or not a default filled them.
//!
//! * **Positional** (`Schemaless`): the template is overlaid with the parsed
//!   values and the first `n_features` values are taken in the merged map's
//!   order, zero-padded if short. This is best-effort alignment: it is only
//!   correct when the template order matches the scorer's internal column
//!   order, which nothing verifies. Missing features are reported as unknown.
//!
//! Reconciliation is a pure function of its inputs.

use crate::features::FeatureMap;
use crate::model::FeatureSchema;
use crate::template::FeatureTemplate;

/// How the vector was laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    Named,
    Positional,
}

/// Schema features absent from the parsed map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Named(Vec<String>),
    /// No named schema to compare against.
    Unknown,
}

impl Missing {
    pub fn count(&self) -> Option<usize> {
        match self {
            Missing::Named(names) => Some(names.len()),
            Missing::Unknown => None,
        }
    }
}

/// Output of [`reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// One value per scorer input; `len() == schema.n_features()`.
    pub vector: Vec<f64>,
    pub missing: Missing,
    /// True only when nothing was parsed and the vector is pure template.
    pub used_default: bool,
    pub mode: ReconcileMode,
}

/// Reconcile `sparse` against `schema`, filling gaps from `template`.
pub fn reconcile(
    sparse: &FeatureMap,
    schema: &FeatureSchema,
    template: &FeatureTemplate,
) -> Reconciliation {
    let used_default = sparse.is_empty();

    match schema {
        FeatureSchema::SchemaAware { names } => {
            let vector = names
                .iter()
                .map(|name| {
                    sparse
                        .get(name)
                        .or_else(|| template.get(name))
                        .map_or(0.0, |v| v.as_f64())
                })
                .collect();
            let missing = names
                .iter()
                .filter(|name| !sparse.contains(name))
                .cloned()
                .collect();
            Reconciliation {
                vector,
                missing: Missing::Named(missing),
                used_default,
                mode: ReconcileMode::Named,
            }
        }
        FeatureSchema::Schemaless { n_features } => {
            let merged = template.as_map().overlaid_with(sparse);
            let mut vector: Vec<f64> = merged
                .values()
                .take(*n_features)
                .map(|v| v.as_f64())
                .collect();
            vector.resize(*n_features, 0.0);
            Reconciliation {
                vector,
                missing: Missing::Unknown,
                used_default,
                mode: ReconcileMode::Positional,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureValue::{Float, Int};

    fn template() -> FeatureTemplate {
        FeatureTemplate::new(
            [("a", Int(1)), ("b", Float(0.5)), ("c", Int(3))]
                .into_iter()
                .collect(),
        )
    }

    fn named(names: &[&str]) -> FeatureSchema {
        FeatureSchema::SchemaAware {
            names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn named_mode_prefers_parsed_then_template_then_zero() {
        let sparse: FeatureMap = [("b", Float(9.0))].into_iter().collect();
        let r = reconcile(&sparse, &named(&["c", "b", "zz"]), &template());

        assert_eq!(r.vector, vec![3.0, 9.0, 0.0]);
        assert_eq!(r.missing, Missing::Named(vec!["c".into(), "zz".into()]));
        assert!(!r.used_default);
        assert_eq!(r.mode, ReconcileMode::Named);
    }

    #[test]
    fn named_mode_empty_sparse_is_pure_default() {
        let r = reconcile(&FeatureMap::new(), &named(&["a", "b", "c"]), &template());
        assert_eq!(r.vector, vec![1.0, 0.5, 3.0]);
        assert_eq!(r.missing.count(), Some(3));
        assert!(r.used_default);
    }

    #[test]
    fn named_mode_length_matches_schema() {
        let sparse: FeatureMap = [("x", Int(1)), ("y", Int(2)), ("a", Int(4))]
            .into_iter()
            .collect();
        for schema in [named(&[]), named(&["a"]), named(&["a", "b", "c", "d", "e"])] {
            let r = reconcile(&sparse, &schema, &template());
            assert_eq!(r.vector.len(), schema.n_features());
        }
    }

    #[test]
    fn extra_parsed_features_are_ignored_in_named_mode() {
        let sparse: FeatureMap = [("a", Int(7)), ("unrelated", Int(99))]
            .into_iter()
            .collect();
        let r = reconcile(&sparse, &named(&["a"]), &template());
        assert_eq!(r.vector, vec![7.0]);
        assert_eq!(r.missing.count(), Some(0));
    }

    #[test]
    fn positional_mode_overlays_in_template_order() {
        let sparse: FeatureMap = [("new", Int(8)), ("c", Int(30))].into_iter().collect();
        let r = reconcile(
            &sparse,
            &FeatureSchema::Schemaless { n_features: 4 },
            &template(),
        );
        assert_eq!(r.vector, vec![1.0, 0.5, 30.0, 8.0]);
        assert_eq!(r.missing, Missing::Unknown);
        assert_eq!(r.mode, ReconcileMode::Positional);
    }

    #[test]
    fn positional_mode_truncates_and_pads() {
        let short = reconcile(
            &FeatureMap::new(),
            &FeatureSchema::Schemaless { n_features: 2 },
            &template(),
        );
        assert_eq!(short.vector, vec![1.0, 0.5]);
        assert!(short.used_default);

        let long = reconcile(
            &FeatureMap::new(),
            &FeatureSchema::Schemaless { n_features: 5 },
            &template(),
        );
        assert_eq!(long.vector, vec![1.0, 0.5, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let sparse: FeatureMap = [("b", Float(2.5)), ("a", Int(0))].into_iter().collect();
        let schema = named(&["a", "b", "c"]);
        let t = template();
        assert_eq!(reconcile(&sparse, &schema, &t), reconcile(&sparse, &schema, &t));
    }
}
