//! Prediction assembly: score the vector and package the result.
//!
//! Unlike the document stages, a scorer rejection here is fatal for the
//! request and surfaces as [`RiskError::ModelInference`].

use crate::error::RiskError;
use crate::model::Scorer;
use crate::output::{DataSource, MissingFeatures, PredictionResult};
use crate::pipeline::reconcile::Reconciliation;
use tracing::debug;

/// Index of the readmission class in the scorer's probability output.
pub const POSITIVE_CLASS: usize = 1;

/// Diagnostics gathered upstream of scoring.
#[derive(Debug, Clone)]
pub struct Provenance {
    pub received_url: Option<String>,
    pub extraction_info: String,
    pub extracted_features: usize,
}

/// Score `reconciled.vector` and build the final result.
pub fn assemble(
    scorer: &dyn Scorer,
    reconciled: &Reconciliation,
    provenance: Provenance,
) -> Result<PredictionResult, RiskError> {
    debug!(
        "Scoring vector: {} provided, {} expected",
        reconciled.vector.len(),
        scorer.schema().n_features()
    );

    let probabilities = scorer.predict_proba(&reconciled.vector)?;
    let positive = probabilities[POSITIVE_CLASS];
    if !positive.is_finite() {
        return Err(RiskError::ModelInference(format!(
            "scorer returned non-finite probability {positive}"
        )));
    }

    Ok(PredictionResult {
        readmission_risk: (positive * 100.0).clamp(0.0, 100.0),
        success: true,
        received_url: provenance.received_url,
        data_source: if reconciled.used_default {
            DataSource::Default
        } else {
            DataSource::PdfExtracted
        },
        extraction_info: provenance.extraction_info,
        extracted_features: provenance.extracted_features,
        missing_features: match reconciled.missing.count() {
            Some(n) => MissingFeatures::Count(n),
            None => MissingFeatures::Unknown,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FeatureSchema;
    use crate::pipeline::reconcile::{Missing, ReconcileMode};

    struct Fixed {
        schema: FeatureSchema,
        proba: [f64; 2],
    }

    impl Scorer for Fixed {
        fn schema(&self) -> &FeatureSchema {
            &self.schema
        }
        fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], RiskError> {
            if features.len() != self.schema.n_features() {
                return Err(RiskError::ModelInference("length mismatch".into()));
            }
            Ok(self.proba)
        }
    }

    fn provenance() -> Provenance {
        Provenance {
            received_url: Some("https://x/y.pdf".into()),
            extraction_info: "info".into(),
            extracted_features: 2,
        }
    }

    fn reconciled(len: usize, used_default: bool, missing: Missing) -> Reconciliation {
        Reconciliation {
            vector: vec![0.0; len],
            missing,
            used_default,
            mode: ReconcileMode::Named,
        }
    }

    #[test]
    fn reads_positive_class_as_percentage() {
        let scorer = Fixed {
            schema: FeatureSchema::Schemaless { n_features: 3 },
            proba: [0.8, 0.2],
        };
        let result = assemble(
            &scorer,
            &reconciled(3, false, Missing::Named(vec!["a".into()])),
            provenance(),
        )
        .unwrap();

        assert!((result.readmission_risk - 20.0).abs() < 1e-9);
        assert!(result.success);
        assert_eq!(result.data_source, DataSource::PdfExtracted);
        assert_eq!(result.missing_features, MissingFeatures::Count(1));
        assert_eq!(result.extracted_features, 2);
        assert_eq!(result.received_url.as_deref(), Some("https://x/y.pdf"));
    }

    #[test]
    fn default_provenance_and_unknown_missing() {
        let scorer = Fixed {
            schema: FeatureSchema::Schemaless { n_features: 1 },
            proba: [0.0, 1.0],
        };
        let result = assemble(&scorer, &reconciled(1, true, Missing::Unknown), provenance()).unwrap();
        assert_eq!(result.readmission_risk, 100.0);
        assert_eq!(result.data_source, DataSource::Default);
        assert_eq!(result.missing_features, MissingFeatures::Unknown);
    }

    #[test]
    fn rejected_vector_is_fatal() {
        let scorer = Fixed {
            schema: FeatureSchema::Schemaless { n_features: 5 },
            proba: [0.5, 0.5],
        };
        let err = assemble(&scorer, &reconciled(3, true, Missing::Unknown), provenance()).unwrap_err();
        assert!(matches!(err, RiskError::ModelInference(_)));
    }

    #[test]
    fn non_finite_probability_is_fatal() {
        let scorer = Fixed {
            schema: FeatureSchema::Schemaless { n_features: 1 },
            proba: [0.5, f64::NAN],
        };
        assert!(assemble(&scorer, &reconciled(1, true, Missing::Unknown), provenance()).is_err());
    }
}
