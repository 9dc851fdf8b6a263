//! The default feature template used when a document is missing values.
//!
//! The baseline describes a plausible "typical" diabetic inpatient encounter:
//! short stay, a single diagnosis, metformin + glipizide + insulin, emergency
//! admission from the ER. Every feature the readmission model was trained on
//! has an entry, so a fully defaulted vector is always scoreable.
//!
//! Entry order matters: in positional-fallback reconciliation the vector is
//! read straight out of this order. Do not reorder without retraining or
//! re-exporting the model.

use crate::features::{FeatureMap, FeatureValue};
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Immutable name → baseline value map, shared across requests.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTemplate {
    values: FeatureMap,
}

impl FeatureTemplate {
    pub fn new(values: FeatureMap) -> Self {
        Self { values }
    }

    /// The built-in readmission baseline, built once per process.
    pub fn readmission_baseline() -> Arc<FeatureTemplate> {
        Arc::clone(&READMISSION_BASELINE)
    }

    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.values.get(name)
    }

    pub fn as_map(&self) -> &FeatureMap {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

use FeatureValue::{Float as F, Int as I};

/// Baseline entries in model-training column order.
const BASELINE_ENTRIES: &[(&str, FeatureValue)] = &[
    ("age", I(25)),
    ("time_in_hospital", I(2)),
    ("num_procedures", I(1)),
    ("num_medications", I(1)),
    ("number_outpatient_log1p", F(1.0)),
    ("number_emergency_log1p", F(0.0)),
    ("number_inpatient_log1p", F(0.7)),
    ("number_diagnoses", I(1)),
    ("metformin", I(1)),
    ("repaglinide", I(0)),
    ("nateglinide", I(0)),
    ("chlorpropamide", I(0)),
    ("glimepiride", I(0)),
    ("glipizide", I(1)),
    ("glyburide", I(0)),
    ("pioglitazone", I(0)),
    ("rosiglitazone", I(0)),
    ("acarbose", I(0)),
    ("tolazamide", I(0)),
    ("insulin", I(1)),
    ("glyburide-metformin", I(0)),
    ("AfricanAmerican", I(0)),
    ("Asian", I(1)),
    ("Caucasian", I(0)),
    ("Hispanic", I(0)),
    ("Other", I(0)),
    ("gender_1", I(1)),
    ("admission_type_id_3", I(0)),
    ("admission_type_id_5", I(1)),
    ("discharge_disposition_id_2", I(0)),
    ("discharge_disposition_id_7", I(0)),
    ("discharge_disposition_id_10", I(0)),
    ("discharge_disposition_id_18", I(0)),
    ("admission_source_id_4", I(0)),
    ("admission_source_id_7", I(1)),
    ("admission_source_id_9", I(0)),
    ("max_glu_serum_1.0", I(1)),
    ("A1Cresult_1", I(1)),
    ("level1_diag1_1.0", I(1)),
    ("level1_diag1_2.0", I(0)),
    ("level1_diag1_3.0", I(0)),
    ("level1_diag1_4.0", I(0)),
    ("level1_diag1_5.0", I(0)),
    ("level1_diag1_6.0", I(0)),
    ("level1_diag1_7.0", I(0)),
    ("level1_diag1_8.0", I(0)),
];

static READMISSION_BASELINE: Lazy<Arc<FeatureTemplate>> = Lazy::new(|| {
    Arc::new(FeatureTemplate::new(
        BASELINE_ENTRIES.iter().map(|&(name, value)| (name, value)).collect(),
    ))
});
