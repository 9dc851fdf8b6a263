//! Shared fixtures: in-memory PDFs, scorers and a document server.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use readmit_risk::{FeatureSchema, RiskError, Scorer};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Route pipeline logs to the test harness; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build a PDF with one page per entry; each `\n`-separated line becomes its
/// own text object. An empty entry yields a blank page.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page_text in pages {
        let mut operations = Vec::new();
        for (i, line) in page_text.lines().enumerate() {
            // One text object per line so extraction ends each with a newline.
            let y = 750 - 14 * i as i64;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
            operations.push(Operation::new("Td", vec![50.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save pdf");
    buf
}

/// Serve `body` at `/<name>` and return its absolute URL.
pub async fn serve_document(server: &MockServer, name: &str, body: Vec<u8>) -> String {
    Mock::given(method("GET"))
        .and(path(format!("/{name}")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(body),
        )
        .mount(server)
        .await;
    format!("{}/{}", server.uri(), name)
}

pub fn named_schema(names: &[&str]) -> FeatureSchema {
    FeatureSchema::SchemaAware {
        names: names.iter().map(|s| s.to_string()).collect(),
    }
}

/// Scorer that records every vector and always returns `proba`.
pub struct RecordingScorer {
    pub schema: FeatureSchema,
    pub proba: [f64; 2],
    pub seen: Mutex<Vec<Vec<f64>>>,
}

impl RecordingScorer {
    pub fn new(schema: FeatureSchema, proba: [f64; 2]) -> Self {
        Self {
            schema,
            proba,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn last_vector(&self) -> Vec<f64> {
        self.seen
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("scorer was never called")
    }
}

impl Scorer for RecordingScorer {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], RiskError> {
        if features.len() != self.schema.n_features() {
            return Err(RiskError::ModelInference(format!(
                "expected {} features, got {}",
                self.schema.n_features(),
                features.len()
            )));
        }
        self.seen.lock().unwrap().push(features.to_vec());
        Ok(self.proba)
    }
}

/// Scorer that declares one count and rejects every vector.
pub struct RejectingScorer {
    pub schema: FeatureSchema,
}

impl Scorer for RejectingScorer {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], RiskError> {
        Err(RiskError::ModelInference(format!(
            "X has {} features, but the model is expecting 48 features as input",
            features.len()
        )))
    }
}
