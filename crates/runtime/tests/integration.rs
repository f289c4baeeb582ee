// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: end-to-end batch prediction pipeline.
//!
//! These tests drive the complete flow from artifact resolution → reading →
//! batching → dispatch → output, using a recording prediction service to
//! observe which calling convention served each batch.

use batch_runtime::{
    ArchiveArtifactLoader, Artifact, ArtifactLoader, CallingConvention, Destination, Device,
    OutputSink, Prediction, PredictionEngine, PredictionError, PredictionService, Ready,
    RecordReader, Request, RunConfig, RuntimeError, TaskVariant,
};
use serde_json::json;
use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

// ── Helpers ────────────────────────────────────────────────────

/// One observed call: convention, request texts, device.
type Call = (CallingConvention, Vec<String>, Device);

/// Echoes each request back and records every call it receives.
#[derive(Clone, Default)]
struct RecordingService {
    calls: Rc<RefCell<Vec<Call>>>,
    /// Fail on the n-th call (0-based).
    fail_on_call: Option<usize>,
    /// Refuse to format the prediction for this request text.
    unformattable: Option<&'static str>,
}

impl RecordingService {
    fn record(&self, convention: CallingConvention, requests: &[Request], device: Device) -> usize {
        let mut calls = self.calls.borrow_mut();
        calls.push((
            convention,
            requests.iter().map(|r| r.text().to_string()).collect(),
            device,
        ));
        calls.len() - 1
    }

    fn check(&self, call_index: usize) -> Result<(), PredictionError> {
        match self.fail_on_call {
            Some(n) if n == call_index => Err(PredictionError::new("inference backend crashed")),
            _ => Ok(()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

fn echo(request: &Request) -> Prediction {
    Prediction(json!({ "echo": request }))
}

impl PredictionService for RecordingService {
    fn name(&self) -> &str {
        "recording"
    }

    fn predict_single(
        &self,
        request: &Request,
        device: Device,
    ) -> Result<Prediction, PredictionError> {
        let idx = self.record(
            CallingConvention::Single,
            std::slice::from_ref(request),
            device,
        );
        self.check(idx)?;
        Ok(echo(request))
    }

    fn predict_batch(
        &self,
        requests: &[Request],
        device: Device,
    ) -> Result<Vec<Prediction>, PredictionError> {
        let idx = self.record(CallingConvention::Batch, requests, device);
        self.check(idx)?;
        Ok(requests.iter().map(echo).collect())
    }

    fn format(&self, prediction: &Prediction) -> Result<String, PredictionError> {
        let text = prediction.as_json()["echo"]
            .as_object()
            .and_then(|req| req.values().next())
            .and_then(|t| t.as_str());
        if text.is_some() && text == self.unformattable {
            return Err(PredictionError::new("serialiser broke"));
        }
        let mut line = serde_json::to_string(prediction.as_json()).unwrap();
        line.push('\n');
        Ok(line)
    }
}

/// Artifact double declaring a fixed type tag and binding a shared service.
struct FakeArtifact {
    tag: String,
    service: RecordingService,
}

impl Artifact for FakeArtifact {
    fn model_type(&self) -> Option<&str> {
        Some(self.tag.as_str())
    }

    fn summary(&self) -> String {
        format!("fake artifact '{}'", self.tag)
    }

    fn into_service(
        self: Box<Self>,
        _task: TaskVariant,
        _device: Device,
    ) -> Result<Box<dyn PredictionService>, RuntimeError> {
        let artifact = *self;
        Ok(Box::new(artifact.service))
    }
}

struct FakeLoader {
    tag: &'static str,
    service: RecordingService,
}

impl ArtifactLoader for FakeLoader {
    fn load(
        &self,
        _location: &str,
        _device: Device,
        _overrides: &str,
    ) -> Result<Box<dyn Artifact>, RuntimeError> {
        Ok(Box::new(FakeArtifact {
            tag: self.tag.to_string(),
            service: self.service.clone(),
        }))
    }
}

fn config(batch_size: usize) -> RunConfig {
    RunConfig {
        archive_path: "mem://model".into(),
        batch_size,
        cuda_device: 0,
        ..Default::default()
    }
}

fn ready_engine(
    tag: &'static str,
    batch_size: usize,
    service: &RecordingService,
) -> PredictionEngine<Ready> {
    let loader = FakeLoader {
        tag,
        service: service.clone(),
    };
    PredictionEngine::new(config(batch_size))
        .resolve(&loader)
        .unwrap()
}

/// Runs `input` into an in-memory sink, returning the output text.
fn run_into(
    engine: &PredictionEngine<Ready>,
    input: &str,
    destination: Destination,
) -> Result<String, (RuntimeError, String)> {
    let mut sink = OutputSink::new(destination, Vec::new());
    let result = engine.run(RecordReader::new(Cursor::new(input.to_string())), &mut sink);
    let out = String::from_utf8(sink.finish().unwrap()).unwrap();
    match result {
        Ok(_) => Ok(out),
        Err(e) => Err((e, out)),
    }
}

fn echoed_texts(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| {
            let v: serde_json::Value = serde_json::from_str(line).unwrap();
            let req = &v["echo"];
            req.get("sentence")
                .or_else(|| req.get("document"))
                .and_then(|t| t.as_str())
                .unwrap()
                .to_string()
        })
        .collect()
}

// ── End-to-end ─────────────────────────────────────────────────

#[test]
fn test_end_to_end_role_labeling_example() {
    let service = RecordingService::default();
    let engine = ready_engine("role-labeling", 2, &service);
    assert_eq!(engine.task(), TaskVariant::RoleLabeling);

    let out = run_into(&engine, "The cat sat.\n\n  \nDogs bark.\n", Destination::File).unwrap();

    // Exactly one batch of two, through the batch convention.
    assert_eq!(
        service.calls(),
        vec![(
            CallingConvention::Batch,
            vec!["The cat sat.".to_string(), "Dogs bark.".to_string()],
            Device::new(0),
        )]
    );

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"{"echo":{"sentence":"The cat sat."}}"#,
            r#"{"echo":{"sentence":"Dogs bark."}}"#,
        ]
    );
}

#[test]
fn test_end_to_end_coreference_request_shape() {
    let service = RecordingService::default();
    let engine = ready_engine("coreference", 1, &service);
    assert_eq!(engine.task(), TaskVariant::Coreference);

    let out = run_into(&engine, "Anna said she would come.\n", Destination::File).unwrap();
    assert_eq!(out, "{\"echo\":{\"document\":\"Anna said she would come.\"}}\n");
}

// ── Property: order preserved, nothing dropped or duplicated ───

#[test]
fn test_order_and_count_preserved_for_all_batch_sizes() {
    let mut input = String::new();
    let mut expected = Vec::new();
    for i in 0..23 {
        input.push_str(&format!("record {i}\n"));
        expected.push(format!("record {i}"));
        if i % 4 == 0 {
            input.push_str("   \n\n");
        }
    }

    for batch_size in 1..=25 {
        let service = RecordingService::default();
        let engine = ready_engine("srl", batch_size, &service);
        let out = run_into(&engine, &input, Destination::File).unwrap();

        assert_eq!(echoed_texts(&out), expected, "batch_size={batch_size}");

        // Batch sizes: full batches, then the remainder.
        let sizes: Vec<usize> = service.calls().iter().map(|(_, r, _)| r.len()).collect();
        let (last, full) = sizes.split_last().unwrap();
        assert!(full.iter().all(|&s| s == batch_size), "batch_size={batch_size}");
        let rem = expected.len() % batch_size;
        assert_eq!(*last, if rem == 0 { batch_size } else { rem });
    }
}

// ── Dispatch routing ───────────────────────────────────────────

#[test]
fn test_batch_size_one_always_uses_single_convention() {
    let service = RecordingService::default();
    let engine = ready_engine("srl", 1, &service);
    run_into(&engine, "a\nb\nc\n", Destination::File).unwrap();

    let calls = service.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls
        .iter()
        .all(|(conv, reqs, _)| *conv == CallingConvention::Single && reqs.len() == 1));
}

#[test]
fn test_trailing_single_record_uses_single_convention() {
    let service = RecordingService::default();
    let engine = ready_engine("srl", 3, &service);
    run_into(&engine, "1\n2\n3\n4\n5\n6\n7\n", Destination::File).unwrap();

    let conventions: Vec<CallingConvention> =
        service.calls().iter().map(|(c, _, _)| *c).collect();
    assert_eq!(
        conventions,
        vec![
            CallingConvention::Batch,
            CallingConvention::Batch,
            CallingConvention::Single,
        ]
    );
}

#[test]
fn test_device_reaches_both_conventions() {
    let service = RecordingService::default();
    let engine = ready_engine("srl", 2, &service);
    run_into(&engine, "a\nb\nc\n", Destination::File).unwrap();

    assert!(service.calls().iter().all(|(_, _, d)| *d == Device::new(0)));
}

// ── Model type gating ──────────────────────────────────────────

#[test]
fn test_unsupported_model_rejected_at_resolution() {
    let loader = FakeLoader {
        tag: "reading-comprehension",
        service: RecordingService::default(),
    };
    let err = PredictionEngine::new(config(4)).resolve(&loader).unwrap_err();

    assert!(matches!(
        err,
        RuntimeError::UnsupportedModel { ref model_type } if model_type == "reading-comprehension"
    ));
    assert!(loader.service.calls().is_empty());
}

#[test]
fn test_invalid_config_rejected_before_loading() {
    let loader = FakeLoader {
        tag: "srl",
        service: RecordingService::default(),
    };
    let err = PredictionEngine::new(config(0)).resolve(&loader).unwrap_err();
    assert!(matches!(err, RuntimeError::ConfigError(_)));
}

// ── Output routing ─────────────────────────────────────────────

#[test]
fn test_file_destination_has_one_line_per_record_and_no_echo() {
    let service = RecordingService::default();
    let engine = ready_engine("srl", 2, &service);
    let out = run_into(&engine, "x\n\ny\nz\n", Destination::File).unwrap();

    assert_eq!(out.lines().count(), 3);
    assert!(!out.contains("input:"));
}

#[test]
fn test_console_destination_echoes_input_and_prediction() {
    let service = RecordingService::default();
    let engine = ready_engine("srl", 2, &service);
    let out = run_into(&engine, "x\n\ny\n", Destination::Console).unwrap();

    assert_eq!(
        out,
        "input: x\nprediction: {\"echo\":{\"sentence\":\"x\"}}\n\
         input: y\nprediction: {\"echo\":{\"sentence\":\"y\"}}\n"
    );
}

// ── Failure handling ───────────────────────────────────────────

#[test]
fn test_prediction_failure_stops_run_and_keeps_earlier_output() {
    let service = RecordingService {
        fail_on_call: Some(1),
        ..Default::default()
    };
    let engine = ready_engine("srl", 2, &service);
    let (err, out) = run_into(&engine, "a\nb\nc\nd\ne\nf\n", Destination::File).unwrap_err();

    assert!(matches!(err, RuntimeError::Prediction(_)));
    // First batch written, failed batch produced nothing, third never ran.
    assert_eq!(echoed_texts(&out), vec!["a", "b"]);
    assert_eq!(service.calls().len(), 2);
}

#[test]
fn test_format_failure_emits_nothing_from_the_batch() {
    let service = RecordingService {
        unformattable: Some("b"),
        ..Default::default()
    };
    let engine = ready_engine("srl", 2, &service);
    let (err, out) = run_into(&engine, "a\nb\n", Destination::File).unwrap_err();

    assert!(matches!(err, RuntimeError::Prediction(_)));
    assert!(err.to_string().contains("serialiser broke"));
    assert!(out.is_empty());
    assert_eq!(service.calls().len(), 1);
}

#[test]
fn test_format_failure_keeps_earlier_batches() {
    let service = RecordingService {
        unformattable: Some("d"),
        ..Default::default()
    };
    let engine = ready_engine("srl", 2, &service);
    let (_, out) = run_into(&engine, "a\nb\nc\nd\n", Destination::File).unwrap_err();

    assert_eq!(echoed_texts(&out), vec!["a", "b"]);
}

#[test]
fn test_invalid_utf8_input_is_an_io_error() {
    let service = RecordingService::default();
    let engine = ready_engine("srl", 1, &service);

    let mut sink = OutputSink::new(Destination::File, Vec::new());
    let bytes: &[u8] = b"fine\n\xc3\x28\n";
    let err = engine.run(RecordReader::new(bytes), &mut sink).unwrap_err();

    assert!(matches!(err, RuntimeError::Io(_)));
    assert_eq!(sink.written(), 1);
}

// ── Archive-backed pipeline ────────────────────────────────────

#[test]
fn test_archive_artifact_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("coref-model");
    std::fs::create_dir(&model_dir).unwrap();
    std::fs::write(
        model_dir.join("config.json"),
        r#"{ "model": { "type": "coref" } }"#,
    )
    .unwrap();
    std::fs::write(model_dir.join("weights.th"), b"opaque").unwrap();

    let config = RunConfig {
        archive_path: model_dir.to_string_lossy().into_owned(),
        batch_size: 2,
        ..Default::default()
    };
    let engine = PredictionEngine::new(config)
        .resolve(&ArchiveArtifactLoader::new())
        .unwrap();
    assert_eq!(engine.task(), TaskVariant::Coreference);

    let out_path = dir.path().join("out.jsonl");
    let mut sink = OutputSink::file(&out_path).unwrap();
    let metrics = engine
        .run(
            RecordReader::new(Cursor::new("Anna left.\n\nShe came back.\nIt rained.\n")),
            &mut sink,
        )
        .unwrap();
    sink.finish().unwrap();

    assert_eq!(metrics.records, 3);
    assert_eq!(metrics.batch_calls, 1);
    assert_eq!(metrics.single_calls, 1);

    let written = std::fs::read_to_string(&out_path).unwrap();
    let docs: Vec<serde_json::Value> = written
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(docs.len(), 3);
    assert_eq!(docs[1]["document"], json!(["She", "came", "back", "."]));
    assert_eq!(docs[2]["clusters"], json!([]));
}
