//! Integration tests: resolve a module, pick a split on disk, stream a column
//! pair into the module.

use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

use contrast_evaluate::data::loader::load_split;
use contrast_evaluate::data::{
    choose_split, ColumnPairView, ColumnSequence, ColumnView, Dataset, DirectorySplits, Row,
    Value,
};
use contrast_evaluate::module::{
    class_name, EvaluationModule, LoadOptions, ModuleCategory, ModuleConfig, ModuleRegistry,
    Scores,
};
use contrast_evaluate::{EvaluateError, Result};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug)]
struct ExactMatch {
    config: ModuleConfig,
}

impl EvaluationModule for ExactMatch {
    fn name(&self) -> &str {
        "Exact_match"
    }

    fn config(&self) -> &ModuleConfig {
        &self.config
    }

    fn compute(&self, records: &mut dyn Iterator<Item = Result<Row>>) -> Result<Scores> {
        let (mut hits, mut total) = (0.0, 0.0);
        for record in records {
            let record = record?;
            if record["predictions"] == record["references"] {
                hits += 1.0;
            }
            total += 1.0;
        }
        Ok(Scores::from([("exact_match".to_string(), hits / total)]))
    }
}

fn exact_match(config: ModuleConfig) -> Result<Box<dyn EvaluationModule>> {
    Ok(Box::new(ExactMatch { config }))
}

fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register_class(ModuleCategory::Comparison, "exact_match", exact_match);
    registry
}

fn write_split(dir: &std::path::Path, split: &str, predictions: &[&str], references: &[&str]) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("prediction", DataType::Utf8, false),
        Field::new("answer", DataType::Utf8, false),
        Field::new("id", DataType::Int64, false),
    ]));
    let ids: Vec<i64> = (0..predictions.len() as i64).collect();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(predictions.to_vec())),
            Arc::new(StringArray::from(references.to_vec())),
            Arc::new(Int64Array::from(ids)),
        ],
    )
    .unwrap();
    let file = std::fs::File::create(dir.join(format!("{split}.parquet"))).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

fn dataset_root() -> TempDir {
    let root = TempDir::new().unwrap();
    let dir = root.path().join("qa");
    std::fs::create_dir_all(&dir).unwrap();
    write_split(&dir, "train", &["a", "b"], &["a", "x"]);
    write_split(
        &dir,
        "validation",
        &["yes", "no", "maybe", "no"],
        &["yes", "yes", "maybe", "no"],
    );
    root
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_resolve_and_stream_validation_split() {
    let root = dataset_root();
    let splits = DirectorySplits::new(root.path());

    let split = choose_split(&splits, "qa", None).unwrap();
    assert_eq!(split, "validation");

    let dataset = load_split(&splits.dataset_dir("qa", None), &split).unwrap();
    assert_eq!(dataset.len(), 4);

    let module = registry().load("exact_match", LoadOptions::new()).unwrap();
    assert_eq!(module.name(), class_name("exact_match"));
    assert_eq!(module.category(), Some(ModuleCategory::Comparison));

    let view = ColumnPairView::new(
        &dataset,
        "prediction",
        Some("answer".to_string()),
        "predictions",
        "references",
        None,
    );
    let scores = module.compute(&mut view.iter()).unwrap();
    assert_eq!(scores["exact_match"], 0.75);

    // The view is restartable: a second pass sees the same data.
    let again = module.compute(&mut view.iter()).unwrap();
    assert_eq!(scores, again);
}

#[test]
fn test_row_limit_bounds_what_module_sees() {
    let root = dataset_root();
    let dataset = load_split(&root.path().join("qa"), "validation").unwrap();

    let view = ColumnPairView::new(
        &dataset,
        "prediction",
        Some("answer".to_string()),
        "predictions",
        "references",
        Some(2),
    );
    assert_eq!(view.len(), 2);
    let module = registry().load("exact_match", LoadOptions::new()).unwrap();
    let scores = module.compute(&mut view.iter()).unwrap();
    assert_eq!(scores["exact_match"], 0.5);
}

#[test]
fn test_column_view_over_parquet() {
    let root = dataset_root();
    let dataset = load_split(&root.path().join("qa"), "train").unwrap();

    let ids = ColumnView::new(&dataset, "id", None);
    let values: Vec<Value> = ids.iter().collect::<Result<_>>().unwrap();
    assert_eq!(values, vec![Value::Integer(0), Value::Integer(1)]);
    assert!(matches!(
        ids.get(2),
        Err(EvaluateError::IndexOutOfRange { index: 2, len: 2 })
    ));
}

#[test]
fn test_missing_second_column_streams_nulls() {
    let root = dataset_root();
    let dataset = load_split(&root.path().join("qa"), "train").unwrap();

    let view = ColumnPairView::new(&dataset, "prediction", None, "predictions", "references", None);
    for row in &view {
        assert_eq!(row.unwrap()["references"], Value::Null);
    }
}

#[test]
fn test_only_train_split_is_used_when_alone() {
    let root = TempDir::new().unwrap();
    let dir = root.path().join("qa");
    std::fs::create_dir_all(&dir).unwrap();
    write_split(&dir, "train", &["a"], &["a"]);

    let splits = DirectorySplits::new(root.path());
    assert_eq!(choose_split(&splits, "qa", None).unwrap(), "train");

    std::fs::remove_file(dir.join("train.parquet")).unwrap();
    write_split(&dir, "unlabeled", &["a"], &["a"]);
    assert!(matches!(
        choose_split(&splits, "qa", None),
        Err(EvaluateError::UnsupportedSplit { .. })
    ));
}

#[test]
fn test_unknown_module_is_not_found() {
    let err = registry().load("mauve", LoadOptions::new()).unwrap_err();
    assert!(matches!(err, EvaluateError::ModuleNotFound { ref name } if name == "mauve"));
}
