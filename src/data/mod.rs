/// Data layer: cell types, split selection, loading, and lazy column views.
///
/// Architecture:
/// ```text
///   <root>/<dataset>/<split>.parquet|json|csv
///        │
///        ▼
///   ┌──────────┐
///   │  split    │  pick the evaluation split
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → dyn Dataset (Table / RecordBatch)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  column   │  ColumnView / ColumnPairView, one row read per access
///   └──────────┘
/// ```

pub mod column;
pub mod loader;
pub mod model;
pub mod split;

pub use column::{ColumnIter, ColumnPairView, ColumnSequence, ColumnView, RowLimit};
pub use model::{Dataset, Row, Table, Value};
pub use split::{choose_split, DirectorySplits, SplitSource, PREFERRED_SPLIT_ORDER};
