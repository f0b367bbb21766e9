/// Data layer: core types and the stages of the frequency pipeline.
///
/// Architecture:
/// ```text
///   uploaded .json bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  size check, parse → Vec<RawRecord>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  count per label → FrequencyTable
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  wildcard pattern → matching rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select   │  sort by count, keep top N → SelectionResult
///   └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod select;
