/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, malformed-date count
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category + interval → candidate date axis
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  count per date → Vec<SeriesPoint>
///   └───────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
