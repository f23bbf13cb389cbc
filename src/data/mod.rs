/// Data layer: core types, fetching, local loading, and filtering.
///
/// Architecture:
/// ```text
///  remote JSON          local .json / .csv
///        │                     │
///        ▼                     ▼
///   ┌──────────┐         ┌──────────┐
///   │  fetch    │         │  loader   │
///   └──────────┘         └──────────┘
///        │                     │
///        └────────┬────────────┘
///                 ▼
///        ┌───────────────┐
///        │  RaceDataset   │  Vec<RaceRecord>, axis bounds, nationalities
///        └───────────────┘
///                 │
///                 ▼
///           ┌──────────┐
///           │  filter   │  status + nationality predicates → visible indices
///           └──────────┘
/// ```

pub mod fetch;
pub mod filter;
pub mod loader;
pub mod model;
