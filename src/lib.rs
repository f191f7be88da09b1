#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Page configuration, record layouts, and built-in page presets.
pub mod config;
/// Centralized constants used across parsing, rendering, and pages.
pub mod constants;
/// Contact-form relay client.
pub mod contact;
/// Delimited-text (CSV) parsing and encoding.
pub mod csv;
/// Records, datasets, load state, and selection tuples.
pub mod data;
/// Option domains derived from loaded datasets.
pub mod domains;
/// Reusable example runners shared by downstream crates.
pub mod example_apps;
/// Fetch + decode of page datasets, blocking or in the background.
pub mod loader;
/// Exact-match lookup of a selection.
pub mod matcher;
/// Page lifecycle and submission handling.
pub mod page;
/// Recommendation card rendering.
pub mod render;
/// Dataset formats and decoding.
pub mod source;
/// Input transports used by the loader (HTTP and local site roots).
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;
#[cfg(test)]
mod test_support;

pub use config::{AttributeSpec, PageConfig, PageMessages, RecordLayout};
pub use contact::{ContactMessage, ContactRelay};
pub use csv::{CsvTable, encode_rows, parse_rows};
pub use data::{LoadState, Payload, Record, RouteDataset, RoutePlan, ScheduleItem, SelectionTuple};
pub use domains::AttributeDomains;
pub use errors::RouteError;
pub use loader::{BackgroundLoad, DatasetLoader};
pub use matcher::{MatchOutcome, find_match, match_form};
pub use page::{PageController, PageState, SubmitOutcome};
pub use render::{CardStyle, IconTable, LabelStyle, PayloadStyle, RecommendationCard};
pub use source::{DatasetFormat, FormSchema, LoadedContent};
pub use transport::{FsTransport, HttpTransport, Transport};
pub use types::{AttributeName, AttributeValue, SourceId};
