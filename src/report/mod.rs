//! Report definition: the user-editable query spec, its builder, and the
//! derived selectable-column view.

mod builder;
mod derived;
mod spec;

pub use builder::{ReportBuilder, SpecError, SpecResult};
pub use derived::{prune_stale_references, selectable_columns, SelectableColumns};
pub use spec::{AdvancedFilter, FilterOperator, QuerySpec, SortDirection, SortSpec};
