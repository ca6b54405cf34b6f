/// Gallery engine
///
/// Pure, synchronous logic with no I/O:
/// - `sort_filter.rs` - builds the ordered working set from the record list
/// - `pagination.rs` - how many tiles the next page holds, resize re-planning
///
/// Given well-formed input nothing here fails; degenerate input (empty
/// working set, zero-sized viewport) yields an empty result.

pub mod pagination;
pub mod sort_filter;

pub use pagination::{OccluderInfo, ResizePlan, ViewportInfo};
pub use sort_filter::SortFilterEngine;
