/// State management module
///
/// This module holds the gallery's data model:
/// - Picture records and feed parsing (data.rs)
/// - Sort key and direction (sort.rs)
/// - The per-session store: records, working set, render cursor (library.rs)

pub mod data;
pub mod library;
pub mod sort;
