//! Output generation: the result spreadsheet and work items.
//!
//! # Submodules
//!
//! - [`spreadsheet`]: Writes the extracted [`ArticleInfo`](crate::models::ArticleInfo)
//!   records to an `.xlsx` workbook
//! - [`workitems`]: Reads the input work item and writes output items and the
//!   input item's release state
//!
//! # Output Structure
//!
//! ```text
//! output/
//! ├── result_20250506143000.xlsx
//! ├── <thumbnails>
//! ├── work-items.json
//! └── input-state.json
//! ```

pub mod spreadsheet;
pub mod workitems;
