pub mod date_parser;
pub mod deactivate;
pub mod filter;
pub mod paginate;
pub mod stats;
pub mod utils;

pub use deactivate::{apply_auto_deactivation, retain_active, DEFAULT_DEACTIVATE_AFTER_DAYS};
pub use filter::{apply_filters, FilterCriteria, RowFilter, SalaryBracket};
pub use paginate::{paginate, Page, DEFAULT_PAGE_SIZE};
pub use stats::{aggregate, Summary};
