pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{header, info, no_sales, section, success, summary_row, warn};
pub use table::sales_table;
pub use theme::{theme, Theme};
