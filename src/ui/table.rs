use tabled::{builder::Builder, settings::Style};

use crate::query::SaleRecord;

/// Render sales as pipe-delimited columns (title, shop, price, date), each
/// padded to its widest cell. No header row. Empty input renders as an empty
/// string.
pub fn sales_table(records: &[SaleRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut builder = Builder::new();
    for record in records {
        builder.push_record([
            record.title.clone(),
            record.shop.clone(),
            record.price.to_string(),
            record.date.to_string(),
        ]);
    }

    builder.build().with(Style::empty().vertical('|')).to_string()
}
