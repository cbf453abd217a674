//! Interactive publisher search
//!
//! Reads one publisher-name substring per line and prints that publisher's
//! sales. `0` ends the session, so does end of input.

use std::io::{BufRead, Write};

use crate::query::SalesQuery;
use crate::storage::BookshopStore;
use crate::ui::sales_table;
use crate::Result;

/// Input that ends the loop
pub const EXIT_SENTINEL: &str = "0";

pub const PROMPT: &str = "Enter publisher (or 0 to stop): ";
pub const NO_PURCHASES: &str = "Nobody has bought this publisher's books";
pub const LEAVING: &str = "Leaving search mode";

/// Run the search loop until the sentinel or end of input.
///
/// Returns the number of searches answered.
pub fn run_shell<R: BufRead, W: Write>(store: &BookshopStore, mut input: R, mut output: W) -> Result<usize> {
    let query = SalesQuery::new(store);
    let mut answered = 0;
    let mut line = String::new();

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        let name = line.trim_end_matches(['\r', '\n']);
        if name == EXIT_SENTINEL {
            writeln!(output, "{}", LEAVING)?;
            break;
        }

        let rows = query.by_publisher(name)?;
        if rows.is_empty() {
            writeln!(output, "{}", NO_PURCHASES)?;
        } else {
            writeln!(output, "{}", sales_table(&rows))?;
        }
        answered += 1;
    }

    Ok(answered)
}
