//! Schemas command implementation.

use crate::error::Result;
use crate::output::Formatter;
use sift_domain::Schema;

/// Execute the schemas command.
pub fn execute_schemas(formatter: &Formatter) -> Result<()> {
    let schemas = [
        ("upi", Schema::upi_transaction()),
        ("bank", Schema::bank_statement()),
        ("bank-match", Schema::bank_statement_match()),
    ];
    println!("{}", formatter.format_schemas(&schemas)?);
    Ok(())
}
