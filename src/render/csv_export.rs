use crate::error::{ReqscribeError, Result};
use crate::types::RequirementItem;

/// Byte-order mark written first so spreadsheet apps detect UTF-8
pub const UTF8_BOM: &str = "\u{feff}";

pub const CSV_HEADER: [&str; 4] = ["group", "id", "sequence", "description"];

/// Serialize requirements as comma-delimited text with a fixed header row
///
/// Rows are written in iteration order. Fields containing a comma, quote, or
/// line break are quoted and inner quotes doubled.
pub fn requirements_to_csv<'a, I>(items: I) -> Result<String>
where
    I: IntoIterator<Item = &'a RequirementItem>,
{
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    // Always write header, even with zero rows
    csv_writer.write_record(CSV_HEADER).map_err(export_error)?;

    for item in items {
        let sequence = item.sequence.to_string();
        csv_writer
            .write_record([
                item.group.as_str(),
                item.id.as_str(),
                sequence.as_str(),
                item.description.as_str(),
            ])
            .map_err(export_error)?;
    }

    let bytes = csv_writer
        .into_inner()
        .map_err(|e| ReqscribeError::Export(e.to_string()))?;
    let body = String::from_utf8(bytes).map_err(|e| ReqscribeError::Export(e.to_string()))?;

    Ok(format!("{UTF8_BOM}{body}"))
}

fn export_error(e: csv::Error) -> ReqscribeError {
    ReqscribeError::Export(e.to_string())
}
