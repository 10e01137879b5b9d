use crate::domain::order::OrderFields;
use crate::domain::ports::Payload;
use crate::error::Result;
use std::io::{Read, Write};

/// Reads one order's raw fields from a JSON object keyed by wire names.
pub fn read_order<R: Read>(source: R) -> Result<OrderFields> {
    Ok(serde_json::from_reader(source)?)
}

/// Writes `payload` as pretty-printed JSON followed by a newline.
pub fn write_payload<W: Write>(mut sink: W, payload: &Payload) -> Result<()> {
    serde_json::to_writer_pretty(&mut sink, payload)?;
    writeln!(sink)?;
    Ok(())
}
