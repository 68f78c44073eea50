use crate::db::core::RoutingResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one block per net:
///
/// ```text
/// net_name
/// (
/// fromLayer fromCol fromRow toLayer toCol toRow
/// )
/// ```
pub fn write_routes<W: Write>(out: &mut W, result: &RoutingResult) -> std::io::Result<()> {
    for net in &result.nets {
        writeln!(out, "{}", net.name)?;
        writeln!(out, "(")?;
        for seg in &net.segments {
            writeln!(
                out,
                "{} {} {} {} {} {}",
                seg.from.layer, seg.from.col, seg.from.row, seg.to.layer, seg.to.col, seg.to.row
            )?;
        }
        writeln!(out, ")")?;
    }
    Ok(())
}

pub fn write_route_file(path: &Path, result: &RoutingResult) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_routes(&mut writer, result)?;
    writer.flush()
}
