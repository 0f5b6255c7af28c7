use crate::types::Workout;
use anyhow::{Context, Result};
use chrono::SecondsFormat;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const GPX_NS: &str = "http://www.topografix.com/GPX/1/1";

/// Write every workout as a GPX 1.1 waypoint.
pub fn write_waypoints<W: Write>(workouts: &[Workout], out: W) -> Result<()> {
    let mut xml = Writer::new_with_indent(out, b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("gpx");
    root.push_attribute(("version", "1.1"));
    root.push_attribute(("creator", "trailog"));
    root.push_attribute(("xmlns", GPX_NS));
    xml.write_event(Event::Start(root))?;

    for w in workouts {
        let lat = format!("{:.7}", w.coords().lat);
        let lon = format!("{:.7}", w.coords().lng);
        let mut wpt = BytesStart::new("wpt");
        wpt.push_attribute(("lat", lat.as_str()));
        wpt.push_attribute(("lon", lon.as_str()));
        xml.write_event(Event::Start(wpt))?;

        let time = w.date().to_rfc3339_opts(SecondsFormat::Millis, true);
        text_element(&mut xml, "time", &time)?;
        text_element(&mut xml, "name", w.description())?;
        text_element(&mut xml, "type", w.kind().as_str())?;

        xml.write_event(Event::End(BytesEnd::new("wpt")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("gpx")))?;
    Ok(())
}

fn text_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

pub fn export_waypoints(path: &Path, workouts: &[Workout]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating GPX file: {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_waypoints(workouts, &mut out)
        .with_context(|| format!("writing GPX file: {}", path.display()))?;
    out.flush()
        .with_context(|| format!("flushing GPX file: {}", path.display()))?;
    tracing::info!(path = %path.display(), waypoints = workouts.len(), "exported GPX");
    Ok(())
}
