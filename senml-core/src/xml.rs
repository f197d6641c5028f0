//! XML serialization support for SenML
//!
//! Follows the XML representation of RFC 8428 §7: a `sensml` root element
//! in the `urn:ietf:params:xml:ns:senml` namespace holding one empty
//! `senml` element per record, with every field carried as an attribute.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::format::{Format, OutputOptions};
use crate::{Result, SenMLError, SenMLPack, SenMLRecord};

/// SenML XML namespace
pub const SENML_XML_NAMESPACE: &str = "urn:ietf:params:xml:ns:senml";

const ROOT: &str = "sensml";
const RECORD: &str = "senml";

/// Serialize a pack to XML
pub fn encode(pack: &SenMLPack, options: &OutputOptions) -> Result<Vec<u8>> {
    let mut writer = if options.pretty {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    } else {
        Writer::new(Vec::new())
    };

    let root = BytesStart::new(ROOT).with_attributes([("xmlns", SENML_XML_NAMESPACE)]);
    write(&mut writer, Event::Start(root))?;
    for record in pack {
        write(&mut writer, Event::Empty(record_element(record)))?;
    }
    write(&mut writer, Event::End(BytesEnd::new(ROOT)))?;

    let mut out = writer.into_inner();
    if options.pretty {
        out.push(b'\n');
    }
    Ok(out)
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| SenMLError::encode(Format::Xml, e.to_string()))
}

fn record_element(record: &SenMLRecord) -> BytesStart<'static> {
    let mut element = BytesStart::new(RECORD);
    let mut attr = |key: &str, value: String| element.push_attribute((key, value.as_str()));

    if let Some(bver) = record.bver {
        attr("bver", bver.to_string());
    }
    if let Some(bn) = &record.bn {
        attr("bn", bn.clone());
    }
    if let Some(bt) = record.bt {
        attr("bt", bt.to_string());
    }
    if let Some(bu) = &record.bu {
        attr("bu", bu.clone());
    }
    if let Some(bv) = record.bv {
        attr("bv", bv.to_string());
    }
    if let Some(bs) = record.bs {
        attr("bs", bs.to_string());
    }
    if let Some(n) = &record.n {
        attr("n", n.clone());
    }
    if let Some(u) = &record.u {
        attr("u", u.clone());
    }
    if let Some(v) = record.v {
        attr("v", v.to_string());
    }
    if let Some(vs) = &record.vs {
        attr("vs", vs.clone());
    }
    if let Some(vb) = record.vb {
        attr("vb", vb.to_string());
    }
    if let Some(vd) = &record.vd {
        attr("vd", vd.clone());
    }
    if let Some(s) = record.s {
        attr("s", s.to_string());
    }
    if let Some(t) = record.t {
        attr("t", t.to_string());
    }
    if let Some(ut) = record.ut {
        attr("ut", ut.to_string());
    }

    element
}

/// Deserialize a pack from XML bytes
pub fn decode(bytes: &[u8]) -> Result<SenMLPack> {
    let err = |message: String| SenMLError::decode(Format::Xml, message);

    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut in_root = false;
    let mut pack = SenMLPack::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) if e.local_name().as_ref() == ROOT.as_bytes() => in_root = true,
            Ok(Event::Empty(e)) if e.local_name().as_ref() == ROOT.as_bytes() => in_root = true,
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if in_root && e.local_name().as_ref() == RECORD.as_bytes() =>
            {
                let record = parse_record(&e)
                    .map_err(|message| err(format!("record {}: {message}", pack.len())))?;
                pack.add_record(record);
            }
            Ok(_) => {}
            Err(e) => {
                return Err(err(format!(
                    "at position {}: {e}",
                    reader.buffer_position()
                )));
            }
        }
        buf.clear();
    }

    if !in_root {
        return Err(err(format!("missing <{ROOT}> root element")));
    }

    Ok(pack)
}

fn parse_record(element: &BytesStart<'_>) -> std::result::Result<SenMLRecord, String> {
    let mut record = SenMLRecord::default();

    for attr in element.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = attr.key.local_name();
        let key = std::str::from_utf8(key.as_ref()).map_err(|e| e.to_string())?;
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        set_field(&mut record, key, &value)?;
    }

    Ok(record)
}

fn set_field(record: &mut SenMLRecord, key: &str, value: &str) -> std::result::Result<(), String> {
    let number = |field: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{field}' must be a number, got '{value}'"))
    };

    match key {
        "bver" => {
            record.bver = Some(
                value
                    .trim()
                    .parse()
                    .map_err(|_| format!("'bver' must be an integer, got '{value}'"))?,
            )
        }
        "bn" => record.bn = Some(value.to_string()),
        "bt" => record.bt = Some(number(key)?),
        "bu" => record.bu = Some(value.to_string()),
        "bv" => record.bv = Some(number(key)?),
        "bs" => record.bs = Some(number(key)?),
        "n" => record.n = Some(value.to_string()),
        "u" => record.u = Some(value.to_string()),
        "v" => record.v = Some(number(key)?),
        "vs" => record.vs = Some(value.to_string()),
        "vb" => {
            record.vb = Some(match value.trim() {
                "true" => true,
                "false" => false,
                _ => return Err(format!("'vb' must be true or false, got '{value}'")),
            })
        }
        "vd" => record.vd = Some(value.to_string()),
        "s" => record.s = Some(number(key)?),
        "t" => record.t = Some(number(key)?),
        "ut" => record.ut = Some(number(key)?),
        // xmlns and extension attributes
        _ => {}
    }

    Ok(())
}
