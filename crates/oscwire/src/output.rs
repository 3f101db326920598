use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use oscwire_message::{tags, OscArg, OscMessage};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    address: &'a str,
    type_tags: &'a str,
    length: usize,
    args: Vec<ArgOutput>,
}

#[derive(Serialize)]
struct ArgOutput {
    index: usize,
    tag: char,
    r#type: &'static str,
    value: Value,
}

pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn float_value(v: f64) -> Value {
    serde_json::Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn arg_value(arg: &OscArg<'_>) -> Value {
    match arg {
        OscArg::Int32(v) => json!(v),
        OscArg::Float32(v) => float_value(*v as f64),
        OscArg::Int64(v) => json!(v),
        OscArg::Float64(v) => float_value(*v),
        OscArg::Str(s) | OscArg::Symbol(s) => json!(s),
        OscArg::Blob(b) => json!(hex(b)),
        OscArg::Char(c) => json!((*c as char).to_string()),
        OscArg::Rgba(b) | OscArg::Midi(b) => json!(b.to_vec()),
        OscArg::True => json!(true),
        OscArg::False => json!(false),
        OscArg::Nil => Value::Null,
        OscArg::Infinitum => json!("infinitum"),
        OscArg::Unknown(_) => Value::Null,
    }
}

/// Best-effort decode through the unchecked accessors, for `--lenient`.
fn lenient_value<B: AsRef<[u8]>>(msg: &OscMessage<B>, index: usize, tag: u8) -> Value {
    match tag {
        tags::INT32 => json!(msg.int32(index)),
        tags::FLOAT32 => float_value(msg.float32(index) as f64),
        tags::INT64 => json!(msg.int64(index)),
        tags::FLOAT64 => float_value(msg.float64(index)),
        tags::STRING | tags::SYMBOL => json!(msg.string(index)),
        tags::BLOB => json!(hex(msg.blob(index))),
        tags::TRUE => json!(true),
        tags::FALSE => json!(false),
        tags::INFINITUM => json!("infinitum"),
        _ => Value::Null,
    }
}

fn collect_args<B: AsRef<[u8]>>(
    msg: &OscMessage<B>,
    lenient: bool,
) -> oscwire_message::Result<Vec<ArgOutput>> {
    let mut rows = Vec::with_capacity(msg.arg_count());
    for index in 0..msg.arg_count() {
        let tag = msg.data_type(index);
        let value = if lenient {
            lenient_value(msg, index, tag)
        } else {
            arg_value(&msg.arg(index)?)
        };
        rows.push(ArgOutput {
            index,
            tag: tag as char,
            r#type: tags::tag_name(tag),
            value,
        });
    }
    Ok(rows)
}

pub fn print_message<B: AsRef<[u8]>>(
    msg: &OscMessage<B>,
    lenient: bool,
    format: OutputFormat,
) -> oscwire_message::Result<()> {
    let args = collect_args(msg, lenient)?;
    match format {
        OutputFormat::Json => {
            let out = MessageOutput {
                address: msg.address(),
                type_tags: msg.type_tags(),
                length: msg.message_length(),
                args,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            println!("address: {}", msg.address());
            println!("type tags: {}", msg.type_tags());
            println!("length: {}", msg.message_length());
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["INDEX", "TAG", "TYPE", "VALUE"]);
            for row in &args {
                table.add_row(vec![
                    row.index.to_string(),
                    row.tag.to_string(),
                    row.r#type.to_string(),
                    row.value.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "address={} tags={} length={}",
                msg.address(),
                msg.type_tags(),
                msg.message_length()
            );
            for row in &args {
                println!("  [{}] {}: {}", row.index, row.r#type, row.value);
            }
        }
    }
    Ok(())
}
