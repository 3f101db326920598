use std::io::{IsTerminal, Write};

use bytes::BytesMut;
use oscwire_message::{tags, OscMessage};

use crate::cmd::BuildArgs;
use crate::exit::{io_error, usage_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{hex, OutputFormat};

#[derive(Debug, Clone, PartialEq)]
enum ArgSpec {
    Int32(i32),
    Float32(f32),
    Int64(i64),
    Float64(f64),
    Str(String),
    Blob(Vec<u8>),
    True,
    False,
    Nil,
    Infinitum,
}

impl ArgSpec {
    fn tag(&self) -> u8 {
        match self {
            ArgSpec::Int32(_) => tags::INT32,
            ArgSpec::Float32(_) => tags::FLOAT32,
            ArgSpec::Int64(_) => tags::INT64,
            ArgSpec::Float64(_) => tags::FLOAT64,
            ArgSpec::Str(_) => tags::STRING,
            ArgSpec::Blob(_) => tags::BLOB,
            ArgSpec::True => tags::TRUE,
            ArgSpec::False => tags::FALSE,
            ArgSpec::Nil => tags::NIL,
            ArgSpec::Infinitum => tags::INFINITUM,
        }
    }

    /// Bytes this argument occupies on the wire (a blob counts its prefix).
    fn wire_size(&self) -> usize {
        match self {
            ArgSpec::Int32(_) | ArgSpec::Float32(_) => 4,
            ArgSpec::Int64(_) | ArgSpec::Float64(_) => 8,
            ArgSpec::Str(s) => tags::padded_string_length(s.len()),
            ArgSpec::Blob(b) => 4 + b.len(),
            _ => 0,
        }
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>, String> {
    if s.len() % 2 != 0 {
        return Err(format!("hex blob has odd length {}", s.len()));
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|_| format!("invalid hex byte {:?}", &s[i..i + 2]))
        })
        .collect()
}

fn parse_spec(spec: &str) -> Result<ArgSpec, String> {
    match spec {
        "T" => return Ok(ArgSpec::True),
        "F" => return Ok(ArgSpec::False),
        "N" => return Ok(ArgSpec::Nil),
        "I" => return Ok(ArgSpec::Infinitum),
        _ => {}
    }
    let (kind, value) = spec
        .split_once(':')
        .ok_or_else(|| format!("malformed argument {spec:?} (expected TAG:VALUE or T/F/N/I)"))?;
    match kind {
        "i" => value
            .parse::<i32>()
            .map(ArgSpec::Int32)
            .map_err(|err| format!("invalid int32 {value:?}: {err}")),
        "f" => value
            .parse::<f32>()
            .map(ArgSpec::Float32)
            .map_err(|err| format!("invalid float32 {value:?}: {err}")),
        "h" => value
            .parse::<i64>()
            .map(ArgSpec::Int64)
            .map_err(|err| format!("invalid int64 {value:?}: {err}")),
        "d" => value
            .parse::<f64>()
            .map(ArgSpec::Float64)
            .map_err(|err| format!("invalid float64 {value:?}: {err}")),
        "s" => Ok(ArgSpec::Str(value.to_string())),
        "b" => decode_hex(value).map(ArgSpec::Blob),
        other => Err(format!("unsupported argument tag {other:?}")),
    }
}

pub fn run(args: BuildArgs, _format: OutputFormat) -> CliResult<i32> {
    if !args.address.starts_with('/') {
        return Err(usage_error(format!(
            "address {:?} must begin with '/'",
            args.address
        )));
    }
    let specs = args
        .args
        .iter()
        .map(|spec| parse_spec(spec))
        .collect::<Result<Vec<_>, _>>()
        .map_err(usage_error)?;

    // Following arguments would land inside the blob payload: the view
    // advances past a blob by its payload size only, not prefix + payload.
    if let Some(pos) = specs.iter().position(|s| matches!(s, ArgSpec::Blob(_))) {
        if pos + 1 < specs.len() {
            return Err(usage_error("a blob must be the last argument"));
        }
    }

    let mut type_tags = String::from(",");
    type_tags.extend(specs.iter().map(|spec| spec.tag() as char));

    let required = tags::padded_string_length(args.address.len())
        + tags::padded_string_length(type_tags.len())
        + specs.iter().map(ArgSpec::wire_size).sum::<usize>();
    if required > args.capacity {
        return Err(CliError::new(
            DATA_INVALID,
            format!(
                "packet needs {required} bytes but capacity is {}",
                args.capacity
            ),
        ));
    }

    let mut storage = BytesMut::zeroed(args.capacity);
    let mut msg = OscMessage::new(&mut storage[..]);
    msg.set_prefix(&args.address, &type_tags);
    for (index, spec) in specs.iter().enumerate() {
        match spec {
            ArgSpec::Int32(v) => msg.set_int32(index, *v),
            ArgSpec::Float32(v) => msg.set_float32(index, *v),
            ArgSpec::Int64(v) => msg.set_int64(index, *v),
            ArgSpec::Float64(v) => msg.set_float64(index, *v),
            ArgSpec::Str(v) => msg.set_string(index, v),
            ArgSpec::Blob(v) => {
                let mut payload = Vec::with_capacity(4 + v.len());
                payload.extend_from_slice(&(v.len() as u32).to_be_bytes());
                payload.extend_from_slice(v);
                msg.set_data(index, &payload);
            }
            ArgSpec::True => msg.set_bool(index, true),
            ArgSpec::False => msg.set_bool(index, false),
            ArgSpec::Nil | ArgSpec::Infinitum => {}
        }
    }

    storage.truncate(required);
    tracing::debug!(bytes = storage.len(), address = %args.address, "assembled packet");

    match &args.out {
        Some(path) => {
            std::fs::write(path, &storage).map_err(|err| io_error("write packet file", err))?;
            println!("wrote {} bytes to {}", storage.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout();
            if stdout.is_terminal() {
                println!("{}", hex(&storage));
            } else {
                stdout
                    .write_all(&storage)
                    .map_err(|err| io_error("write stdout", err))?;
            }
        }
    }
    Ok(SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typed_specs() {
        assert_eq!(parse_spec("i:42"), Ok(ArgSpec::Int32(42)));
        assert_eq!(parse_spec("f:440.0"), Ok(ArgSpec::Float32(440.0)));
        assert_eq!(parse_spec("h:-9"), Ok(ArgSpec::Int64(-9)));
        assert_eq!(parse_spec("d:0.5"), Ok(ArgSpec::Float64(0.5)));
        assert_eq!(parse_spec("s:hello"), Ok(ArgSpec::Str("hello".into())));
        assert_eq!(parse_spec("b:00ff"), Ok(ArgSpec::Blob(vec![0x00, 0xff])));
        assert_eq!(parse_spec("T"), Ok(ArgSpec::True));
        assert_eq!(parse_spec("F"), Ok(ArgSpec::False));
        assert_eq!(parse_spec("N"), Ok(ArgSpec::Nil));
        assert_eq!(parse_spec("I"), Ok(ArgSpec::Infinitum));
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!(parse_spec("x:1").is_err());
        assert!(parse_spec("i:notanumber").is_err());
        assert!(parse_spec("b:0f0").is_err());
        assert!(parse_spec("b:zz").is_err());
        assert!(parse_spec("bare").is_err());
    }

    #[test]
    fn wire_sizes_follow_the_tag_table() {
        assert_eq!(ArgSpec::Int32(1).wire_size(), 4);
        assert_eq!(ArgSpec::Float64(1.0).wire_size(), 8);
        assert_eq!(ArgSpec::Str("abc".into()).wire_size(), 4);
        assert_eq!(ArgSpec::Str("abcd".into()).wire_size(), 8);
        assert_eq!(ArgSpec::Blob(vec![0; 5]).wire_size(), 9);
        assert_eq!(ArgSpec::True.wire_size(), 0);
    }
}
