//! Built-in type vocabulary.
//!
//! Every version knows the graph elements and the traversal program types.
//! Version 2 adds typed scalars; version 3 adds typed collections and the
//! extended `gx:` numerics and temporals.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::Number;
use uuid::Uuid;

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::Result;
use crate::path::Segment;
use crate::process::enums::{EnumKind, TraversalEnum};
use crate::process::{
    Binding, Bytecode, Instruction, Lambda, Predicate, Strategy, StrategyDefinition, Traverser,
};
use crate::profile::GraphSONVersion;
use crate::registry::{Matcher, RegistryBuilder};
use crate::structure::{
    DEFAULT_EDGE_LABEL, DEFAULT_VERTEX_LABEL, Edge, Property, Vertex, VertexProperty,
};
use crate::tagged::TaggedValue;
use crate::value::{BigDecimal, GValue, TypeKey, ValueKind};

type Fields = IndexMap<String, TaggedValue>;

pub(crate) fn register_builtins(builder: &mut RegistryBuilder) {
    let version = builder.version();
    if version.is_typed() {
        register_scalars(builder);
    }
    if version >= GraphSONVersion::V3 {
        register_collections(builder);
        register_extended(builder);
    }
    register_structure(builder);
    register_process(builder);
    for definition in StrategyDefinition::builtins() {
        insert_strategy(builder, definition);
    }
}

pub(crate) fn insert_strategy(builder: &mut RegistryBuilder, definition: StrategyDefinition) {
    let definition = Arc::new(definition);
    let key = TypeKey::Strategy(definition.name().to_string());
    let tag = definition.tag();
    let for_encode = Arc::clone(&definition);
    builder.insert(
        Matcher::Exact(key),
        tag,
        move |value, encoder| encode_strategy(&for_encode, value, encoder),
        move |inner, decoder| decode_strategy(&definition, inner, decoder),
    );
}

fn value_key(kind: ValueKind) -> Matcher {
    Matcher::Exact(TypeKey::Value(kind))
}

fn natural(value: &GValue, encoder: &mut Encoder<'_>) -> Result<TaggedValue> {
    encoder.encode_natural(value)
}

// Scalars (v2+)

fn register_scalars(builder: &mut RegistryBuilder) {
    builder.insert(value_key(ValueKind::Int32), "g:Int32".into(), natural, |inner, decoder| {
        let n = integer(decoder, "g:Int32", inner)?;
        i32::try_from(n)
            .map(GValue::Int32)
            .map_err(|_| decoder.mismatch_found("g:Int32", "32-bit integer", n.to_string()))
    });
    builder.insert(value_key(ValueKind::Int64), "g:Int64".into(), natural, |inner, decoder| {
        integer(decoder, "g:Int64", inner).map(GValue::Int64)
    });
    builder.insert(
        value_key(ValueKind::Float),
        "g:Float".into(),
        |value, encoder| match value {
            GValue::Float(f) => Ok(typed_float(f64::from(*f))),
            other => Err(encoder.unsupported(other)),
        },
        |inner, decoder| floating(decoder, "g:Float", inner).map(|f| GValue::Float(f as f32)),
    );
    builder.insert(
        value_key(ValueKind::Double),
        "g:Double".into(),
        |value, encoder| match value {
            GValue::Double(f) => Ok(typed_float(*f)),
            other => Err(encoder.unsupported(other)),
        },
        |inner, decoder| floating(decoder, "g:Double", inner).map(GValue::Double),
    );
    builder.insert(value_key(ValueKind::Uuid), "g:UUID".into(), natural, |inner, decoder| {
        let text = string(decoder, "g:UUID", inner)?;
        Uuid::parse_str(text)
            .map(GValue::Uuid)
            .map_err(|_| decoder.mismatch_found("g:UUID", "UUID string", format!("'{}'", text)))
    });
    builder.insert(value_key(ValueKind::Date), "g:Date".into(), natural, |inner, decoder| {
        epoch_millis(decoder, "g:Date", inner).map(GValue::Date)
    });
    builder.insert(
        value_key(ValueKind::Timestamp),
        "g:Timestamp".into(),
        natural,
        |inner, decoder| epoch_millis(decoder, "g:Timestamp", inner).map(GValue::Timestamp),
    );
}

/// Finite floats stay numbers; the rest use their Java spelling.
fn typed_float(f: f64) -> TaggedValue {
    if f.is_nan() {
        TaggedValue::string("NaN")
    } else if f == f64::INFINITY {
        TaggedValue::string("Infinity")
    } else if f == f64::NEG_INFINITY {
        TaggedValue::string("-Infinity")
    } else {
        TaggedValue::float(f).unwrap_or(TaggedValue::Null)
    }
}

fn integer(decoder: &Decoder<'_>, tag: &str, inner: &TaggedValue) -> Result<i64> {
    inner
        .as_number()
        .and_then(Number::as_i64)
        .ok_or_else(|| decoder.mismatch(tag, "integer", inner))
}

fn floating(decoder: &Decoder<'_>, tag: &str, inner: &TaggedValue) -> Result<f64> {
    match inner {
        TaggedValue::Number(n) => n.as_f64().ok_or_else(|| decoder.mismatch(tag, "number", inner)),
        TaggedValue::String(s) => match s.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            other => Err(decoder.mismatch_found(tag, "number", format!("'{}'", other))),
        },
        other => Err(decoder.mismatch(tag, "number", other)),
    }
}

fn string<'a>(decoder: &Decoder<'_>, tag: &str, inner: &'a TaggedValue) -> Result<&'a str> {
    inner
        .as_str()
        .ok_or_else(|| decoder.mismatch(tag, "string", inner))
}

fn epoch_millis(decoder: &Decoder<'_>, tag: &str, inner: &TaggedValue) -> Result<DateTime<Utc>> {
    let millis = integer(decoder, tag, inner)?;
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        decoder.mismatch_found(tag, "epoch milliseconds in range", millis.to_string())
    })
}

// Collections (v3)

fn register_collections(builder: &mut RegistryBuilder) {
    builder.insert(value_key(ValueKind::List), "g:List".into(), natural, |inner, decoder| {
        let items = sequence(decoder, "g:List", inner)?;
        decoder.decode_sequence(items).map(GValue::List)
    });
    builder.insert(value_key(ValueKind::Set), "g:Set".into(), natural, |inner, decoder| {
        let items = sequence(decoder, "g:Set", inner)?;
        decoder.decode_sequence(items).map(GValue::Set)
    });
    builder.insert(
        value_key(ValueKind::Map),
        "g:Map".into(),
        |value, encoder| {
            let GValue::Map(entries) = value else {
                return Err(encoder.unsupported(value));
            };
            let mut flat = Vec::with_capacity(entries.len() * 2);
            for (index, (key, item)) in entries.iter().enumerate() {
                flat.push(encoder.encode_index(index * 2, key)?);
                flat.push(encoder.encode_index(index * 2 + 1, item)?);
            }
            Ok(TaggedValue::List(flat))
        },
        |inner, decoder| {
            let items = sequence(decoder, "g:Map", inner)?;
            if items.len() % 2 != 0 {
                return Err(decoder.mismatch_found(
                    "g:Map",
                    "even-length sequence of keys and values",
                    format!("sequence of {} items", items.len()),
                ));
            }
            let mut entries = Vec::with_capacity(items.len() / 2);
            for (index, pair) in items.chunks_exact(2).enumerate() {
                let key = decoder.decode_index(index * 2, &pair[0])?;
                let item = decoder.decode_index(index * 2 + 1, &pair[1])?;
                entries.push((key, item));
            }
            Ok(GValue::Map(entries))
        },
    );
}

fn sequence<'a>(
    decoder: &Decoder<'_>,
    tag: &str,
    inner: &'a TaggedValue,
) -> Result<&'a [TaggedValue]> {
    inner
        .as_list()
        .ok_or_else(|| decoder.mismatch(tag, "sequence", inner))
}

fn register_extended(builder: &mut RegistryBuilder) {
    builder.insert(value_key(ValueKind::Byte), "gx:Byte".into(), natural, |inner, decoder| {
        let n = integer(decoder, "gx:Byte", inner)?;
        i8::try_from(n)
            .map(GValue::Byte)
            .map_err(|_| decoder.mismatch_found("gx:Byte", "8-bit integer", n.to_string()))
    });
    builder.insert(value_key(ValueKind::Int16), "gx:Int16".into(), natural, |inner, decoder| {
        let n = integer(decoder, "gx:Int16", inner)?;
        i16::try_from(n)
            .map(GValue::Int16)
            .map_err(|_| decoder.mismatch_found("gx:Int16", "16-bit integer", n.to_string()))
    });
    builder.insert(
        value_key(ValueKind::BigInteger),
        "gx:BigInteger".into(),
        natural,
        |inner, decoder| {
            let text = match inner {
                TaggedValue::Number(n) => n.to_string(),
                TaggedValue::String(s) => s.trim().to_string(),
                other => return Err(decoder.mismatch("gx:BigInteger", "integer", other)),
            };
            text.parse::<i128>()
                .map(GValue::BigInteger)
                .map_err(|_| decoder.mismatch_found("gx:BigInteger", "integer", text))
        },
    );
    builder.insert(
        value_key(ValueKind::BigDecimal),
        "gx:BigDecimal".into(),
        natural,
        |inner, decoder| match inner {
            TaggedValue::Number(n) => Ok(GValue::BigDecimal(BigDecimal::from_number(n))),
            TaggedValue::String(s) => s
                .parse::<BigDecimal>()
                .map(GValue::BigDecimal)
                .map_err(|_| decoder.mismatch_found("gx:BigDecimal", "decimal", format!("'{}'", s))),
            other => Err(decoder.mismatch("gx:BigDecimal", "decimal", other)),
        },
    );
    builder.insert(value_key(ValueKind::Char), "gx:Char".into(), natural, |inner, decoder| {
        let text = string(decoder, "gx:Char", inner)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(GValue::Char(c)),
            _ => Err(decoder.mismatch_found(
                "gx:Char",
                "single character",
                format!("'{}'", text),
            )),
        }
    });
    builder.insert(
        value_key(ValueKind::Instant),
        "gx:Instant".into(),
        |value, encoder| match value {
            GValue::Instant(instant) => Ok(TaggedValue::string(
                instant.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            )),
            other => Err(encoder.unsupported(other)),
        },
        |inner, decoder| {
            let text = string(decoder, "gx:Instant", inner)?;
            DateTime::parse_from_rfc3339(text)
                .map(|instant| GValue::Instant(instant.with_timezone(&Utc)))
                .map_err(|_| {
                    decoder.mismatch_found("gx:Instant", "RFC 3339 timestamp", format!("'{}'", text))
                })
        },
    );
}

// Graph elements

fn fields<'a>(decoder: &Decoder<'_>, tag: &str, inner: &'a TaggedValue) -> Result<&'a Fields> {
    inner
        .as_map()
        .ok_or_else(|| decoder.mismatch(tag, "mapping", inner))
}

fn required<'a>(
    decoder: &Decoder<'_>,
    tag: &str,
    fields: &'a Fields,
    key: &str,
) -> Result<&'a TaggedValue> {
    fields.get(key).ok_or_else(|| {
        decoder.mismatch_found(
            tag,
            &format!("mapping with '{}'", key),
            format!("mapping without '{}'", key),
        )
    })
}

fn decode_required(decoder: &mut Decoder<'_>, tag: &str, fields: &Fields, key: &str) -> Result<GValue> {
    let value = required(decoder, tag, fields, key)?;
    decoder.decode_field(key, value)
}

/// String field, or `default` when absent.
fn label(decoder: &Decoder<'_>, tag: &str, fields: &Fields, key: &str, default: &str) -> Result<String> {
    match fields.get(key) {
        None => Ok(default.to_string()),
        Some(TaggedValue::String(s)) => Ok(s.clone()),
        Some(other) => Err(decoder.mismatch(tag, &format!("string '{}'", key), other)),
    }
}

fn register_structure(builder: &mut RegistryBuilder) {
    builder.insert(
        value_key(ValueKind::Vertex),
        "g:Vertex".into(),
        |value, encoder| {
            let GValue::Vertex(vertex) = value else {
                return Err(encoder.unsupported(value));
            };
            let mut map = Fields::new();
            map.insert("id".into(), encoder.encode_field("id", &vertex.id)?);
            map.insert("label".into(), TaggedValue::string(&vertex.label));
            Ok(TaggedValue::Map(map))
        },
        |inner, decoder| {
            let map = fields(decoder, "g:Vertex", inner)?;
            let id = decode_required(decoder, "g:Vertex", map, "id")?;
            let label = label(decoder, "g:Vertex", map, "label", DEFAULT_VERTEX_LABEL)?;
            Ok(GValue::Vertex(Vertex::new(id, label)))
        },
    );
    builder.insert(
        value_key(ValueKind::Edge),
        "g:Edge".into(),
        |value, encoder| {
            let GValue::Edge(edge) = value else {
                return Err(encoder.unsupported(value));
            };
            let mut map = Fields::new();
            map.insert("id".into(), encoder.encode_field("id", &edge.id)?);
            map.insert("label".into(), TaggedValue::string(&edge.label));
            map.insert("inVLabel".into(), TaggedValue::string(&edge.in_v_label));
            map.insert("outVLabel".into(), TaggedValue::string(&edge.out_v_label));
            map.insert("inV".into(), encoder.encode_field("inV", &edge.in_v)?);
            map.insert("outV".into(), encoder.encode_field("outV", &edge.out_v)?);
            Ok(TaggedValue::Map(map))
        },
        |inner, decoder| {
            let map = fields(decoder, "g:Edge", inner)?;
            let id = decode_required(decoder, "g:Edge", map, "id")?;
            let in_v = decode_required(decoder, "g:Edge", map, "inV")?;
            let out_v = decode_required(decoder, "g:Edge", map, "outV")?;
            Ok(GValue::Edge(Edge {
                id: Box::new(id),
                label: label(decoder, "g:Edge", map, "label", DEFAULT_EDGE_LABEL)?,
                out_v: Box::new(out_v),
                out_v_label: label(decoder, "g:Edge", map, "outVLabel", DEFAULT_VERTEX_LABEL)?,
                in_v: Box::new(in_v),
                in_v_label: label(decoder, "g:Edge", map, "inVLabel", DEFAULT_VERTEX_LABEL)?,
            }))
        },
    );
    builder.insert(
        value_key(ValueKind::VertexProperty),
        "g:VertexProperty".into(),
        |value, encoder| {
            let GValue::VertexProperty(property) = value else {
                return Err(encoder.unsupported(value));
            };
            let mut map = Fields::new();
            map.insert("id".into(), encoder.encode_field("id", &property.id)?);
            map.insert("value".into(), encoder.encode_field("value", &property.value)?);
            map.insert("label".into(), TaggedValue::string(&property.label));
            Ok(TaggedValue::Map(map))
        },
        |inner, decoder| {
            let map = fields(decoder, "g:VertexProperty", inner)?;
            let id = decode_required(decoder, "g:VertexProperty", map, "id")?;
            let value = decode_required(decoder, "g:VertexProperty", map, "value")?;
            let label = match map.get("label") {
                Some(TaggedValue::String(s)) => s.clone(),
                Some(other) => return Err(decoder.mismatch("g:VertexProperty", "string 'label'", other)),
                None => {
                    return Err(decoder.mismatch_found(
                        "g:VertexProperty",
                        "mapping with 'label'",
                        "mapping without 'label'",
                    ));
                }
            };
            Ok(GValue::VertexProperty(VertexProperty::new(id, label, value)))
        },
    );
    builder.insert(
        value_key(ValueKind::Property),
        "g:Property".into(),
        |value, encoder| {
            let GValue::Property(property) = value else {
                return Err(encoder.unsupported(value));
            };
            let mut map = Fields::new();
            map.insert("key".into(), TaggedValue::string(&property.key));
            map.insert("value".into(), encoder.encode_field("value", &property.value)?);
            Ok(TaggedValue::Map(map))
        },
        |inner, decoder| {
            let map = fields(decoder, "g:Property", inner)?;
            let key = string(decoder, "g:Property", required(decoder, "g:Property", map, "key")?)?
                .to_string();
            let value = decode_required(decoder, "g:Property", map, "value")?;
            Ok(GValue::Property(Property::new(key, value)))
        },
    );
}

// Traversal program objects

const SOURCE: &str = "source";
const STEP: &str = "step";

fn register_process(builder: &mut RegistryBuilder) {
    builder.insert(
        value_key(ValueKind::Bytecode),
        "g:Bytecode".into(),
        encode_bytecode,
        decode_bytecode,
    );
    builder.insert(
        value_key(ValueKind::P),
        "g:P".into(),
        |value, encoder| match value {
            GValue::P(predicate) => encode_predicate(predicate, encoder),
            other => Err(encoder.unsupported(other)),
        },
        |inner, decoder| decode_predicate("g:P", inner, decoder).map(GValue::P),
    );
    builder.insert(
        value_key(ValueKind::TextP),
        "g:TextP".into(),
        |value, encoder| match value {
            GValue::TextP(predicate) => encode_predicate(predicate, encoder),
            other => Err(encoder.unsupported(other)),
        },
        |inner, decoder| decode_predicate("g:TextP", inner, decoder).map(GValue::TextP),
    );
    for kind in EnumKind::ALL {
        builder.insert(
            Matcher::Exact(TypeKey::Enum(kind)),
            kind.tag().to_string(),
            |value, encoder| match value {
                GValue::Enum(literal) => Ok(TaggedValue::string(literal.value())),
                other => Err(encoder.unsupported(other)),
            },
            move |inner, decoder| {
                let text = string(decoder, kind.tag(), inner)?;
                TraversalEnum::new(kind, text)
                    .map(GValue::Enum)
                    .ok_or_else(|| {
                        decoder.mismatch_found(
                            kind.tag(),
                            &format!("one of {}", kind.literals().join(", ")),
                            format!("'{}'", text),
                        )
                    })
            },
        );
    }
    builder.insert(
        value_key(ValueKind::Binding),
        "g:Binding".into(),
        |value, encoder| {
            let GValue::Binding(binding) = value else {
                return Err(encoder.unsupported(value));
            };
            let mut map = Fields::new();
            map.insert("key".into(), TaggedValue::string(&binding.key));
            map.insert("value".into(), encoder.encode_field("value", &binding.value)?);
            Ok(TaggedValue::Map(map))
        },
        |inner, decoder| {
            let map = fields(decoder, "g:Binding", inner)?;
            let key = string(decoder, "g:Binding", required(decoder, "g:Binding", map, "key")?)?
                .to_string();
            let value = decode_required(decoder, "g:Binding", map, "value")?;
            Ok(GValue::Binding(Binding::new(key, value)))
        },
    );
    builder.insert(
        value_key(ValueKind::Lambda),
        "g:Lambda".into(),
        |value, encoder| {
            let GValue::Lambda(lambda) = value else {
                return Err(encoder.unsupported(value));
            };
            let mut map = Fields::new();
            map.insert("script".into(), TaggedValue::string(&lambda.script));
            map.insert("language".into(), TaggedValue::string(&lambda.language));
            map.insert("arguments".into(), TaggedValue::int(i64::from(lambda.arguments)));
            Ok(TaggedValue::Map(map))
        },
        |inner, decoder| {
            let map = fields(decoder, "g:Lambda", inner)?;
            let script = string(decoder, "g:Lambda", required(decoder, "g:Lambda", map, "script")?)?;
            let mut lambda = Lambda::new(script);
            if let Some(language) = map.get("language") {
                lambda = lambda.with_language(string(decoder, "g:Lambda", language)?);
            }
            if let Some(arguments) = map.get("arguments") {
                let n = integer(decoder, "g:Lambda", arguments)?;
                let n = i32::try_from(n).map_err(|_| {
                    decoder.mismatch_found("g:Lambda", "32-bit argument count", n.to_string())
                })?;
                lambda = lambda.with_arguments(n);
            }
            Ok(GValue::Lambda(lambda))
        },
    );
    builder.insert(
        value_key(ValueKind::Traverser),
        "g:Traverser".into(),
        |value, encoder| {
            let GValue::Traverser(traverser) = value else {
                return Err(encoder.unsupported(value));
            };
            let mut map = Fields::new();
            map.insert(
                "bulk".into(),
                encoder.encode_field("bulk", &GValue::Int64(traverser.bulk))?,
            );
            map.insert("value".into(), encoder.encode_field("value", &traverser.value)?);
            Ok(TaggedValue::Map(map))
        },
        |inner, decoder| {
            let map = fields(decoder, "g:Traverser", inner)?;
            let bulk = decode_required(decoder, "g:Traverser", map, "bulk")?;
            let bulk = bulk.as_i64().ok_or_else(|| {
                decoder.mismatch_found("g:Traverser", "integer 'bulk'", bulk.type_name())
            })?;
            let value = decode_required(decoder, "g:Traverser", map, "value")?;
            Ok(GValue::Traverser(Traverser::new(value, bulk)))
        },
    );
}

fn encode_bytecode(value: &GValue, encoder: &mut Encoder<'_>) -> Result<TaggedValue> {
    let GValue::Bytecode(bytecode) = value else {
        return Err(encoder.unsupported(value));
    };
    let mut map = Fields::new();
    for (key, instructions) in [
        (SOURCE, bytecode.source_instructions()),
        (STEP, bytecode.step_instructions()),
    ] {
        if instructions.is_empty() {
            continue;
        }
        let encoded = encoder.scoped(Segment::Key(key.to_string()), |encoder| {
            encode_instructions(instructions, encoder)
        })?;
        map.insert(key.to_string(), encoded);
    }
    Ok(TaggedValue::Map(map))
}

/// Each instruction becomes `[operator, arg1, arg2, ...]`.
fn encode_instructions(
    instructions: &[Instruction],
    encoder: &mut Encoder<'_>,
) -> Result<TaggedValue> {
    let mut list = Vec::with_capacity(instructions.len());
    for (index, instruction) in instructions.iter().enumerate() {
        let row = encoder.scoped(Segment::Index(index), |encoder| {
            let mut row = Vec::with_capacity(instruction.arguments().len() + 1);
            row.push(TaggedValue::string(instruction.operator()));
            for (position, argument) in instruction.arguments().iter().enumerate() {
                row.push(encoder.encode_index(position + 1, argument)?);
            }
            Ok(TaggedValue::List(row))
        })?;
        list.push(row);
    }
    Ok(TaggedValue::List(list))
}

fn decode_bytecode(inner: &TaggedValue, decoder: &mut Decoder<'_>) -> Result<GValue> {
    let map = fields(decoder, "g:Bytecode", inner)?;
    let mut bytecode = Bytecode::new();
    for (key, value) in map {
        let is_source = match key.as_str() {
            SOURCE => true,
            STEP => false,
            other => {
                return Err(decoder.mismatch_found(
                    "g:Bytecode",
                    "mapping with only 'source' and 'step'",
                    format!("key '{}'", other),
                ));
            }
        };
        let instructions = decoder.scoped(Segment::Key(key.clone()), |decoder| {
            decode_instructions(value, decoder)
        })?;
        for (operator, arguments) in instructions {
            if is_source {
                bytecode.add_source(operator, arguments);
            } else {
                bytecode.add_step(operator, arguments);
            }
        }
    }
    Ok(GValue::Bytecode(bytecode))
}

fn decode_instructions(
    value: &TaggedValue,
    decoder: &mut Decoder<'_>,
) -> Result<Vec<(String, Vec<GValue>)>> {
    let rows = sequence(decoder, "g:Bytecode", value)?;
    let mut instructions = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let instruction = decoder.scoped(Segment::Index(index), |decoder| {
            let items = sequence(decoder, "g:Bytecode", row)?;
            let Some((operator, arguments)) = items.split_first() else {
                return Err(decoder.mismatch_found(
                    "g:Bytecode",
                    "instruction with an operator name",
                    "empty sequence",
                ));
            };
            let operator = operator
                .as_str()
                .ok_or_else(|| decoder.mismatch("g:Bytecode", "operator name string", operator))?;
            let mut decoded = Vec::with_capacity(arguments.len());
            for (position, argument) in arguments.iter().enumerate() {
                decoded.push(decoder.decode_index(position + 1, argument)?);
            }
            Ok((operator.to_string(), decoded))
        })?;
        instructions.push(instruction);
    }
    Ok(instructions)
}

fn encode_predicate(predicate: &Predicate, encoder: &mut Encoder<'_>) -> Result<TaggedValue> {
    let mut map = Fields::new();
    map.insert("predicate".into(), TaggedValue::string(predicate.operator()));
    // Connective operands are always a plain sequence of predicates.
    let value = match predicate.value() {
        GValue::List(operands) if predicate.is_connective() => encoder
            .scoped(Segment::Key("value".to_string()), |encoder| {
                encoder.encode_sequence(operands)
            })?,
        other => encoder.encode_field("value", other)?,
    };
    map.insert("value".into(), value);
    Ok(TaggedValue::Map(map))
}

fn decode_predicate(tag: &str, inner: &TaggedValue, decoder: &mut Decoder<'_>) -> Result<Predicate> {
    let map = fields(decoder, tag, inner)?;
    let operator = string(decoder, tag, required(decoder, tag, map, "predicate")?)?.to_string();
    let value = decode_required(decoder, tag, map, "value")?;
    Ok(Predicate::new(operator, value))
}

// Strategies

fn encode_strategy(
    definition: &StrategyDefinition,
    value: &GValue,
    encoder: &mut Encoder<'_>,
) -> Result<TaggedValue> {
    let GValue::Strategy(strategy) = value else {
        return Err(encoder.unsupported(value));
    };
    let mut map = Fields::new();
    for (key, item) in strategy.configuration() {
        if !definition.accepts(key) {
            return Err(encoder.unsupported_type(format!(
                "{} configuration key '{}'",
                definition.name(),
                key
            )));
        }
        if item.is_null() || definition.is_default(key, item) {
            continue;
        }
        map.insert(key.clone(), encoder.encode_field(key, item)?);
    }
    Ok(TaggedValue::Map(map))
}

fn decode_strategy(
    definition: &StrategyDefinition,
    inner: &TaggedValue,
    decoder: &mut Decoder<'_>,
) -> Result<GValue> {
    let tag = definition.tag();
    let map = fields(decoder, &tag, inner)?;
    let mut strategy = Strategy::new(definition.name());
    for (key, item) in map {
        if !definition.accepts(key) {
            decoder.scoped(Segment::Key(key.clone()), |decoder| {
                decoder.unknown_config_key(definition.name(), key)
            })?;
            continue;
        }
        let value = decoder.decode_field(key, item)?;
        strategy.set(key.clone(), value);
    }
    Ok(GValue::Strategy(strategy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;

    fn encode_json(version: GraphSONVersion, value: &GValue) -> String {
        let registry = TypeRegistry::for_version(version);
        Encoder::new(&registry).encode(value).unwrap().to_string()
    }

    fn round_trip(version: GraphSONVersion, value: &GValue) -> GValue {
        let registry = TypeRegistry::for_version(version);
        let tagged = Encoder::new(&registry).encode(value).unwrap();
        Decoder::new(&registry).decode(&tagged).unwrap()
    }

    #[test]
    fn test_vertex_wire_form() {
        let vertex = GValue::Vertex(Vertex::new(1, "person"));
        assert_eq!(
            encode_json(GraphSONVersion::V3, &vertex),
            r#"{"@type":"g:Vertex","@value":{"id":{"@type":"g:Int32","@value":1},"label":"person"}}"#
        );
        assert_eq!(encode_json(GraphSONVersion::V1, &vertex), r#"{"id":1,"label":"person"}"#);
    }

    #[test]
    fn test_edge_round_trip() {
        let marko = Vertex::new(1, "person");
        let lop = Vertex::new(3, "software");
        let edge = GValue::Edge(Edge::new(9, "created", &marko, &lop));
        assert_eq!(round_trip(GraphSONVersion::V2, &edge), edge);
    }

    #[test]
    fn test_enum_literal_is_validated() {
        let registry = TypeRegistry::for_version(GraphSONVersion::V3);
        let err = Decoder::new(&registry)
            .decode(&TaggedValue::tagged("g:Direction", TaggedValue::string("UP")))
            .unwrap_err();
        assert!(matches!(err, crate::Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_connective_operands_are_plain_sequence() {
        let p = GValue::P(Predicate::gt(1).and(Predicate::lt(5)));
        let json = encode_json(GraphSONVersion::V3, &p);
        assert!(json.starts_with(r#"{"@type":"g:P","@value":{"predicate":"and","value":[{"@type":"g:P""#));
        assert_eq!(round_trip(GraphSONVersion::V3, &p), p);
    }

    #[test]
    fn test_typed_map_with_non_string_keys() {
        let map = GValue::map([(1, "one"), (2, "two")]);
        assert_eq!(
            encode_json(GraphSONVersion::V3, &map),
            r#"{"@type":"g:Map","@value":[{"@type":"g:Int32","@value":1},"one",{"@type":"g:Int32","@value":2},"two"]}"#
        );
        assert_eq!(round_trip(GraphSONVersion::V3, &map), map);
    }

    #[test]
    fn test_odd_map_is_mismatch() {
        let registry = TypeRegistry::for_version(GraphSONVersion::V3);
        let inner = TaggedValue::List(vec![TaggedValue::string("k")]);
        let err = Decoder::new(&registry).decode_as("g:Map", &inner).unwrap_err();
        assert!(matches!(err, crate::Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_lambda_and_traverser_round_trip() {
        let lambda = GValue::Lambda(Lambda::new("it.get()").with_arguments(1));
        let traverser = GValue::Traverser(Traverser::new("marko", 3));
        assert_eq!(round_trip(GraphSONVersion::V2, &lambda), lambda);
        assert_eq!(round_trip(GraphSONVersion::V3, &traverser), traverser);
    }

    #[test]
    fn test_strategy_defaults_are_omitted() {
        let strategy = GValue::Strategy(
            Strategy::subgraph()
                .with("checkAdjacentVertices", true)
                .with("edges", GValue::Null),
        );
        assert_eq!(
            encode_json(GraphSONVersion::V3, &strategy),
            r#"{"@type":"g:SubgraphStrategy","@value":{}}"#
        );
    }
}
