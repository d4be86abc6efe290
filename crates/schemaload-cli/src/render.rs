// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Human and JSON renderings of bundles, bindings and decoded messages.

use schemaload::dynamic::TypeKind;
use schemaload::{DescriptorBundle, DynamicMessage, DynamicValue, FileBinding, TypeDescriptor};
use serde_json::{Map, Number, Value};
use std::fmt::Write;

/// Convert a decoded message into JSON, tagged with its type name.
pub fn message_to_json(message: &DynamicMessage) -> Value {
    let mut object = Map::new();
    object.insert("@type".into(), Value::String(message.type_name().to_string()));
    for (name, value) in message.fields() {
        object.insert(name.to_string(), value_to_json(value));
    }
    Value::Object(object)
}

/// Convert one dynamic value into JSON.
///
/// Bytes render as lowercase hex, enums as their variant name.
pub fn value_to_json(value: &DynamicValue) -> Value {
    match value {
        DynamicValue::Bool(v) => Value::Bool(*v),
        DynamicValue::I32(v) => Value::from(*v),
        DynamicValue::I64(v) => Value::from(*v),
        DynamicValue::U32(v) => Value::from(*v),
        DynamicValue::U64(v) => Value::from(*v),
        DynamicValue::F32(v) => float(f64::from(*v)),
        DynamicValue::F64(v) => float(*v),
        DynamicValue::String(s) => Value::String(s.clone()),
        DynamicValue::Bytes(b) => Value::String(b.iter().map(|x| format!("{:02x}", x)).collect()),
        DynamicValue::Message(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
        DynamicValue::Sequence(items) => Value::Array(items.iter().map(value_to_json).collect()),
        DynamicValue::Enum(_, name) => Value::String(name.clone()),
        DynamicValue::Null => Value::Null,
    }
}

// NaN and infinities have no JSON form.
fn float(v: f64) -> Value {
    Number::from_f64(v).map_or(Value::Null, Value::Number)
}

/// One line per file: path, package, symbols and imports.
pub fn describe_bundle(bundle: &DescriptorBundle) -> String {
    let mut out = String::new();
    for file in bundle {
        let _ = writeln!(out, "{} (package {:?})", file.name, file.package);
        for (full_name, decl) in file.qualified_symbols() {
            let _ = writeln!(out, "  {:<9} {}", format!("{:?}", decl.kind).to_lowercase(), full_name);
        }
        for dep in &file.dependencies {
            let _ = writeln!(out, "  import    {}", dep);
        }
    }
    out
}

/// Registered file with its synthesized types.
pub fn describe_binding(binding: &FileBinding) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (package {:?})", binding.path(), binding.package());
    for dep in binding.dependencies() {
        let _ = writeln!(out, "  import {}", dep);
    }
    for desc in binding.types() {
        describe_type(&mut out, desc);
    }
    for service in binding.services() {
        let _ = writeln!(out, "  service {}", service.name);
        for method in &service.methods {
            let _ = writeln!(
                out,
                "    rpc {}({}) -> {}",
                method.name, method.input_type, method.output_type
            );
        }
    }
    for ext in binding.extensions() {
        let _ = writeln!(out, "  extend {} {{ {} = {} }}", ext.extendee, ext.field.name, ext.field.number);
    }
    out
}

fn describe_type(out: &mut String, desc: &TypeDescriptor) {
    match &desc.kind {
        TypeKind::Message(fields) => {
            let _ = writeln!(out, "  message {}", desc.name);
            for field in fields {
                let _ = writeln!(
                    out,
                    "    {:>3} {}: {}{}",
                    field.number,
                    field.name,
                    field.type_desc.name,
                    if field.optional { " (optional)" } else { "" }
                );
            }
        }
        TypeKind::Enum(e) => {
            let _ = writeln!(out, "  enum {}", desc.name);
            for variant in &e.variants {
                let _ = writeln!(out, "    {} = {}", variant.name, variant.value);
            }
        }
        TypeKind::Primitive(_) | TypeKind::Sequence(_) => {}
    }
}
