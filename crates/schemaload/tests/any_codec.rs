// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Envelope decode/encode through bundles loaded on demand.

mod common;

use common::{scenario_a, scenario_b, CountingCompiler};
use schemaload::definition::{FileBuilder, MessageBuilder, ScalarType};
use schemaload::dynamic::DynamicValue;
use schemaload::type_url::add_type_url_prefix;
use schemaload::{AnyCodec, DescriptorBundle, DynamicMessage, Envelope, LoadError, SchemaLoader};
use std::sync::Arc;

#[test]
fn test_scenario_a_round_trip() {
    let bundle = scenario_a();
    let loader = SchemaLoader::new();
    let binding = loader.load_module("a.b_generated", &bundle).expect("load");
    let foo = binding.message("pkg.Foo").expect("pkg.Foo");
    assert!(foo.field("x").is_some());

    let mut msg = DynamicMessage::new(foo);
    msg.set("x", 5i32).expect("set x");

    let codec = AnyCodec::new(loader);
    let bytes = codec
        .encode(Some(&msg), "pkg.Foo")
        .expect("encode")
        .expect("some bytes");
    let envelope = Envelope::from_bytes(&bytes).expect("envelope");
    assert_eq!(envelope.type_url, add_type_url_prefix("pkg.Foo"));

    let decoded = codec.decode(&envelope, &bundle).expect("decode");
    assert_eq!(decoded, msg);
    assert_eq!(decoded.get::<i32>("x").expect("x"), 5);
}

#[test]
fn test_scenario_b_nested_type_is_usable() {
    let bundle = scenario_b();
    let probe = CountingCompiler::new();
    let loader = SchemaLoader::new().with_compiler(probe.clone());

    let main = loader.load_file("main.schema", &bundle).expect("load");
    assert_eq!(probe.count("dep.schema"), 1);
    assert_eq!(
        loader.registry().paths(),
        vec!["dep.schema".to_string(), "main.schema".to_string()]
    );

    let main_type = main.message("pkg.Main").expect("pkg.Main");
    let base_type = loader.registry().find_type("pkg.Base").expect("pkg.Base");

    let mut msg = DynamicMessage::new(main_type);
    let mut base = msg.message_field("base").expect("base");
    assert!(Arc::ptr_eq(base.descriptor(), &base_type));
    base.set("id", 7u32).expect("id");
    base.set("label", "seven").expect("label");
    msg.set_message("base", base).expect("store base");
    msg.set("weights", vec![DynamicValue::F64(0.5)])
        .expect("weights");

    let codec = AnyCodec::new(loader);
    let bytes = codec
        .encode(Some(&msg), "pkg.Main")
        .expect("encode")
        .expect("bytes");
    let decoded = codec.decode_bytes(&bytes, &bundle).expect("decode");
    assert_eq!(decoded, msg);
    let label: String = decoded
        .message_field("base")
        .and_then(|b| b.get("label"))
        .expect("label");
    assert_eq!(label, "seven");
    assert_eq!(probe.count("dep.schema"), 1);
    assert_eq!(probe.count("main.schema"), 1);
}

#[test]
fn test_decode_loads_the_declaring_file_lazily() {
    let bundle = scenario_b();
    let writer = SchemaLoader::new();
    let binding = writer.load_file("main.schema", &bundle).expect("writer");
    let msg = DynamicMessage::new(binding.message("pkg.Main").expect("main"));
    let bytes = AnyCodec::new(writer)
        .encode(Some(&msg), "pkg.Main")
        .expect("encode")
        .expect("bytes");

    let reader = AnyCodec::new(SchemaLoader::new());
    assert!(reader.loader().registry().is_empty());
    let decoded = reader.decode_bytes(&bytes, &bundle).expect("decode");
    assert_eq!(decoded, msg);
    assert_eq!(reader.loader().registry().len(), 2);
}

#[test]
fn test_decode_of_unknown_or_nested_type_fails() {
    let bundle = DescriptorBundle::from_files(vec![FileBuilder::new("n.schema", "pkg")
        .message(
            MessageBuilder::new("Outer")
                .nested_message(MessageBuilder::new("Inner").field("v", ScalarType::Bool)),
        )
        .build()
        .expect("build")]);
    let codec = AnyCodec::new(SchemaLoader::new());

    for name in ["pkg.Missing", "pkg.Outer.Inner"] {
        let envelope = Envelope::new(add_type_url_prefix(name), Vec::new());
        match codec.decode(&envelope, &bundle) {
            Err(LoadError::SymbolNotFound { name: reported }) => assert_eq!(reported, name),
            other => panic!("unexpected result for {}: {:?}", name, other),
        }
    }
}

#[test]
fn test_encode_nothing_is_distinct_from_empty_payload() {
    let bundle = DescriptorBundle::from_files(vec![FileBuilder::new("e.schema", "pkg")
        .message(MessageBuilder::new("Empty"))
        .build()
        .expect("build")]);
    let loader = SchemaLoader::new();
    let binding = loader.load_file("e.schema", &bundle).expect("load");
    let codec = AnyCodec::new(loader);

    assert_eq!(codec.encode(None, "pkg.Empty").expect("none"), None);

    let empty = DynamicMessage::new(binding.message("pkg.Empty").expect("empty"));
    let bytes = codec
        .encode(Some(&empty), "pkg.Empty")
        .expect("encode")
        .expect("some");
    let envelope = Envelope::from_bytes(&bytes).expect("envelope");
    assert!(envelope.payload.is_empty());
    assert_eq!(envelope.type_name(), "pkg.Empty");
}

#[test]
fn test_encode_wrong_type_is_a_mismatch() {
    let loader = SchemaLoader::new();
    let binding = loader.load_module("a.b_generated", &scenario_a()).expect("load");
    let msg = DynamicMessage::new(binding.message("pkg.Foo").expect("foo"));
    let codec = AnyCodec::new(loader);

    match codec.encode(Some(&msg), "pkg.Bar") {
        Err(LoadError::TypeMismatch { expected, actual }) => {
            assert_eq!(expected, "pkg.Bar");
            assert_eq!(actual, "pkg.Foo");
        }
        other => panic!("unexpected: {:?}", other),
    }
}
