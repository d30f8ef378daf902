//! Simple decoder to inspect container-wire files.
//!
//! Usage: `cargo run --example inspect -- <file> [--text]`
//!
//! The file may hold a message (header container first) or a bare run of
//! values. Without a file argument a sample message is built and inspected.

use std::fs;

use container_wire::codec::{decode_values, message_to_text, value_to_text};
use container_wire::{decode_message, encode_message, Message, Payload, Value, ValueKind};

fn format_payload(v: &Value) -> String {
    match v.payload() {
        Payload::Null => "null".to_string(),
        Payload::Bool(b) => format!("{}", b),
        Payload::Int16(n) => format!("{}", n),
        Payload::UInt16(n) => format!("{}", n),
        Payload::Int32(n) | Payload::Long(n) => format!("{}", n),
        Payload::UInt32(n) | Payload::ULong(n) => format!("{}", n),
        Payload::Int64(n) => format!("{}", n),
        Payload::UInt64(n) => format!("{}", n),
        Payload::Float32(f) => format!("{:.6}", f),
        Payload::Float64(f) => format!("{:.6}", f),
        Payload::Bytes(b) => format!("BYTES[{}]", b.len()),
        Payload::String(s) => {
            let preview: String = s.chars().take(80).collect();
            if s.chars().count() > 80 {
                format!("\"{}...\"", preview)
            } else {
                format!("\"{}\"", preview)
            }
        }
        Payload::Container(c) => format!("{} children", c.len()),
        Payload::Array(a) => format!("{} elements", a.count()),
    }
}

fn print_tree(value: &Value, indent: usize, counts: &mut [usize; 16]) {
    counts[value.kind().code() as usize] += 1;
    println!(
        "{:indent$}{} ({}) = {}",
        "",
        if value.name().is_empty() { "<unnamed>" } else { value.name() },
        value.kind(),
        format_payload(value),
        indent = indent
    );
    for child in value.children() {
        print_tree(child, indent + 2, counts);
    }
}

fn sample_message() -> Message {
    let mut msg = Message::with_type("user_profile");
    msg.set_source("inspect", "");
    msg.set_target("stdout", "");
    msg.add_value(Value::container(
        "user",
        [
            Value::string("name", "Alice"),
            Value::int32("age", 30),
            Value::array("tags", [Value::string("", "x"), Value::string("", "y")]),
            Value::bytes("avatar", vec![0xCA, 0xFE]),
        ],
    ));
    msg
}

fn main() {
    let mut path = None;
    let mut show_text = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--text" => show_text = true,
            _ => path = Some(arg),
        }
    }

    let data = match &path {
        Some(path) => {
            println!("Reading: {}", path);
            fs::read(path).expect("Failed to read file")
        }
        None => {
            println!("No file given, inspecting a sample message");
            encode_message(&sample_message())
        }
    };
    println!("File size: {} bytes", data.len());

    let mut counts = [0usize; 16];
    match decode_message(&data) {
        Ok(msg) => {
            println!("\n=== Header ===");
            println!("Source: {} / {}", msg.header.source_id, msg.header.source_sub_id);
            println!("Target: {} / {}", msg.header.target_id, msg.header.target_sub_id);
            println!("Type: {}", msg.header.message_type);
            println!("Version: {}", msg.header.version);

            println!("\n=== Values ({}) ===", msg.len());
            for value in msg.values() {
                print_tree(value, 2, &mut counts);
            }
            if show_text {
                println!("\n=== Text ===\n{}", message_to_text(&msg));
            }
        }
        Err(err) => {
            println!("Not a message ({}), decoding as bare values", err);
            let values = decode_values(&data).expect("Failed to decode");
            println!("\n=== Values ({}) ===", values.len());
            for value in &values {
                print_tree(value, 2, &mut counts);
                if show_text {
                    println!("  text: {}", value_to_text(value));
                }
            }
        }
    }

    println!("\n=== Kinds ===");
    for kind in ValueKind::ALL {
        let n = counts[kind.code() as usize];
        if n > 0 {
            println!("  {}: {}", kind.wire_name(), n);
        }
    }
}
