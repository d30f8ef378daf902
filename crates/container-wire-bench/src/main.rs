//! Benchmark for container-wire serialization using record data.
//!
//! Builds one message holding a container per record, then measures binary
//! encode/decode and the text view.
//!
//! Usage: `bench-records [records.json] [--repeat N] [--json]`

use std::fs;
use std::time::{Duration, Instant};

use container_wire::codec::{message_to_text, parse_message_text};
use container_wire::{decode_message, encode_message, Message, Value};
use serde::{Deserialize, Serialize};

const SYNTHETIC_RECORDS: usize = 100_000;
const DEFAULT_REPEAT: u32 = 10;

// =============================================================================
// JSON DATA STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
struct Record {
    name: String,
    age: i32,
    score: f64,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Report {
    records: usize,
    values: usize,
    repeat: u32,
    json_bytes: Option<usize>,
    binary_bytes: usize,
    text_bytes: usize,
    build_ms: f64,
    encode_ms: f64,
    decode_ms: f64,
    text_encode_ms: f64,
    text_parse_ms: f64,
    encode_mb_per_s: f64,
    decode_mb_per_s: f64,
}

// =============================================================================
// CONVERSION
// =============================================================================

fn synthetic_records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| Record {
            name: format!("user_{i:06}"),
            age: (i % 90) as i32 + 10,
            score: i as f64 * 0.25,
            tags: (0..i % 4).map(|t| format!("tag{t}")).collect(),
        })
        .collect()
}

fn record_to_value(record: &Record) -> Value {
    Value::container(
        "record",
        [
            Value::string("name", record.name.as_str()),
            Value::int32("age", record.age),
            Value::float64("score", record.score),
            Value::array(
                "tags",
                record.tags.iter().map(|t| Value::string("", t.as_str())),
            ),
        ],
    )
}

fn records_to_message(records: &[Record]) -> Message {
    let mut msg = Message::with_type("records");
    msg.set_source("bench", "");
    msg.set_target("bench", "");
    for record in records {
        msg.add_value(record_to_value(record));
    }
    msg
}

fn count_values(value: &Value) -> usize {
    1 + value.children().iter().map(count_values).sum::<usize>()
}

/// Runs `f` `repeat` times after a short warmup and returns the mean duration.
fn time_avg<T>(repeat: u32, mut f: impl FnMut() -> T) -> (Duration, T) {
    for _ in 0..3 {
        let _ = f();
    }
    let start = Instant::now();
    let mut last = f();
    for _ in 1..repeat {
        last = f();
    }
    (start.elapsed() / repeat, last)
}

fn mb_per_s(bytes: usize, time: Duration) -> f64 {
    (bytes as f64 / 1_000_000.0) / time.as_secs_f64()
}

fn main() {
    let mut path = None;
    let mut repeat = DEFAULT_REPEAT;
    let mut json_output = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json_output = true,
            "--repeat" => {
                repeat = args
                    .next()
                    .and_then(|n| n.parse().ok())
                    .filter(|&n| n > 0)
                    .expect("--repeat takes a positive integer");
            }
            _ => path = Some(arg),
        }
    }

    let (records, json_bytes) = match &path {
        Some(path) => {
            let json_data = fs::read_to_string(path).expect("Failed to read records file");
            let records: Vec<Record> =
                serde_json::from_str(&json_data).expect("Failed to parse JSON");
            (records, Some(json_data.len()))
        }
        None => (synthetic_records(SYNTHETIC_RECORDS), None),
    };

    let build_start = Instant::now();
    let msg = records_to_message(&records);
    let build_time = build_start.elapsed();
    let values: usize = msg.values().iter().map(count_values).sum();

    let (encode_time, encoded) = time_avg(repeat, || encode_message(&msg));
    let (decode_time, decoded) =
        time_avg(repeat, || decode_message(&encoded).expect("Failed to decode"));
    assert_eq!(decoded, msg, "binary round trip should be lossless");

    let (text_encode_time, text) = time_avg(repeat, || message_to_text(&msg));
    let (text_parse_time, parsed) =
        time_avg(repeat, || parse_message_text(&text).expect("Failed to parse text"));
    assert_eq!(parsed.len(), msg.len());

    let report = Report {
        records: records.len(),
        values,
        repeat,
        json_bytes,
        binary_bytes: encoded.len(),
        text_bytes: text.len(),
        build_ms: build_time.as_secs_f64() * 1000.0,
        encode_ms: encode_time.as_secs_f64() * 1000.0,
        decode_ms: decode_time.as_secs_f64() * 1000.0,
        text_encode_ms: text_encode_time.as_secs_f64() * 1000.0,
        text_parse_ms: text_parse_time.as_secs_f64() * 1000.0,
        encode_mb_per_s: mb_per_s(encoded.len(), encode_time),
        decode_mb_per_s: mb_per_s(encoded.len(), decode_time),
    };

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("Failed to serialize report")
        );
        return;
    }

    match &path {
        Some(path) => println!("Loaded {} records from {}", report.records, path),
        None => println!("Generated {} synthetic records", report.records),
    }
    println!(
        "Built message with {} values in {:?}",
        report.values, build_time
    );

    println!(
        "\nBinary encode: {} bytes in {:?} (avg of {} iterations)",
        encoded.len(),
        encode_time,
        repeat
    );
    println!("  Throughput: {:.2} MB/s", report.encode_mb_per_s);
    println!("Binary decode: {:?}", decode_time);
    println!("  Throughput: {:.2} MB/s", report.decode_mb_per_s);

    println!("\nText encode: {} bytes in {:?}", text.len(), text_encode_time);
    println!("Text parse: {:?}", text_parse_time);

    println!("\n=== Summary ===");
    if let Some(json_bytes) = json_bytes {
        println!(
            "Size vs JSON: {:.1}% (binary), {:.1}% (text)",
            100.0 * encoded.len() as f64 / json_bytes as f64,
            100.0 * text.len() as f64 / json_bytes as f64
        );
    }
    println!(
        "Binary vs text: {:.1}% of the text size",
        100.0 * encoded.len() as f64 / text.len() as f64
    );
}
