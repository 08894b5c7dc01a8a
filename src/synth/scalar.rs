//! Scalar building blocks shared by the synthesizer and the built-in field
//! generators.
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

pub const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi", "aliquip",
    "commodo", "consequat", "duis", "aute", "irure", "voluptate", "velit", "esse", "cillum",
];

const SECONDS_PER_YEAR: i64 = 365 * 24 * 60 * 60;

pub fn pick<'w, R: Rng + ?Sized>(rng: &mut R, options: &[&'w str]) -> &'w str {
    options.choose(rng).copied().unwrap_or_default()
}

pub fn words<R: Rng + ?Sized>(rng: &mut R, count: usize) -> String {
    (0..count).map(|_| pick(rng, WORDS)).collect::<Vec<_>>().join(" ")
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Title case, `count` words.
pub fn title<R: Rng + ?Sized>(rng: &mut R, count: usize) -> String {
    (0..count).map(|_| capitalize(pick(rng, WORDS))).collect::<Vec<_>>().join(" ")
}

pub fn sentence<R: Rng + ?Sized>(rng: &mut R) -> String {
    let count = rng.gen_range(6..=12);
    format!("{}.", capitalize(&words(rng, count)))
}

pub fn integer<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    rng.gen_range(1..=1000)
}

/// Two decimal places.
pub fn decimal<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    (rng.gen_range(low..high) * 100.0).round() / 100.0
}

/// RFC 3339 with milliseconds, within the year before `anchor`.
pub fn timestamp<R: Rng + ?Sized>(rng: &mut R, anchor: DateTime<Utc>) -> String {
    let back = TimeDelta::seconds(rng.gen_range(0..SECONDS_PER_YEAR));
    (anchor - back).to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn uuid<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
}
