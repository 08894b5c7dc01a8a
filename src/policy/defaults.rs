//! Built-in field generators, keyed by lowercase field-name fragment.
//!
//! Order is significant: partial matches take the first key that fits, so the
//! more specific fragments (`firstname`, `createdat`) sit ahead of the ones they
//! contain (`name`, `date`), and the short catch-all `id` comes last.
use rand::Rng;
use serde_json::Value;

use super::{GenContext, GeneratorMap, generator};
use crate::synth::scalar::{self, pick};

type FieldFn = fn(&mut GenContext<'_>) -> Value;

const FIELD_GENERATORS: &[(&str, FieldFn)] = &[
    ("email", email),
    ("phone", phone),
    ("url", url),
    ("website", url),
    ("avatar", image),
    ("image", image),
    ("username", username),
    ("firstname", first_name),
    ("lastname", last_name),
    ("fullname", full_name),
    ("name", full_name),
    ("company", company),
    ("address", street),
    ("street", street),
    ("city", city),
    ("state", state),
    ("country", country),
    ("zipcode", zip),
    ("zip", zip),
    ("latitude", latitude),
    ("longitude", longitude),
    ("price", money),
    ("amount", money),
    ("total", money),
    ("quantity", count),
    ("count", count),
    ("age", age),
    ("rating", rating),
    ("title", title),
    ("description", paragraph),
    ("summary", paragraph),
    ("status", status),
    ("manufacturer", manufacturer),
    ("model", model),
    ("serialnumber", serial_number),
    ("location", location),
    ("createdat", timestamp),
    ("updatedat", timestamp),
    ("timestamp", timestamp),
    ("date", timestamp),
    ("uuid", uuid),
    ("id", uuid),
];

pub fn field_generators() -> GeneratorMap {
    FIELD_GENERATORS
        .iter()
        .map(|(key, f)| ((*key).to_string(), generator(*f)))
        .collect()
}

// ------------------------------ Word lists ------------------------------- //

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Alan", "Barbara", "Dennis", "Frances", "Ken", "Radia", "Edsger", "Margaret",
];
const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Turing", "Liskov", "Ritchie", "Allen", "Thompson", "Perlman", "Dijkstra",
    "Hamilton",
];
const DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "mail.test"];
const COMPANIES: &[&str] = &[
    "Acme Corp", "Globex", "Initech", "Umbrella Labs", "Stark Industries", "Wayne Enterprises",
    "Hooli", "Vandelay Industries",
];
const STREETS: &[&str] = &["Main", "Oak", "Pine", "Maple", "Cedar", "Elm", "Lake", "Hill"];
const STREET_KINDS: &[&str] = &["St", "Ave", "Rd", "Blvd", "Ln"];
const CITIES: &[&str] = &[
    "Springfield", "Riverside", "Fairview", "Georgetown", "Franklin", "Greenville", "Bristol",
    "Clinton",
];
const STATES: &[&str] = &["CA", "NY", "TX", "WA", "OR", "IL", "MA", "CO"];
const COUNTRIES: &[&str] = &[
    "United States", "Canada", "Germany", "Japan", "Brazil", "Australia", "France", "India",
];
const STATUSES: &[&str] = &["active", "inactive", "maintenance"];
const MANUFACTURERS: &[&str] = &["Siemens", "Bosch", "Honeywell", "ABB", "Schneider", "Caterpillar"];
const LOCATIONS: &[&str] = &[
    "Warehouse A", "Warehouse B", "Plant 1", "Plant 2", "Head Office", "Data Center East",
    "Loading Dock",
];

// ------------------------------ Generators ------------------------------- //

fn email(cx: &mut GenContext<'_>) -> Value {
    let rng = cx.rng();
    let first = pick(rng, FIRST_NAMES).to_lowercase();
    let last = pick(rng, LAST_NAMES).to_lowercase();
    Value::from(format!("{first}.{last}@{}", pick(rng, DOMAINS)))
}

fn phone(cx: &mut GenContext<'_>) -> Value {
    let rng = cx.rng();
    Value::from(format!("+1-555-{:03}-{:04}", rng.gen_range(100..1000), rng.gen_range(0..10000)))
}

fn url(cx: &mut GenContext<'_>) -> Value {
    let rng = cx.rng();
    Value::from(format!("https://{}/{}", pick(rng, DOMAINS), pick(rng, scalar::WORDS)))
}

fn image(cx: &mut GenContext<'_>) -> Value {
    let rng = cx.rng();
    Value::from(format!("https://images.example.com/{}-{}.png", pick(rng, scalar::WORDS), rng.gen_range(1..1000)))
}

fn username(cx: &mut GenContext<'_>) -> Value {
    let rng = cx.rng();
    let first = pick(rng, FIRST_NAMES).to_lowercase();
    Value::from(format!("{first}{}", rng.gen_range(1..100)))
}

fn first_name(cx: &mut GenContext<'_>) -> Value {
    Value::from(pick(cx.rng(), FIRST_NAMES))
}

fn last_name(cx: &mut GenContext<'_>) -> Value {
    Value::from(pick(cx.rng(), LAST_NAMES))
}

fn full_name(cx: &mut GenContext<'_>) -> Value {
    let rng = cx.rng();
    let first = pick(rng, FIRST_NAMES);
    Value::from(format!("{first} {}", pick(rng, LAST_NAMES)))
}

fn company(cx: &mut GenContext<'_>) -> Value {
    Value::from(pick(cx.rng(), COMPANIES))
}

fn street(cx: &mut GenContext<'_>) -> Value {
    let rng = cx.rng();
    let number = rng.gen_range(1..10000);
    let name = pick(rng, STREETS);
    Value::from(format!("{number} {name} {}", pick(rng, STREET_KINDS)))
}

fn city(cx: &mut GenContext<'_>) -> Value {
    Value::from(pick(cx.rng(), CITIES))
}

fn state(cx: &mut GenContext<'_>) -> Value {
    Value::from(pick(cx.rng(), STATES))
}

fn country(cx: &mut GenContext<'_>) -> Value {
    Value::from(pick(cx.rng(), COUNTRIES))
}

fn zip(cx: &mut GenContext<'_>) -> Value {
    Value::from(format!("{:05}", cx.rng().gen_range(501..100000)))
}

fn latitude(cx: &mut GenContext<'_>) -> Value {
    Value::from(scalar::decimal(cx.rng(), -90.0, 90.0))
}

fn longitude(cx: &mut GenContext<'_>) -> Value {
    Value::from(scalar::decimal(cx.rng(), -180.0, 180.0))
}

fn money(cx: &mut GenContext<'_>) -> Value {
    Value::from(scalar::decimal(cx.rng(), 1.0, 1000.0))
}

fn count(cx: &mut GenContext<'_>) -> Value {
    Value::from(cx.rng().gen_range(0..100))
}

fn age(cx: &mut GenContext<'_>) -> Value {
    Value::from(cx.rng().gen_range(18..90))
}

fn rating(cx: &mut GenContext<'_>) -> Value {
    Value::from(cx.rng().gen_range(1..=5))
}

fn title(cx: &mut GenContext<'_>) -> Value {
    Value::from(scalar::title(cx.rng(), 3))
}

fn paragraph(cx: &mut GenContext<'_>) -> Value {
    Value::from(scalar::sentence(cx.rng()))
}

fn status(cx: &mut GenContext<'_>) -> Value {
    Value::from(pick(cx.rng(), STATUSES))
}

fn manufacturer(cx: &mut GenContext<'_>) -> Value {
    Value::from(pick(cx.rng(), MANUFACTURERS))
}

fn model(cx: &mut GenContext<'_>) -> Value {
    let rng = cx.rng();
    let a = rng.gen_range(b'A'..=b'Z') as char;
    let b = rng.gen_range(b'A'..=b'Z') as char;
    Value::from(format!("{a}{b}-{}", rng.gen_range(100..1000)))
}

fn serial_number(cx: &mut GenContext<'_>) -> Value {
    Value::from(format!("SN-{:08}", cx.rng().gen_range(0..100_000_000)))
}

fn location(cx: &mut GenContext<'_>) -> Value {
    Value::from(pick(cx.rng(), LOCATIONS))
}

fn timestamp(cx: &mut GenContext<'_>) -> Value {
    let now = cx.now();
    Value::from(scalar::timestamp(cx.rng(), now))
}

fn uuid(cx: &mut GenContext<'_>) -> Value {
    Value::from(scalar::uuid(cx.rng()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ValueGenerator;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample(key: &str, seed: u64) -> Value {
        let map = field_generators();
        let mut rng = StdRng::seed_from_u64(seed);
        map[key].generate(&mut GenContext::new(&mut rng, Utc::now()))
    }

    #[test]
    fn keys_are_lowercase_and_ordered() {
        let map = field_generators();
        assert!(map.keys().all(|k| *k == k.to_lowercase()));
        let pos = |k: &str| map.get_index_of(k).unwrap();
        assert!(pos("firstname") < pos("name"));
        assert!(pos("createdat") < pos("date"));
        assert_eq!(pos("id"), map.len() - 1);
    }

    #[test]
    fn values_look_like_their_field() {
        for seed in 0..20 {
            assert!(sample("email", seed).as_str().unwrap().contains('@'));
            let status = sample("status", seed);
            assert!(STATUSES.contains(&status.as_str().unwrap()));
            let rating = sample("rating", seed).as_i64().unwrap();
            assert!((1..=5).contains(&rating));
            assert_eq!(sample("zip", seed).as_str().unwrap().len(), 5);
            assert!(sample("price", seed).is_f64());
        }
        assert!(uuid::Uuid::parse_str(sample("id", 1).as_str().unwrap()).is_ok());
    }
}
