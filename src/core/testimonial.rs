//! Testimonial records and where they come from.
//!
//! Records arrive as JSON, either a bare array or wrapped in an object
//! (`{"testimonials": [...]}` or `{"data": [...]}`), the way a REST
//! endpoint would return them.  Ids double as render keys, so duplicates
//! are dropped on load.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::engine::CarouselItem;

/// Highest star rating a record can carry.
pub const MAX_RATING: u8 = 5;

/// Stable record identifier.  Upstream APIs use both numeric and string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestimonialId {
    Number(u64),
    Text(String),
}

impl fmt::Display for TestimonialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestimonialId::Number(n) => write!(f, "{n}"),
            TestimonialId::Text(s) => f.write_str(s),
        }
    }
}

/// One customer testimonial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(alias = "_id")]
    pub id: TestimonialId,
    #[serde(alias = "name")]
    pub author: String,
    /// Service the customer booked, e.g. "Beard trim".
    #[serde(default)]
    pub service: Option<String>,
    #[serde(alias = "comment", alias = "text")]
    pub message: String,
    #[serde(default)]
    pub rating: Option<u8>,
}

impl CarouselItem for Testimonial {
    type Key = TestimonialId;

    fn key(&self) -> TestimonialId {
        self.id.clone()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<Testimonial>),
    Wrapped {
        #[serde(alias = "data")]
        testimonials: Vec<Testimonial>,
    },
}

/// Errors from loading testimonials.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a valid testimonial list: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the item list is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSource {
    /// Built-in sample data.
    Demo,
    File(PathBuf),
}

impl ItemSource {
    pub fn label(&self) -> String {
        match self {
            ItemSource::Demo => "demo".to_string(),
            ItemSource::File(path) => path.display().to_string(),
        }
    }

    /// Fetch the list.  Blocking; call from a worker thread.
    pub fn fetch(&self) -> Result<Vec<Testimonial>, SourceError> {
        match self {
            ItemSource::Demo => Ok(demo_testimonials()),
            ItemSource::File(path) => load_from_path(path),
        }
    }
}

/// Read and validate a JSON testimonial file.
pub fn load_from_path(path: &Path) -> Result<Vec<Testimonial>, SourceError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode a JSON payload and normalise it.
pub fn parse(json: &str) -> Result<Vec<Testimonial>, serde_json::Error> {
    let records = match serde_json::from_str::<Payload>(json)? {
        Payload::List(records) | Payload::Wrapped { testimonials: records } => records,
    };
    Ok(normalise(records))
}

/// Drop duplicate ids (first wins) and clamp ratings.
fn normalise(records: Vec<Testimonial>) -> Vec<Testimonial> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(records.len());

    for mut record in records {
        if !seen.insert(record.id.clone()) {
            tracing::warn!(id = %record.id, "dropping testimonial with duplicate id");
            continue;
        }
        if let Some(rating) = record.rating {
            if rating > MAX_RATING {
                tracing::warn!(id = %record.id, rating, "clamping out-of-range rating");
                record.rating = Some(MAX_RATING);
            }
        }
        out.push(record);
    }

    out
}

/// Sample data used when no item file is given.
pub fn demo_testimonials() -> Vec<Testimonial> {
    const DEMO: &[(&str, &str, &str, u8)] = &[
        (
            "Amara O.",
            "Knotless braids",
            "Booked on a Sunday night, got a slot Monday morning. The braids are neat and the parting is perfect.",
            5,
        ),
        (
            "Daniel K.",
            "Skin fade",
            "Barber was on time and knew exactly what I meant by a low taper. Easiest booking I have made.",
            5,
        ),
        (
            "Priya S.",
            "Gel manicure",
            "Lovely studio, clear pricing up front and the reminder message saved me from forgetting.",
            4,
        ),
        (
            "Tomás R.",
            "Beard trim",
            "Rescheduled twice without any fuss. The trim itself was sharp and quick.",
            5,
        ),
        (
            "Lena M.",
            "Lash lift",
            "Found a stylist ten minutes from home. Results lasted well over a month.",
            4,
        ),
        (
            "Joy A.",
            "Silk press",
            "Hair came out silky with zero heat damage. Will be rebooking for next month.",
            5,
        ),
        (
            "Marcus B.",
            "Hot towel shave",
            "Proper old-school shave. Paid through the app and was out the door in thirty minutes.",
            5,
        ),
    ];

    DEMO.iter()
        .enumerate()
        .map(|(i, &(author, service, message, rating))| Testimonial {
            id: TestimonialId::Number(i as u64 + 1),
            author: author.to_string(),
            service: Some(service.to_string()),
            message: message.to_string(),
            rating: Some(rating),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_bare_array_with_aliases() {
        let json = r#"[
            {"_id": "a1", "name": "Ada", "comment": "Great cut", "rating": 5},
            {"id": 7, "author": "Bo", "text": "Quick and friendly", "service": "Fade"}
        ]"#;
        let items = parse(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, TestimonialId::Text("a1".into()));
        assert_eq!(items[0].author, "Ada");
        assert_eq!(items[1].id, TestimonialId::Number(7));
        assert_eq!(items[1].service.as_deref(), Some("Fade"));
        assert_eq!(items[1].rating, None);
    }

    #[test]
    fn parses_wrapped_payloads() {
        let wrapped = r#"{"testimonials": [{"id": 1, "author": "A", "message": "m"}]}"#;
        let data = r#"{"success": true, "data": [{"id": 2, "author": "B", "message": "n"}]}"#;
        assert_eq!(parse(wrapped).unwrap()[0].id, TestimonialId::Number(1));
        assert_eq!(parse(data).unwrap()[0].id, TestimonialId::Number(2));
    }

    #[test]
    fn duplicate_ids_keep_first_and_ratings_clamp() {
        let json = r#"[
            {"id": 1, "author": "First", "message": "x", "rating": 9},
            {"id": 1, "author": "Second", "message": "y"},
            {"id": "1", "author": "Text id", "message": "z"}
        ]"#;
        let items = parse(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].author, "First");
        assert_eq!(items[0].rating, Some(MAX_RATING));
        assert_eq!(items[1].author, "Text id");
    }

    #[test]
    fn empty_list_is_valid() {
        assert!(parse("[]").unwrap().is_empty());
    }

    #[test]
    fn missing_message_is_rejected() {
        assert!(parse(r#"[{"id": 1, "author": "A"}]"#).is_err());
    }

    #[test]
    fn file_source_reads_and_reports_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 3, "author": "C", "message": "ok"}}]"#).unwrap();
        let source = ItemSource::File(file.path().to_path_buf());
        assert_eq!(source.fetch().unwrap().len(), 1);

        let missing = ItemSource::File(PathBuf::from("/definitely/not/here.json"));
        assert!(matches!(missing.fetch(), Err(SourceError::Io { .. })));

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "{{ not json").unwrap();
        let err = load_from_path(bad.path()).unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
        assert!(err.to_string().contains("not a valid testimonial list"));
    }

    #[test]
    fn demo_set_has_unique_ids_and_enough_items_to_loop() {
        let demo = demo_testimonials();
        assert!(demo.len() > 3);
        let ids: HashSet<_> = demo.iter().map(CarouselItem::key).collect();
        assert_eq!(ids.len(), demo.len());
    }
}
