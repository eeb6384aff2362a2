//! Data model of the gene payload and the dataset list
//!
//! All types are deserialized from the JSON payloads supplied by the data
//! fetch and dataset selection collaborators. The crate itself never holds
//! long-lived state; every layout pass starts from these raw records.

mod dataset;
mod gene;

pub use dataset::Dataset;
pub use gene::{Exon, ExonAttributes, ExpressionPoint, Gene, Transcript, TranscriptAttributes};

pub(crate) mod de {
    //! Lenient field deserializers
    //!
    //! Upstream services are inconsistent about encoding coordinates and ids
    //! as JSON numbers or as numeric strings. These helpers accept both.

    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCoordinate {
        Number(u32),
        Text(String),
    }

    impl RawCoordinate {
        fn parse<E: serde::de::Error>(self) -> Result<u32, E> {
            match self {
                RawCoordinate::Number(n) => Ok(n),
                RawCoordinate::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawIdent {
        Text(String),
        Number(i64),
    }

    impl From<RawIdent> for String {
        fn from(raw: RawIdent) -> String {
            match raw {
                RawIdent::Text(s) => s,
                RawIdent::Number(n) => n.to_string(),
            }
        }
    }

    pub(crate) fn coordinate<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawCoordinate::deserialize(deserializer)?.parse()
    }

    pub(crate) fn opt_coordinate<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawCoordinate>::deserialize(deserializer)? {
            Some(raw) => raw.parse().map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn ident<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(RawIdent::deserialize(deserializer)?.into())
    }

    pub(crate) fn opt_ident<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<RawIdent>::deserialize(deserializer)?.map(String::from))
    }
}
