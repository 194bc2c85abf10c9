pub mod range;

/// A macro to measure the evaluation time of an expression. Wraps an
/// expression, logs how long it took to evaluate, and returns its value.
#[macro_export]
macro_rules! timed {
    ($label:expr, $ex:expr) => {
        $crate::timed!($label, log::Level::Debug, $ex)
    };
    ($label:expr, $log_level:expr, $ex:expr) => {{
        let now = std::time::Instant::now();
        let value = $ex;
        let elapsed = now.elapsed();
        log::log!($log_level, "{} took {} ms", $label, elapsed.as_millis());
        value
    }};
}

// Serialize a VertexMap as a list instead of a map. Vertex IDs make awkward
// keys in JSON and other formats that only support string keys, and every
// vertex already carries its own ID.
pub mod serde_vertex_map_to_vec {
    use crate::lattice::{Vertex, VertexMap};
    use serde::{ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    /// Serialize a vertex map as a list, in discovery order
    pub fn serialize<S>(map: &VertexMap, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(map.len()))?;
        for vertex in map.values() {
            seq.serialize_element(vertex)?;
        }
        seq.end()
    }

    /// Deserialize a list of vertices into a map, keyed by each vertex's own
    /// ID. Order is preserved.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<VertexMap, D::Error>
    where
        D: Deserializer<'de>,
    {
        let vec: Vec<Vertex> = Vec::deserialize(deserializer)?;
        Ok(vec.into_iter().map(|vertex| (vertex.id, vertex)).collect())
    }
}

// Edge keys are persisted as their canonical strings, so serialize them that
// way everywhere
pub mod serde_display_from_str {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::{fmt::Display, str::FromStr};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
