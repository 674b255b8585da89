use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One image's annotation as stored in `metadata.json`.
///
/// The vision reply is kept verbatim so fields the model adds beyond the
/// requested schema survive a round trip through the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationRecord(Map<String, Value>);

impl AnnotationRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, facet: &str) -> Option<&Value> {
        self.0.get(facet)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Typed view of the record, if it matches the requested schema.
    pub fn to_annotation(&self) -> Result<Annotation, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }
}

impl From<AnnotationRecord> for Value {
    fn from(record: AnnotationRecord) -> Self {
        Value::Object(record.0)
    }
}

/// The five facets the vision service is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub photography: Photography,
    pub objects: Vec<DetectedObject>,
    pub people: People,
    pub colors: Vec<DominantColor>,
    pub scene: Scene,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photography {
    pub shot_type: String,
    pub orientation: String,
    pub lighting: String,
    pub composition: String,
    pub subject_focus: String,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub name: String,
    /// 0 to 100.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// Generic, non-identifying description of the people in frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct People {
    pub count: u32,
    #[serde(default)]
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    /// `#RRGGBB`
    pub hex: String,
    /// 0 to 100.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(rename = "type")]
    pub scene_type: String,
    pub description: String,
}
