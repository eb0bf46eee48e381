use serde::{Deserialize, Serialize};

/// One labelled confidence returned by the emotion-inference endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionResult {
    pub label: String,
    /// Always within `[0, 1]`
    pub confidence: f32,
}

/// Wire shape: the backend has used both `emotion`/`confidence` and
/// `label`/`score` spellings.
#[derive(Deserialize)]
struct RawEmotion {
    #[serde(default)]
    emotion: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    score: Option<f32>,
}

impl<'de> Deserialize<'de> for EmotionResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawEmotion::deserialize(deserializer)?;
        let label = raw
            .emotion
            .or(raw.label)
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "neutral".to_string());
        let confidence = raw.confidence.or(raw.score).unwrap_or(0.0);
        Ok(EmotionResult::new(label, confidence))
    }
}

impl EmotionResult {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// Confidence as a percentage with one decimal, e.g. `"87.5%"`
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }

    pub fn icon(&self) -> &'static str {
        icon_for(&self.label)
    }
}

/// Map an emotion label to a display glyph. Unknown labels read as neutral.
pub fn icon_for(label: &str) -> &'static str {
    match label.to_lowercase().as_str() {
        "joy" | "happy" | "happiness" => "😊",
        "sadness" | "sad" => "😢",
        "anger" | "angry" => "😠",
        "fear" => "😨",
        "surprise" | "surprised" => "😲",
        "disgust" => "🤢",
        _ => "😐",
    }
}

/// `POST /emotions/analyze-image` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeImageResponse {
    #[serde(default)]
    pub emotions: Vec<EmotionResult>,
}

/// `POST /emotions/analyze-image` body
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeImageRequest {
    /// `data:image/jpeg;base64,...`
    pub image: String,
}
