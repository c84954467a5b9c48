//! The five generation task variants and their display metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One of the fixed generation modes of the external program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskVariant {
    TextToVideo,
    ImageToVideo,
    TextAndImageToVideo,
    SpeechToVideo,
    Animate,
}

/// Display metadata for a task variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskMeta {
    pub label: &'static str,
    pub description: &'static str,
    /// Model identifier the checkpoint directory is named after.
    pub model: &'static str,
}

impl TaskVariant {
    /// All variants in sidebar order.
    pub const ALL: [TaskVariant; 5] = [
        TaskVariant::TextToVideo,
        TaskVariant::ImageToVideo,
        TaskVariant::TextAndImageToVideo,
        TaskVariant::SpeechToVideo,
        TaskVariant::Animate,
    ];

    /// Wire name, also emitted as the `--task` value.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskVariant::TextToVideo => "text-to-video",
            TaskVariant::ImageToVideo => "image-to-video",
            TaskVariant::TextAndImageToVideo => "text-and-image-to-video",
            TaskVariant::SpeechToVideo => "speech-to-video",
            TaskVariant::Animate => "animate",
        }
    }

    pub fn meta(self) -> TaskMeta {
        match self {
            TaskVariant::TextToVideo => TaskMeta {
                label: "Text to Video",
                description: "Generate from text prompt",
                model: "t2v-A14B",
            },
            TaskVariant::ImageToVideo => TaskMeta {
                label: "Image to Video",
                description: "Animate a static image",
                model: "i2v-A14B",
            },
            TaskVariant::TextAndImageToVideo => TaskMeta {
                label: "Text + Image to Video",
                description: "Guided image animation",
                model: "ti2v-5B",
            },
            TaskVariant::SpeechToVideo => TaskMeta {
                label: "Speech to Video",
                description: "Audio-driven generation",
                model: "s2v-14B",
            },
            TaskVariant::Animate => TaskMeta {
                label: "Character Animation",
                description: "Animate or replace a character from source data",
                model: "animate-14B",
            },
        }
    }
}

impl fmt::Display for TaskVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskVariant {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskVariant::ALL
            .into_iter()
            .find(|task| task.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown task variant '{s}'. Must be one of: {}",
                    TaskVariant::ALL
                        .iter()
                        .map(|t| t.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}
