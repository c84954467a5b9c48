//! Typed generation parameters (the "Configuration" of a form).
//!
//! [`Configuration`] is a tagged union: one payload shape per
//! [`TaskVariant`], each embedding the shared [`BaseParams`]. Serialized it is
//! a flat JSON object with a `"task"` discriminator, which is exactly what is
//! stored in a job's `params` column.
//!
//! Updates are merged without validation; range checks live in
//! [`Configuration::validate_ranges`] and emptiness checks in
//! [`crate::gate`].

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::task::TaskVariant;

/// Seed value meaning "let the program pick one".
pub const SEED_RANDOM: i64 = -1;

/// Default number of frames; must be of the form `4n + 1`.
pub const DEFAULT_FRAME_COUNT: u32 = 81;

/// Default sampling shift for every variant.
pub const DEFAULT_SHIFT: f64 = 5.0;

// ---------------------------------------------------------------------------
// Enumerated fields
// ---------------------------------------------------------------------------

/// Output resolution, rendered as `W*H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "1280*720")]
    Landscape720p,
    #[serde(rename = "720*1280")]
    Portrait720p,
    #[serde(rename = "960*960")]
    Square960,
    #[serde(rename = "832*480")]
    Widescreen480p,
    #[serde(rename = "480*832")]
    Tall480p,
    #[serde(rename = "624*624")]
    Square624,
}

impl Resolution {
    pub const ALL: [Resolution; 6] = [
        Resolution::Landscape720p,
        Resolution::Portrait720p,
        Resolution::Square960,
        Resolution::Widescreen480p,
        Resolution::Tall480p,
        Resolution::Square624,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Landscape720p => "1280*720",
            Resolution::Portrait720p => "720*1280",
            Resolution::Square960 => "960*960",
            Resolution::Widescreen480p => "832*480",
            Resolution::Tall480p => "480*832",
            Resolution::Square624 => "624*624",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Resolution::Landscape720p => "1280×720 (16:9 Landscape)",
            Resolution::Portrait720p => "720×1280 (9:16 Portrait)",
            Resolution::Square960 => "960×960 (1:1 Square)",
            Resolution::Widescreen480p => "832×480 (Widescreen)",
            Resolution::Tall480p => "480×832 (Tall)",
            Resolution::Square624 => "624×624 (Square Small)",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Solver {
    #[serde(rename = "unipc")]
    UniPc,
    #[serde(rename = "dpm++")]
    DpmPlusPlus,
}

impl Solver {
    pub fn as_str(self) -> &'static str {
        match self {
            Solver::UniPc => "unipc",
            Solver::DpmPlusPlus => "dpm++",
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the prompt is expanded before generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptExpansionMethod {
    RemoteApi,
    LocalModel,
}

impl PromptExpansionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PromptExpansionMethod::RemoteApi => "remote-api",
            PromptExpansionMethod::LocalModel => "local-model",
        }
    }
}

impl fmt::Display for PromptExpansionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frames generated per clip in speech-to-video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FramesPerClip {
    Frames48,
    Frames80,
}

impl FramesPerClip {
    pub fn count(self) -> u32 {
        match self {
            FramesPerClip::Frames48 => 48,
            FramesPerClip::Frames80 => 80,
        }
    }
}

impl TryFrom<u32> for FramesPerClip {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            48 => Ok(FramesPerClip::Frames48),
            80 => Ok(FramesPerClip::Frames80),
            other => Err(format!("frames per clip must be 48 or 80, got {other}")),
        }
    }
}

impl From<FramesPerClip> for u32 {
    fn from(value: FramesPerClip) -> Self {
        value.count()
    }
}

/// Temporal reference frames carried between animate clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ReferenceFrameCount {
    One,
    Five,
}

impl ReferenceFrameCount {
    pub fn count(self) -> u32 {
        match self {
            ReferenceFrameCount::One => 1,
            ReferenceFrameCount::Five => 5,
        }
    }
}

impl TryFrom<u32> for ReferenceFrameCount {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ReferenceFrameCount::One),
            5 => Ok(ReferenceFrameCount::Five),
            other => Err(format!("reference frame count must be 1 or 5, got {other}")),
        }
    }
}

impl From<ReferenceFrameCount> for u32 {
    fn from(value: ReferenceFrameCount) -> Self {
        value.count()
    }
}

// ---------------------------------------------------------------------------
// Parameter records
// ---------------------------------------------------------------------------

/// Fields shared by every task variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BaseParams {
    #[validate(length(min = 1, message = "checkpoint directory is required"))]
    pub checkpoint_dir: String,
    pub resolution: Resolution,
    #[validate(custom(function = "validate_frame_count"))]
    pub frame_count: u32,
    /// [`SEED_RANDOM`] or a fixed seed.
    pub seed: i64,
    #[validate(range(min = 1, max = 100))]
    pub sample_steps: u32,
    #[validate(range(min = 1.0, max = 20.0))]
    pub guidance_scale: f64,
    pub solver: Solver,
    #[validate(range(min = 0.0, max = 20.0))]
    pub shift: f64,
    pub offload_to_cpu: bool,
    pub encoder_on_cpu: bool,
    pub prompt_expansion: bool,
    /// Only meaningful while `prompt_expansion` is set.
    pub prompt_expansion_method: PromptExpansionMethod,
    /// Empty means the program picks the output file name.
    #[serde(default)]
    pub output_path: String,
}

fn validate_frame_count(frame_count: u32) -> Result<(), ValidationError> {
    if frame_count % 4 == 1 {
        Ok(())
    } else {
        let mut err = ValidationError::new("frame_count");
        err.message = Some("frame count must be of the form 4n+1 (e.g. 17, 49, 81)".into());
        Err(err)
    }
}

impl BaseParams {
    fn with_model(
        checkpoint_dir: &str,
        resolution: Resolution,
        sample_steps: u32,
        guidance_scale: f64,
    ) -> Self {
        Self {
            checkpoint_dir: checkpoint_dir.to_string(),
            resolution,
            frame_count: DEFAULT_FRAME_COUNT,
            seed: SEED_RANDOM,
            sample_steps,
            guidance_scale,
            solver: Solver::UniPc,
            shift: DEFAULT_SHIFT,
            offload_to_cpu: false,
            encoder_on_cpu: false,
            prompt_expansion: false,
            prompt_expansion_method: PromptExpansionMethod::RemoteApi,
            output_path: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TextToVideoParams {
    #[serde(flatten)]
    #[validate(nested)]
    pub base: BaseParams,
    #[serde(default)]
    pub prompt: String,
}

/// Shared by image-to-video and text-and-image-to-video; they differ only in
/// which fields are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ImageParams {
    #[serde(flatten)]
    #[validate(nested)]
    pub base: BaseParams,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub image_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SpeechToVideoParams {
    #[serde(flatten)]
    #[validate(nested)]
    pub base: BaseParams,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub image_path: String,
    /// Ignored while `tts_enabled` is set.
    #[serde(default)]
    pub audio_path: String,
    pub tts_enabled: bool,
    #[serde(default)]
    pub tts_text: String,
    #[serde(default)]
    pub tts_reference_audio: String,
    #[serde(default)]
    pub tts_reference_text: String,
    #[serde(default)]
    pub pose_video_path: String,
    #[validate(range(min = 1, max = 10))]
    pub clip_count: u32,
    pub frames_per_clip: FramesPerClip,
    pub start_from_reference: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnimateParams {
    #[serde(flatten)]
    #[validate(nested)]
    pub base: BaseParams,
    #[serde(default)]
    pub source_data_path: String,
    /// `false` animates the reference character, `true` replaces it.
    pub replace_mode: bool,
    pub reference_frame_count: ReferenceFrameCount,
    pub use_relighting_model: bool,
}

/// A fully typed configuration for exactly one task variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "kebab-case")]
pub enum Configuration {
    TextToVideo(TextToVideoParams),
    ImageToVideo(ImageParams),
    TextAndImageToVideo(ImageParams),
    SpeechToVideo(SpeechToVideoParams),
    Animate(AnimateParams),
}

impl Configuration {
    /// The fixed default configuration for a task variant.
    pub fn defaults(task: TaskVariant) -> Self {
        match task {
            TaskVariant::TextToVideo => Configuration::TextToVideo(TextToVideoParams {
                base: BaseParams::with_model(
                    "./Wan2.2-T2V-A14B",
                    Resolution::Landscape720p,
                    50,
                    5.0,
                ),
                prompt: String::new(),
            }),
            TaskVariant::ImageToVideo => Configuration::ImageToVideo(ImageParams {
                base: BaseParams::with_model(
                    "./Wan2.2-I2V-A14B",
                    Resolution::Landscape720p,
                    50,
                    5.0,
                ),
                prompt: String::new(),
                image_path: String::new(),
            }),
            TaskVariant::TextAndImageToVideo => Configuration::TextAndImageToVideo(ImageParams {
                base: BaseParams::with_model(
                    "./Wan2.2-TI2V-5B",
                    Resolution::Landscape720p,
                    50,
                    5.0,
                ),
                prompt: String::new(),
                image_path: String::new(),
            }),
            TaskVariant::SpeechToVideo => Configuration::SpeechToVideo(SpeechToVideoParams {
                base: BaseParams::with_model(
                    "./Wan2.2-S2V-14B",
                    Resolution::Widescreen480p,
                    40,
                    4.0,
                ),
                prompt: String::new(),
                image_path: String::new(),
                audio_path: String::new(),
                tts_enabled: false,
                tts_text: String::new(),
                tts_reference_audio: String::new(),
                tts_reference_text: String::new(),
                pose_video_path: String::new(),
                clip_count: 2,
                frames_per_clip: FramesPerClip::Frames48,
                start_from_reference: false,
            }),
            TaskVariant::Animate => Configuration::Animate(AnimateParams {
                base: BaseParams::with_model(
                    "./Wan2.2-Animate-14B",
                    Resolution::Widescreen480p,
                    40,
                    4.0,
                ),
                source_data_path: String::new(),
                replace_mode: false,
                reference_frame_count: ReferenceFrameCount::Five,
                use_relighting_model: false,
            }),
        }
    }

    pub fn task(&self) -> TaskVariant {
        match self {
            Configuration::TextToVideo(_) => TaskVariant::TextToVideo,
            Configuration::ImageToVideo(_) => TaskVariant::ImageToVideo,
            Configuration::TextAndImageToVideo(_) => TaskVariant::TextAndImageToVideo,
            Configuration::SpeechToVideo(_) => TaskVariant::SpeechToVideo,
            Configuration::Animate(_) => TaskVariant::Animate,
        }
    }

    pub fn base(&self) -> &BaseParams {
        match self {
            Configuration::TextToVideo(p) => &p.base,
            Configuration::ImageToVideo(p) | Configuration::TextAndImageToVideo(p) => &p.base,
            Configuration::SpeechToVideo(p) => &p.base,
            Configuration::Animate(p) => &p.base,
        }
    }

    fn base_mut(&mut self) -> &mut BaseParams {
        match self {
            Configuration::TextToVideo(p) => &mut p.base,
            Configuration::ImageToVideo(p) | Configuration::TextAndImageToVideo(p) => &mut p.base,
            Configuration::SpeechToVideo(p) => &mut p.base,
            Configuration::Animate(p) => &mut p.base,
        }
    }

    /// The denormalized text stored alongside a job: the prompt when one is
    /// filled in, otherwise the variant's primary path.
    pub fn display_text(&self) -> &str {
        let (prompt, fallback) = match self {
            Configuration::TextToVideo(p) => (p.prompt.as_str(), ""),
            Configuration::ImageToVideo(p) | Configuration::TextAndImageToVideo(p) => {
                (p.prompt.as_str(), p.image_path.as_str())
            }
            Configuration::SpeechToVideo(p) => (p.prompt.as_str(), p.image_path.as_str()),
            Configuration::Animate(p) => ("", p.source_data_path.as_str()),
        };
        if prompt.trim().is_empty() {
            fallback
        } else {
            prompt
        }
    }

    /// Merge a partial update. Values are taken as-is; nothing is validated.
    ///
    /// Fails only when the update's variant section targets a different task
    /// variant, since the variant of a configuration never changes.
    pub fn apply(&mut self, update: ConfigurationUpdate) -> Result<(), CoreError> {
        if let Some(variant) = &update.variant {
            if variant.task() != self.task() {
                return Err(CoreError::Validation(format!(
                    "Update for '{}' cannot be applied to a '{}' configuration",
                    variant.task(),
                    self.task()
                )));
            }
        }

        update.base.apply_to(self.base_mut());

        match (self, update.variant) {
            (Configuration::TextToVideo(p), Some(VariantUpdate::TextToVideo(u))) => {
                set(&mut p.prompt, u.prompt);
            }
            (Configuration::ImageToVideo(p), Some(VariantUpdate::ImageToVideo(u)))
            | (
                Configuration::TextAndImageToVideo(p),
                Some(VariantUpdate::TextAndImageToVideo(u)),
            ) => {
                set(&mut p.prompt, u.prompt);
                set(&mut p.image_path, u.image_path);
            }
            (Configuration::SpeechToVideo(p), Some(VariantUpdate::SpeechToVideo(u))) => {
                set(&mut p.prompt, u.prompt);
                set(&mut p.image_path, u.image_path);
                set(&mut p.audio_path, u.audio_path);
                set(&mut p.tts_enabled, u.tts_enabled);
                set(&mut p.tts_text, u.tts_text);
                set(&mut p.tts_reference_audio, u.tts_reference_audio);
                set(&mut p.tts_reference_text, u.tts_reference_text);
                set(&mut p.pose_video_path, u.pose_video_path);
                set(&mut p.clip_count, u.clip_count);
                set(&mut p.frames_per_clip, u.frames_per_clip);
                set(&mut p.start_from_reference, u.start_from_reference);
            }
            (Configuration::Animate(p), Some(VariantUpdate::Animate(u))) => {
                set(&mut p.source_data_path, u.source_data_path);
                set(&mut p.replace_mode, u.replace_mode);
                set(&mut p.reference_frame_count, u.reference_frame_count);
                set(&mut p.use_relighting_model, u.use_relighting_model);
            }
            // No variant section, or a mismatch already rejected above.
            _ => {}
        }
        Ok(())
    }

    /// Check numeric ranges and the `4n+1` frame rule.
    pub fn validate_ranges(&self) -> Result<(), CoreError> {
        let result = match self {
            Configuration::TextToVideo(p) => p.validate(),
            Configuration::ImageToVideo(p) | Configuration::TextAndImageToVideo(p) => p.validate(),
            Configuration::SpeechToVideo(p) => p.validate(),
            Configuration::Animate(p) => p.validate(),
        };
        result.map_err(|errors| CoreError::Validation(errors.to_string()))
    }

    /// Every field of this configuration with its current relevance and
    /// requiredness.
    pub fn fields(&self) -> Vec<FieldState> {
        let base = self.base();
        let mut fields = vec![
            FieldState::required(Field::CheckpointDir),
            FieldState::optional(Field::Resolution),
            FieldState::optional(Field::FrameCount),
            FieldState::optional(Field::Seed),
            FieldState::optional(Field::SampleSteps),
            FieldState::optional(Field::GuidanceScale),
            FieldState::optional(Field::Solver),
            FieldState::optional(Field::Shift),
            FieldState::optional(Field::OffloadToCpu),
            FieldState::optional(Field::EncoderOnCpu),
            FieldState::optional(Field::PromptExpansion),
            FieldState::optional(Field::PromptExpansionMethod).relevant_if(base.prompt_expansion),
            FieldState::optional(Field::OutputPath),
        ];

        match self {
            Configuration::TextToVideo(_) => {
                fields.push(FieldState::required(Field::Prompt));
            }
            Configuration::ImageToVideo(_) => {
                fields.push(FieldState::optional(Field::Prompt));
                fields.push(FieldState::required(Field::ImagePath));
            }
            Configuration::TextAndImageToVideo(_) => {
                fields.push(FieldState::required(Field::Prompt));
                fields.push(FieldState::required(Field::ImagePath));
            }
            Configuration::SpeechToVideo(p) => {
                let tts = p.tts_enabled;
                fields.extend([
                    FieldState::optional(Field::Prompt),
                    FieldState::required(Field::ImagePath),
                    FieldState::required(Field::AudioPath).relevant_if(!tts),
                    FieldState::optional(Field::TtsEnabled),
                    FieldState::required(Field::TtsText).relevant_if(tts),
                    FieldState::optional(Field::TtsReferenceAudio).relevant_if(tts),
                    FieldState::optional(Field::TtsReferenceText).relevant_if(tts),
                    FieldState::optional(Field::PoseVideoPath),
                    FieldState::optional(Field::ClipCount),
                    FieldState::optional(Field::FramesPerClip),
                    FieldState::optional(Field::StartFromReference),
                ]);
            }
            Configuration::Animate(_) => {
                fields.extend([
                    FieldState::required(Field::SourceDataPath),
                    FieldState::optional(Field::ReplaceMode),
                    FieldState::optional(Field::ReferenceFrameCount),
                    FieldState::optional(Field::UseRelightingModel),
                ]);
            }
        }
        fields
    }
}

// ---------------------------------------------------------------------------
// Field descriptors
// ---------------------------------------------------------------------------

/// Names of every configurable field, as they appear in serialized params.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CheckpointDir,
    Resolution,
    FrameCount,
    Seed,
    SampleSteps,
    GuidanceScale,
    Solver,
    Shift,
    OffloadToCpu,
    EncoderOnCpu,
    PromptExpansion,
    PromptExpansionMethod,
    OutputPath,
    Prompt,
    ImagePath,
    AudioPath,
    TtsEnabled,
    TtsText,
    TtsReferenceAudio,
    TtsReferenceText,
    PoseVideoPath,
    ClipCount,
    FramesPerClip,
    StartFromReference,
    SourceDataPath,
    ReplaceMode,
    ReferenceFrameCount,
    UseRelightingModel,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::CheckpointDir => "checkpoint_dir",
            Field::Resolution => "resolution",
            Field::FrameCount => "frame_count",
            Field::Seed => "seed",
            Field::SampleSteps => "sample_steps",
            Field::GuidanceScale => "guidance_scale",
            Field::Solver => "solver",
            Field::Shift => "shift",
            Field::OffloadToCpu => "offload_to_cpu",
            Field::EncoderOnCpu => "encoder_on_cpu",
            Field::PromptExpansion => "prompt_expansion",
            Field::PromptExpansionMethod => "prompt_expansion_method",
            Field::OutputPath => "output_path",
            Field::Prompt => "prompt",
            Field::ImagePath => "image_path",
            Field::AudioPath => "audio_path",
            Field::TtsEnabled => "tts_enabled",
            Field::TtsText => "tts_text",
            Field::TtsReferenceAudio => "tts_reference_audio",
            Field::TtsReferenceText => "tts_reference_text",
            Field::PoseVideoPath => "pose_video_path",
            Field::ClipCount => "clip_count",
            Field::FramesPerClip => "frames_per_clip",
            Field::StartFromReference => "start_from_reference",
            Field::SourceDataPath => "source_data_path",
            Field::ReplaceMode => "replace_mode",
            Field::ReferenceFrameCount => "reference_frame_count",
            Field::UseRelightingModel => "use_relighting_model",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a form should present one field right now.
///
/// `required` is the visual marker; only the fields named by
/// [`crate::gate`] actually block submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldState {
    pub field: Field,
    pub relevant: bool,
    pub required: bool,
}

impl FieldState {
    fn required(field: Field) -> Self {
        Self {
            field,
            relevant: true,
            required: true,
        }
    }

    fn optional(field: Field) -> Self {
        Self {
            field,
            relevant: true,
            required: false,
        }
    }

    /// An irrelevant field is never required.
    fn relevant_if(mut self, relevant: bool) -> Self {
        self.relevant = relevant;
        self.required &= relevant;
        self
    }
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// A partial set of field assignments for one configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationUpdate {
    #[serde(default)]
    pub base: BaseUpdate,
    #[serde(default)]
    pub variant: Option<VariantUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseUpdate {
    pub checkpoint_dir: Option<String>,
    pub resolution: Option<Resolution>,
    pub frame_count: Option<u32>,
    pub seed: Option<i64>,
    pub sample_steps: Option<u32>,
    pub guidance_scale: Option<f64>,
    pub solver: Option<Solver>,
    pub shift: Option<f64>,
    pub offload_to_cpu: Option<bool>,
    pub encoder_on_cpu: Option<bool>,
    pub prompt_expansion: Option<bool>,
    pub prompt_expansion_method: Option<PromptExpansionMethod>,
    pub output_path: Option<String>,
}

impl BaseUpdate {
    fn apply_to(self, base: &mut BaseParams) {
        set(&mut base.checkpoint_dir, self.checkpoint_dir);
        set(&mut base.resolution, self.resolution);
        set(&mut base.frame_count, self.frame_count);
        set(&mut base.seed, self.seed);
        set(&mut base.sample_steps, self.sample_steps);
        set(&mut base.guidance_scale, self.guidance_scale);
        set(&mut base.solver, self.solver);
        set(&mut base.shift, self.shift);
        set(&mut base.offload_to_cpu, self.offload_to_cpu);
        set(&mut base.encoder_on_cpu, self.encoder_on_cpu);
        set(&mut base.prompt_expansion, self.prompt_expansion);
        set(&mut base.prompt_expansion_method, self.prompt_expansion_method);
        set(&mut base.output_path, self.output_path);
    }
}

/// Variant-specific assignments, tagged with the variant they target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "task", rename_all = "kebab-case")]
pub enum VariantUpdate {
    TextToVideo(PromptUpdate),
    ImageToVideo(ImageUpdate),
    TextAndImageToVideo(ImageUpdate),
    SpeechToVideo(SpeechUpdate),
    Animate(AnimateUpdate),
}

impl VariantUpdate {
    pub fn task(&self) -> TaskVariant {
        match self {
            VariantUpdate::TextToVideo(_) => TaskVariant::TextToVideo,
            VariantUpdate::ImageToVideo(_) => TaskVariant::ImageToVideo,
            VariantUpdate::TextAndImageToVideo(_) => TaskVariant::TextAndImageToVideo,
            VariantUpdate::SpeechToVideo(_) => TaskVariant::SpeechToVideo,
            VariantUpdate::Animate(_) => TaskVariant::Animate,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromptUpdate {
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageUpdate {
    pub prompt: Option<String>,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeechUpdate {
    pub prompt: Option<String>,
    pub image_path: Option<String>,
    pub audio_path: Option<String>,
    pub tts_enabled: Option<bool>,
    pub tts_text: Option<String>,
    pub tts_reference_audio: Option<String>,
    pub tts_reference_text: Option<String>,
    pub pose_video_path: Option<String>,
    pub clip_count: Option<u32>,
    pub frames_per_clip: Option<FramesPerClip>,
    pub start_from_reference: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimateUpdate {
    pub source_data_path: Option<String>,
    pub replace_mode: Option<bool>,
    pub reference_frame_count: Option<ReferenceFrameCount>,
    pub use_relighting_model: Option<bool>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
