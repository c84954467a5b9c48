//! Command compiler: renders a [`Configuration`] into the `generate.py`
//! invocation the external program expects.
//!
//! The output is a display string meant to be copied by a user. String
//! values are wrapped in double quotes verbatim: embedded quotes, `$`,
//! backslashes and the like are NOT escaped, so the result is not
//! shell-safe.
//!
//! Argument order is fixed: the base flags first, then the variant tail.
//! Optional values that are empty produce no argument at all.

use std::fmt;

use serde::Serialize;

use crate::params::{Configuration, SEED_RANDOM};

/// Program invocation, always the first argument.
pub const PROGRAM: &str = "python generate.py";

/// Separator used by [`CommandLine::render`] between arguments.
pub const LINE_CONTINUATION: &str = " \\\n  ";

/// A compiled command: an ordered list of arguments, each either a bare flag
/// (`--start_from_ref`) or a flag with its value (`--size 1280*720`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    args: Vec<String>,
}

impl CommandLine {
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Multi-line display form, one argument per line.
    pub fn render(&self) -> String {
        self.args.join(LINE_CONTINUATION)
    }

    /// The same command on one line.
    pub fn to_single_line(&self) -> String {
        self.args.join(" ")
    }

    /// Whether an argument for `flag` is present.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.arg(flag).is_some()
    }

    /// The full argument for `flag`, e.g. `--size 1280*720`.
    pub fn arg(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .map(String::as_str)
            .find(|arg| {
                *arg == flag
                    || arg
                        .strip_prefix(flag)
                        .is_some_and(|rest| rest.starts_with(' '))
            })
    }

    /// Position of the argument for `flag`, if present.
    pub fn position(&self, flag: &str) -> Option<usize> {
        let arg = self.arg(flag)?;
        self.args.iter().position(|a| a == arg)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Accumulates arguments in order.
struct Args(Vec<String>);

impl Args {
    fn flag(&mut self, flag: &str) {
        self.0.push(flag.to_string());
    }

    fn flag_if(&mut self, flag: &str, set: bool) {
        if set {
            self.flag(flag);
        }
    }

    fn value(&mut self, flag: &str, value: impl fmt::Display) {
        self.0.push(format!("{flag} {value}"));
    }

    fn quoted(&mut self, flag: &str, value: &str) {
        self.0.push(format!("{flag} \"{value}\""));
    }

    /// Quoted value, skipped when blank.
    fn quoted_if_present(&mut self, flag: &str, value: &str) {
        if !value.trim().is_empty() {
            self.quoted(flag, value);
        }
    }
}

/// Compile a configuration into its command line. Pure: the same
/// configuration always yields the same arguments.
pub fn compile(config: &Configuration) -> CommandLine {
    let base = config.base();
    let mut args = Args(vec![PROGRAM.to_string()]);

    args.value("--task", config.task());
    args.quoted("--ckpt_dir", &base.checkpoint_dir);
    args.value("--size", base.resolution);
    args.value("--frame_num", base.frame_count);
    if base.seed != SEED_RANDOM {
        args.value("--base_seed", base.seed);
    }
    args.value("--sample_steps", base.sample_steps);
    args.value("--sample_guide_scale", base.guidance_scale);
    args.value("--sample_solver", base.solver);
    args.value("--sample_shift", base.shift);
    if base.offload_to_cpu {
        args.value("--offload_model", "True");
    }
    if base.encoder_on_cpu {
        args.value("--t5_cpu", "True");
    }
    if base.prompt_expansion {
        args.flag("--use_prompt_extend");
        args.value("--prompt_extend_method", base.prompt_expansion_method);
    }
    args.quoted_if_present("--save_file", &base.output_path);

    match config {
        Configuration::TextToVideo(p) => {
            args.quoted_if_present("--prompt", &p.prompt);
        }
        Configuration::ImageToVideo(p) | Configuration::TextAndImageToVideo(p) => {
            args.quoted_if_present("--prompt", &p.prompt);
            args.quoted_if_present("--image", &p.image_path);
        }
        Configuration::SpeechToVideo(p) => {
            args.quoted_if_present("--prompt", &p.prompt);
            args.quoted_if_present("--image", &p.image_path);
            if p.tts_enabled {
                args.flag("--enable_tts");
                args.quoted_if_present("--tts_text", &p.tts_text);
                args.quoted_if_present("--tts_prompt_audio", &p.tts_reference_audio);
                args.quoted_if_present("--tts_prompt_text", &p.tts_reference_text);
            } else {
                args.quoted_if_present("--audio", &p.audio_path);
            }
            args.quoted_if_present("--pose_video", &p.pose_video_path);
            args.value("--num_clip", p.clip_count);
            args.value("--infer_frames", p.frames_per_clip.count());
            args.flag_if("--start_from_ref", p.start_from_reference);
        }
        Configuration::Animate(p) => {
            args.quoted_if_present("--src_root_path", &p.source_data_path);
            args.flag_if("--replace_flag", p.replace_mode);
            args.value("--refert_num", p.reference_frame_count.count());
            args.flag_if("--use_relighting_lora", p.use_relighting_model);
        }
    }

    CommandLine { args: args.0 }
}
