//! `[Script Info]` and `[Aegisub Project Garbage]` records
//!
//! Both sections are open-ended `Key: Value` lists. Only the keys declared
//! here are kept; anything else is dropped on decode. Keys that never
//! appeared stay `None` and are not written back.

use crate::schema::{self, schema_record, AssBool, Schema};
use crate::time::FrameRate;

schema_record! {
    /// Script metadata from `[Script Info]`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ass_kfx::parser::ast::ScriptInfo;
    /// use ass_kfx::schema::AssBool;
    ///
    /// let mut info = ScriptInfo::default_aegisub();
    /// info.set_play_res((1920, 1080));
    /// assert_eq!(info.play_res(), Some((1920, 1080)));
    /// assert_eq!(info.scaled_border_and_shadow(), Some(AssBool::Yes));
    /// ```
    pub struct ScriptInfo {
        "Title" as "title" => pub title: String,
        "ScriptType" as "script_type" => pub script_type: String,
        /// Line breaking mode (0-3)
        "WrapStyle" as "wrap_style" => pub wrap_style: i64,
        /// Use script resolution rather than video resolution for border and shadow
        "ScaledBorderAndShadow" as "scaled_border_and_shadow" => scaled_border_and_shadow: AssBool,
        "YCbCr Matrix" as "y_cb_cr__matrix" => pub ycbcr_matrix: String,
        /// Script width
        "PlayResX" as "play_res_x" => pub play_res_x: i64,
        /// Script height
        "PlayResY" as "play_res_y" => pub play_res_y: i64,
        "LayoutResX" as "layout_res_x" => pub layout_res_x: i64,
        "LayoutResY" as "layout_res_y" => pub layout_res_y: i64,
        "Original Script" as "original__script" => pub original_script: String,
        "Original Translation" as "original__translation" => pub original_translation: String,
        "Original Editing" as "original__editing" => pub original_editing: String,
        "Original Timing" as "original__timing" => pub original_timing: String,
        "Synch Point" as "synch__point" => pub synch_point: String,
        "Script Updated By" as "script__updated__by" => pub script_updated_by: String,
        "Update Details" as "update__details" => pub update_details: String,
        "Collisions" as "collisions" => pub collisions: String,
        /// Kept as text, legacy files write it with four decimals
        "Timer" as "timer" => pub timer: String,
        "PlayDepth" as "play_depth" => pub play_depth: i64,
    }
}

impl ScriptInfo {
    /// The `[Script Info]` Aegisub writes for a new file
    #[must_use]
    pub fn default_aegisub() -> Self {
        let mut info = Self {
            title: Some("Default Aegisub file".to_string()),
            script_type: Some("v4.00+".to_string()),
            wrap_style: Some(0),
            ycbcr_matrix: Some("None".to_string()),
            ..Self::default()
        };
        info.set_scaled_border_and_shadow(true);
        info
    }

    /// `ScaledBorderAndShadow` flag
    #[must_use]
    pub const fn scaled_border_and_shadow(&self) -> Option<AssBool> {
        self.scaled_border_and_shadow
    }

    /// Set `ScaledBorderAndShadow` from a plain or three-state boolean
    pub fn set_scaled_border_and_shadow(&mut self, value: impl Into<AssBool>) {
        self.scaled_border_and_shadow = Some(value.into());
    }

    /// Script resolution, when both axes are set
    #[must_use]
    pub const fn play_res(&self) -> Option<(i64, i64)> {
        match (self.play_res_x, self.play_res_y) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    }

    /// Set both `PlayResX` and `PlayResY`
    pub fn set_play_res(&mut self, (x, y): (i64, i64)) {
        self.play_res_x = Some(x);
        self.play_res_y = Some(y);
    }
}

schema_record! {
    /// Editor state from `[Aegisub Project Garbage]`
    pub struct ProjectGarbage {
        "Automation Scripts" as "automation__scripts" => pub automation_scripts: String,
        "Export Encoding" as "export__encoding" => pub export_encoding: String,
        "Last Style Storage" as "last__style__storage" => pub last_style_storage: String,
        /// Loaded audio path
        "Audio File" as "audio__file" => pub audio_file: String,
        /// Loaded video path
        "Video File" as "video__file" => pub video_file: String,
        "Video AR Mode" as "video__a_r__mode" => pub video_ar_mode: i64,
        "Video AR Value" as "video__a_r__value" => pub video_ar_value: f64,
        "Video Zoom Percent" as "video__zoom__percent" => pub video_zoom_percent: f64,
        "Video Position" as "video__position" => pub video_position: i64,
        "Active Line" as "active__line" => pub active_line: i64,
        "Keyframes File" as "keyframes__file" => pub keyframes_file: String,
        "Scroll Position" as "scroll__position" => pub scroll_position: i64,
    }
}

impl ProjectGarbage {
    /// Video and audio paths
    #[must_use]
    pub fn file(&self) -> (Option<&str>, Option<&str>) {
        (self.video_file.as_deref(), self.audio_file.as_deref())
    }

    /// Load the same file as both video and audio
    pub fn set_file(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.video_file = Some(path.clone());
        self.audio_file = Some(path);
    }
}

/// Document-wide metadata shared by every line
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meta {
    pub script_info: ScriptInfo,
    pub project_garbage: ProjectGarbage,
    /// Frame rate of the video the script is timed against
    pub fps: FrameRate,
}

impl Meta {
    /// Metadata of a fresh Aegisub file at 24000/1001 fps
    #[must_use]
    pub fn default_aegisub() -> Self {
        Self {
            script_info: ScriptInfo::default_aegisub(),
            project_garbage: ProjectGarbage::default(),
            fps: FrameRate::NTSC_FILM,
        }
    }

    /// Play resolution from `[Script Info]`
    #[must_use]
    pub const fn play_res(&self) -> Option<(i64, i64)> {
        self.script_info.play_res()
    }

    /// Render `[Script Info]` with leading comment lines
    #[must_use]
    pub fn script_info_text(&self, comment: &[&str]) -> String {
        schema::encode(&self.script_info, comment)
    }

    /// Render `[Aegisub Project Garbage]`
    #[must_use]
    pub fn project_garbage_text(&self) -> String {
        schema::encode(&self.project_garbage, &[])
    }

    /// Whether any field of either record is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.script_info.present_count() == 0 && self.project_garbage.present_count() == 0
    }
}
