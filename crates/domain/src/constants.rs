//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Time reference
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";
pub const PROMPT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";
/// `date` field of the JSON output.
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";
/// `time`/`end_time` fields of the JSON output.
pub const WIRE_TIME_FORMAT: &str = "%H:%M";

// Default windows (hour, minute)
pub const BUSINESS_DAY_START: (u32, u32) = (9, 0);
pub const BUSINESS_DAY_END: (u32, u32) = (18, 0);
pub const LUNCH_WINDOW_START: (u32, u32) = (11, 0);
pub const LUNCH_WINDOW_END: (u32, u32) = (14, 0);
pub const ALL_DAY_END: (u32, u32) = (23, 59);

/// End of an event with only a start.
pub const DEFAULT_EVENT_DURATION_MINUTES: i64 = 60;

/// Longest `meeting_duration_hours` accepted from a model reply.
pub const MAX_MEETING_DURATION_HOURS: f64 = 24.0;

/// Upper bound on the number of days a single range expression may expand to.
pub const MAX_EXPANDED_RANGE_DAYS: i64 = 62;

// Intent classification
pub const CLASSIFIER_FALLBACK_CONFIDENCE: f32 = 0.5;
pub const CLASSIFIER_FALLBACK_REASON: &str = "classification unavailable; defaulted to availability_check";

// Travel buffers
pub const DEFAULT_TRAVEL_BUFFER_MINUTES: u32 = 60;
pub const OUTBOUND_TRAVEL_LABEL: &str = "移動（往路）";
pub const RETURN_TRAVEL_LABEL: &str = "移動（復路）";
/// Any of these in the message turns on travel buffers.
pub const TRAVEL_KEYWORDS: &[&str] = &["移動", "往復", "出張", "訪問", "現地"];

pub const LUNCH_KEYWORDS: &[&str] = &["ランチ", "lunch", "昼食", "昼ご飯", "お昼", "ひるごはん"];

/// The only word that allows a `00:00–23:59` slot.
pub const ALL_DAY_KEYWORD: &str = "終日";

/// Placeholder title prefix/suffix: `予定（2025-01-10 09:00〜10:00）`.
pub const PLACEHOLDER_TITLE_PREFIX: &str = "予定（";
pub const PLACEHOLDER_TITLE_SUFFIX: &str = "）";

/// Returned to the user when nothing could be extracted.
pub const EXTRACTION_GUIDANCE: &str = "イベント情報を正しく認識できませんでした。\n\n\
・日時を打つと空き時間を返します\n\
・予定を打つとカレンダーに追加します\n\n\
例：\n\
『明日の午前9時から会議を追加して』\n\
『来週月曜日の14時から打ち合わせ』";

// Language model defaults
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_PRIMARY_MODEL: &str = "gpt-4o";
pub const DEFAULT_FALLBACK_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
