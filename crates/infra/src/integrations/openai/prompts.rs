//! Prompt text and response schemas
//!
//! Every prompt embeds the request's current time so relative expressions
//! ("明日", "来週月曜") are resolved against the same instant the supplementer
//! uses.

use serde_json::{json, Value};
use yotei_core::TimeReference;
use yotei_domain::TaskType;

pub(crate) const EXTRACTION_FUNCTION: &str = "extract_schedule";
pub(crate) const INTENT_SCHEMA_NAME: &str = "intent_classification";

fn time_header(reference: &TimeReference) -> String {
    format!(
        "現在の日時（{}）は {}（{}）です。\n\
         この日時を、すべての日付・時刻表現を解釈する際の絶対的な基準にしてください。\n",
        reference.timezone().name(),
        reference.prompt_timestamp(),
        reference.weekday_label()
    )
}

/// System prompt for the classifier.
pub(crate) fn intent_system_prompt(reference: &TimeReference) -> String {
    let mut prompt = time_header(reference);
    prompt.push_str(
        "あなたは日本語のスケジュール依頼を分類するアシスタントです。\n\
         ユーザーの発言を次のいずれかに分類してください。\n\
         - availability_check: 日時のみで、予定の内容がない（空き時間の確認）\n\
         - add_event: 日時に加えて予定のタイトルや内容がある（予定の追加）\n\
         - unknown: 日時が読み取れない、または意図が曖昧\n\
         例：「7/8 18時以降」→ availability_check\n\
         例：「・7/10 9-10時\n・7/11 9-10時」→ availability_check\n\
         例：「明日の午前9時から会議を追加して」→ add_event\n\
         例：「来週月曜日の14時から打ち合わせ」→ add_event\n\
         confidence は 0.0〜1.0、reason は判断理由を一文で書いてください。",
    );
    prompt
}

/// System prompt shared by both extraction strategies.
///
/// `json_only` adds the instruction to answer with a bare JSON object, used by
/// the strategy that cannot rely on function calling.
pub(crate) fn extraction_system_prompt(
    reference: &TimeReference,
    intent: TaskType,
    json_only: bool,
) -> String {
    let mut prompt = time_header(reference);
    prompt.push_str(&format!(
        "あなたは日時抽出の専門家です。このメッセージの種類は「{intent}」と判定済みです。\n"
    ));
    prompt.push_str(
        "抽出ルール:\n\
         1. 箇条書き・改行・スペース・句読点で区切られた日時も、すべて個別に抽出する\n\
         2. 今日、明日、来週月曜日などの表現を YYYY-MM-DD の具体的な日付に変換する\n\
         3. 午前9時、14時30分、9-10時、9:00-10:00 などは 24時間表記 HH:MM に変換する\n\
         4. 「18時以降」は 18:00〜23:59、「終日」は 00:00〜23:59 とする\n\
         5. 終日枠は、ユーザーが明示的に「終日」と書いた場合のみ抽出する\n\
         6. 同じ日に部分枠がある場合、その日の終日枠は抽出しない\n\
         7. 1つの日付に複数の時間帯がある場合は、枠ごとに抽出する\n\
         8. 期間指定（例: 12/5-12/8）は開始日を date、終了日を end_date に入れる\n\
         9. availability_check では title と description を入れない\n\
         10. add_event では予定のタイトルを title に、議題や「〜の件」「〜について」を description に入れる\n\
         11. 自分の居場所を location、訪問先を counterpart_location、打ち合わせの長さ（時間）を meeting_duration_hours に入れる\n\
         わからない項目は null にしてください。\n",
    );
    if json_only {
        prompt.push_str(
            "\n次の形式の JSON オブジェクトだけを返してください。説明文は不要です。\n\
             {\"task_type\": \"availability_check\", \"dates\": [{\"date\": \"2025-07-08\", \
             \"time\": \"18:00\", \"end_time\": \"23:59\", \"end_date\": null, \"title\": null, \
             \"description\": null}], \"location\": null, \"counterpart_location\": null, \
             \"meeting_duration_hours\": null}\n",
        );
    }
    prompt
}

fn nullable(kind: &str) -> Value {
    json!({ "type": [kind, "null"] })
}

/// Parameters of the extraction function; strict mode requires every field.
pub(crate) fn extraction_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "task_type": {
                "type": "string",
                "enum": ["availability_check", "add_event"]
            },
            "dates": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "date": { "type": "string", "description": "YYYY-MM-DD" },
                        "time": nullable("string"),
                        "end_time": nullable("string"),
                        "end_date": nullable("string"),
                        "title": nullable("string"),
                        "description": nullable("string")
                    },
                    "required": ["date", "time", "end_time", "end_date", "title", "description"],
                    "additionalProperties": false
                }
            },
            "location": nullable("string"),
            "counterpart_location": nullable("string"),
            "meeting_duration_hours": nullable("number")
        },
        "required": [
            "task_type",
            "dates",
            "location",
            "counterpart_location",
            "meeting_duration_hours"
        ],
        "additionalProperties": false
    })
}

pub(crate) fn intent_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "task_type": {
                "type": "string",
                "enum": ["availability_check", "add_event", "unknown"]
            },
            "confidence": { "type": "number" },
            "reason": { "type": "string" }
        },
        "required": ["task_type", "confidence", "reason"],
        "additionalProperties": false
    })
}
