//! Travel-time estimates between Japanese place names
//!
//! A static table of one-way minutes between well-known areas, with alias
//! folding (`東京駅` → `東京`) and coarse regional fallbacks for pairs the
//! table does not list.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;

/// One-way minutes between two areas; looked up in both directions.
const ROUTES: &[(&str, &str, u32)] = &[
    // Central Tokyo
    ("東京", "銀座", 10),
    ("東京", "新宿", 15),
    ("東京", "渋谷", 20),
    ("東京", "品川", 10),
    ("東京", "池袋", 15),
    ("東京", "上野", 10),
    ("東京", "秋葉原", 5),
    ("銀座", "新宿", 20),
    ("銀座", "渋谷", 25),
    ("銀座", "品川", 15),
    ("銀座", "池袋", 30),
    ("新宿", "渋谷", 10),
    ("新宿", "池袋", 10),
    // Kanagawa
    ("東京", "横浜", 30),
    ("銀座", "横浜", 40),
    ("新宿", "横浜", 35),
    ("渋谷", "横浜", 30),
    ("品川", "横浜", 20),
    ("東京", "みなとみらい", 40),
    ("銀座", "みなとみらい", 50),
    ("東京", "川崎", 20),
    ("銀座", "川崎", 30),
    // Saitama
    ("東京", "大宮", 30),
    ("新宿", "大宮", 35),
    ("池袋", "大宮", 25),
    ("東京", "浦和", 25),
    ("東京", "さいたま", 30),
    // Chiba
    ("東京", "千葉", 40),
    ("東京", "船橋", 30),
    ("東京", "柏", 35),
    ("秋葉原", "千葉", 40),
    // Long distance
    ("東京", "大阪", 180),
    ("東京", "京都", 165),
    ("東京", "神戸", 200),
    ("新宿", "大阪", 190),
    ("品川", "大阪", 175),
    ("東京", "名古屋", 110),
    ("東京", "仙台", 95),
    ("東京", "広島", 240),
    ("東京", "福岡", 300),
    // Kansai
    ("大阪", "京都", 30),
    ("大阪", "神戸", 25),
    ("大阪", "奈良", 40),
    ("京都", "神戸", 50),
    // Chubu
    ("名古屋", "岐阜", 20),
    ("名古屋", "豊田", 30),
];

const ALIASES: &[(&str, &str)] = &[
    ("東京駅", "東京"),
    ("東京都", "東京"),
    ("銀座駅", "銀座"),
    ("新宿駅", "新宿"),
    ("渋谷駅", "渋谷"),
    ("横浜駅", "横浜"),
    ("横浜市", "横浜"),
    ("大阪駅", "大阪"),
    ("大阪市", "大阪"),
    ("梅田", "大阪"),
    ("なんば", "大阪"),
    ("難波", "大阪"),
    ("京都駅", "京都"),
    ("京都市", "京都"),
];

const MAJOR_CITIES: &[&str] = &["東京", "大阪", "名古屋", "福岡", "札幌", "仙台", "広島", "京都", "神戸"];

const TOKYO_AREA: &[&str] = &["東京", "銀座", "新宿", "渋谷", "品川", "池袋", "上野", "秋葉原"];

/// Between two different major cities.
const INTERCITY_MINUTES: u32 = 180;
/// Unlisted pair with one end inside central Tokyo.
const TOKYO_AREA_MINUTES: u32 = 45;
/// Anything else.
const UNKNOWN_PAIR_MINUTES: u32 = 60;

lazy_static! {
    static ref ROUTE_TABLE: HashMap<(&'static str, &'static str), u32> = ROUTES
        .iter()
        .flat_map(|&(a, b, minutes)| [((a, b), minutes), ((b, a), minutes)])
        .collect();
}

/// Outbound and return legs of a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundTrip {
    /// To the meeting.
    pub outbound_minutes: u32,
    /// Back from the meeting.
    pub return_minutes: u32,
    /// The meeting itself.
    pub meeting_minutes: u32,
    /// Sum of all three.
    pub total_required_minutes: u32,
}

/// Table-driven estimator. Cheap to construct and `Copy`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TravelTimeEstimator;

impl TravelTimeEstimator {
    pub const fn new() -> Self {
        Self
    }

    /// Fold aliases and surrounding whitespace into a canonical area name.
    pub fn normalize_place(place: &str) -> String {
        let trimmed: String = place.chars().filter(|c| !c.is_whitespace()).collect();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == trimmed)
            .map_or(trimmed, |(_, canonical)| (*canonical).to_string())
    }

    /// One-way minutes from `from` to `to`. Same place is zero.
    pub fn estimate_minutes(&self, from: &str, to: &str) -> u32 {
        let from = Self::normalize_place(from);
        let to = Self::normalize_place(to);
        if from == to {
            return 0;
        }
        if let Some(minutes) = ROUTE_TABLE.get(&(from.as_str(), to.as_str())) {
            return *minutes;
        }
        let is_major = |place: &str| MAJOR_CITIES.contains(&place);
        let in_tokyo = |place: &str| TOKYO_AREA.contains(&place);
        if is_major(&from) && is_major(&to) {
            INTERCITY_MINUTES
        } else if in_tokyo(&from) || in_tokyo(&to) {
            TOKYO_AREA_MINUTES
        } else {
            UNKNOWN_PAIR_MINUTES
        }
    }

    /// Outbound, return and the total time blocked for a meeting.
    pub fn round_trip(&self, from: &str, to: &str, meeting_minutes: u32) -> RoundTrip {
        let outbound_minutes = self.estimate_minutes(from, to);
        let return_minutes = outbound_minutes;
        RoundTrip {
            outbound_minutes,
            return_minutes,
            meeting_minutes,
            total_required_minutes: outbound_minutes + meeting_minutes + return_minutes,
        }
    }
}
