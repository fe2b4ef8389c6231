//! PBT テスト共通ユーティリティ

use proptest::prelude::*;

// ========================================
// トークン生成 (RFC 9110)
// ========================================

/// HTTP トークン (安全な文字のみ使用)
pub fn token_string() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9._-]{1,8}"
}

/// メディアタイプのメインタイプ
pub fn media_main_type() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

/// メディアタイプのサブタイプ
pub fn media_subtype() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,8}"
}

/// メディアレンジ: `*/*`, `type/*`, `type/subtype`
pub fn media_range() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("*/*".to_string()),
        media_main_type().prop_map(|main| format!("{}/*", main)),
        (media_main_type(), media_subtype())
            .prop_map(|(main, sub)| format!("{}/{}", main, sub)),
    ]
}

// ========================================
// 言語タグ生成 (BCP 47/RFC 5646)
// ========================================

/// 先頭サブタグ: ALPHA のみ (1-8 文字)
pub fn language_primary_subtag() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,8}"
}

/// 後続サブタグ: ALPHA / DIGIT (1-8 文字)
pub fn language_subsequent_subtag() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,8}"
}

/// 言語タグ: primary-subtag *("-" subtag)
pub fn language_tag() -> impl Strategy<Value = String> {
    (
        language_primary_subtag(),
        proptest::collection::vec(language_subsequent_subtag(), 0..=2),
    )
        .prop_map(|(primary, rest)| {
            if rest.is_empty() {
                primary
            } else {
                format!("{}-{}", primary, rest.join("-"))
            }
        })
}

// ========================================
// q 値生成
// ========================================

/// ミリ単位の q 値を文字列化 (最短形式)
pub fn qvalue_string(value: u16) -> String {
    if value >= 1000 {
        return "1".to_string();
    }
    if value == 0 {
        return "0".to_string();
    }

    let mut frac = format!("{:03}", value);
    while frac.ends_with('0') {
        frac.pop();
    }
    format!("0.{}", frac)
}
