//! Accept 系ヘッダーパースのプロパティテスト

use pbt::{language_tag, media_range, qvalue_string, token_string};
use proptest::prelude::*;
use shiguredo_conneg::media_type::MediaType;
use shiguredo_conneg::metadata::Metadata;
use shiguredo_conneg::preference::{
    QValue, parse_accept, parse_accept_charset, parse_accept_encoding, parse_accept_language,
    parse_preferences_strict,
};

/// q 以外のパラメータ名
fn parameter_name() -> impl Strategy<Value = String> {
    token_string().prop_filter("not q", |s| !s.eq_ignore_ascii_case("q"))
}

proptest! {
    // ========================================
    // QValue
    // ========================================

    // QValue パース (小数)
    #[test]
    fn qvalue_parse_decimal(value in 0u16..=1000u16) {
        let q = QValue::parse(&qvalue_string(value)).unwrap();
        prop_assert_eq!(q.value(), value);
    }

    // QValue Display のラウンドトリップ
    #[test]
    fn qvalue_display_round_trip(value in 0u16..=1000u16) {
        let q = QValue::parse(&qvalue_string(value)).unwrap();
        let reparsed = QValue::parse(&q.to_string()).unwrap();
        prop_assert_eq!(q, reparsed);
    }

    // 1 を超える q 値は拒否される
    #[test]
    fn qvalue_rejects_above_one(millis in 1001u16..=9999u16) {
        let input = format!("{}.{:03}", millis / 1000, millis % 1000);
        prop_assert!(QValue::parse(&input).is_err());
    }

    // ========================================
    // パース
    // ========================================

    // 任意の入力でパニックしない (寛容モードはエラーも返さない)
    #[test]
    fn parse_never_panics(input in ".*") {
        let _ = parse_accept(&input);
        let _ = parse_accept_charset(&input);
        let _ = parse_accept_encoding(&input);
        let _ = parse_accept_language(&input);
        let _ = parse_preferences_strict::<MediaType>(&input);
    }

    // 単一エントリのラウンドトリップ: 名前・パラメータ・q 値が一致する
    #[test]
    fn single_entry_round_trip(
        range in media_range(),
        name in parameter_name(),
        value in token_string(),
        millis in 1u16..=999u16,
    ) {
        let header = format!("{};{}={};q={}", range, name, value, qvalue_string(millis));
        let prefs = parse_accept(&header);
        prop_assert_eq!(prefs.len(), 1);
        prop_assert_eq!(prefs[0].metadata().name(), range);
        prop_assert_eq!(
            prefs[0].metadata().parameter(&name),
            Some(value.as_str())
        );
        prop_assert_eq!(prefs[0].quality().value(), millis);
    }

    // q 値なしのエントリはデフォルト q=1
    #[test]
    fn default_quality_is_one(range in media_range()) {
        let prefs = parse_accept(&range);
        prop_assert_eq!(prefs.len(), 1);
        prop_assert_eq!(prefs[0].quality().value(), 1000);
    }

    // エントリ数と宣言順が保存される
    #[test]
    fn entries_keep_declaration_order(
        ranges in proptest::collection::vec(media_range(), 1..=5),
    ) {
        let header = ranges.join(", ");
        let prefs = parse_accept(&header);
        prop_assert_eq!(prefs.len(), ranges.len());
        for (pref, range) in prefs.iter().zip(&ranges) {
            prop_assert_eq!(&pref.metadata().name(), range);
        }
    }

    // 不正なエントリを差し込んでも有効なエントリは生き残る
    #[test]
    fn malformed_entries_do_not_poison_valid_ones(
        first in media_range(),
        second in media_range(),
    ) {
        let header = format!("{}, ;bad, {}", first, second);
        let prefs = parse_accept(&header);
        prop_assert_eq!(prefs.len(), 2);
        prop_assert_eq!(prefs[0].metadata().name(), first);
        prop_assert_eq!(prefs[1].metadata().name(), second);
    }

    // パース → Display → パース で同じプリファレンス列になる
    #[test]
    fn display_round_trip(
        ranges in proptest::collection::vec(media_range(), 1..=4),
        millis in 1u16..=1000u16,
    ) {
        let header = ranges
            .iter()
            .map(|r| format!("{};q={}", r, qvalue_string(millis)))
            .collect::<Vec<_>>()
            .join(", ");
        let prefs = parse_accept(&header);
        let displayed = prefs
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let reparsed = parse_accept(&displayed);
        prop_assert_eq!(prefs, reparsed);
    }

    // ========================================
    // ファミリーごとのパース
    // ========================================

    // 文字セット / エンコーディングはトークンをそのまま受け付ける
    #[test]
    fn charset_and_encoding_tokens(token in token_string(), millis in 1u16..=999u16) {
        let header = format!("{};q={}", token, qvalue_string(millis));

        let prefs = parse_accept_charset(&header);
        prop_assert_eq!(prefs.len(), 1);
        prop_assert_eq!(prefs[0].metadata().name(), token.to_ascii_lowercase());
        prop_assert_eq!(prefs[0].quality().value(), millis);

        let prefs = parse_accept_encoding(&header);
        prop_assert_eq!(prefs.len(), 1);
        prop_assert_eq!(prefs[0].quality().value(), millis);
    }

    // 有効な言語タグは必ずパースできる
    #[test]
    fn valid_language_tags_parse(tag in language_tag()) {
        let prefs = parse_accept_language(&tag);
        prop_assert_eq!(prefs.len(), 1);
        prop_assert_eq!(prefs[0].metadata().name(), tag);
    }

    // 言語プリファレンスはパラメータを保持しない
    #[test]
    fn language_preferences_drop_parameters(
        tag in language_tag(),
        name in parameter_name(),
        value in token_string(),
    ) {
        let header = format!("{};{}={}", tag, name, value);
        let prefs = parse_accept_language(&header);
        prop_assert_eq!(prefs.len(), 1);
        prop_assert!(prefs[0].parameters().is_empty());
    }
}
