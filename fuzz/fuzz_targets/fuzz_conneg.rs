#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiguredo_conneg::conneg::{Negotiation, NegotiationOptions};
use shiguredo_conneg::media_type::MediaType;
use shiguredo_conneg::metadata::{CharacterSet, Language};
use shiguredo_conneg::preference::ClientPreferences;
use shiguredo_conneg::variant::Variant;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    accept: Option<&'a str>,
    accept_charset: Option<&'a str>,
    accept_encoding: Option<&'a str>,
    accept_language: Option<&'a str>,
    variants: Vec<(&'a str, bool, bool)>,
    strict: bool,
    require_character_set: bool,
    require_language: bool,
}

fuzz_target!(|input: Input<'_>| {
    let prefs = ClientPreferences::from_headers(
        input.accept,
        input.accept_charset,
        input.accept_encoding,
        input.accept_language,
    );

    let variants: Vec<Variant> = input
        .variants
        .iter()
        .filter_map(|(media_type, with_charset, with_language)| {
            let mut variant = Variant::new(MediaType::parse(media_type).ok()?);
            if *with_charset {
                variant = variant.with_character_set(CharacterSet::utf_8());
            }
            if *with_language {
                variant = variant.with_language(Language::japanese());
            }
            Some(variant)
        })
        .collect();

    let options = NegotiationOptions {
        strict: input.strict,
        require_character_set: input.require_character_set,
        require_encoding: false,
        require_language: input.require_language,
    };
    let negotiation = Negotiation::with_options(&prefs, options);

    // 決定性: 同じ入力なら同じ結果
    let first = negotiation.preferred_variant(&variants);
    let second = negotiation.preferred_variant(&variants);
    assert_eq!(first, second);

    // 選択されたバリアントは必ず受理可能 (スコアを持つ)
    if let Some(selected) = first {
        assert!(negotiation.score_variant(selected).is_some());
    }
});
