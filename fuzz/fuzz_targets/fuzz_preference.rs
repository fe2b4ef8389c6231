#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_conneg::media_type::MediaType;
use shiguredo_conneg::metadata::Metadata;
use shiguredo_conneg::preference::{
    parse_accept, parse_accept_charset, parse_accept_encoding, parse_accept_language,
    parse_preferences_strict,
};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        for pref in parse_accept(s) {
            let _ = pref.metadata().name();
            let _ = pref.metadata().parameters();
            let _ = pref.quality().value();
            let _ = pref.quality().as_f32();
            // 寛容パースの結果は Display でラウンドトリップできる
            let displayed = pref.to_string();
            let reparsed = parse_accept(&displayed);
            assert_eq!(reparsed.len(), 1);
            assert_eq!(&reparsed[0], &pref);
        }

        for pref in parse_accept_charset(s) {
            let _ = pref.metadata().name();
            let _ = pref.quality().value();
            assert!(pref.parameters().is_empty());
        }

        for pref in parse_accept_encoding(s) {
            let _ = pref.metadata().name();
            let _ = pref.quality().value();
        }

        for pref in parse_accept_language(s) {
            let _ = pref.metadata().primary();
            let _ = pref.metadata().sub_tags();
            let _ = pref.metadata().parent();
        }

        // 厳格モードが成功するなら寛容モードは同じ結果を返す
        if let Ok(strict) = parse_preferences_strict::<MediaType>(s) {
            assert_eq!(parse_accept(s), strict);
        }
    }
});
