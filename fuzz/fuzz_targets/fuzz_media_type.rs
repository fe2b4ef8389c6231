#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_conneg::media_type::MediaType;
use shiguredo_conneg::metadata::{CharacterSet, Encoding, Language, Metadata};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(mt) = MediaType::parse(s) {
            let _ = mt.main_type();
            let _ = mt.subtype();
            let _ = mt.parameters();
            assert!(mt.includes(&mt));
            assert!(MediaType::all().includes(&mt));

            let displayed = mt.to_string();
            let reparsed = MediaType::parse(&displayed).unwrap();
            assert_eq!(mt, reparsed);
        }

        if let Ok(cs) = CharacterSet::parse(s) {
            assert!(cs.includes(&cs));
            assert_eq!(CharacterSet::parse(&cs.to_string()).unwrap(), cs);
        }

        if let Ok(enc) = Encoding::parse(s) {
            assert!(enc.includes(&enc));
            assert_eq!(Encoding::parse(&enc.to_string()).unwrap(), enc);
        }

        if let Ok(lang) = Language::parse(s) {
            assert!(lang.includes(&lang));
            assert_eq!(Language::parse(&lang.to_string()).unwrap(), lang);
            let mut parent = lang.parent();
            while let Some(p) = parent {
                parent = p.parent();
            }
        }
    }
});
