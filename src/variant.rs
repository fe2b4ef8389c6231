//! バリアント (サーバー側の表現候補)
//!
//! ## 概要
//!
//! リソースが提供できる 1 つの表現を記述します。メディアタイプは必須、
//! 文字セット / エンコーディング / 言語 / サイズはオプションです。
//! リソース層がネゴシエーションの前に構築し、ネゴシエーション中は
//! 読み取り専用です。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_conneg::metadata::{CharacterSet, Language};
//! use shiguredo_conneg::media_type::MediaType;
//! use shiguredo_conneg::variant::Variant;
//!
//! let variant = Variant::new(MediaType::text_html())
//!     .with_character_set(CharacterSet::utf_8())
//!     .with_language(Language::japanese())
//!     .with_size(1024);
//! assert_eq!(variant.media_type(), &MediaType::text_html());
//! assert_eq!(variant.size(), Some(1024));
//! ```

use crate::media_type::MediaType;
use crate::metadata::{CharacterSet, Encoding, Language};

/// サーバーが提供する表現候補
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    media_type: MediaType,
    character_set: Option<CharacterSet>,
    encoding: Option<Encoding>,
    language: Option<Language>,
    size: Option<u64>,
}

impl Variant {
    /// 新しいバリアントを作成
    pub fn new(media_type: MediaType) -> Self {
        Variant {
            media_type,
            character_set: None,
            encoding: None,
            language: None,
            size: None,
        }
    }

    /// 文字セットを設定 (ビルダーパターン)
    pub fn with_character_set(mut self, character_set: CharacterSet) -> Self {
        self.character_set = Some(character_set);
        self
    }

    /// エンコーディングを設定 (ビルダーパターン)
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// 言語を設定 (ビルダーパターン)
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// 表現のバイトサイズを設定 (ビルダーパターン)
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// メディアタイプ
    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    /// 文字セット
    pub fn character_set(&self) -> Option<&CharacterSet> {
        self.character_set.as_ref()
    }

    /// エンコーディング
    pub fn encoding(&self) -> Option<&Encoding> {
        self.encoding.as_ref()
    }

    /// 言語
    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }

    /// 表現のバイトサイズ
    pub fn size(&self) -> Option<u64> {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_all_fields() {
        let variant = Variant::new(MediaType::application_json())
            .with_character_set(CharacterSet::utf_8())
            .with_encoding(Encoding::gzip())
            .with_language(Language::english())
            .with_size(42);

        assert_eq!(variant.media_type(), &MediaType::application_json());
        assert_eq!(variant.character_set(), Some(&CharacterSet::utf_8()));
        assert_eq!(variant.encoding(), Some(&Encoding::gzip()));
        assert_eq!(variant.language(), Some(&Language::english()));
        assert_eq!(variant.size(), Some(42));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let variant = Variant::new(MediaType::text_plain());
        assert!(variant.character_set().is_none());
        assert!(variant.encoding().is_none());
        assert!(variant.language().is_none());
        assert!(variant.size().is_none());
    }
}
