//! メタデータモデル (RFC 9110 Section 12.5)
//!
//! ## 概要
//!
//! コンテントネゴシエーションの各次元 (メディアタイプ / 文字セット /
//! エンコーディング / 言語) に共通の [`Metadata`] トレイトと、
//! 文字セット / エンコーディング / 言語の値型を提供します。
//! メディアタイプは [`crate::media_type::MediaType`] を参照。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_conneg::metadata::{Language, Metadata};
//!
//! let en_us = Language::parse("en-US").unwrap();
//! assert_eq!(en_us.primary(), "en");
//! assert_eq!(en_us.parent(), Some(Language::english()));
//! assert!(Language::all().includes(&en_us));
//! ```

use core::fmt;

use crate::error::ParseError;
use crate::reader::is_valid_token;

/// ネゴシエーション可能なメタデータ
///
/// 各ファミリーは名前 (大文字小文字を区別しない)、ワイルドカード、
/// ワイルドカードを考慮した包含判定を持つ。`includes` は反射的であり、
/// ワイルドカードは同ファミリーのあらゆる値を包含する。
pub trait Metadata: Clone + PartialEq + fmt::Display {
    /// ワイルドカード値 (`*` / `*/*`)
    fn all() -> Self;

    /// 名前 (正規化済み)
    fn name(&self) -> String;

    /// ワイルドカードかどうか
    fn is_wildcard(&self) -> bool;

    /// `self` が `other` を包含するかどうか
    fn includes(&self, other: &Self) -> bool;

    /// パース済みの名前とパラメータ列から構築
    ///
    /// パラメータを持たないファミリー (文字セット / エンコーディング / 言語)
    /// はパラメータを破棄する。
    fn from_parts(name: &str, parameters: Vec<(String, String)>) -> Result<Self, ParseError>;

    /// プリファレンスにパラメータを保持するファミリーかどうか
    ///
    /// メディアタイプのみ true。それ以外のファミリーでは q 以外の
    /// パラメータは定義されていないため破棄する。
    fn keeps_parameters() -> bool {
        false
    }
}

/// 文字セット
///
/// 名前は構築時に小文字へ正規化する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSet {
    name: String,
}

impl CharacterSet {
    /// 新しい文字セットを作成
    pub fn new(name: &str) -> Self {
        CharacterSet {
            name: name.to_ascii_lowercase(),
        }
    }

    /// 文字セット名をパース
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if input != "*" && !is_valid_token(input) {
            return Err(ParseError::InvalidToken);
        }
        Ok(CharacterSet::new(input))
    }

    /// `utf-8`
    pub fn utf_8() -> Self {
        CharacterSet::new("utf-8")
    }

    /// `iso-8859-1`
    pub fn iso_8859_1() -> Self {
        CharacterSet::new("iso-8859-1")
    }

    /// `us-ascii`
    pub fn us_ascii() -> Self {
        CharacterSet::new("us-ascii")
    }
}

impl Metadata for CharacterSet {
    fn all() -> Self {
        CharacterSet {
            name: "*".to_string(),
        }
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn is_wildcard(&self) -> bool {
        self.name == "*"
    }

    fn includes(&self, other: &Self) -> bool {
        self.is_wildcard() || self.name == other.name
    }

    fn from_parts(name: &str, _parameters: Vec<(String, String)>) -> Result<Self, ParseError> {
        CharacterSet::parse(name)
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// コンテントコーディング
///
/// 名前は構築時に小文字へ正規化する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    name: String,
}

impl Encoding {
    /// 新しいエンコーディングを作成
    pub fn new(name: &str) -> Self {
        Encoding {
            name: name.to_ascii_lowercase(),
        }
    }

    /// エンコーディング名をパース
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if input != "*" && !is_valid_token(input) {
            return Err(ParseError::InvalidToken);
        }
        Ok(Encoding::new(input))
    }

    /// `identity` (変換なし)
    pub fn identity() -> Self {
        Encoding::new("identity")
    }

    /// `gzip`
    pub fn gzip() -> Self {
        Encoding::new("gzip")
    }

    /// `deflate`
    pub fn deflate() -> Self {
        Encoding::new("deflate")
    }

    /// `br` (Brotli)
    pub fn brotli() -> Self {
        Encoding::new("br")
    }
}

impl Metadata for Encoding {
    fn all() -> Self {
        Encoding {
            name: "*".to_string(),
        }
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn is_wildcard(&self) -> bool {
        self.name == "*"
    }

    fn includes(&self, other: &Self) -> bool {
        self.is_wildcard() || self.name == other.name
    }

    fn from_parts(name: &str, _parameters: Vec<(String, String)>) -> Result<Self, ParseError> {
        Encoding::parse(name)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// 言語タグ (BCP 47 / RFC 5646)
///
/// 大文字小文字は保持するが、比較は大文字小文字を区別しない。
#[derive(Debug, Clone)]
pub struct Language {
    tag: String,
}

impl Language {
    /// 言語タグをパース
    ///
    /// # 例
    ///
    /// ```rust
    /// use shiguredo_conneg::metadata::Language;
    ///
    /// let lang = Language::parse("ja-JP").unwrap();
    /// assert_eq!(lang.primary(), "ja");
    /// assert_eq!(lang.sub_tags(), vec!["JP"]);
    /// assert!(Language::parse("123").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if input == "*" {
            return Ok(Language::all());
        }
        if !is_valid_language_tag(input) {
            return Err(ParseError::InvalidLanguageTag);
        }
        Ok(Language {
            tag: input.to_string(),
        })
    }

    /// 先頭サブタグ (例: "en-US" の "en")
    pub fn primary(&self) -> &str {
        self.tag.split('-').next().unwrap_or(&self.tag)
    }

    /// 後続サブタグ (例: "en-US" の ["US"])
    pub fn sub_tags(&self) -> Vec<&str> {
        self.tag.split('-').skip(1).collect()
    }

    /// 親言語 (末尾のサブタグを 1 つ落とす)
    ///
    /// `en-US` の親は `en`。サブタグがない場合は `None`。
    pub fn parent(&self) -> Option<Language> {
        if self.is_wildcard() {
            return None;
        }
        let pos = self.tag.rfind('-')?;
        Some(Language {
            tag: self.tag[..pos].to_string(),
        })
    }

    /// `en`
    pub fn english() -> Self {
        Language {
            tag: "en".to_string(),
        }
    }

    /// `en-US`
    pub fn english_us() -> Self {
        Language {
            tag: "en-US".to_string(),
        }
    }

    /// `ja`
    pub fn japanese() -> Self {
        Language {
            tag: "ja".to_string(),
        }
    }

    /// `fr`
    pub fn french() -> Self {
        Language {
            tag: "fr".to_string(),
        }
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.tag.eq_ignore_ascii_case(&other.tag)
    }
}

impl Eq for Language {}

impl Metadata for Language {
    fn all() -> Self {
        Language {
            tag: "*".to_string(),
        }
    }

    fn name(&self) -> String {
        self.tag.clone()
    }

    fn is_wildcard(&self) -> bool {
        self.tag == "*"
    }

    fn includes(&self, other: &Self) -> bool {
        self.is_wildcard() || self == other
    }

    fn from_parts(name: &str, _parameters: Vec<(String, String)>) -> Result<Self, ParseError> {
        Language::parse(name)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)
    }
}

/// BCP 47/RFC 5646 の言語タグとして有効かどうか
fn is_valid_language_tag(tag: &str) -> bool {
    let mut parts = tag.split('-');

    // 先頭サブタグは ALPHA のみ (数字不可)
    let Some(primary) = parts.next() else {
        return false;
    };
    if primary.is_empty() || primary.len() > 8 || !primary.chars().all(|c| c.is_ascii_alphabetic())
    {
        return false;
    }

    // 後続サブタグは ALPHA / DIGIT
    for part in parts {
        if part.is_empty() || part.len() > 8 || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_set_case_insensitive() {
        assert_eq!(CharacterSet::new("UTF-8"), CharacterSet::utf_8());
        assert_eq!(CharacterSet::parse("ISO-8859-1").unwrap().name(), "iso-8859-1");
    }

    #[test]
    fn character_set_includes() {
        let all = CharacterSet::all();
        assert!(all.includes(&CharacterSet::utf_8()));
        assert!(CharacterSet::utf_8().includes(&CharacterSet::utf_8()));
        assert!(!CharacterSet::utf_8().includes(&CharacterSet::iso_8859_1()));
        assert!(!CharacterSet::utf_8().includes(&all));
    }

    #[test]
    fn character_set_rejects_invalid() {
        assert!(CharacterSet::parse("").is_err());
        assert!(CharacterSet::parse("utf 8").is_err());
    }

    #[test]
    fn encoding_includes() {
        assert!(Encoding::all().includes(&Encoding::gzip()));
        assert!(Encoding::gzip().includes(&Encoding::new("GZIP")));
        assert!(!Encoding::gzip().includes(&Encoding::deflate()));
    }

    #[test]
    fn language_parse_and_tags() {
        let lang = Language::parse("en-US-x-twain").unwrap();
        assert_eq!(lang.primary(), "en");
        assert_eq!(lang.sub_tags(), vec!["US", "x", "twain"]);
        assert_eq!(lang.to_string(), "en-US-x-twain");
    }

    #[test]
    fn language_rejects_invalid_tags() {
        assert!(Language::parse("").is_err());
        assert!(Language::parse("123").is_err());
        assert!(Language::parse("en-").is_err());
        assert!(Language::parse("-us").is_err());
        assert!(Language::parse("verylongtag9").is_err());
    }

    #[test]
    fn language_equality_ignores_case() {
        assert_eq!(Language::parse("en-us").unwrap(), Language::english_us());
        assert_ne!(Language::english(), Language::english_us());
    }

    #[test]
    fn language_parent_chain() {
        let lang = Language::parse("en-US-x").unwrap();
        let parent = lang.parent().unwrap();
        assert_eq!(parent.name(), "en-US");
        assert_eq!(parent.parent(), Some(Language::english()));
        assert_eq!(Language::english().parent(), None);
        assert_eq!(Language::all().parent(), None);
    }

    #[test]
    fn language_includes_exact_or_wildcard() {
        assert!(Language::all().includes(&Language::english_us()));
        assert!(Language::english_us().includes(&Language::parse("EN-us").unwrap()));
        // "en" は "en-US" を包含しない (完全一致のみ)
        assert!(!Language::english().includes(&Language::english_us()));
        assert!(!Language::english_us().includes(&Language::english()));
    }
}
