//! メディアタイプ (RFC 9110 Section 8.3.1)
//!
//! ## 概要
//!
//! `type/subtype` とオプションのパラメータ列からなるメディアタイプの
//! 値型を提供します。`*/*` および `type/*` のワイルドカードをサポートし、
//! コンテントネゴシエーションで使う包含判定 (`includes`) を実装します。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_conneg::media_type::MediaType;
//!
//! let html = MediaType::parse("text/html; charset=utf-8").unwrap();
//! assert_eq!(html.main_type(), "text");
//! assert_eq!(html.subtype(), "html");
//! assert_eq!(html.parameter("charset"), Some("utf-8"));
//!
//! let any_text = MediaType::parse("text/*").unwrap();
//! assert!(any_text.includes(&html));
//! assert!(!html.includes(&any_text));
//! ```

use core::fmt;

use crate::error::ParseError;
use crate::metadata::Metadata;
use crate::reader::{HeaderReader, is_valid_token};

/// メディアタイプ
///
/// main type / subtype は構築時に小文字へ正規化する。パラメータ名も
/// 小文字へ正規化し、値は与えられたまま保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    main_type: String,
    subtype: String,
    parameters: Vec<(String, String)>,
}

impl MediaType {
    /// 新しいメディアタイプを作成
    pub fn new(main_type: &str, subtype: &str) -> Self {
        MediaType {
            main_type: main_type.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            parameters: Vec::new(),
        }
    }

    /// パラメータを追加 (ビルダーパターン)
    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        self.parameters
            .push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    /// メディアタイプ文字列をパース
    ///
    /// 単独の `*` は `*/*` として解釈する。`*/html` のようなレンジは
    /// サポートしない (RFC 9110 で無効)。
    ///
    /// # 例
    ///
    /// ```rust
    /// use shiguredo_conneg::media_type::MediaType;
    ///
    /// let mt = MediaType::parse("application/json").unwrap();
    /// assert_eq!(mt.name(), "application/json");
    ///
    /// assert_eq!(MediaType::parse("*").unwrap(), MediaType::all());
    /// assert!(MediaType::parse("*/html").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();

        let (range, rest) = split_at_semicolon(input);
        let (main_type, subtype) = parse_media_range(range)?;
        let parameters = parse_parameters(rest)?;

        Ok(MediaType {
            main_type,
            subtype,
            parameters,
        })
    }

    /// メインタイプを取得 (例: "text")
    pub fn main_type(&self) -> &str {
        &self.main_type
    }

    /// サブタイプを取得 (例: "html")
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// パラメータを取得
    pub fn parameter(&self, name: &str) -> Option<&str> {
        let name_lower = name.to_ascii_lowercase();
        self.parameters
            .iter()
            .find(|(n, _)| n == &name_lower)
            .map(|(_, v)| v.as_str())
    }

    /// すべてのパラメータを取得
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// `*/*` かどうか
    pub fn is_all(&self) -> bool {
        self.main_type == "*" && self.subtype == "*"
    }

    /// サブタイプのみワイルドカード (`type/*`) かどうか
    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype == "*" && self.main_type != "*"
    }

    /// パラメータを無視した同一判定
    pub fn same_type(&self, other: &MediaType) -> bool {
        self.main_type == other.main_type && self.subtype == other.subtype
    }

    /// 完全なメディアタイプ名 (例: "text/html")
    pub fn name(&self) -> String {
        format!("{}/{}", self.main_type, self.subtype)
    }

    /// ワイルドカードを考慮した包含判定。パラメータは無視する
    ///
    /// `*/*` はすべてを、`type/*` は同じメインタイプのすべての
    /// サブタイプを包含する。反射的。
    pub fn includes(&self, other: &MediaType) -> bool {
        if self.is_all() {
            return true;
        }
        if self.main_type != other.main_type {
            return false;
        }
        self.subtype == "*" || self.subtype == other.subtype
    }

    /// `*/*`
    pub fn all() -> Self {
        MediaType::new("*", "*")
    }

    /// `text/plain`
    pub fn text_plain() -> Self {
        MediaType::new("text", "plain")
    }

    /// `text/html`
    pub fn text_html() -> Self {
        MediaType::new("text", "html")
    }

    /// `application/json`
    pub fn application_json() -> Self {
        MediaType::new("application", "json")
    }

    /// `application/xml`
    pub fn application_xml() -> Self {
        MediaType::new("application", "xml")
    }

    /// `application/xhtml+xml`
    pub fn application_xhtml_xml() -> Self {
        MediaType::new("application", "xhtml+xml")
    }

    /// `application/octet-stream`
    pub fn application_octet_stream() -> Self {
        MediaType::new("application", "octet-stream")
    }
}

impl Metadata for MediaType {
    fn all() -> Self {
        MediaType::all()
    }

    fn name(&self) -> String {
        MediaType::name(self)
    }

    fn is_wildcard(&self) -> bool {
        self.is_all()
    }

    fn includes(&self, other: &MediaType) -> bool {
        MediaType::includes(self, other)
    }

    fn from_parts(name: &str, parameters: Vec<(String, String)>) -> Result<Self, ParseError> {
        let (main_type, subtype) = parse_media_range(name)?;
        Ok(MediaType {
            main_type,
            subtype,
            parameters,
        })
    }

    fn keeps_parameters() -> bool {
        true
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.subtype)?;
        for (name, value) in &self.parameters {
            if value.is_empty() {
                // 空の値は引用符で明示する (値なし形式はパースできない)
                write!(f, "; {}=\"\"", name)?;
            } else if needs_quoting(value) {
                write!(f, "; {}=\"{}\"", name, escape_quotes(value))?;
            } else {
                write!(f, "; {}={}", name, value)?;
            }
        }
        Ok(())
    }
}

/// セミコロンで分割 (最初のセミコロンのみ)
fn split_at_semicolon(input: &str) -> (&str, &str) {
    if let Some(pos) = input.find(';') {
        (input[..pos].trim(), input[pos + 1..].trim())
    } else {
        (input.trim(), "")
    }
}

/// メディアレンジ (`type/subtype`) をパース
pub(crate) fn parse_media_range(input: &str) -> Result<(String, String), ParseError> {
    let input = input.trim();

    // 単独の "*" は "*/*" の省略形として扱う
    if input == "*" || input == "*/*" {
        return Ok(("*".to_string(), "*".to_string()));
    }

    let (main_type, subtype) = input.split_once('/').ok_or(ParseError::InvalidMediaRange)?;
    let main_type = main_type.trim();
    let subtype = subtype.trim();

    if main_type == "*" {
        // "*/html" のようなレンジは無効
        return Err(ParseError::InvalidMediaRange);
    }

    if !is_valid_token(main_type) {
        return Err(ParseError::InvalidMediaRange);
    }

    if subtype != "*" && !is_valid_token(subtype) {
        return Err(ParseError::InvalidMediaRange);
    }

    Ok((
        main_type.to_ascii_lowercase(),
        subtype.to_ascii_lowercase(),
    ))
}

/// `;` 区切りのパラメータ列をパース
fn parse_parameters(input: &str) -> Result<Vec<(String, String)>, ParseError> {
    let mut reader = HeaderReader::new(input);
    let mut parameters = Vec::new();

    loop {
        reader.skip_spaces();
        if reader.is_at_end() {
            break;
        }

        let name = reader.read_token();
        if name.is_empty() {
            return Err(ParseError::EmptyParameterName {
                position: reader.position(),
            });
        }

        reader.skip_spaces();
        match reader.read() {
            Some('=') => {}
            _ => {
                return Err(ParseError::EmptyParameterValue {
                    position: reader.position(),
                });
            }
        }

        reader.skip_spaces();
        let value = if reader.peek() == Some('"') {
            reader.read();
            reader.read_quoted_string()?
        } else {
            let token = reader.read_token();
            if token.is_empty() {
                return Err(ParseError::EmptyParameterValue {
                    position: reader.position(),
                });
            }
            token
        };

        parameters.push((name.to_ascii_lowercase(), value));

        reader.skip_spaces();
        match reader.read() {
            None => break,
            Some(';') => continue,
            Some(c) => {
                return Err(ParseError::UnexpectedChar {
                    ch: c,
                    position: reader.position() - 1,
                });
            }
        }
    }

    Ok(parameters)
}

pub(crate) fn needs_quoting(s: &str) -> bool {
    !is_valid_token(s)
}

pub(crate) fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple() {
        let mt = MediaType::parse("text/html").unwrap();
        assert_eq!(mt.main_type(), "text");
        assert_eq!(mt.subtype(), "html");
        assert!(mt.parameters().is_empty());
    }

    #[test]
    fn parse_normalizes_case() {
        let mt = MediaType::parse("Text/HTML; Charset=UTF-8").unwrap();
        assert_eq!(mt.name(), "text/html");
        assert_eq!(mt.parameter("charset"), Some("UTF-8"));
    }

    #[test]
    fn parse_quoted_parameter() {
        let mt = MediaType::parse("application/json; title=\"a, b; c\"").unwrap();
        assert_eq!(mt.parameter("title"), Some("a, b; c"));
    }

    #[test]
    fn parse_bare_star_is_all() {
        assert_eq!(MediaType::parse("*").unwrap(), MediaType::all());
    }

    #[test]
    fn parse_rejects_invalid_ranges() {
        assert!(MediaType::parse("text").is_err());
        assert!(MediaType::parse("*/html").is_err());
        assert!(MediaType::parse("te xt/html").is_err());
        assert!(MediaType::parse("text/html; =utf-8").is_err());
        assert!(MediaType::parse("text/html; charset").is_err());
        assert!(MediaType::parse("text/html; charset=\"utf-8").is_err());
    }

    #[test]
    fn includes_is_reflexive() {
        for mt in [
            MediaType::all(),
            MediaType::parse("text/*").unwrap(),
            MediaType::text_html(),
        ] {
            assert!(mt.includes(&mt.clone()));
        }
    }

    #[test]
    fn includes_wildcards() {
        let all = MediaType::all();
        let any_text = MediaType::parse("text/*").unwrap();
        let html = MediaType::text_html();
        let json = MediaType::application_json();

        assert!(all.includes(&html));
        assert!(all.includes(&any_text));
        assert!(any_text.includes(&html));
        assert!(!any_text.includes(&json));
        assert!(!html.includes(&any_text));
        assert!(!html.includes(&all));
    }

    #[test]
    fn includes_ignores_parameters() {
        let plain = MediaType::text_html();
        let with_param = MediaType::text_html().with_parameter("charset", "utf-8");
        assert!(plain.includes(&with_param));
        assert!(with_param.includes(&plain));
        assert!(!plain.same_type(&MediaType::text_plain()));
        assert!(plain.same_type(&with_param));
    }

    #[test]
    fn display_quotes_empty_parameter_value() {
        let mt = MediaType::text_html().with_parameter("a", "");
        assert_eq!(mt.to_string(), "text/html; a=\"\"");
        assert_eq!(MediaType::parse(&mt.to_string()).unwrap(), mt);
    }

    #[test]
    fn display_round_trip() {
        let mt = MediaType::parse("text/html; charset=utf-8; title=\"a b\"").unwrap();
        let displayed = mt.to_string();
        assert_eq!(displayed, "text/html; charset=utf-8; title=\"a b\"");
        assert_eq!(MediaType::parse(&displayed).unwrap(), mt);
    }
}
