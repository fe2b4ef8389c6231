//! Accept 系ヘッダーパース (RFC 9110 Section 12.4 / 12.5)
//!
//! ## 概要
//!
//! `Accept` / `Accept-Charset` / `Accept-Encoding` / `Accept-Language` を
//! 品質値 (q 値) 付きのプリファレンス列にパースします。4 ファミリーとも
//! 単一のステートマシン実装 ([`parse_preferences`]) でパースします。
//!
//! 不正なエントリの扱いは 2 通り:
//!
//! - [`parse_preferences`] (および `parse_accept` 系) は不正なエントリを
//!   捨てて残りのパースを続行する
//! - [`parse_preferences_strict`] は最初の不正なエントリでエラーを返す
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_conneg::preference::parse_accept;
//!
//! let prefs = parse_accept("text/html;q=0.8, application/json");
//! assert_eq!(prefs.len(), 2);
//! assert_eq!(prefs[0].metadata().subtype(), "html");
//! assert_eq!(prefs[0].quality().value(), 800);
//! assert_eq!(prefs[1].quality().value(), 1000);
//! ```

use core::fmt;

use crate::error::ParseError;
use crate::media_type::{MediaType, escape_quotes, needs_quoting};
use crate::metadata::{CharacterSet, Encoding, Language, Metadata};
use crate::reader::{HeaderReader, is_space, is_text, is_token_char};

/// q 値 (0.000 - 1.000)
///
/// ミリ単位の整数として保持する (浮動小数点の誤差を避けるため)。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QValue(u16);

impl QValue {
    /// q 値をパース
    ///
    /// `[0, 1]` の範囲外、または小数部が 4 桁以上の値は拒否する。
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();

        let (int_part, frac_part) = match input.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (input, None),
        };

        let base = match int_part {
            "0" => 0u16,
            "1" => 1000u16,
            _ => return Err(ParseError::InvalidQValue),
        };

        let mut millis = base;
        if let Some(frac) = frac_part {
            if frac.len() > 3 || !frac.chars().all(|c| c.is_ascii_digit()) {
                return Err(ParseError::InvalidQValue);
            }
            for (idx, c) in frac.chars().enumerate() {
                let digit = c.to_digit(10).ok_or(ParseError::InvalidQValue)? as u16;
                millis += digit * 10u16.pow(2 - idx as u32);
            }
            // "1.001" のような 1 超えを拒否
            if millis > 1000 {
                return Err(ParseError::InvalidQValue);
            }
        }

        Ok(QValue(millis))
    }

    /// ミリ単位の q 値 (0-1000)
    pub fn value(&self) -> u16 {
        self.0
    }

    /// f32 に変換
    pub fn as_f32(&self) -> f32 {
        self.0 as f32 / 1000.0
    }

    /// q=0 (明示的な拒否) かどうか
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for QValue {
    fn default() -> Self {
        QValue(1000)
    }
}

impl fmt::Display for QValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 1000 {
            return write!(f, "1");
        }
        if self.0 == 0 {
            return write!(f, "0");
        }

        let mut frac = format!("{:03}", self.0);
        while frac.ends_with('0') {
            frac.pop();
        }
        write!(f, "0.{}", frac)
    }
}

/// クライアントのプリファレンス (1 エントリ)
///
/// メタデータ、q 値、および q 以外の拡張パラメータ (メディアタイプのみ)
/// を保持する。パーサーが構築した後は不変。
#[derive(Debug, Clone, PartialEq)]
pub struct Preference<T> {
    metadata: T,
    quality: QValue,
    parameters: Vec<(String, String)>,
}

impl<T: Metadata> Preference<T> {
    /// q=1 のプリファレンスを作成
    pub fn new(metadata: T) -> Self {
        Preference {
            metadata,
            quality: QValue::default(),
            parameters: Vec::new(),
        }
    }

    /// q 値を指定してプリファレンスを作成
    pub fn with_quality(metadata: T, quality: QValue) -> Self {
        Preference {
            metadata,
            quality,
            parameters: Vec::new(),
        }
    }

    /// メタデータ
    pub fn metadata(&self) -> &T {
        &self.metadata
    }

    /// q 値
    pub fn quality(&self) -> QValue {
        self.quality
    }

    /// 拡張パラメータ (q より後に現れた、q 以外のパラメータ)
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }
}

impl<T: Metadata> fmt::Display for Preference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.metadata)?;
        // 拡張パラメータがある場合、q を省略すると再パースでメディア
        // タイプ側のパラメータに化けるため、q=1 でも出力する
        if self.quality.value() < 1000 || !self.parameters.is_empty() {
            write!(f, "; q={}", self.quality)?;
        }
        for (name, value) in &self.parameters {
            if value.is_empty() {
                write!(f, "; {}", name)?;
            } else if needs_quoting(value) {
                write!(f, "; {}=\"{}\"", name, escape_quotes(value))?;
            } else {
                write!(f, "; {}={}", name, value)?;
            }
        }
        Ok(())
    }
}

/// パーサーの状態
enum State {
    /// メタデータ名を読んでいる
    Metadata,
    /// パラメータ名を読んでいる
    ParamName,
    /// パラメータ値を読んでいる
    ParamValue,
}

/// パース直後の 1 エントリ (型付け前)
struct RawPreference {
    name: String,
    parameters: Vec<(String, Option<String>)>,
}

/// 1 エントリを読む
///
/// エントリ区切りのカンマは消費する。空エントリ (連続カンマや末尾の
/// 空白など) は `Ok(None)` として無視する。
fn read_raw_preference(reader: &mut HeaderReader) -> Result<Option<RawPreference>, ParseError> {
    let mut state = State::Metadata;
    let mut name = String::new();
    let mut param_name = String::new();
    let mut param_value = String::new();
    let mut value_quoted = false;
    let mut parameters: Vec<(String, Option<String>)> = Vec::new();

    loop {
        let next = reader.read();

        match state {
            State::Metadata => match next {
                None | Some(',') => {
                    if name.is_empty() {
                        // 空エントリは無視 (連続カンマなど)
                        return Ok(None);
                    }
                    return Ok(Some(RawPreference { name, parameters }));
                }
                Some(';') => {
                    if name.is_empty() {
                        return Err(ParseError::EmptyMetadataName {
                            position: reader.position() - 1,
                        });
                    }
                    state = State::ParamName;
                }
                Some(c) if is_space(c) => {}
                Some(c) if is_text(c) => name.push(c),
                Some(c) => {
                    return Err(ParseError::UnexpectedChar {
                        ch: c,
                        position: reader.position() - 1,
                    });
                }
            },

            State::ParamName => match next {
                Some('=') => {
                    if param_name.is_empty() {
                        return Err(ParseError::EmptyParameterName {
                            position: reader.position() - 1,
                        });
                    }
                    state = State::ParamValue;
                    param_value.clear();
                    value_quoted = false;
                }
                None | Some(',') => {
                    if param_name.is_empty() {
                        // カンマは次のエントリの区切りとして残す
                        if next.is_some() {
                            reader.unread();
                        }
                        return Err(ParseError::EmptyParameterName {
                            position: reader.position(),
                        });
                    }
                    // 値なしパラメータで終端
                    parameters.push((core::mem::take(&mut param_name), None));
                    return Ok(Some(RawPreference { name, parameters }));
                }
                Some(';') => {
                    if param_name.is_empty() {
                        return Err(ParseError::EmptyParameterName {
                            position: reader.position() - 1,
                        });
                    }
                    // 値なしパラメータ、次のパラメータへ
                    parameters.push((core::mem::take(&mut param_name), None));
                }
                Some(c) if is_space(c) && param_name.is_empty() => {}
                Some(c) if is_token_char(c) => param_name.push(c),
                Some(c) => {
                    return Err(ParseError::UnexpectedChar {
                        ch: c,
                        position: reader.position() - 1,
                    });
                }
            },

            State::ParamValue => match next {
                None | Some(',') => {
                    if param_value.is_empty() && !value_quoted {
                        // カンマは次のエントリの区切りとして残す
                        if next.is_some() {
                            reader.unread();
                        }
                        return Err(ParseError::EmptyParameterValue {
                            position: reader.position(),
                        });
                    }
                    parameters.push((
                        core::mem::take(&mut param_name),
                        Some(core::mem::take(&mut param_value)),
                    ));
                    return Ok(Some(RawPreference { name, parameters }));
                }
                Some(';') => {
                    if param_value.is_empty() && !value_quoted {
                        return Err(ParseError::EmptyParameterValue {
                            position: reader.position() - 1,
                        });
                    }
                    parameters.push((
                        core::mem::take(&mut param_name),
                        Some(core::mem::take(&mut param_value)),
                    ));
                    state = State::ParamName;
                }
                Some('"') if param_value.is_empty() && !value_quoted => {
                    param_value = reader.read_quoted_string()?;
                    value_quoted = true;
                }
                Some(c) if is_space(c) => {
                    if param_value.is_empty() && !value_quoted {
                        return Err(ParseError::EmptyParameterValue {
                            position: reader.position() - 1,
                        });
                    }
                    parameters.push((
                        core::mem::take(&mut param_name),
                        Some(core::mem::take(&mut param_value)),
                    ));
                    // 空白の後はエントリ区切りかパラメータ区切りのみ許可
                    reader.skip_spaces();
                    match reader.read() {
                        None | Some(',') => {
                            return Ok(Some(RawPreference { name, parameters }));
                        }
                        Some(';') => {
                            state = State::ParamName;
                        }
                        Some(c) => {
                            return Err(ParseError::UnexpectedChar {
                                ch: c,
                                position: reader.position() - 1,
                            });
                        }
                    }
                }
                Some(c) if is_token_char(c) && !value_quoted => param_value.push(c),
                Some(c) => {
                    return Err(ParseError::UnexpectedChar {
                        ch: c,
                        position: reader.position() - 1,
                    });
                }
            },
        }
    }
}

/// 型付け前のエントリからプリファレンスを構築
///
/// パラメータ列を q の前後で分割する: q より前は メディアレンジの
/// パラメータ (RFC 9110 の media-type parameters)、q より後は拡張
/// パラメータ (accept-ext)。q が複数回現れた場合は最後の値が勝つ。
fn build_preference<T: Metadata>(raw: RawPreference) -> Result<Preference<T>, ParseError> {
    let mut media_parameters: Vec<(String, String)> = Vec::new();
    let mut extension_parameters: Vec<(String, String)> = Vec::new();
    let mut quality = QValue::default();
    let mut quality_seen = false;

    for (name, value) in raw.parameters {
        if name.eq_ignore_ascii_case("q") {
            let value = value.ok_or(ParseError::InvalidQValue)?;
            quality = QValue::parse(&value)?;
            quality_seen = true;
        } else {
            let pair = (name.to_ascii_lowercase(), value.unwrap_or_default());
            if quality_seen {
                extension_parameters.push(pair);
            } else {
                media_parameters.push(pair);
            }
        }
    }

    if !T::keeps_parameters() {
        media_parameters.clear();
        extension_parameters.clear();
    }

    let metadata = T::from_parts(raw.name.trim(), media_parameters)?;

    Ok(Preference {
        metadata,
        quality,
        parameters: extension_parameters,
    })
}

/// プリファレンスヘッダーをパース (寛容モード)
///
/// 不正なエントリは捨てて、残りの有効なエントリを返す。ヘッダー全体が
/// 不正な場合は空のリストを返す (エラーにしない)。
pub fn parse_preferences<T: Metadata>(header: &str) -> Vec<Preference<T>> {
    let mut reader = HeaderReader::new(header);
    let mut result = Vec::new();

    while !reader.is_at_end() {
        match read_raw_preference(&mut reader) {
            Ok(Some(raw)) => {
                // エントリ単位で不正な値 (範囲外の q 値など) も捨てる
                if let Ok(preference) = build_preference::<T>(raw) {
                    result.push(preference);
                }
            }
            Ok(None) => {}
            Err(_) => reader.skip_entry(),
        }
    }

    result
}

/// プリファレンスヘッダーをパース (厳格モード)
///
/// 最初の不正なエントリでエラーを返す。
pub fn parse_preferences_strict<T: Metadata>(header: &str) -> Result<Vec<Preference<T>>, ParseError> {
    let mut reader = HeaderReader::new(header);
    let mut result = Vec::new();

    while !reader.is_at_end() {
        if let Some(raw) = read_raw_preference(&mut reader)? {
            result.push(build_preference::<T>(raw)?);
        }
    }

    Ok(result)
}

/// `Accept` ヘッダーをパース
pub fn parse_accept(header: &str) -> Vec<Preference<MediaType>> {
    parse_preferences(header)
}

/// `Accept-Charset` ヘッダーをパース
pub fn parse_accept_charset(header: &str) -> Vec<Preference<CharacterSet>> {
    parse_preferences(header)
}

/// `Accept-Encoding` ヘッダーをパース
pub fn parse_accept_encoding(header: &str) -> Vec<Preference<Encoding>> {
    parse_preferences(header)
}

/// `Accept-Language` ヘッダーをパース
pub fn parse_accept_language(header: &str) -> Vec<Preference<Language>> {
    parse_preferences(header)
}

/// リクエスト単位のクライアントプリファレンス
///
/// 4 次元 (メディアタイプ / 文字セット / エンコーディング / 言語) の
/// 順序付きプリファレンスリスト。ヘッダーがない次元は空リスト。
#[derive(Debug, Clone, Default)]
pub struct ClientPreferences {
    media_types: Vec<Preference<MediaType>>,
    character_sets: Vec<Preference<CharacterSet>>,
    encodings: Vec<Preference<Encoding>>,
    languages: Vec<Preference<Language>>,
}

impl ClientPreferences {
    /// 空のプリファレンスを作成
    pub fn new() -> Self {
        ClientPreferences::default()
    }

    /// Accept 系ヘッダー一式からパース (寛容モード)
    ///
    /// # 例
    ///
    /// ```rust
    /// use shiguredo_conneg::preference::ClientPreferences;
    ///
    /// let prefs = ClientPreferences::from_headers(
    ///     Some("text/html, application/json;q=0.5"),
    ///     None,
    ///     Some("gzip, identity;q=0.2"),
    ///     Some("ja, en;q=0.7"),
    /// );
    /// assert_eq!(prefs.media_types().len(), 2);
    /// assert!(prefs.character_sets().is_empty());
    /// ```
    pub fn from_headers(
        accept: Option<&str>,
        accept_charset: Option<&str>,
        accept_encoding: Option<&str>,
        accept_language: Option<&str>,
    ) -> Self {
        ClientPreferences {
            media_types: accept.map(parse_accept).unwrap_or_default(),
            character_sets: accept_charset.map(parse_accept_charset).unwrap_or_default(),
            encodings: accept_encoding.map(parse_accept_encoding).unwrap_or_default(),
            languages: accept_language.map(parse_accept_language).unwrap_or_default(),
        }
    }

    /// メディアタイププリファレンス
    pub fn media_types(&self) -> &[Preference<MediaType>] {
        &self.media_types
    }

    /// メディアタイププリファレンス (可変)
    pub fn media_types_mut(&mut self) -> &mut Vec<Preference<MediaType>> {
        &mut self.media_types
    }

    /// 文字セットプリファレンス
    pub fn character_sets(&self) -> &[Preference<CharacterSet>] {
        &self.character_sets
    }

    /// 文字セットプリファレンス (可変)
    pub fn character_sets_mut(&mut self) -> &mut Vec<Preference<CharacterSet>> {
        &mut self.character_sets
    }

    /// エンコーディングプリファレンス
    pub fn encodings(&self) -> &[Preference<Encoding>] {
        &self.encodings
    }

    /// エンコーディングプリファレンス (可変)
    pub fn encodings_mut(&mut self) -> &mut Vec<Preference<Encoding>> {
        &mut self.encodings
    }

    /// 言語プリファレンス
    pub fn languages(&self) -> &[Preference<Language>] {
        &self.languages
    }

    /// 言語プリファレンス (可変)
    pub fn languages_mut(&mut self) -> &mut Vec<Preference<Language>> {
        &mut self.languages
    }
}
