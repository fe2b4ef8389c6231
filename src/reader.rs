//! ヘッダートークナイザー (RFC 9110 Section 5.6)
//!
//! ## 概要
//!
//! `Accept` 系ヘッダーのパースで共通に使う、位置追跡付きの文字カーソルと
//! 文字クラス判定 (token / separators / CTL / quoted-string) を提供します。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_conneg::reader::HeaderReader;
//!
//! let mut reader = HeaderReader::new("charset=\"utf-8\"");
//! assert_eq!(reader.read_token(), "charset");
//! assert_eq!(reader.read(), Some('='));
//! assert_eq!(reader.read(), Some('"'));
//! assert_eq!(reader.read_quoted_string().unwrap(), "utf-8");
//! assert_eq!(reader.read(), None);
//! ```

use crate::error::ParseError;

/// スペースまたは水平タブかどうか (RFC 9110 OWS)
pub fn is_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// 制御文字かどうか (RFC 2616 CTL: 0-31 および 127)
pub fn is_control(c: char) -> bool {
    (c as u32) < 32 || c as u32 == 127
}

/// TEXT かどうか (CTL 以外の任意の文字、ただし SP / HTAB は許可)
pub fn is_text(c: char) -> bool {
    !is_control(c) || is_space(c)
}

/// トークン構成文字かどうか (RFC 9110 Section 5.6.2)
pub fn is_token_char(c: char) -> bool {
    matches!(
        c,
        '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' |
        '0'..='9' | 'A'..='Z' | '^' | '_' | '`' | 'a'..='z' | '|' | '~'
    )
}

/// セパレータかどうか (RFC 2616 separators)
pub fn is_separator(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '<' | '>' | '@' | ',' | ';' | ':' | '\\' | '"' | '/' | '[' | ']' | '?' | '='
            | '{' | '}' | ' ' | '\t'
    )
}

/// カンマかどうか
pub fn is_comma(c: char) -> bool {
    c == ','
}

/// セミコロンかどうか
pub fn is_semicolon(c: char) -> bool {
    c == ';'
}

/// 二重引用符かどうか
pub fn is_double_quote(c: char) -> bool {
    c == '"'
}

/// トークンとして有効な文字列かどうか
pub fn is_valid_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_token_char)
}

/// 位置追跡付きヘッダー文字カーソル
///
/// ヘッダー値を 1 文字ずつ読み進める。`read` は終端で `None` を返すだけで
/// 失敗しない。引用文字列の読み取りなど、文法違反を検出した場合のみ
/// [`ParseError`] を返す。
#[derive(Debug, Clone)]
pub struct HeaderReader {
    chars: Vec<char>,
    index: usize,
}

impl HeaderReader {
    /// 新しいリーダーを作成
    pub fn new(header: &str) -> Self {
        HeaderReader {
            chars: header.chars().collect(),
            index: 0,
        }
    }

    /// 現在位置 (文字単位)
    pub fn position(&self) -> usize {
        self.index
    }

    /// 次の文字を読む。終端では `None`
    pub fn read(&mut self) -> Option<char> {
        let c = self.chars.get(self.index).copied();
        if c.is_some() {
            self.index += 1;
        }
        c
    }

    /// 直前に読んだ文字を戻す
    pub fn unread(&mut self) {
        if self.index > 0 {
            self.index -= 1;
        }
    }

    /// 次の文字を読まずに参照
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    /// 終端に達したかどうか
    pub fn is_at_end(&self) -> bool {
        self.index >= self.chars.len()
    }

    /// スペース / 水平タブをスキップ。1 文字以上スキップしたら true
    pub fn skip_spaces(&mut self) -> bool {
        let mut skipped = false;
        while self.peek().is_some_and(is_space) {
            self.index += 1;
            skipped = true;
        }
        skipped
    }

    /// トークンを読む (トークン構成文字が続く限り)。空の場合もある
    pub fn read_token(&mut self) -> String {
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if !is_token_char(c) {
                break;
            }
            token.push(c);
            self.index += 1;
        }
        token
    }

    /// 引用文字列を読む
    ///
    /// 開始の `"` は消費済みであること。quoted-pair (`\X`) は `X` の
    /// リテラルとして解釈する。終端の `"` より前に入力が尽きた場合、
    /// または引用文字列内に制御文字が現れた場合はエラー。
    pub fn read_quoted_string(&mut self) -> Result<String, ParseError> {
        let start = self.index;
        let mut result = String::new();
        let mut quoted_pair = false;

        loop {
            let Some(c) = self.read() else {
                return Err(ParseError::UnterminatedQuotedString { position: start });
            };

            if quoted_pair {
                // quoted-pair の終わり (エスケープ対象の文字)
                if is_text(c) {
                    result.push(c);
                    quoted_pair = false;
                } else {
                    return Err(ParseError::InvalidQuotedChar {
                        position: self.index - 1,
                    });
                }
            } else if is_double_quote(c) {
                return Ok(result);
            } else if c == '\\' {
                quoted_pair = true;
            } else if is_text(c) {
                result.push(c);
            } else {
                return Err(ParseError::InvalidQuotedChar {
                    position: self.index - 1,
                });
            }
        }
    }

    /// 現在のエントリの残りを読み飛ばす
    ///
    /// 引用文字列を考慮しつつ、次のトップレベルのカンマ (消費する) または
    /// 終端まで進める。不正なエントリを捨てて次のエントリから再開するために使う。
    pub fn skip_entry(&mut self) {
        let mut in_quote = false;
        let mut quoted_pair = false;

        while let Some(c) = self.read() {
            if quoted_pair {
                quoted_pair = false;
            } else if in_quote {
                if c == '\\' {
                    quoted_pair = true;
                } else if is_double_quote(c) {
                    in_quote = false;
                }
            } else if is_double_quote(c) {
                in_quote = true;
            } else if is_comma(c) {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_and_unread() {
        let mut reader = HeaderReader::new("ab");
        assert_eq!(reader.read(), Some('a'));
        reader.unread();
        assert_eq!(reader.read(), Some('a'));
        assert_eq!(reader.read(), Some('b'));
        assert_eq!(reader.read(), None);
        // 終端後の read は None のまま
        assert_eq!(reader.read(), None);
    }

    #[test]
    fn skip_spaces_mixed() {
        let mut reader = HeaderReader::new("  \t x");
        assert!(reader.skip_spaces());
        assert_eq!(reader.read(), Some('x'));
        assert!(!reader.skip_spaces());
        assert!(reader.is_at_end());
    }

    #[test]
    fn read_token_stops_at_separator() {
        let mut reader = HeaderReader::new("text/html");
        assert_eq!(reader.read_token(), "text");
        assert_eq!(reader.read(), Some('/'));
        assert_eq!(reader.read_token(), "html");
    }

    #[test]
    fn quoted_string_with_escapes() {
        let mut reader = HeaderReader::new("a\\\"b\" rest");
        assert_eq!(reader.read_quoted_string().unwrap(), "a\"b");
        assert_eq!(reader.read(), Some(' '));
    }

    #[test]
    fn quoted_string_unterminated() {
        let mut reader = HeaderReader::new("abc");
        assert_eq!(
            reader.read_quoted_string(),
            Err(ParseError::UnterminatedQuotedString { position: 0 })
        );
    }

    #[test]
    fn quoted_string_rejects_control_chars() {
        let mut reader = HeaderReader::new("ab\u{0}cd\"");
        assert!(matches!(
            reader.read_quoted_string(),
            Err(ParseError::InvalidQuotedChar { .. })
        ));
    }

    #[test]
    fn skip_entry_respects_quotes() {
        let mut reader = HeaderReader::new("a;x=\"v,w\",next");
        reader.skip_entry();
        assert_eq!(reader.read_token(), "next");
        assert!(reader.is_at_end());
    }

    #[test]
    fn classification_predicates() {
        assert!(is_token_char('a'));
        assert!(is_token_char('!'));
        assert!(!is_token_char('/'));
        assert!(is_separator('/'));
        assert!(is_separator(' '));
        assert!(is_space('\t'));
        assert!(is_control('\u{0}'));
        assert!(is_control('\u{7f}'));
        assert!(is_text(' '));
        assert!(is_text('あ'));
        assert!(!is_text('\u{1}'));
        assert!(is_valid_token("gzip"));
        assert!(!is_valid_token(""));
        assert!(!is_valid_token("text/html"));
    }
}
