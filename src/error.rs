use core::fmt;

/// ヘッダーパースエラー
///
/// `Accept` 系ヘッダーのトークナイズ / パース中に発生するエラー。
/// 各バリアントは問題の内容と (可能であれば) 入力中の位置を保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// メタデータ名が空 (`;` の直前に名前がない)
    EmptyMetadataName { position: usize },
    /// パラメータ名が空
    EmptyParameterName { position: usize },
    /// パラメータ値が空
    EmptyParameterValue { position: usize },
    /// 引用文字列が閉じていない
    UnterminatedQuotedString { position: usize },
    /// 引用文字列内の不正な文字 (CTL など)
    InvalidQuotedChar { position: usize },
    /// 予期しない文字
    UnexpectedChar { ch: char, position: usize },
    /// 不正なメディアレンジ (`type/subtype` 形式でない、`*/html` など)
    InvalidMediaRange,
    /// 不正なトークン
    InvalidToken,
    /// 不正な言語タグ (BCP 47)
    InvalidLanguageTag,
    /// 不正な q 値 (範囲外、または数値として解釈できない)
    InvalidQValue,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyMetadataName { position } => {
                write!(f, "empty metadata name at position {}", position)
            }
            ParseError::EmptyParameterName { position } => {
                write!(f, "empty parameter name at position {}", position)
            }
            ParseError::EmptyParameterValue { position } => {
                write!(f, "empty parameter value at position {}", position)
            }
            ParseError::UnterminatedQuotedString { position } => {
                write!(f, "unterminated quoted string at position {}", position)
            }
            ParseError::InvalidQuotedChar { position } => {
                write!(
                    f,
                    "invalid character in quoted string at position {}",
                    position
                )
            }
            ParseError::UnexpectedChar { ch, position } => {
                write!(f, "unexpected character {:?} at position {}", ch, position)
            }
            ParseError::InvalidMediaRange => write!(f, "invalid media range"),
            ParseError::InvalidToken => write!(f, "invalid token"),
            ParseError::InvalidLanguageTag => write!(f, "invalid language tag"),
            ParseError::InvalidQValue => write!(f, "invalid qvalue"),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let err = ParseError::UnterminatedQuotedString { position: 12 };
        assert_eq!(err.to_string(), "unterminated quoted string at position 12");

        let err = ParseError::UnexpectedChar {
            ch: '\u{0}',
            position: 3,
        };
        assert!(err.to_string().contains("position 3"));
    }
}
