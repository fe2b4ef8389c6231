//! # shiguredo_conneg
//!
//! 依存なしの HTTP コンテントネゴシエーションライブラリ (Sans I/O)
//!
//! ## 特徴
//!
//! - **依存なし**: 標準ライブラリのみ使用
//! - **Sans I/O**: ヘッダー文字列とバリアントリストを受け取り、結果を返すだけ
//! - **RFC 9110 準拠**: Accept / Accept-Charset / Accept-Encoding /
//!   Accept-Language のパースと、品質値・特異度に基づくバリアント選択
//!
//! ## 使い方
//!
//! ### サーバー (リクエストのプリファレンスから表現を選択)
//!
//! ```rust
//! use shiguredo_conneg::{ClientPreferences, MediaType, Negotiation, Variant};
//!
//! // Accept 系ヘッダーをパース
//! let prefs = ClientPreferences::from_headers(
//!     Some("text/html;q=0.8, application/xhtml+xml, application/xml;q=0.9, */*;q=0.5"),
//!     None,
//!     None,
//!     Some("ja, en;q=0.7"),
//! );
//!
//! // リソースが提供できるバリアント
//! let variants = vec![
//!     Variant::new(MediaType::text_plain()),
//!     Variant::new(MediaType::application_xml()),
//!     Variant::new(MediaType::application_xhtml_xml()),
//! ];
//!
//! // 最適なバリアントを選択。None なら 406 Not Acceptable 相当
//! let selected = Negotiation::new(&prefs).preferred_variant(&variants);
//! assert_eq!(
//!     selected.unwrap().media_type(),
//!     &MediaType::application_xhtml_xml(),
//! );
//! ```
//!
//! ### プリファレンスの直接検査
//!
//! ```rust
//! use shiguredo_conneg::parse_accept;
//!
//! let prefs = parse_accept("text/html, application/json;q=0.5, ;bad");
//! // 不正なエントリは捨てられ、有効なエントリだけが残る
//! assert_eq!(prefs.len(), 2);
//! assert_eq!(prefs[1].quality().as_f32(), 0.5);
//! ```

pub mod conneg;
pub mod error;
pub mod media_type;
pub mod metadata;
pub mod preference;
pub mod reader;
pub mod variant;

pub use conneg::{Negotiation, NegotiationOptions};
pub use error::ParseError;
pub use media_type::MediaType;
pub use metadata::{CharacterSet, Encoding, Language, Metadata};
pub use preference::{
    ClientPreferences, Preference, QValue, parse_accept, parse_accept_charset,
    parse_accept_encoding, parse_accept_language, parse_preferences, parse_preferences_strict,
};
pub use variant::Variant;
