//! コンテントネゴシエーション (RFC 9110 Section 12)
//!
//! ## 概要
//!
//! クライアントのプリファレンス ([`ClientPreferences`]) とサーバーの
//! バリアントリストから、最適な表現を選択します。
//!
//! スコアリングは次元 (メディアタイプ / 文字セット / エンコーディング /
//! 言語) ごとに行います:
//!
//! - プリファレンスとバリアント値のペアは、非互換なら除外、互換なら
//!   「特異度ティア + q 値」でスコア付けする。ティアは完全一致 = 2、
//!   `type/*` = 1、`*/*` = 0。q ∈ (0, 1] なのでティアが異なるペアの
//!   スコア帯は重ならない
//! - 次元のスコアは最も特異的なマッチのスコア。そのマッチが q=0 なら
//!   バリアントごと除外 (明示的な拒否)
//! - バリアントの総合スコアは各次元スコアの積。クライアントが表明して
//!   いない次元は中立 (1.0)
//!
//! 選択は総合スコアが真に最大のバリアント。同点の場合は宣言順で先の
//! バリアントが勝つ。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_conneg::conneg::Negotiation;
//! use shiguredo_conneg::media_type::MediaType;
//! use shiguredo_conneg::preference::ClientPreferences;
//! use shiguredo_conneg::variant::Variant;
//!
//! let prefs = ClientPreferences::from_headers(
//!     Some("text/html;q=0.8, application/json"),
//!     None,
//!     None,
//!     None,
//! );
//! let variants = vec![
//!     Variant::new(MediaType::text_html()),
//!     Variant::new(MediaType::application_json()),
//! ];
//!
//! let selected = Negotiation::new(&prefs).preferred_variant(&variants);
//! assert_eq!(selected.unwrap().media_type(), &MediaType::application_json());
//! ```

use crate::media_type::MediaType;
use crate::metadata::Metadata;
use crate::preference::{ClientPreferences, Preference, QValue};
use crate::variant::Variant;

/// ネゴシエーションのポリシー
#[derive(Debug, Clone, Copy, Default)]
pub struct NegotiationOptions {
    /// 厳格モード
    ///
    /// true の場合、メディアタイププリファレンスが空 (Accept ヘッダー
    /// なし、または全エントリ不正) なら「受理可能なバリアントなし」と
    /// する。false (柔軟モード、デフォルト) の場合、空のプリファレンスは
    /// 「何でも受け付ける」と解釈し、最初のバリアントが選ばれる。
    pub strict: bool,
    /// クライアントが文字セットを表明した場合、文字セットを持たない
    /// バリアントを除外する
    pub require_character_set: bool,
    /// クライアントがエンコーディングを表明した場合、エンコーディングを
    /// 持たないバリアントを除外する
    pub require_encoding: bool,
    /// クライアントが言語を表明した場合、言語を持たないバリアントを
    /// 除外する
    pub require_language: bool,
}

/// 次元ごとのスコア
enum DimensionScore {
    /// 非互換 (バリアントごと除外)
    Excluded,
    /// クライアントが表明していない、または任意次元で値がない (中立)
    Neutral,
    /// 互換 (ティア + q 値)
    Matched(f32),
}

/// コンテントネゴシエーション
///
/// プリファレンスは構築後、読み取り専用。同じ入力に対して常に同じ
/// 結果を返す (決定的で副作用なし)。
#[derive(Debug)]
pub struct Negotiation<'a> {
    preferences: &'a ClientPreferences,
    options: NegotiationOptions,
}

impl<'a> Negotiation<'a> {
    /// デフォルトのポリシー (柔軟モード) でネゴシエーションを作成
    pub fn new(preferences: &'a ClientPreferences) -> Self {
        Negotiation {
            preferences,
            options: NegotiationOptions::default(),
        }
    }

    /// ポリシーを指定してネゴシエーションを作成
    pub fn with_options(preferences: &'a ClientPreferences, options: NegotiationOptions) -> Self {
        Negotiation {
            preferences,
            options,
        }
    }

    /// 最適なバリアントを選択
    ///
    /// どのバリアントも受理できない場合は `None` (呼び出し側で
    /// 406 Not Acceptable 相当にマップする)。同点は宣言順で先勝ち。
    pub fn preferred_variant<'v>(&self, variants: &'v [Variant]) -> Option<&'v Variant> {
        let mut best: Option<(f32, &Variant)> = None;

        for variant in variants {
            let Some(score) = self.score_variant(variant) else {
                continue;
            };
            // 真に大きい場合のみ更新する (同点は先に宣言されたものが勝つ)
            match best {
                Some((best_score, _)) if score <= best_score => {}
                _ => best = Some((score, variant)),
            }
        }

        best.map(|(_, variant)| variant)
    }

    /// バリアントの総合スコアを計算
    ///
    /// `None` は除外 (いずれかの次元で非互換、または厳格モードで
    /// プリファレンスなし)。
    pub fn score_variant(&self, variant: &Variant) -> Option<f32> {
        // 厳格モード: Accept プリファレンスなしは「何も受け付けない」
        if self.options.strict && self.preferences.media_types().is_empty() {
            return None;
        }

        let media_type = dimension_score(
            self.preferences.media_types(),
            Some(variant.media_type()),
            false,
            media_type_tier,
            media_parameters_conflict,
        );
        let character_set = dimension_score(
            self.preferences.character_sets(),
            variant.character_set(),
            self.options.require_character_set,
            wildcard_tier,
            no_conflict,
        );
        let encoding = dimension_score(
            self.preferences.encodings(),
            variant.encoding(),
            self.options.require_encoding,
            wildcard_tier,
            no_conflict,
        );
        let language = dimension_score(
            self.preferences.languages(),
            variant.language(),
            self.options.require_language,
            wildcard_tier,
            no_conflict,
        );

        let mut result = 1.0f32;
        for score in [media_type, character_set, encoding, language] {
            match score {
                DimensionScore::Excluded => return None,
                DimensionScore::Neutral => {}
                DimensionScore::Matched(value) => result *= value,
            }
        }
        Some(result)
    }
}

/// 1 次元のスコアを計算
///
/// 互換なプリファレンスのうち (ティア, q) が最大のものを採用する。
/// そのプリファレンスが q=0 なら除外 (最も特異的なマッチによる拒否が、
/// より緩いマッチの受理より優先される)。
fn dimension_score<T: Metadata>(
    preferences: &[Preference<T>],
    value: Option<&T>,
    required: bool,
    tier: fn(&T) -> u8,
    conflicts: fn(&Preference<T>, &T) -> bool,
) -> DimensionScore {
    if preferences.is_empty() {
        return DimensionScore::Neutral;
    }

    let Some(value) = value else {
        if required {
            return DimensionScore::Excluded;
        }
        return DimensionScore::Neutral;
    };

    let mut best: Option<(u8, QValue)> = None;
    for preference in preferences {
        if !preference.metadata().includes(value) || conflicts(preference, value) {
            continue;
        }
        let candidate = (tier(preference.metadata()), preference.quality());
        if best.is_none_or(|current| candidate > current) {
            best = Some(candidate);
        }
    }

    match best {
        None => DimensionScore::Excluded,
        Some((_, quality)) if quality.is_zero() => DimensionScore::Excluded,
        Some((tier, quality)) => DimensionScore::Matched(tier as f32 + quality.as_f32()),
    }
}

/// メディアタイプの特異度ティア (完全一致 = 2, `type/*` = 1, `*/*` = 0)
fn media_type_tier(media_type: &MediaType) -> u8 {
    if media_type.is_all() {
        0
    } else if media_type.is_wildcard_subtype() {
        1
    } else {
        2
    }
}

/// ワイルドカードのみを持つファミリーのティア (完全一致 = 2, `*` = 0)
fn wildcard_tier<T: Metadata>(metadata: &T) -> u8 {
    if metadata.is_wildcard() { 0 } else { 2 }
}

/// プリファレンスのメディアレンジパラメータとバリアントの衝突判定
///
/// プリファレンスが持つパラメータと同名のパラメータをバリアントの
/// メディアタイプが異なる値で持つ場合、このペアは除外する。
fn media_parameters_conflict(preference: &Preference<MediaType>, variant_type: &MediaType) -> bool {
    preference
        .metadata()
        .parameters()
        .iter()
        .any(|(name, value)| {
            variant_type
                .parameter(name)
                .is_some_and(|variant_value| variant_value != value)
        })
}

fn no_conflict<T: Metadata>(_preference: &Preference<T>, _value: &T) -> bool {
    false
}
