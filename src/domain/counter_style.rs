use std::{fmt, str::FromStr};

mod systems;

use systems::System;

/// A named algorithm that maps a counter value to display text.
///
/// The set of styles is closed and mirrors the predefined CSS counter
/// styles. Each style renders through a table-driven system; values outside
/// a style's range are rendered by its fallback style, so [`render`] is
/// total.
///
/// [`render`]: CounterStyle::render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CounterStyle {
    /// `1`, `2`, `3`, ...
    Decimal,
    /// `01`, `02`, ... `10`, ...
    DecimalLeadingZero,
    /// Base-2 digits.
    Binary,
    /// Base-8 digits.
    Octal,
    /// Base-16 digits, lowercase.
    LowerHexadecimal,
    /// Base-16 digits, uppercase.
    UpperHexadecimal,
    /// Decimal using CJK digit ideographs.
    CjkDecimal,
    /// Arabic-Indic digits.
    ArabicIndic,
    /// Bengali digits.
    Bengali,
    /// Khmer digits.
    Cambodian,
    /// Devanagari digits.
    Devanagari,
    /// Gujarati digits.
    Gujarati,
    /// Gurmukhi digits.
    Gurmukhi,
    /// Kannada digits.
    Kannada,
    /// Lao digits.
    Lao,
    /// Malayalam digits.
    Malayalam,
    /// Mongolian digits.
    Mongolian,
    /// Myanmar digits.
    Myanmar,
    /// Oriya digits.
    Oriya,
    /// Persian digits.
    Persian,
    /// Tamil digits.
    Tamil,
    /// Telugu digits.
    Telugu,
    /// Thai digits.
    Thai,
    /// Tibetan digits.
    Tibetan,
    /// `a` ... `z`, `aa`, `ab`, ...
    LowerAlpha,
    /// `A` ... `Z`, `AA`, `AB`, ...
    UpperAlpha,
    /// Lowercase Greek letters, bijective.
    LowerGreek,
    /// Hiragana syllables, bijective.
    Hiragana,
    /// Katakana syllables, bijective.
    Katakana,
    /// The twelve earthly branches, bijective.
    CjkEarthlyBranch,
    /// The ten heavenly stems, bijective.
    CjkHeavenlyStem,
    /// `i`, `ii`, `iii`, `iv`, ... (1 to 3999).
    LowerRoman,
    /// `I`, `II`, `III`, `IV`, ... (1 to 3999).
    UpperRoman,
    /// Lowercase Armenian numbering (1 to 9999).
    LowerArmenian,
    /// Uppercase Armenian numbering (1 to 9999).
    UpperArmenian,
    /// Georgian numbering (1 to 19999).
    Georgian,
    /// Hebrew numbering (1 to 10999).
    Hebrew,
    /// Simplified Chinese, informal digits (0 to 9999).
    SimpChineseInformal,
    /// Simplified Chinese, formal digits (0 to 9999).
    SimpChineseFormal,
    /// Traditional Chinese, informal digits (0 to 9999).
    TradChineseInformal,
    /// Traditional Chinese, formal digits (0 to 9999).
    TradChineseFormal,
    /// Ethiopic numbering.
    EthiopicNumeric,
}

/// Error returned when a name does not denote a supported counter style.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unsupported counter style '{0}'")]
pub struct UnsupportedStyleError(pub String);

impl CounterStyle {
    /// Every supported style, in a stable presentation order.
    pub const ALL: [Self; 42] = [
        Self::Decimal,
        Self::DecimalLeadingZero,
        Self::Binary,
        Self::Octal,
        Self::LowerHexadecimal,
        Self::UpperHexadecimal,
        Self::CjkDecimal,
        Self::ArabicIndic,
        Self::Bengali,
        Self::Cambodian,
        Self::Devanagari,
        Self::Gujarati,
        Self::Gurmukhi,
        Self::Kannada,
        Self::Lao,
        Self::Malayalam,
        Self::Mongolian,
        Self::Myanmar,
        Self::Oriya,
        Self::Persian,
        Self::Tamil,
        Self::Telugu,
        Self::Thai,
        Self::Tibetan,
        Self::LowerAlpha,
        Self::UpperAlpha,
        Self::LowerGreek,
        Self::Hiragana,
        Self::Katakana,
        Self::CjkEarthlyBranch,
        Self::CjkHeavenlyStem,
        Self::LowerRoman,
        Self::UpperRoman,
        Self::LowerArmenian,
        Self::UpperArmenian,
        Self::Georgian,
        Self::Hebrew,
        Self::SimpChineseInformal,
        Self::SimpChineseFormal,
        Self::TradChineseInformal,
        Self::TradChineseFormal,
        Self::EthiopicNumeric,
    ];

    /// Looks up a style by CSS keyword, alias, or single-character
    /// shorthand (`1`, `a`, `A`, `i`, `I`).
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedStyleError`] if the name is not recognised.
    pub fn lookup(name: &str) -> Result<Self, UnsupportedStyleError> {
        let style = match name {
            "1" | "decimal" => Self::Decimal,
            "decimal-leading-zero" => Self::DecimalLeadingZero,
            "binary" => Self::Binary,
            "octal" => Self::Octal,
            "lower-hexadecimal" => Self::LowerHexadecimal,
            "upper-hexadecimal" => Self::UpperHexadecimal,
            "cjk-decimal" => Self::CjkDecimal,
            "arabic-indic" => Self::ArabicIndic,
            "bengali" => Self::Bengali,
            "cambodian" | "khmer" => Self::Cambodian,
            "devanagari" => Self::Devanagari,
            "gujarati" => Self::Gujarati,
            "gurmukhi" => Self::Gurmukhi,
            "kannada" => Self::Kannada,
            "lao" => Self::Lao,
            "malayalam" => Self::Malayalam,
            "mongolian" => Self::Mongolian,
            "myanmar" => Self::Myanmar,
            "oriya" => Self::Oriya,
            "persian" => Self::Persian,
            "tamil" => Self::Tamil,
            "telugu" => Self::Telugu,
            "thai" => Self::Thai,
            "tibetan" => Self::Tibetan,
            "a" | "lower-alpha" | "lower-latin" => Self::LowerAlpha,
            "A" | "upper-alpha" | "upper-latin" => Self::UpperAlpha,
            "lower-greek" => Self::LowerGreek,
            "hiragana" => Self::Hiragana,
            "katakana" => Self::Katakana,
            "cjk-earthly-branch" => Self::CjkEarthlyBranch,
            "cjk-heavenly-stem" => Self::CjkHeavenlyStem,
            "i" | "lower-roman" => Self::LowerRoman,
            "I" | "upper-roman" => Self::UpperRoman,
            "lower-armenian" => Self::LowerArmenian,
            "upper-armenian" | "armenian" => Self::UpperArmenian,
            "georgian" => Self::Georgian,
            "hebrew" => Self::Hebrew,
            "simp-chinese-informal" => Self::SimpChineseInformal,
            "simp-chinese-formal" => Self::SimpChineseFormal,
            "trad-chinese-informal" | "cjk-ideographic" => Self::TradChineseInformal,
            "trad-chinese-formal" => Self::TradChineseFormal,
            "ethiopic-numeric" => Self::EthiopicNumeric,
            _ => return Err(UnsupportedStyleError(name.to_string())),
        };
        Ok(style)
    }

    /// The CSS `list-style-type` keyword for this style.
    #[must_use]
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Decimal => "decimal",
            Self::DecimalLeadingZero => "decimal-leading-zero",
            Self::Binary => "binary",
            Self::Octal => "octal",
            Self::LowerHexadecimal => "lower-hexadecimal",
            Self::UpperHexadecimal => "upper-hexadecimal",
            Self::CjkDecimal => "cjk-decimal",
            Self::ArabicIndic => "arabic-indic",
            Self::Bengali => "bengali",
            Self::Cambodian => "cambodian",
            Self::Devanagari => "devanagari",
            Self::Gujarati => "gujarati",
            Self::Gurmukhi => "gurmukhi",
            Self::Kannada => "kannada",
            Self::Lao => "lao",
            Self::Malayalam => "malayalam",
            Self::Mongolian => "mongolian",
            Self::Myanmar => "myanmar",
            Self::Oriya => "oriya",
            Self::Persian => "persian",
            Self::Tamil => "tamil",
            Self::Telugu => "telugu",
            Self::Thai => "thai",
            Self::Tibetan => "tibetan",
            Self::LowerAlpha => "lower-alpha",
            Self::UpperAlpha => "upper-alpha",
            Self::LowerGreek => "lower-greek",
            Self::Hiragana => "hiragana",
            Self::Katakana => "katakana",
            Self::CjkEarthlyBranch => "cjk-earthly-branch",
            Self::CjkHeavenlyStem => "cjk-heavenly-stem",
            Self::LowerRoman => "lower-roman",
            Self::UpperRoman => "upper-roman",
            Self::LowerArmenian => "lower-armenian",
            Self::UpperArmenian => "upper-armenian",
            Self::Georgian => "georgian",
            Self::Hebrew => "hebrew",
            Self::SimpChineseInformal => "simp-chinese-informal",
            Self::SimpChineseFormal => "simp-chinese-formal",
            Self::TradChineseInformal => "trad-chinese-informal",
            Self::TradChineseFormal => "trad-chinese-formal",
            Self::EthiopicNumeric => "ethiopic-numeric",
        }
    }

    /// Renders `n` in this style.
    ///
    /// Values the style cannot represent (zero for most non-numeric
    /// systems, or values beyond a style's range such as roman numerals
    /// above 3999) are rendered with the fallback style instead.
    #[must_use]
    pub fn render(self, n: u64) -> String {
        System::of(self)
            .render(n)
            .unwrap_or_else(|| self.fallback().render(n))
    }

    const fn fallback(self) -> Self {
        match self {
            Self::SimpChineseInformal
            | Self::SimpChineseFormal
            | Self::TradChineseInformal
            | Self::TradChineseFormal => Self::CjkDecimal,
            _ => Self::Decimal,
        }
    }
}

impl FromStr for CounterStyle {
    type Err = UnsupportedStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

impl fmt::Display for CounterStyle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_roman(s: &str) -> u64 {
        let value = |c: char| match c.to_ascii_lowercase() {
            'i' => 1,
            'v' => 5,
            'x' => 10,
            'l' => 50,
            'c' => 100,
            'd' => 500,
            'm' => 1000,
            other => panic!("not a roman digit: {other}"),
        };
        let digits: Vec<i64> = s.chars().map(value).collect();
        let mut total = 0;
        for (i, &d) in digits.iter().enumerate() {
            if digits.get(i + 1).is_some_and(|&next| next > d) {
                total -= d;
            } else {
                total += d;
            }
        }
        u64::try_from(total).unwrap()
    }

    #[test]
    fn shorthands_resolve_to_named_styles() {
        assert_eq!(CounterStyle::lookup("1"), Ok(CounterStyle::Decimal));
        assert_eq!(CounterStyle::lookup("a"), Ok(CounterStyle::LowerAlpha));
        assert_eq!(CounterStyle::lookup("A"), Ok(CounterStyle::UpperAlpha));
        assert_eq!(CounterStyle::lookup("i"), Ok(CounterStyle::LowerRoman));
        assert_eq!(CounterStyle::lookup("I"), Ok(CounterStyle::UpperRoman));
        assert_eq!(
            "cjk-ideographic".parse(),
            Ok(CounterStyle::TradChineseInformal)
        );
    }

    #[test]
    fn unknown_style_is_rejected() {
        assert_eq!(
            CounterStyle::lookup("disc"),
            Err(UnsupportedStyleError("disc".to_string()))
        );
        assert!(CounterStyle::lookup("X").is_err());
    }

    #[test]
    fn every_style_round_trips_through_its_css_name() {
        for style in CounterStyle::ALL {
            assert_eq!(CounterStyle::lookup(style.css_name()), Ok(style));
        }
    }

    #[test]
    fn basic_styles() {
        let cases = [
            ("decimal", 1, "1"),
            ("decimal", 999, "999"),
            ("binary", 9, "1001"),
            ("binary", 999, "1111100111"),
            ("octal", 91, "133"),
            ("octal", 999, "1747"),
            ("lower-hexadecimal", 91, "5b"),
            ("upper-hexadecimal", 999, "3E7"),
            ("decimal-leading-zero", 1, "01"),
            ("decimal-leading-zero", 91, "91"),
            ("decimal-leading-zero", 999, "999"),
            ("lower-alpha", 9, "i"),
            ("lower-alpha", 91, "cm"),
            ("lower-alpha", 999, "alk"),
            ("upper-alpha", 999, "ALK"),
            ("lower-roman", 9, "ix"),
            ("lower-roman", 91, "xci"),
            ("upper-roman", 999, "CMXCIX"),
            ("upper-roman", 3999, "MMMCMXCIX"),
            ("cjk-decimal", 2024, "二〇二四"),
            ("thai", 42, "๔๒"),
        ];
        for (name, value, expected) in cases {
            let style = CounterStyle::lookup(name).unwrap();
            assert_eq!(style.render(value), expected, "{name} of {value}");
        }
    }

    #[test]
    fn alphabetic_is_bijective_base_26() {
        let lower = CounterStyle::LowerAlpha;
        let upper = CounterStyle::UpperAlpha;
        assert_eq!(lower.render(1), "a");
        assert_eq!(lower.render(26), "z");
        assert_eq!(lower.render(27), "aa");
        assert_eq!(lower.render(52), "az");
        assert_eq!(lower.render(53), "ba");
        assert_eq!(lower.render(702), "zz");
        assert_eq!(lower.render(703), "aaa");

        let mut previous = String::new();
        for n in 1..=2000 {
            let l = lower.render(n);
            let u = upper.render(n);
            assert_eq!(l.to_uppercase(), u);
            assert!(
                (previous.len(), previous.as_str()) < (l.len(), l.as_str()),
                "{previous} should sort before {l}"
            );
            previous = l;
        }
    }

    #[test]
    fn roman_round_trips_up_to_3999() {
        for n in 1..=3999 {
            assert_eq!(decode_roman(&CounterStyle::LowerRoman.render(n)), n);
            assert_eq!(decode_roman(&CounterStyle::UpperRoman.render(n)), n);
        }
    }

    #[test]
    fn out_of_range_values_fall_back() {
        assert_eq!(CounterStyle::UpperRoman.render(4000), "4000");
        assert_eq!(CounterStyle::LowerRoman.render(0), "0");
        assert_eq!(CounterStyle::LowerAlpha.render(0), "0");
        assert_eq!(CounterStyle::Hebrew.render(11000), "11000");
        assert_eq!(CounterStyle::SimpChineseInformal.render(10000), "一〇〇〇〇");
        assert_eq!(CounterStyle::Decimal.render(0), "0");
    }

    #[test]
    fn lower_greek() {
        let greek = CounterStyle::LowerGreek;
        assert_eq!(greek.render(1), "α");
        assert_eq!(greek.render(24), "ω");
        assert_eq!(greek.render(25), "αα");
        assert_eq!(greek.render(51), "βγ");
    }

    #[test]
    fn additive_scripts() {
        assert_eq!(CounterStyle::UpperArmenian.render(1), "Ա");
        assert_eq!(CounterStyle::LowerArmenian.render(11), "ժա");
        assert_eq!(CounterStyle::Hebrew.render(15), "טו");
        assert_eq!(CounterStyle::Hebrew.render(16), "טז");
        assert_eq!(CounterStyle::Hebrew.render(115), "קטו");
        assert_eq!(CounterStyle::Georgian.render(1), "ა");
    }

    #[test]
    fn simplified_chinese_informal() {
        let style = CounterStyle::SimpChineseInformal;
        let cases = [
            (0, "零"),
            (1, "一"),
            (10, "十"),
            (11, "十一"),
            (19, "十九"),
            (20, "二十"),
            (21, "二十一"),
            (100, "一百"),
            (105, "一百零五"),
            (110, "一百一十"),
            (111, "一百一十一"),
            (444, "四百四十四"),
            (1001, "一千零一"),
            (9999, "九千九百九十九"),
        ];
        for (value, expected) in cases {
            assert_eq!(style.render(value), expected, "{value}");
        }
    }

    #[test]
    fn chinese_formal_variants() {
        assert_eq!(CounterStyle::SimpChineseFormal.render(222), "贰佰贰拾贰");
        assert_eq!(CounterStyle::SimpChineseFormal.render(105), "壹佰零伍");
        assert_eq!(CounterStyle::TradChineseFormal.render(333), "參佰參拾參");
        assert_eq!(CounterStyle::TradChineseInformal.render(120), "一百二十");
    }

    #[test]
    fn ethiopic_numeric() {
        let style = CounterStyle::EthiopicNumeric;
        let cases = [
            (1, "፩"),
            (10, "፲"),
            (11, "፲፩"),
            (20, "፳"),
            (90, "፺"),
            (100, "፻"),
            (111, "፻፲፩"),
            (222, "፪፻፳፪"),
            (475, "፬፻፸፭"),
            (83692, "፰፼፴፮፻፺፪"),
            (78_010_092, "፸፰፻፩፼፺፪"),
            (780_100_000_092, "፸፰፻፩፼፼፺፪"),
        ];
        for (value, expected) in cases {
            assert_eq!(style.render(value), expected, "{value}");
        }
    }
}
