//! Table-driven counter systems.
//!
//! Each system renders a value or returns `None` when the value lies outside
//! what it can represent; the caller then defers to the style's fallback.

use super::CounterStyle;

const DECIMAL: &str = "0123456789";
const HEXADECIMAL_LOWER: &str = "0123456789abcdef";
const HEXADECIMAL_UPPER: &str = "0123456789ABCDEF";

const LATIN_LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const LATIN_UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const GREEK_LOWER: &str = "αβγδεζηθικλμνξοπρστυφχψω";
const HIRAGANA: &str = "あいうえおかきくけこさしすせそたちつてとなにぬねのはひふへほまみむめもやゆよらりるれろわゐゑをん";
const KATAKANA: &str = "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヰヱヲン";
const EARTHLY_BRANCH: &str = "子丑寅卯辰巳午未申酉戌亥";
const HEAVENLY_STEM: &str = "甲乙丙丁戊己庚辛壬癸";

const ROMAN_LOWER: &[(u64, &str)] = &[
    (1000, "m"),
    (900, "cm"),
    (500, "d"),
    (400, "cd"),
    (100, "c"),
    (90, "xc"),
    (50, "l"),
    (40, "xl"),
    (10, "x"),
    (9, "ix"),
    (5, "v"),
    (4, "iv"),
    (1, "i"),
];

const ROMAN_UPPER: &[(u64, &str)] = &[
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

const ARMENIAN_UPPER: &[(u64, &str)] = &[
    (9000, "Ք"),
    (8000, "Փ"),
    (7000, "Ւ"),
    (6000, "Ց"),
    (5000, "Ր"),
    (4000, "Տ"),
    (3000, "Վ"),
    (2000, "Ս"),
    (1000, "Ռ"),
    (900, "Ջ"),
    (800, "Պ"),
    (700, "Չ"),
    (600, "Ո"),
    (500, "Շ"),
    (400, "Ն"),
    (300, "Յ"),
    (200, "Մ"),
    (100, "Ճ"),
    (90, "Ղ"),
    (80, "Ձ"),
    (70, "Հ"),
    (60, "Կ"),
    (50, "Ծ"),
    (40, "Խ"),
    (30, "Լ"),
    (20, "Ի"),
    (10, "Ժ"),
    (9, "Թ"),
    (8, "Ը"),
    (7, "Է"),
    (6, "Զ"),
    (5, "Ե"),
    (4, "Դ"),
    (3, "Գ"),
    (2, "Բ"),
    (1, "Ա"),
];

const ARMENIAN_LOWER: &[(u64, &str)] = &[
    (9000, "ք"),
    (8000, "փ"),
    (7000, "ւ"),
    (6000, "ց"),
    (5000, "ր"),
    (4000, "տ"),
    (3000, "վ"),
    (2000, "ս"),
    (1000, "ռ"),
    (900, "ջ"),
    (800, "պ"),
    (700, "չ"),
    (600, "ո"),
    (500, "շ"),
    (400, "ն"),
    (300, "յ"),
    (200, "մ"),
    (100, "ճ"),
    (90, "ղ"),
    (80, "ձ"),
    (70, "հ"),
    (60, "կ"),
    (50, "ծ"),
    (40, "խ"),
    (30, "լ"),
    (20, "ի"),
    (10, "ժ"),
    (9, "թ"),
    (8, "ը"),
    (7, "է"),
    (6, "զ"),
    (5, "ե"),
    (4, "դ"),
    (3, "գ"),
    (2, "բ"),
    (1, "ա"),
];

const GEORGIAN: &[(u64, &str)] = &[
    (10000, "ჵ"),
    (9000, "ჰ"),
    (8000, "ჯ"),
    (7000, "ჴ"),
    (6000, "ხ"),
    (5000, "ჭ"),
    (4000, "წ"),
    (3000, "ძ"),
    (2000, "ც"),
    (1000, "ჩ"),
    (900, "შ"),
    (800, "ყ"),
    (700, "ღ"),
    (600, "ქ"),
    (500, "ფ"),
    (400, "ჳ"),
    (300, "ტ"),
    (200, "ს"),
    (100, "რ"),
    (90, "ჟ"),
    (80, "პ"),
    (70, "ო"),
    (60, "ჲ"),
    (50, "ნ"),
    (40, "მ"),
    (30, "ლ"),
    (20, "კ"),
    (10, "ი"),
    (9, "თ"),
    (8, "ჱ"),
    (7, "ზ"),
    (6, "ვ"),
    (5, "ე"),
    (4, "დ"),
    (3, "გ"),
    (2, "ბ"),
    (1, "ა"),
];

// 15 and 16 are written טו and טז, never יה and יו.
const HEBREW: &[(u64, &str)] = &[
    (10000, "י׳"),
    (9000, "ט׳"),
    (8000, "ח׳"),
    (7000, "ז׳"),
    (6000, "ו׳"),
    (5000, "ה׳"),
    (4000, "ד׳"),
    (3000, "ג׳"),
    (2000, "ב׳"),
    (1000, "א׳"),
    (400, "ת"),
    (300, "ש"),
    (200, "ר"),
    (100, "ק"),
    (90, "צ"),
    (80, "פ"),
    (70, "ע"),
    (60, "ס"),
    (50, "נ"),
    (40, "מ"),
    (30, "ל"),
    (20, "כ"),
    (19, "יט"),
    (18, "יח"),
    (17, "יז"),
    (16, "טז"),
    (15, "טו"),
    (10, "י"),
    (9, "ט"),
    (8, "ח"),
    (7, "ז"),
    (6, "ו"),
    (5, "ה"),
    (4, "ד"),
    (3, "ג"),
    (2, "ב"),
    (1, "א"),
];

/// Digit glyphs and positional markers for the limited Chinese systems.
pub struct ChineseTables {
    digits: &'static str,
    markers: [&'static str; 4],
    informal: bool,
}

const SIMP_INFORMAL: ChineseTables = ChineseTables {
    digits: "零一二三四五六七八九",
    markers: ["", "十", "百", "千"],
    informal: true,
};

const SIMP_FORMAL: ChineseTables = ChineseTables {
    digits: "零壹贰叁肆伍陆柒捌玖",
    markers: ["", "拾", "佰", "仟"],
    informal: false,
};

const TRAD_INFORMAL: ChineseTables = ChineseTables {
    digits: "零一二三四五六七八九",
    markers: ["", "十", "百", "千"],
    informal: true,
};

const TRAD_FORMAL: ChineseTables = ChineseTables {
    digits: "零壹貳參肆伍陸柒捌玖",
    markers: ["", "拾", "佰", "仟"],
    informal: false,
};

const ETHIOPIC_ONES: &str = "፩፪፫፬፭፮፯፰፱";
const ETHIOPIC_TENS: &str = "፲፳፴፵፶፷፸፹፺";
const ETHIOPIC_HUNDRED: char = '፻';
const ETHIOPIC_TEN_THOUSAND: char = '፼';

/// The algorithm family behind a [`CounterStyle`].
pub enum System {
    /// Positional notation over the given digits, left-padded to `pad`.
    Numeric { digits: &'static str, pad: usize },
    /// Bijective positional notation (no zero digit).
    Alphabetic(&'static str),
    /// Greedy sum of weighted symbols, valid from 1 to `max`.
    Additive {
        symbols: &'static [(u64, &'static str)],
        max: u64,
    },
    /// Limited Chinese numbering, valid from 0 to 9999.
    Chinese(&'static ChineseTables),
    /// Ethiopic numbering in base-100 groups.
    Ethiopic,
}

impl System {
    pub const fn of(style: CounterStyle) -> Self {
        use CounterStyle as S;

        match style {
            S::Decimal => numeric(DECIMAL),
            S::DecimalLeadingZero => Self::Numeric {
                digits: DECIMAL,
                pad: 2,
            },
            S::Binary => numeric("01"),
            S::Octal => numeric("01234567"),
            S::LowerHexadecimal => numeric(HEXADECIMAL_LOWER),
            S::UpperHexadecimal => numeric(HEXADECIMAL_UPPER),
            S::CjkDecimal => numeric("〇一二三四五六七八九"),
            S::ArabicIndic => numeric("٠١٢٣٤٥٦٧٨٩"),
            S::Bengali => numeric("০১২৩৪৫৬৭৮৯"),
            S::Cambodian => numeric("០១២៣៤៥៦៧៨៩"),
            S::Devanagari => numeric("०१२३४५६७८९"),
            S::Gujarati => numeric("૦૧૨૩૪૫૬૭૮૯"),
            S::Gurmukhi => numeric("੦੧੨੩੪੫੬੭੮੯"),
            S::Kannada => numeric("೦೧೨೩೪೫೬೭೮೯"),
            S::Lao => numeric("໐໑໒໓໔໕໖໗໘໙"),
            S::Malayalam => numeric("൦൧൨൩൪൫൬൭൮൯"),
            S::Mongolian => numeric("᠐᠑᠒᠓᠔᠕᠖᠗᠘᠙"),
            S::Myanmar => numeric("၀၁၂၃၄၅၆၇၈၉"),
            S::Oriya => numeric("୦୧୨୩୪୫୬୭୮୯"),
            S::Persian => numeric("۰۱۲۳۴۵۶۷۸۹"),
            S::Tamil => numeric("௦௧௨௩௪௫௬௭௮௯"),
            S::Telugu => numeric("౦౧౨౩౪౫౬౭౮౯"),
            S::Thai => numeric("๐๑๒๓๔๕๖๗๘๙"),
            S::Tibetan => numeric("༠༡༢༣༤༥༦༧༨༩"),
            S::LowerAlpha => Self::Alphabetic(LATIN_LOWER),
            S::UpperAlpha => Self::Alphabetic(LATIN_UPPER),
            S::LowerGreek => Self::Alphabetic(GREEK_LOWER),
            S::Hiragana => Self::Alphabetic(HIRAGANA),
            S::Katakana => Self::Alphabetic(KATAKANA),
            S::CjkEarthlyBranch => Self::Alphabetic(EARTHLY_BRANCH),
            S::CjkHeavenlyStem => Self::Alphabetic(HEAVENLY_STEM),
            S::LowerRoman => additive(ROMAN_LOWER, 3999),
            S::UpperRoman => additive(ROMAN_UPPER, 3999),
            S::LowerArmenian => additive(ARMENIAN_LOWER, 9999),
            S::UpperArmenian => additive(ARMENIAN_UPPER, 9999),
            S::Georgian => additive(GEORGIAN, 19999),
            S::Hebrew => additive(HEBREW, 10999),
            S::SimpChineseInformal => Self::Chinese(&SIMP_INFORMAL),
            S::SimpChineseFormal => Self::Chinese(&SIMP_FORMAL),
            S::TradChineseInformal => Self::Chinese(&TRAD_INFORMAL),
            S::TradChineseFormal => Self::Chinese(&TRAD_FORMAL),
            S::EthiopicNumeric => Self::Ethiopic,
        }
    }

    pub fn render(&self, n: u64) -> Option<String> {
        match self {
            Self::Numeric { digits, pad } => Some(render_numeric(digits, *pad, n)),
            Self::Alphabetic(symbols) => render_alphabetic(symbols, n),
            Self::Additive { symbols, max } => {
                (1..=*max).contains(&n).then(|| render_additive(symbols, n))
            }
            Self::Chinese(tables) => (n <= 9999).then(|| render_chinese(tables, n)),
            Self::Ethiopic => (n >= 1).then(|| render_ethiopic(n)),
        }
    }
}

const fn numeric(digits: &'static str) -> System {
    System::Numeric { digits, pad: 0 }
}

const fn additive(symbols: &'static [(u64, &'static str)], max: u64) -> System {
    System::Additive { symbols, max }
}

fn glyph(symbols: &str, index: u64) -> char {
    usize::try_from(index)
        .ok()
        .and_then(|i| symbols.chars().nth(i))
        .unwrap_or('?')
}

fn radix(symbols: &str) -> u64 {
    symbols.chars().count() as u64
}

fn render_numeric(digits: &str, pad: usize, mut n: u64) -> String {
    let base = radix(digits);
    let mut out = Vec::new();
    loop {
        out.push(glyph(digits, n % base));
        n /= base;
        if n == 0 {
            break;
        }
    }
    let zero = glyph(digits, 0);
    while out.len() < pad {
        out.push(zero);
    }
    out.iter().rev().collect()
}

fn render_alphabetic(symbols: &str, mut n: u64) -> Option<String> {
    if n == 0 {
        return None;
    }
    let base = radix(symbols);
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(glyph(symbols, n % base));
        n /= base;
    }
    Some(out.iter().rev().collect())
}

fn render_additive(symbols: &[(u64, &str)], mut n: u64) -> String {
    let mut out = String::new();
    for &(weight, symbol) in symbols {
        while n >= weight {
            out.push_str(symbol);
            n -= weight;
        }
    }
    out
}

/// Positional digits with markers, collapsing runs of zero digits.
fn render_chinese(tables: &ChineseTables, n: u64) -> String {
    if n == 0 {
        return glyph(tables.digits, 0).to_string();
    }

    // (digit, power) from most significant; n <= 9999 so at most four places.
    let places: Vec<(u64, usize)> = (0..4u32)
        .rev()
        .map(|power| (n / 10u64.pow(power) % 10, power as usize))
        .skip_while(|&(digit, _)| digit == 0)
        .collect();

    let drop_leading_one = tables.informal && (10..=19).contains(&n);
    let mut out = String::new();
    let mut pending_zero = false;
    for (i, &(digit, power)) in places.iter().enumerate() {
        if digit == 0 {
            pending_zero = true;
            continue;
        }
        if pending_zero {
            out.push(glyph(tables.digits, 0));
            pending_zero = false;
        }
        if !(i == 0 && drop_leading_one) {
            out.push(glyph(tables.digits, digit));
        }
        out.push_str(tables.markers[power]);
    }
    out
}

fn render_ethiopic(n: u64) -> String {
    if n == 1 {
        return glyph(ETHIOPIC_ONES, 0).to_string();
    }

    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push(rest % 100);
        rest /= 100;
    }

    let most_significant = groups.len() - 1;
    let mut out = String::new();
    for (index, &group) in groups.iter().enumerate().rev() {
        let odd = index % 2 == 1;
        let elide = group == 1 && (index == most_significant || odd);
        if group != 0 && !elide {
            let (tens, ones) = (group / 10, group % 10);
            if tens > 0 {
                out.push(glyph(ETHIOPIC_TENS, tens - 1));
            }
            if ones > 0 {
                out.push(glyph(ETHIOPIC_ONES, ones - 1));
            }
        }
        if odd && group != 0 {
            out.push(ETHIOPIC_HUNDRED);
        } else if !odd && index != 0 {
            out.push(ETHIOPIC_TEN_THOUSAND);
        }
    }
    out
}
