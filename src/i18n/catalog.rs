// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation catalog for the portal chrome.
//!
//! Rule content itself lives in the per-language content documents; this
//! table only covers the strings the shell renders around it (control
//! labels, the landing variant, the load-error region). Lookup is a linear
//! scan, which is fine for a few dozen keys rendered once per transition.
//!
//! ## Adding a new language
//!
//! 1. Add a variant to [`Lang`]
//! 2. Add arms to `Lang::code()`, `Lang::from_code()` and `Lang::direction()`
//! 3. Create a `const XX: &[(&str, &str)]` table below
//! 4. Add `Lang::Xx => XX` to the match in `catalog_for()`

use serde::{Deserialize, Serialize};

/// Languages the portal ships content for.
///
/// Each variant maps to an ISO 639-1 two-letter code, used both as the
/// `lang` query parameter and as the content resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Ar,
}

/// Text direction, derived from the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    /// Value for the document `dir` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    /// Arrow pointing in the reading direction.
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Ltr => "→",
            Direction::Rtl => "←",
        }
    }
}

impl Lang {
    /// ISO 639-1 two-letter code for this language.
    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ar => "ar",
        }
    }

    /// Parse a two-letter code. Surrounding whitespace and case are ignored
    /// because the value usually comes from a URL or a stored preference.
    pub fn from_code(code: &str) -> Option<Lang> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Lang::En),
            "ar" => Some(Lang::Ar),
            _ => None,
        }
    }

    /// All supported languages, in display order.
    pub fn all() -> &'static [Lang] {
        &[Lang::En, Lang::Ar]
    }

    pub fn direction(&self) -> Direction {
        match self {
            Lang::En => Direction::Ltr,
            Lang::Ar => Direction::Rtl,
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.direction() == Direction::Rtl
    }
}

impl Default for Lang {
    fn default() -> Self {
        Lang::En
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Lang {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Lang::from_code(value).ok_or_else(|| format!("unsupported language code: {}", value))
    }
}

// ─── Translation Lookup ─────────────────────────────────────────────

/// Look up a chrome string in the specified language.
///
/// Falls back to English if the key is not found in the requested language,
/// and to `""` when English does not have it either.
///
/// # Examples
///
/// ```
/// use rules_portal::i18n::{t, Lang};
/// assert_eq!(t(Lang::En, "nav.back"), "Back");
/// assert_eq!(t(Lang::Ar, "nav.back"), "رجوع");
/// ```
pub fn t(lang: Lang, key: &str) -> &'static str {
    if let Some(value) = lookup(catalog_for(lang), key) {
        return value;
    }
    if lang != Lang::En {
        if let Some(value) = lookup(EN, key) {
            return value;
        }
    }
    ""
}

/// Like [`t`] but returns the key itself when no translation exists.
pub fn t_or_key<'a>(lang: Lang, key: &'a str) -> &'a str {
    let result = t(lang, key);
    if result.is_empty() {
        key
    } else {
        result
    }
}

fn lookup(catalog: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    catalog.iter().find(|(k, _)| *k == key).map(|&(_, v)| v)
}

fn catalog_for(lang: Lang) -> &'static [(&'static str, &'static str)] {
    match lang {
        Lang::En => EN,
        Lang::Ar => AR,
    }
}

// ─── English (every key is defined here) ──────────────

const EN: &[(&str, &str)] = &[
    // Shell fallbacks, used while no content document is available
    ("shell.brand_subtitle", "Official Rules"),
    ("shell.title", "Brotherhood RP – Official Rules"),
    // Landing page variant
    ("home.brand_subtitle", "Rules Portal"),
    ("home.title", "Brotherhood RP — Rules Portal"),
    ("home.subtitle", "Where serious roleplay begins."),
    (
        "home.desc",
        "Find everything you need to know before stepping into the city. Our rules are designed to keep the experience fair, immersive, and enjoyable for everyone — whether you’re a new arrival or a long-time citizen. Browse the categories using the button below and take a moment to understand the standards expected on the server. Respecting the rules protects your progress, your reputation, and the community.\n\nFailure to follow them can result in warnings, temporary suspensions, or permanent bans.",
    ),
    ("home.button", "Open Categories"),
    // Navigation chrome
    ("nav.categories", "Categories"),
    ("nav.categories_subtitle", "Choose a category to view its rules."),
    ("nav.close", "Close"),
    ("nav.back", "Back"),
    ("nav.next", "Next"),
    // Load failure
    ("error.load", "Couldn't load the rules. Check your connection and try again."),
    ("error.retry", "Retry"),
];

// ─── Arabic ──────────────────────────────────────────────────────────

const AR: &[(&str, &str)] = &[
    ("shell.brand_subtitle", "قوانين السيرفر"),
    ("shell.title", "Brotherhood RP – القوانين الرسمية"),
    ("home.brand_subtitle", "بوابة القوانين"),
    ("home.title", "Brotherhood RP — بوابة القوانين"),
    ("home.subtitle", "حيث يبدأ الرول بلاي الجاد."),
    (
        "home.desc",
        "اعثر على كل ما تحتاج معرفته قبل دخول المدينة. قوانيننا مصممة للحفاظ على تجربة عادلة، واقعية، وممتعة للجميع — سواء كنت لاعبًا جديدًا أو من سكان المدينة القدامى. تصفّح الأقسام عبر الزر بالأسفل وخذ لحظة لفهم المعايير المتوقعة داخل السيرفر. احترام القوانين يحمي تقدمك وسمعتك والمجتمع. مخالفة القوانين قد تؤدي إلى تحذيرات، إيقافات مؤقتة، أو باند دائم.",
    ),
    ("home.button", "الدخول إلى الأقسام"),
    ("nav.categories", "الأقسام"),
    ("nav.categories_subtitle", "اختر قسمًا لعرض القوانين الخاصة به."),
    ("nav.close", "إغلاق"),
    ("nav.back", "رجوع"),
    ("nav.next", "التالي"),
    ("error.load", "تعذر تحميل القوانين. تحقق من اتصالك وحاول مرة أخرى."),
    ("error.retry", "إعادة المحاولة"),
];
