//! English pluralization for path segments.
//!
//! A small rule table rather than a full inflection engine: uncountable words,
//! whole-word irregulars, then suffix rules. Only the changed suffix is rewritten,
//! so a camelCase stem like `blogPost` keeps its casing (`blogPosts`).

const UNCOUNTABLE: &[&str] = &[
    "data",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "information",
    "media",
    "metadata",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
    "staff",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("cactus", "cacti"),
    ("child", "children"),
    ("criterion", "criteria"),
    ("die", "dice"),
    ("focus", "foci"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("index", "indices"),
    ("louse", "lice"),
    ("man", "men"),
    ("matrix", "matrices"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("phenomenon", "phenomena"),
    ("quiz", "quizzes"),
    ("radius", "radii"),
    ("tooth", "teeth"),
    ("vertex", "vertices"),
    ("woman", "women"),
];

const F_TO_VES: &[&str] = &[
    "calf", "elf", "half", "knife", "leaf", "life", "loaf", "self", "shelf", "thief", "wife",
    "wolf",
];

/// Singular nouns ending in `s` that would otherwise pass for plurals.
const SINGULAR_S: &[&str] = &[
    "alias", "atlas", "bias", "bonus", "canvas", "census", "gas", "iris", "lens", "virus",
];

const O_TO_OES: &[&str] = &["echo", "hero", "potato", "tomato", "torpedo", "veto"];

/// Returns the plural form of `word`.
///
/// ```
/// use resource_store::inflect::pluralize;
///
/// assert_eq!(pluralize("post"), "posts");
/// assert_eq!(pluralize("person"), "people");
/// assert_eq!(pluralize("Category"), "Categories");
/// ```
pub fn pluralize(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return restore_case(word, plural);
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
        return word.to_string();
    }

    let (strip, suffix) = if SINGULAR_S.contains(&last_component(word).as_str()) {
        (0, "es")
    } else {
        regular_suffix(&lower)
    };
    let suffix = if is_shouting(word) {
        suffix.to_uppercase()
    } else {
        suffix.to_string()
    };

    match word.len().checked_sub(strip) {
        Some(end) if word.is_char_boundary(end) => format!("{}{}", &word[..end], suffix),
        _ => format!("{}{}", &lower[..lower.len() - strip], suffix),
    }
}

/// How many trailing bytes to drop and what to append.
fn regular_suffix(lower: &str) -> (usize, &'static str) {
    if F_TO_VES.contains(&lower) {
        return if lower.ends_with("fe") { (2, "ves") } else { (1, "ves") };
    }
    if O_TO_OES.contains(&lower) {
        return (0, "es");
    }
    if lower.ends_with("ss") || lower.ends_with("us") {
        return (0, "es");
    }
    if lower.ends_with("is") {
        return (2, "es");
    }
    if lower.ends_with('s') {
        // already plural
        return (0, "");
    }
    if lower.ends_with('x') || lower.ends_with('z') || lower.ends_with("ch") || lower.ends_with("sh")
    {
        return (0, "es");
    }
    if let Some(stem) = lower.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !"aeiou".contains(c)) {
            return (1, "ies");
        }
    }
    (0, "s")
}

/// The last camelCase, snake_case or kebab-case component of `word`, lowercased.
fn last_component(word: &str) -> String {
    if is_shouting(word) {
        return word.to_lowercase();
    }
    let start = word
        .char_indices()
        .filter(|&(i, c)| i > 0 && (c.is_uppercase() || c == '_' || c == '-'))
        .map(|(i, c)| if c.is_uppercase() { i } else { i + c.len_utf8() })
        .last()
        .unwrap_or(0);
    word[start..].to_lowercase()
}

fn is_shouting(word: &str) -> bool {
    word.chars().count() > 1
        && word.chars().any(char::is_alphabetic)
        && !word.chars().any(char::is_lowercase)
}

fn restore_case(original: &str, plural: &str) -> String {
    if is_shouting(original) {
        return plural.to_uppercase();
    }
    let mut chars = original.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            let mut out = String::with_capacity(plural.len());
            let mut plural_chars = plural.chars();
            if let Some(head) = plural_chars.next() {
                out.extend(head.to_uppercase());
            }
            out.extend(plural_chars);
            out
        }
        _ => plural.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_words() {
        assert_eq!(pluralize("post"), "posts");
        assert_eq!(pluralize("comment"), "comments");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("church"), "churches");
        assert_eq!(pluralize("wish"), "wishes");
        assert_eq!(pluralize("class"), "classes");
        assert_eq!(pluralize("status"), "statuses");
        assert_eq!(pluralize("photo"), "photos");
    }

    #[test]
    fn singular_words_ending_in_s() {
        assert_eq!(pluralize("alias"), "aliases");
        assert_eq!(pluralize("canvas"), "canvases");
        assert_eq!(pluralize("atlas"), "atlases");
        assert_eq!(pluralize("gas"), "gases");
        assert_eq!(pluralize("lens"), "lenses");
        assert_eq!(pluralize("iris"), "irises");
        assert_eq!(pluralize("bus"), "buses");
        assert_eq!(pluralize("userAlias"), "userAliases");
        assert_eq!(pluralize("post_alias"), "post_aliases");
        assert_eq!(pluralize("ALIAS"), "ALIASES");
        assert_eq!(pluralize("aliases"), "aliases");
        assert_eq!(pluralize("sagas"), "sagas");
    }

    #[test]
    fn irregular_and_uncountable_words() {
        assert_eq!(pluralize("person"), "people");
        assert_eq!(pluralize("child"), "children");
        assert_eq!(pluralize("mouse"), "mice");
        assert_eq!(pluralize("sheep"), "sheep");
        assert_eq!(pluralize("knife"), "knives");
        assert_eq!(pluralize("leaf"), "leaves");
        assert_eq!(pluralize("hero"), "heroes");
        assert_eq!(pluralize("analysis"), "analyses");
    }

    #[test]
    fn plural_input_is_kept() {
        assert_eq!(pluralize("posts"), "posts");
        assert_eq!(pluralize("people"), "people");
    }

    #[test]
    fn casing_is_preserved() {
        assert_eq!(pluralize("Person"), "People");
        assert_eq!(pluralize("USER"), "USERS");
        assert_eq!(pluralize("blogPost"), "blogPosts");
        assert_eq!(pluralize("Story"), "Stories");
        assert_eq!(pluralize(""), "");
    }
}
