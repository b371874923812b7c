//! Station name normalization.
//!
//! HAFAS station names carry mode markers, district qualifiers and long
//! suffixes ("S+U Berlin Hauptbahnhof", "U Alt-Tegel", "Rathaus Spandau (Berlin)").
//! The board has room for a short name only, so every direction and transfer
//! station goes through [`normalize`] before display or grouping.

use std::sync::LazyLock;

use regex::Regex;

/// Rewrite rules, applied in order. Later rules see the output of earlier
/// ones, so reordering changes results.
static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        // Mode marker: "U ", "S ", "S+U "
        (r"^(U|S)(\+U)? ", ""),
        (r"^Alt-", ""),
        // Qualifiers after a comma or an arrow
        (r"(,|\s->) .*$", ""),
        // District suffix: "Zoo/Tiergarten", "Mitte/ Ost"
        (r"/\s?\w+$", ""),
        (r"\sHauptbahnhof$", ""),
        (r"\sHbf\.?$", ""),
        (r"\sStr(\.|aße)$", " Str."),
        (r"^Friedrich-Ludwig-Jahn-Sportpark", "Friedr.-L.-Jahn-Sportp."),
        (r"^Rathaus ", ""),
        (r"^Betriebshof ", "BVG-Hof "),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        let regex = Regex::new(pattern).expect("station rule must be a valid regex");
        (regex, replacement)
    })
    .collect()
});

/// Shorten a raw station name to its display form.
///
/// # Examples
///
/// ```
/// use departure_board::domain::normalize;
///
/// assert_eq!(normalize("U Alt-Tegel"), "Tegel");
/// assert_eq!(normalize("S+U Berlin Hauptbahnhof"), "Berlin");
/// assert_eq!(normalize("U Afrikanische Straße"), "Afrikanische Str.");
/// assert_eq!(normalize("S Westend, Berlin"), "Westend");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut name = raw.to_string();
    for (regex, replacement) in RULES.iter() {
        name = regex.replace(&name, *replacement).into_owned();
    }
    name
}
