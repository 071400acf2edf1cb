//! Keyword extraction from free-text captions.
//!
//! Caption-only models (BLIP) return an English sentence rather than
//! structured fields. Location and scene are derived by scanning the
//! lower-cased caption against two ordered keyword dictionaries — first
//! match wins, so more specific keywords come first.

/// Token used when no location keyword matches.
pub const UNKNOWN_LOCATION: &str = "Unbekannt";
/// Token used when no scene keyword matches.
pub const DEFAULT_SCENE: &str = "standard";

/// English caption keywords mapped to German location categories.
const LOCATION_KEYWORDS: &[(&str, &str)] = &[
    ("sign", "Schild"),
    ("signboard", "Schild"),
    ("placard", "Schild"),
    ("beach", "Strand"),
    ("ocean", "Strand"),
    ("sea", "Meer"),
    ("restaurant", "Restaurant"),
    ("cafe", "Café"),
    ("coffee", "Café"),
    ("park", "Park"),
    ("garden", "Garten"),
    ("building", "Gebäude"),
    ("house", "Haus"),
    ("home", "Zuhause"),
    ("street", "Straße"),
    ("road", "Straße"),
    ("indoor", "Innenraum"),
    ("room", "Raum"),
    ("outdoor", "Außen"),
    ("outside", "Außen"),
    ("car", "Auto"),
    ("vehicle", "Fahrzeug"),
    ("forest", "Wald"),
    ("tree", "Wald"),
    ("mountain", "Berg"),
    ("city", "Stadt"),
    ("office", "Büro"),
    ("kitchen", "Küche"),
    ("bedroom", "Schlafzimmer"),
    ("bathroom", "Badezimmer"),
    ("living room", "Wohnzimmer"),
];

/// English caption keywords mapped to German scene descriptions.
const SCENE_KEYWORDS: &[(&str, &str)] = &[
    ("sunny", "sonnig"),
    ("sun", "sonnig"),
    ("dark", "dunkel"),
    ("bright", "hell"),
    ("light", "hell"),
    ("cloudy", "bewölkt"),
    ("cloud", "bewölkt"),
    ("night", "Nacht"),
    ("evening", "Abend"),
    ("morning", "Morgen"),
    ("day", "Tag"),
    ("colorful", "bunt"),
    ("black and white", "schwarzweiß"),
    ("modern", "modern"),
    ("old", "alt"),
    ("new", "neu"),
    ("beautiful", "schön"),
    ("empty", "leer"),
    ("crowded", "voll"),
    ("quiet", "ruhig"),
    ("busy", "belebt"),
];

/// First matching location token for `caption`, if any.
pub fn location_from_caption(caption: &str) -> Option<&'static str> {
    let lower = caption.to_lowercase();
    LOCATION_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, token)| *token)
}

/// First matching scene token for `caption`, if any.
pub fn scene_from_caption(caption: &str) -> Option<&'static str> {
    let lower = caption.to_lowercase();
    SCENE_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, token)| *token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_match() {
        assert_eq!(
            location_from_caption("a sandy beach with palm trees"),
            Some("Strand")
        );
        assert_eq!(
            location_from_caption("A BUSY RESTAURANT at night"),
            Some("Restaurant")
        );
    }

    #[test]
    fn test_first_match_wins() {
        // "sign" precedes "street" in the dictionary
        assert_eq!(
            location_from_caption("a street sign near the road"),
            Some("Schild")
        );
    }

    #[test]
    fn test_scene_match() {
        assert_eq!(scene_from_caption("a sunny day at the park"), Some("sonnig"));
        assert_eq!(scene_from_caption("dark alley"), Some("dunkel"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(location_from_caption("abstract shapes"), None);
        assert_eq!(scene_from_caption("abstract shapes"), None);
    }
}
