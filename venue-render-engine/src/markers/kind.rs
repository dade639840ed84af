/// Known marker kinds plus an explicit fallback for anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Entrance,
    Exit,
    Stage,
    Booth,
    SponsorBooth,
    InfoBooth,
    Food,
    Bathroom,
    Info,
    Unrecognized(String),
}

impl MarkerKind {
    /// Resolve an open-ended type tag. Tags match exactly; anything else,
    /// including case or separator variants, is kept verbatim as `Unrecognized`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "entrance" => Self::Entrance,
            "exit" => Self::Exit,
            "stage" => Self::Stage,
            "booth" => Self::Booth,
            "sponsor_booth" => Self::SponsorBooth,
            "info_booth" => Self::InfoBooth,
            "food" => Self::Food,
            "bathroom" => Self::Bathroom,
            "info" => Self::Info,
            _ => Self::Unrecognized(tag.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Entrance => "entrance",
            Self::Exit => "exit",
            Self::Stage => "stage",
            Self::Booth => "booth",
            Self::SponsorBooth => "sponsor_booth",
            Self::InfoBooth => "info_booth",
            Self::Food => "food",
            Self::Bathroom => "bathroom",
            Self::Info => "info",
            Self::Unrecognized(tag) => tag,
        }
    }

    /// Human readable type shown in the detail popup.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Entrance => "Entrance",
            Self::Exit => "Exit",
            Self::Stage => "Stage",
            Self::Booth => "Booth",
            Self::SponsorBooth => "Sponsor Booth",
            Self::InfoBooth => "Info Booth",
            Self::Food => "Food & Drink",
            Self::Bathroom => "Restrooms",
            Self::Info => "Information",
            Self::Unrecognized(_) => "Point of Interest",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Icon lookup, independent of the geometry table.
    pub fn icon(&self) -> MarkerIcon {
        match self {
            Self::Entrance => MarkerIcon::DoorOpen,
            Self::Exit => MarkerIcon::DoorExit,
            Self::Stage => MarkerIcon::Music,
            Self::Booth => MarkerIcon::Store,
            Self::SponsorBooth => MarkerIcon::Star,
            Self::InfoBooth => MarkerIcon::Help,
            Self::Food => MarkerIcon::Utensils,
            Self::Bathroom => MarkerIcon::Restroom,
            Self::Info => MarkerIcon::Info,
            Self::Unrecognized(_) => MarkerIcon::DEFAULT,
        }
    }
}

/// Fixed icon set used by hover labels and the detail popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerIcon {
    DoorOpen,
    DoorExit,
    Music,
    Store,
    Star,
    Help,
    Utensils,
    Restroom,
    Info,
}

impl MarkerIcon {
    pub const DEFAULT: MarkerIcon = MarkerIcon::Info;

    /// Icon identifier for a frontend icon set.
    pub fn name(self) -> &'static str {
        match self {
            Self::DoorOpen => "door-open",
            Self::DoorExit => "door-closed",
            Self::Music => "music",
            Self::Store => "store",
            Self::Star => "star",
            Self::Help => "help-circle",
            Self::Utensils => "utensils",
            Self::Restroom => "bath",
            Self::Info => "info",
        }
    }

    /// Short badge text renderable with the built-in UI font.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::DoorOpen => "IN",
            Self::DoorExit => "OUT",
            Self::Music => "STAGE",
            Self::Store => "SHOP",
            Self::Star => "*",
            Self::Help => "?",
            Self::Utensils => "FOOD",
            Self::Restroom => "WC",
            Self::Info => "i",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_known_kinds() {
        for tag in [
            "entrance",
            "exit",
            "stage",
            "booth",
            "sponsor_booth",
            "info_booth",
            "food",
            "bathroom",
            "info",
        ] {
            let kind = MarkerKind::from_tag(tag);
            assert!(kind.is_recognized(), "{tag} should be recognised");
            assert_eq!(kind.tag(), tag);
        }
    }

    #[test]
    fn tags_match_exactly() {
        for tag in ["ENTRANCE", "Sponsor Booth", "sponsor-booth", " stage"] {
            let kind = MarkerKind::from_tag(tag);
            assert_eq!(kind, MarkerKind::Unrecognized(tag.into()));
            assert_eq!(kind.icon(), MarkerIcon::DEFAULT);
        }
    }

    #[test]
    fn unknown_tag_uses_default_icon() {
        let kind = MarkerKind::from_tag("unknown_type_xyz");
        assert_eq!(kind, MarkerKind::Unrecognized("unknown_type_xyz".into()));
        assert_eq!(kind.tag(), "unknown_type_xyz");
        assert_eq!(kind.icon(), MarkerIcon::DEFAULT);
        assert_eq!(kind.display_name(), "Point of Interest");
    }

    #[test]
    fn empty_tag_is_unrecognised() {
        assert!(!MarkerKind::from_tag("").is_recognized());
    }
}
