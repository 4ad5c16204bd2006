/// League venue. Ids are the ones stored in `matches.venue_id`.
#[derive(Debug, Clone)]
pub struct VenueConfig {
    pub id: i64,
    pub slug: &'static str,
    pub name: &'static str,
}

impl VenueConfig {
    pub fn new(id: i64, slug: &'static str, name: &'static str) -> Self {
        Self { id, slug, name }
    }
}

/// Get the list of league venues
pub fn get_venues() -> Vec<VenueConfig> {
    vec![
        VenueConfig::new(1, "cheyenne", "Cheyenne"),
        VenueConfig::new(2, "laramie", "Laramie"),
        VenueConfig::new(3, "pawnee", "Pawnee"),
        VenueConfig::new(4, "larkspur", "Larkspur"),
        VenueConfig::new(5, "rawlins", "Rawlins"),
    ]
}

pub fn find_by_slug(slug: &str) -> Option<VenueConfig> {
    let slug = slug.trim().to_lowercase();
    get_venues().into_iter().find(|v| v.slug == slug)
}

pub fn find_by_id(id: i64) -> Option<VenueConfig> {
    get_venues().into_iter().find(|v| v.id == id)
}

/// First venue whose slug appears in the match name.
pub fn venue_for_match_name(match_name: &str) -> Option<VenueConfig> {
    let lower = match_name.to_lowercase();
    get_venues().into_iter().find(|v| lower.contains(v.slug))
}
