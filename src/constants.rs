pub mod canonical {

    pub const TITLE_TYPES: &[&str] = &["movie", "tv_show"];

    pub const DURATION_UNITS: &[&str] = &["minutes", "seasons"];

    pub const RATINGS: &[&str] = &[
        "G", "NC-17", "NR", "PG", "PG-13", "R", "TV-14", "TV-G", "TV-MA", "TV-PG", "TV-Y", "TV-Y7",
        "TV-Y7-FV", "UR",
    ];

    pub const GENRES: &[&str] = &[
        "Action & Adventure",
        "Anime Features",
        "Anime Series",
        "British TV Shows",
        "Children & Family Movies",
        "Classic & Cult TV",
        "Classic Movies",
        "Comedies",
        "Crime TV Shows",
        "Cult Movies",
        "Documentaries",
        "Docuseries",
        "Dramas",
        "Faith & Spirituality",
        "Horror Movies",
        "Independent Movies",
        "International Movies",
        "International TV Shows",
        "Kids' TV",
        "Korean TV Shows",
        "LGBTQ Movies",
        "Movies",
        "Music & Musicals",
        "Reality TV",
        "Romantic Movies",
        "Romantic TV Shows",
        "Sci-Fi & Fantasy",
        "Science & Nature TV",
        "Spanish-Language TV Shows",
        "Sports Movies",
        "Stand-Up Comedy",
        "Stand-Up Comedy & Talk Shows",
        "TV Action & Adventure",
        "TV Comedies",
        "TV Dramas",
        "TV Horror",
        "TV Mysteries",
        "TV Sci-Fi & Fantasy",
        "TV Shows",
        "TV Thrillers",
        "Teen TV Shows",
        "Thrillers",
    ];

    pub const COUNTRIES: &[&str] = &[
        "Afghanistan",
        "Albania",
        "Algeria",
        "Angola",
        "Argentina",
        "Armenia",
        "Australia",
        "Austria",
        "Azerbaijan",
        "Bahamas",
        "Bangladesh",
        "Belarus",
        "Belgium",
        "Bermuda",
        "Botswana",
        "Brazil",
        "Bulgaria",
        "Cambodia",
        "Canada",
        "Cayman Islands",
        "Chile",
        "China",
        "Colombia",
        "Croatia",
        "Cuba",
        "Cyprus",
        "Czech Republic",
        "Denmark",
        "Dominican Republic",
        "East Germany",
        "Ecuador",
        "Egypt",
        "Finland",
        "France",
        "Georgia",
        "Germany",
        "Ghana",
        "Greece",
        "Guatemala",
        "Hong Kong",
        "Hungary",
        "Iceland",
        "India",
        "Indonesia",
        "Iran",
        "Iraq",
        "Ireland",
        "Israel",
        "Italy",
        "Jamaica",
        "Japan",
        "Jordan",
        "Kazakhstan",
        "Kenya",
        "Kuwait",
        "Latvia",
        "Lebanon",
        "Liechtenstein",
        "Lithuania",
        "Luxembourg",
        "Malawi",
        "Malaysia",
        "Malta",
        "Mauritius",
        "Mexico",
        "Mongolia",
        "Montenegro",
        "Morocco",
        "Namibia",
        "Nepal",
        "Netherlands",
        "New Zealand",
        "Nicaragua",
        "Nigeria",
        "Norway",
        "Pakistan",
        "Panama",
        "Paraguay",
        "Peru",
        "Philippines",
        "Poland",
        "Portugal",
        "Puerto Rico",
        "Qatar",
        "Romania",
        "Russia",
        "Samoa",
        "Saudi Arabia",
        "Senegal",
        "Serbia",
        "Singapore",
        "Slovakia",
        "Slovenia",
        "Somalia",
        "South Africa",
        "South Korea",
        "Soviet Union",
        "Spain",
        "Sri Lanka",
        "Sudan",
        "Sweden",
        "Switzerland",
        "Syria",
        "Taiwan",
        "Thailand",
        "Turkey",
        "Uganda",
        "Ukraine",
        "United Arab Emirates",
        "United Kingdom",
        "United States",
        "Uruguay",
        "Vatican City",
        "Venezuela",
        "Vietnam",
        "West Germany",
        "Zimbabwe",
    ];

    /// Extra spellings that the generated variants do not cover.
    pub const GENRE_EXTRA_ALIASES: &[(&str, &str)] =
        &[("anime", "Anime Series"), ("Anime", "Anime Series")];
}

pub mod limits {

    pub const MAX_INSERT_ATTEMPTS: u32 = 10;

    pub const DEFAULT_PER_PAGE: u64 = 10;

    pub const MAX_PER_PAGE: u64 = 1000;

    pub const SEARCH_MIN_LEN: usize = 2;

    pub const SEARCH_MAX_LEN: usize = 50;

    /// Upper bound for generated title ids (9 digits).
    pub const TITLE_ID_MAX: i32 = 999_999_999;

    pub const TITLE_ID_MIN: i32 = 100_000_000;
}

pub mod cache {

    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

    /// One week.
    pub const MAX_TIMEOUT_SECONDS: u64 = 7 * 24 * 60 * 60;
}
