/// Column-name constants for the kiezname corpus.
/// Single source of truth for every stage of the pipeline.

// ── Raw source columns (as written in the published CSVs) ───────────────────
pub mod raw {
    pub const VORNAME: &str = "vorname";
    pub const GESCHLECHT: &str = "geschlecht";
    pub const ANZAHL: &str = "anzahl";
    pub const POSITION: &str = "position";
}

// ── Canonical corpus columns ────────────────────────────────────────────────
pub mod corpus {
    pub const NAME: &str = "name";
    pub const GENDER: &str = "gender";
    pub const POSITION: &str = "position";
    pub const YEAR: &str = "year";
    pub const KIEZ: &str = "kiez";
    pub const COUNT: &str = "count";

    /// Natural key of the corpus; the assembler enforces uniqueness over it.
    pub const NATURAL_KEY: [&str; 5] = [NAME, GENDER, POSITION, YEAR, KIEZ];

    /// Column order of an assembled corpus frame.
    pub const ALL: [&str; 6] = [NAME, GENDER, POSITION, YEAR, KIEZ, COUNT];
}

// ── Gender values ───────────────────────────────────────────────────────────
pub mod gender {
    pub const MALE: &str = "m";
    pub const FEMALE: &str = "w";
}

// ── Derived per-name feature columns ────────────────────────────────────────
pub mod features {
    pub const UNISEX_SCORE: &str = "unisex_score";
    pub const GENDER_SCALE: &str = "gender_scale";
    pub const GENDER_CATEGORY: &str = "gender_category";
    /// Composite `name_gender_position` key disambiguating identically
    /// spelled names that differ by gender or positional role.
    pub const NAME_KEY: &str = "name_key";

    pub const FEMALE_TOTAL: &str = "female_total";
    pub const MALE_TOTAL: &str = "male_total";
}

// ── Gender category labels, ordered by ascending gender_scale ───────────────
pub mod category {
    pub const PREDOMINANTLY_MALE: &str = "Predominantly Male";
    pub const MALE_LEANING_UNISEX: &str = "Male-leaning Unisex";
    pub const TRUE_UNISEX: &str = "True Unisex";
    pub const FEMALE_LEANING_UNISEX: &str = "Female-leaning Unisex";
    pub const PREDOMINANTLY_FEMALE: &str = "Predominantly Female";

    pub const ALL: [&str; 5] = [
        PREDOMINANTLY_MALE,
        MALE_LEANING_UNISEX,
        TRUE_UNISEX,
        FEMALE_LEANING_UNISEX,
        PREDOMINANTLY_FEMALE,
    ];

    /// Upper edge of each bin over `gender_scale`. Bins are upper-inclusive,
    /// with 0.0 falling into the first bin.
    pub const UPPER_EDGES: [f32; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];
}
