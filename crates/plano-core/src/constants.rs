//! Application constants and configuration defaults
//!
//! Centralized location for magic numbers and default values

/// Line classification limits
pub mod parsing {
    /// Longest text accepted as the label of a `Label: value` line
    pub const MAX_LABEL_CHARS: usize = 60;

    /// Longest standalone line that may open an exercise block
    pub const MAX_BLOCK_NAME_CHARS: usize = 60;

    /// Most words a standalone line may have to open an exercise block
    pub const MAX_BLOCK_NAME_WORDS: usize = 8;

    /// Most words an unmarked all-caps line may have to open a section
    pub const MAX_KEYWORD_HEADER_WORDS: usize = 6;
}

/// Shopping list cleanup
pub mod shopping {
    /// Items shorter than this (in chars) are noise
    pub const MIN_ITEM_CHARS: usize = 3;

    /// Category for items listed before any category line
    pub const DEFAULT_CATEGORY: &str = "Geral";
}

/// Today's schedule
pub mod schedule {
    /// Most exercises shown for one day
    pub const MAX_TODAY_EXERCISES: usize = 8;

    /// Rest day descriptor
    pub const REST_DAY_TITLE: &str = "Dia de Descanso";
    pub const REST_DAY_DESCRIPTION: &str =
        "Recuperação ativa: caminhada leve, alongamento e mobilidade.";
    pub const REST_DAY_DURATION_MINUTES: u32 = 20;
}

/// Parse cache sizing
pub mod cache {
    /// Parsed plans kept in memory
    pub const MAX_ENTRIES: usize = 16;
}

/// Validation gate
pub mod gate {
    /// Shown whenever a text is rejected as a plan
    pub const NO_VALID_PLAN: &str = "Nenhum Plano Válido Disponível";
}

/// Filesystem layout
pub mod ui {
    /// Config directory name
    pub const CONFIG_DIR_NAME: &str = ".plano";

    /// Config file inside the config directory
    pub const CONFIG_FILE_NAME: &str = "config.toml";

    /// Completion database file name
    pub const DATABASE_FILE_NAME: &str = "plano.db";

    /// Log file name inside the logs directory
    pub const LOG_FILE_NAME: &str = "plano.log";
}
