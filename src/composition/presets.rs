/// Background used when a session starts (the "Sunset" preset).
pub const DEFAULT_GRADIENT: &str = "linear-gradient(to right, #FF512F, #F4D03F, #DD2476)";

/// Built-in gradient swatches, addressable by name from the CLI.
pub const GRADIENT_PRESETS: &[(&str, &str)] = &[
    ("Sunset", DEFAULT_GRADIENT),
    (
        "Ocean",
        "linear-gradient(to right, #1A2980, #26D0CE, #2C3E50)",
    ),
    (
        "Meadow",
        "linear-gradient(to right, #16A085, #F4D03F, #4CAF50)",
    ),
    (
        "Lavender",
        "linear-gradient(to right, #834d9b, #D04ED6, #9A48D0)",
    ),
    (
        "Cherry",
        "linear-gradient(to right, #EB3349, #F45C43, #FF8C00)",
    ),
    (
        "Horizon",
        "linear-gradient(to right, #003973, #E5E5BE, #FF6B6B)",
    ),
    (
        "Stellar",
        "linear-gradient(to right, #7474BF, #348AC7, #E100FF)",
    ),
    (
        "Aurora",
        "linear-gradient(to right, #1FE4F5, #3FBAFE, #2BC0E4)",
    ),
];

/// Look up a gradient preset by case-insensitive name.
pub fn gradient_preset(name: &str) -> Option<&'static str> {
    GRADIENT_PRESETS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
        .map(|(_, css)| *css)
}
