/// The eight semantic colors of a theme, as `#rrggbb` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub background: &'static str,
    pub surface: &'static str,
    pub surface_hover: &'static str,
    pub border: &'static str,
    pub text: &'static str,
    pub text_muted: &'static str,
    pub accent: &'static str,
    pub accent_hover: &'static str,
}

impl ThemeColors {
    /// Style variable name / value pairs, in the order they are applied.
    pub fn style_variables(&self) -> [(&'static str, &'static str); 8] {
        [
            ("--color-background", self.background),
            ("--color-surface", self.surface),
            ("--color-surface-hover", self.surface_hover),
            ("--color-border", self.border),
            ("--color-text", self.text),
            ("--color-text-muted", self.text_muted),
            ("--color-accent", self.accent),
            ("--color-accent-hover", self.accent_hover),
        ]
    }
}

/// A named color palette from the fixed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub colors: ThemeColors,
}

impl Theme {
    /// Look up a catalog entry by id.
    pub fn find(id: &str) -> Option<&'static Theme> {
        THEMES.iter().find(|t| t.id == id)
    }

    /// The fallback theme (first catalog entry).
    pub fn fallback() -> &'static Theme {
        &THEMES[0]
    }
}

/// Parse a `#rrggbb` color into its channels.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub static THEMES: [Theme; 8] = [
    Theme {
        id: "dark-modern",
        name: "Dark Modern",
        description: "Dark theme with teal accents",
        colors: ThemeColors {
            background: "#0d1117",
            surface: "#161b22",
            surface_hover: "#1c1f26",
            border: "#30363d",
            text: "#ffffff",
            text_muted: "#8b949e",
            accent: "#14b8a6",
            accent_hover: "#0d9488",
        },
    },
    Theme {
        id: "dark-plus",
        name: "Dark+",
        description: "VSCode default dark theme",
        colors: ThemeColors {
            background: "#1e1e1e",
            surface: "#252526",
            surface_hover: "#2d2d30",
            border: "#3e3e42",
            text: "#d4d4d4",
            text_muted: "#858585",
            accent: "#007acc",
            accent_hover: "#005a9e",
        },
    },
    Theme {
        id: "monokai",
        name: "Monokai",
        description: "Classic dark theme",
        colors: ThemeColors {
            background: "#272822",
            surface: "#2e2e2e",
            surface_hover: "#3e3d32",
            border: "#49483e",
            text: "#f8f8f2",
            text_muted: "#75715e",
            accent: "#66d9ef",
            accent_hover: "#4fc3dc",
        },
    },
    Theme {
        id: "github-dark",
        name: "GitHub Dark",
        description: "GitHub's dark theme",
        colors: ThemeColors {
            background: "#0d1117",
            surface: "#161b22",
            surface_hover: "#1c2128",
            border: "#30363d",
            text: "#c9d1d9",
            text_muted: "#8b949e",
            accent: "#58a6ff",
            accent_hover: "#388bfd",
        },
    },
    Theme {
        id: "nord",
        name: "Nord",
        description: "Arctic, north-bluish color palette",
        colors: ThemeColors {
            background: "#2e3440",
            surface: "#3b4252",
            surface_hover: "#434c5e",
            border: "#4c566a",
            text: "#eceff4",
            text_muted: "#d8dee9",
            accent: "#88c0d0",
            accent_hover: "#81a1c1",
        },
    },
    Theme {
        id: "dracula",
        name: "Dracula",
        description: "Dark theme with vivid colors",
        colors: ThemeColors {
            background: "#282a36",
            surface: "#343746",
            surface_hover: "#44475a",
            border: "#6272a4",
            text: "#f8f8f2",
            text_muted: "#6272a4",
            accent: "#bd93f9",
            accent_hover: "#9580d6",
        },
    },
    Theme {
        id: "one-dark",
        name: "One Dark Pro",
        description: "Atom's iconic One Dark theme",
        colors: ThemeColors {
            background: "#282c34",
            surface: "#2c313a",
            surface_hover: "#3e4451",
            border: "#3e4451",
            text: "#abb2bf",
            text_muted: "#5c6370",
            accent: "#61afef",
            accent_hover: "#528bcc",
        },
    },
    Theme {
        id: "night-owl",
        name: "Night Owl",
        description: "Fine-tuned for night coders",
        colors: ThemeColors {
            background: "#011627",
            surface: "#01111f",
            surface_hover: "#1d3b53",
            border: "#1d3b53",
            text: "#d6deeb",
            text_muted: "#637777",
            accent: "#7fdbca",
            accent_hover: "#5fb4a2",
        },
    },
];
