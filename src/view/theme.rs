//! 主题：语义记号类别 → 样式的查找表，以及悬停高亮样式

/// 主题可着色的语义类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    String,
    Number,
    Boolean,
    Null,
    Key,
    Title,
    Background,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub color: String,
    pub bold: bool,
}

impl Style {
    fn color(color: &str) -> Self {
        Self {
            color: color.to_string(),
            bold: false,
        }
    }

    fn bold(color: &str) -> Self {
        Self {
            color: color.to_string(),
            bold: true,
        }
    }
}

/// 编辑器中悬停区间的装饰样式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightStyle {
    pub background: String,
}

impl HighlightStyle {
    pub fn dark() -> Self {
        Self {
            background: "rgba(255, 250, 112, 0.2)".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            background: "rgba(145, 240, 180, 0.5)".to_string(),
        }
    }
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self::dark()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub dark: bool,
    string: Style,
    number: Style,
    boolean: Style,
    null: Style,
    key: Style,
    title: Style,
    background: Style,
}

pub const DEFAULT_THEME: &str = "tokyo-night";

const BUILTIN_THEMES: [&str; 6] = [
    "tokyo-night",
    "tokyo-night-day",
    "espresso",
    "barf",
    "solarized-light",
    "rose-pine-dawn",
];

impl Theme {
    /// 按类别查样式
    pub fn style(&self, class: TokenClass) -> &Style {
        match class {
            TokenClass::String => &self.string,
            TokenClass::Number => &self.number,
            TokenClass::Boolean => &self.boolean,
            TokenClass::Null => &self.null,
            TokenClass::Key => &self.key,
            TokenClass::Title => &self.title,
            TokenClass::Background => &self.background,
        }
    }

    pub fn highlight(&self) -> HighlightStyle {
        if self.dark {
            HighlightStyle::dark()
        } else {
            HighlightStyle::light()
        }
    }

    pub fn builtin_names() -> &'static [&'static str] {
        &BUILTIN_THEMES
    }

    pub fn by_name(name: &str) -> Option<Theme> {
        match name {
            "tokyo-night" => Some(Self::tokyo_night()),
            "tokyo-night-day" => Some(Self::tokyo_night_day()),
            "espresso" => Some(Self::espresso()),
            "barf" => Some(Self::barf()),
            "solarized-light" => Some(Self::solarized_light()),
            "rose-pine-dawn" => Some(Self::rose_pine_dawn()),
            _ => None,
        }
    }

    pub fn tokyo_night() -> Self {
        Self {
            name: "tokyo-night",
            dark: true,
            string: Style::color("#9ece6a"),
            number: Style::color("#ff9e64"),
            boolean: Style::color("#c0caf5"),
            null: Style::color("#bb9af7"),
            key: Style::color("#7aa2f7"),
            title: Style::color("#bb9af7"),
            background: Style::color("#1a1b26"),
        }
    }

    pub fn tokyo_night_day() -> Self {
        Self {
            name: "tokyo-night-day",
            dark: false,
            string: Style::color("#587539"),
            number: Style::color("#b15c00"),
            boolean: Style::color("#3760bf"),
            null: Style::color("#007197"),
            key: Style::color("#007197"),
            title: Style::color("#3760bf"),
            background: Style::color("#e1e2e7"),
        }
    }

    pub fn espresso() -> Self {
        Self {
            name: "espresso",
            dark: false,
            string: Style::color("#CF4F5F"),
            number: Style::bold("#CF4F5F"),
            boolean: Style::color("#CF4F5F"),
            null: Style::color("#CF4F5F"),
            key: Style::color("#2F6F9F"),
            title: Style::color("#CF4F5F"),
            background: Style::color("#ffffff"),
        }
    }

    pub fn barf() -> Self {
        Self {
            name: "barf",
            dark: true,
            string: Style::color("#5C81B3"),
            number: Style::color("#C1E1B8"),
            boolean: Style::color("#53667D"),
            null: Style::color("#697A8E"),
            key: Style::color("#697A8E"),
            title: Style::color("#708E67"),
            background: Style::color("#15191EFA"),
        }
    }

    pub fn solarized_light() -> Self {
        Self {
            name: "solarized-light",
            dark: false,
            string: Style::color("#2AA198"),
            number: Style::color("#D33682"),
            boolean: Style::color("#B58900"),
            null: Style::color("#B58900"),
            key: Style::color("#93A1A1"),
            title: Style::color("#859900"),
            background: Style::color("#fef7e5"),
        }
    }

    pub fn rose_pine_dawn() -> Self {
        Self {
            name: "rose-pine-dawn",
            dark: false,
            string: Style::color("#ea9d34"),
            number: Style::color("#d7827e"),
            boolean: Style::color("#286983"),
            null: Style::color("#FFCC66"),
            key: Style::color("#907aa9"),
            title: Style::color("#286983"),
            background: Style::color("#faf4ed"),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::tokyo_night()
    }
}
