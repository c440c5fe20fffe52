/// Which sidebar section is visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Panel {
    #[default]
    Emergency,
    Admin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonStyle {
    pub active: bool,
}

impl ButtonStyle {
    pub fn classes(&self) -> &'static [&'static str] {
        if self.active {
            &["btn-success", "active"]
        } else {
            &["btn-outline-success"]
        }
    }

    pub fn class_attr(&self) -> String {
        let mut out = String::from("btn");
        for class in self.classes() {
            out.push(' ');
            out.push_str(class);
        }
        out
    }
}

/// Visibility of both panels and styling of both toggle buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelStyle {
    pub emergency_visible: bool,
    pub admin_visible: bool,
    pub emergency_button: ButtonStyle,
    pub admin_button: ButtonStyle,
}

impl PanelStyle {
    pub fn for_panel(panel: Panel) -> Self {
        let on = panel == Panel::Emergency;
        Self {
            emergency_visible: on,
            admin_visible: !on,
            emergency_button: ButtonStyle { active: on },
            admin_button: ButtonStyle { active: !on },
        }
    }
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self::for_panel(Panel::default())
    }
}

/// CSS `display` value for a visibility flag.
pub fn display(visible: bool) -> &'static str {
    if visible {
        "block"
    } else {
        "none"
    }
}
