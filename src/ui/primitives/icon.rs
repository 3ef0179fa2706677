use crossterm::style::Stylize;

use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Warning,
    Progress,
    Arrow,
    Lock,
    Backup,
    Rollback,
}

impl Icon {
    pub fn render(&self, supports_unicode: bool) -> &'static str {
        match (supports_unicode, self) {
            (true, Icon::Success) => theme::icons::SUCCESS,
            (true, Icon::Error) => theme::icons::ERROR,
            (true, Icon::Warning) => theme::icons::WARNING,
            (true, Icon::Progress) => theme::icons::PROGRESS,
            (true, Icon::Arrow) => theme::icons::ARROW,
            (true, Icon::Lock) => theme::icons::LOCK,
            (true, Icon::Backup) => theme::icons::BACKUP,
            (true, Icon::Rollback) => theme::icons::ROLLBACK,
            (false, Icon::Success) => theme::icons_ascii::SUCCESS,
            (false, Icon::Error) => theme::icons_ascii::ERROR,
            (false, Icon::Warning) => theme::icons_ascii::WARNING,
            (false, Icon::Progress) => theme::icons_ascii::PROGRESS,
            (false, Icon::Arrow) => theme::icons_ascii::ARROW,
            (false, Icon::Lock) => theme::icons_ascii::LOCK,
            (false, Icon::Backup) => theme::icons_ascii::BACKUP,
            (false, Icon::Rollback) => theme::icons_ascii::ROLLBACK,
        }
    }

    pub fn colored(&self, supports_color: bool, supports_unicode: bool) -> String {
        let s = self.render(supports_unicode);
        if !supports_color {
            return s.to_string();
        }
        let color = match self {
            Icon::Success => theme::colors::SUCCESS,
            Icon::Error => theme::colors::ERROR,
            Icon::Warning | Icon::Rollback => theme::colors::WARNING,
            Icon::Progress | Icon::Lock | Icon::Backup => theme::colors::INFO,
            Icon::Arrow => theme::colors::DIM,
        };
        format!("{}", s.with(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_renders_ascii_when_unicode_unsupported() {
        assert_eq!(Icon::Success.render(false), theme::icons_ascii::SUCCESS);
        assert_eq!(Icon::Lock.colored(false, false), "[LOCK]");
    }

    #[test]
    fn icon_renders_unicode_when_supported() {
        assert_eq!(Icon::Warning.render(true), theme::icons::WARNING);
    }
}
